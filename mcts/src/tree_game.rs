use std::cell::Cell;
use std::collections::HashMap;

use anyhow::{anyhow, Result};
use engine::{GameRules, Outcome};
use futures::future;
use model::{Oracle, PositionAnalysis};

/// Game spelled out as an explicit tree. Positions are strings and the successors of a position
/// are whatever was registered with `with_moves`. By default player one moves on positions of
/// even length.
#[derive(Default)]
pub struct TreeGame {
    moves: HashMap<&'static str, Vec<&'static str>>,
    outcomes: HashMap<&'static str, Outcome>,
    turns: HashMap<&'static str, bool>,
}

impl TreeGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_moves(mut self, position: &'static str, successors: &[&'static str]) -> Self {
        self.moves.insert(position, successors.to_vec());
        self
    }

    pub fn with_outcome(mut self, position: &'static str, outcome: Outcome) -> Self {
        self.outcomes.insert(position, outcome);
        self
    }

    pub fn with_turn(mut self, position: &'static str, is_player_one: bool) -> Self {
        self.turns.insert(position, is_player_one);
        self
    }
}

impl GameRules for TreeGame {
    type State = &'static str;

    fn possible_moves(&self, game_state: &Self::State) -> Vec<Self::State> {
        self.moves.get(game_state).cloned().unwrap_or_default()
    }

    fn is_player_one_turn(&self, game_state: &Self::State) -> bool {
        self.turns
            .get(game_state)
            .copied()
            .unwrap_or(game_state.len() % 2 == 0)
    }

    fn is_over(&self, game_state: &Self::State) -> bool {
        self.outcomes.contains_key(game_state)
    }

    fn winner(&self, game_state: &Self::State) -> Option<Outcome> {
        self.outcomes.get(game_state).copied()
    }
}

/// Oracle with fixed values per position. Unlisted positions are valued at `0` and receive a
/// uniform policy over their moves.
pub struct TreeOracle<'a> {
    rules: &'a TreeGame,
    values: HashMap<&'static str, f32>,
    policies: HashMap<&'static str, Vec<f32>>,
    short_batches: bool,
    failing: bool,
    calls: Cell<usize>,
}

impl<'a> TreeOracle<'a> {
    pub fn new(rules: &'a TreeGame) -> Self {
        Self {
            rules,
            values: HashMap::new(),
            policies: HashMap::new(),
            short_batches: false,
            failing: false,
            calls: Cell::new(0),
        }
    }

    pub fn with_values(mut self, values: &[(&'static str, f32)]) -> Self {
        self.values.extend(values.iter().copied());
        self
    }

    pub fn with_policy(mut self, position: &'static str, policy: &[f32]) -> Self {
        self.policies.insert(position, policy.to_vec());
        self
    }

    /// Drops the last analysis of any batch holding more than one position.
    pub fn with_short_batches(mut self) -> Self {
        self.short_batches = true;
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Oracle for TreeOracle<'_> {
    type State = &'static str;
    type Future = future::Ready<Result<Vec<PositionAnalysis>>>;

    fn evaluate(&self, positions: &[Self::State]) -> Self::Future {
        self.calls.set(self.calls.get() + 1);

        if self.failing {
            return future::ready(Err(anyhow!("Oracle is unavailable")));
        }

        let mut analyses = positions
            .iter()
            .map(|position| {
                let policy = self.policies.get(position).cloned().unwrap_or_else(|| {
                    let num_moves = self.rules.possible_moves(position).len();
                    vec![1.0 / num_moves as f32; num_moves]
                });
                let value = self.values.get(position).copied().unwrap_or(0.0);

                PositionAnalysis::new(policy, value)
            })
            .collect::<Vec<_>>();

        if self.short_batches && analyses.len() > 1 {
            analyses.pop();
        }

        future::ready(Ok(analyses))
    }
}
