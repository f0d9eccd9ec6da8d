use std::time::{Duration, Instant};

use engine::GameRules;
use log::{debug, info};
use model::Oracle;
use rand::Rng;

use super::error::SearchError;
use super::node_details::NodeDetails;
use super::options::SearchOptions;
use super::tree::SearchTree;

/// Search controller that owns a tree rooted at the current position and keeps it across moves.
pub struct MCTS<'a, R, O>
where
    R: GameRules,
{
    options: SearchOptions,
    rules: &'a R,
    tree: SearchTree<'a, R, O>,
}

impl<'a, R, O> MCTS<'a, R, O>
where
    R: GameRules,
    O: Oracle<State = R::State>,
{
    pub async fn new(
        position: R::State,
        rules: &'a R,
        oracle: &'a O,
        options: SearchOptions,
    ) -> Result<Self, SearchError> {
        if rules.is_over(&position) {
            return Err(SearchError::GameAlreadyOver);
        }

        let tree = SearchTree::new(position, rules, oracle, &options).await?;

        Ok(Self {
            options,
            rules,
            tree,
        })
    }

    pub fn tree(&self) -> &SearchTree<'a, R, O> {
        &self.tree
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn root_position(&self) -> &R::State {
        self.tree.root_node().position()
    }

    /// Expands nodes while `alive` returns true for the number of expansions made so far, or until
    /// the root is proven. Returns the number of expansions.
    pub async fn search<F>(&mut self, mut alive: F) -> Result<usize, SearchError>
    where
        F: FnMut(usize) -> bool,
    {
        let mut expansions = 0;

        while alive(expansions) {
            let root = self.tree.root();
            let Some(node_id) = self.tree.choose_expansion_node(root)? else {
                break;
            };

            self.tree.expand(node_id).await?;
            expansions += 1;
        }

        debug!(
            "Search finished after {} expansions. Root visits: {}",
            expansions,
            self.tree.root_node().visits()
        );

        Ok(expansions)
    }

    pub async fn search_iterations(&mut self, iterations: usize) -> Result<usize, SearchError> {
        self.search(|expansions| expansions < iterations).await
    }

    pub async fn search_time(&mut self, duration: Duration) -> Result<usize, SearchError> {
        let deadline = Instant::now() + duration;
        self.search(|_| Instant::now() < deadline).await
    }

    /// Searches for the configured number of iterations, stopping early at the time limit if one
    /// is set.
    pub async fn search_budget(&mut self) -> Result<usize, SearchError> {
        let iterations = self.options.iterations;

        match self.options.time_limit {
            Some(time_limit) => {
                let deadline = Instant::now() + time_limit;
                self.search(|expansions| expansions < iterations && Instant::now() < deadline)
                    .await
            }
            None => self.search_iterations(iterations).await,
        }
    }

    /// The position the player to move should go to. The tree is left untouched.
    pub async fn select_position(&mut self) -> Result<R::State, SearchError> {
        self.ensure_root_expanded().await?;
        self.log_expectation();

        let best_id = self.tree.choose_best_node(self.tree.root())?;
        let best = self.tree.node(best_id)?;

        info!("Expected outcome: {:.3}", best.heuristic());

        Ok(best.position().clone())
    }

    /// Like `select_position` but samples the child from the tree's child distribution.
    pub async fn sample_position<G>(&mut self, rng: &mut G) -> Result<R::State, SearchError>
    where
        G: Rng + ?Sized,
    {
        self.ensure_root_expanded().await?;

        let chosen_id = self.tree.sample_best_node(self.tree.root(), rng)?;
        Ok(self.tree.node(chosen_id)?.position().clone())
    }

    /// Plays out the whole turn of the player to move, which may span several positions. Each
    /// chosen position becomes the new root.
    pub async fn select_turn(&mut self) -> Result<Vec<R::State>, SearchError> {
        let is_player_one = self.rules.is_player_one_turn(self.root_position());
        let mut positions = Vec::new();

        loop {
            let position = self.select_position().await?;
            self.tree.reroot(&position)?;

            let is_turn_over = self.rules.is_over(&position)
                || self.rules.is_player_one_turn(&position) != is_player_one;

            positions.push(position);

            if is_turn_over {
                break;
            }
        }

        Ok(positions)
    }

    /// Moves the root to the child matching `position`, typically the move played by an opponent.
    pub async fn advance_to_position(&mut self, position: &R::State) -> Result<(), SearchError> {
        self.ensure_root_expanded().await?;
        self.tree.reroot(position)
    }

    pub fn root_details(&self) -> Result<NodeDetails<R::State>, SearchError> {
        self.tree.node_details(self.tree.root())
    }

    async fn ensure_root_expanded(&mut self) -> Result<(), SearchError> {
        let root = self.tree.root_node();

        if root.is_terminal() {
            return Err(SearchError::GameAlreadyOver);
        }

        if !root.is_expanded() {
            let root_id = self.tree.root();
            self.tree.expand(root_id).await?;
        }

        Ok(())
    }

    fn log_expectation(&self) {
        let root = self.tree.root_node();
        info!("Choosing move based on {} expansions", root.visits());

        if let Some(outcome) = root.outcome() {
            let expectation = if outcome.value() == root.optimal_value() {
                "Proven win"
            } else if outcome.value() == 0.0 {
                "Proven draw"
            } else {
                "Proven loss"
            };

            info!("{}: {}", expectation, outcome);
        }
    }
}

/// Searches from `position` within the budget of `options` and returns the chosen successor.
pub async fn choose_move<R, O>(
    rules: &R,
    position: R::State,
    oracle: &O,
    options: &SearchOptions,
) -> Result<R::State, SearchError>
where
    R: GameRules,
    O: Oracle<State = R::State>,
{
    if rules.is_over(&position) {
        return Err(SearchError::GameAlreadyOver);
    }

    let mut mcts = MCTS::new(position, rules, oracle, options.clone()).await?;
    mcts.search_budget().await?;
    mcts.select_position().await
}

/// Plays the successor with the highest policy entry without searching.
pub async fn choose_move_raw<R, O>(
    rules: &R,
    position: R::State,
    oracle: &O,
) -> Result<R::State, SearchError>
where
    R: GameRules,
    O: Oracle<State = R::State>,
{
    if rules.is_over(&position) {
        return Err(SearchError::GameAlreadyOver);
    }

    let mut analyses = oracle.evaluate(std::slice::from_ref(&position)).await?;
    if analyses.len() != 1 {
        return Err(SearchError::MalformedBatch {
            expected: 1,
            actual: analyses.len(),
        });
    }

    let policy = analyses.swap_remove(0).policy;
    let best_idx = argmax(&policy)?;
    let moves = rules.possible_moves(&position);
    let mismatch = SearchError::PolicyLengthMismatch {
        expected: moves.len(),
        actual: policy.len(),
    };

    if moves.len() != policy.len() {
        return Err(mismatch);
    }

    moves.into_iter().nth(best_idx).ok_or(mismatch)
}

/// Index of the first maximum. Fails when no entry is greater than negative infinity.
pub fn argmax(values: &[f32]) -> Result<usize, SearchError> {
    let mut best: Option<(usize, f32)> = None;

    for (idx, value) in values.iter().enumerate() {
        if *value > best.map_or(f32::NEG_INFINITY, |(_, best_value)| best_value) {
            best = Some((idx, *value));
        }
    }

    best.map(|(idx, _)| idx).ok_or(SearchError::EmptyDistribution)
}
