use anyhow::{anyhow, Result};
use connect4::{Action, Engine, GameState};
use engine::GameRules;
use log::{debug, info};
use mcts::{choose_move, choose_move_raw, SearchOptions, MCTS};
use model::Oracle;

/// Plays a single game from the given opening. Player one keeps its search tree between moves,
/// player two searches from scratch or, when `raw_player_two` is set, follows the oracle's policy.
pub async fn play_game<O>(
    engine: &Engine,
    oracle: &O,
    opening: &[Action],
    options: &SearchOptions,
    raw_player_two: bool,
) -> Result<GameState>
where
    O: Oracle<State = GameState>,
{
    let mut position = play_opening(opening)?;
    let mut player_one: Option<MCTS<'_, Engine, O>> = None;

    info!("Starting position:\n{}", position);

    while !engine.is_over(&position) {
        let next = if engine.is_player_one_turn(&position) {
            let mut mcts = match player_one.take() {
                Some(mcts) => mcts,
                None => MCTS::new(position.clone(), engine, oracle, options.clone()).await?,
            };

            mcts.search_budget().await?;
            info!("{}", mcts.root_details()?);

            let positions = mcts.select_turn().await?;
            player_one = Some(mcts);

            positions
                .last()
                .cloned()
                .ok_or_else(|| anyhow!("Search did not select a move"))?
        } else {
            let next = if raw_player_two {
                choose_move_raw(engine, position.clone(), oracle).await?
            } else {
                choose_move(engine, position.clone(), oracle, options).await?
            };

            if let Some(mcts) = player_one.as_mut() {
                mcts.advance_to_position(&next).await?;
            }

            next
        };

        let player = if engine.is_player_one_turn(&position) { 1 } else { 2 };
        let column = position
            .column_played(&next)
            .ok_or_else(|| anyhow!("Move does not drop a single piece"))?;

        info!("Player {} plays column {}", player, column);
        debug!("\n{}", next);

        position = next;
    }

    let outcome = engine
        .winner(&position)
        .ok_or_else(|| anyhow!("Game is over without a winner"))?;

    info!("{} after {} moves\n{}", outcome, position.number_of_actions(), position);

    Ok(position)
}

fn play_opening(opening: &[Action]) -> Result<GameState> {
    opening
        .iter()
        .try_fold(GameState::initial(), |position, action| {
            if position.outcome().is_some() {
                return Err(anyhow!("Opening continues past the end of the game"));
            }

            let is_valid = position
                .get_valid_actions()
                .get(action.column() - 1)
                .copied()
                .unwrap_or(false);

            if !is_valid {
                return Err(anyhow!("Opening plays {} into a full column", action));
            }

            Ok(position.take_action(action))
        })
}
