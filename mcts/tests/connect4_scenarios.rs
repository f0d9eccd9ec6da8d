use std::f32::consts::SQRT_2;

use connect4::{Engine, GameState};
use engine::GameRules;
use mcts::{choose_move, choose_move_raw, SearchOptions, MCTS};
use model::UniformOracle;

#[tokio::test]
async fn test_takes_immediate_win() {
    let engine = Engine::new();
    let oracle = UniformOracle::new(&engine);
    let options = SearchOptions::new(SQRT_2, 1.0, 50);
    let position = GameState::from_columns(&[1, 1, 2, 2, 3, 3]);

    let chosen = choose_move(&engine, position.clone(), &oracle, &options)
        .await
        .unwrap();

    assert_eq!(chosen, position.drop_piece(4));
    assert!(engine.is_over(&chosen));
}

#[tokio::test]
async fn test_search_proves_immediate_win() {
    let engine = Engine::new();
    let oracle = UniformOracle::new(&engine);
    let options = SearchOptions::new(SQRT_2, 1.0, 50);
    let position = GameState::from_columns(&[1, 1, 2, 2, 3, 3]);

    let mut mcts = MCTS::new(position, &engine, &oracle, options).await.unwrap();
    let expansions = mcts.search_iterations(50).await.unwrap();

    assert_eq!(expansions, 1);
    assert_eq!(mcts.tree().outcome(), Some(engine::Outcome::PlayerOneWin));
}

#[tokio::test]
async fn test_raw_move_with_uniform_policy_plays_first_column() {
    let engine = Engine::new();
    let oracle = UniformOracle::new(&engine);
    let position = GameState::initial();

    let chosen = choose_move_raw(&engine, position.clone(), &oracle)
        .await
        .unwrap();

    assert_eq!(position.column_played(&chosen), Some(1));
}

#[tokio::test]
async fn test_self_play_reaches_end_of_game() {
    let engine = Engine::new();
    let oracle = UniformOracle::new(&engine);
    let options = SearchOptions::new(SQRT_2, 1.0, 20);
    let mut position = GameState::initial();
    let mut plies = 0;

    while !engine.is_over(&position) {
        position = choose_move(&engine, position, &oracle, &options)
            .await
            .unwrap();
        plies += 1;
    }

    assert!(plies <= 42);
    assert!(engine.winner(&position).is_some());
}
