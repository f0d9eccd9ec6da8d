use engine::{GameRules, Outcome};

use super::GameState;

#[derive(Default)]
pub struct Engine {}

impl Engine {
    pub fn new() -> Self {
        Self {}
    }
}

impl GameRules for Engine {
    type State = GameState;

    fn possible_moves(&self, game_state: &Self::State) -> Vec<Self::State> {
        if game_state.outcome().is_some() {
            return Vec::new();
        }

        game_state
            .valid_columns()
            .map(|column| game_state.drop_piece(column))
            .collect()
    }

    fn is_player_one_turn(&self, game_state: &Self::State) -> bool {
        game_state.p1_turn_to_move
    }

    fn is_over(&self, game_state: &Self::State) -> bool {
        game_state.outcome().is_some()
    }

    fn winner(&self, game_state: &Self::State) -> Option<Outcome> {
        game_state.outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_possible_moves_are_ordered_by_column() {
        let engine = Engine::new();
        let state = GameState::initial();

        let moves = engine.possible_moves(&state);

        assert_eq!(moves.len(), 7);
        for (idx, next) in moves.iter().enumerate() {
            assert_eq!(state.column_played(next), Some(idx + 1));
        }
    }

    #[test]
    fn test_possible_moves_skip_full_columns() {
        let engine = Engine::new();
        let state = GameState::from_columns(&[2, 2, 2, 2, 2, 2]);

        let moves = engine.possible_moves(&state);

        assert_eq!(moves.len(), 6);
        assert_eq!(state.column_played(&moves[1]), Some(3));
    }

    #[test]
    fn test_finished_game_has_no_moves() {
        let engine = Engine::new();
        let state = GameState::from_columns(&[1, 1, 2, 2, 3, 3, 4]);

        assert!(engine.is_over(&state));
        assert_eq!(engine.winner(&state), Some(Outcome::PlayerOneWin));
        assert!(engine.possible_moves(&state).is_empty());
    }

    #[test]
    fn test_turn_alternates() {
        let engine = Engine::new();
        let state = GameState::initial();

        assert!(engine.is_player_one_turn(&state));
        assert!(!engine.is_player_one_turn(&state.drop_piece(4)));
    }

    #[test]
    fn test_winner_is_none_while_playing() {
        let engine = Engine::new();

        assert!(!engine.is_over(&GameState::initial()));
        assert_eq!(engine.winner(&GameState::initial()), None);
    }
}
