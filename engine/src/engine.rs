use super::game_state::GameState;
use super::value::Outcome;

/// Rules of a two player, perfect information game.
///
/// All methods are pure functions of the given position.
pub trait GameRules {
    type State: GameState;

    /// Every legal successor of `game_state`. The order must be stable across calls on equal
    /// positions since policies produced by an oracle are aligned to it.
    fn possible_moves(&self, game_state: &Self::State) -> Vec<Self::State>;
    fn is_player_one_turn(&self, game_state: &Self::State) -> bool;
    fn is_over(&self, game_state: &Self::State) -> bool;

    /// The result of a finished game. `None` while the game is still being played.
    fn winner(&self, game_state: &Self::State) -> Option<Outcome>;
}
