use std::fmt::Debug;

/// A full snapshot of a game, including whose turn it is.
pub trait GameState: Clone + Eq + Debug {}

impl<T> GameState for T where T: Clone + Eq + Debug {}
