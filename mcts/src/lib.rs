mod error;
pub mod mcts;
mod node;
pub mod node_details;
pub mod options;
pub mod tree;
#[cfg(test)]
mod tree_game;

pub use error::*;
pub use mcts::*;
pub use node::*;
pub use node_details::*;
pub use options::*;
pub use tree::*;
