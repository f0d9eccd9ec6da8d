#![allow(clippy::inconsistent_digit_grouping)]
#![allow(clippy::unusual_byte_groupings)]

pub mod action;
pub mod engine;
pub mod game_state;

pub use action::*;
pub use engine::*;
pub use game_state::*;
