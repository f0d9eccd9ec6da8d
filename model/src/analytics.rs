use std::future::Future;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Produces a policy and value estimate for a batch of positions.
///
/// Batching allows all of the successors of a node to be scored in a single call.
pub trait Oracle {
    type State;
    type Future: Future<Output = Result<Vec<PositionAnalysis>>>;

    /// Returns one analysis per position, in the same order as `positions`.
    fn evaluate(&self, positions: &[Self::State]) -> Self::Future;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionAnalysis {
    /// Probability of each legal move, aligned to the order the rules enumerate them in.
    pub policy: Vec<f32>,
    /// Estimated outcome in [-1, 1] from the reference of player one.
    pub value: f32,
}

impl PositionAnalysis {
    pub fn new(policy: Vec<f32>, value: f32) -> Self {
        PositionAnalysis { policy, value }
    }
}
