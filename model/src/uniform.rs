use anyhow::Result;
use engine::GameRules;
use futures::future;

use super::analytics::{Oracle, PositionAnalysis};

/// Oracle that assigns equal probability to every legal move and a neutral value to every
/// position. Useful for playing without a trained model.
pub struct UniformOracle<'a, R> {
    rules: &'a R,
}

impl<'a, R> UniformOracle<'a, R> {
    pub fn new(rules: &'a R) -> Self {
        Self { rules }
    }
}

impl<R> Oracle for UniformOracle<'_, R>
where
    R: GameRules,
{
    type State = R::State;
    type Future = future::Ready<Result<Vec<PositionAnalysis>>>;

    fn evaluate(&self, positions: &[Self::State]) -> Self::Future {
        let analyses = positions
            .iter()
            .map(|position| {
                let num_moves = self.rules.possible_moves(position).len();
                let policy = vec![1.0 / num_moves as f32; num_moves];
                PositionAnalysis::new(policy, 0.0)
            })
            .collect();

        future::ready(Ok(analyses))
    }
}
