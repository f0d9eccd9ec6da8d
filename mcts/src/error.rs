use thiserror::Error;

/// Errors raised by the search. Apart from `Oracle`, all of these are violations of a
/// precondition by the caller or by the collaborating rules and oracle.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Node already has children")]
    AlreadyExpanded,

    #[error("Cannot expand a terminal position")]
    TerminalExpansion,

    #[error("Game is already over")]
    GameAlreadyOver,

    #[error("Cannot take the argmax of an empty distribution")]
    EmptyDistribution,

    #[error("Depth to end game is only defined for proven nodes")]
    UnprovenDepthQuery,

    #[error("Position is not over but has no legal moves")]
    NoLegalMoves,

    #[error("Position is over but the rules report no winner")]
    MissingWinner,

    #[error("Oracle returned {actual} analyses for a batch of {expected} positions")]
    MalformedBatch { expected: usize, actual: usize },

    #[error("Policy has {actual} entries but the position has {expected} legal moves")]
    PolicyLengthMismatch { expected: usize, actual: usize },

    #[error("Node has not been expanded")]
    Unexpanded,

    #[error("Position does not match any child of the root")]
    UnknownPosition,

    #[error("Node does not exist in the search tree")]
    UnknownNode,

    #[error("Proven node has no child proving its value")]
    MissingProofLine,

    #[error(transparent)]
    Oracle(#[from] anyhow::Error),
}
