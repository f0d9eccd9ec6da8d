use std::fmt::{self, Display, Formatter};

use engine::Outcome;
use generational_arena::Index;
use model::PositionAnalysis;

pub type NodeId = Index;

/// Number of times a node has been expanded through. Proven nodes are never explored again and
/// are counted as `Infinite`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Visits {
    Finite(usize),
    Infinite,
}

impl Visits {
    pub fn is_zero(&self) -> bool {
        matches!(self, Visits::Finite(0))
    }

    pub fn as_f32(&self) -> f32 {
        match self {
            Visits::Finite(visits) => *visits as f32,
            Visits::Infinite => f32::INFINITY,
        }
    }

    pub fn increment(&mut self) {
        if let Visits::Finite(visits) = self {
            *visits += 1;
        }
    }
}

impl Display for Visits {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Visits::Finite(visits) => write!(f, "{}", visits),
            Visits::Infinite => write!(f, "inf"),
        }
    }
}

#[derive(Debug)]
pub struct SearchNode<S> {
    position: S,
    parent: Option<NodeId>,
    children: Option<Vec<NodeId>>,
    is_maximizing: bool,
    is_terminal: bool,
    policy: Option<Vec<f32>>,
    heuristic: f32,
    visits: Visits,
    proven: bool,
}

impl<S> SearchNode<S> {
    pub(crate) fn terminal(
        position: S,
        parent: Option<NodeId>,
        is_maximizing: bool,
        outcome: Outcome,
    ) -> Self {
        Self {
            position,
            parent,
            children: None,
            is_maximizing,
            is_terminal: true,
            policy: None,
            heuristic: outcome.value(),
            visits: Visits::Infinite,
            proven: true,
        }
    }

    pub(crate) fn evaluated(
        position: S,
        parent: Option<NodeId>,
        is_maximizing: bool,
        analysis: PositionAnalysis,
    ) -> Self {
        Self {
            position,
            parent,
            children: None,
            is_maximizing,
            is_terminal: false,
            policy: Some(analysis.policy),
            heuristic: analysis.value,
            visits: Visits::Finite(0),
            proven: false,
        }
    }

    pub fn position(&self) -> &S {
        &self.position
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> Option<&[NodeId]> {
        self.children.as_deref()
    }

    pub fn is_expanded(&self) -> bool {
        self.children.is_some()
    }

    pub fn is_maximizing(&self) -> bool {
        self.is_maximizing
    }

    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    pub fn policy(&self) -> Option<&[f32]> {
        self.policy.as_deref()
    }

    /// Best known estimate of the value of this subtree. Exact when the node is proven.
    pub fn heuristic(&self) -> f32 {
        self.heuristic
    }

    pub fn visits(&self) -> Visits {
        self.visits
    }

    pub fn is_proven(&self) -> bool {
        self.proven
    }

    /// The proven outcome of this subtree, if known.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.proven {
            Outcome::from_value(self.heuristic)
        } else {
            None
        }
    }

    /// The best value the player to move could hope for: `1` for player one, `-1` for player two.
    pub fn optimal_value(&self) -> f32 {
        if self.is_maximizing {
            1.0
        } else {
            -1.0
        }
    }

    /// Whether `value` is strictly better than `other` for the player to move at this node.
    pub fn prefers(&self, value: f32, other: f32) -> bool {
        if self.is_maximizing {
            value > other
        } else {
            value < other
        }
    }

    /// The max of `values` for a maximizing node, otherwise the min.
    pub fn critical_value(&self, values: impl Iterator<Item = f32>) -> Option<f32> {
        values.reduce(|best, value| {
            if self.prefers(value, best) {
                value
            } else {
                best
            }
        })
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub(crate) fn set_expanded(&mut self, children: Vec<NodeId>, heuristic: f32) {
        self.children = Some(children);
        self.heuristic = heuristic;
        self.visits = Visits::Finite(1);
    }

    pub(crate) fn set_heuristic(&mut self, heuristic: f32) {
        self.heuristic = heuristic;
    }

    pub(crate) fn increment_visits(&mut self) {
        self.visits.increment();
    }

    pub(crate) fn set_proven(&mut self, value: f32) {
        self.heuristic = value;
        self.visits = Visits::Infinite;
        self.proven = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(is_maximizing: bool) -> SearchNode<&'static str> {
        SearchNode::evaluated(
            "",
            None,
            is_maximizing,
            PositionAnalysis::new(vec![0.5, 0.5], 0.25),
        )
    }

    #[test]
    fn test_visits_ordering() {
        assert!(Visits::Finite(0) < Visits::Finite(1));
        assert!(Visits::Finite(usize::MAX) < Visits::Infinite);
    }

    #[test]
    fn test_infinite_visits_do_not_increment() {
        let mut visits = Visits::Infinite;
        visits.increment();
        assert_eq!(visits, Visits::Infinite);

        let mut visits = Visits::Finite(2);
        visits.increment();
        assert_eq!(visits, Visits::Finite(3));
    }

    #[test]
    fn test_terminal_node_is_proven() {
        let node = SearchNode::terminal("x", None, false, Outcome::PlayerOneWin);

        assert!(node.is_proven());
        assert!(node.is_terminal());
        assert_eq!(node.heuristic(), 1.0);
        assert_eq!(node.visits(), Visits::Infinite);
        assert_eq!(node.outcome(), Some(Outcome::PlayerOneWin));
        assert!(node.policy().is_none());
        assert!(node.children().is_none());
    }

    #[test]
    fn test_evaluated_node_is_unvisited() {
        let node = node(true);

        assert!(!node.is_proven());
        assert!(!node.is_expanded());
        assert_eq!(node.heuristic(), 0.25);
        assert!(node.visits().is_zero());
        assert_eq!(node.outcome(), None);
    }

    #[test]
    fn test_critical_value() {
        let values = [0.1, -0.4, 0.3];

        assert_eq!(node(true).critical_value(values.into_iter()), Some(0.3));
        assert_eq!(node(false).critical_value(values.into_iter()), Some(-0.4));
        assert_eq!(node(true).critical_value(std::iter::empty()), None);
    }

    #[test]
    fn test_prefers_is_strict() {
        assert!(node(true).prefers(0.2, 0.1));
        assert!(!node(true).prefers(0.1, 0.1));
        assert!(node(false).prefers(0.1, 0.2));
        assert!(!node(false).prefers(0.2, 0.2));
    }

    #[test]
    fn test_set_proven() {
        let mut node = node(false);
        node.set_proven(-1.0);

        assert!(node.is_proven());
        assert_eq!(node.visits(), Visits::Infinite);
        assert_eq!(node.outcome(), Some(Outcome::PlayerTwoWin));
    }
}
