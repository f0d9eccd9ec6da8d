use std::fmt::{self, Debug, Display, Formatter};

use engine::Outcome;

use super::node::Visits;

pub struct NodeDetails<S> {
    pub visits: Visits,
    pub evaluation: f32,
    pub outcome: Option<Outcome>,
    pub children: Vec<ChildDetails<S>>,
}

impl<S> NodeDetails<S> {
    /// The first child with the most visits.
    pub fn most_visited(&self) -> Option<&ChildDetails<S>> {
        self.children
            .iter()
            .fold(None, |best: Option<&ChildDetails<S>>, child| match best {
                Some(best) if best.visits >= child.visits => Some(best),
                _ => Some(child),
            })
    }
}

impl<S: Debug> Display for NodeDetails<S> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let children = format!(
            "[{}]",
            self.children
                .iter()
                .fold(String::new(), |acc, child| acc + &format!("\n\t({}),", child))
        );

        write!(
            f,
            "V: {visits}, H: {evaluation:.3}, Proven: {outcome}, Children: {children}",
            visits = self.visits,
            evaluation = self.evaluation,
            outcome = format_outcome(self.outcome),
            children = children
        )
    }
}

impl<S: Debug> Debug for NodeDetails<S> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(self, f)
    }
}

#[derive(Clone, PartialEq)]
pub struct ChildDetails<S> {
    pub position: S,
    pub policy: f32,
    pub visits: Visits,
    pub evaluation: f32,
    pub outcome: Option<Outcome>,
}

impl<S: Debug> Display for ChildDetails<S> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "P: {policy:.3}, V: {visits}, H: {evaluation:.3}, Proven: {outcome}, S: {position:?}",
            policy = self.policy,
            visits = self.visits,
            evaluation = self.evaluation,
            outcome = format_outcome(self.outcome),
            position = self.position
        )
    }
}

impl<S: Debug> Debug for ChildDetails<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

fn format_outcome(outcome: Option<Outcome>) -> String {
    outcome.map_or_else(|| "-".to_string(), |outcome| outcome.to_string())
}
