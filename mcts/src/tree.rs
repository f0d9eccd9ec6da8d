use engine::{GameRules, Outcome};
use generational_arena::Arena;
use log::{debug, info, warn};
use model::{Oracle, PositionAnalysis};
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

use super::error::SearchError;
use super::node::{NodeId, SearchNode};
use super::node_details::{ChildDetails, NodeDetails};
use super::options::SearchOptions;

/// Best-first search tree whose nodes carry the minimax backed up value of the positions
/// discovered beneath them.
///
/// Nodes live in an arena. A node refers to its parent and children by `NodeId`, the parent
/// reference is never used to keep a node alive.
pub struct SearchTree<'a, R, O>
where
    R: GameRules,
{
    rules: &'a R,
    oracle: &'a O,
    exploration_constant: f32,
    policy_weight: f32,
    root: NodeId,
    arena: Arena<SearchNode<R::State>>,
}

enum Selection {
    Descend(NodeId),
    Proven(f32),
}

impl<'a, R, O> SearchTree<'a, R, O>
where
    R: GameRules,
    O: Oracle<State = R::State>,
{
    /// Creates a tree containing only `position`. A non terminal root is scored by the oracle so
    /// that its policy is available when choosing between its children.
    pub async fn new(
        position: R::State,
        rules: &'a R,
        oracle: &'a O,
        options: &SearchOptions,
    ) -> Result<Self, SearchError> {
        let is_maximizing = rules.is_player_one_turn(&position);

        let root = if rules.is_over(&position) {
            let outcome = rules.winner(&position).ok_or(SearchError::MissingWinner)?;
            SearchNode::terminal(position, None, is_maximizing, outcome)
        } else {
            let analysis = Self::evaluate(oracle, std::slice::from_ref(&position))
                .await?
                .pop()
                .ok_or(SearchError::MalformedBatch {
                    expected: 1,
                    actual: 0,
                })?;
            SearchNode::evaluated(position, None, is_maximizing, analysis)
        };

        let mut arena = Arena::new();
        let root = arena.insert(root);

        Ok(Self {
            rules,
            oracle,
            exploration_constant: options.exploration_constant,
            policy_weight: options.policy_weight,
            root,
            arena,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &SearchNode<R::State> {
        &self.arena[self.root]
    }

    pub fn node(&self, id: NodeId) -> Result<&SearchNode<R::State>, SearchError> {
        self.arena.get(id).ok_or(SearchError::UnknownNode)
    }

    /// Number of nodes currently held by the tree.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Creates the children of `id`, scoring every non terminal child with a single oracle call,
    /// then backs the new critical value up towards the root.
    ///
    /// Fails without modifying the tree if the node already has children or is terminal.
    pub async fn expand(&mut self, id: NodeId) -> Result<(), SearchError> {
        let node = self.node(id)?;

        if node.is_expanded() {
            return Err(SearchError::AlreadyExpanded);
        }

        if node.is_terminal() {
            return Err(SearchError::TerminalExpansion);
        }

        let moves = self.rules.possible_moves(node.position());
        if moves.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        let policy_len = node.policy().map_or(0, <[f32]>::len);
        if policy_len != moves.len() {
            return Err(SearchError::PolicyLengthMismatch {
                expected: moves.len(),
                actual: policy_len,
            });
        }

        let outcomes = moves
            .iter()
            .map(|position| {
                if self.rules.is_over(position) {
                    self.rules
                        .winner(position)
                        .map(Some)
                        .ok_or(SearchError::MissingWinner)
                } else {
                    Ok(None)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pending = moves
            .iter()
            .zip(&outcomes)
            .filter(|(_, outcome)| outcome.is_none())
            .map(|(position, _)| position.clone())
            .collect::<Vec<_>>();

        let mut analyses = if pending.is_empty() {
            Vec::new()
        } else {
            Self::evaluate(self.oracle, &pending).await?
        }
        .into_iter();

        let mut children = Vec::with_capacity(moves.len());
        for (position, outcome) in moves.into_iter().zip(outcomes) {
            let is_maximizing = self.rules.is_player_one_turn(&position);
            let child = match outcome {
                Some(outcome) => SearchNode::terminal(position, Some(id), is_maximizing, outcome),
                None => {
                    let analysis = analyses.next().ok_or(SearchError::MalformedBatch {
                        expected: pending.len(),
                        actual: 0,
                    })?;
                    SearchNode::evaluated(position, Some(id), is_maximizing, analysis)
                }
            };

            children.push(child);
        }

        let critical_value = self.arena[id]
            .critical_value(children.iter().map(SearchNode::heuristic))
            .ok_or(SearchError::NoLegalMoves)?;

        let child_ids = children
            .into_iter()
            .map(|child| self.arena.insert(child))
            .collect();

        self.arena[id].set_expanded(child_ids, critical_value);
        self.backpropagate(id, critical_value);

        Ok(())
    }

    /// Walks from the parent of `id` to the root. Heuristics are replaced while the value is an
    /// improvement for the ancestor, but every ancestor up to the root gains a visit.
    fn backpropagate(&mut self, id: NodeId, critical_value: f32) {
        let mut improving = true;
        let mut parent = self.arena[id].parent();

        while let Some(node_id) = parent {
            let node = &mut self.arena[node_id];

            improving = improving
                && !node.is_proven()
                && node.prefers(critical_value, node.heuristic());

            if improving {
                node.set_heuristic(critical_value);
            }

            node.increment_visits();
            parent = node.parent();
        }
    }

    /// Finds the next node to expand in the subtree of `id`.
    ///
    /// Returns `None` once the subtree is proven. Nodes discovered to be proven along the way are
    /// marked as such and selection resumes from their parent.
    pub fn choose_expansion_node(&mut self, id: NodeId) -> Result<Option<NodeId>, SearchError> {
        let mut current = id;

        loop {
            let node = self.node(current)?;

            if node.is_proven() {
                return Ok(None);
            }

            if node.visits().is_zero() {
                return Ok(Some(current));
            }

            match self.select_child(current)? {
                Selection::Descend(child_id) => current = child_id,
                Selection::Proven(value) => {
                    let node = &mut self.arena[current];
                    node.set_proven(value);

                    match node.parent() {
                        Some(parent_id) => current = parent_id,
                        None => {
                            info!("Search tree is fully proven with a value of {}", value);
                            return Ok(None);
                        }
                    }
                }
            }
        }
    }

    fn select_child(&self, id: NodeId) -> Result<Selection, SearchError> {
        let node = &self.arena[id];
        let children = node.children().ok_or(SearchError::Unexpanded)?;
        let optimal_value = node.optimal_value();

        // A single proven optimal child decides the node regardless of its siblings.
        let is_decided = children.iter().any(|child_id| {
            let child = &self.arena[*child_id];
            child.is_proven() && child.heuristic() == optimal_value
        });

        if is_decided {
            return Ok(Selection::Proven(optimal_value));
        }

        let policy = node.policy().unwrap_or_default();
        let ln_visits = node.visits().as_f32().ln();
        let mut best: Option<(NodeId, f32)> = None;

        for (idx, child_id) in children.iter().enumerate() {
            let child = &self.arena[*child_id];

            if child.is_proven() {
                continue;
            }

            if child.visits().is_zero() {
                return Ok(Selection::Descend(*child_id));
            }

            let exploration =
                self.exploration_constant * (ln_visits / (child.visits().as_f32() + 1.0)).sqrt();
            let prior = self.policy_weight * policy.get(idx).copied().unwrap_or(0.0);
            let puct = exploration + prior;

            let combined = if node.is_maximizing() {
                child.heuristic() + puct
            } else {
                child.heuristic() - puct
            };

            if best.map_or(true, |(_, best_combined)| node.prefers(combined, best_combined)) {
                best = Some((*child_id, combined));
            }
        }

        if let Some((child_id, _)) = best {
            return Ok(Selection::Descend(child_id));
        }

        // Every child is proven and none of them is optimal.
        node.critical_value(children.iter().map(|child_id| self.arena[*child_id].heuristic()))
            .map(Selection::Proven)
            .ok_or(SearchError::NoLegalMoves)
    }

    /// Chooses the child of `id` to play.
    ///
    /// A proven node picks among the children that achieve its value, preferring the quickest win
    /// or the slowest loss. Otherwise the child with the highest selection score is picked, the
    /// first one winning ties.
    pub fn choose_best_node(&self, id: NodeId) -> Result<NodeId, SearchError> {
        let node = self.node(id)?;
        let children = node.children().ok_or(SearchError::Unexpanded)?;

        if node.is_proven() {
            let is_winning = node.heuristic() == node.optimal_value();
            let mut best: Option<(NodeId, usize)> = None;

            for child_id in children {
                let child = &self.arena[*child_id];
                if !child.is_proven() || child.heuristic() != node.heuristic() {
                    continue;
                }

                let depth = self.depth_to_end_game(*child_id)?;
                let is_better = best.map_or(true, |(_, best_depth)| {
                    if is_winning {
                        depth < best_depth
                    } else {
                        depth > best_depth
                    }
                });

                if is_better {
                    best = Some((*child_id, depth));
                }
            }

            return best
                .map(|(child_id, _)| child_id)
                .ok_or(SearchError::MissingProofLine);
        }

        let scores = self.child_scores(id)?;
        let mut best: Option<(NodeId, f32)> = None;

        for (child_id, score) in children.iter().zip(scores) {
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((*child_id, score));
            }
        }

        best.map(|(child_id, _)| child_id)
            .ok_or(SearchError::Unexpanded)
    }

    /// Scores the children of an unproven node by visits. A proven loss scores nothing and any
    /// other proven outcome is weighed against the node's own chance of winning.
    fn child_scores(&self, id: NodeId) -> Result<Vec<f32>, SearchError> {
        let node = self.node(id)?;
        let children = node.children().ok_or(SearchError::Unexpanded)?;
        let optimal_value = node.optimal_value();
        let winning_chance = (node.heuristic() * optimal_value + 1.0) / 2.0;
        let proven_score = node.visits().as_f32() * (1.0 - winning_chance);

        let scores = children
            .iter()
            .map(|child_id| {
                let child = &self.arena[*child_id];
                if !child.is_proven() {
                    child.visits().as_f32()
                } else if child.heuristic() == -optimal_value {
                    0.0
                } else {
                    proven_score
                }
            })
            .collect();

        Ok(scores)
    }

    /// Number of plies until the game ends with perfect play from a proven node. The winning side
    /// takes the shortest line and the losing side the longest.
    pub fn depth_to_end_game(&self, id: NodeId) -> Result<usize, SearchError> {
        let node = self.node(id)?;

        if !node.is_proven() {
            return Err(SearchError::UnprovenDepthQuery);
        }

        let Some(children) = node.children() else {
            return Ok(0);
        };

        let is_winning = node.heuristic() == node.optimal_value();
        let mut best: Option<usize> = None;

        for child_id in children {
            let child = &self.arena[*child_id];
            if !child.is_proven() || child.heuristic() != node.heuristic() {
                continue;
            }

            let depth = self.depth_to_end_game(*child_id)?;
            best = Some(match best {
                None => depth,
                Some(best_depth) if is_winning => best_depth.min(depth),
                Some(best_depth) => best_depth.max(depth),
            });
        }

        best.map(|depth| depth + 1)
            .ok_or(SearchError::MissingProofLine)
    }

    /// Probability of playing each child of `id`, aligned to the order of its children.
    ///
    /// Proven nodes weigh the children that keep their value by `e^-depth` when winning and
    /// `e^depth` otherwise. Unproven nodes use the same scores as `choose_best_node`.
    pub fn child_distribution(&self, id: NodeId) -> Result<Vec<f32>, SearchError> {
        let node = self.node(id)?;
        let children = node.children().ok_or(SearchError::Unexpanded)?;

        let weights = if node.is_proven() {
            let is_winning = node.heuristic() == node.optimal_value();

            children
                .iter()
                .map(|child_id| {
                    let child = &self.arena[*child_id];
                    if !child.is_proven() || child.heuristic() != node.heuristic() {
                        return Ok(0.0);
                    }

                    let depth = self.depth_to_end_game(*child_id)? as f32;
                    Ok(if is_winning { (-depth).exp() } else { depth.exp() })
                })
                .collect::<Result<Vec<_>, SearchError>>()?
        } else {
            self.child_scores(id)?
        };

        let total = weights.iter().sum::<f32>();
        let distribution = if total > 0.0 {
            weights.iter().map(|weight| weight / total).collect()
        } else {
            vec![1.0 / weights.len() as f32; weights.len()]
        };

        Ok(distribution)
    }

    /// Samples a child of `id` from `child_distribution`.
    pub fn sample_best_node<G>(&self, id: NodeId, rng: &mut G) -> Result<NodeId, SearchError>
    where
        G: Rng + ?Sized,
    {
        let distribution = self.child_distribution(id)?;
        let children = self.node(id)?.children().ok_or(SearchError::Unexpanded)?;

        let chosen_idx = match WeightedIndex::new(&distribution) {
            Ok(weighted_index) => weighted_index.sample(rng),
            Err(_) => {
                warn!(
                    "Invalid child distribution {:?}. Move will be randomly selected.",
                    distribution
                );
                rng.gen_range(0..children.len())
            }
        };

        Ok(children[chosen_idx])
    }

    /// Makes the child of the root at `position` the new root. Its siblings and the old root are
    /// released, the retained subtree keeps its statistics.
    pub fn reroot(&mut self, position: &R::State) -> Result<(), SearchError> {
        let root = &self.arena[self.root];
        let children = root.children().ok_or(SearchError::Unexpanded)?;

        let chosen = children
            .iter()
            .copied()
            .find(|child_id| self.arena[*child_id].position() == position)
            .ok_or(SearchError::UnknownPosition)?;

        let released = children
            .iter()
            .copied()
            .filter(|child_id| *child_id != chosen)
            .collect::<Vec<_>>();

        for node_id in released {
            self.remove_subtree(node_id);
        }

        self.arena.remove(self.root);
        self.arena[chosen].set_parent(None);
        self.root = chosen;

        debug!(
            "Advanced root. Retained {} nodes with {} visits",
            self.arena.len(),
            self.arena[chosen].visits()
        );

        Ok(())
    }

    fn remove_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.arena.remove(id) {
            for child_id in node.children().unwrap_or_default() {
                self.remove_subtree(*child_id);
            }
        }
    }

    pub fn node_details(&self, id: NodeId) -> Result<NodeDetails<R::State>, SearchError> {
        let node = self.node(id)?;
        let policy = node.policy().unwrap_or_default();

        let children = node
            .children()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(idx, child_id)| {
                let child = &self.arena[*child_id];
                ChildDetails {
                    position: child.position().clone(),
                    policy: policy.get(idx).copied().unwrap_or(0.0),
                    visits: child.visits(),
                    evaluation: child.heuristic(),
                    outcome: child.outcome(),
                }
            })
            .collect();

        Ok(NodeDetails {
            visits: node.visits(),
            evaluation: node.heuristic(),
            outcome: node.outcome(),
            children,
        })
    }

    /// The proven outcome of the root, if the search has solved it.
    pub fn outcome(&self) -> Option<Outcome> {
        self.root_node().outcome()
    }

    async fn evaluate(
        oracle: &O,
        positions: &[R::State],
    ) -> Result<Vec<PositionAnalysis>, SearchError> {
        let analyses = oracle.evaluate(positions).await?;

        if analyses.len() != positions.len() {
            return Err(SearchError::MalformedBatch {
                expected: positions.len(),
                actual: analyses.len(),
            });
        }

        Ok(analyses)
    }
}
