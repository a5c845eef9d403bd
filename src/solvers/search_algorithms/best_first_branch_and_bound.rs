use super::branch_and_bound::initialize;
use super::search::{
    ExpansionResult, Search, SearchBase, SearchParameters, SearchStatus, SolutionRecord,
};
use super::search_nodes::{PrioritizedNode, PriorityWeights};
use crate::cut_tree::{CutRecorder, CutTree};
use crate::error::Error;
use crate::matrix::{Cost, CostMatrix};
use crate::timer::{TimeKeeper, Timer};
use std::collections::BinaryHeap;

/// Best-first branch-and-bound.
///
/// The frontier is a binary heap ordered by a priority that mixes the lower
/// bound and the depth of a node (see [`PriorityWeights`]), so that promising
/// nodes are expanded first while deep nodes still reach complete tours quickly.
/// Seeding and the fallback to the greedy tour are the same as in
/// [`BranchAndBound`](super::BranchAndBound).
pub struct BestFirstBranchAndBound<C, T = Timer, R = CutTree> {
    base: SearchBase<C, T, R>,
    open: BinaryHeap<PrioritizedNode<C>>,
    weights: PriorityWeights<C>,
    sequence: u64,
    fallback: Option<SolutionRecord<C>>,
    improved: bool,
}

impl<C: Cost> BestFirstBranchAndBound<C> {
    /// Creates a best-first branch-and-bound solver with a wall-clock timer following the time limit.
    pub fn new(matrix: CostMatrix<C>, parameters: SearchParameters) -> Self {
        let timer = parameters.create_timer();
        let cuts = CutTree::new(matrix.len());

        Self::with_collaborators(matrix, parameters, timer, cuts)
    }
}

impl<C, T, R> BestFirstBranchAndBound<C, T, R>
where
    C: Cost,
    T: TimeKeeper,
    R: CutRecorder,
{
    /// Creates a best-first branch-and-bound solver with the given time oracle and cut recorder.
    ///
    /// The greedy pass and the root reduction run here and are charged to the timer.
    pub fn with_collaborators(
        matrix: CostMatrix<C>,
        parameters: SearchParameters,
        timer: T,
        cuts: R,
    ) -> Self {
        let capacity = parameters.initial_frontier_capacity.unwrap_or(1);
        let mut base = SearchBase::new(matrix, parameters, timer, cuts);
        base.start_timer();
        let (fallback, root) = initialize(&mut base);

        let weights = PriorityWeights::default();
        let mut open = BinaryHeap::with_capacity(capacity);
        let mut sequence = 0;

        if let Some(root) = root {
            open.push(PrioritizedNode::new(root, &weights, sequence));
            sequence += 1;
        }

        base.notify_frontier_size(open.len());
        base.stop_timer();

        Self {
            base,
            open,
            weights,
            sequence,
            fallback,
            improved: false,
        }
    }

    /// Replaces the priority weights and reorders the frontier.
    ///
    /// # Errors
    ///
    /// Both weights must be finite and positive, otherwise a deeper node
    /// would not be preferred among nodes of equal bound.
    pub fn with_weights(mut self, weights: PriorityWeights<C>) -> Result<Self, Error> {
        let is_valid = |weight: C| weight.is_finite() && weight > C::zero();

        if !is_valid(weights.bound) || !is_valid(weights.depth) {
            return Err(Error::InvalidWeights {
                bound: weights.bound.to_string(),
                depth: weights.depth.to_string(),
            });
        }

        self.weights = weights;
        let open = std::mem::take(&mut self.open);
        self.open = open
            .into_iter()
            .map(|entry| {
                let sequence = entry.get_sequence();
                PrioritizedNode::new(entry.into_node(), &self.weights, sequence)
            })
            .collect();

        Ok(self)
    }

    fn finish(&mut self) -> (Option<SolutionRecord<C>>, bool) {
        self.base.stop_timer();
        let improved = self.improved;

        (self.fallback.take().filter(|_| !improved), true)
    }
}

impl<C, T, R> Search for BestFirstBranchAndBound<C, T, R>
where
    C: Cost,
    T: TimeKeeper,
    R: CutRecorder,
{
    type CostType = C;

    fn search_next(&mut self) -> (Option<SolutionRecord<C>>, bool) {
        self.base.start_timer();

        if self.base.is_terminated() {
            return self.finish();
        }

        while !self.base.check_limits() {
            let Some(entry) = self.open.pop() else {
                self.base.notify_finished(true);

                return self.finish();
            };
            self.base.notify_frontier_size(self.open.len());
            let node = entry.into_node();

            if self.open.is_empty() {
                self.base.update_dual_bound(node.lower_bound());
            }

            let open = &mut self.open;
            let weights = &self.weights;
            let sequence = &mut self.sequence;
            let mut callback = |child| {
                open.push(PrioritizedNode::new(child, weights, *sequence));
                *sequence += 1;
            };
            let result = self.base.expand(&node, &mut callback);
            self.base.notify_frontier_size(self.open.len());

            if let ExpansionResult::Solution(record) = result {
                self.improved = true;
                self.base.stop_timer();

                return (Some(record), self.base.is_terminated());
            }

            if self.base.is_terminated() {
                return self.finish();
            }
        }

        self.finish()
    }

    fn get_status(&self) -> &SearchStatus<C> {
        self.base.get_status()
    }
}
