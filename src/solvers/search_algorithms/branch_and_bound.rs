use super::greedy::greedy_pass;
use super::search::{
    ExpansionResult, Search, SearchBase, SearchParameters, SearchStatus, SolutionRecord,
};
use super::search_nodes::TspNode;
use crate::cut_tree::{CutRecorder, CutTree};
use crate::matrix::{Cost, CostMatrix};
use crate::timer::{TimeKeeper, Timer};
use log::debug;

/// Seeds a branch-and-bound search.
///
/// Runs the greedy pass for an initial incumbent and reduces the root.
/// Returns the greedy record, which is withheld until the search ends, and
/// the root node if the instance may have a tour.
pub(crate) fn initialize<C, T, R>(
    base: &mut SearchBase<C, T, R>,
) -> (Option<SolutionRecord<C>>, Option<TspNode<C>>)
where
    C: Cost,
    T: TimeKeeper,
    R: CutRecorder,
{
    let fallback = greedy_pass(base).map(|(tour, cost)| base.record(tour, cost));

    if base.is_terminated() {
        return (fallback, None);
    }

    let Some(root) = TspNode::create_root(base.matrix(), 0) else {
        debug!("The root reduction proved that no tour exists.");
        base.notify_finished(true);

        return (fallback, None);
    };

    debug!("Root lower bound: {}.", root.lower_bound());
    base.update_dual_bound(root.lower_bound());

    if base.is_terminated() {
        return (fallback, None);
    }

    (fallback, Some(root))
}

/// Branch-and-bound exploring the search tree in depth-first order.
///
/// The frontier is a stack, so memory stays linear in the depth of the tree.
/// The greedy tour is the initial incumbent; it is emitted only when the
/// search ends without finding a better tour.
pub struct BranchAndBound<C, T = Timer, R = CutTree> {
    base: SearchBase<C, T, R>,
    open: Vec<TspNode<C>>,
    fallback: Option<SolutionRecord<C>>,
    improved: bool,
}

impl<C: Cost> BranchAndBound<C> {
    /// Creates a branch-and-bound solver with a wall-clock timer following the time limit.
    pub fn new(matrix: CostMatrix<C>, parameters: SearchParameters) -> Self {
        let timer = parameters.create_timer();
        let cuts = CutTree::new(matrix.len());

        Self::with_collaborators(matrix, parameters, timer, cuts)
    }
}

impl<C, T, R> BranchAndBound<C, T, R>
where
    C: Cost,
    T: TimeKeeper,
    R: CutRecorder,
{
    /// Creates a branch-and-bound solver with the given time oracle and cut recorder.
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

        let mut open = Vec::with_capacity(capacity);
        open.extend(root);
        base.notify_frontier_size(open.len());
        base.stop_timer();

        Self {
            base,
            open,
            fallback,
            improved: false,
        }
    }

    fn finish(&mut self) -> (Option<SolutionRecord<C>>, bool) {
        self.base.stop_timer();
        let improved = self.improved;

        (self.fallback.take().filter(|_| !improved), true)
    }
}

impl<C, T, R> Search for BranchAndBound<C, T, R>
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
            let Some(node) = self.open.pop() else {
                self.base.notify_finished(true);

                return self.finish();
            };
            self.base.notify_frontier_size(self.open.len());

            if self.open.is_empty() {
                self.base.update_dual_bound(node.lower_bound());
            }

            let open = &mut self.open;
            let result = self.base.expand(&node, &mut |child| open.push(child));
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const INF: f64 = f64::INFINITY;

    struct Expired;

    impl TimeKeeper for Expired {
        fn start(&mut self) {}

        fn stop(&mut self) {}

        fn has_time_left(&self) -> bool {
            false
        }

        fn elapsed(&self) -> Duration {
            Duration::ZERO
        }
    }

    fn ring() -> CostMatrix<f64> {
        CostMatrix::new(vec![
            vec![0.0, 10.0, 100.0, 100.0],
            vec![100.0, 0.0, 10.0, 100.0],
            vec![100.0, 100.0, 0.0, 10.0],
            vec![10.0, 100.0, 100.0, 0.0],
        ])
        .unwrap()
    }

    fn classic() -> CostMatrix<f64> {
        CostMatrix::new(vec![
            vec![INF, 20.0, 30.0, 10.0, 11.0],
            vec![15.0, INF, 16.0, 4.0, 2.0],
            vec![3.0, 5.0, INF, 2.0, 4.0],
            vec![19.0, 6.0, 18.0, INF, 3.0],
            vec![16.0, 4.0, 7.0, 16.0, INF],
        ])
        .unwrap()
    }

    fn parameters() -> SearchParameters {
        SearchParameters {
            quiet: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_ring() {
        let mut solver = BranchAndBound::new(ring(), parameters());
        let records = solver.search();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tour, vec![0, 1, 2, 3]);
        assert_eq!(records[0].cost, 40.0);

        let status = solver.get_status();
        assert!(status.is_optimal);
        assert_eq!(status.best_bound, Some(40.0));
        assert_eq!(status.expanded, 0);
        assert_eq!(solver.search_next(), (None, true));
    }

    #[test]
    fn test_improves_on_greedy() {
        let matrix = classic();
        let mut solver = BranchAndBound::new(matrix.clone(), parameters());
        let records = solver.search();

        // The greedy tour [0, 3, 4, 1, 2] costs 36 and is not emitted.
        assert!(!records.is_empty());
        assert!(records.iter().all(|record| record.cost < 36.0));
        assert!(records
            .windows(2)
            .all(|pair| pair[1].cost < pair[0].cost));
        assert!(records
            .iter()
            .all(|record| matrix.is_valid_tour(&record.tour)));

        let last = records.last().unwrap();
        assert_eq!(last.cost, 28.0);
        assert_eq!(matrix.score_tour(&last.tour), 28.0);
        assert!(solver.get_status().is_optimal);
        assert!(solver.get_status().pruned > 0);
        assert!(last.leaves_cut > 0);
    }

    #[test]
    fn test_falls_back_to_greedy_tour() {
        // Every tour costs 3.
        let matrix = CostMatrix::new(vec![
            vec![INF, 1.0, 1.0],
            vec![1.0, INF, 1.0],
            vec![1.0, 1.0, INF],
        ])
        .unwrap();
        let mut solver = BranchAndBound::new(matrix, parameters());
        let records = solver.search();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tour, vec![0, 1, 2]);
        assert_eq!(records[0].cost, 3.0);
        assert!(solver.get_status().is_optimal);
    }

    #[test]
    fn test_without_greedy_tour() {
        // The greedy tour from every city runs into a dead end.
        let matrix = CostMatrix::new(vec![
            vec![INF, 10.0, 1.0, INF],
            vec![INF, INF, 10.0, 1.0],
            vec![1.0, INF, INF, 10.0],
            vec![10.0, 1.0, INF, INF],
        ])
        .unwrap();
        let mut solver = BranchAndBound::new(matrix, parameters());
        let records = solver.search();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tour, vec![0, 1, 2, 3]);
        assert_eq!(records[0].cost, 40.0);
        assert!(solver.get_status().is_optimal);
    }

    #[test]
    fn test_infeasible() {
        let mut matrix = ring();
        matrix.forbid_row(2);
        let mut solver = BranchAndBound::new(matrix, parameters());

        assert!(solver.search().is_empty());
        assert!(solver.get_status().is_infeasible);
        assert!(!solver.get_status().is_optimal);
    }

    #[test]
    fn test_empty_instance() {
        let mut solver = BranchAndBound::new(CostMatrix::<f64>::forbidden(0), parameters());

        assert!(solver.search().is_empty());
        assert!(solver.get_status().is_infeasible);
    }

    #[test]
    fn test_time_limit() {
        let mut solver =
            BranchAndBound::with_collaborators(classic(), parameters(), Expired, CutTree::new(5));

        assert!(solver.search().is_empty());
        assert!(solver.get_status().is_time_limit_reached);
        assert!(!solver.get_status().is_optimal);
    }

    #[test]
    fn test_expansion_limit_returns_greedy_tour() {
        let parameters = SearchParameters {
            quiet: true,
            expansion_limit: Some(1),
            ..Default::default()
        };
        let mut solver = BranchAndBound::new(classic(), parameters);
        let records = solver.search();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tour, vec![0, 3, 4, 1, 2]);
        assert_eq!(records[0].cost, 36.0);
        assert!(solver.get_status().is_expansion_limit_reached);
        assert_eq!(solver.get_status().expanded, 1);
    }

    #[test]
    fn test_does_not_touch_input_matrix() {
        let matrix = ring();
        let _ = BranchAndBound::new(matrix.clone(), parameters()).search();
        assert_eq!(matrix, ring());
    }
}
