use super::search::{Search, SearchBase, SearchParameters, SearchStatus, SolutionRecord};
use crate::cut_tree::{CutRecorder, CutTree};
use crate::matrix::{Cost, CostMatrix};
use crate::timer::{TimeKeeper, Timer};
use fixedbitset::FixedBitSet;

/// Exhaustive depth-first enumeration of tours starting at city 0.
///
/// Partial paths are never bounded; only forbidden edges cut the tree.
/// Every complete tour cheaper than the incumbent is emitted. When the stack
/// runs empty, the last tour is optimal, or the instance has none.
pub struct DepthFirstSearch<C, T = Timer, R = CutTree> {
    base: SearchBase<C, T, R>,
    open: Vec<(Vec<usize>, FixedBitSet)>,
}

impl<C: Cost> DepthFirstSearch<C> {
    /// Creates a depth-first search solver with a wall-clock timer following the time limit.
    pub fn new(matrix: CostMatrix<C>, parameters: SearchParameters) -> Self {
        let timer = parameters.create_timer();
        let cuts = CutTree::new(matrix.len());

        Self::with_collaborators(matrix, parameters, timer, cuts)
    }
}

impl<C, T, R> DepthFirstSearch<C, T, R>
where
    C: Cost,
    T: TimeKeeper,
    R: CutRecorder,
{
    /// Creates a depth-first search solver with the given time oracle and cut recorder.
    pub fn with_collaborators(
        matrix: CostMatrix<C>,
        parameters: SearchParameters,
        timer: T,
        cuts: R,
    ) -> Self {
        let n = matrix.len();
        let mut open = Vec::with_capacity(parameters.initial_frontier_capacity.unwrap_or(n));
        let mut base = SearchBase::new(matrix, parameters, timer, cuts);

        if n == 0 {
            base.notify_finished(true);
        } else {
            let mut visited = FixedBitSet::with_capacity(n);
            visited.insert(0);
            open.push((vec![0], visited));
            base.notify_frontier_size(1);
        }

        base.stop_timer();

        Self { base, open }
    }
}

impl<C, T, R> Search for DepthFirstSearch<C, T, R>
where
    C: Cost,
    T: TimeKeeper,
    R: CutRecorder,
{
    type CostType = C;

    fn search_next(&mut self) -> (Option<SolutionRecord<C>>, bool) {
        self.base.start_timer();

        if self.base.is_terminated() {
            self.base.stop_timer();

            return (None, true);
        }

        while !self.base.check_limits() {
            let Some((path, visited)) = self.open.pop() else {
                self.base.notify_finished(true);
                self.base.stop_timer();

                return (None, true);
            };
            self.base.notify_frontier_size(self.open.len());

            self.base.notify_expanded();
            let n = self.base.matrix().len();

            if path.len() == n {
                let cost = self.base.matrix().score_tour(&path);

                if self.base.is_improving(cost) {
                    let record = self.base.record(path, cost);
                    self.base.stop_timer();

                    return (Some(record), self.base.is_terminated());
                }

                self.base.prune(&path);

                continue;
            }

            let Some(&last) = path.last() else {
                continue;
            };

            // Pushed in reverse so that the lowest city is explored first.
            for city in (0..n).rev().filter(|&city| !visited.contains(city)) {
                let mut child = Vec::with_capacity(path.len() + 1);
                child.extend_from_slice(&path);
                child.push(city);

                if self.base.matrix().is_forbidden(last, city) {
                    self.base.prune(&child);
                } else {
                    let mut child_visited = visited.clone();
                    child_visited.insert(city);
                    self.open.push((child, child_visited));
                }
            }

            self.base.notify_frontier_size(self.open.len());
        }

        self.base.stop_timer();

        (None, true)
    }

    fn get_status(&self) -> &SearchStatus<C> {
        self.base.get_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INF: f64 = f64::INFINITY;

    fn ring() -> CostMatrix<f64> {
        CostMatrix::new(vec![
            vec![0.0, 10.0, 100.0, 100.0],
            vec![100.0, 0.0, 10.0, 100.0],
            vec![100.0, 100.0, 0.0, 10.0],
            vec![10.0, 100.0, 100.0, 0.0],
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
    fn test_depth_first_search() {
        let mut solver = DepthFirstSearch::new(ring(), parameters());
        let records = solver.search();

        // [0, 1, 2, 3] is the first tour enumerated.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tour, vec![0, 1, 2, 3]);
        assert_eq!(records[0].cost, 40.0);
        // [0, 2] and [0, 3] wait below [0, 1, 3].
        assert_eq!(records[0].frontier_size, 3);
        assert_eq!(records[0].max_frontier_size, 4);

        let status = solver.get_status();
        assert!(status.is_optimal);
        assert_eq!(status.best_bound, Some(40.0));
        // Root, 3 + 6 partial paths and 6 tours.
        assert_eq!(status.expanded, 16);
        assert_eq!(status.pruned, 5);
        assert_eq!(solver.search_next(), (None, true));
    }

    #[test]
    fn test_depth_first_search_improving_sequence() {
        let matrix = CostMatrix::new(vec![
            vec![INF, 1.0, 2.0, 3.0],
            vec![4.0, INF, 1.0, 9.0],
            vec![9.0, 2.0, INF, 1.0],
            vec![9.0, 5.0, 2.0, INF],
        ])
        .unwrap();
        let mut solver = DepthFirstSearch::new(matrix.clone(), parameters());
        let records = solver.search();

        assert!(records
            .windows(2)
            .all(|pair| pair[1].cost < pair[0].cost));
        assert!(records
            .iter()
            .all(|record| matrix.is_valid_tour(&record.tour)));
        let costs: Vec<_> = records.iter().map(|record| record.cost).collect();
        assert_eq!(costs, vec![12.0, 11.0]);
        assert_eq!(records[1].tour, vec![0, 3, 2, 1]);
        assert!(solver.get_status().is_optimal);
    }

    #[test]
    fn test_depth_first_search_cuts_forbidden_edges() {
        let mut matrix = ring();
        matrix.set(0, 2, INF);
        matrix.set(0, 3, INF);
        let mut solver = DepthFirstSearch::new(matrix, parameters());
        let records = solver.search();

        assert_eq!(records.len(), 1);
        assert_eq!(solver.get_status().expanded, 1 + 1 + 2 + 2);
        assert_eq!(records[0].leaves_cut, 4);
    }

    #[test]
    fn test_depth_first_search_infeasible() {
        let mut matrix = ring();
        matrix.forbid_row(3);
        let mut solver = DepthFirstSearch::new(matrix, parameters());

        assert!(solver.search().is_empty());
        assert!(solver.get_status().is_infeasible);
    }

    #[test]
    fn test_depth_first_search_expansion_limit() {
        let parameters = SearchParameters {
            quiet: true,
            expansion_limit: Some(3),
            ..Default::default()
        };
        let mut solver = DepthFirstSearch::new(ring(), parameters);

        assert!(solver.search().is_empty());
        assert!(solver.get_status().is_expansion_limit_reached);
        assert!(!solver.get_status().is_optimal);
    }

    #[test]
    fn test_depth_first_search_empty_instance() {
        let mut solver = DepthFirstSearch::new(CostMatrix::<f64>::forbidden(0), parameters());

        assert!(solver.search().is_empty());
        assert!(solver.get_status().is_infeasible);
    }
}
