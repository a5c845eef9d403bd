use super::search::{Search, SearchBase, SearchParameters, SearchStatus, SolutionRecord};
use crate::cut_tree::{CutRecorder, CutTree};
use crate::matrix::{Cost, CostMatrix};
use crate::timer::{TimeKeeper, Timer};
use fixedbitset::FixedBitSet;
use log::debug;

/// Builds a tour from `start` by always taking the cheapest edge to an unvisited city.
///
/// Ties are broken by the lowest city index. Returns `None` at a dead end,
/// i.e., when no unvisited city is reachable or the closing edge is forbidden.
pub fn nearest_neighbor_tour<C: Cost>(
    matrix: &CostMatrix<C>,
    start: usize,
) -> Option<(Vec<usize>, C)> {
    let n = matrix.len();

    if start >= n {
        return None;
    }

    let mut tour = Vec::with_capacity(n);
    tour.push(start);
    let mut visited = FixedBitSet::with_capacity(n);
    visited.insert(start);
    let mut current = start;
    let mut cost = C::zero();

    while tour.len() < n {
        let (next, weight) = matrix
            .row(current)
            .iter()
            .enumerate()
            .filter(|&(city, weight)| !visited.contains(city) && weight.is_finite())
            .fold(None, |best: Option<(usize, C)>, (city, &weight)| match best {
                Some((_, best_weight)) if best_weight <= weight => best,
                _ => Some((city, weight)),
            })?;

        tour.push(next);
        visited.insert(next);
        cost = cost + weight;
        current = next;
    }

    let closing = matrix.get(current, start);

    if !closing.is_finite() {
        return None;
    }

    Some((tour, cost + closing))
}

/// Tries every start city in order and returns the first tour completed.
///
/// The limits are polled before each start city.
pub(crate) fn greedy_pass<C, T, R>(base: &mut SearchBase<C, T, R>) -> Option<(Vec<usize>, C)>
where
    C: Cost,
    T: TimeKeeper,
    R: CutRecorder,
{
    for start in 0..base.matrix().len() {
        if base.check_limits() {
            return None;
        }

        if let Some(result) = nearest_neighbor_tour(base.matrix(), start) {
            return Some(result);
        }

        debug!("Nearest neighbor from city {start} reached a dead end.");
    }

    None
}

/// Greedy nearest-neighbor construction.
///
/// Emits at most one tour: the first one completed from start cities `0, 1, ...`.
pub struct Greedy<C, T = Timer, R = CutTree> {
    base: SearchBase<C, T, R>,
}

impl<C: Cost> Greedy<C> {
    /// Creates a greedy solver with a wall-clock timer following the time limit.
    pub fn new(matrix: CostMatrix<C>, parameters: SearchParameters) -> Self {
        let timer = parameters.create_timer();
        let cuts = CutTree::new(matrix.len());

        Self::with_collaborators(matrix, parameters, timer, cuts)
    }
}

impl<C, T, R> Greedy<C, T, R>
where
    C: Cost,
    T: TimeKeeper,
    R: CutRecorder,
{
    /// Creates a greedy solver with the given time oracle and cut recorder.
    pub fn with_collaborators(
        matrix: CostMatrix<C>,
        parameters: SearchParameters,
        timer: T,
        cuts: R,
    ) -> Self {
        let mut base = SearchBase::new(matrix, parameters, timer, cuts);
        base.stop_timer();

        Self { base }
    }
}

impl<C, T, R> Search for Greedy<C, T, R>
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

        let record = greedy_pass(&mut self.base).map(|(tour, cost)| {
            self.base.notify_expanded();
            self.base.notify_frontier_size(1);
            self.base.record(tour, cost)
        });

        // Nothing is proven, except that an empty instance has no tour.
        let exhaustive = self.base.matrix().is_empty();
        self.base.notify_finished(exhaustive);
        self.base.stop_timer();

        (record, true)
    }

    fn get_status(&self) -> &SearchStatus<C> {
        self.base.get_status()
    }
}
