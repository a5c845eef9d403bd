use crate::matrix::{Cost, CostMatrix};
use crate::solvers::search_algorithms::{BestFirstBranchAndBound, BranchAndBound};
use crate::solvers::{Search, SearchParameters};

/// Creates a depth-first branch-and-bound solver.
///
/// Nodes are bounded by reducing their cost matrices and explored in
/// last-in first-out order. The greedy tour is the initial incumbent and is
/// returned only if no better tour is found.
///
/// # Examples
///
/// ```
/// use atsp::prelude::*;
/// use atsp::solvers;
///
/// let inf = f64::INFINITY;
/// let matrix = CostMatrix::new(vec![
///     vec![inf, 20.0, 30.0, 10.0, 11.0],
///     vec![15.0, inf, 16.0, 4.0, 2.0],
///     vec![3.0, 5.0, inf, 2.0, 4.0],
///     vec![19.0, 6.0, 18.0, inf, 3.0],
///     vec![16.0, 4.0, 7.0, 16.0, inf],
/// ])
/// .unwrap();
/// let parameters = SearchParameters {
///     quiet: true,
///     ..Default::default()
/// };
/// let mut solver = solvers::create_branch_and_bound(matrix, parameters);
/// let records = solver.search();
/// assert_eq!(records.last().map(|record| record.cost), Some(28.0));
///
/// let status = solver.get_status();
/// assert!(status.is_optimal);
/// assert_eq!(status.best_bound, Some(28.0));
/// ```
pub fn create_branch_and_bound<C>(
    matrix: CostMatrix<C>,
    parameters: SearchParameters,
) -> impl Search<CostType = C>
where
    C: Cost,
{
    BranchAndBound::new(matrix, parameters)
}

/// Creates a best-first branch-and-bound solver.
///
/// Nodes are bounded by reducing their cost matrices and explored in order of
/// a priority favoring low bounds and deep paths.
///
/// # Examples
///
/// ```
/// use atsp::prelude::*;
/// use atsp::solvers;
///
/// let matrix = CostMatrix::new(vec![
///     vec![0.0, 10.0, 100.0, 100.0],
///     vec![100.0, 0.0, 10.0, 100.0],
///     vec![100.0, 100.0, 0.0, 10.0],
///     vec![10.0, 100.0, 100.0, 0.0],
/// ])
/// .unwrap();
/// let parameters = SearchParameters {
///     quiet: true,
///     ..Default::default()
/// };
/// let mut solver = solvers::create_best_first_branch_and_bound(matrix, parameters);
/// let records = solver.search();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].tour, vec![0, 1, 2, 3]);
/// assert_eq!(records[0].cost, 40.0);
/// assert!(solver.get_status().is_optimal);
/// ```
pub fn create_best_first_branch_and_bound<C>(
    matrix: CostMatrix<C>,
    parameters: SearchParameters,
) -> impl Search<CostType = C>
where
    C: Cost,
{
    BestFirstBranchAndBound::new(matrix, parameters)
}
