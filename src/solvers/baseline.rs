use crate::matrix::{Cost, CostMatrix};
use crate::solvers::search_algorithms::{DepthFirstSearch, Greedy, RandomSampling};
use crate::solvers::{Search, SearchParameters};

/// Creates a random sampling solver.
///
/// Random permutations are drawn until the time or expansion limit is reached,
/// so at least one of them should be set. The generator is seeded with
/// `parameters.seed` if given.
///
/// # Examples
///
/// ```
/// use atsp::prelude::*;
/// use atsp::solvers;
///
/// let matrix = CostMatrix::new(vec![
///     vec![0.0, 1.0, 2.0],
///     vec![2.0, 0.0, 1.0],
///     vec![1.0, 2.0, 0.0],
/// ])
/// .unwrap();
/// let parameters = SearchParameters {
///     quiet: true,
///     seed: Some(0),
///     expansion_limit: Some(100),
///     ..Default::default()
/// };
/// let mut solver = solvers::create_random(matrix, parameters);
/// let records = solver.search();
/// assert_eq!(records.last().map(|record| record.cost), Some(3.0));
/// assert!(solver.get_status().is_expansion_limit_reached);
/// ```
pub fn create_random<C>(
    matrix: CostMatrix<C>,
    parameters: SearchParameters,
) -> impl Search<CostType = C>
where
    C: Cost,
{
    RandomSampling::new(matrix, parameters)
}

/// Creates a greedy nearest-neighbor solver.
///
/// The first tour completed from start cities `0, 1, ...` is the only result.
///
/// # Examples
///
/// ```
/// use atsp::prelude::*;
/// use atsp::solvers;
///
/// let matrix = CostMatrix::new(vec![
///     vec![0.0, 1.0, 2.0],
///     vec![2.0, 0.0, 1.0],
///     vec![1.0, 2.0, 0.0],
/// ])
/// .unwrap();
/// let parameters = SearchParameters {
///     quiet: true,
///     ..Default::default()
/// };
/// let mut solver = solvers::create_greedy(matrix, parameters);
/// let records = solver.search();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].tour, vec![0, 1, 2]);
/// assert_eq!(records[0].cost, 3.0);
/// ```
pub fn create_greedy<C>(
    matrix: CostMatrix<C>,
    parameters: SearchParameters,
) -> impl Search<CostType = C>
where
    C: Cost,
{
    Greedy::new(matrix, parameters)
}

/// Creates an exhaustive depth-first search solver.
///
/// Every tour is enumerated unless the time or expansion limit is reached first.
///
/// # Examples
///
/// ```
/// use atsp::prelude::*;
/// use atsp::solvers;
///
/// let matrix = CostMatrix::new(vec![
///     vec![0.0, 5.0, 1.0],
///     vec![1.0, 0.0, 5.0],
///     vec![5.0, 1.0, 0.0],
/// ])
/// .unwrap();
/// let parameters = SearchParameters {
///     quiet: true,
///     ..Default::default()
/// };
/// let mut solver = solvers::create_dfs(matrix, parameters);
/// let records = solver.search();
/// let costs: Vec<_> = records.iter().map(|record| record.cost).collect();
/// assert_eq!(costs, vec![15.0, 3.0]);
/// assert_eq!(records[1].tour, vec![0, 2, 1]);
/// assert!(solver.get_status().is_optimal);
/// ```
pub fn create_dfs<C>(
    matrix: CostMatrix<C>,
    parameters: SearchParameters,
) -> impl Search<CostType = C>
where
    C: Cost,
{
    DepthFirstSearch::new(matrix, parameters)
}
