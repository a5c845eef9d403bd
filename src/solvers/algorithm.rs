use super::{baseline, bnb};
use crate::error::Error;
use crate::matrix::{Cost, CostMatrix};
use crate::solvers::{Search, SearchParameters};
use std::fmt;
use std::str::FromStr;

/// Search algorithms that can be selected by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Uniform random sampling of tours.
    Random,
    /// Greedy nearest-neighbor construction.
    Greedy,
    /// Exhaustive depth-first search.
    DepthFirstSearch,
    /// Depth-first branch-and-bound.
    BranchAndBound,
    /// Best-first branch-and-bound.
    BestFirstBranchAndBound,
}

impl Algorithm {
    /// All algorithms, from the simplest to the most elaborate.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Random,
        Algorithm::Greedy,
        Algorithm::DepthFirstSearch,
        Algorithm::BranchAndBound,
        Algorithm::BestFirstBranchAndBound,
    ];

    /// Returns whether the algorithm can prove optimality by exhausting the search space.
    pub fn is_complete(self) -> bool {
        matches!(
            self,
            Algorithm::DepthFirstSearch
                | Algorithm::BranchAndBound
                | Algorithm::BestFirstBranchAndBound
        )
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Random => "random",
            Algorithm::Greedy => "greedy",
            Algorithm::DepthFirstSearch => "dfs",
            Algorithm::BranchAndBound => "bnb",
            Algorithm::BestFirstBranchAndBound => "best-first-bnb",
        };

        f.write_str(name)
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Algorithm::Random),
            "greedy" => Ok(Algorithm::Greedy),
            "dfs" => Ok(Algorithm::DepthFirstSearch),
            "bnb" => Ok(Algorithm::BranchAndBound),
            "best-first-bnb" | "smart" => Ok(Algorithm::BestFirstBranchAndBound),
            _ => Err(Error::UnknownAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

/// Creates a solver running the given algorithm.
///
/// # Examples
///
/// ```
/// use atsp::prelude::*;
/// use atsp::solvers::{self, Algorithm};
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
/// let algorithm: Algorithm = "smart".parse().unwrap();
/// let mut solver = solvers::create_solver(algorithm, matrix, parameters);
/// let records = solver.search();
/// assert_eq!(records.last().map(|record| record.cost), Some(3.0));
/// ```
pub fn create_solver<C>(
    algorithm: Algorithm,
    matrix: CostMatrix<C>,
    parameters: SearchParameters,
) -> Box<dyn Search<CostType = C>>
where
    C: Cost + 'static,
{
    match algorithm {
        Algorithm::Random => Box::new(baseline::create_random(matrix, parameters)),
        Algorithm::Greedy => Box::new(baseline::create_greedy(matrix, parameters)),
        Algorithm::DepthFirstSearch => Box::new(baseline::create_dfs(matrix, parameters)),
        Algorithm::BranchAndBound => Box::new(bnb::create_branch_and_bound(matrix, parameters)),
        Algorithm::BestFirstBranchAndBound => {
            Box::new(bnb::create_best_first_branch_and_bound(matrix, parameters))
        }
    }
}
