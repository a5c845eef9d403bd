//! Anytime solvers for the asymmetric traveling salesman problem.
//!
//! A problem is a [`CostMatrix`] of directed edge costs in which forbidden
//! edges are infinite. Every solver implements [`Search`](solvers::Search)
//! and reports each improving tour as soon as it is found, so a caller can
//! stop at any time and keep the best tour so far.
//!
//! # Examples
//!
//! ```
//! use atsp::prelude::*;
//! use atsp::solvers;
//!
//! let inf = f64::INFINITY;
//! let matrix = CostMatrix::new(vec![
//!     vec![inf, 3.0, 1.0, 5.0],
//!     vec![1.0, inf, 4.0, 2.0],
//!     vec![6.0, 1.0, inf, 3.0],
//!     vec![2.0, 7.0, 5.0, inf],
//! ])
//! .unwrap();
//! let parameters = SearchParameters {
//!     quiet: true,
//!     time_limit: Some(10.0),
//!     ..Default::default()
//! };
//! let mut solver = solvers::create_best_first_branch_and_bound(matrix.clone(), parameters);
//! let records = solver.search();
//! let best = records.last().unwrap();
//! assert_eq!(best.cost, 6.0);
//! assert_eq!(matrix.score_tour(&best.tour), 6.0);
//! assert!(solver.get_status().is_optimal);
//! ```

pub mod cut_tree;
mod error;
pub mod io;
mod matrix;
pub mod reduction;
pub mod solvers;
pub mod timer;

pub use error::Error;
pub use matrix::{Cost, CostMatrix};
pub use solvers::{SearchStatus, SolutionRecord};

pub mod prelude {
    pub use super::solvers::{Algorithm, Search, SearchParameters};
    pub use super::{Cost, CostMatrix, Error, SearchStatus, SolutionRecord};
}
