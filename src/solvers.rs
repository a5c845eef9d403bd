mod algorithm;
mod baseline;
mod bnb;
pub mod search_algorithms;

pub use algorithm::{create_solver, Algorithm};
pub use baseline::{create_dfs, create_greedy, create_random};
pub use bnb::{create_best_first_branch_and_bound, create_branch_and_bound};
pub use search_algorithms::{Search, SearchParameters, SearchStatus, SolutionRecord};
