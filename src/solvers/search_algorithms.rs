//! Search algorithms for the asymmetric traveling salesman problem.

mod best_first_branch_and_bound;
mod branch_and_bound;
mod depth_first_search;
mod greedy;
mod random_sampling;
mod search;
mod search_nodes;

pub use best_first_branch_and_bound::BestFirstBranchAndBound;
pub use branch_and_bound::BranchAndBound;
pub use depth_first_search::DepthFirstSearch;
pub use greedy::{nearest_neighbor_tour, Greedy};
pub use random_sampling::RandomSampling;
pub use search::{
    ExpansionResult, Search, SearchBase, SearchParameters, SearchStatus, SolutionRecord,
};
pub use search_nodes::{ChildResult, PrioritizedNode, PriorityWeights, TspNode};
