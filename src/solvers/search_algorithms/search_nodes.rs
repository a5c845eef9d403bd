//! Search nodes for branch-and-bound.

mod prioritized_node;
mod tsp_node;

pub use prioritized_node::{PrioritizedNode, PriorityWeights};
pub use tsp_node::{ChildResult, TspNode};
