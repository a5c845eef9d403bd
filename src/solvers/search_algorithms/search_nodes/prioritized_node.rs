use super::TspNode;
use crate::matrix::Cost;
use std::cmp::Ordering;

/// Weights of the best-first priority.
///
/// The priority of a node is `bound * weights.bound - depth * weights.depth`,
/// so that among nodes of equal bound the deeper one is expanded first.
/// This holds only for finite positive weights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriorityWeights<C> {
    /// Weight of the lower bound.
    pub bound: C,
    /// Weight of the number of visited cities.
    pub depth: C,
}

impl<C: Cost> Default for PriorityWeights<C> {
    fn default() -> Self {
        Self {
            bound: num_traits::cast(10_000).unwrap_or_else(C::one),
            depth: num_traits::cast(500).unwrap_or_else(C::one),
        }
    }
}

/// Frontier entry of the best-first search.
///
/// Entries are ordered by priority and then by insertion sequence, oldest
/// first, so that a `BinaryHeap` pops the best entry deterministically.
#[derive(Clone, Debug)]
pub struct PrioritizedNode<C> {
    priority: C,
    sequence: u64,
    node: TspNode<C>,
}

impl<C: Cost> PrioritizedNode<C> {
    /// Wraps a node with its priority.
    pub fn new(node: TspNode<C>, weights: &PriorityWeights<C>, sequence: u64) -> Self {
        Self {
            priority: Self::priority(&node, weights),
            sequence,
            node,
        }
    }

    /// Returns the priority of a node; lower is better.
    ///
    /// Nodes with an infinite bound get an infinite priority.
    pub fn priority(node: &TspNode<C>, weights: &PriorityWeights<C>) -> C {
        let bound = node.lower_bound();

        if !bound.is_finite() {
            return C::infinity();
        }

        let depth: C = num_traits::cast(node.depth()).unwrap_or_else(C::infinity);

        bound * weights.bound - depth * weights.depth
    }

    /// Returns the priority of the entry.
    pub fn get_priority(&self) -> C {
        self.priority
    }

    /// Returns the insertion sequence number of the entry.
    pub fn get_sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the wrapped node.
    pub fn into_node(self) -> TspNode<C> {
        self.node
    }
}

impl<C: Cost> PartialEq for PrioritizedNode<C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<C: Cost> Eq for PrioritizedNode<C> {}

impl<C: Cost> Ord for PrioritizedNode<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed, as `BinaryHeap` is a max-heap.
        other
            .priority
            .partial_cmp(&self.priority)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<C: Cost> PartialOrd for PrioritizedNode<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
