//! Bookkeeping of abandoned parts of the search tree.
//!
//! Solvers only write to a [`CutRecorder`]; the numbers it reports are
//! diagnostics attached to every [`SolutionRecord`](crate::solvers::SolutionRecord).

use rustc_hash::FxHashMap;

/// Sink for branches abandoned by a search.
pub trait CutRecorder {
    /// Records that every completion of `path` has been abandoned.
    fn report_cut(&mut self, path: &[usize]);

    /// Returns the number of complete tours abandoned so far.
    fn leaves_cut(&self) -> u128;

    /// Returns the abandoned fraction of all tours, in `[0, 1]`.
    fn coverage_fraction(&self) -> f64;
}

impl<R: CutRecorder + ?Sized> CutRecorder for &mut R {
    fn report_cut(&mut self, path: &[usize]) {
        (**self).report_cut(path);
    }

    fn leaves_cut(&self) -> u128 {
        (**self).leaves_cut()
    }

    fn coverage_fraction(&self) -> f64 {
        (**self).coverage_fraction()
    }
}

/// Prefix tree of abandoned paths.
///
/// Tours are cycles, so the tree is rooted at city 0 and has `(n - 1)!`
/// leaves. A path of length `k` starting at city 0 covers `(n - k)!` leaves.
/// Cuts below an earlier cut add nothing, and a cut above earlier cuts
/// replaces them, so no leaf is counted twice.
///
/// A node whose continuations are all cut collapses into a single cut node,
/// and complete tours are never stored. At most `node_limit` nodes are kept;
/// once the limit is reached, a cut that would need a new node is only added
/// to the counters of its deepest stored ancestor, capped by the size of that
/// subtree. Repeating such a cut may count its leaves again, so the numbers
/// become estimates.
///
/// # Examples
///
/// ```
/// use atsp::cut_tree::{CutRecorder, CutTree};
///
/// let mut tree = CutTree::new(4);
/// tree.report_cut(&[0, 1]);
/// assert_eq!(tree.leaves_cut(), 2);
/// tree.report_cut(&[0, 1, 2]);
/// assert_eq!(tree.leaves_cut(), 2);
/// tree.report_cut(&[3, 0, 2, 1]);
/// assert_eq!(tree.leaves_cut(), 3);
/// assert!((tree.coverage_fraction() - 0.5).abs() < 1e-12);
///
/// tree.report_cut(&[0, 2, 3, 1]);
/// tree.report_cut(&[0, 3]);
/// assert_eq!(tree.leaves_cut(), 6);
/// assert_eq!(tree.node_count(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct CutTree {
    root: CutNode,
    budget: NodeBudget,
}

/// Default maximum number of stored nodes of a [`CutTree`].
pub const DEFAULT_NODE_LIMIT: usize = 1 << 16;

#[derive(Clone, Copy, Debug)]
struct NodeBudget {
    n: usize,
    nodes: usize,
    limit: usize,
}

#[derive(Clone, Debug, Default)]
struct CutNode {
    is_cut: bool,
    cut_children: usize,
    leaves: u128,
    coverage: f64,
    children: FxHashMap<usize, CutNode>,
}

impl CutNode {
    fn cut(&mut self, rest: &[usize], depth: usize, budget: &mut NodeBudget) -> (u128, f64) {
        if self.is_cut {
            return (0, 0.0);
        }

        let (city, rest) = match rest.split_first() {
            // One city short of a tour, the only continuation is the tour itself.
            Some(_) if depth + 1 >= budget.n => return self.cut_all(depth, budget),
            Some((&city, rest)) => (city, rest),
            None => return self.cut_all(depth, budget),
        };

        if budget.nodes >= budget.limit && !self.children.contains_key(&city) {
            return self.count_unstored(depth + 1 + rest.len(), depth, budget);
        }

        let child = self.children.entry(city).or_insert_with(|| {
            budget.nodes += 1;
            CutNode::default()
        });
        let was_cut = child.is_cut;
        let (mut leaves, mut coverage) = child.cut(rest, depth + 1, budget);
        let child_is_cut = child.is_cut;

        self.leaves = self.leaves.saturating_add(leaves);
        self.coverage += coverage;

        if !was_cut && child_is_cut {
            self.cut_children += 1;

            if self.cut_children >= budget.n - depth {
                let (more_leaves, more_coverage) = self.cut_all(depth, budget);
                leaves = leaves.saturating_add(more_leaves);
                coverage += more_coverage;
            }
        }

        (leaves, coverage)
    }

    fn cut_all(&mut self, depth: usize, budget: &mut NodeBudget) -> (u128, f64) {
        let leaves = subtree_leaves(budget.n, depth);
        let coverage = subtree_coverage(budget.n, depth);
        let added = (
            leaves.saturating_sub(self.leaves),
            (coverage - self.coverage).max(0.0),
        );
        self.is_cut = true;
        self.leaves = leaves;
        self.coverage = coverage;
        budget.nodes = budget.nodes.saturating_sub(self.descendants());
        self.children.clear();

        added
    }

    fn count_unstored(
        &mut self,
        cut_depth: usize,
        depth: usize,
        budget: &mut NodeBudget,
    ) -> (u128, f64) {
        let total = subtree_leaves(budget.n, depth);
        let leaves = subtree_leaves(budget.n, cut_depth).min(total.saturating_sub(self.leaves));
        let coverage = subtree_coverage(budget.n, cut_depth)
            .min((subtree_coverage(budget.n, depth) - self.coverage).max(0.0));
        self.leaves = self.leaves.saturating_add(leaves);
        self.coverage += coverage;

        if total < u128::MAX && self.leaves >= total {
            let (more_leaves, more_coverage) = self.cut_all(depth, budget);

            return (leaves.saturating_add(more_leaves), coverage + more_coverage);
        }

        (leaves, coverage)
    }

    fn descendants(&self) -> usize {
        self.children
            .values()
            .map(|child| 1 + child.descendants())
            .sum()
    }
}

/// Returns `(n - depth)!`, saturating at `u128::MAX`.
fn subtree_leaves(n: usize, depth: usize) -> u128 {
    (2..=n.saturating_sub(depth) as u128).fold(1u128, |product, k| product.saturating_mul(k))
}

/// Returns `(n - depth)! / (n - 1)!` without computing factorials.
fn subtree_coverage(n: usize, depth: usize) -> f64 {
    (n.saturating_sub(depth) + 1..n).fold(1.0, |fraction, k| fraction / k as f64)
}

impl CutTree {
    /// Creates an empty tree for `n` cities storing at most [`DEFAULT_NODE_LIMIT`] nodes.
    pub fn new(n: usize) -> Self {
        Self::with_node_limit(n, DEFAULT_NODE_LIMIT)
    }

    /// Creates an empty tree for `n` cities storing at most `limit` nodes besides the root.
    pub fn with_node_limit(n: usize, limit: usize) -> Self {
        Self {
            root: CutNode::default(),
            budget: NodeBudget { n, nodes: 0, limit },
        }
    }

    /// Returns the number of cities.
    pub fn len(&self) -> usize {
        self.budget.n
    }

    /// Returns whether the tree is for an empty instance.
    pub fn is_empty(&self) -> bool {
        self.budget.n == 0
    }

    /// Returns the number of stored nodes besides the root.
    pub fn node_count(&self) -> usize {
        self.budget.nodes
    }

    fn cut_from_root(&mut self, path: &[usize]) {
        if let Some((&0, rest)) = path.split_first() {
            self.root.cut(rest, 1, &mut self.budget);
        }
    }
}

impl CutRecorder for CutTree {
    fn report_cut(&mut self, path: &[usize]) {
        if path.is_empty() || path.len() > self.budget.n {
            return;
        }

        if path.len() == self.budget.n {
            if let Some(offset) = path.iter().position(|&city| city == 0) {
                let mut rotated = Vec::with_capacity(path.len());
                rotated.extend_from_slice(&path[offset..]);
                rotated.extend_from_slice(&path[..offset]);
                self.cut_from_root(&rotated);
            }
        } else {
            self.cut_from_root(path);
        }
    }

    fn leaves_cut(&self) -> u128 {
        self.root.leaves
    }

    fn coverage_fraction(&self) -> f64 {
        self.root.coverage.clamp(0.0, 1.0)
    }
}
