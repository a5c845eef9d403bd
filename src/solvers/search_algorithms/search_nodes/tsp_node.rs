use crate::matrix::{Cost, CostMatrix};
use crate::reduction;
use fixedbitset::FixedBitSet;

/// Partial tour with its reduced cost matrix and lower bound.
///
/// Every node owns its reduced matrix, so siblings never share mutable state.
/// A node is not modified once it is created; children are new nodes.
#[derive(Clone, Debug)]
pub struct TspNode<C> {
    path: Vec<usize>,
    visited: FixedBitSet,
    reduced_matrix: CostMatrix<C>,
    lower_bound: C,
    remaining: usize,
}

/// Result of branching on a city.
#[derive(Clone, Debug)]
pub enum ChildResult<C> {
    /// Child node with a bound below the incumbent.
    Generated(TspNode<C>),
    /// No tour extends the child path.
    Infeasible,
    /// The child bound is not better than the incumbent.
    PrunedByBound,
}

impl<C: Cost> TspNode<C> {
    /// Creates the root node of a tour starting at `start`.
    ///
    /// Returns `None` if `start` is not a city or if the reduction of the
    /// whole matrix proves that no tour exists.
    pub fn create_root(matrix: &CostMatrix<C>, start: usize) -> Option<Self> {
        let n = matrix.len();

        if start >= n {
            return None;
        }

        let (reduced_matrix, lower_bound) = reduction::reduce(matrix, &[]);

        if !lower_bound.is_finite() {
            return None;
        }

        let mut visited = FixedBitSet::with_capacity(n);
        visited.insert(start);

        Some(Self {
            path: vec![start],
            visited,
            reduced_matrix,
            lower_bound,
            remaining: n - 1,
        })
    }

    /// Returns the visited cities in order.
    #[inline]
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Returns the number of visited cities.
    #[inline]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Returns the number of cities still to visit.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Returns the lower bound on every tour extending the path.
    #[inline]
    pub fn lower_bound(&self) -> C {
        self.lower_bound
    }

    /// Returns the reduced matrix of the node.
    #[inline]
    pub fn reduced_matrix(&self) -> &CostMatrix<C> {
        &self.reduced_matrix
    }

    /// Returns whether the path visits every city.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    fn start(&self) -> usize {
        self.path[0]
    }

    fn last(&self) -> usize {
        self.path[self.path.len() - 1]
    }

    /// Returns the unvisited cities reachable from the last city.
    pub fn children(&self) -> impl Iterator<Item = usize> + '_ {
        let last = self.last();

        (0..self.reduced_matrix.len()).filter(move |&city| {
            !self.visited.contains(city) && !self.reduced_matrix.is_forbidden(last, city)
        })
    }

    /// Branches on travelling from the last city to `city`.
    ///
    /// The child is pruned if its bound is not below `incumbent`.
    pub fn create_child(&self, city: usize, incumbent: Option<C>) -> ChildResult<C> {
        let last = self.last();
        let mut matrix = self.reduced_matrix.clone();
        matrix.forbid_row(last);
        matrix.forbid_column(city);

        // The last city may only return to the start.
        if self.remaining == 1 {
            let start = self.start();
            let closing = matrix.get(city, start);
            matrix.forbid_row(city);
            matrix.set(city, start, closing);
        }

        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(city);

        let (reduced_matrix, extra) = reduction::reduce(&matrix, &path);

        if !extra.is_finite() {
            return ChildResult::Infeasible;
        }

        let lower_bound = self.lower_bound + self.reduced_matrix.get(last, city) + extra;

        if incumbent.is_some_and(|incumbent| lower_bound >= incumbent) {
            return ChildResult::PrunedByBound;
        }

        let mut visited = self.visited.clone();
        visited.insert(city);

        ChildResult::Generated(Self {
            path,
            visited,
            reduced_matrix,
            lower_bound,
            remaining: self.remaining - 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    const INF: f64 = f64::INFINITY;

    fn matrix() -> CostMatrix<f64> {
        CostMatrix::new(vec![
            vec![INF, 20.0, 30.0, 10.0, 11.0],
            vec![15.0, INF, 16.0, 4.0, 2.0],
            vec![3.0, 5.0, INF, 2.0, 4.0],
            vec![19.0, 6.0, 18.0, INF, 3.0],
            vec![16.0, 4.0, 7.0, 16.0, INF],
        ])
        .unwrap()
    }

    fn generated(result: ChildResult<f64>) -> TspNode<f64> {
        match result {
            ChildResult::Generated(node) => node,
            result => panic!("unexpected result {result:?}"),
        }
    }

    /// Cheapest closed tour extending `path`, by enumeration.
    fn best_completion(matrix: &CostMatrix<f64>, path: &[usize]) -> f64 {
        let rest: Vec<_> = (0..matrix.len()).filter(|city| !path.contains(city)).collect();
        let k = rest.len();

        rest.into_iter()
            .permutations(k)
            .map(|suffix| {
                let tour: Vec<_> = path.iter().copied().chain(suffix).collect();
                matrix.score_tour(&tour)
            })
            .fold(INF, f64::min)
    }

    fn check_bounds(matrix: &CostMatrix<f64>, node: &TspNode<f64>) -> usize {
        assert!(
            node.lower_bound() <= best_completion(matrix, node.path()) + 1e-9,
            "bound {} of {:?} exceeds the best completion",
            node.lower_bound(),
            node.path()
        );
        assert_eq!(node.remaining(), matrix.len() - node.depth());

        let mut count = 1;

        for city in node.children().collect::<Vec<_>>() {
            match node.create_child(city, None) {
                ChildResult::Generated(child) => count += check_bounds(matrix, &child),
                ChildResult::Infeasible => {
                    let mut path = node.path().to_vec();
                    path.push(city);
                    assert!(best_completion(matrix, &path).is_infinite());
                }
                ChildResult::PrunedByBound => panic!("nothing is pruned without an incumbent"),
            }
        }

        count
    }

    #[test]
    fn test_create_root() {
        let root = TspNode::create_root(&matrix(), 0).unwrap();
        assert_eq!(root.path(), &[0]);
        assert_eq!(root.depth(), 1);
        assert_eq!(root.remaining(), 4);
        assert_eq!(root.lower_bound(), 25.0);
        assert!(!root.is_complete());
        assert_eq!(root.children().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_create_root_out_of_range() {
        assert!(TspNode::create_root(&matrix(), 5).is_none());
        assert!(TspNode::create_root(&CostMatrix::<f64>::forbidden(0), 0).is_none());
    }

    #[test]
    fn test_create_root_infeasible() {
        let mut matrix = matrix();
        matrix.forbid_row(3);
        assert!(TspNode::create_root(&matrix, 0).is_none());
    }

    #[test]
    fn test_create_child() {
        let root = TspNode::create_root(&matrix(), 0).unwrap();
        let child = generated(root.create_child(3, None));

        assert_eq!(child.path(), &[0, 3]);
        assert_eq!(child.remaining(), 3);
        assert_eq!(child.lower_bound(), 25.0);
        assert!(child.reduced_matrix().row(0).iter().all(|cost| cost.is_infinite()));
        assert!((0..5).all(|from| child.reduced_matrix().is_forbidden(from, 3)));
        assert_eq!(child.children().collect::<Vec<_>>(), vec![1, 2, 4]);

        // The parent is left untouched.
        assert_eq!(root.reduced_matrix().get(0, 3), 0.0);
    }

    #[test]
    fn test_create_child_adds_reduction() {
        let root = TspNode::create_root(&matrix(), 0).unwrap();
        let child = generated(root.create_child(2, None));

        // Reduced cost of the edge, every open row and column keeps a zero.
        assert_eq!(child.path(), &[0, 2]);
        assert_eq!(child.lower_bound(), 25.0 + 17.0);
        assert!(child.lower_bound() <= best_completion(&matrix(), &[0, 2]));
    }

    #[test]
    fn test_create_child_pruned_by_bound() {
        let root = TspNode::create_root(&matrix(), 0).unwrap();
        assert!(matches!(
            root.create_child(3, Some(25.0)),
            ChildResult::PrunedByBound
        ));
        assert!(matches!(
            root.create_child(3, Some(25.5)),
            ChildResult::Generated(_)
        ));
    }

    #[test]
    fn test_create_child_infeasible() {
        let mut matrix = matrix();
        // City 4 can only be entered from city 2.
        for from in [0, 1, 3] {
            matrix.set(from, 4, INF);
        }
        let root = TspNode::create_root(&matrix, 0).unwrap();
        let child = generated(root.create_child(2, None));

        // Leaving city 2 for city 1 leaves no way into city 4.
        assert!(matches!(child.create_child(1, None), ChildResult::Infeasible));
    }

    #[test]
    fn test_last_city_must_return_to_start() {
        let mut node = TspNode::create_root(&matrix(), 0).unwrap();

        for city in [3, 1, 4] {
            node = generated(node.create_child(city, None));
        }

        assert_eq!(node.remaining(), 1);
        let leaf = generated(node.create_child(2, None));
        assert!(leaf.is_complete());
        assert_eq!(leaf.children().count(), 0);
        assert_eq!(leaf.lower_bound(), matrix().score_tour(&[0, 3, 1, 4, 2]));
    }

    #[test]
    fn test_city_without_exit_is_infeasible() {
        let mut matrix = matrix();
        matrix.set(2, 0, INF);
        let mut node = TspNode::create_root(&matrix, 0).unwrap();

        for city in [3, 1] {
            node = generated(node.create_child(city, None));
        }

        // City 2 could then only leave towards visited cities.
        assert!(matches!(node.create_child(4, None), ChildResult::Infeasible));
    }

    #[test]
    fn test_bounds_never_exceed_best_completion() {
        let matrix = matrix();
        let root = TspNode::create_root(&matrix, 0).unwrap();
        let count = check_bounds(&matrix, &root);
        assert!(count > 1);
    }

    #[test]
    fn test_bounds_never_exceed_best_completion_sparse() {
        let mut matrix = matrix();
        matrix.set(0, 3, INF);
        matrix.set(1, 4, INF);
        matrix.set(4, 1, INF);
        matrix.set(2, 0, INF);
        let root = TspNode::create_root(&matrix, 0).unwrap();
        check_bounds(&matrix, &root);
    }

    #[test]
    fn test_leaf_bound_is_tour_cost() {
        let matrix = matrix();

        for tour in (1..5).permutations(4) {
            let mut node = TspNode::create_root(&matrix, 0).unwrap();

            for &city in &tour {
                node = generated(node.create_child(city, None));
            }

            let mut path = vec![0];
            path.extend(tour);
            assert_eq!(node.path(), path.as_slice());
            assert!((node.lower_bound() - matrix.score_tour(&path)).abs() < 1e-9);
        }
    }
}
