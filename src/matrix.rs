use crate::error::Error;
use fixedbitset::FixedBitSet;
use num_traits::Float;
use std::fmt::{Debug, Display};
use std::ops::Index;

/// Trait for edge cost types.
///
/// Forbidden edges are represented by `Float::infinity()`, which absorbs
/// addition and compares worse than every finite cost.
pub trait Cost: Float + Debug + Display {}

impl<T> Cost for T where T: Float + Debug + Display {}

/// Dense matrix of directed edge costs.
///
/// The entry at `(from, to)` is the cost of travelling from city `from` to
/// city `to`. The matrix may be asymmetric and may contain forbidden edges.
///
/// # Examples
///
/// ```
/// use atsp::CostMatrix;
///
/// let inf = f64::INFINITY;
/// let matrix = CostMatrix::new(vec![
///     vec![inf, 1.0, 4.0],
///     vec![2.0, inf, 1.0],
///     vec![1.0, 5.0, inf],
/// ])
/// .unwrap();
///
/// assert_eq!(matrix.len(), 3);
/// assert_eq!(matrix[(0, 1)], 1.0);
/// assert_eq!(matrix.score_tour(&[0, 1, 2]), 3.0);
/// assert!(matrix.score_tour(&[0, 0, 2]).is_infinite());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CostMatrix<C> {
    n: usize,
    costs: Vec<C>,
}

impl<C: Cost> CostMatrix<C> {
    /// Creates a cost matrix from rows.
    ///
    /// Fails if the rows do not form a square matrix or a cost is negative or NaN.
    pub fn new(rows: Vec<Vec<C>>) -> Result<Self, Error> {
        let n = rows.len();
        let mut costs = Vec::with_capacity(n * n);

        for (from, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(Error::NotSquare {
                    row: from,
                    len: row.len(),
                    expected: n,
                });
            }

            for (to, cost) in row.into_iter().enumerate() {
                if cost.is_nan() {
                    return Err(Error::NotANumber { from, to });
                }

                if cost < C::zero() {
                    return Err(Error::NegativeCost { from, to });
                }

                costs.push(cost);
            }
        }

        Ok(Self { n, costs })
    }

    /// Creates an `n` x `n` matrix where every edge is forbidden.
    pub fn forbidden(n: usize) -> Self {
        Self {
            n,
            costs: vec![C::infinity(); n * n],
        }
    }

    /// Returns the number of cities.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Returns whether the matrix has no city.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Returns the cost of the edge from `from` to `to`.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> C {
        self.costs[from * self.n + to]
    }

    /// Overwrites the cost of the edge from `from` to `to`.
    #[inline]
    pub fn set(&mut self, from: usize, to: usize, cost: C) {
        self.costs[from * self.n + to] = cost;
    }

    /// Returns whether the edge from `from` to `to` is forbidden.
    #[inline]
    pub fn is_forbidden(&self, from: usize, to: usize) -> bool {
        !self.get(from, to).is_finite()
    }

    /// Returns the outgoing costs of a city.
    #[inline]
    pub fn row(&self, from: usize) -> &[C] {
        &self.costs[from * self.n..(from + 1) * self.n]
    }

    /// Forbids every edge leaving `from`.
    pub fn forbid_row(&mut self, from: usize) {
        let n = self.n;
        self.costs[from * n..(from + 1) * n].fill(C::infinity());
    }

    /// Forbids every edge entering `to`.
    pub fn forbid_column(&mut self, to: usize) {
        for from in 0..self.n {
            self.set(from, to, C::infinity());
        }
    }

    /// Forbids every self-loop.
    pub fn forbid_diagonal(&mut self) {
        for city in 0..self.n {
            self.set(city, city, C::infinity());
        }
    }

    /// Returns the cost of the closed cycle visiting `tour` in order.
    ///
    /// The cost is infinite if any edge, including the one closing the cycle, is forbidden,
    /// or if the tour is empty.
    pub fn score_tour(&self, tour: &[usize]) -> C {
        let (Some(&first), Some(&last)) = (tour.first(), tour.last()) else {
            return C::infinity();
        };

        tour.windows(2)
            .fold(self.get(last, first), |cost, edge| cost + self.get(edge[0], edge[1]))
    }

    /// Returns whether `tour` is a permutation of all cities with a finite cost.
    pub fn is_valid_tour(&self, tour: &[usize]) -> bool {
        if tour.len() != self.n {
            return false;
        }

        let mut seen = FixedBitSet::with_capacity(self.n);

        for &city in tour {
            if city >= self.n || seen.put(city) {
                return false;
            }
        }

        self.score_tour(tour).is_finite()
    }
}

impl<C: Cost> Index<(usize, usize)> for CostMatrix<C> {
    type Output = C;

    #[inline]
    fn index(&self, (from, to): (usize, usize)) -> &C {
        &self.costs[from * self.n + to]
    }
}
