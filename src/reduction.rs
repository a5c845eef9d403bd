//! Row and column reduction of cost matrices.
//!
//! Subtracting the cheapest outgoing edge from every row and then the cheapest
//! incoming edge from every column leaves a matrix with a zero in each open
//! row and column. The subtracted total is a lower bound on the cost of every
//! tour that still has to leave each open row and enter each open column.

use crate::matrix::{Cost, CostMatrix};
use fixedbitset::FixedBitSet;

/// Reduces a copy of `matrix` and returns it with the total subtracted cost.
///
/// `path` is the partial tour the matrix belongs to. Rows of `path[..len - 1]`
/// already have their outgoing edge and columns of `path[1..]` already have
/// their incoming edge, so they are skipped.
///
/// An open row or column without any finite entry can no longer be left or
/// entered; the returned bound is then infinite.
///
/// Reducing the result again with the same path returns the same matrix and
/// a zero bound only when every open row and column has a finite entry. An
/// exhausted line is left as is, so the bound stays infinite on every pass.
///
/// # Examples
///
/// ```
/// use atsp::{reduction, CostMatrix};
///
/// let inf = f64::INFINITY;
/// let matrix = CostMatrix::new(vec![
///     vec![inf, 3.0, 5.0],
///     vec![4.0, inf, 6.0],
///     vec![2.0, 9.0, inf],
/// ])
/// .unwrap();
///
/// let (reduced, bound) = reduction::reduce(&matrix, &[]);
/// assert_eq!(bound, 11.0);
/// assert_eq!(reduced.row(0), &[inf, 0.0, 0.0]);
/// assert_eq!(reduced.row(1), &[0.0, inf, 0.0]);
/// assert_eq!(reduced.row(2), &[0.0, 7.0, inf]);
/// ```
pub fn reduce<C: Cost>(matrix: &CostMatrix<C>, path: &[usize]) -> (CostMatrix<C>, C) {
    let n = matrix.len();
    let mut reduced = matrix.clone();
    let mut bound = C::zero();

    let mut closed_rows = FixedBitSet::with_capacity(n);
    let mut closed_columns = FixedBitSet::with_capacity(n);

    if let Some((_, departed)) = path.split_last() {
        closed_rows.extend(departed.iter().copied());
    }

    if let Some((_, entered)) = path.split_first() {
        closed_columns.extend(entered.iter().copied());
    }

    for from in 0..n {
        if closed_rows.contains(from) {
            continue;
        }

        let min = row_min(&reduced, from);

        if !min.is_finite() {
            bound = C::infinity();
            continue;
        }

        bound = bound + min;

        for to in 0..n {
            let cost = reduced.get(from, to);

            if cost.is_finite() {
                reduced.set(from, to, cost - min);
            }
        }
    }

    for to in 0..n {
        if closed_columns.contains(to) {
            continue;
        }

        let min = column_min(&reduced, to);

        if !min.is_finite() {
            bound = C::infinity();
            continue;
        }

        bound = bound + min;

        for from in 0..n {
            let cost = reduced.get(from, to);

            if cost.is_finite() {
                reduced.set(from, to, cost - min);
            }
        }
    }

    (reduced, bound)
}

fn row_min<C: Cost>(matrix: &CostMatrix<C>, from: usize) -> C {
    matrix
        .row(from)
        .iter()
        .fold(C::infinity(), |min, &cost| min.min(cost))
}

fn column_min<C: Cost>(matrix: &CostMatrix<C>, to: usize) -> C {
    (0..matrix.len()).fold(C::infinity(), |min, from| min.min(matrix.get(from, to)))
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_reduce_root() {
        let (reduced, bound) = reduce(&matrix(), &[]);

        // Row minima 10 + 2 + 2 + 3 + 4, then column minima 1 and 3.
        assert_eq!(bound, 25.0);
        assert_eq!(reduced.row(0), &[INF, 10.0, 17.0, 0.0, 1.0]);
        assert_eq!(reduced.row(1), &[12.0, INF, 11.0, 2.0, 0.0]);
        assert_eq!(reduced.row(2), &[0.0, 3.0, INF, 0.0, 2.0]);
        assert_eq!(reduced.row(3), &[15.0, 3.0, 12.0, INF, 0.0]);
        assert_eq!(reduced.row(4), &[11.0, 0.0, 0.0, 12.0, INF]);
    }

    #[test]
    fn test_reduce_does_not_mutate_input() {
        let before = matrix();
        let copy = before.clone();
        let _ = reduce(&before, &[]);
        assert_eq!(before, copy);
    }

    #[test]
    fn test_reduce_is_idempotent() {
        let (reduced, _) = reduce(&matrix(), &[]);
        let (again, bound) = reduce(&reduced, &[]);
        assert_eq!(again, reduced);
        assert_eq!(bound, 0.0);
    }

    #[test]
    fn test_reduce_is_idempotent_with_path() {
        let (root, _) = reduce(&matrix(), &[]);
        let mut child = root.clone();
        child.forbid_row(0);
        child.forbid_column(3);
        child.set(3, 0, INF);

        let (reduced, bound) = reduce(&child, &[0, 3]);
        assert!(bound.is_finite());

        let (again, extra) = reduce(&reduced, &[0, 3]);
        assert_eq!(again, reduced);
        assert_eq!(extra, 0.0);
    }

    #[test]
    fn test_reduce_skips_closed_rows_and_columns() {
        let (root, _) = reduce(&matrix(), &[]);
        let mut child = root.clone();
        child.forbid_row(0);
        child.forbid_column(3);

        // Row 0 and column 3 are closed by the path [0, 3], so their emptiness is expected.
        let (reduced, bound) = reduce(&child, &[0, 3]);
        assert!(bound.is_finite());
        assert!(reduced.row(0).iter().all(|cost| cost.is_infinite()));
        assert!((0..5).all(|from| reduced.is_forbidden(from, 3)));
    }

    #[test]
    fn test_reduce_open_row_without_edges_is_infeasible() {
        let mut exhausted = matrix();
        exhausted.forbid_row(2);
        let (_, bound) = reduce(&exhausted, &[]);
        assert!(bound.is_infinite());
    }

    #[test]
    fn test_reduce_again_after_infinite_bound() {
        let mut exhausted = matrix();
        exhausted.forbid_row(2);
        let (reduced, _) = reduce(&exhausted, &[]);
        let (again, bound) = reduce(&reduced, &[]);
        assert_eq!(again, reduced);
        assert!(bound.is_infinite());
    }

    #[test]
    fn test_reduce_open_column_without_edges_is_infeasible() {
        let mut exhausted = matrix();
        exhausted.forbid_column(4);
        let (_, bound) = reduce(&exhausted, &[0]);
        assert!(bound.is_infinite());
    }

    #[test]
    fn test_reduce_empty_matrix() {
        let (reduced, bound) = reduce(&CostMatrix::<f64>::new(vec![]).unwrap(), &[]);
        assert!(reduced.is_empty());
        assert_eq!(bound, 0.0);
    }
}
