use crate::error::Error;
use crate::matrix::{Cost, CostMatrix};
use itertools::Itertools;
use std::str::FromStr;

fn parse_token<T: FromStr>(token: &str) -> Result<T, Error> {
    token.parse().map_err(|_| Error::Parse {
        token: token.to_string(),
    })
}

/// Reads exactly `n` whitespace-separated values.
///
/// # Errors
///
/// Returns [`Error::Parse`] for the first token that does not parse and
/// [`Error::MissingValues`] if the input ends early.
///
/// # Examples
///
/// ```
/// use atsp::io;
///
/// let mut tokens = "4 inf 2.5".split_whitespace();
/// let costs = io::read_vector::<f64>(&mut tokens, 3).unwrap();
/// assert_eq!(costs, vec![4.0, f64::INFINITY, 2.5]);
/// assert!(io::read_vector::<f64>(&mut tokens, 1).is_err());
/// ```
pub fn read_vector<'a, T>(
    input: &mut impl Iterator<Item = &'a str>,
    n: usize,
) -> Result<Vec<T>, Error>
where
    T: FromStr,
{
    let values = input
        .take(n)
        .map(parse_token)
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() < n {
        return Err(Error::MissingValues {
            expected: n,
            found: values.len(),
        });
    }

    Ok(values)
}

/// Reads `m` rows of `n` values each in row-major order.
///
/// # Errors
///
/// Same as [`read_vector`] for the `m * n` values.
pub fn read_matrix<'a, T>(
    input: &mut impl Iterator<Item = &'a str>,
    m: usize,
    n: usize,
) -> Result<Vec<Vec<T>>, Error>
where
    T: FromStr,
{
    let len = m.checked_mul(n).ok_or_else(|| Error::Parse {
        token: format!("{m} x {n}"),
    })?;

    if len == 0 {
        return Ok((0..m).map(|_| Vec::new()).collect());
    }

    let rows = read_vector(input, len)?
        .into_iter()
        .chunks(n)
        .into_iter()
        .map(|row| row.collect())
        .collect();

    Ok(rows)
}

/// Reads a cost matrix given as the number of cities `n` followed by `n * n` costs in row-major order.
///
/// Forbidden edges are written `inf`. Tokens after the last cost are ignored.
///
/// # Examples
///
/// ```
/// use atsp::io;
///
/// let string = "3\n inf 1 2\n 3 inf 4\n 5 6 inf";
///
/// let matrix = io::read_cost_matrix::<f64>(string).unwrap();
/// assert_eq!(matrix.len(), 3);
/// assert_eq!(matrix.get(1, 2), 4.0);
/// assert!(matrix.is_forbidden(2, 2));
/// ```
pub fn read_cost_matrix<C>(input: &str) -> Result<CostMatrix<C>, Error>
where
    C: Cost + FromStr,
{
    let mut tokens = input.split_whitespace();
    let n = read_vector::<usize>(&mut tokens, 1)?.pop().unwrap_or_default();
    let rows = read_matrix(&mut tokens, n, n)?;

    CostMatrix::new(rows)
}
