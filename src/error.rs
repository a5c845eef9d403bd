use thiserror::Error;

/// Errors raised for inputs that violate the solver's preconditions.
///
/// An instance without any Hamiltonian cycle is not an error: solvers report
/// it through an empty result and [`SearchStatus::is_infeasible`](crate::solvers::SearchStatus).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A row does not have as many entries as the matrix has rows.
    #[error("row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },
    /// A cost is negative.
    #[error("cost from {from} to {to} is negative")]
    NegativeCost { from: usize, to: usize },
    /// A cost is NaN.
    #[error("cost from {from} to {to} is not a number")]
    NotANumber { from: usize, to: usize },
    /// A token could not be parsed.
    #[error("cannot parse `{token}`")]
    Parse { token: String },
    /// The input ended early.
    #[error("expected {expected} values, found {found}")]
    MissingValues { expected: usize, found: usize },
    /// No search algorithm has the given name.
    #[error("unknown algorithm `{name}`")]
    UnknownAlgorithm { name: String },
    /// Priority weights are not finite and positive.
    #[error("priority weights must be finite and positive, got bound {bound} and depth {depth}")]
    InvalidWeights { bound: String, depth: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let error = Error::NotSquare {
            row: 2,
            len: 3,
            expected: 4,
        };
        assert_eq!(error.to_string(), "row 2 has 3 entries, expected 4");

        let error = Error::NegativeCost { from: 0, to: 1 };
        assert_eq!(error.to_string(), "cost from 0 to 1 is negative");

        let error = Error::Parse {
            token: String::from("x"),
        };
        assert_eq!(error.to_string(), "cannot parse `x`");

        let error = Error::MissingValues {
            expected: 9,
            found: 4,
        };
        assert_eq!(error.to_string(), "expected 9 values, found 4");

        let error = Error::UnknownAlgorithm {
            name: String::from("astar"),
        };
        assert_eq!(error.to_string(), "unknown algorithm `astar`");

        let error = Error::InvalidWeights {
            bound: String::from("1"),
            depth: String::from("0"),
        };
        assert_eq!(
            error.to_string(),
            "priority weights must be finite and positive, got bound 1 and depth 0"
        );
    }
}
