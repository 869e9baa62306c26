use ndarray::Array3;

use crate::error::{SolverError, SolverResult};

/// Fields per node in a sample table: x, y, density, x-velocity,
/// y-velocity, total energy density.
pub const NFIELDS: usize = 6;

/// The embedded 33 x 9 wind-tunnel sample grid.
const BUILTIN_TABLE: &str = include_str!("../../data/tunnel.dat");

/// Coarse sample table the fine computational grid is interpolated from.
///
/// `values[[k, i, j]]` holds field `k` of node `(i, j)`.
#[derive(Debug)]
pub struct CoarseTable {
    pub imaxin: usize,
    pub jmaxin: usize,
    pub values: Array3<f64>,
}

impl CoarseTable {
    /// Parse a whitespace-delimited sample table: two integer grid
    /// dimensions followed by `imaxin * jmaxin * NFIELDS` floats in
    /// row-major `(x, y, rho, u, v, e)` order per node. Any malformed,
    /// missing or excess token is a fatal configuration error.
    pub fn parse(input: &str) -> SolverResult<Self> {
        let mut tokens = input.split_whitespace();

        let imaxin = next_dimension(&mut tokens, "imaxin")?;
        let jmaxin = next_dimension(&mut tokens, "jmaxin")?;

        let mut values = Array3::zeros((NFIELDS, imaxin, jmaxin));
        let mut position = 2usize;
        for i in 0..imaxin {
            for j in 0..jmaxin {
                for k in 0..NFIELDS {
                    let token = tokens.next().ok_or_else(|| {
                        SolverError::config(format!(
                            "sample table truncated: expected {} values, got {}",
                            imaxin * jmaxin * NFIELDS,
                            position - 2
                        ))
                    })?;
                    values[[k, i, j]] = token.parse::<f64>().map_err(|_| {
                        SolverError::config(format!(
                            "sample table token {position} is not a number: {token:?}"
                        ))
                    })?;
                    position += 1;
                }
            }
        }
        if tokens.next().is_some() {
            return Err(SolverError::config(format!(
                "sample table has trailing data after {} values",
                imaxin * jmaxin * NFIELDS
            )));
        }

        Ok(CoarseTable {
            imaxin,
            jmaxin,
            values,
        })
    }

    /// The embedded wind-tunnel table.
    pub fn builtin() -> SolverResult<Self> {
        CoarseTable::parse(BUILTIN_TABLE)
    }
}

fn next_dimension<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    name: &str,
) -> SolverResult<usize> {
    let token = tokens
        .next()
        .ok_or_else(|| SolverError::config(format!("sample table is missing dimension {name}")))?;
    let dim = token.parse::<usize>().map_err(|_| {
        SolverError::config(format!("sample table dimension {name} is not an integer: {token:?}"))
    })?;
    if dim < 2 {
        return Err(SolverError::config(format!(
            "sample table dimension {name} = {dim} is too small; need at least 2 nodes per direction"
        )));
    }
    Ok(dim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_parses() {
        let table = CoarseTable::builtin().unwrap();
        assert_eq!(table.imaxin, 33);
        assert_eq!(table.jmaxin, 9);
        // first node of the embedded grid
        assert_eq!(table.values[[0, 0, 0]], -1.0);
        assert_eq!(table.values[[1, 0, 0]], 0.0);
        assert_eq!(table.values[[2, 0, 0]], 1.016332532749243);
        // last node
        assert_eq!(table.values[[0, 32, 8]], 2.0);
        assert_eq!(table.values[[1, 32, 8]], 1.0);
    }

    #[test]
    fn truncated_table_is_rejected() {
        let err = CoarseTable::parse("2 2 1.0 2.0 3.0").unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn non_numeric_token_is_rejected() {
        let input = "2 2 ".to_string() + &"1.0 ".repeat(12) + "oops "
            + &"1.0 ".repeat(11);
        let err = CoarseTable::parse(&input).unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn trailing_data_is_rejected() {
        let input = "2 2 ".to_string() + &"1.0 ".repeat(25);
        let err = CoarseTable::parse(&input).unwrap_err();
        assert!(err.to_string().contains("trailing"));
    }

    #[test]
    fn bad_dimensions_are_rejected() {
        assert!(CoarseTable::parse("").is_err());
        assert!(CoarseTable::parse("x 9").is_err());
        assert!(CoarseTable::parse("1 9").is_err());
    }
}
