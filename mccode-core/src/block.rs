//! Numeric data block loading.

use crate::header::Line;
use crate::{Error, Result};
use ndarray::Array2;

/// Loads whitespace-separated values into a `(rows, columns)` array.
///
/// Every value is read as `f64`, integral or not. An empty block loads
/// as a `(0, 0)` array.
///
/// # Errors
/// Returns an error if a token is not a number or rows differ in width.
pub fn load_block(lines: &[Line<'_>]) -> Result<Array2<f64>> {
    let mut values = Vec::new();
    let mut width = None;

    for line in lines {
        let start = values.len();
        for token in line.text.split_whitespace() {
            let value = token.parse::<f64>().map_err(|_| Error::InvalidNumber {
                line: line.number,
                token: token.to_string(),
            })?;
            values.push(value);
        }

        let found = values.len() - start;
        match width {
            None => width = Some(found),
            Some(expected) if expected != found => {
                return Err(Error::RaggedRow {
                    line: line.number,
                    expected,
                    found,
                });
            }
            Some(_) => {}
        }
    }

    Array2::from_shape_vec((lines.len(), width.unwrap_or(0)), values).map_err(|e| {
        Error::InvalidField {
            key: "data".to_string(),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::split_lines;

    fn load(lines: &[&str]) -> Result<Array2<f64>> {
        load_block(&split_lines(lines).data)
    }

    #[test]
    fn test_load_rectangular() {
        let block = load(&["1 2 3", "4\t5  6"]).unwrap();
        assert_eq!(block.dim(), (2, 3));
        assert_eq!(block[[1, 2]], 6.0);
    }

    #[test]
    fn test_scientific_notation() {
        let block = load(&["1e-3 -2.5E+2 nan"]).unwrap();
        assert_eq!(block[[0, 0]], 0.001);
        assert_eq!(block[[0, 1]], -250.0);
        assert!(block[[0, 2]].is_nan());
    }

    #[test]
    fn test_empty_block() {
        let block = load(&["# only: header"]).unwrap();
        assert_eq!(block.dim(), (0, 0));
    }

    #[test]
    fn test_ragged_rows() {
        let err = load(&["1 2 3", "4 5"]).unwrap_err();
        assert!(matches!(
            err,
            Error::RaggedRow {
                line: 2,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_invalid_token() {
        let err = load(&["1 2", "3 four"]).unwrap_err();
        match err {
            Error::InvalidNumber { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "four");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
