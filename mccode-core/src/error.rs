//! Error types for mccode-core.

use thiserror::Error;

/// Result type alias for mccode operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for parsing and converting McCode data files.
#[derive(Error, Debug)]
pub enum Error {
    /// Header line without a `key: value` separator.
    #[error("malformed header on line {line}: expected 'key: value', found {text:?}")]
    MalformedHeader { line: usize, text: String },

    /// Parameter line without a `name=value` assignment.
    #[error("malformed parameter on line {line}: expected 'Param: name=value', found {text:?}")]
    MalformedParameter { line: usize, text: String },

    /// Data token that does not parse as a floating point value.
    #[error("invalid number {token:?} on line {line}")]
    InvalidNumber { line: usize, token: String },

    /// Data row whose width differs from the first data row.
    #[error("ragged data block on line {line}: expected {expected} values, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Header field present but not in the expected format.
    #[error("invalid value for {key:?}: {reason}")]
    InvalidField { key: String, reason: String },

    /// Declared dimensionality is not supported.
    #[error("unsupported number of dimensions: {0} (expected 1 or 2)")]
    Dimensionality(usize),

    /// Data block shape disagrees with the declared type and variables.
    #[error(
        "unexpected data shape {found:?}, expected {expected:?} for type {declared:?} with {variables} variables"
    )]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
        declared: String,
        variables: usize,
    },

    /// Name not found among variables, parameters or metadata.
    #[error("unknown key {0:?}")]
    UnknownKey(String),

    /// Variable name listed more than once.
    #[error("expected one index for {key:?} but found {indices:?}")]
    AmbiguousKey { key: String, indices: Vec<usize> },

    /// Axis with fewer than two bins has no defined bin width.
    #[error("axis {label:?} has {length} bin(s); at least 2 are needed to compute edges")]
    DegenerateAxis { label: String, length: usize },

    /// Name resolved to header text where an array was required.
    #[error("{0:?} is not a variable")]
    NotAVariable(String),

    /// Name resolved to an array where header text was required.
    #[error("{0:?} is a variable, expected a header value")]
    NotText(String),
}
