//! Error types for the grid store and formula parsing.

use thiserror::Error;

/// Errors raised while parsing a range formula such as `SUM(A1:A5)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    /// The input does not contain a recognised `OP(...)` call.
    #[error("Invalid formula: {0}")]
    InvalidFormula(String),

    /// The call was recognised but its `START:END` range is unusable.
    #[error("Invalid range: {0}")]
    InvalidRange(String),
}

/// Errors raised when constructing a grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid grid dimensions {cols}x{rows} (columns must be 1-26, rows at least 1)")]
    InvalidDimensions { cols: usize, rows: usize },

    #[error("Row {row} has {len} cells, expected {cols}")]
    RaggedRow { row: usize, len: usize, cols: usize },
}
