//! Error types for Gridsheet core.

use thiserror::Error;

use gridsheet_engine::engine::{FormulaError, GridError};

/// Errors that can occur in the Gridsheet document layer
#[derive(Error, Debug)]
pub enum GridsheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Formula(#[from] FormulaError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("No file path set")]
    NoFilePath,

    #[error("Import of {0} stopped before its content arrived")]
    ImportWorker(String),
}

pub type Result<T> = std::result::Result<T, GridsheetError>;
