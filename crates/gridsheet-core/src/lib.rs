//! gridsheet-core - UI-agnostic document model + storage.

pub mod document;
pub mod error;
pub mod storage;

pub use document::{Document, DocumentOptions, History, PendingImport, Snapshot};
pub use error::{GridsheetError, Result};
pub use storage::ImportSummary;

pub use gridsheet_engine::engine::{CellRef, Evaluation, StyleOp};
