//! Spreadsheet engine API.
//!
//! This module provides the state engine behind the grid editor:
//!
//! - [`Cell`], [`CellStyle`], [`Grid`] - Cell storage with a fixed column count
//! - [`CellRef`] - Cell reference parsing (`B3` <-> column/row)
//! - [`StyleOp`] - Closed set of formatting edits
//! - [`parse_formula`] - Resolve `OP(START:END)` into a [`RangeFormula`]
//! - [`evaluate`] - Apply an [`AggregateOp`] over a range
//! - [`format_number`] - Format results for display

mod cell;
mod cell_ref;
mod error;
mod eval;
mod format;
mod range;

pub use cell::{Cell, CellStyle, DEFAULT_COLS, DEFAULT_ROWS, Grid, StyleOp};
pub use cell_ref::{CellRef, MAX_COLS};
pub use error::{FormulaError, GridError};
pub use eval::{Evaluation, aggregate, cell_value, coerce_number, evaluate};
pub use format::format_number;
pub use range::{AggregateOp, RangeFormula, parse_formula};
