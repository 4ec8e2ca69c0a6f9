//! CSV import/export functionality
//!
//! The format mirrors the grid as displayed: the first line holds the column
//! letters (after an empty corner field) and every following line starts with
//! its row number. Fields are joined with `,` and never quoted, so text
//! containing commas or newlines does not survive a round trip.

use crate::error::Result;
use gridsheet_engine::engine::{CellRef, Grid};
use std::path::Path;

/// What an import changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Data rows found in the input (excluding the header line).
    pub rows: usize,
    /// Cells overwritten with imported text.
    pub cells_written: usize,
    /// Fields that fell past the grid's last column.
    pub fields_dropped: usize,
}

/// Serialize the whole grid, header line and row labels included.
pub fn encode(grid: &Grid) -> String {
    let mut out = String::new();

    let header: Vec<String> = std::iter::once(String::new())
        .chain((0..grid.num_cols()).map(CellRef::col_label))
        .collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for (row_idx, row) in grid.rows().enumerate() {
        let mut fields = Vec::with_capacity(row.len() + 1);
        fields.push((row_idx + 1).to_string());
        fields.extend(row.iter().map(|cell| cell.text.clone()));
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    out
}

/// Overlay CSV text onto the grid.
///
/// The header line and the leading row-label field of each line are skipped.
/// The grid grows to fit every data line; columns never change and fields
/// past the last column are dropped. Each field is trimmed. Cells that the
/// input does not cover keep their content.
pub fn decode_into(grid: &mut Grid, text: &str) -> ImportSummary {
    let lines: Vec<&str> = text.trim().split('\n').collect();
    let data_lines = lines.get(1..).unwrap_or_default();

    let mut summary = ImportSummary {
        rows: data_lines.len(),
        ..ImportSummary::default()
    };
    grid.ensure_row_count(data_lines.len());

    for (line_idx, line) in data_lines.iter().enumerate() {
        let row = line_idx + 1;
        for (col, field) in line.split(',').skip(1).enumerate() {
            if grid.set(&CellRef::new(col, row), field.trim()) {
                summary.cells_written += 1;
            } else {
                summary.fields_dropped += 1;
            }
        }
    }

    if summary.fields_dropped > 0 {
        tracing::warn!(
            dropped = summary.fields_dropped,
            cols = grid.num_cols(),
            "csv fields past the last column were dropped"
        );
    }
    summary
}

/// Read CSV text from a file.
pub fn read_csv(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// Write the grid to a CSV file.
pub fn write_csv(path: &Path, grid: &Grid) -> Result<()> {
    std::fs::write(path, encode(grid))?;
    Ok(())
}
