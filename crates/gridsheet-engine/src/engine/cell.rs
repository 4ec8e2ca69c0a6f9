//! Cell data structures for the spreadsheet grid.
//!
//! This module provides the core data types for representing cells:
//! - [`Cell`] - Text content plus style flags
//! - [`CellStyle`] / [`StyleOp`] - Bold/italic flags and the closed set of style edits
//! - [`Grid`] - Dense row-major storage with a fixed column count and growable rows

use serde::{Deserialize, Serialize};

use super::cell_ref::{CellRef, MAX_COLS};
use super::error::GridError;

/// Column count of a default grid.
pub const DEFAULT_COLS: usize = 10;
/// Row count of a default grid.
pub const DEFAULT_ROWS: usize = 10;

/// Style flags carried alongside a cell's text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellStyle {
    pub bold: bool,
    pub italic: bool,
}

/// A cell in the spreadsheet grid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub text: String,
    pub style: CellStyle,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell::default()
    }

    pub fn new_text(text: &str) -> Cell {
        Cell {
            text: text.to_string(),
            style: CellStyle::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Formatting edits that can be applied to a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleOp {
    ToggleBold,
    ToggleItalic,
    Uppercase,
    Lowercase,
}

impl StyleOp {
    pub fn apply(self, cell: &mut Cell) {
        match self {
            StyleOp::ToggleBold => cell.style.bold = !cell.style.bold,
            StyleOp::ToggleItalic => cell.style.italic = !cell.style.italic,
            StyleOp::Uppercase => cell.text = cell.text.to_uppercase(),
            StyleOp::Lowercase => cell.text = cell.text.to_lowercase(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StyleOp::ToggleBold => "bold",
            StyleOp::ToggleItalic => "italic",
            StyleOp::Uppercase => "uppercase",
            StyleOp::Lowercase => "lowercase",
        }
    }
}

/// The cell store: a rectangular grid addressed by [`CellRef`].
///
/// The column count is fixed at construction. Rows can only grow, and every
/// row always holds exactly `num_cols` cells. Reads and writes outside the
/// grid are ignored rather than treated as errors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    num_cols: usize,
    rows: Vec<Vec<Cell>>,
}

/// Unchecked serialized form of a [`Grid`].
#[derive(Deserialize)]
pub struct GridData {
    num_cols: usize,
    rows: Vec<Vec<Cell>>,
}

impl TryFrom<GridData> for Grid {
    type Error = GridError;

    /// Same bounds as [`Grid::new`], and every row must be exactly
    /// `num_cols` wide.
    fn try_from(data: GridData) -> Result<Grid, GridError> {
        let mut grid = Grid::new(data.num_cols, data.rows.len())?;
        if let Some((idx, row)) = data
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != data.num_cols)
        {
            return Err(GridError::RaggedRow {
                row: idx + 1,
                len: row.len(),
                cols: data.num_cols,
            });
        }
        grid.rows = data.rows;
        Ok(grid)
    }
}

impl Grid {
    /// Create an empty grid. Both dimensions must be positive and the
    /// column count must fit single-letter labels.
    pub fn new(num_cols: usize, num_rows: usize) -> Result<Grid, GridError> {
        if num_cols == 0 || num_rows == 0 || num_cols > MAX_COLS {
            return Err(GridError::InvalidDimensions {
                cols: num_cols,
                rows: num_rows,
            });
        }
        Ok(Grid {
            num_cols,
            rows: (0..num_rows).map(|_| vec![Cell::new_empty(); num_cols]).collect(),
        })
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        cell_ref.col < self.num_cols && cell_ref.row >= 1 && cell_ref.row <= self.rows.len()
    }

    pub fn cell(&self, cell_ref: &CellRef) -> Option<&Cell> {
        if !self.contains(cell_ref) {
            return None;
        }
        self.rows.get(cell_ref.row - 1)?.get(cell_ref.col)
    }

    pub fn cell_mut(&mut self, cell_ref: &CellRef) -> Option<&mut Cell> {
        if !self.contains(cell_ref) {
            return None;
        }
        self.rows.get_mut(cell_ref.row - 1)?.get_mut(cell_ref.col)
    }

    /// Text at `cell_ref`, or None when the coordinate is outside the grid.
    pub fn get(&self, cell_ref: &CellRef) -> Option<&str> {
        self.cell(cell_ref).map(|c| c.text.as_str())
    }

    /// Replace the text at `cell_ref`, keeping its style.
    /// Returns false (and writes nothing) outside the grid.
    pub fn set(&mut self, cell_ref: &CellRef, text: &str) -> bool {
        match self.cell_mut(cell_ref) {
            Some(cell) => {
                cell.text = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Visit every cell in row-major order.
    pub fn for_each_cell<F>(&self, mut f: F)
    where
        F: FnMut(CellRef, &Cell),
    {
        for (row_idx, row) in self.rows.iter().enumerate() {
            for (col, cell) in row.iter().enumerate() {
                f(CellRef::new(col, row_idx + 1), cell);
            }
        }
    }

    /// Iterate over rows (row 1 first).
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Grow to at least `n` rows by appending empty rows. Never truncates.
    pub fn ensure_row_count(&mut self, n: usize) {
        while self.rows.len() < n {
            self.rows.push(vec![Cell::new_empty(); self.num_cols]);
        }
    }

    /// Apply a style edit to one cell. Returns false outside the grid.
    pub fn apply_style(&mut self, cell_ref: &CellRef, op: StyleOp) -> bool {
        match self.cell_mut(cell_ref) {
            Some(cell) => {
                op.apply(cell);
                true
            }
            None => false,
        }
    }

    /// Number of cells whose text contains `find`.
    pub fn count_matches(&self, find: &str) -> usize {
        if find.is_empty() {
            return 0;
        }
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.text.contains(find))
            .count()
    }

    /// Replace every occurrence of `find` in every cell.
    /// Returns the number of cells that changed. An empty `find` matches nothing.
    pub fn replace_all(&mut self, find: &str, replace: &str) -> usize {
        if find.is_empty() {
            return 0;
        }
        let mut changed = 0;
        for cell in self.rows.iter_mut().flatten() {
            if cell.text.contains(find) {
                cell.text = cell.text.replace(find, replace);
                changed += 1;
            }
        }
        changed
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid {
            num_cols: DEFAULT_COLS,
            rows: (0..DEFAULT_ROWS)
                .map(|_| vec![Cell::new_empty(); DEFAULT_COLS])
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(10, 10).unwrap()
    }

    fn data(num_cols: usize, rows: Vec<Vec<Cell>>) -> GridData {
        GridData { num_cols, rows }
    }

    #[test]
    fn test_serialized_form_is_validated() {
        let ok = Grid::try_from(data(2, vec![vec![Cell::new_text("a"), Cell::new_empty()]]))
            .unwrap();
        assert_eq!(ok.get(&CellRef::new(0, 1)), Some("a"));

        let wide = vec![vec![Cell::new_empty(); 27]];
        assert!(matches!(
            Grid::try_from(data(27, wide)),
            Err(GridError::InvalidDimensions { cols: 27, .. })
        ));
        assert!(matches!(
            Grid::try_from(data(3, Vec::new())),
            Err(GridError::InvalidDimensions { rows: 0, .. })
        ));
        let ragged = vec![vec![Cell::new_empty(); 3], vec![Cell::new_empty(); 2]];
        assert_eq!(
            Grid::try_from(data(3, ragged)),
            Err(GridError::RaggedRow {
                row: 2,
                len: 2,
                cols: 3
            })
        );
    }

    #[test]
    fn test_default_is_ten_by_ten() {
        let g = Grid::default();
        assert_eq!((g.num_cols(), g.row_count()), (DEFAULT_COLS, DEFAULT_ROWS));
        assert_eq!(g, grid());
    }

    #[test]
    fn test_new_rejects_bad_dimensions() {
        assert!(Grid::new(0, 10).is_err());
        assert!(Grid::new(10, 0).is_err());
        assert!(Grid::new(27, 10).is_err());
        assert!(Grid::new(26, 1).is_ok());
    }

    #[test]
    fn test_set_then_get_round_trips_in_bounds() {
        let mut g = grid();
        for row in 1..=10 {
            for col in 0..10 {
                let r = CellRef::new(col, row);
                let text = format!("v{}-{}", col, row);
                assert!(g.set(&r, &text));
                assert_eq!(g.get(&r), Some(text.as_str()));
            }
        }
    }

    #[test]
    fn test_out_of_bounds_is_absent_not_fatal() {
        let mut g = grid();
        assert_eq!(g.get(&CellRef::new(0, 0)), None);
        assert_eq!(g.get(&CellRef::new(0, 11)), None);
        assert_eq!(g.get(&CellRef::new(10, 1)), None);
        assert!(!g.set(&CellRef::new(10, 1), "x"));
        assert!(!g.apply_style(&CellRef::new(0, 99), StyleOp::ToggleBold));
    }

    #[test]
    fn test_set_keeps_style() {
        let mut g = grid();
        let a1 = CellRef::new(0, 1);
        g.apply_style(&a1, StyleOp::ToggleBold);
        g.set(&a1, "hello");
        let cell = g.cell(&a1).unwrap();
        assert!(cell.style.bold);
        assert_eq!(cell.text, "hello");
    }

    #[test]
    fn test_ensure_row_count_grows_and_never_truncates() {
        let mut g = grid();
        g.set(&CellRef::new(3, 10), "keep");
        g.ensure_row_count(15);
        assert_eq!(g.row_count(), 15);
        assert!(g.rows().all(|r| r.len() == 10));
        assert_eq!(g.get(&CellRef::new(3, 15)), Some(""));

        g.ensure_row_count(2);
        assert_eq!(g.row_count(), 15);
        assert_eq!(g.get(&CellRef::new(3, 10)), Some("keep"));
    }

    #[test]
    fn test_for_each_cell_is_row_major() {
        let g = Grid::new(2, 2).unwrap();
        let mut seen = Vec::new();
        g.for_each_cell(|r, _| seen.push(r.to_string()));
        assert_eq!(seen, vec!["A1", "B1", "A2", "B2"]);
    }

    #[test]
    fn test_style_ops() {
        let mut cell = Cell::new_text("MiXed");
        StyleOp::Uppercase.apply(&mut cell);
        assert_eq!(cell.text, "MIXED");
        StyleOp::Lowercase.apply(&mut cell);
        assert_eq!(cell.text, "mixed");
        StyleOp::ToggleItalic.apply(&mut cell);
        assert!(cell.style.italic);
        StyleOp::ToggleItalic.apply(&mut cell);
        assert!(!cell.style.italic);
        assert!(!cell.style.bold);
    }

    #[test]
    fn test_replace_all_counts_changed_cells() {
        let mut g = grid();
        g.set(&CellRef::new(0, 1), "foo bar foo");
        g.set(&CellRef::new(1, 2), "food");
        g.set(&CellRef::new(2, 3), "bar");
        assert_eq!(g.count_matches("foo"), 2);
        assert_eq!(g.replace_all("foo", "baz"), 2);
        assert_eq!(g.get(&CellRef::new(0, 1)), Some("baz bar baz"));
        assert_eq!(g.get(&CellRef::new(1, 2)), Some("bazd"));
        assert_eq!(g.get(&CellRef::new(2, 3)), Some("bar"));
    }

    #[test]
    fn test_replace_all_with_empty_pattern_is_noop() {
        let mut g = grid();
        g.set(&CellRef::new(0, 1), "abc");
        assert_eq!(g.replace_all("", "x"), 0);
        assert_eq!(g.get(&CellRef::new(0, 1)), Some("abc"));
    }
}
