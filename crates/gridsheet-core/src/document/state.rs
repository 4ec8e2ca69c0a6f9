use crate::error::Result;
use gridsheet_engine::engine::{CellRef, DEFAULT_COLS, DEFAULT_ROWS, Grid};
use std::collections::BTreeSet;
use std::path::PathBuf;

use super::history::History;

/// Construction parameters for a [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DocumentOptions {
    pub cols: usize,
    pub rows: usize,
    /// Maximum undo entries; `None` keeps every snapshot.
    pub history_limit: Option<usize>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        DocumentOptions {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            history_limit: None,
        }
    }
}

/// UI-agnostic document state for the spreadsheet.
///
/// Owns everything an editing session needs: the grid, the undo history and
/// the current selection. Front ends drive it through the action methods,
/// each of which records one history entry before it mutates the grid.
pub struct Document {
    /// The spreadsheet grid
    pub grid: Grid,
    /// Undo/redo snapshots
    pub history: History,
    /// Target cell for formulas and style edits
    pub selected: Option<CellRef>,
    /// Highlighted cells (mouse drag selection)
    pub selection: BTreeSet<CellRef>,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the grid has been modified
    pub modified: bool,
}

impl Document {
    /// Create a new document state with a 10x10 grid.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Self::from_grid(Grid::default(), None)
    }

    /// Create a document with custom dimensions.
    pub fn with_options(options: &DocumentOptions) -> Result<Self> {
        let grid = Grid::new(options.cols, options.rows)?;
        Ok(Self::from_grid(grid, options.history_limit))
    }

    /// Create a new document and import a CSV file if provided.
    ///
    /// The loaded file is the starting point, so there is nothing to undo.
    /// A path that does not exist yet becomes the document's file path so a
    /// later save writes there.
    pub fn with_file(path: Option<PathBuf>, options: &DocumentOptions) -> Result<Self> {
        let mut core = Self::with_options(options)?;

        if let Some(p) = path {
            if p.exists() {
                core.load_file(&p)?;
                core.history.clear();
            } else {
                core.file_path = Some(p);
                core.modified = false;
            }
        }
        Ok(core)
    }

    fn from_grid(grid: Grid, history_limit: Option<usize>) -> Self {
        Document {
            grid,
            history: History::with_limit(history_limit),
            selected: None,
            selection: BTreeSet::new(),
            file_path: None,
            modified: false,
        }
    }

    /// Drop selection entries that no longer exist (after undo shrinks rows).
    pub(crate) fn prune_selection(&mut self) {
        let grid = &self.grid;
        self.selected = self.selected.filter(|cell_ref| grid.contains(cell_ref));
        self.selection.retain(|cell_ref| grid.contains(cell_ref));
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
