//! Snapshot-based undo/redo.
//!
//! Callers save a snapshot before each discrete mutating action; undo and redo
//! swap whole grids between the live document and the two stacks.

use gridsheet_engine::engine::Grid;

/// Immutable copy of the grid (text, styles and row count) at one instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    grid: Grid,
}

impl Snapshot {
    fn capture(grid: &Grid) -> Snapshot {
        Snapshot { grid: grid.clone() }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    fn into_grid(self) -> Grid {
        self.grid
    }
}

/// Linear undo/redo history over full-grid snapshots.
///
/// Unbounded unless a limit is configured, in which case the oldest undo
/// entries are dropped once the limit is exceeded.
#[derive(Clone, Debug, Default)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// A limit of zero would keep nothing, so it is treated as no limit.
    pub fn with_limit(limit: Option<usize>) -> Self {
        History {
            limit: limit.filter(|&n| n > 0),
            ..Self::default()
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Record the grid as it is before a mutation. Clears the redo stack.
    pub fn save(&mut self, grid: &Grid) {
        self.push_undo(Snapshot::capture(grid));
        self.redo_stack.clear();
        tracing::debug!(
            undo = self.undo_stack.len(),
            "saved history snapshot"
        );
    }

    /// Restore the most recent snapshot. Returns false when there is none.
    pub fn undo(&mut self, grid: &mut Grid) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(Snapshot::capture(grid));
        *grid = previous.into_grid();
        tracing::debug!(
            undo = self.undo_stack.len(),
            redo = self.redo_stack.len(),
            "undo"
        );
        true
    }

    /// Re-apply the most recently undone snapshot. Returns false when there is none.
    pub fn redo(&mut self, grid: &mut Grid) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.push_undo(Snapshot::capture(grid));
        *grid = next.into_grid();
        tracing::debug!(
            undo = self.undo_stack.len(),
            redo = self.redo_stack.len(),
            "redo"
        );
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Most recent undo snapshot, if any.
    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.undo_stack.last()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        if let Some(limit) = self.limit {
            if self.undo_stack.len() > limit {
                let excess = self.undo_stack.len() - limit;
                self.undo_stack.drain(..excess);
            }
        }
    }
}
