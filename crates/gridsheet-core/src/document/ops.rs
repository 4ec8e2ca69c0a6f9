use super::Document;
use crate::error::Result;
use gridsheet_engine::engine::{CellRef, Evaluation, StyleOp, evaluate, parse_formula};

impl Document {
    /// Make `cell_ref` the target for formulas and style edits.
    /// Returns false (selection unchanged) outside the grid.
    pub fn select(&mut self, cell_ref: CellRef) -> bool {
        if !self.grid.contains(&cell_ref) {
            return false;
        }
        self.selected = Some(cell_ref);
        true
    }

    pub fn selected_cell(&self) -> Option<CellRef> {
        self.selected
    }

    /// Start a new highlighted selection at `cell_ref` (mouse down).
    pub fn begin_selection(&mut self, cell_ref: CellRef) {
        self.selection.clear();
        if self.select(cell_ref) {
            self.selection.insert(cell_ref);
        }
    }

    /// Add a cell to the highlighted selection (mouse drag).
    pub fn extend_selection(&mut self, cell_ref: CellRef) {
        if self.grid.contains(&cell_ref) {
            self.selection.insert(cell_ref);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_highlighted(&self, cell_ref: &CellRef) -> bool {
        self.selection.contains(cell_ref)
    }

    /// Replace a cell's text as one undoable edit.
    /// Returns false when nothing changed (outside the grid or same text).
    pub fn edit_cell(&mut self, cell_ref: CellRef, text: &str) -> bool {
        match self.grid.get(&cell_ref) {
            Some(current) if current != text => {}
            _ => return false,
        }
        self.history.save(&self.grid);
        self.grid.set(&cell_ref, text);
        self.modified = true;
        true
    }

    /// Evaluate formula input and write the result into the selected cell.
    ///
    /// Blank input or no selected cell is a no-op (`Ok(None)`). Malformed
    /// input returns the parse error without recording history or touching
    /// the grid.
    pub fn apply_formula(&mut self, input: &str) -> Result<Option<Evaluation>> {
        let input = input.trim();
        let Some(target) = self.selected.filter(|c| self.grid.contains(c)) else {
            return Ok(None);
        };
        if input.is_empty() {
            return Ok(None);
        }

        let formula = parse_formula(input)?;
        let result = evaluate(&self.grid, &formula);

        self.history.save(&self.grid);
        self.grid.set(&target, &result.display());
        self.modified = true;
        tracing::debug!(
            formula = %formula,
            target = %target,
            value = %result.display(),
            "applied formula"
        );
        Ok(Some(result))
    }

    /// Apply a style edit to the selected cell. No selection is a no-op.
    pub fn apply_style(&mut self, op: StyleOp) -> bool {
        let Some(target) = self.selected.filter(|c| self.grid.contains(c)) else {
            return false;
        };
        self.history.save(&self.grid);
        self.grid.apply_style(&target, op);
        self.modified = true;
        tracing::debug!(op = op.name(), target = %target, "applied style");
        true
    }

    /// Replace `find` with `replace` in every cell. Returns the number of
    /// cells changed; no history entry is recorded when nothing matches.
    pub fn find_replace(&mut self, find: &str, replace: &str) -> usize {
        if self.grid.count_matches(find) == 0 {
            return 0;
        }
        self.history.save(&self.grid);
        let changed = self.grid.replace_all(find, replace);
        self.modified = true;
        tracing::debug!(find, replace, changed, "find and replace");
        changed
    }

    /// Drag-and-drop: copy the text of `from` into `to`. The source keeps
    /// its text and the target keeps its style.
    pub fn drop_text(&mut self, from: CellRef, to: CellRef) -> bool {
        let Some(text) = self.grid.get(&from).map(str::to_string) else {
            return false;
        };
        self.edit_cell(to, &text)
    }

    /// Undo the last action. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.history.undo(&mut self.grid) {
            return false;
        }
        self.modified = true;
        self.prune_selection();
        true
    }

    /// Redo the last undone action. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        if !self.history.redo(&mut self.grid) {
            return false;
        }
        self.modified = true;
        self.prune_selection();
        true
    }
}
