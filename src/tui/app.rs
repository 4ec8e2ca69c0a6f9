//! Application state and logic.
//!
//! This module contains the main [`App`] struct which wraps the document
//! with cursor, viewport and input-buffer state. The app operates in
//! different [`Mode`]s: navigating, editing a cell, typing a formula for the
//! selected cell, or entering a `:` command.

use gridsheet_core::{CellRef, Document, PendingImport, StyleOp};
use std::path::PathBuf;

/// Modal editing state for the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Navigate the grid, execute single-key commands.
    Normal,
    /// Edit the contents of the current cell.
    Edit,
    /// Type a range formula applied to the current cell.
    Formula,
    /// Enter ex-style commands (`:w`, `:q`, `:import`, etc.).
    Command,
}

/// Main application state container.
pub struct App {
    /// Document being edited (grid, history, selection)
    pub core: Document,
    /// Cursor position; kept in sync with the document's selected cell
    pub cursor: CellRef,
    /// Viewport offset (column)
    pub viewport_col: usize,
    /// Viewport offset (row index, 0-based)
    pub viewport_row: usize,
    /// Number of visible columns
    pub visible_cols: usize,
    /// Number of visible rows
    pub visible_rows: usize,
    /// Column width for display
    pub col_width: u16,
    /// Current mode
    pub mode: Mode,
    /// Input buffer shared by edit, formula and command modes
    pub input: String,
    /// Cursor position within the input buffer (byte offset)
    pub input_cursor: usize,
    /// Status message to display
    pub status_message: String,
    /// Left mouse button held over the grid
    pub mouse_down: bool,
    /// Cell whose text the next drop copies
    pub drag_source: Option<CellRef>,
    /// Imports started with `:import` that have not finished yet
    pub pending_imports: Vec<PendingImport>,
}

impl App {
    pub fn new(core: Document, col_width: u16) -> Self {
        let mut app = App {
            core,
            cursor: CellRef::new(0, 1),
            viewport_col: 0,
            viewport_row: 0,
            visible_cols: 8,
            visible_rows: 20,
            col_width,
            mode: Mode::Normal,
            input: String::new(),
            input_cursor: 0,
            status_message: String::new(),
            mouse_down: false,
            drag_source: None,
            pending_imports: Vec::new(),
        };
        app.core.select(app.cursor);
        app
    }

    pub fn max_cols(&self) -> usize {
        self.core.grid.num_cols()
    }

    pub fn max_rows(&self) -> usize {
        self.core.grid.row_count()
    }

    /// Move the cursor to `cell_ref` (clamped to the grid) and select it.
    pub fn set_cursor(&mut self, cell_ref: CellRef) {
        let col = cell_ref.col.min(self.max_cols() - 1);
        let row = cell_ref.row.clamp(1, self.max_rows());
        self.cursor = CellRef::new(col, row);
        self.core.select(self.cursor);
        self.update_viewport();
    }

    /// Move cursor by delta, clamping to valid range
    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        let col = self.cursor.col.saturating_add_signed(dx);
        let row = self.cursor.row.saturating_add_signed(dy).max(1);
        self.set_cursor(CellRef::new(col, row));
    }

    /// Update viewport to keep cursor visible
    pub fn update_viewport(&mut self) {
        let row_idx = self.cursor.row - 1;
        if self.cursor.col < self.viewport_col {
            self.viewport_col = self.cursor.col;
        } else if self.cursor.col >= self.viewport_col + self.visible_cols {
            self.viewport_col = self.cursor.col + 1 - self.visible_cols;
        }
        if row_idx < self.viewport_row {
            self.viewport_row = row_idx;
        } else if row_idx >= self.viewport_row + self.visible_rows {
            self.viewport_row = row_idx + 1 - self.visible_rows;
        }
    }

    /// Keep the cursor valid after the grid changed shape (undo of an import).
    fn resync_cursor(&mut self) {
        self.set_cursor(self.cursor);
    }

    fn start_input(&mut self, mode: Mode, initial: String) {
        self.mode = mode;
        self.input_cursor = initial.len();
        self.input = initial;
        self.status_message.clear();
    }

    pub fn enter_edit_mode(&mut self) {
        let current = self.core.grid.get(&self.cursor).unwrap_or_default().to_string();
        self.start_input(Mode::Edit, current);
    }

    pub fn enter_formula_mode(&mut self) {
        self.start_input(Mode::Formula, String::new());
    }

    pub fn enter_command_mode(&mut self) {
        self.start_input(Mode::Command, String::new());
    }

    pub fn cancel_input(&mut self) {
        self.mode = Mode::Normal;
        self.input.clear();
        self.input_cursor = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.input_cursor, c);
        self.input_cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.input[..self.input_cursor].chars().next_back() {
            self.input_cursor -= prev.len_utf8();
            self.input.remove(self.input_cursor);
        }
    }

    pub fn cursor_left(&mut self) {
        if let Some(prev) = self.input[..self.input_cursor].chars().next_back() {
            self.input_cursor -= prev.len_utf8();
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some(next) = self.input[self.input_cursor..].chars().next() {
            self.input_cursor += next.len_utf8();
        }
    }

    /// Finish the current input according to the mode.
    /// Returns true if the app should quit.
    pub fn submit_input(&mut self) -> bool {
        let text = std::mem::take(&mut self.input);
        let mode = self.mode;
        self.cancel_input();
        match mode {
            Mode::Edit => {
                self.core.edit_cell(self.cursor, &text);
                false
            }
            Mode::Formula => {
                self.apply_formula(&text);
                false
            }
            Mode::Command => self.execute_command(&text),
            Mode::Normal => false,
        }
    }

    pub fn apply_formula(&mut self, input: &str) {
        match self.core.apply_formula(input) {
            Ok(Some(result)) => {
                self.status_message = if result.is_non_finite() {
                    format!("{} = {} (no numeric cells)", self.cursor, result.display())
                } else {
                    format!("{} = {}", self.cursor, result.display())
                };
            }
            Ok(None) => {}
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    pub fn clear_current_cell(&mut self) {
        self.core.edit_cell(self.cursor, "");
    }

    pub fn apply_style(&mut self, op: StyleOp) {
        if self.core.apply_style(op) {
            self.status_message = format!("Applied {} to {}", op.name(), self.cursor);
        }
    }

    pub fn undo(&mut self) {
        if self.core.undo() {
            self.resync_cursor();
            self.status_message = "Undo".to_string();
        } else {
            self.status_message = "Nothing to undo".to_string();
        }
    }

    pub fn redo(&mut self) {
        if self.core.redo() {
            self.resync_cursor();
            self.status_message = "Redo".to_string();
        } else {
            self.status_message = "Nothing to redo".to_string();
        }
    }

    /// Remember the cursor cell as the source for [`drop_at_cursor`](Self::drop_at_cursor).
    pub fn mark_drag_source(&mut self) {
        self.drag_source = Some(self.cursor);
        self.status_message = format!("Picked up {}", self.cursor);
    }

    pub fn drop_at_cursor(&mut self) {
        let Some(source) = self.drag_source.take() else {
            self.status_message = "Nothing picked up".to_string();
            return;
        };
        if self.core.drop_text(source, self.cursor) {
            self.status_message = format!("Copied {} to {}", source, self.cursor);
        }
    }

    pub fn mouse_press(&mut self, cell_ref: CellRef) {
        self.mouse_down = true;
        self.core.begin_selection(cell_ref);
        self.set_cursor(cell_ref);
    }

    pub fn mouse_drag(&mut self, cell_ref: CellRef) {
        if self.mouse_down {
            self.core.extend_selection(cell_ref);
        }
    }

    pub fn mouse_release(&mut self) {
        self.mouse_down = false;
    }

    /// Apply any imports whose file content has arrived.
    pub fn poll_imports(&mut self) {
        let mut messages = Vec::new();
        for pending in &mut self.pending_imports {
            match pending.poll(&mut self.core) {
                Some(Ok(summary)) => messages.push(format!(
                    "Imported {} rows from {}",
                    summary.rows,
                    pending.path().display()
                )),
                Some(Err(e)) => messages.push(format!("Import error: {}", e)),
                None => {}
            }
        }
        self.pending_imports.retain(|p| !p.is_finished());
        if let Some(last) = messages.pop() {
            self.resync_cursor();
            self.status_message = last;
        }
    }

    /// Run a `:` command. Returns true if the app should quit.
    pub fn execute_command(&mut self, cmd: &str) -> bool {
        let cmd = cmd.trim();
        let (command, args) = match cmd.split_once(' ') {
            Some((c, rest)) => (c, Some(rest.trim()).filter(|s| !s.is_empty())),
            None => (cmd, None),
        };

        match command {
            "q" => {
                if self.core.modified {
                    self.status_message =
                        "Unsaved changes! Use :q! to force quit or :wq to save and quit"
                            .to_string();
                    return false;
                }
                return true;
            }
            "q!" => return true,
            "w" | "save" => {
                if let Some(path) = args {
                    self.core.file_path = Some(PathBuf::from(path));
                }
                self.save_file();
            }
            "wq" => {
                self.save_file();
                if !self.core.modified {
                    return true;
                }
            }
            "import" => match args {
                Some(path) => {
                    let pending = self.core.begin_import(&PathBuf::from(path));
                    self.status_message = format!("Importing {}...", path);
                    self.pending_imports.push(pending);
                }
                None => self.status_message = "Usage: :import <file.csv>".to_string(),
            },
            "export" => match args {
                Some(path) => match self.core.export_csv_file(&PathBuf::from(path)) {
                    Ok(()) => self.status_message = format!("Exported to {}", path),
                    Err(e) => self.status_message = format!("Export error: {}", e),
                },
                None => self.status_message = "Usage: :export <file.csv>".to_string(),
            },
            "replace" | "s" => {
                let parts = args.and_then(|a| a.split_once(' '));
                match parts {
                    Some((find, replace)) => {
                        let changed = self.core.find_replace(find, replace.trim_start());
                        self.status_message = format!("Replaced in {} cells", changed);
                    }
                    None => {
                        self.status_message = "Usage: :replace <find> <replacement>".to_string()
                    }
                }
            }
            "goto" | "g" => match args.and_then(CellRef::from_str) {
                Some(cell_ref) if self.core.grid.contains(&cell_ref) => self.set_cursor(cell_ref),
                _ => {
                    self.status_message = "Usage: :goto CELL (e.g., :goto B7)".to_string();
                }
            },
            "undo" | "u" => self.undo(),
            "redo" => self.redo(),
            "" => {}
            _ => {
                self.status_message = format!("Unknown command: {}", command);
            }
        }
        false
    }

    /// Save to current file path
    pub fn save_file(&mut self) {
        match self.core.save_file() {
            Ok(path) => self.status_message = format!("Saved to {}", path.display()),
            Err(e) => self.status_message = format!("Error saving: {}", e),
        }
    }
}
