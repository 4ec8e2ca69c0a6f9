use super::Document;
use crate::error::{GridsheetError, Result};
use crate::storage::{ImportSummary, decode_into, encode, read_csv, write_csv};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

impl Document {
    /// Overlay CSV text onto the grid as one undoable action.
    pub fn import_csv_text(&mut self, text: &str) -> ImportSummary {
        self.history.save(&self.grid);
        let summary = decode_into(&mut self.grid, text);
        self.modified = true;
        tracing::debug!(
            rows = summary.rows,
            cells = summary.cells_written,
            row_count = self.grid.row_count(),
            "imported csv"
        );
        summary
    }

    /// Serialize the grid as displayed (headers and row labels included).
    pub fn export_csv(&self) -> String {
        encode(&self.grid)
    }

    /// Import a CSV file. Read failures leave the document untouched.
    pub fn import_csv_file(&mut self, path: &Path) -> Result<ImportSummary> {
        let text = read_csv(path)?;
        Ok(self.import_csv_text(&text))
    }

    /// Write the grid to a CSV file.
    pub fn export_csv_file(&self, path: &Path) -> Result<()> {
        write_csv(path, &self.grid)?;
        tracing::debug!(path = %path.display(), "exported csv");
        Ok(())
    }

    /// Load a CSV file as the document's backing file.
    /// The import itself can be undone; the file becomes the save target.
    pub fn load_file(&mut self, path: &Path) -> Result<ImportSummary> {
        let summary = self.import_csv_file(path)?;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(summary)
    }

    /// Save to current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = &self.file_path else {
            return Err(GridsheetError::NoFilePath);
        };

        write_csv(path, &self.grid)?;
        self.modified = false;
        Ok(path.clone())
    }

    /// Start reading `path` in the background.
    ///
    /// Nothing changes until the returned handle is polled after the content
    /// has arrived. Starting a second import while one is pending is not
    /// guarded against: each one applies whenever it is polled to completion.
    pub fn begin_import(&self, path: &Path) -> PendingImport {
        PendingImport::spawn(path)
    }
}

/// A file import whose content is still being read.
///
/// The grid is updated exactly once, by the [`poll`](PendingImport::poll) or
/// [`wait`](PendingImport::wait) call that observes the content. Dropping the
/// handle (or calling [`cancel`](PendingImport::cancel)) discards the result.
pub struct PendingImport {
    path: PathBuf,
    receiver: Option<Receiver<Result<String>>>,
}

impl PendingImport {
    fn spawn(path: &Path) -> PendingImport {
        let (tx, rx) = mpsc::channel();
        let worker_path = path.to_path_buf();
        std::thread::spawn(move || {
            // The receiver may already be gone if the import was cancelled.
            let _ = tx.send(read_csv(&worker_path));
        });
        tracing::debug!(path = %path.display(), "started csv import");
        PendingImport {
            path: path.to_path_buf(),
            receiver: Some(rx),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True once the result has been applied (or failed).
    pub fn is_finished(&self) -> bool {
        self.receiver.is_none()
    }

    /// Apply the import if its content has arrived.
    ///
    /// Returns `None` while the read is in flight and after the result has
    /// already been reported. Returns `Some` exactly once.
    pub fn poll(&mut self, doc: &mut Document) -> Option<Result<ImportSummary>> {
        let receiver = self.receiver.as_ref()?;
        let received = match receiver.try_recv() {
            Ok(received) => received,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                Err(GridsheetError::ImportWorker(self.path.display().to_string()))
            }
        };
        self.receiver = None;
        Some(received.map(|text| doc.import_csv_text(&text)))
    }

    /// Block until the content arrives, then apply it.
    pub fn wait(mut self, doc: &mut Document) -> Result<ImportSummary> {
        let Some(receiver) = self.receiver.take() else {
            return Err(GridsheetError::ImportWorker(self.path.display().to_string()));
        };
        let text = receiver
            .recv()
            .map_err(|_| GridsheetError::ImportWorker(self.path.display().to_string()))??;
        Ok(doc.import_csv_text(&text))
    }

    /// Abandon the import. The grid is never touched.
    pub fn cancel(self) {
        tracing::debug!(path = %self.path.display(), "cancelled csv import");
    }
}
