//! Document state and logic (UI-agnostic).

mod history;
mod io;
mod ops;
mod state;

pub use history::{History, Snapshot};
pub use io::PendingImport;
pub use state::{Document, DocumentOptions};
