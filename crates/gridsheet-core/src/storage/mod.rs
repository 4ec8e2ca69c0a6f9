//! File formats.

mod csv;

pub use csv::{ImportSummary, decode_into, encode, read_csv, write_csv};
