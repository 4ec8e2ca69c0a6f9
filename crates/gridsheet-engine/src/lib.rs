//! gridsheet_engine - Cell store and range formula evaluation.

pub mod engine;
