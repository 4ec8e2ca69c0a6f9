//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between grid labels (e.g., "A1", "B3",
//! "J10") and column/row coordinates. Columns are a single letter and
//! 0-indexed; rows are 1-based so they line up with the row labels shown in
//! the grid.
//!
//! # Examples
//!
//! ```
//! use gridsheet_engine::engine::CellRef;
//!
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!(cell.col, 1);
//! assert_eq!(cell.row, 3);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Number of columns addressable with a single letter label.
pub const MAX_COLS: usize = 26;

/// A reference to a cell by column index (0-indexed) and row number (1-based).
///
/// Ordering is row-major, so sorted collections of refs walk the grid the
/// same way it is displayed.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

fn a1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letter>[A-Za-z])(?<row>[0-9]+)$").expect("cell reference regex must compile")
    })
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference from grid notation (e.g., "A1", "c12").
    /// Returns None if the input is invalid or names row 0.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        Self::parse_a1(name)
    }

    fn parse_a1(name: &str) -> Option<CellRef> {
        let caps = a1_re().captures(name.trim())?;
        let col = Self::col_from_letter(caps["letter"].chars().next()?)?;
        let row = caps["row"].parse::<usize>().ok()?;
        if row == 0 {
            return None;
        }
        Some(CellRef::new(col, row))
    }

    /// Column index for a letter label, case-insensitive (`A`/`a` -> 0).
    pub fn col_from_letter(letter: char) -> Option<usize> {
        if letter.is_ascii_alphabetic() {
            Some((letter.to_ascii_uppercase() as u8 - b'A') as usize)
        } else {
            None
        }
    }

    /// Letter label for a column index (0 -> `A`). None past `Z`.
    pub fn col_to_letter(col: usize) -> Option<char> {
        if col < MAX_COLS {
            Some((b'A' + col as u8) as char)
        } else {
            None
        }
    }

    /// Header label for a column; indices past `Z` render as `#<index>`.
    pub fn col_label(col: usize) -> String {
        match Self::col_to_letter(col) {
            Some(letter) => letter.to_string(),
            None => format!("#{}", col),
        }
    }
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_label(self.col), self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::CellRef;

    #[test]
    fn test_parse_single_letter_columns() {
        let a1 = CellRef::from_str("A1").unwrap();
        assert_eq!((a1.col, a1.row), (0, 1));

        let j10 = CellRef::from_str("J10").unwrap();
        assert_eq!((j10.col, j10.row), (9, 10));

        let z1 = CellRef::from_str("Z1").unwrap();
        assert_eq!(z1.col, 25);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(CellRef::from_str("c7"), Some(CellRef::new(2, 7)));
    }

    #[test]
    fn test_parse_invalid_inputs() {
        assert!(CellRef::from_str("").is_none());
        assert!(CellRef::from_str("123").is_none());
        assert!(CellRef::from_str("AB1").is_none());
        assert!(CellRef::from_str("A0").is_none());
        assert!(CellRef::from_str("1A").is_none());
        assert!(CellRef::from_str("A 1").is_none());
    }

    #[test]
    fn test_parse_row_overflow_returns_none() {
        let huge = format!("A{}", "9".repeat(40));
        assert!(CellRef::from_str(&huge).is_none());
    }

    #[test]
    fn test_labels_are_bijective_within_single_letters() {
        for col in 0..super::MAX_COLS {
            for row in [1usize, 2, 10, 999] {
                let cell = CellRef::new(col, row);
                assert_eq!(CellRef::from_str(&cell.to_string()), Some(cell));
            }
        }
    }

    #[test]
    fn test_col_label_past_z() {
        assert_eq!(CellRef::col_label(25), "Z");
        assert_eq!(CellRef::col_label(26), "#26");
        assert!(CellRef::col_to_letter(26).is_none());
    }

    #[test]
    fn test_ordering_is_row_major() {
        let mut refs = vec![CellRef::new(1, 1), CellRef::new(0, 2), CellRef::new(0, 1)];
        refs.sort();
        assert_eq!(
            refs,
            vec![CellRef::new(0, 1), CellRef::new(1, 1), CellRef::new(0, 2)]
        );
    }
}
