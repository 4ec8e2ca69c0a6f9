//! Aggregate evaluation over a parsed range.
//!
//! Values are collected from the covered cells that hold numeric text (see
//! [`coerce_number`]) and folded with the formula's operation. Empty text
//! counts as the number zero, so blank cells inside a range contribute to
//! both `SUM` and `COUNT`.
//!
//! Whether a cell takes part and what it contributes are decided separately:
//! the value is the longest decimal prefix of the text (see [`cell_value`]),
//! so `0x1F` takes part but contributes 0.

use super::cell::Grid;
use super::format::format_number;
use super::range::{AggregateOp, RangeFormula};

/// Result of evaluating a range formula.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluation {
    pub op: AggregateOp,
    pub value: f64,
    /// Number of numeric cells that took part.
    pub included: usize,
}

impl Evaluation {
    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
    }

    /// MAX/MIN over a range with no numeric cells produce an unbounded
    /// value instead of an error. Callers can tell that case apart here.
    pub fn is_non_finite(&self) -> bool {
        !self.is_finite()
    }

    /// Text written back into the target cell.
    pub fn display(&self) -> String {
        format_number(self.value)
    }
}

/// Evaluate `formula` against the grid.
pub fn evaluate(grid: &Grid, formula: &RangeFormula) -> Evaluation {
    let last_row = grid.row_count();
    let values: Vec<f64> = formula
        .coords()
        // Rows past the end of the grid hold no cells.
        .take_while(|cell_ref| cell_ref.row <= last_row)
        .filter_map(|cell_ref| grid.get(&cell_ref).and_then(cell_value))
        .collect();

    let value = aggregate(formula.op, &values);
    if !value.is_finite() {
        tracing::warn!(formula = %formula, value = %format_number(value), "non-finite formula result");
    }

    Evaluation {
        op: formula.op,
        value,
        included: values.len(),
    }
}

/// Fold `values` with `op`.
///
/// `SUM` and `AVERAGE` of nothing are 0. `MAX` of nothing is -inf and `MIN`
/// of nothing is +inf.
pub fn aggregate(op: AggregateOp, values: &[f64]) -> f64 {
    let sum = || values.iter().fold(0.0, |acc, v| acc + v);
    match op {
        AggregateOp::Sum => sum(),
        AggregateOp::Average => {
            if values.is_empty() {
                0.0
            } else {
                sum() / values.len() as f64
            }
        }
        AggregateOp::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        AggregateOp::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        AggregateOp::Count => values.len() as f64,
    }
}

/// Interpret cell text as a number the way a browser's `Number(text)` would.
///
/// - surrounding whitespace is ignored; empty text is 0
/// - decimal literals with optional sign, fraction and exponent
/// - `0x`, `0o` and `0b` integer literals (unsigned)
/// - `Infinity`, `+Infinity`, `-Infinity`
///
/// Anything else is not a number.
pub fn coerce_number(text: &str) -> Option<f64> {
    let s = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if s.is_empty() {
        return Some(0.0);
    }

    if let Some(n) = parse_radix_literal(s) {
        return Some(n);
    }

    let (sign, body) = match s.as_bytes()[0] {
        b'+' => (1.0, &s[1..]),
        b'-' => (-1.0, &s[1..]),
        _ => (1.0, s),
    };
    if body == "Infinity" {
        return Some(sign * f64::INFINITY);
    }
    if !is_decimal_literal(body) {
        return None;
    }
    body.parse::<f64>().ok().map(|n| sign * n)
}

/// The value a cell contributes to an aggregate, or `None` when the cell is
/// not numeric under [`coerce_number`].
///
/// Numeric text contributes its longest leading decimal number, read the
/// way a browser's `parseFloat` reads it. Text with no such prefix (empty
/// or blank text) contributes 0.
pub fn cell_value(text: &str) -> Option<f64> {
    coerce_number(text)?;
    Some(decimal_prefix(text).unwrap_or(0.0))
}

/// Longest `[+|-] (Infinity | decimal literal)` at the start of `text`,
/// after leading whitespace.
fn decimal_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let bytes = s.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    if s[i..].starts_with("Infinity") {
        let sign = if bytes.first() == Some(&b'-') { -1.0 } else { 1.0 };
        return Some(sign * f64::INFINITY);
    }

    let mut mantissa_digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        mantissa_digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
            mantissa_digits += 1;
        }
        if mantissa_digits > 0 {
            i = j;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    s[..i].parse::<f64>().ok()
}

fn parse_radix_literal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    s[2..].chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    })
}

/// `digits [. digits] [(e|E) [+|-] digits]` with at least one mantissa digit.
/// Either side of the decimal point may be empty (`5.`, `.5`).
fn is_decimal_literal(body: &str) -> bool {
    let bytes = body.as_bytes();
    let mut i = 0;
    let mut mantissa_digits = 0;

    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        mantissa_digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return false;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CellRef, parse_formula};

    fn grid_with_column_a(values: &[&str]) -> Grid {
        let mut grid = Grid::new(10, 10).unwrap();
        for (idx, v) in values.iter().enumerate() {
            grid.set(&CellRef::new(0, idx + 1), v);
        }
        grid
    }

    fn eval(grid: &Grid, input: &str) -> Evaluation {
        evaluate(grid, &parse_formula(input).unwrap())
    }

    #[test]
    fn test_sum_counts_empty_text_as_zero() {
        let grid = grid_with_column_a(&["1", "", "3"]);
        let result = eval(&grid, "SUM(A1:A3)");
        assert_eq!(result.value, 4.0);
        assert_eq!(result.display(), "4");
    }

    #[test]
    fn test_count_includes_empty_text() {
        let grid = grid_with_column_a(&["1", "", "3"]);
        assert_eq!(eval(&grid, "COUNT(A1:A3)").value, 3.0);
    }

    #[test]
    fn test_non_numeric_text_is_skipped() {
        let grid = grid_with_column_a(&["1", "apple", "3", "4x"]);
        let result = eval(&grid, "COUNT(A1:A4)");
        assert_eq!(result.value, 2.0);
        assert_eq!(eval(&grid, "AVERAGE(A1:A4)").value, 2.0);
    }

    #[test]
    fn test_average_of_empty_range_is_zero() {
        let grid = grid_with_column_a(&["1", "2"]);
        let result = eval(&grid, "AVERAGE(A5:A2)");
        assert_eq!(result.value, 0.0);
        assert_eq!(result.included, 0);
        assert!(result.is_finite());
    }

    #[test]
    fn test_max_min() {
        let grid = grid_with_column_a(&["4", "-2.5", "10", "x"]);
        assert_eq!(eval(&grid, "MAX(A1:A4)").value, 10.0);
        assert_eq!(eval(&grid, "MIN(A1:A4)").value, -2.5);
    }

    #[test]
    fn test_max_min_of_empty_set_are_non_finite() {
        let grid = grid_with_column_a(&["a", "b"]);
        let max = eval(&grid, "MAX(A1:A2)");
        let min = eval(&grid, "MIN(A1:A2)");
        assert!(max.is_non_finite());
        assert!(min.is_non_finite());
        assert_eq!(max.display(), "-Infinity");
        assert_eq!(min.display(), "Infinity");
    }

    #[test]
    fn test_range_past_grid_end_is_ignored() {
        let grid = grid_with_column_a(&["2", "2"]);
        let result = eval(&grid, "SUM(A1:A999999999999)");
        // Rows 3..=10 exist and are empty, so they count as zeros.
        assert_eq!(result.value, 4.0);
        assert_eq!(result.included, 10);
    }

    #[test]
    fn test_column_outside_grid_has_no_values() {
        let grid = grid_with_column_a(&["1"]);
        let result = eval(&grid, "COUNT(Z1:Z3)");
        assert_eq!(result.value, 0.0);
    }

    #[test]
    fn test_radix_literals_take_part_but_contribute_zero() {
        let grid = grid_with_column_a(&["0x1F", "5"]);
        assert_eq!(eval(&grid, "MAX(A1:A2)").display(), "5");
        assert_eq!(eval(&grid, "SUM(A1:A2)").value, 5.0);
        assert_eq!(eval(&grid, "COUNT(A1:A2)").value, 2.0);
        assert_eq!(eval(&grid, "AVERAGE(A1:A2)").value, 2.5);
    }

    #[test]
    fn test_start_without_column_letter_evaluates_nothing() {
        let grid = grid_with_column_a(&["1", "2", "3"]);
        assert_eq!(eval(&grid, "SUM(11:13)").display(), "0");
        assert_eq!(eval(&grid, "COUNT( A1:A3)").value, 0.0);
        assert_eq!(eval(&grid, "MAX(11:13)").display(), "-Infinity");
    }

    #[test]
    fn test_cell_value() {
        assert_eq!(cell_value("42"), Some(42.0));
        assert_eq!(cell_value(" -2.5e1 "), Some(-25.0));
        assert_eq!(cell_value(".5"), Some(0.5));
        assert_eq!(cell_value("5."), Some(5.0));
        assert_eq!(cell_value("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(cell_value("0x1F"), Some(0.0));
        assert_eq!(cell_value("0b101"), Some(0.0));
        assert_eq!(cell_value(""), Some(0.0));
        assert_eq!(cell_value("   "), Some(0.0));
        assert_eq!(cell_value("12px"), None);
        assert_eq!(cell_value("apple"), None);
    }

    #[test]
    fn test_coerce_number_decimal_forms() {
        assert_eq!(coerce_number("42"), Some(42.0));
        assert_eq!(coerce_number("  -3.5 "), Some(-3.5));
        assert_eq!(coerce_number("+7"), Some(7.0));
        assert_eq!(coerce_number(".5"), Some(0.5));
        assert_eq!(coerce_number("5."), Some(5.0));
        assert_eq!(coerce_number("1e3"), Some(1000.0));
        assert_eq!(coerce_number("2.5E-1"), Some(0.25));
        assert_eq!(coerce_number(""), Some(0.0));
        assert_eq!(coerce_number("   "), Some(0.0));
    }

    #[test]
    fn test_coerce_number_special_forms() {
        assert_eq!(coerce_number("0x1F"), Some(31.0));
        assert_eq!(coerce_number("0b101"), Some(5.0));
        assert_eq!(coerce_number("0o17"), Some(15.0));
        assert_eq!(coerce_number("Infinity"), Some(f64::INFINITY));
        assert_eq!(coerce_number("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_coerce_number_rejects_non_numbers() {
        for text in [
            "abc", "1,000", "1e", "e5", ".", "-", "inf", "NaN", "nan", "infinity", "0x", "-0x10",
            "1 2", "- 1", "12px",
        ] {
            assert_eq!(coerce_number(text), None, "{text:?} should not be numeric");
        }
    }

    #[test]
    fn test_aggregate_direct() {
        assert_eq!(aggregate(AggregateOp::Sum, &[]), 0.0);
        assert_eq!(aggregate(AggregateOp::Count, &[]), 0.0);
        assert_eq!(aggregate(AggregateOp::Average, &[1.0, 2.0]), 1.5);
        assert_eq!(aggregate(AggregateOp::Max, &[]), f64::NEG_INFINITY);
        assert_eq!(aggregate(AggregateOp::Min, &[]), f64::INFINITY);
    }
}
