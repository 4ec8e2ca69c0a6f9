//! Range formula parsing.
//!
//! A range formula is one of the aggregate functions applied to a vertical
//! span of cells, e.g. `SUM(A1:A5)` or `average(b2:b9)`. The call is searched
//! for anywhere in the input, so surrounding text such as a leading `=` is
//! tolerated.
//!
//! Only the start token's first character selects the column: `SUM(A1:B5)`
//! covers A1..A5. The end token contributes its row number and nothing else.
//! When that character is not a column letter (`SUM(11:13)`, `SUM( A1:A3)`)
//! the range still parses but addresses no cells.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::cell_ref::CellRef;
use super::error::FormulaError;

/// The aggregate functions a formula can apply to a range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AggregateOp {
    Sum,
    Average,
    Max,
    Min,
    Count,
}

impl AggregateOp {
    pub const ALL: [AggregateOp; 5] = [
        AggregateOp::Sum,
        AggregateOp::Average,
        AggregateOp::Max,
        AggregateOp::Min,
        AggregateOp::Count,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AggregateOp::Sum => "SUM",
            AggregateOp::Average => "AVERAGE",
            AggregateOp::Max => "MAX",
            AggregateOp::Min => "MIN",
            AggregateOp::Count => "COUNT",
        }
    }

    /// Look up an operation by name, case-insensitive.
    pub fn from_name(name: &str) -> Option<AggregateOp> {
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed formula: an operation over rows `start_row..=end_row` of one column.
///
/// `col` is `None` when the start token did not begin with a column letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeFormula {
    pub op: AggregateOp,
    pub col: Option<usize>,
    pub start_row: usize,
    pub end_row: usize,
}

impl RangeFormula {
    pub fn start(&self) -> Option<CellRef> {
        self.col.map(|col| CellRef::new(col, self.start_row))
    }

    pub fn end(&self) -> Option<CellRef> {
        self.col.map(|col| CellRef::new(col, self.end_row))
    }

    /// True when no cells are covered: the start row is past the end row or
    /// there is no column.
    pub fn is_empty(&self) -> bool {
        self.col.is_none() || self.start_row > self.end_row
    }

    /// Covered coordinates in ascending row order. Rows are not reordered:
    /// a reversed range yields nothing.
    pub fn coords(&self) -> impl Iterator<Item = CellRef> + use<> {
        let (start_row, end_row) = (self.start_row, self.end_row);
        self.col
            .into_iter()
            .flat_map(move |col| (start_row..=end_row).map(move |row| CellRef::new(col, row)))
    }
}

impl fmt::Display for RangeFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.col.map(CellRef::col_label).unwrap_or_else(|| "?".to_string());
        write!(
            f,
            "{}({}{}:{}{})",
            self.op, label, self.start_row, label, self.end_row
        )
    }
}

fn formula_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let names = AggregateOp::ALL
            .iter()
            .map(|op| op.name())
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?i)({})\((.*)\)", names)).expect("formula regex must compile")
    })
}

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("digits regex must compile"))
}

/// First run of digits in a range token, as a row number.
fn token_row(token: &str) -> Result<usize, FormulaError> {
    let digits = digits_re()
        .find(token)
        .ok_or_else(|| FormulaError::InvalidRange(format!("no row number in '{}'", token)))?;
    digits
        .as_str()
        .parse::<usize>()
        .map_err(|_| FormulaError::InvalidRange(format!("row number too large in '{}'", token)))
}

/// Parse formula input into an operation and the range it covers.
///
/// Errors:
/// - [`FormulaError::InvalidFormula`] when no `OP(...)` call is present
/// - [`FormulaError::InvalidRange`] when either side of `:` is missing or a
///   token has no row
pub fn parse_formula(input: &str) -> Result<RangeFormula, FormulaError> {
    let caps = formula_re()
        .captures(input)
        .ok_or_else(|| FormulaError::InvalidFormula(input.trim().to_string()))?;
    let op = AggregateOp::from_name(&caps[1])
        .ok_or_else(|| FormulaError::InvalidFormula(caps[1].to_string()))?;
    let range = &caps[2];

    let mut parts = range.split(':');
    let start = parts.next().unwrap_or_default();
    let end = parts.next().unwrap_or_default();
    if start.is_empty() || end.is_empty() {
        return Err(FormulaError::InvalidRange(range.to_string()));
    }

    let col = start.chars().next().and_then(CellRef::col_from_letter);

    Ok(RangeFormula {
        op,
        col,
        start_row: token_row(start)?,
        end_row: token_row(end)?,
    })
}
