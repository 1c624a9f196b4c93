use crate::helpers::number::parse_float_exact;
use crate::helpers::number::parse_float_prefix;
use crate::spreadsheet::reference::index_to_reference;
use std::fmt::Display;

/// Raw value of one cell, as produced by the CSV or XLSX reader.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    /// Numeric values
    Number(f64),
    /// Text values (shared, inline or formula strings, CSV fields)
    Text(String),
    /// Boolean values (true/false)
    Boolean(bool),
    /// Error literals such as `#N/A`
    Error(String),
}

impl CellValue {
    /// Types a delimited-text field: blank fields are empty, fully numeric
    /// fields are numbers, everything else stays text.
    pub fn from_text(field: &str) -> Self {
        if field.is_empty() {
            CellValue::Empty
        } else if let Some(number) = parse_float_exact(field) {
            CellValue::Number(number)
        } else {
            CellValue::Text(field.to_owned())
        }
    }

    /// Returns true if the cell holds nothing (or only an empty string).
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    /// Interprets the cell as a measurement.
    ///
    /// Text is parsed leniently by numeric prefix; booleans, errors, blanks and
    /// NaN are not numbers.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(number) if !number.is_nan() => Some(*number),
            CellValue::Text(text) => parse_float_prefix(text),
            _ => None,
        }
    }

    /// Exact text comparison used for header lookups.
    pub fn matches_name(&self, name: &str) -> bool {
        match self {
            CellValue::Text(text) => text == name,
            _ => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_owned())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(number) => write!(f, "{}", number),
            CellValue::Text(text) | CellValue::Error(text) => write!(f, "{}", text),
            CellValue::Boolean(value) => write!(f, "{}", value),
        }
    }
}

/// A positioned cell collected while streaming a worksheet.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    pub(crate) value: CellValue,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }
}
