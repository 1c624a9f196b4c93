use crate::analysis::store::RowStore;
use crate::analysis::store::FIRST_DATA_ROW;
use crate::analysis::store::HEADER_ROW;
use crate::analysis::thresholds::ThresholdTable;
use crate::analysis::EvaluationError;
use crate::helpers::number::parse_float_prefix;
use crate::helpers::number::parse_integer_prefix;
use crate::spreadsheet::cell::CellValue;
use std::fmt::Display;
use tracing::debug;

/// A measurement at or above its column's limit.
#[derive(Clone, Debug, PartialEq)]
pub struct Violation {
    pub column: &'static str,
    pub value: f64,
    pub threshold: f64,
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ≥ {}", self.column, self.value, self.threshold)
    }
}

/// Violations found on one frame; an empty list means the frame is clean.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub frame: usize,
    pub violations: Vec<Violation>,
}

impl Display for FrameReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.violations.is_empty() {
            return write!(f, "Frame {} — No threshold violations.", self.frame);
        }
        write!(f, "Frame {} — Violations found:", self.frame)?;
        for violation in &self.violations {
            write!(f, "\n{}", violation)?;
        }
        Ok(())
    }
}

/// A column with at least one frame at or above its limit.
#[derive(Clone, Debug, PartialEq)]
pub struct ExceedingColumn {
    pub column: &'static str,
    pub threshold: f64,
}

impl Display for ExceedingColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.column, self.threshold)
    }
}

/// What the cells of a column were compared against.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Comparison {
    /// The column's own limit
    Threshold(f64),
    /// A value supplied by the inspector
    Value(f64),
}

impl Comparison {
    pub fn value(&self) -> f64 {
        match self {
            Comparison::Threshold(value) | Comparison::Value(value) => *value,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExceedanceCount {
    pub column: String,
    pub comparison: Comparison,
    pub count: usize,
}

impl Display for ExceedanceCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.comparison {
            Comparison::Threshold(threshold) => write!(f, "Cells >= threshold ({}): {}", threshold, self.count),
            Comparison::Value(value) => write!(f, "Cells >= {}: {}", value, self.count),
        }
    }
}

/// Read-only checks over a loaded sheet. Every operation is a pure scan of
/// the rows against the threshold table.
pub struct Evaluator<'a> {
    thresholds: &'a ThresholdTable,
    store: &'a RowStore,
}

impl<'a> Evaluator<'a> {
    pub fn new(thresholds: &'a ThresholdTable, store: &'a RowStore) -> Self {
        Evaluator { thresholds, store }
    }

    /// Checks the frame typed by the inspector.
    ///
    /// Needs at least one frame row loaded and a non-empty input. The input
    /// is read as a leading integer (`"12abc"` is frame 12); integers too
    /// large for `i64` saturate and end up out of range.
    pub fn check_frame(&self, input: &str) -> Result<FrameReport, EvaluationError> {
        if input.is_empty() || self.store.len() <= FIRST_DATA_ROW {
            return Err(EvaluationError::DataUnavailable);
        }
        let frame = parse_integer_prefix(input)
            .ok_or_else(|| EvaluationError::InvalidInput(input.to_owned()))?;
        let frame = usize::try_from(frame).map_err(|_| EvaluationError::OutOfRange(frame))?;
        let violations = self.violations_at(frame)?;
        debug!(frame, violations = violations.len(), "checked frame");
        Ok(FrameReport { frame, violations })
    }

    /// Every analysed column whose cell on `frame` is at or above its limit,
    /// in table order. Columns missing from the header, without a limit, or
    /// with a non-numeric cell are skipped.
    pub fn violations_at(&self, frame: usize) -> Result<Vec<Violation>, EvaluationError> {
        let row = self.store.row_at(frame)?;
        let violations = self
            .thresholds
            .entries()
            .filter_map(|(column, threshold)| {
                let index = self.store.column_index(column)?;
                let threshold = threshold.limit()?;
                let value = cell_number(row, index)?;
                (value >= threshold).then_some(Violation { column, value, threshold })
            })
            .collect();
        Ok(violations)
    }

    /// Columns with a limit that at least one frame meets or exceeds.
    pub fn exceeding_columns_summary(&self) -> Result<Vec<ExceedingColumn>, EvaluationError> {
        if self.store.len() <= HEADER_ROW {
            return Err(EvaluationError::DataUnavailable);
        }
        let rows = self.store.data_rows();
        let columns: Vec<ExceedingColumn> = self
            .thresholds
            .entries()
            .filter_map(|(column, threshold)| {
                let index = self.store.column_index(column)?;
                let threshold = threshold.limit()?;
                rows.iter()
                    .any(|row| cell_number(row, index).is_some_and(|value| value >= threshold))
                    .then_some(ExceedingColumn { column, threshold })
            })
            .collect();
        debug!(frames = rows.len(), columns = columns.len(), "summarised exceeding columns");
        Ok(columns)
    }

    /// Counts the frames whose `column` cell is at or above the comparison
    /// value: the column's limit when `comparison_value` is `None`, otherwise
    /// the leading number of the given text. Non-numeric cells are not counted.
    pub fn count_exceeding(
        &self,
        column: &str,
        comparison_value: Option<&str>,
    ) -> Result<ExceedanceCount, EvaluationError> {
        let threshold = self
            .thresholds
            .lookup(column)
            .ok_or_else(|| EvaluationError::InvalidColumn(column.to_owned()))?;
        if self.store.len() <= HEADER_ROW {
            return Err(EvaluationError::DataUnavailable);
        }
        let index = self
            .store
            .column_index(column)
            .ok_or_else(|| EvaluationError::ColumnNotFound(column.to_owned()))?;
        let comparison = match comparison_value {
            None => threshold
                .limit()
                .map(Comparison::Threshold)
                .ok_or_else(|| EvaluationError::NoThresholdDefined(column.to_owned()))?,
            Some(text) => parse_float_prefix(text)
                .map(Comparison::Value)
                .ok_or_else(|| EvaluationError::InvalidInput(text.to_owned()))?,
        };
        let count = self.count_at_least(index, comparison.value());
        debug!(column, comparison = comparison.value(), count, "counted exceeding cells");
        Ok(ExceedanceCount {
            column: column.to_owned(),
            comparison,
            count,
        })
    }

    /// Number of frame rows whose cell at `index` is a number `>= value`.
    pub fn count_at_least(&self, index: usize, value: f64) -> usize {
        self.store
            .data_rows()
            .iter()
            .filter(|row| cell_number(row, index).is_some_and(|number| number >= value))
            .count()
    }
}

/// Numeric value of the cell at `index`; absent cells of ragged rows are not numbers.
fn cell_number(row: &[CellValue], index: usize) -> Option<f64> {
    row.get(index).and_then(CellValue::to_number)
}
