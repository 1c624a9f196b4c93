//! # Threshold Analysis Module
//!
//! The in-memory model of a loaded survey sheet and the checks run against
//! it: per-frame violations, the columns that exceed their limit anywhere,
//! and counts of cells at or above a limit or a chosen value.
pub mod evaluator;
pub mod store;
pub mod thresholds;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// Frame number or comparison value is not a number
    #[error("Invalid input '{0}'")]
    InvalidInput(String),

    /// Too few rows are loaded for the requested check
    #[error("No data loaded")]
    DataUnavailable,

    /// Frame beyond the loaded rows
    #[error("Frame {0} out of range")]
    OutOfRange(i64),

    /// Column is not one of the analysed columns
    #[error("Column '{0}' is not in the analysis list")]
    InvalidColumn(String),

    /// Column is analysed but absent from the loaded header row
    #[error("Column '{0}' not found in sheet")]
    ColumnNotFound(String),

    /// Column has no limit and no comparison value was given
    #[error("No threshold defined for column '{0}'")]
    NoThresholdDefined(String),
}
