//! # Spreadsheet Ingestion Module
//!
//! Turns an uploaded road-survey data file into an ordered grid of raw cell
//! values. Two formats are accepted: delimited text (`.csv`) and Office Open
//! XML workbooks (`.xlsx`, first worksheet only). Both converge to
//! `Vec<Vec<CellValue>>`, which the row store consumes as-is.
pub mod cell;
pub mod criteria;
pub(crate) mod delimited;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod xlsx;

use crate::error::InspectorError;
use crate::error::ResultMessage;
use crate::helpers::reader::SourceReader;
use crate::spreadsheet::cell::CellValue;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::delimited::CsvSpreadsheet;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Unsupported file type '{0}'. Please upload .csv or .xlsx")]
    UnsupportedFileType(String),

    #[error("Workbook '{0}' contains no worksheets")]
    EmptyWorkbook(String),

    #[error("Missing workbook part '{0}'")]
    MissingPart(String),

    #[error("Invalid UTF-8 text on line {line}")]
    InvalidText { line: u64 },

    #[error("Data file '{0}' has already been read")]
    AlreadyConsumed(String),
}

/// Supported data file formats, detected from the file extension.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xlsx,
}

impl FileKind {
    /// Detects the format from the extension of `file_name`, ignoring case.
    pub fn detect(file_name: &str) -> Result<FileKind, SpreadsheetError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|extension| extension.to_str())
            .map(|extension| extension.to_ascii_lowercase());
        match extension.as_deref() {
            Some("csv") => Ok(FileKind::Csv),
            Some("xlsx") => Ok(FileKind::Xlsx),
            _ => Err(SpreadsheetError::UnsupportedFileType(file_name.to_owned())),
        }
    }
}

/// A data file that can be read into rows of raw cells.
pub(crate) trait Spreadsheet {
    /// Returns the file name of this data file
    fn name(&self) -> String;

    /// Reads the (first) sheet into rows of raw cell values.
    fn read_rows(&mut self, criteria: &Criteria) -> Result<Vec<Vec<CellValue>>, InspectorError>;
}

fn open_source(file_name: &str, reader: SourceReader) -> Result<Box<dyn Spreadsheet>, InspectorError> {
    let spreadsheet: Box<dyn Spreadsheet> = match FileKind::detect(file_name)? {
        FileKind::Csv => Box::new(CsvSpreadsheet::new(file_name, reader)),
        FileKind::Xlsx => Box::new(XlsxSpreadsheet::new(file_name, reader)?),
    };
    debug!(file = %spreadsheet.name(), "opened data file");
    Ok(spreadsheet)
}

/// Opens a data file on disk. The extension is checked before the file is touched.
pub(crate) fn open_spreadsheet(file_name: &str) -> Result<Box<dyn Spreadsheet>, InspectorError> {
    FileKind::detect(file_name)?;
    open_source(file_name, SourceReader::open(file_name)?)
}

/// Opens an uploaded data file from its name and contents.
pub(crate) fn open_spreadsheet_bytes(file_name: &str, bytes: Vec<u8>) -> Result<Box<dyn Spreadsheet>, InspectorError> {
    open_source(file_name, SourceReader::from_bytes(bytes))
}

/// Reads a data file on disk into rows.
pub fn read_file(file_name: &str, criteria: &Criteria) -> Result<Vec<Vec<CellValue>>, InspectorError> {
    FileKind::detect(file_name)?;
    let rows = open_spreadsheet(file_name)
        .and_then(|mut spreadsheet| spreadsheet.read_rows(criteria))
        .with_prefix(&format!("Load '{file_name}'"))?;
    debug!(file = file_name, rows = rows.len(), "loaded data file");
    Ok(rows)
}

/// Reads uploaded file contents into rows; `file_name` selects the format.
pub fn read_bytes(file_name: &str, bytes: Vec<u8>, criteria: &Criteria) -> Result<Vec<Vec<CellValue>>, InspectorError> {
    FileKind::detect(file_name)?;
    let rows = open_spreadsheet_bytes(file_name, bytes)
        .and_then(|mut spreadsheet| spreadsheet.read_rows(criteria))
        .with_prefix(&format!("Load '{file_name}'"))?;
    debug!(file = file_name, rows = rows.len(), "loaded uploaded file");
    Ok(rows)
}
