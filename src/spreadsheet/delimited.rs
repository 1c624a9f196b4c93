use crate::error::InspectorError;
use crate::helpers::reader::SourceReader;
use crate::spreadsheet::cell::CellValue;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::criteria::TextEncoding;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use csv::ByteRecord;
use encoding_rs::WINDOWS_1252;
use std::borrow::Cow;
use tracing::debug;

/// A comma-separated (or otherwise delimited) data export.
pub(crate) struct CsvSpreadsheet {
    /// File name of the data file
    pub(crate) name: String,
    reader: Option<SourceReader>,
}

impl CsvSpreadsheet {
    pub(crate) fn new(file_name: &str, reader: SourceReader) -> CsvSpreadsheet {
        CsvSpreadsheet {
            name: file_name.to_owned(),
            reader: Some(reader),
        }
    }
}

impl Spreadsheet for CsvSpreadsheet {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    /// Reads every record as one row. Header rows get no special treatment
    /// here; record lengths may differ.
    fn read_rows(&mut self, criteria: &Criteria) -> Result<Vec<Vec<CellValue>>, InspectorError> {
        let reader = self
            .reader
            .take()
            .ok_or_else(|| SpreadsheetError::AlreadyConsumed(self.name.to_owned()))?;
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(criteria.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        let mut record = ByteRecord::new();
        let mut line = 0u64;
        while csv_reader.read_byte_record(&mut record)? {
            line += 1;
            let row = record
                .iter()
                .map(|field| decode_field(field, criteria.encoding, line))
                .map(|field| field.map(|text| CellValue::from_text(&text)))
                .collect::<Result<Vec<CellValue>, SpreadsheetError>>()?;
            // Blank lines never reach here; only `[""]` counts as empty.
            if criteria.skip_empty_rows && matches!(row.as_slice(), [CellValue::Empty]) {
                continue;
            }
            rows.push(row);
        }
        debug!(file = %self.name, records = line, rows = rows.len(), "read delimited file");
        Ok(rows)
    }
}

fn decode_field(field: &[u8], encoding: TextEncoding, line: u64) -> Result<Cow<'_, str>, SpreadsheetError> {
    match encoding {
        TextEncoding::Utf8 => std::str::from_utf8(field)
            .map(Cow::Borrowed)
            .map_err(|_| SpreadsheetError::InvalidText { line }),
        TextEncoding::Windows1252 => Ok(WINDOWS_1252.decode_without_bom_handling(field).0),
        TextEncoding::Auto => match std::str::from_utf8(field) {
            Ok(text) => Ok(Cow::Borrowed(text)),
            Err(_) => Ok(WINDOWS_1252.decode_without_bom_handling(field).0),
        },
    }
}
