use crate::analysis::EvaluationError;
use crate::spreadsheet::cell::CellValue;
use tracing::debug;

/// Physical index of the header row. Row 0 is a title row that is never read.
pub const HEADER_ROW: usize = 1;
/// Physical index of the row holding frame 0.
pub const FIRST_DATA_ROW: usize = 2;

/// The loaded sheet: raw rows as parsed, with the header at row 1 and one
/// row per video frame from row 2 on.
#[derive(Clone, Debug, Default)]
pub struct RowStore {
    rows: Vec<Vec<CellValue>>,
}

impl RowStore {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        RowStore { rows }
    }

    /// Replaces the whole sheet in a single assignment.
    pub fn load(&mut self, rows: Vec<Vec<CellValue>>) {
        debug!(rows = rows.len(), "replacing row store");
        self.rows = rows;
    }

    /// Number of physical rows, including the title and header rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The header row, or `None` when fewer than two rows are loaded.
    pub fn header(&self) -> Option<&[CellValue]> {
        self.rows.get(HEADER_ROW).map(Vec::as_slice)
    }

    /// Position of the first header cell equal to `column`.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.header()?.iter().position(|cell| cell.matches_name(column))
    }

    /// The row holding `frame`, i.e. physical row `frame + 2`.
    pub fn row_at(&self, frame: usize) -> Result<&[CellValue], EvaluationError> {
        frame
            .checked_add(FIRST_DATA_ROW)
            .and_then(|index| self.rows.get(index))
            .map(Vec::as_slice)
            .ok_or(EvaluationError::OutOfRange(i64::try_from(frame).unwrap_or(i64::MAX)))
    }

    /// All frame rows, from physical row 2 onward.
    pub fn data_rows(&self) -> &[Vec<CellValue>] {
        self.rows.get(FIRST_DATA_ROW..).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RowStore {
        RowStore::new(vec![
            vec![CellValue::from("NH-48 survey")],
            vec![CellValue::from("Chainage"), CellValue::from("L2 Rut Depth (in mm)")],
            vec![CellValue::Number(0.0), CellValue::Number(5.1)],
            vec![CellValue::Number(10.0)],
        ])
    }

    #[test]
    fn header_is_second_row() {
        let store = store();
        assert_eq!(store.header().map(|header| header.len()), Some(2));
        assert_eq!(store.column_index("L2 Rut Depth (in mm)"), Some(1));
        assert_eq!(store.column_index("NH-48 survey"), None);
        assert_eq!(store.column_index("L3 Rut Depth (in mm)"), None);
    }

    #[test]
    fn frames_are_offset_by_two() {
        let store = store();
        assert_eq!(store.row_at(0).unwrap()[1], CellValue::Number(5.1));
        assert_eq!(store.row_at(1).unwrap().len(), 1);
        assert!(matches!(store.row_at(2), Err(EvaluationError::OutOfRange(2))));
        assert!(matches!(store.row_at(usize::MAX), Err(EvaluationError::OutOfRange(i64::MAX))));
        assert_eq!(store.data_rows().len(), 2);
    }

    #[test]
    fn short_sheets() {
        let empty = RowStore::default();
        assert!(empty.is_empty());
        assert!(empty.header().is_none());
        assert!(empty.data_rows().is_empty());
        assert_eq!(empty.column_index("Chainage"), None);

        let header_only = RowStore::new(vec![vec![], vec![CellValue::from("Chainage")]]);
        assert!(header_only.header().is_some());
        assert!(header_only.data_rows().is_empty());
    }

    #[test]
    fn load_replaces_rows() {
        let mut store = store();
        store.load(vec![vec![CellValue::from("only")]]);
        assert_eq!(store.len(), 1);
        assert!(store.header().is_none());
    }
}
