use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellValue;
use tracing::debug;

/// A worksheet being collected cell by cell before it is flattened into rows.
pub(crate) struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells in the sheet
    pub(crate) cells: Vec<Cell>,
    /// Whether to drop rows without any cell
    skip_empty_rows: bool,
    /// Actual data range (determined from cell data)
    pub(crate) row_lower_bound: Option<usize>,
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_lower_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(crate) fn new(file_name: &str, name: &str, skip_empty_rows: bool) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
            skip_empty_rows,
            row_lower_bound: None,
            row_upper_bound: None,
            col_lower_bound: None,
            col_upper_bound: None,
        }
    }

    /// Returns true if the sheet contains no cells.
    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds a cell, widening the used range to include it.
    pub(crate) fn push(&mut self, cell: Cell) {
        self.update_bound(cell.row, cell.col);
        self.cells.push(cell);
    }

    fn update_bound(&mut self, row: usize, col: usize) {
        if self.row_lower_bound.map(|lower| row < lower).unwrap_or(true) {
            self.row_lower_bound = Some(row);
        }
        if self.row_upper_bound.map(|upper| upper < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
        if self.col_lower_bound.map(|lower| col < lower).unwrap_or(true) {
            self.col_lower_bound = Some(col);
        }
        if self.col_upper_bound.map(|upper| upper < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }

    /// Flattens the collected cells into a grid of rows.
    ///
    /// Rows start at the first used row and columns at the first used column.
    /// Each row is as long as its last used cell; gaps inside a row are
    /// [`CellValue::Empty`]. Rows without cells are dropped when skipping
    /// empty rows, and kept as empty rows otherwise.
    pub(crate) fn into_rows(mut self) -> Vec<Vec<CellValue>> {
        let (Some(row_lower), Some(row_upper), Some(col_lower), Some(col_upper)) = (
            self.row_lower_bound,
            self.row_upper_bound,
            self.col_lower_bound,
            self.col_upper_bound,
        ) else {
            return Vec::new();
        };
        self.cells.sort_by_key(|cell| (cell.row, cell.col));

        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        let mut cells = self.cells.into_iter().peekable();
        for row in row_lower..=row_upper {
            let mut record: Vec<CellValue> = Vec::with_capacity(col_upper - col_lower + 1);
            while let Some(cell) = cells.next_if(|cell| cell.row == row) {
                let offset = cell.col - col_lower;
                if record.len() <= offset {
                    record.resize(offset + 1, CellValue::Empty);
                }
                record[offset] = cell.value;
            }
            if record.is_empty() && self.skip_empty_rows {
                continue;
            }
            rows.push(record);
        }
        debug!(file = %self.file_name, sheet = %self.name, rows = rows.len(), "flattened worksheet");
        rows
    }
}
