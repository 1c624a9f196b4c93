//! Conversion between A1-style cell references and 0-based (row, column) indexes.

/// Columns in an xlsx worksheet, `A` to `XFD`.
pub(crate) const MAX_COLUMNS: usize = 16_384;

/// Rows in an xlsx worksheet.
pub(crate) const MAX_ROWS: usize = 1_048_576;

/// Converts column letters to a 0-based column index: `A` = 0, `Z` = 25, `AA` = 26.
/// Columns past `XFD` are rejected.
pub(crate) fn col_to_index(letters: &str) -> Option<usize> {
    if letters.is_empty() || !letters.bytes().all(|byte| byte.is_ascii_alphabetic()) {
        return None;
    }
    letters
        .to_ascii_uppercase()
        .bytes()
        .map(|byte| (byte - b'A') as usize + 1)
        .try_fold(0usize, |index, digit| {
            Some(index.checked_mul(26)?.checked_add(digit)?).filter(|column| *column <= MAX_COLUMNS)
        })
        .map(|column| column - 1)
}

/// Converts a 1-based row number to a 0-based row index.
pub(crate) fn row_to_index(number: &str) -> Option<usize> {
    number
        .parse::<usize>()
        .ok()
        .filter(|row| (1..=MAX_ROWS).contains(row))
        .map(|row| row - 1)
}

/// Splits a reference such as `"AB12"` into `(row, col)` indexes, `(11, 27)`.
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let split = reference.find(|character: char| character.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    Some((row_to_index(digits)?, col_to_index(letters)?))
}

/// Builds the A1-style reference of a 0-based `(row, col)` position.
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    let mut column = col + 1;
    let mut letters = Vec::new();
    while column > 0 {
        column -= 1;
        letters.push(b'A' + (column % 26) as u8);
        column /= 26;
    }
    letters.reverse();
    format!("{}{}", String::from_utf8_lossy(&letters), row + 1)
}
