//! Lenient numeric parsing for hand-typed measurement cells and prompt input.
//!
//! Spreadsheet exports from survey vehicles mix clean numbers with units,
//! padding and placeholders (`"5.1 mm"`, `" 2450"`, `"n/a"`). Values are read
//! the forgiving way: skip leading whitespace, take the longest numeric prefix,
//! and treat anything without one as not-a-number.

/// Length in bytes of the longest decimal literal at the start of `text`
/// (sign, digits, fraction and exponent), or `None` if there is none.
fn numeric_prefix_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let digits_from = |mut cursor: usize| {
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        cursor
    };

    let mut end = match bytes.first() {
        Some(b'+') | Some(b'-') => 1,
        _ => 0,
    };
    let integer_end = digits_from(end);
    let mut mantissa_digits = integer_end - end;
    end = integer_end;

    if bytes.get(end) == Some(&b'.') {
        let fraction_end = digits_from(end + 1);
        mantissa_digits += fraction_end - (end + 1);
        if mantissa_digits > 0 {
            end = fraction_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut cursor = end + 1;
        if matches!(bytes.get(cursor), Some(b'+') | Some(b'-')) {
            cursor += 1;
        }
        let exponent_end = digits_from(cursor);
        if exponent_end > cursor {
            end = exponent_end;
        }
    }
    Some(end)
}

/// Parses the leading floating-point number of `text`.
///
/// `"12.5km"` yields `12.5`, `"  -3e2x"` yields `-300`, `"Infinity"` yields
/// positive infinity, while `"n/a"`, `""` and `"."` yield `None`.
pub(crate) fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if unsigned.starts_with("Infinity") {
        return Some(if text.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY });
    }
    let end = numeric_prefix_len(text)?;
    text[..end].parse::<f64>().ok()
}

/// Parses `text` as a number only if the whole trimmed string is numeric.
pub(crate) fn parse_float_exact(text: &str) -> Option<f64> {
    let text = text.trim();
    match numeric_prefix_len(text) {
        Some(end) if end == text.len() => text.parse::<f64>().ok(),
        _ => None,
    }
}

/// Parses the leading base-10 integer of `text`, e.g. `"12abc"` yields `12`.
/// Integers outside the `i64` range saturate to `i64::MIN` / `i64::MAX`.
pub(crate) fn parse_integer_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let negative = bytes.first() == Some(&b'-');
    let mut end = match bytes.first() {
        Some(b'+') | Some(b'-') => 1,
        _ => 0,
    };
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    let saturated = if negative { i64::MIN } else { i64::MAX };
    Some(text[..end].parse::<i64>().unwrap_or(saturated))
}
