use std::str::FromStr;

/// How raw CSV bytes are decoded into text fields.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TextEncoding {
    /// Decode as UTF-8; fields with invalid UTF-8 fall back to Windows-1252.
    #[default]
    Auto,
    /// Decode as UTF-8 and reject invalid byte sequences.
    Utf8,
    /// Decode as Windows-1252 (aka CP-1252).
    Windows1252,
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "auto" => Ok(Self::Auto),
            "utf8" => Ok(Self::Utf8),
            "windows1252" | "cp1252" => Ok(Self::Windows1252),
            _ => Err(format!("unknown encoding '{name}'")),
        }
    }
}

/// Options controlling how a data file is turned into rows.
#[derive(Clone, Debug)]
pub struct Criteria {
    /// Field delimiter for delimited text (default: comma).
    pub delimiter: u8,

    /// Skip rows where all cells are empty.
    pub skip_empty_rows: bool,

    /// Text decoding for delimited files.
    pub encoding: TextEncoding,
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria {
            delimiter: b',',
            skip_empty_rows: true,
            encoding: TextEncoding::Auto,
        }
    }
}
