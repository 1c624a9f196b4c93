use crate::error::InspectorError;
use crate::helpers::reader::SourceReader;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellValue;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::reference::row_to_index;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::BufRead;
use tracing::debug;
use tracing::warn;
use zip::ZipArchive;

/// Element names of the SpreadsheetML parts that are read.
mod tag {
    use quick_xml::name::QName;

    pub(super) const RELATIONSHIP: &[u8] = b"Relationship";
    pub(super) const SHEET: QName = QName(b"sheet");
    pub(super) const STRING_ITEM: QName = QName(b"si");
    /// Ruby (phonetic) run, not part of the displayed text
    pub(super) const PHONETIC_RUN: QName = QName(b"rPh");
    pub(super) const TEXT: QName = QName(b"t");
    pub(super) const ROW: QName = QName(b"row");
    pub(super) const CELL: QName = QName(b"c");
    pub(super) const INLINE_STRING: QName = QName(b"is");
    pub(super) const VALUE: QName = QName(b"v");
}

/// How the text of a `<c>` element is to be interpreted, from its `t` attribute.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
enum CellKind {
    #[default]
    Number,
    SharedString,
    InlineString,
    Boolean,
    Error,
}

impl CellKind {
    fn parse(kind: Option<&str>) -> Self {
        match kind {
            Some("s") => CellKind::SharedString,
            Some("inlineStr") | Some("str") | Some("d") => CellKind::InlineString,
            Some("b") => CellKind::Boolean,
            Some("e") => CellKind::Error,
            _ => CellKind::Number,
        }
    }
}

/// An Office Open XML workbook; only its first worksheet is read.
pub(crate) struct XlsxSpreadsheet {
    /// File name of the workbook
    pub(crate) name: String,
    zip: ZipArchive<SourceReader>,
    /// Worksheets in workbook order as (name, zip_path) pairs
    sheets: Vec<(String, String)>,
}

impl XlsxSpreadsheet {
    pub(crate) fn new(file_name: &str, reader: SourceReader) -> Result<XlsxSpreadsheet, InspectorError> {
        let mut zip = ZipArchive::new(reader)?;
        let sheets = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::EmptyWorkbook(file_name.to_owned()))?
        }
        Ok(XlsxSpreadsheet {
            name: file_name.to_owned(),
            zip,
            sheets,
        })
    }

    /// Loads the shared string table; workbooks without one have no shared strings.
    fn load_shared_strings(&mut self) -> Result<Vec<String>, InspectorError> {
        let Some(mut reader) = self.zip.xml_reader("xl/sharedStrings.xml")? else {
            return Ok(Vec::new());
        };
        let mut strings = Vec::new();
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == tag::STRING_ITEM => {
                strings.push(read_string_value(&mut reader, tag::STRING_ITEM, false)?);
            }
        });
        debug!(file = %self.name, strings = strings.len(), "loaded shared strings");
        Ok(strings)
    }
}

impl Spreadsheet for XlsxSpreadsheet {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    /// Streams the first worksheet into rows of raw cell values.
    fn read_rows(&mut self, criteria: &Criteria) -> Result<Vec<Vec<CellValue>>, InspectorError> {
        let shared_strings = self.load_shared_strings()?;
        let (sheet_name, zip_path) = self
            .sheets
            .first()
            .ok_or_else(|| SpreadsheetError::EmptyWorkbook(self.name.to_owned()))?;
        let mut sheet = Sheet::new(&self.name, sheet_name, criteria.skip_empty_rows);
        let mut reader = self
            .zip
            .xml_reader(zip_path)?
            .ok_or_else(|| SpreadsheetError::MissingPart(zip_path.to_owned()))?;

        // Positions used when `r` attributes are omitted
        let mut next_row = 0usize;
        let mut next_col = 0usize;
        let mut position = (0usize, 0usize);
        let mut kind = CellKind::default();
        let mut value = String::new();
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == tag::ROW => {
                let number = event.get_attribute_value("r")?;
                next_row = number.and_then(|number| row_to_index(&number)).unwrap_or(next_row);
                next_col = 0;
            }
            Event::End(event) if event.name() == tag::ROW => next_row += 1,
            Event::Start(event) if event.name() == tag::CELL => {
                let reference = event.get_attribute_value("r")?;
                position = reference
                    .and_then(|reference| reference_to_index(&reference))
                    .unwrap_or((next_row, next_col));
                next_col = position.1 + 1;
                kind = CellKind::parse(event.get_attribute_value("t")?.as_deref());
                value.clear();
            }
            Event::Start(event) if event.name() == tag::INLINE_STRING => {
                value = read_string_value(&mut reader, tag::INLINE_STRING, false)?;
            }
            Event::Start(event) if event.name() == tag::VALUE => {
                value = read_string_value(&mut reader, tag::VALUE, true)?;
            }
            Event::End(event) if !value.is_empty() && event.name() == tag::CELL => {
                let (row, col) = position;
                let cell = Cell {
                    row,
                    col,
                    value: to_cell_value(kind, &value, &shared_strings),
                };
                if cell.value.is_empty() {
                    warn!(file = %sheet.file_name, cell = %cell.reference(), "skipped cell without text");
                } else {
                    sheet.push(cell);
                }
                value.clear();
            }
        });
        if sheet.is_empty() {
            warn!(file = %sheet.file_name, sheet = %sheet.name, "first worksheet has no cells");
        }
        debug!(file = %sheet.file_name, sheet = %sheet.name, cells = sheet.cells.len(), "read worksheet");
        Ok(sheet.into_rows())
    }
}

/// Converts the raw text of a cell according to its kind.
fn to_cell_value(kind: CellKind, value: &str, shared_strings: &[String]) -> CellValue {
    match kind {
        CellKind::SharedString => value
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|index| shared_strings.get(index))
            .map(|text| CellValue::Text(text.to_owned()))
            .unwrap_or_default(),
        CellKind::InlineString => CellValue::Text(value.to_owned()),
        CellKind::Boolean => CellValue::Boolean(value.trim() == "1" || value.trim() == "true"),
        CellKind::Error => CellValue::Error(value.to_owned()),
        CellKind::Number => match value.trim().parse::<f64>() {
            Ok(number) => CellValue::Number(number),
            Err(_) => CellValue::Text(value.to_owned()),
        },
    }
}

/// Resolves worksheet names to archive paths through `xl/workbook.xml`
/// and its relationship part, keeping workbook order.
fn load_workbook(zip: &mut ZipArchive<SourceReader>) -> Result<Vec<(String, String)>, InspectorError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip
        .xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::MissingPart("xl/workbook.xml".to_string()))?;
    let mut sheets = Vec::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == tag::SHEET => {
            // The relationship id is namespaced (`r:id`) under varying prefixes
            let (mut sheet_name, mut relationship) = (None::<Cow<str>>, None::<Cow<str>>);
            for attribute in event.attributes() {
                let attribute = attribute?;
                match attribute.key.local_name().as_ref() {
                    b"name" => sheet_name = Some(attribute.unescape_value()?),
                    b"id" => relationship = Some(attribute.unescape_value()?),
                    _ => (),
                }
            }
            let target = relationship.and_then(|id| relationships.get(&*id));
            match (sheet_name, target) {
                (Some(sheet_name), Some(target)) => sheets.push((sheet_name.into_owned(), target.clone())),
                (sheet_name, _) => warn!(sheet = ?sheet_name, "skipped worksheet without a resolvable part"),
            }
        }
    });
    Ok(sheets)
}

/// Maps relationship ids to worksheet paths inside the archive.
fn load_relationships(zip: &mut ZipArchive<SourceReader>, path: &str) -> Result<HashMap<String, String>, InspectorError> {
    let mut reader = zip
        .xml_reader(path)?
        .ok_or_else(|| SpreadsheetError::MissingPart(path.to_string()))?;
    let mut relationships = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == tag::RELATIONSHIP => {
            let is_worksheet = event
                .get_attribute_value("Type")?
                .is_none_or(|kind| kind.ends_with("/worksheet"));
            let id = event.get_attribute_value("Id")?;
            let target = event.get_attribute_value("Target")?;
            if let (true, Some(id), Some(target)) = (is_worksheet, id, target) {
                relationships.insert(id.into_owned(), to_zip_path(&target));
            }
        }
    });
    Ok(relationships)
}

/// Normalizes a relationship target to an archive member path under `xl/`.
fn to_zip_path(path: &str) -> String {
    match path.strip_prefix('/') {
        Some(absolute) => absolute.to_owned(),
        None if path.starts_with("xl/") => path.to_owned(),
        None => format!("xl/{path}"),
    }
}

/// Collects text up to the closing `end_tag`.
///
/// With `direct` the element's own text is taken (`<v>`); otherwise only
/// `<t>` runs count, and runs inside phonetic blocks are left out.
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    direct: bool,
) -> Result<String, InspectorError> {
    let mut in_phonetic = false;
    let mut collecting = direct;
    let mut value = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == tag::PHONETIC_RUN => in_phonetic = true,
        Event::End(event) if event.name() == tag::PHONETIC_RUN => in_phonetic = false,
        Event::Start(event) if event.name() == tag::TEXT => collecting = !in_phonetic,
        Event::End(event) if event.name() == tag::TEXT => collecting = direct,
        Event::Text(event) if collecting => value.push_str(&event.xml_content()?),
        Event::CData(event) if collecting => value.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if collecting => value.push_bytes_ref(&event)?,
    });
    Ok(value)
}
