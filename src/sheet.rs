use std::borrow::Cow;

use crate::error::{ImportError, Result};

/// One spreadsheet cell as read from an export.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Empty => Cow::Borrowed(""),
            Self::Text(s) => Cow::Borrowed(s.as_str()),
            Self::Number(n) => Cow::Owned(format_number(*n)),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s.to_string())
        }
    }
}

/// Rows of the first worksheet, in file order. Rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    /// Lower-cased text of the first `n` rows, cells joined by spaces.
    pub fn header_text(&self, n: usize) -> String {
        self.rows
            .iter()
            .take(n)
            .map(|row| row_text(row))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Lower-cased text of one row, cells joined by spaces.
pub fn row_text(row: &[Cell]) -> String {
    row.iter()
        .map(|c| c.text().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetFormat {
    Workbook,
    Csv,
}

/// Choose a reader by substring match on the declared MIME type.
pub fn format_for_mime(mime_type: &str) -> Result<SheetFormat> {
    let mime = mime_type.to_lowercase();
    if mime.contains("spreadsheet") || mime.contains("excel") {
        Ok(SheetFormat::Workbook)
    } else if mime.contains("csv") {
        Ok(SheetFormat::Csv)
    } else {
        Err(ImportError::UnsupportedMimeType(mime_type.to_string()))
    }
}

pub fn read_sheet(bytes: &[u8], mime_type: &str) -> Result<RawSheet> {
    match format_for_mime(mime_type)? {
        SheetFormat::Csv => read_csv(bytes),
        SheetFormat::Workbook => read_workbook_or_csv(bytes),
    }
}

pub fn read_csv(bytes: &[u8]) -> Result<RawSheet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        // The reader yields no record for an empty line; keep those as empty
        // rows so indices match the file's line layout.
        if let Some(pos) = record.position() {
            let skipped = usize::try_from(pos.byte()).map_or(0, |at| blank_lines_at(bytes, at));
            rows.extend(std::iter::repeat_with(Vec::new).take(skipped));
        }
        let row = record
            .iter()
            .map(|field| Cell::from(&*String::from_utf8_lossy(field)))
            .collect();
        rows.push(row);
    }
    Ok(RawSheet::new(rows))
}

/// Empty lines starting at byte `at`. A record's position is taken before
/// the blank lines the reader discards ahead of it. CR, LF and CRLF each end
/// one line; the LF of a CRLF that ended the previous record is still unread.
fn blank_lines_at(bytes: &[u8], at: usize) -> usize {
    let mut i = at;
    if i > 0 && bytes.get(i - 1) == Some(&b'\r') && bytes.get(i) == Some(&b'\n') {
        i += 1;
    }
    let mut blank = 0;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'\r' => {
                blank += 1;
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
            }
            b'\n' => blank += 1,
            _ => break,
        }
        i += 1;
    }
    blank
}

// Browsers label plain CSV uploads as `application/vnd.ms-excel`, so a
// payload that is not a workbook is retried as delimited text.
fn read_workbook_or_csv(bytes: &[u8]) -> Result<RawSheet> {
    match read_workbook(bytes) {
        Ok(sheet) => Ok(sheet),
        Err(e) if looks_like_text(bytes) => {
            log::warn!("not a workbook ({e}); reading as CSV");
            read_csv(bytes)
        }
        Err(e) => Err(e),
    }
}

fn looks_like_text(bytes: &[u8]) -> bool {
    !bytes.is_empty() && std::str::from_utf8(bytes).is_ok() && !bytes.contains(&0)
}

#[cfg(feature = "xlsx")]
pub fn read_workbook(bytes: &[u8]) -> Result<RawSheet> {
    use calamine::Reader;

    let cursor = std::io::Cursor::new(bytes);
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
        .map_err(|e| ImportError::Workbook(format!("Failed to open workbook: {e}")))?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::Workbook("Workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&first)
        .map_err(|e| ImportError::Workbook(format!("Failed to read sheet '{first}': {e}")))?;
    log::debug!("reading worksheet '{first}' ({} rows)", range.height());

    // calamine trims leading empty rows and columns; put them back so cell
    // positions are absolute from A1.
    let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset as usize];
    rows.extend(range.rows().map(|row| {
        let mut cells = vec![Cell::Empty; col_offset as usize];
        cells.extend(row.iter().map(cell_from_data));
        cells
    }));
    Ok(RawSheet::new(rows))
}

#[cfg(not(feature = "xlsx"))]
pub fn read_workbook(_bytes: &[u8]) -> Result<RawSheet> {
    Err(ImportError::Workbook("built without xlsx support".to_string()))
}

#[cfg(feature = "xlsx")]
fn cell_from_data(data: &calamine::Data) -> Cell {
    use calamine::Data;
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::from(s.as_str()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        other => Cell::Text(other.to_string()),
    }
}
