//! In-memory workbook model and loaders.
//!
//! A workbook is a list of named sheets, each a header row plus data rows
//! of loosely typed [`Cell`]s. Spreadsheet files go through `calamine`; a
//! directory of `<sheet>.csv` files goes through `csv`.

use std::fmt;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use tracing::debug;

use crate::error::AnalysisError;

/// One loosely typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Blank or whitespace-only.
    Empty,
    /// Numeric value, possibly parsed from text.
    Number(f64),
    /// Non-numeric text.
    Text(String),
    /// Boolean cell.
    Bool(bool),
}

impl Cell {
    /// Builds a cell from raw text: blank → `Empty`, finite decimal → `Number`.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(trimmed.to_string()),
        }
    }

    /// Returns `true` for [`Cell::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Text content; numbers are rendered, blanks are `None`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty => Self::Empty,
            Data::Int(i) => Self::Number(*i as f64),
            Data::Float(x) if x.is_finite() => Self::Number(*x),
            Data::Bool(b) => Self::Bool(*b),
            Data::String(s) => Self::from_text(s),
            other => Self::Text(other.to_string()),
        }
    }
}

/// A named table: header row plus data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Sheet name as found in the workbook.
    pub name: String,
    /// Column headers, trimmed.
    pub headers: Vec<String>,
    /// Data rows; shorter rows are padded with `Empty` on access.
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Creates a sheet, trimming headers and dropping fully blank rows.
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            headers: headers.into_iter().map(|h| h.trim().to_string()).collect(),
            rows: rows
                .into_iter()
                .filter(|row| row.iter().any(|c| !c.is_empty()))
                .collect(),
        }
    }

    /// Index of the first column with this header.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Returns `true` if a column with this header exists.
    pub fn has_column(&self, header: &str) -> bool {
        self.column_index(header).is_some()
    }

    /// Cell at `(row, col)`, `Empty` when the row is short.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// An ordered collection of sheets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    /// Sheets in workbook order.
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Creates a workbook from sheets.
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Sheet by exact name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Loads a workbook from a spreadsheet file or a CSV directory.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::FileRead`] if the path cannot be read or decoded.
    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        if path.is_dir() {
            Self::from_csv_dir(path)
        } else {
            Self::from_spreadsheet(path)
        }
    }

    /// Reads every sheet of an `.xlsx`/`.xlsm`/`.xls`/`.ods` file.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::FileRead`] on any decoding failure.
    pub fn from_spreadsheet(path: &Path) -> Result<Self, AnalysisError> {
        let mut book = open_workbook_auto(path).map_err(|e| read_error(path, e))?;
        let mut sheets = Vec::new();
        for name in book.sheet_names() {
            let range = book
                .worksheet_range(&name)
                .map_err(|e| read_error(path, e))?;
            let mut rows = range.rows();
            let headers = rows
                .next()
                .map(|r| r.iter().map(|c| Cell::from(c).to_string()).collect())
                .unwrap_or_default();
            let data = rows.map(|r| r.iter().map(Cell::from).collect()).collect();
            let sheet = Sheet::new(name, headers, data);
            debug!(sheet = %sheet.name, rows = sheet.row_count(), "loaded sheet");
            sheets.push(sheet);
        }
        Ok(Self::new(sheets))
    }

    /// Reads `<dir>/<sheet>.csv` files, one sheet per file.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::FileRead`] if the directory or a CSV file
    /// cannot be read.
    pub fn from_csv_dir(dir: &Path) -> Result<Self, AnalysisError> {
        let entries = std::fs::read_dir(dir).map_err(|e| read_error(dir, e))?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
            })
            .collect();
        paths.sort();

        let mut sheets = Vec::with_capacity(paths.len());
        for path in paths {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let file = std::fs::File::open(&path).map_err(|e| read_error(&path, e))?;
            let sheet = read_csv_sheet(name, file).map_err(|e| read_error(&path, e))?;
            debug!(sheet = %sheet.name, rows = sheet.row_count(), "loaded sheet");
            sheets.push(sheet);
        }
        Ok(Self::new(sheets))
    }
}

/// Parses one CSV stream into a sheet. The first record is the header.
///
/// # Errors
///
/// Returns a `csv::Error` if the stream is malformed.
pub fn read_csv_sheet(name: impl Into<String>, reader: impl std::io::Read) -> csv::Result<Sheet> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in rdr.records() {
        rows.push(record?.iter().map(Cell::from_text).collect());
    }
    Ok(Sheet::new(name, headers, rows))
}

fn read_error(path: &Path, err: impl fmt::Display) -> AnalysisError {
    AnalysisError::FileRead {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_from_text_infers_numbers() {
        assert_eq!(Cell::from_text(" 380 "), Cell::Number(380.0));
        assert_eq!(Cell::from_text("0.443"), Cell::Number(0.443));
        assert_eq!(Cell::from_text("   "), Cell::Empty);
        assert_eq!(Cell::from_text("abc"), Cell::Text("abc".into()));
        assert_eq!(Cell::from_text("inf"), Cell::Text("inf".into()));
    }

    #[test]
    fn csv_sheet_reads_headers_and_skips_blank_rows() {
        let data = "Nama Lokasi,Beban Total (kVA)\nGardu A,100\n,\nGardu B, 50 \n";
        let sheet = read_csv_sheet("Gambar", data.as_bytes()).expect("csv should parse");
        assert_eq!(sheet.headers, vec!["Nama Lokasi", "Beban Total (kVA)"]);
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.cell(1, 1), &Cell::Number(50.0));
    }

    #[test]
    fn short_rows_read_as_empty() {
        let sheet = Sheet::new(
            "RAB",
            vec!["A".into(), "B".into()],
            vec![vec![Cell::Number(1.0)]],
        );
        assert_eq!(sheet.cell(0, 1), &Cell::Empty);
        assert_eq!(sheet.cell(5, 0), &Cell::Empty);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = Workbook::load(Path::new("/nonexistent/rab.xlsx"));
        assert!(matches!(err, Err(AnalysisError::FileRead { .. })));
    }

    #[test]
    fn text_rendering_of_numbers() {
        assert_eq!(Cell::Number(3.0).as_text().as_deref(), Some("3"));
        assert_eq!(Cell::Empty.as_text(), None);
    }
}
