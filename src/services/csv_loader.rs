//! Raw table acquisition
//!
//! Reads a CSV source into an untyped `RawTable` (header + string cells) and
//! provides the typed cell accessors the processor uses. Typing failures
//! carry the source name and 1-based data row number.

use crate::constants::{DATE_FORMATS, MISSING_MARKERS};
use crate::error::LoadError;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Untyped table as read from a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    /// Name used in error messages (usually the file name)
    pub source: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Read a CSV table from any reader
    pub fn from_reader<R: Read>(source: &str, reader: R) -> Result<Self, LoadError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| csv_error(source, e))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| csv_error(source, e))?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        debug!("Read {} rows from {}", rows.len(), source);

        Ok(Self {
            source: source.to_string(),
            headers,
            rows,
        })
    }

    /// Read a CSV table from a file; a missing file is `MissingSource`
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::MissingSource {
                path: path.to_path_buf(),
            });
        }

        let source = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let file = File::open(path).map_err(|e| LoadError::Io {
            source_name: source.clone(),
            message: e.to_string(),
        })?;

        Self::from_reader(&source, file)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact (trimmed) header name
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Index of a column that must exist
    pub fn require_column(&self, column: &str) -> Result<usize, LoadError> {
        self.column_index(column)
            .ok_or_else(|| LoadError::MissingColumn {
                source_name: self.source.clone(),
                column: column.to_string(),
            })
    }

    /// Cell text, `None` for the missing marker
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|c| c.as_str())
            .filter(|c| !is_missing(c))
    }

    /// Cell as a string, empty when missing
    pub fn text(&self, row: usize, col: usize) -> String {
        self.cell(row, col).unwrap_or_default().to_string()
    }

    /// Cell as a calendar date; missing or unparseable is an error
    pub fn date(&self, row: usize, col: usize) -> Result<NaiveDate, LoadError> {
        let raw = self.rows.get(row).and_then(|r| r.get(col)).map(|c| c.as_str());
        raw.and_then(parse_date).ok_or_else(|| LoadError::InvalidDate {
            source_name: self.source.clone(),
            row: row + 1,
            value: raw.unwrap_or_default().to_string(),
        })
    }

    /// Cell as a non-negative count; integral floats ("12.0") are accepted
    pub fn count(&self, row: usize, col: usize) -> Result<Option<u64>, LoadError> {
        match self.cell(row, col) {
            None => Ok(None),
            Some(text) => parse_count(text)
                .map(Some)
                .ok_or_else(|| self.invalid_number(row, col, text)),
        }
    }

    /// Cell as a monetary amount
    pub fn amount(&self, row: usize, col: usize) -> Result<Option<f64>, LoadError> {
        match self.cell(row, col) {
            None => Ok(None),
            Some(text) => parse_amount(text)
                .map(Some)
                .ok_or_else(|| self.invalid_number(row, col, text)),
        }
    }

    fn invalid_number(&self, row: usize, col: usize, value: &str) -> LoadError {
        LoadError::InvalidNumber {
            source_name: self.source.clone(),
            row: row + 1,
            column: self.headers.get(col).cloned().unwrap_or_default(),
            value: value.to_string(),
        }
    }
}

fn csv_error(source: &str, err: csv::Error) -> LoadError {
    LoadError::Csv {
        source_name: source.to_string(),
        message: err.to_string(),
    }
}

/// Check if a cell holds the missing marker
pub fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || MISSING_MARKERS.contains(&cell)
}

/// Parse a calendar date, dropping any time component
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD` and `MM/DD/YYYY`, optionally followed
/// by a time separated by a space or `T`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let date_part = text
        .trim()
        .split(|c: char| c == ' ' || c == 'T')
        .next()?;

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

fn parse_count(text: &str) -> Option<u64> {
    let text = text.replace(',', "");
    if let Ok(n) = text.parse::<u64>() {
        return Some(n);
    }
    let value: f64 = text.parse().ok()?;
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0).then_some(value as u64)
}

fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',' && *c != '$').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "date,tactic,state,campaign,impression,clicks,spend,attributed revenue\n\
        2025-05-16,ASC,CA,Spring,1000,20,50.5,120\n\
        2025-05-17, Retargeting ,NY,,0,,0,\n";

    #[test]
    fn test_from_reader_trims_and_reads_rows() {
        let table = RawTable::from_reader("Facebook.csv", SAMPLE.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.column_index("attributed revenue"), Some(7));
        assert_eq!(table.text(1, 1), "Retargeting");
        assert_eq!(table.cell(1, 3), None);
    }

    #[test]
    fn test_typed_cells() {
        let table = RawTable::from_reader("Facebook.csv", SAMPLE.as_bytes()).unwrap();

        assert_eq!(table.date(0, 0).unwrap(), NaiveDate::from_ymd_opt(2025, 5, 16).unwrap());
        assert_eq!(table.count(0, 4).unwrap(), Some(1000));
        assert_eq!(table.count(1, 5).unwrap(), None);
        assert_eq!(table.amount(0, 6).unwrap(), Some(50.5));
        assert_eq!(table.amount(1, 7).unwrap(), None);
    }

    #[test]
    fn test_require_column_missing() {
        let table = RawTable::from_reader("Google.csv", SAMPLE.as_bytes()).unwrap();
        let err = table.require_column("# of orders").unwrap_err();

        assert!(matches!(err, LoadError::MissingColumn { ref column, .. } if column == "# of orders"));
    }

    #[test]
    fn test_invalid_number_reports_row() {
        let csv = "date,clicks\n2025-05-16,12\n2025-05-17,lots\n";
        let table = RawTable::from_reader("TikTok.csv", csv.as_bytes()).unwrap();
        let err = table.count(1, 1).unwrap_err();

        match err {
            LoadError::InvalidNumber { row, column, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "clicks");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let csv = "date,clicks\n2025-05-16,12,99\n";
        let err = RawTable::from_reader("TikTok.csv", csv.as_bytes()).unwrap_err();

        assert!(matches!(err, LoadError::Csv { .. }));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 5, 16);

        assert_eq!(parse_date("2025-05-16"), expected);
        assert_eq!(parse_date("2025/05/16"), expected);
        assert_eq!(parse_date("05/16/2025"), expected);
        assert_eq!(parse_date("2025-05-16 00:00:00"), expected);
        assert_eq!(parse_date("2025-05-16T08:30:00"), expected);
        assert_eq!(parse_date("16th May"), None);
        assert_eq!(parse_date("2025-13-40"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_count("1,200"), Some(1200));
        assert_eq!(parse_count("12.0"), Some(12));
        assert_eq!(parse_count("12.5"), None);
        assert_eq!(parse_count("-3"), None);
        assert_eq!(parse_amount("$1,250.75"), Some(1250.75));
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_missing_source() {
        let err = RawTable::from_path(Path::new("/nonexistent/Facebook.csv")).unwrap_err();
        assert!(matches!(err, LoadError::MissingSource { .. }));
    }
}
