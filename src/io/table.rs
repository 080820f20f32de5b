//! CSV table reading shared by every loader.
//!
//! This module only knows about headers, records, timestamps and numeric
//! cells. Column requirements and aggregation live in the loaders.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::domain::SeriesRow;
use crate::error::IngestError;

/// A CSV file read fully into memory.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub path: PathBuf,
    /// Trimmed header names (BOM stripped), original case.
    pub headers: Vec<String>,
    /// `(line, record)` pairs in file order.
    pub records: Vec<(usize, StringRecord)>,
}

impl RawTable {
    /// Lower-cased header name -> column index. Later duplicates win.
    pub fn header_map(&self) -> HashMap<String, usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.to_ascii_lowercase(), idx))
            .collect()
    }
}

/// Read a whole CSV file (header row required).
pub fn read_table(path: &Path) -> Result<RawTable, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(normalize_header_name)
        .collect::<Vec<_>>();

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        // +2: records() starts after the header and CSV lines are 1-based.
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);
        records.push((line, record));
    }

    log::debug!(
        "read {} records from '{}' (columns: {:?})",
        records.len(),
        path.display(),
        headers
    );

    Ok(RawTable {
        path: path.to_path_buf(),
        headers,
        records,
    })
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a BOM.
    name.trim().trim_start_matches('\u{feff}').trim().to_string()
}

/// A table whose first column is a parsed timestamp axis.
#[derive(Debug, Clone)]
pub struct TimestampedTable {
    pub path: PathBuf,
    /// Header of the timestamp column.
    pub index_name: String,
    /// Headers of the remaining columns, in file order.
    pub value_headers: Vec<String>,
    pub rows: Vec<(NaiveDateTime, StringRecord)>,
}

impl TimestampedTable {
    /// Coerce the given value columns (indices into `value_headers`) to numbers.
    ///
    /// Returns the rows plus the number of non-empty cells that failed to parse.
    pub fn numeric_rows(&self, columns: &[usize]) -> (Vec<SeriesRow>, usize) {
        let mut invalid = 0usize;
        let rows = self
            .rows
            .iter()
            .map(|(timestamp, record)| {
                let values = columns
                    .iter()
                    .map(|&col| match coerce_numeric(record.get(col + 1)) {
                        NumericCell::Value(v) => Some(v),
                        NumericCell::Missing => None,
                        NumericCell::Invalid => {
                            invalid += 1;
                            None
                        }
                    })
                    .collect();
                SeriesRow {
                    timestamp: *timestamp,
                    values,
                }
            })
            .collect();
        (rows, invalid)
    }
}

/// Read a CSV whose first column is the timestamp axis.
///
/// Fails when fewer than two columns exist or a timestamp does not parse.
pub fn read_timestamped(path: &Path) -> Result<TimestampedTable, IngestError> {
    let table = read_table(path)?;
    if table.headers.len() < 2 {
        return Err(IngestError::Format(format!(
            "'{}' must contain a timestamp column plus at least one value column (found {} column(s)).",
            path.display(),
            table.headers.len()
        )));
    }

    let mut rows = Vec::with_capacity(table.records.len());
    for (line, record) in table.records {
        let raw = record.get(0).unwrap_or("");
        let timestamp = parse_timestamp(raw).ok_or_else(|| {
            IngestError::Format(format!(
                "Invalid timestamp '{raw}' on line {line} of '{}'.",
                path.display()
            ))
        })?;
        rows.push((timestamp, record));
    }

    let mut headers = table.headers.into_iter();
    let index_name = headers.next().unwrap_or_default();

    Ok(TimestampedTable {
        path: table.path,
        index_name,
        value_headers: headers.collect(),
        rows,
    })
}

/// Outcome of coercing one cell to a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericCell {
    Value(f64),
    Missing,
    Invalid,
}

/// Lenient numeric coercion: empty cells are missing, junk is invalid (and
/// also treated as missing by callers). `NaN` counts as missing; `inf` and
/// `-inf` are kept.
pub fn coerce_numeric(cell: Option<&str>) -> NumericCell {
    let Some(s) = cell.map(str::trim).filter(|s| !s.is_empty()) else {
        return NumericCell::Missing;
    };
    match s.parse::<f64>() {
        Ok(v) if v.is_nan() => NumericCell::Missing,
        Ok(v) => NumericCell::Value(v),
        Err(_) => NumericCell::Invalid,
    }
}

/// Parse a timestamp cell or bound into a naive UTC-equivalent value.
///
/// Values carrying an offset are converted to UTC before the offset is
/// dropped. Date-only values map to midnight; `YYYY-MM` maps to the first
/// of the month.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    const OFFSET_FMTS: [&str; 7] = [
        "%Y-%m-%d %H:%M:%S%:z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M%:z",
        "%Y-%m-%dT%H:%M%:z",
        "%Y-%m-%d %H:%M%z",
    ];
    for fmt in OFFSET_FMTS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_utc());
        }
    }

    // A bare `Z` suffix is UTC already.
    let naive = s.strip_suffix('Z').unwrap_or(s);

    const DATETIME_FMTS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Some(dt);
        }
    }

    const DATE_FMTS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(naive, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // Month-only values, e.g. a `month` column holding `2024-01`.
    if naive.len() == 7 {
        if let Ok(d) = NaiveDate::parse_from_str(&format!("{naive}-01"), "%Y-%m-%d") {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn parses_common_timestamp_shapes() {
        assert_eq!(parse_timestamp("2024-01-31"), Some(ts(2024, 1, 31, 0)));
        assert_eq!(parse_timestamp("2024-01-31 23:00:00"), Some(ts(2024, 1, 31, 23)));
        assert_eq!(parse_timestamp("2024-01-31T23:00"), Some(ts(2024, 1, 31, 23)));
        assert_eq!(parse_timestamp("31/01/2024"), Some(ts(2024, 1, 31, 0)));
        assert_eq!(parse_timestamp("2024-02"), Some(ts(2024, 2, 1, 0)));
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn offsets_are_converted_to_utc() {
        assert_eq!(parse_timestamp("2024-01-01T00:00:00+01:00"), Some(ts(2023, 12, 31, 23)));
        assert_eq!(parse_timestamp("2024-01-01T05:00:00Z"), Some(ts(2024, 1, 1, 5)));
        assert_eq!(parse_timestamp("2024-01-01 02:00:00+02:00"), Some(ts(2024, 1, 1, 0)));
    }

    #[test]
    fn numeric_coercion_is_lenient() {
        assert_eq!(coerce_numeric(Some("1.5")), NumericCell::Value(1.5));
        assert_eq!(coerce_numeric(Some(" ")), NumericCell::Missing);
        assert_eq!(coerce_numeric(None), NumericCell::Missing);
        assert_eq!(coerce_numeric(Some("n/a")), NumericCell::Invalid);
        assert_eq!(coerce_numeric(Some("NaN")), NumericCell::Missing);
        assert_eq!(coerce_numeric(Some("inf")), NumericCell::Value(f64::INFINITY));
        assert_eq!(coerce_numeric(Some("-inf")), NumericCell::Value(f64::NEG_INFINITY));
    }

    #[test]
    fn header_bom_and_whitespace_are_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, "\u{feff}month , Coal\n2024-01,1\n").unwrap();
        let table = read_table(&path).unwrap();
        assert_eq!(table.headers, vec!["month".to_string(), "Coal".to_string()]);
        assert_eq!(table.header_map().get("coal"), Some(&1));
        assert_eq!(table.records[0].0, 2);
    }

    #[test]
    fn single_column_file_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, "month\n2024-01\n").unwrap();
        assert!(matches!(read_timestamped(&path), Err(IngestError::Format(_))));
    }

    #[test]
    fn bad_timestamp_names_the_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, "month,coal\n2024-01,1\nsoon,2\n").unwrap();
        match read_timestamped(&path) {
            Err(IngestError::Format(msg)) => assert!(msg.contains("line 3"), "{msg}"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(matches!(read_table(&path), Err(IngestError::Io { .. })));
    }
}
