//! Export loaded tables to CSV or JSON.
//!
//! The format follows the file extension: `.json` writes pretty JSON,
//! anything else writes CSV with missing values as empty cells.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::domain::{AttributeMap, AttributeValue, TimeSeries};
use crate::error::AppError;

/// Write a resampled series to `path`.
pub fn write_series(path: &Path, series: &TimeSeries) -> Result<(), AppError> {
    if is_json(path) {
        return write_json(path, series);
    }

    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    let mut header = vec![series.index_name.clone()];
    header.extend(series.columns.iter().cloned());
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;

    for row in &series.rows {
        let mut record = vec![row.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()];
        record.extend(row.values.iter().map(|v| v.map(|v| v.to_string()).unwrap_or_default()));
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write a fuel attribute map to `path`.
pub fn write_attributes(path: &Path, value_column: &str, map: &AttributeMap) -> Result<(), AppError> {
    if is_json(path) {
        return write_json(path, map);
    }

    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    writer
        .write_record(["fuel", value_column])
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;
    for (fuel, value) in map {
        let cell = match value {
            AttributeValue::Number(v) => v.to_string(),
            AttributeValue::Text(s) => s.clone(),
            AttributeValue::Missing => String::new(),
        };
        writer
            .write_record([fuel.as_str(), cell.as_str()])
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| AppError::new(4, format!("Failed to write export JSON: {e}")))?;
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeriesRow;
    use chrono::NaiveDate;
    use std::fs;

    fn series() -> TimeSeries {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap().and_hms_opt(0, 0, 0).unwrap();
        TimeSeries {
            index_name: "month".into(),
            columns: vec!["coal".into(), "gas".into()],
            rows: vec![SeriesRow {
                timestamp: ts,
                values: vec![Some(1.5), None],
            }],
        }
    }

    #[test]
    fn csv_export_leaves_missing_cells_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_series(&path, &series()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "month,coal,gas\n2024-01-31 00:00:00,1.5,\n");
    }

    #[test]
    fn json_export_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_series(&path, &series()).unwrap();
        let back: TimeSeries = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(back, series());
    }

    #[test]
    fn attribute_csv_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.csv");
        let mut map = AttributeMap::new();
        map.insert("coal".into(), AttributeValue::Number(15.0));
        map.insert("gas".into(), AttributeValue::Missing);
        write_attributes(&path, "capacity", &map).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "fuel,capacity\ncoal,15\ngas,\n");
    }
}
