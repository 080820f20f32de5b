//! Electricity demand loader.
//!
//! Demand files are wide: `[timestamp, zone_1, ..., zone_n]`. One zone is
//! selected case-insensitively, summed per bucket and scaled by the supply
//! factor. The returned column keeps the zone's original spelling.

use std::collections::HashMap;
use std::path::Path;

use crate::domain::{DemandOptions, LoadedSeries, TimeSeries};
use crate::error::IngestError;
use crate::io::table::read_timestamped;
use crate::series::{Aggregation, resample, resolve_window, slice_window};

/// How many column names the unknown-zone error lists.
const ZONE_HINT_LIMIT: usize = 20;

/// Load one zone's demand, restrict it to the window, resample (sum) and
/// multiply by `supply_factor`.
pub fn load_demand(path: impl AsRef<Path>, options: &DemandOptions) -> Result<LoadedSeries, IngestError> {
    let path = path.as_ref();
    let table = read_timestamped(path)?;

    let (column_idx, zone_name) = find_zone(&table.value_headers, &options.zone)?;
    log::debug!(
        "zone '{}' resolved to column '{zone_name}' in '{}'",
        options.zone,
        path.display()
    );

    let (rows, invalid_cells) = table.numeric_rows(&[column_idx]);
    if invalid_cells > 0 {
        log::warn!(
            "{invalid_cells} non-numeric demand cell(s) in '{}' treated as missing",
            path.display()
        );
    }
    let rows_read = rows.len();

    let window = resolve_window(&rows, options.start.as_ref(), options.end.as_ref())?;
    let rows = slice_window(rows, &window);
    if rows.is_empty() {
        return Err(IngestError::EmptyResult(
            "No data in the selected date range.".to_string(),
        ));
    }
    let rows_in_window = rows.len();

    let mut resampled = resample(&rows, 1, options.resample, Aggregation::Sum);
    for row in &mut resampled {
        for value in row.values.iter_mut().flatten() {
            *value *= options.supply_factor;
        }
    }

    log::info!(
        "demand '{}' [{zone_name}]: {rows_read} rows read, {rows_in_window} in window, {} bucket(s) at {}, supply factor {}",
        path.display(),
        resampled.len(),
        options.resample,
        options.supply_factor
    );

    Ok(LoadedSeries {
        series: TimeSeries {
            index_name: table.index_name,
            columns: vec![zone_name],
            rows: resampled,
        },
        window,
        rule: options.resample,
        rows_read,
        rows_in_window,
        invalid_cells,
    })
}

/// Find `zone` among `headers` ignoring case and surrounding whitespace.
///
/// Returns the column index and its original name.
fn find_zone(headers: &[String], zone: &str) -> Result<(usize, String), IngestError> {
    let lookup: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().to_lowercase(), idx))
        .collect();

    let key = zone.trim().to_lowercase();
    match lookup.get(&key) {
        Some(&idx) => Ok((idx, headers[idx].clone())),
        None => {
            let mut sample: Vec<&str> = headers
                .iter()
                .take(ZONE_HINT_LIMIT)
                .map(String::as_str)
                .collect();
            if headers.len() > ZONE_HINT_LIMIT {
                sample.push("...");
            }
            Err(IngestError::Format(format!(
                "Zone '{zone}' not found in CSV columns. Available (sample): {}",
                sample.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DateBound, ResampleRule};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::fs;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn zone_lookup_is_case_insensitive_and_keeps_original_name() {
        let headers = vec!["DK_1".to_string(), "DK_2".to_string()];
        assert_eq!(find_zone(&headers, " dk_2 ").unwrap(), (1, "DK_2".to_string()));
    }

    #[test]
    fn unknown_zone_lists_at_most_twenty_columns() {
        let headers: Vec<String> = (0..25).map(|i| format!("Z{i}")).collect();
        match find_zone(&headers, "XX") {
            Err(IngestError::Format(msg)) => {
                assert!(msg.contains("Z19"), "{msg}");
                assert!(!msg.contains("Z20"), "{msg}");
                assert!(msg.ends_with("..."), "{msg}");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn daily_sum_is_scaled_by_supply_factor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demand.csv");
        fs::write(
            &path,
            "utc_timestamp,DK_1,DK_2\n\
             2024-01-01T00:00:00Z,1,100\n\
             2024-01-01T01:00:00Z,1,50\n\
             2024-01-01T02:00:00Z,1,oops\n\
             2024-01-02T00:00:00Z,1,10\n",
        )
        .unwrap();
        let options = DemandOptions {
            resample: ResampleRule::Day,
            supply_factor: 0.25,
            ..DemandOptions::default()
        };
        let loaded = load_demand(&path, &options).unwrap();
        assert_eq!(loaded.series.columns, vec!["DK_2"]);
        assert_eq!(loaded.series.value_at(at(2024, 1, 1, 0), "DK_2"), Some(37.5));
        assert_eq!(loaded.series.value_at(at(2024, 1, 2, 0), "DK_2"), Some(2.5));
        assert_eq!(loaded.invalid_cells, 1);
    }

    #[test]
    fn explicit_end_keeps_last_hour_of_month() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demand.csv");
        fs::write(
            &path,
            "ts,dk_2\n\
             2024-01-31 22:00:00,1\n\
             2024-01-31 23:00:00,2\n\
             2024-02-01 00:00:00,4\n",
        )
        .unwrap();
        let options = DemandOptions {
            end: Some(DateBound::from("2024-01-31")),
            resample: ResampleRule::Hour,
            supply_factor: 1.0,
            ..DemandOptions::default()
        };
        let loaded = load_demand(&path, &options).unwrap();
        assert_eq!(loaded.series.timestamps().last(), Some(&at(2024, 1, 31, 23)));
        assert_eq!(loaded.rows_in_window, 2);
    }
}
