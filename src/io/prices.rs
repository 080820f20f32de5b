//! Fuel price loader.
//!
//! Expects `[date, coal, gas, oil, extras...]`. Column names are trimmed and
//! lower-cased; every value column is coerced to numbers and resampled with
//! a mean.

use std::collections::BTreeSet;
use std::path::Path;

use crate::domain::{LoadedSeries, PriceOptions, TimeSeries};
use crate::error::IngestError;
use crate::io::table::read_timestamped;
use crate::series::{Aggregation, resample, resolve_window, slice_window};

/// Columns every price file must carry (after lower-casing).
pub const REQUIRED_PRICE_COLUMNS: [&str; 3] = ["coal", "gas", "oil"];

/// Load fuel prices, restrict them to the requested window and resample (mean).
pub fn load_prices(path: impl AsRef<Path>, options: &PriceOptions) -> Result<LoadedSeries, IngestError> {
    let path = path.as_ref();
    let table = read_timestamped(path)?;

    let columns: Vec<String> = table
        .value_headers
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let present: BTreeSet<&str> = columns.iter().map(String::as_str).collect();
    let missing: Vec<&str> = REQUIRED_PRICE_COLUMNS
        .iter()
        .copied()
        .filter(|c| !present.contains(c))
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::Format(format!(
            "Missing required columns: {missing:?}. Available: {columns:?}"
        )));
    }

    let all: Vec<usize> = (0..columns.len()).collect();
    let (rows, invalid_cells) = table.numeric_rows(&all);
    if invalid_cells > 0 {
        log::warn!(
            "{invalid_cells} non-numeric price cell(s) in '{}' treated as missing",
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

    let resampled = resample(&rows, columns.len(), options.resample, Aggregation::Mean);

    log::info!(
        "prices '{}': {rows_read} rows read, {rows_in_window} in window, {} bucket(s) at {}",
        path.display(),
        resampled.len(),
        options.resample
    );

    Ok(LoadedSeries {
        series: TimeSeries {
            index_name: table.index_name,
            columns,
            rows: resampled,
        },
        window,
        rule: options.resample,
        rows_read,
        rows_in_window,
        invalid_cells,
    })
}
