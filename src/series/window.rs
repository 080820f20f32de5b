//! Date-window resolution and slicing.

use chrono::{Datelike, NaiveDateTime};

use crate::domain::{DateBound, ResolvedWindow, SeriesRow};
use crate::error::IngestError;
use crate::series::resample::last_day_of_month;

/// Move an end bound to 23:00 on the last day of its calendar month.
///
/// Sub-daily data for the whole final month is then inside the window. A
/// bound already past 23:00 on that day is kept as given, so the result is
/// never earlier than `end`.
pub fn extend_to_month_end(end: NaiveDateTime) -> Option<NaiveDateTime> {
    let date = end.date();
    let month_end = last_day_of_month(date.year(), date.month())?.and_hms_opt(23, 0, 0)?;
    Some(month_end.max(end))
}

/// Resolve optional bounds against the timestamps present in the data.
///
/// Omitted bounds fall back to the data's min/max. A given end is extended
/// with `extend_to_month_end`.
pub fn resolve_window(
    rows: &[SeriesRow],
    start: Option<&DateBound>,
    end: Option<&DateBound>,
) -> Result<ResolvedWindow, IngestError> {
    let data_min = rows.iter().map(|r| r.timestamp).min();
    let data_max = rows.iter().map(|r| r.timestamp).max();
    let no_data = || IngestError::EmptyResult("No data in the selected date range.".to_string());

    let start = match start {
        Some(bound) => bound.to_datetime()?,
        None => data_min.ok_or_else(no_data)?,
    };

    let end = match end {
        Some(bound) => {
            let raw = bound.to_datetime()?;
            extend_to_month_end(raw).ok_or_else(|| {
                IngestError::Range(format!("Cannot extend end bound {raw} to its month end."))
            })?
        }
        None => data_max.ok_or_else(no_data)?,
    };

    if start > end {
        return Err(IngestError::Range(format!(
            "`start` must be less than or equal to `end` (start={start}, end={end})."
        )));
    }

    log::debug!("resolved window {start} ..= {end}");
    Ok(ResolvedWindow { start, end })
}

/// Keep rows inside the inclusive window, sorted by timestamp (stable).
pub fn slice_window(mut rows: Vec<SeriesRow>, window: &ResolvedWindow) -> Vec<SeriesRow> {
    rows.sort_by_key(|r| r.timestamp);
    rows.retain(|r| r.timestamp >= window.start && r.timestamp <= window.end);
    rows
}
