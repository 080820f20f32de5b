//! Bucket assignment and aggregation.
//!
//! Rows are grouped by the label of the bucket they fall into, reduced per
//! column, and every bucket between the first and the last populated one is
//! emitted so the output has a regular step.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::domain::{ResampleRule, SeriesRow};

/// How values inside one bucket are reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Mean of the present values; `None` when the bucket has none.
    Mean,
    /// Sum of the present values; `0.0` when the bucket has none.
    Sum,
}

#[derive(Debug, Clone, Copy, Default)]
struct BucketStats {
    count: usize,
    sum: f64,
}

impl BucketStats {
    fn reduce(self, aggregation: Aggregation) -> Option<f64> {
        match aggregation {
            Aggregation::Mean if self.count == 0 => None,
            Aggregation::Mean => Some(self.sum / self.count as f64),
            Aggregation::Sum => Some(self.sum),
        }
    }
}

/// Resample `rows` (each with `width` values) into buckets of `rule`.
///
/// Missing values are skipped by the reduction. Output timestamps are unique
/// and ascending.
pub fn resample(
    rows: &[SeriesRow],
    width: usize,
    rule: ResampleRule,
    aggregation: Aggregation,
) -> Vec<SeriesRow> {
    let mut buckets: BTreeMap<NaiveDateTime, Vec<BucketStats>> = BTreeMap::new();
    for row in rows {
        let Some(label) = bucket_label(row.timestamp, rule) else {
            continue;
        };
        let entry = buckets
            .entry(label)
            .or_insert_with(|| vec![BucketStats::default(); width]);
        for (stats, value) in entry.iter_mut().zip(&row.values) {
            if let Some(v) = value {
                stats.count += 1;
                stats.sum += v;
            }
        }
    }

    let (Some(first), Some(last)) = (
        buckets.keys().next().copied(),
        buckets.keys().next_back().copied(),
    ) else {
        return Vec::new();
    };

    let empty = vec![BucketStats::default(); width];
    let mut out = Vec::with_capacity(buckets.len());
    let mut label = first;
    loop {
        let stats = buckets.get(&label).unwrap_or(&empty);
        out.push(SeriesRow {
            timestamp: label,
            values: stats.iter().map(|s| s.reduce(aggregation)).collect(),
        });
        if label >= last {
            break;
        }
        match next_label(label, rule) {
            Some(next) if next > label => label = next,
            _ => break,
        }
    }
    out
}

/// Label of the bucket containing `ts`.
pub fn bucket_label(ts: NaiveDateTime, rule: ResampleRule) -> Option<NaiveDateTime> {
    let date = ts.date();
    let label = match rule {
        ResampleRule::MonthEnd => last_day_of_month(date.year(), date.month())?,
        ResampleRule::MonthStart => date.with_day(1)?,
        ResampleRule::Week => {
            let to_sunday = 7 - i64::from(date.weekday().number_from_monday());
            date.checked_add_signed(Duration::days(to_sunday))?
        }
        ResampleRule::Day => date,
        ResampleRule::Hour => return date.and_hms_opt(ts.hour(), 0, 0),
        ResampleRule::QuarterEnd => {
            let quarter_end_month = (date.month0() / 3 + 1) * 3;
            last_day_of_month(date.year(), quarter_end_month)?
        }
        ResampleRule::QuarterStart => {
            NaiveDate::from_ymd_opt(date.year(), date.month0() / 3 * 3 + 1, 1)?
        }
        ResampleRule::YearEnd => NaiveDate::from_ymd_opt(date.year(), 12, 31)?,
        ResampleRule::YearStart => NaiveDate::from_ymd_opt(date.year(), 1, 1)?,
    };
    label.and_hms_opt(0, 0, 0)
}

/// Label of the bucket following the one labelled `label`.
fn next_label(label: NaiveDateTime, rule: ResampleRule) -> Option<NaiveDateTime> {
    match rule {
        ResampleRule::Hour => label.checked_add_signed(Duration::hours(1)),
        ResampleRule::Day => label.checked_add_signed(Duration::days(1)),
        ResampleRule::Week => label.checked_add_signed(Duration::days(7)),
        // End-labelled buckets: the day after the label opens the next bucket.
        ResampleRule::MonthEnd | ResampleRule::QuarterEnd | ResampleRule::YearEnd => {
            bucket_label(label.checked_add_signed(Duration::days(1))?, rule)
        }
        ResampleRule::MonthStart => add_months(label.date(), 1)?.and_hms_opt(0, 0, 0),
        ResampleRule::QuarterStart => add_months(label.date(), 3)?.and_hms_opt(0, 0, 0),
        ResampleRule::YearStart => add_months(label.date(), 12)?.and_hms_opt(0, 0, 0),
    }
}

/// Last calendar day of `month` (1-based) in `year`.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Add whole months to a first-of-month date.
fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let total = date.month0() + months;
    let year = date.year() + (total / 12) as i32;
    NaiveDate::from_ymd_opt(year, total % 12 + 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn row(ts: NaiveDateTime, v: Option<f64>) -> SeriesRow {
        SeriesRow {
            timestamp: ts,
            values: vec![v],
        }
    }

    #[test]
    fn month_labels_follow_end_and_start_conventions() {
        let ts = at(2024, 2, 10, 13);
        assert_eq!(bucket_label(ts, ResampleRule::MonthEnd), Some(at(2024, 2, 29, 0)));
        assert_eq!(bucket_label(ts, ResampleRule::MonthStart), Some(at(2024, 2, 1, 0)));
        // The final hour of a month still belongs to that month.
        assert_eq!(
            bucket_label(at(2024, 1, 31, 23), ResampleRule::MonthEnd),
            Some(at(2024, 1, 31, 0))
        );
    }

    #[test]
    fn week_quarter_year_labels() {
        // 2024-01-03 is a Wednesday; the week ends Sunday 2024-01-07.
        assert_eq!(bucket_label(at(2024, 1, 3, 5), ResampleRule::Week), Some(at(2024, 1, 7, 0)));
        assert_eq!(bucket_label(at(2024, 1, 7, 22), ResampleRule::Week), Some(at(2024, 1, 7, 0)));
        assert_eq!(bucket_label(at(2024, 5, 2, 0), ResampleRule::QuarterEnd), Some(at(2024, 6, 30, 0)));
        assert_eq!(bucket_label(at(2024, 5, 2, 0), ResampleRule::QuarterStart), Some(at(2024, 4, 1, 0)));
        assert_eq!(bucket_label(at(2024, 5, 2, 0), ResampleRule::YearEnd), Some(at(2024, 12, 31, 0)));
        assert_eq!(bucket_label(at(2024, 5, 2, 7), ResampleRule::Hour), Some(at(2024, 5, 2, 7)));
    }

    #[test]
    fn mean_skips_missing_and_fills_gaps() {
        let rows = vec![
            row(at(2024, 1, 1, 0), Some(10.0)),
            row(at(2024, 1, 15, 0), None),
            row(at(2024, 1, 20, 0), Some(20.0)),
            row(at(2024, 3, 1, 0), Some(5.0)),
        ];
        let out = resample(&rows, 1, ResampleRule::MonthEnd, Aggregation::Mean);
        let labels: Vec<_> = out.iter().map(|r| r.timestamp).collect();
        assert_eq!(labels, vec![at(2024, 1, 31, 0), at(2024, 2, 29, 0), at(2024, 3, 31, 0)]);
        assert_eq!(out[0].values, vec![Some(15.0)]);
        assert_eq!(out[1].values, vec![None]);
        assert_eq!(out[2].values, vec![Some(5.0)]);
    }

    #[test]
    fn sum_of_empty_bucket_is_zero() {
        let rows = vec![
            row(at(2024, 1, 1, 0), Some(1.0)),
            row(at(2024, 1, 1, 1), Some(2.0)),
            row(at(2024, 1, 3, 0), None),
        ];
        let out = resample(&rows, 1, ResampleRule::Day, Aggregation::Sum);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].values, vec![Some(3.0)]);
        assert_eq!(out[1].values, vec![Some(0.0)]);
        assert_eq!(out[2].values, vec![Some(0.0)]);
    }

    #[test]
    fn month_start_steps_across_year_boundary() {
        let rows = vec![row(at(2023, 11, 5, 0), Some(1.0)), row(at(2024, 2, 5, 0), Some(2.0))];
        let out = resample(&rows, 1, ResampleRule::MonthStart, Aggregation::Sum);
        let labels: Vec<_> = out.iter().map(|r| r.timestamp).collect();
        assert_eq!(
            labels,
            vec![at(2023, 11, 1, 0), at(2023, 12, 1, 0), at(2024, 1, 1, 0), at(2024, 2, 1, 0)]
        );
    }

    #[test]
    fn last_day_handles_leap_years_and_december() {
        assert_eq!(last_day_of_month(2023, 2), NaiveDate::from_ymd_opt(2023, 2, 28));
        assert_eq!(last_day_of_month(2024, 2), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(last_day_of_month(2024, 12), NaiveDate::from_ymd_opt(2024, 12, 31));
    }
}
