//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - handed to downstream dispatch / planning code in-memory
//! - exported to JSON/CSV from the `eload` binary

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::IngestError;
use crate::io::table::parse_timestamp;

/// Default demand zone column.
pub const DEFAULT_ZONE: &str = "DK_2";

/// Default share of total demand that must be supplied.
pub const DEFAULT_SUPPLY_FACTOR: f64 = 0.5;

/// Bucket rule used when resampling a time series.
///
/// Parsed from pandas-style offset aliases (`ME`, `MS`, `W`, `D`, `h`, ...).
/// The `*End` rules label a bucket with its last calendar day at midnight;
/// the `*Start` rules and the fixed-width rules label it with its first instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleRule {
    #[default]
    MonthEnd,
    MonthStart,
    /// Weeks run Monday..=Sunday and are labelled by the Sunday.
    Week,
    Day,
    Hour,
    QuarterEnd,
    QuarterStart,
    YearEnd,
    YearStart,
}

impl ResampleRule {
    /// Canonical alias, as accepted by `FromStr`.
    pub fn alias(self) -> &'static str {
        match self {
            ResampleRule::MonthEnd => "ME",
            ResampleRule::MonthStart => "MS",
            ResampleRule::Week => "W-SUN",
            ResampleRule::Day => "D",
            ResampleRule::Hour => "h",
            ResampleRule::QuarterEnd => "QE",
            ResampleRule::QuarterStart => "QS",
            ResampleRule::YearEnd => "YE",
            ResampleRule::YearStart => "YS",
        }
    }
}

impl FromStr for ResampleRule {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rule = match s.trim() {
            "ME" | "M" => ResampleRule::MonthEnd,
            "MS" => ResampleRule::MonthStart,
            "W" | "W-SUN" => ResampleRule::Week,
            "D" => ResampleRule::Day,
            "h" | "H" => ResampleRule::Hour,
            "QE" | "Q" => ResampleRule::QuarterEnd,
            "QS" => ResampleRule::QuarterStart,
            "YE" | "Y" | "A" => ResampleRule::YearEnd,
            "YS" | "AS" => ResampleRule::YearStart,
            other => return Err(IngestError::InvalidRule(other.to_string())),
        };
        Ok(rule)
    }
}

impl fmt::Display for ResampleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

/// An inclusive start/end bound, given either as text or as a chrono value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateBound {
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl DateBound {
    /// Resolve to a naive (UTC-equivalent) timestamp.
    ///
    /// Text goes through the same parser as file timestamps, so offsets such
    /// as `+01:00` are converted to UTC first.
    pub fn to_datetime(&self) -> Result<NaiveDateTime, IngestError> {
        match self {
            DateBound::Text(s) => {
                parse_timestamp(s).ok_or_else(|| IngestError::InvalidDate(s.clone()))
            }
            DateBound::Date(d) => Ok(d.and_time(chrono::NaiveTime::MIN)),
            DateBound::DateTime(dt) => Ok(*dt),
        }
    }
}

impl From<&str> for DateBound {
    fn from(value: &str) -> Self {
        DateBound::Text(value.to_string())
    }
}

impl From<String> for DateBound {
    fn from(value: String) -> Self {
        DateBound::Text(value)
    }
}

impl From<NaiveDate> for DateBound {
    fn from(value: NaiveDate) -> Self {
        DateBound::Date(value)
    }
}

impl From<NaiveDateTime> for DateBound {
    fn from(value: NaiveDateTime) -> Self {
        DateBound::DateTime(value)
    }
}

/// Options for `load_prices`.
#[derive(Debug, Clone, Default)]
pub struct PriceOptions {
    pub start: Option<DateBound>,
    pub end: Option<DateBound>,
    pub resample: ResampleRule,
}

/// Options for `load_demand`.
#[derive(Debug, Clone)]
pub struct DemandOptions {
    pub start: Option<DateBound>,
    pub end: Option<DateBound>,
    pub resample: ResampleRule,
    /// Zone column to select (matched case-insensitively).
    pub zone: String,
    /// Multiplier applied to every bucket after summation.
    pub supply_factor: f64,
}

impl Default for DemandOptions {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            resample: ResampleRule::default(),
            zone: DEFAULT_ZONE.to_string(),
            supply_factor: DEFAULT_SUPPLY_FACTOR,
        }
    }
}

/// One timestamped row; `values` lines up with `TimeSeries::columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub timestamp: NaiveDateTime,
    pub values: Vec<Option<f64>>,
}

/// A table indexed by timestamp with a fixed set of numeric fields.
///
/// `None` marks a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Name of the timestamp column in the source file.
    pub index_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<SeriesRow>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of one field, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.rows.iter().map(|r| r.timestamp).collect()
    }

    /// Value of `name` at `timestamp`, if both exist and the value is present.
    pub fn value_at(&self, timestamp: NaiveDateTime, name: &str) -> Option<f64> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .find(|r| r.timestamp == timestamp)
            .and_then(|r| r.values[idx])
    }
}

/// Inclusive window a series was sliced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Loader output: the resampled series plus what happened while loading it.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: TimeSeries,
    pub window: ResolvedWindow,
    pub rule: ResampleRule,
    pub rows_read: usize,
    pub rows_in_window: usize,
    /// Non-empty cells in the selected columns that did not parse as numbers.
    pub invalid_cells: usize,
}

/// A single value from an attribute file, typed per cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
    Missing,
}

impl AttributeValue {
    pub fn parse(cell: &str) -> Self {
        let cell = cell.trim();
        if cell.is_empty() {
            return AttributeValue::Missing;
        }
        match cell.parse::<f64>() {
            Ok(v) => AttributeValue::Number(v),
            Err(_) => AttributeValue::Text(cell.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Number(v) => write!(f, "{v}"),
            AttributeValue::Text(s) => f.write_str(s),
            AttributeValue::Missing => f.write_str("NaN"),
        }
    }
}

/// Fuel name (as written in the file) to its capacity / efficiency.
pub type AttributeMap = BTreeMap<String, AttributeValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_aliases_parse() {
        assert_eq!("ME".parse::<ResampleRule>().unwrap(), ResampleRule::MonthEnd);
        assert_eq!("M".parse::<ResampleRule>().unwrap(), ResampleRule::MonthEnd);
        assert_eq!("MS".parse::<ResampleRule>().unwrap(), ResampleRule::MonthStart);
        assert_eq!("W".parse::<ResampleRule>().unwrap(), ResampleRule::Week);
        assert_eq!("H".parse::<ResampleRule>().unwrap(), ResampleRule::Hour);
        assert_eq!("Q".parse::<ResampleRule>().unwrap(), ResampleRule::QuarterEnd);
        assert!(matches!(
            "5min".parse::<ResampleRule>(),
            Err(IngestError::InvalidRule(_))
        ));
    }

    #[test]
    fn rule_display_round_trips() {
        for rule in [ResampleRule::Week, ResampleRule::Hour, ResampleRule::YearStart] {
            assert_eq!(rule.to_string().parse::<ResampleRule>().unwrap(), rule);
        }
    }

    #[test]
    fn date_bound_from_text_and_date() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let expected = d.and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(DateBound::from("2024-03-01").to_datetime().unwrap(), expected);
        assert_eq!(DateBound::from(d).to_datetime().unwrap(), expected);
        assert!(matches!(
            DateBound::from("next tuesday").to_datetime(),
            Err(IngestError::InvalidDate(_))
        ));
    }

    #[test]
    fn attribute_values_are_typed_per_cell() {
        assert_eq!(AttributeValue::parse(" 12.5 "), AttributeValue::Number(12.5));
        assert_eq!(AttributeValue::parse(""), AttributeValue::Missing);
        assert_eq!(AttributeValue::parse("n/a"), AttributeValue::Text("n/a".into()));
    }
}
