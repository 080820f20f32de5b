//! Formatted terminal output.
//!
//! We keep formatting code in one place so the loaders stay free of
//! presentation concerns and output changes are localized.

use crate::domain::{AttributeMap, LoadedSeries, TimeSeries};

/// One-line description of a load: rule, window and row counts.
pub fn format_load_line(label: &str, loaded: &LoadedSeries) -> String {
    format!(
        "{label}: rule={} window=[{} .. {}] rows read={} in window={} buckets={} invalid cells={}",
        loaded.rule,
        loaded.window.start,
        loaded.window.end,
        loaded.rows_read,
        loaded.rows_in_window,
        loaded.series.len(),
        loaded.invalid_cells,
    )
}

/// Format the first `n` rows of a series as a table.
pub fn format_series_head(series: &TimeSeries, n: usize) -> String {
    let mut out = String::new();

    let mut header = format!("{:<20}", truncate(&series.index_name, 20));
    for col in &series.columns {
        header.push_str(&format!(" {:>12}", truncate(col, 12)));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    let mut rule = format!("{:-<20}", "");
    for _ in &series.columns {
        rule.push_str(&format!(" {:-<12}", ""));
    }
    out.push_str(&rule);
    out.push('\n');

    for row in series.rows.iter().take(n) {
        let mut line = format!("{:<20}", row.timestamp.format("%Y-%m-%d %H:%M:%S"));
        for value in &row.values {
            line.push_str(&format!(" {:>12}", fmt_value(*value)));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    if series.len() > n {
        out.push_str(&format!("... ({} more row(s))\n", series.len() - n));
    }

    out
}

/// Format a fuel attribute map as a two-column table.
pub fn format_attribute_map(value_column: &str, map: &AttributeMap) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<16} {:>12}\n", "fuel", truncate(value_column, 12)));
    out.push_str(&format!("{:-<16} {:-<12}\n", "", ""));
    for (fuel, value) in map {
        let cell = match value.as_f64() {
            Some(v) => format!("{v:.4}"),
            None => value.to_string(),
        };
        out.push_str(&format!("{:<16} {:>12}\n", truncate(fuel, 16), cell));
    }
    out
}

fn fmt_value(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.4}"),
        None => "NaN".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AttributeValue, SeriesRow};
    use chrono::NaiveDate;

    fn series(rows: usize) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        TimeSeries {
            index_name: "utc_timestamp".into(),
            columns: vec!["DK_2".into()],
            rows: (0..rows)
                .map(|i| SeriesRow {
                    timestamp: (start + chrono::Duration::days(i as i64)).and_hms_opt(0, 0, 0).unwrap(),
                    values: vec![if i == 1 { None } else { Some(i as f64) }],
                })
                .collect(),
        }
    }

    #[test]
    fn head_limits_rows_and_marks_missing() {
        let text = format_series_head(&series(4), 2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("utc_timestamp"));
        assert!(lines[0].ends_with("DK_2"));
        assert!(lines[2].starts_with("2024-01-01 00:00:00"));
        assert!(lines[3].ends_with("NaN"));
        assert_eq!(lines[4], "... (2 more row(s))");
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("averyveryverylongname", 8), "averyve.");
        assert_eq!(truncate("short", 8), "short");
    }

    #[test]
    fn attribute_table_lists_every_fuel() {
        let mut map = AttributeMap::new();
        map.insert("coal".into(), AttributeValue::Number(0.38));
        map.insert("gas".into(), AttributeValue::Text("n/a".into()));
        let text = format_attribute_map("efficiency", &map);
        assert!(text.contains("coal"));
        assert!(text.contains("0.3800"));
        assert!(text.contains("n/a"));
    }
}
