//! Synthetic sample data set for trying the loaders end to end.
//!
//! Generates monthly fuel prices (with a `lignite` extra column), hourly
//! demand for a handful of zones, and the three fuel attribute tables. Output
//! is fully determined by the seed.

use std::f64::consts::PI;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::error::AppError;

/// Baseline monthly price level per fuel column.
const PRICE_BASE: [(&str, f64); 4] = [("coal", 95.0), ("gas", 38.0), ("oil", 82.0), ("lignite", 21.0)];

/// Relative month-on-month price volatility.
const PRICE_VOL: f64 = 0.04;

/// Relative hourly demand noise.
const DEMAND_NOISE: f64 = 0.03;

const STORAGE: [(&str, f64); 4] = [("coal", 450_000.0), ("gas", 320_000.0), ("oil", 180_000.0), ("lignite", 90_000.0)];
const PLANT_CAPACITY: [(&str, f64); 4] = [("coal", 1_800.0), ("gas", 2_400.0), ("oil", 600.0), ("lignite", 900.0)];
const EFFICIENCY: [(&str, f64); 4] = [("coal", 0.38), ("gas", 0.55), ("oil", 0.35), ("lignite", 0.33)];

/// What to generate.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub start: NaiveDate,
    pub months: u32,
    pub zones: Vec<String>,
    pub seed: u64,
}

/// Generated tables, ready to be written as CSV.
#[derive(Debug, Clone)]
pub struct SampleSet {
    /// `(month start, [coal, gas, oil, lignite])`.
    pub prices: Vec<(NaiveDate, [f64; 4])>,
    pub zones: Vec<String>,
    /// `(UTC hour, one value per zone)`.
    pub demand: Vec<(NaiveDateTime, Vec<f64>)>,
    pub storage: Vec<(String, f64)>,
    pub plant_capacity: Vec<(String, f64)>,
    pub efficiency: Vec<(String, f64)>,
}

pub fn generate_sample_set(config: &SampleConfig) -> Result<SampleSet, AppError> {
    if config.months == 0 {
        return Err(AppError::new(2, "Sample month count must be > 0."));
    }
    if config.zones.is_empty() {
        return Err(AppError::new(2, "At least one demand zone is required."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let start = config
        .start
        .with_day(1)
        .ok_or_else(|| AppError::new(2, "Invalid sample start date."))?;

    // Prices: multiplicative random walk per fuel.
    let mut levels: Vec<f64> = PRICE_BASE.iter().map(|(_, base)| *base).collect();
    let mut prices = Vec::with_capacity(config.months as usize);
    let mut month = start;
    for _ in 0..config.months {
        let mut row = [0.0; 4];
        for (slot, level) in row.iter_mut().zip(levels.iter_mut()) {
            *level *= (PRICE_VOL * normal.sample(&mut rng)).exp();
            *slot = round_to(*level, 2);
        }
        prices.push((month, row));
        month = next_month(month).ok_or_else(|| AppError::new(2, "Sample range overflows the calendar."))?;
    }
    let end = month;

    // Demand: daily cycle on a zone-specific base load.
    let bases: Vec<f64> = (0..config.zones.len())
        .map(|_| rng.gen_range(1_200.0..3_500.0))
        .collect();
    let mut demand = Vec::new();
    let mut hour = start.and_hms_opt(0, 0, 0).ok_or_else(|| AppError::new(4, "Invalid sample start hour."))?;
    let stop = end.and_hms_opt(0, 0, 0).ok_or_else(|| AppError::new(4, "Invalid sample end hour."))?;
    while hour < stop {
        let daily = 1.0 + 0.2 * (2.0 * PI * (f64::from(hour.hour()) - 6.0) / 24.0).sin();
        let values = bases
            .iter()
            .map(|base| {
                let noise = 1.0 + DEMAND_NOISE * normal.sample(&mut rng);
                round_to((base * daily * noise).max(0.0), 1)
            })
            .collect();
        demand.push((hour, values));
        hour += Duration::hours(1);
    }

    Ok(SampleSet {
        prices,
        zones: config.zones.clone(),
        demand,
        storage: owned(&STORAGE),
        plant_capacity: owned(&PLANT_CAPACITY),
        efficiency: owned(&EFFICIENCY),
    })
}

/// Write every table of `set` into `dir` and return the written paths.
pub fn write_sample_set(dir: &Path, set: &SampleSet) -> Result<Vec<PathBuf>, AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::new(4, format!("Failed to create '{}': {e}", dir.display())))?;

    let mut written = Vec::new();

    let path = dir.join("prices.csv");
    let mut header = vec!["month".to_string()];
    header.extend(PRICE_BASE.iter().map(|(name, _)| name.to_string()));
    let rows = set.prices.iter().map(|(month, values)| {
        let mut record = vec![month.format("%Y-%m-%d").to_string()];
        record.extend(values.iter().map(|v| v.to_string()));
        record
    });
    write_csv(&path, &header, rows)?;
    written.push(path);

    let path = dir.join("demand.csv");
    let mut header = vec!["utc_timestamp".to_string()];
    header.extend(set.zones.iter().cloned());
    let rows = set.demand.iter().map(|(ts, values)| {
        let mut record = vec![ts.format("%Y-%m-%d %H:%M:%S+00:00").to_string()];
        record.extend(values.iter().map(|v| v.to_string()));
        record
    });
    write_csv(&path, &header, rows)?;
    written.push(path);

    for (name, column, table) in [
        ("storage.csv", "capacity", &set.storage),
        ("plant_capacity.csv", "capacity", &set.plant_capacity),
        ("efficiency.csv", "efficiency", &set.efficiency),
    ] {
        let path = dir.join(name);
        let header = vec!["fuel".to_string(), column.to_string()];
        let rows = table.iter().map(|(fuel, v)| vec![fuel.clone(), v.to_string()]);
        write_csv(&path, &header, rows)?;
        written.push(path);
    }

    log::info!("wrote {} sample file(s) to '{}'", written.len(), dir.display());
    Ok(written)
}

fn write_csv(
    path: &Path,
    header: &[String],
    rows: impl Iterator<Item = Vec<String>>,
) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(4, format!("Failed to create '{}': {e}", path.display())))?;
    writer
        .write_record(header)
        .map_err(|e| AppError::new(4, format!("Failed to write '{}': {e}", path.display())))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| AppError::new(4, format!("Failed to write '{}': {e}", path.display())))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush '{}': {e}", path.display())))?;
    Ok(())
}

fn next_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn owned(table: &[(&str, f64)]) -> Vec<(String, f64)> {
    table.iter().map(|(fuel, v)| (fuel.to_string(), *v)).collect()
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (v * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DemandOptions, PriceOptions};
    use crate::io::{load_demand, load_prices, load_storage};

    fn config() -> SampleConfig {
        SampleConfig {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            months: 2,
            zones: vec!["DK_1".into(), "DK_2".into()],
            seed: 7,
        }
    }

    #[test]
    fn same_seed_same_data() {
        let a = generate_sample_set(&config()).unwrap();
        let b = generate_sample_set(&config()).unwrap();
        assert_eq!(a.prices, b.prices);
        assert_eq!(a.demand, b.demand);
        // January + February 2024 (leap year).
        assert_eq!(a.demand.len(), (31 + 29) * 24);
    }

    #[test]
    fn rejects_empty_config() {
        let mut cfg = config();
        cfg.months = 0;
        assert!(generate_sample_set(&cfg).is_err());
        let mut cfg = config();
        cfg.zones.clear();
        assert!(generate_sample_set(&cfg).is_err());
    }

    #[test]
    fn written_files_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let set = generate_sample_set(&config()).unwrap();
        let written = write_sample_set(dir.path(), &set).unwrap();
        assert_eq!(written.len(), 5);

        let prices = load_prices(dir.path().join("prices.csv"), &PriceOptions::default()).unwrap();
        assert_eq!(prices.series.columns, vec!["coal", "gas", "oil", "lignite"]);
        assert_eq!(prices.series.len(), 2);

        let demand = load_demand(dir.path().join("demand.csv"), &DemandOptions::default()).unwrap();
        assert_eq!(demand.series.columns, vec!["DK_2"]);
        assert_eq!(demand.rows_in_window, (31 + 29) * 24);

        let storage = load_storage(dir.path().join("storage.csv")).unwrap();
        assert_eq!(storage.len(), 4);
    }
}
