//! Command-line parsing for the `eload` binary.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the loading code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_SUPPLY_FACTOR, ResampleRule};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "eload", version, about = "Energy-market CSV loader and resampler")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the sample files from a data directory and print summaries.
    Summary(SummaryArgs),
    /// Load and resample a fuel price file (mean per bucket).
    Prices(PriceArgs),
    /// Load and resample one zone of a demand file (sum per bucket).
    Demand(DemandArgs),
    /// Load storage capacities (`fuel`, `capacity`).
    Storage(AttributeArgs),
    /// Load plant capacities (`fuel`, `capacity`).
    PlantCapacity(AttributeArgs),
    /// Load efficiency rates (`fuel`, `efficiency`).
    Efficiency(AttributeArgs),
    /// Write a synthetic sample data set.
    Generate(GenerateArgs),
}

/// Options shared by the time-series commands.
#[derive(Debug, Args, Clone)]
pub struct WindowArgs {
    /// Inclusive start (e.g. 2024-01-01). Defaults to the first timestamp in the file.
    #[arg(long)]
    pub start: Option<String>,

    /// Inclusive end; extended to 23:00 on the last day of its month.
    /// Defaults to the last timestamp in the file.
    #[arg(long)]
    pub end: Option<String>,

    /// Resample rule (ME, MS, W, D, h, QE, QS, YE, YS).
    #[arg(long, default_value_t = ResampleRule::MonthEnd)]
    pub resample: ResampleRule,

    /// Number of rows to print.
    #[arg(long, default_value_t = 12)]
    pub head: usize,

    /// Export the resampled series (`.json` for JSON, otherwise CSV).
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct PriceArgs {
    /// Price CSV: `[date, coal, gas, oil, extras...]`.
    pub file: PathBuf,

    #[command(flatten)]
    pub window: WindowArgs,
}

#[derive(Debug, Args, Clone)]
pub struct DemandArgs {
    /// Demand CSV: `[timestamp, zone_1, ..., zone_n]`.
    pub file: PathBuf,

    /// Zone column (case-insensitive). Defaults to `ENERGY_ZONE` or DK_2.
    #[arg(long)]
    pub zone: Option<String>,

    /// Share of total demand to supply, applied after aggregation.
    #[arg(long, default_value_t = DEFAULT_SUPPLY_FACTOR)]
    pub supply_factor: f64,

    #[command(flatten)]
    pub window: WindowArgs,
}

#[derive(Debug, Args, Clone)]
pub struct AttributeArgs {
    /// Attribute CSV (`fuel` plus the value column).
    pub file: PathBuf,

    /// Export the map (`.json` for JSON, otherwise CSV).
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    /// Directory holding prices.csv, storage.csv, plant_capacity.csv,
    /// demand.csv (and optionally efficiency.csv). Defaults to
    /// `ENERGY_DATA_DIR` or `data`.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Number of rows to print per series.
    #[arg(long, default_value_t = 5)]
    pub head: usize,
}

#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Output directory. Defaults to `ENERGY_DATA_DIR` or `data`.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First month (YYYY-MM-DD; the day is ignored).
    #[arg(long, default_value = "2024-01-01")]
    pub start: String,

    /// Number of months to generate.
    #[arg(long, default_value_t = 12)]
    pub months: u32,

    /// Demand zones (comma-separated).
    #[arg(long, value_delimiter = ',', default_values_t = ["DK_1".to_string(), "DK_2".to_string(), "SE_4".to_string()])]
    pub zones: Vec<String>,
}
