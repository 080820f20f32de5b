//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and resolves environment defaults
//! - parses CLI arguments
//! - runs the loaders
//! - prints reports
//! - writes optional exports

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::cli::{AttributeArgs, Command, DemandArgs, GenerateArgs, PriceArgs, SummaryArgs, WindowArgs};
use crate::data::{SampleConfig, generate_sample_set, write_sample_set};
use crate::domain::{AttributeMap, DEFAULT_ZONE, DateBound, DemandOptions, PriceOptions};
use crate::error::{AppError, IngestError};
use crate::io::{load_demand, load_efficiency, load_plant_capacity, load_prices, load_storage};

pub mod pipeline;

/// Environment variable naming the default data directory.
pub const DATA_DIR_ENV: &str = "ENERGY_DATA_DIR";
/// Environment variable naming the default demand zone.
pub const ZONE_ENV: &str = "ENERGY_ZONE";

const DEFAULT_DATA_DIR: &str = "data";

/// Defaults read from the environment (and `.env`).
///
/// Explicit CLI flags always win over these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvDefaults {
    pub data_dir: PathBuf,
    pub zone: String,
}

impl EnvDefaults {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve defaults through `lookup` (the process environment in `from_env`).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            data_dir: non_empty(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            zone: non_empty(ZONE_ENV).unwrap_or_else(|| DEFAULT_ZONE.to_string()),
        }
    }
}

/// Entry point for the `eload` binary.
pub fn run() -> Result<(), AppError> {
    let defaults = EnvDefaults::from_env();

    // Bare `eload` behaves like `eload summary`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Summary(args) => handle_summary(args, &defaults),
        Command::Prices(args) => handle_prices(args),
        Command::Demand(args) => handle_demand(args, &defaults),
        Command::Storage(args) => handle_attributes(args, AttributeKind::Storage),
        Command::PlantCapacity(args) => handle_attributes(args, AttributeKind::PlantCapacity),
        Command::Efficiency(args) => handle_attributes(args, AttributeKind::Efficiency),
        Command::Generate(args) => handle_generate(args, &defaults),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeKind {
    Storage,
    PlantCapacity,
    Efficiency,
}

impl AttributeKind {
    fn label(self) -> &'static str {
        match self {
            AttributeKind::Storage => "Storage",
            AttributeKind::PlantCapacity => "Plant capacity",
            AttributeKind::Efficiency => "Efficiency",
        }
    }

    fn value_column(self) -> &'static str {
        match self {
            AttributeKind::Storage | AttributeKind::PlantCapacity => "capacity",
            AttributeKind::Efficiency => "efficiency",
        }
    }

    fn load(self, path: &std::path::Path) -> Result<AttributeMap, IngestError> {
        match self {
            AttributeKind::Storage => load_storage(path),
            AttributeKind::PlantCapacity => load_plant_capacity(path),
            AttributeKind::Efficiency => load_efficiency(path),
        }
    }
}

fn handle_summary(args: SummaryArgs, defaults: &EnvDefaults) -> Result<(), AppError> {
    let data_dir = args.data_dir.unwrap_or_else(|| defaults.data_dir.clone());
    let demand_options = DemandOptions {
        zone: defaults.zone.clone(),
        ..DemandOptions::default()
    };
    let out = pipeline::run_summary(&data_dir, &demand_options)?;

    println!("=== eload - summary of '{}' ===", out.data_dir.display());
    println!();
    println!("{}", crate::report::format_load_line("Prices", &out.prices));
    println!("{}", crate::report::format_series_head(&out.prices.series, args.head));
    println!("Storage:");
    println!("{}", crate::report::format_attribute_map("capacity", &out.storage));
    println!("Plant capacity:");
    println!("{}", crate::report::format_attribute_map("capacity", &out.plant_capacity));
    if let Some(efficiency) = &out.efficiency {
        println!("Efficiency:");
        println!("{}", crate::report::format_attribute_map("efficiency", efficiency));
    }
    println!("{}", crate::report::format_load_line("Demand", &out.demand));
    print!("{}", crate::report::format_series_head(&out.demand.series, args.head));

    Ok(())
}

fn handle_prices(args: PriceArgs) -> Result<(), AppError> {
    let options = PriceOptions {
        start: args.window.start.clone().map(DateBound::from),
        end: args.window.end.clone().map(DateBound::from),
        resample: args.window.resample,
    };
    let loaded = load_prices(&args.file, &options)?;

    println!("{}", crate::report::format_load_line("Prices", &loaded));
    print!("{}", crate::report::format_series_head(&loaded.series, args.window.head));

    export_series(&args.window, &loaded.series)
}

fn handle_demand(args: DemandArgs, defaults: &EnvDefaults) -> Result<(), AppError> {
    if !args.supply_factor.is_finite() {
        return Err(AppError::new(2, "`--supply-factor` must be a finite number."));
    }
    let options = DemandOptions {
        start: args.window.start.clone().map(DateBound::from),
        end: args.window.end.clone().map(DateBound::from),
        resample: args.window.resample,
        zone: args.zone.clone().unwrap_or_else(|| defaults.zone.clone()),
        supply_factor: args.supply_factor,
    };
    let loaded = load_demand(&args.file, &options)?;

    println!("{}", crate::report::format_load_line("Demand", &loaded));
    print!("{}", crate::report::format_series_head(&loaded.series, args.window.head));

    export_series(&args.window, &loaded.series)
}

fn handle_attributes(args: AttributeArgs, kind: AttributeKind) -> Result<(), AppError> {
    let map = kind.load(&args.file)?;

    println!("{}:", kind.label());
    print!("{}", crate::report::format_attribute_map(kind.value_column(), &map));

    if let Some(path) = &args.export {
        crate::io::export::write_attributes(path, kind.value_column(), &map)?;
    }
    Ok(())
}

fn handle_generate(args: GenerateArgs, defaults: &EnvDefaults) -> Result<(), AppError> {
    let start = NaiveDate::parse_from_str(args.start.trim(), "%Y-%m-%d")
        .map_err(|e| AppError::new(2, format!("Invalid `--start` '{}': {e}", args.start)))?;
    let config = SampleConfig {
        start,
        months: args.months,
        zones: args
            .zones
            .iter()
            .map(|z| z.trim().to_string())
            .filter(|z| !z.is_empty())
            .collect(),
        seed: args.seed,
    };
    let out_dir = args.out.unwrap_or_else(|| defaults.data_dir.clone());

    let set = generate_sample_set(&config)?;
    for path in write_sample_set(&out_dir, &set)? {
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn export_series(window: &WindowArgs, series: &crate::domain::TimeSeries) -> Result<(), AppError> {
    if let Some(path) = &window.export {
        crate::io::export::write_series(path, series)?;
    }
    Ok(())
}

/// Rewrite argv so `eload` defaults to `eload summary`.
///
/// Rules:
/// - `eload`                      -> `eload summary`
/// - `eload --data-dir X ...`     -> `eload summary --data-dir X ...`
/// - `eload --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("summary".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    // If the first token is a flag, treat it as "summary flags".
    if arg1.starts_with('-') {
        argv.insert(1, "summary".to_string());
    }

    argv
}
