//! Shared "summary" workflow: load every sample file from one directory.
//!
//! prices -> storage -> plant capacity -> demand (-> efficiency when present)

use std::path::{Path, PathBuf};

use crate::domain::{AttributeMap, DemandOptions, LoadedSeries, PriceOptions};
use crate::error::AppError;
use crate::io::{load_demand, load_efficiency, load_plant_capacity, load_prices, load_storage};

pub const PRICES_FILE: &str = "prices.csv";
pub const STORAGE_FILE: &str = "storage.csv";
pub const PLANT_CAPACITY_FILE: &str = "plant_capacity.csv";
pub const DEMAND_FILE: &str = "demand.csv";
pub const EFFICIENCY_FILE: &str = "efficiency.csv";

/// Everything loaded by `eload summary`.
#[derive(Debug, Clone)]
pub struct SummaryOutput {
    pub data_dir: PathBuf,
    pub prices: LoadedSeries,
    pub storage: AttributeMap,
    pub plant_capacity: AttributeMap,
    pub demand: LoadedSeries,
    pub efficiency: Option<AttributeMap>,
}

/// Load the sample files in `data_dir` with default options (demand zone
/// taken from `demand`).
pub fn run_summary(data_dir: &Path, demand: &DemandOptions) -> Result<SummaryOutput, AppError> {
    let prices = load_prices(data_dir.join(PRICES_FILE), &PriceOptions::default())?;
    let storage = load_storage(data_dir.join(STORAGE_FILE))?;
    let plant_capacity = load_plant_capacity(data_dir.join(PLANT_CAPACITY_FILE))?;
    let demand = load_demand(data_dir.join(DEMAND_FILE), demand)?;

    let efficiency_path = data_dir.join(EFFICIENCY_FILE);
    let efficiency = if efficiency_path.exists() {
        Some(load_efficiency(&efficiency_path)?)
    } else {
        log::debug!("no {EFFICIENCY_FILE} in '{}'", data_dir.display());
        None
    };

    Ok(SummaryOutput {
        data_dir: data_dir.to_path_buf(),
        prices,
        storage,
        plant_capacity,
        demand,
        efficiency,
    })
}
