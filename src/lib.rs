//! `energy-ingest` library crate.
//!
//! Loaders for energy-market CSV files: fuel prices and electricity demand
//! (windowed + resampled time series) and per-fuel attribute tables
//! (storage, plant capacity, efficiency).
//!
//! The binary (`eload`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - downstream planning code can call the loaders directly

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod series;

pub use domain::{
    AttributeMap, AttributeValue, DateBound, DemandOptions, LoadedSeries, PriceOptions, ResampleRule,
    TimeSeries,
};
pub use error::IngestError;
pub use io::{load_demand, load_efficiency, load_plant_capacity, load_prices, load_storage};
