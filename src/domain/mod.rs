//! Domain types used throughout the loaders.
//!
//! This module defines:
//!
//! - loader options (`PriceOptions`, `DemandOptions`, `DateBound`, `ResampleRule`)
//! - loaded tables (`TimeSeries`, `LoadedSeries`, `AttributeMap`)

pub mod types;

pub use types::*;
