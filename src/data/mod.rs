//! Synthetic sample data generation (`eload generate`).

pub mod sample;

pub use sample::{SampleConfig, SampleSet, generate_sample_set, write_sample_set};
