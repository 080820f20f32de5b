//! Time-series operations shared by the price and demand loaders.
//!
//! - date-window resolution and slicing (`window`)
//! - bucket assignment and aggregation (`resample`)

pub mod resample;
pub mod window;

pub use resample::{Aggregation, bucket_label, resample};
pub use window::{extend_to_month_end, resolve_window, slice_window};
