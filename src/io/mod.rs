//! Input/output helpers.
//!
//! - CSV table reading, timestamp parsing and numeric coercion (`table`)
//! - the loaders (`prices`, `demand`, `attributes`)
//! - result exports (CSV/JSON) (`export`)

pub mod attributes;
pub mod demand;
pub mod export;
pub mod prices;
pub mod table;

pub use attributes::*;
pub use demand::*;
pub use export::*;
pub use prices::*;
