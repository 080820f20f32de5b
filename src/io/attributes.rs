//! Fuel attribute loaders (storage, plant capacity, efficiency).
//!
//! Each file pairs a `fuel` column with one value column. The result maps
//! fuel name to value; a repeated fuel name keeps its last value.

use std::path::Path;

use crate::domain::{AttributeMap, AttributeValue};
use crate::error::IngestError;
use crate::io::table::read_table;

/// Load storage capacities (`fuel`, `capacity`).
pub fn load_storage(path: impl AsRef<Path>) -> Result<AttributeMap, IngestError> {
    load_attribute_map(path.as_ref(), "storage", "capacity")
}

/// Load plant capacities (`fuel`, `capacity`).
pub fn load_plant_capacity(path: impl AsRef<Path>) -> Result<AttributeMap, IngestError> {
    load_attribute_map(path.as_ref(), "plant_capacity", "capacity")
}

/// Load efficiency rates (`fuel`, `efficiency`).
pub fn load_efficiency(path: impl AsRef<Path>) -> Result<AttributeMap, IngestError> {
    load_attribute_map(path.as_ref(), "efficiency", "efficiency")
}

/// Pair the `fuel` column with `value_column`, row by row in file order.
pub fn load_attribute_map(
    path: &Path,
    kind: &str,
    value_column: &str,
) -> Result<AttributeMap, IngestError> {
    let table = read_table(path)?;
    let header_map = table.header_map();

    let (Some(&fuel_idx), Some(&value_idx)) =
        (header_map.get("fuel"), header_map.get(value_column))
    else {
        return Err(IngestError::Format(format!(
            "{kind}.csv must contain columns: fuel, {value_column} (found: {:?})",
            table.headers
        )));
    };

    let mut map = AttributeMap::new();
    for (line, record) in &table.records {
        let fuel = record.get(fuel_idx).map(str::trim).unwrap_or("");
        if fuel.is_empty() {
            log::warn!("skipping line {line} of '{}': empty fuel name", path.display());
            continue;
        }
        let value = AttributeValue::parse(record.get(value_idx).unwrap_or(""));
        map.insert(fuel.to_string(), value);
    }

    log::info!("{kind} '{}': {} fuel(s)", path.display(), map.len());
    Ok(map)
}
