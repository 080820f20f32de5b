//! Reporting utilities: formatted terminal output for loaded tables.

pub mod format;

pub use format::*;
