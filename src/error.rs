use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the loaders.
///
/// Structural problems (missing columns, bad timestamps, empty windows) are
/// errors. Individual cells that fail numeric coercion are not: they become
/// missing values.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to open '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read CSV '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{0}")]
    Format(String),

    #[error("{0}")]
    Range(String),

    #[error("{0}")]
    EmptyResult(String),

    #[error("Invalid date '{0}'. Expected e.g. YYYY-MM-DD, YYYY-MM-DD HH:MM:SS or RFC 3339.")]
    InvalidDate(String),

    #[error("Unsupported resample rule '{0}'. Expected one of: ME, M, MS, W, W-SUN, D, h, H, QE, Q, QS, YE, Y, A, YS, AS.")]
    InvalidRule(String),
}

impl IngestError {
    /// Process exit code used by the `eload` binary for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            IngestError::EmptyResult(_) => 3,
            _ => 2,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_maps_to_exit_code_3() {
        let err: AppError = IngestError::EmptyResult("No data in the selected date range.".into()).into();
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "No data in the selected date range.");
    }

    #[test]
    fn schema_errors_map_to_exit_code_2() {
        let err: AppError = IngestError::Format("Missing required columns: [\"oil\"]".into()).into();
        assert_eq!(err.exit_code(), 2);
        let err: AppError = IngestError::InvalidRule("5X".into()).into();
        assert_eq!(err.exit_code(), 2);
    }
}
