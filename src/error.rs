//! Error types.
//!
//! - `CurveError` is the typed error of the analysis core (table, model, fit).
//! - `AppError` is what the binary reports: an exit code plus a message.

use thiserror::Error;

/// Errors raised by the analysis core.
#[derive(Debug, Error)]
pub enum CurveError {
    #[error("column `{column}` not available, available columns: [{}]", available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    #[error("invalid value {value:?} in column `{column}` (line {line}): expected a number")]
    InvalidValue {
        column: String,
        line: usize,
        value: String,
    },

    #[error("input has no data rows")]
    EmptyTable,

    #[error("need at least two columns (index + one series), found {0}")]
    TooFewColumns(usize),

    #[error("series `{0}` has no finite values")]
    EmptySeries(&'static str),

    #[error("shape mismatch: model takes {expected} coefficients, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error(
        "fit did not converge (degree {degree}, initial guess {initial_guess:?}): {reason}"
    )]
    FitConvergence {
        degree: usize,
        initial_guess: Vec<f64>,
        reason: String,
    },

    #[error("invalid filter {0:?}: expected `column=value`")]
    InvalidFilter(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CurveError {
    /// Process exit code for this error class.
    ///
    /// - 2: configuration (missing column, bad flags, unreadable file)
    /// - 3: data (empty input, non-numeric cells)
    /// - 4: fit / numeric failures
    pub fn exit_code(&self) -> u8 {
        match self {
            CurveError::ColumnNotFound { .. }
            | CurveError::InvalidFilter(_)
            | CurveError::Io(_)
            | CurveError::Csv(_) => 2,
            CurveError::InvalidValue { .. }
            | CurveError::EmptyTable
            | CurveError::TooFewColumns(_)
            | CurveError::EmptySeries(_) => 3,
            CurveError::ShapeMismatch { .. } | CurveError::FitConvergence { .. } => 4,
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

impl From<CurveError> for AppError {
    fn from(err: CurveError) -> Self {
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
    fn column_not_found_lists_alternatives() {
        let err = CurveError::ColumnNotFound {
            column: "nonexistent".to_string(),
            available: vec!["trial".to_string(), "test_score".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("nonexistent"));
        assert!(msg.contains("trial, test_score"));
        assert_eq!(AppError::from(err).exit_code(), 2);
    }

    #[test]
    fn convergence_error_maps_to_fit_exit_code() {
        let err = CurveError::FitConvergence {
            degree: 3,
            initial_guess: vec![0.1; 4],
            reason: "LostPatience".to_string(),
        };
        assert!(err.to_string().contains("degree 3"));
        assert_eq!(err.exit_code(), 4);
    }
}
