//! Error taxonomy for loading and analyzing the episode tables.

use thiserror::Error;

/// Errors raised by the parsing and analysis stages.
///
/// `MissingInputField` and `InvalidValue` are structural and abort a run.
/// `InsufficientSample` and `DegenerateDensity` are recovered by the density
/// analyzer, which skips the affected genre.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("{table} table is missing required column '{field}'")]
    MissingInputField { table: &'static str, field: String },

    #[error("{table} table, line {line}: invalid value '{value}' in column '{field}'")]
    InvalidValue {
        table: &'static str,
        field: String,
        line: u64,
        value: String,
    },

    #[error("genre '{genre}': need at least {required} samples, got {actual}")]
    InsufficientSample {
        genre: String,
        required: usize,
        actual: usize,
    },

    #[error("genre '{genre}': degenerate density estimate ({reason})")]
    DegenerateDensity { genre: String, reason: String },
}

impl AnalysisError {
    /// Returns `true` for errors that are recovered locally instead of aborting the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::InsufficientSample { .. } | AnalysisError::DegenerateDensity { .. }
        )
    }
}
