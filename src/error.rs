//! Error types.
//!
//! Two layers:
//!
//! - `AnalysisError` / `SampleError`: typed failures raised by the engine.
//!   A `SampleError` carries the identity of the sample that failed so batch
//!   callers can report it without aborting the other samples.
//! - `AppError`: what the `sieve` binary exits with (message + exit code).

use thiserror::Error;

/// A data-validity failure detected while analysing one sample.
///
/// None of these are retryable: the computation is deterministic, so the same
/// input always fails the same way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Malformed sieve table (too few rows, non-monotonic sizes, negative mass, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A denominator of a statistic or of the mass normalisation is zero.
    #[error("division by zero: {0}")]
    DivisionByZero(&'static str),
    /// The interpolated grid has no exact row for the requested percentile.
    #[error("no interpolated grain size at {0}% cumulative")]
    MissingPercentile(f64),
    /// No porosity value is available for an estimator row.
    #[error("porosity undefined for estimator '{0}'")]
    UndefinedPorosity(&'static str),
}

impl AnalysisError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// An `AnalysisError` tagged with the sample it belongs to.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("sample '{sample}': {source}")]
pub struct SampleError {
    pub sample: String,
    #[source]
    pub source: AnalysisError,
}

impl SampleError {
    pub fn new(sample: impl Into<String>, source: AnalysisError) -> Self {
        Self {
            sample: sample.into(),
            source,
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

impl From<SampleError> for AppError {
    fn from(err: SampleError) -> Self {
        // Input problems are rejected data (3); everything else is a numeric failure (4).
        let exit_code = match err.source {
            AnalysisError::InvalidInput(_) => 3,
            AnalysisError::DivisionByZero(_)
            | AnalysisError::MissingPercentile(_)
            | AnalysisError::UndefinedPorosity(_) => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}
