//! Application-level error plus the typed errors of the pure core.
//!
//! The core modules (`align`, `score`, `domain`) return small `thiserror` enums
//! so callers can inspect what went wrong. At the application boundary every
//! error collapses into [`AppError`], which carries the process exit code.

use thiserror::Error;

/// Exit code for invalid configuration or CLI usage.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code when every retrieved series came back empty.
pub const EXIT_NO_DATA: u8 = 3;
/// Exit code for I/O, rendering, or other runtime failures.
pub const EXIT_RUNTIME: u8 = 4;

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

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(EXIT_CONFIG, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(EXIT_RUNTIME, message)
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

/// Errors from pointwise operations on two series.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    /// The two operands are not on the same date index.
    #[error("series '{left}' and '{right}' do not share a date index")]
    IndexMismatch { left: String, right: String },
}

/// Errors from aligning series onto a common daily calendar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignError {
    /// Every input series was empty, so no start date exists.
    #[error("all data series are empty; check API keys and data sources")]
    NoData,

    /// The earliest observation lies after the requested end date.
    #[error("earliest observation {start} is after the index end {end}")]
    StartAfterEnd {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

/// Errors from computing a composite score.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// A component's trailing window held no valid observations.
    #[error("{score}: component '{component}' has no valid observations in its {window}-day trailing window")]
    UndefinedComponent {
        score: &'static str,
        component: &'static str,
        window: usize,
    },

    #[error(transparent)]
    Series(#[from] SeriesError),
}

impl From<AlignError> for AppError {
    fn from(err: AlignError) -> Self {
        let code = match err {
            AlignError::NoData => EXIT_NO_DATA,
            AlignError::StartAfterEnd { .. } => EXIT_RUNTIME,
        };
        Self::new(code, err.to_string())
    }
}

impl From<SeriesError> for AppError {
    fn from(err: SeriesError) -> Self {
        Self::runtime(err.to_string())
    }
}

impl From<ScoreError> for AppError {
    fn from(err: ScoreError) -> Self {
        Self::runtime(err.to_string())
    }
}
