//! Shared error type across organism crates.

use thiserror::Error;

/// Stable error codes used in logs and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A metric with the same name is already registered.
    DuplicateMetric,
    /// Metric or label name does not fit the exposition grammar.
    InvalidName,
    /// Label set does not match the instrument's declared label names.
    InvalidLabels,
    /// Histogram bucket layout is empty, unordered or non-finite.
    InvalidBuckets,
    /// Observed value is negative or not finite.
    InvalidObservation,
    /// Configuration failed to parse or validate.
    BadConfig,
    /// Listening address could not be bound.
    BindFailed,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::DuplicateMetric => "DUPLICATE_METRIC",
            ErrorCode::InvalidName => "INVALID_NAME",
            ErrorCode::InvalidLabels => "INVALID_LABELS",
            ErrorCode::InvalidBuckets => "INVALID_BUCKETS",
            ErrorCode::InvalidObservation => "INVALID_OBSERVATION",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::BindFailed => "BIND_FAILED",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, OrganismError>;

/// Unified error type used by core and service.
#[derive(Debug, Error)]
pub enum OrganismError {
    #[error("metric already registered: {0}")]
    DuplicateMetricName(String),
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("invalid labels: {0}")]
    InvalidLabels(String),
    #[error("invalid buckets: {0}")]
    InvalidBuckets(String),
    #[error("invalid observation: {0}")]
    InvalidObservation(f64),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("bind {addr} failed: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("internal: {0}")]
    Internal(String),
}

impl OrganismError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            OrganismError::DuplicateMetricName(_) => ErrorCode::DuplicateMetric,
            OrganismError::InvalidName(_) => ErrorCode::InvalidName,
            OrganismError::InvalidLabels(_) => ErrorCode::InvalidLabels,
            OrganismError::InvalidBuckets(_) => ErrorCode::InvalidBuckets,
            OrganismError::InvalidObservation(_) => ErrorCode::InvalidObservation,
            OrganismError::BadConfig(_) => ErrorCode::BadConfig,
            OrganismError::Bind { .. } => ErrorCode::BindFailed,
            OrganismError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Whether the error must stop the process when it surfaces at startup.
    ///
    /// A rejected observation only drops that single sample; everything else
    /// is a broken build or environment.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, OrganismError::InvalidObservation(_))
    }
}
