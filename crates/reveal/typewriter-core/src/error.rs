//! Error types for the reveal engine

use serde::{Deserialize, Serialize};

/// Error type for reveal operations.
///
/// A run that has started cannot fail; errors only arise at the
/// configuration boundary, before any state changes.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RevealError {
    /// Rejected configuration (never clamped)
    #[error("invalid configuration: {field} must be a finite, non-negative number of milliseconds (got {value})")]
    InvalidConfiguration { field: String, value: f64 },

    /// Configuration JSON from the content layer failed to parse
    #[error("configuration parse error: {reason}")]
    Parse { reason: String },
}

impl RevealError {
    /// Create an invalid-configuration error for a named delay field
    pub fn invalid_configuration(field: impl Into<String>, value: f64) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            value,
        }
    }

    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration { .. } => "validation",
            Self::Parse { .. } => "parse",
        }
    }
}

impl From<serde_json::Error> for RevealError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            reason: err.to_string(),
        }
    }
}
