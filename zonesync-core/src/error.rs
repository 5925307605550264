//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use zonesync_authority::AuthorityError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// A record or zone field failed validation
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The offending field
        field: String,
        /// The rule that was violated
        message: String,
    },

    /// Zone not found
    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    /// Zone name already in use
    #[error("Zone already exists: {0}")]
    ZoneExists(String),

    /// A diff/plan invariant was violated; indicates a bug upstream and
    /// halts the zone's reconciliation
    #[error("Planning invariant violated: {0}")]
    Planning(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Authoritative server error (converting from library)
    #[error("{0}")]
    Authority(#[from] AuthorityError),
}

impl CoreError {
    /// Shorthand for a [`Validation`](Self::Validation) error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether it is expected behavior (user input, resource does not
    /// exist, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error`
    /// when returning `false`.
    /// **Please update this method simultaneously when new variants are
    /// added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Validation { .. } | Self::ZoneNotFound(_) | Self::ZoneExists(_) => true,
            Self::Authority(e) => e.is_expected(),
            _ => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
