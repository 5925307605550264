use serde::{Deserialize, Serialize};

/// Unified error type for authoritative-server operations.
///
/// Variants distinguish the three failure classes a caller must handle
/// differently: authentication rejections (fatal, fix the key), server
/// rejections (fatal, fix the update), and connectivity problems
/// (transient — the caller may retry, but only after a fresh state query).
///
/// # Retryable Errors
///
/// [`Network`](Self::Network) and [`Timeout`](Self::Timeout) are transient.
/// This crate never retries on its own: a submitted update transaction must
/// not be replayed against live state that may have changed since it was
/// planned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum AuthorityError {
    /// A network-level error occurred (server unreachable, connection
    /// refused, resolution failure).
    Network {
        /// Error details.
        detail: String,
    },

    /// The operation did not complete within the configured timeout.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The configured server address could not be used.
    InvalidServer {
        /// The server as configured.
        server: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The server rejected the update's authentication (TSIG key mismatch,
    /// expired signature, unreadable key file).
    AuthRejected {
        /// Raw message from the server or update client.
        detail: String,
    },

    /// The server rejected the update itself (policy refusal, malformed
    /// script, wrong zone).
    Rejected {
        /// Raw message from the server or update client.
        detail: String,
        /// The offending script line, when the client named one.
        #[serde(skip_serializing_if = "Option::is_none")]
        step: Option<String>,
    },

    /// The external update client could not be run.
    Process {
        /// Error details.
        detail: String,
    },
}

impl AuthorityError {
    /// Whether this is expected behavior (bad configuration, server policy)
    /// rather than an environment fault, used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error`
    /// when returning `false`.
    #[must_use]
    pub const fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::AuthRejected { .. } | Self::Rejected { .. } | Self::InvalidServer { .. }
        )
    }

    /// Whether the failure is transient and a later attempt may succeed.
    ///
    /// A retry must start from a fresh state query; replaying a stale
    /// update transaction is never safe.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }
}

impl std::fmt::Display for AuthorityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network { detail } => write!(f, "Network error: {detail}"),
            Self::Timeout { detail } => write!(f, "Timeout: {detail}"),
            Self::InvalidServer { server, detail } => {
                write!(f, "Invalid server '{server}': {detail}")
            }
            Self::AuthRejected { detail } => {
                write!(f, "Update authentication rejected: {detail}")
            }
            Self::Rejected {
                detail,
                step: Some(step),
            } => {
                write!(f, "Update rejected at '{step}': {detail}")
            }
            Self::Rejected { detail, step: None } => write!(f, "Update rejected: {detail}"),
            Self::Process { detail } => write!(f, "Update client error: {detail}"),
        }
    }
}

impl std::error::Error for AuthorityError {}

/// Convenience type alias for `Result<T, AuthorityError>`.
pub type Result<T> = std::result::Result<T, AuthorityError>;
