//! Transactional updates through the `nsupdate` utility.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::{AuthorityError, Result};
use crate::traits::UpdateTransport;

/// Default time allowed for one update transaction, including TCP retries.
const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Markers in `nsupdate` diagnostics that indicate the update's
/// authentication was rejected rather than the update itself.
const AUTH_MARKERS: [&str; 7] = [
    "badkey",
    "badsig",
    "badtime",
    "notauth",
    "tsig",
    "bad key",
    "could not read key",
];

/// Markers that indicate the server never processed the transaction.
const NETWORK_MARKERS: [&str; 5] = [
    "timed out",
    "no response",
    "connection refused",
    "network unreachable",
    "communications error",
];

/// [`UpdateTransport`] implementation that drives the `nsupdate` binary.
///
/// The rendered script is piped to `nsupdate -k <key_file>` on stdin; the
/// `server` and `zone` directives inside the script select the target, so
/// the transaction goes to the zone's authoritative server regardless of
/// the host resolver configuration. One call is one transaction — a failed
/// call is never resubmitted here.
#[derive(Debug, Clone)]
pub struct NsupdateClient {
    executable: String,
    timeout: Duration,
}

impl NsupdateClient {
    /// Create a client using the `nsupdate` found on `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            executable: "nsupdate".to_string(),
            timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }

    /// Use a specific executable path instead of `nsupdate` from `PATH`.
    #[must_use]
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Override the transaction timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for NsupdateClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpdateTransport for NsupdateClient {
    async fn submit(&self, _server: &str, key_file: &Path, script: &str) -> Result<String> {
        let mut child = Command::new(&self.executable)
            .arg("-k")
            .arg(key_file)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AuthorityError::Process {
                detail: format!("failed to spawn '{}': {e}", self.executable),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(script.as_bytes())
                .await
                .map_err(|e| AuthorityError::Process {
                    detail: format!("failed to write update script: {e}"),
                })?;
        }

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| AuthorityError::Timeout {
                detail: format!(
                    "nsupdate did not finish within {}s",
                    self.timeout.as_secs()
                ),
            })?
            .map_err(|e| AuthorityError::Process {
                detail: format!("failed to collect nsupdate output: {e}"),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if output.status.success() && stderr.trim().is_empty() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(classify_failure(stderr.trim(), script))
        }
    }
}

/// Map `nsupdate` diagnostics onto the transport error taxonomy.
fn classify_failure(stderr: &str, script: &str) -> AuthorityError {
    let lower = stderr.to_ascii_lowercase();
    let detail = if stderr.is_empty() {
        "nsupdate exited with an error and no diagnostics".to_string()
    } else {
        stderr.to_string()
    };

    if AUTH_MARKERS.iter().any(|m| lower.contains(m)) {
        AuthorityError::AuthRejected { detail }
    } else if NETWORK_MARKERS.iter().any(|m| lower.contains(m)) {
        AuthorityError::Network { detail }
    } else {
        AuthorityError::Rejected {
            step: offending_step(&lower, script),
            detail,
        }
    }
}

/// Recover the script line `nsupdate` complained about, when its
/// diagnostics carry a `line N` reference (syntax errors do).
fn offending_step(stderr_lower: &str, script: &str) -> Option<String> {
    let idx = stderr_lower.find("line ")?;
    let rest = &stderr_lower[idx + "line ".len()..];
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    let line_no: usize = digits.parse().ok()?;
    script
        .lines()
        .nth(line_no.checked_sub(1)?)
        .map(ToString::to_string)
}
