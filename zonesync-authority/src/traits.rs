use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{RecordAnswer, RecordType};

/// Read access to the records an authoritative server currently publishes.
///
/// Implementations query one `(fqdn, type)` RRset at a time against the
/// given server. A name with no records of the requested type resolves to
/// an empty vector — `Err` is reserved for lookups that actually failed
/// (timeout, refusal, unreachable server).
#[async_trait]
pub trait RecordLookup: Send + Sync {
    /// Query the published RRset of one type at an absolute name.
    ///
    /// # Arguments
    /// * `server` - Nameserver to query (hostname or IP address)
    /// * `fqdn` - Absolute record name, with or without the trailing dot
    /// * `record_type` - RRset type to fetch
    async fn query(
        &self,
        server: &str,
        fqdn: &str,
        record_type: RecordType,
    ) -> Result<Vec<RecordAnswer>>;
}

/// Submission of one transactional update to an authoritative server.
///
/// The script is the full line-oriented transaction (`server`/`zone`
/// directives, `update` primitives, `send`); the server applies it
/// atomically or rejects it entirely. Implementations never retry and
/// never split a script — a failed submission leaves live state unknown,
/// and the caller must re-query before planning again.
#[async_trait]
pub trait UpdateTransport: Send + Sync {
    /// Submit one rendered update transaction.
    ///
    /// Returns the update client's standard output on success.
    ///
    /// # Arguments
    /// * `server` - Authoritative server the transaction targets
    /// * `key_file` - TSIG key file authenticating the update
    /// * `script` - Rendered update script
    async fn submit(&self, server: &str, key_file: &Path, script: &str) -> Result<String>;
}
