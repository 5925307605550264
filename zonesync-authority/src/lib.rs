//! # zonesync-authority
//!
//! Authoritative DNS server access for zonesync.
//!
//! This crate owns everything that touches the network on behalf of the
//! reconciliation core:
//!
//! - Typed record data ([`RecordData`], [`RecordType`], [`RecordAnswer`])
//! - The two I/O seams the core consumes ([`RecordLookup`],
//!   [`UpdateTransport`])
//! - Production implementations: [`HickoryLookup`] queries a zone's
//!   advertised server directly via hickory-resolver, and
//!   [`NsupdateClient`] submits rendered update transactions through the
//!   `nsupdate` utility
//! - The transport error taxonomy ([`AuthorityError`]), which separates
//!   authentication rejections, server rejections, and transient
//!   connectivity failures
//!
//! Nothing here retries. A rejected or timed-out transaction leaves the
//! live state unknown; callers re-query and re-plan instead of replaying.

pub mod error;
pub mod lookup;
pub mod nsupdate;
pub mod resolver;
pub mod traits;
pub mod types;

// Re-export common types
pub use error::{AuthorityError, Result};
pub use lookup::HickoryLookup;
pub use nsupdate::NsupdateClient;
pub use traits::{RecordLookup, UpdateTransport};
pub use types::{RecordAnswer, RecordData, RecordType};
