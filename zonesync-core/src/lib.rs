//! zonesync Core Library
//!
//! Provides the reconciliation logic that keeps a declared DNS record set
//! in sync with an authoritative server, including:
//! - Record/Zone model with per-field and zone-wide validation
//! - State Service (live record queries with partial-failure degradation)
//! - Diff Engine and Plan Builder (pure functions over data)
//! - Reconcile Service (query → diff → plan → atomic apply)
//! - Zone Service (declared zone management)
//!
//! This library is platform-independent: server access and zone storage
//! are abstracted through traits, so front-ends inject real
//! implementations from `zonesync-authority` and test suites inject
//! doubles.

pub mod engine;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::{RecordLookup, UpdateTransport, ZoneRepository};
