//! Business logic service layer

mod reconcile_service;
mod state_service;
mod zone_service;

pub use reconcile_service::{
    ApplyMode, ApplyReport, ReconcileReport, ReconcileService, VerifyReport,
};
pub use state_service::StateService;
pub use zone_service::ZoneService;

use std::sync::Arc;
use std::time::Duration;

use crate::traits::{RecordLookup, UpdateTransport, ZoneRepository};

/// Default per-query timeout for state lookups, in seconds.
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 5;

/// Service context - holds all dependencies
///
/// The platform layer creates this context and injects its own lookup,
/// transport, and storage implementations (or test doubles).
pub struct ServiceContext {
    /// Record lookups against the authoritative server
    pub lookup: Arc<dyn RecordLookup>,
    /// Update transaction submission
    pub transport: Arc<dyn UpdateTransport>,
    /// Declared zone persistence
    pub zone_repository: Arc<dyn ZoneRepository>,
    /// Time allowed for one label/type state query
    pub query_timeout: Duration,
}

impl ServiceContext {
    /// Create a service context with the default query timeout.
    #[must_use]
    pub fn new(
        lookup: Arc<dyn RecordLookup>,
        transport: Arc<dyn UpdateTransport>,
        zone_repository: Arc<dyn ZoneRepository>,
    ) -> Self {
        Self {
            lookup,
            transport,
            zone_repository,
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
        }
    }

    /// Override the per-query state lookup timeout.
    #[must_use]
    pub const fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}
