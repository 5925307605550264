//! Platform-agnostic application bootstrap for zonesync.
//!
//! Provides `AppState` (service container) and `AppStateBuilder`
//! (adapter injection). Front-ends construct this once at startup; tests
//! swap the lookup, transport, or store for doubles.

pub mod adapters;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use zonesync_authority::{HickoryLookup, NsupdateClient, RecordData, RecordLookup, UpdateTransport};
use zonesync_core::services::{ReconcileService, StateService, ZoneService};
use zonesync_core::types::{Record, Zone};
use zonesync_core::{ServiceContext, ZoneRepository};

use crate::adapters::JsonZoneStore;

/// Default config location: `<config_dir>/zonesync/zones.json`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("zonesync")
        .join("zones.json")
}

/// Platform-agnostic application state.
///
/// Holds the `ServiceContext` and every service built over it.
pub struct AppState {
    /// Service context (holds lookup, transport, and storage adapters)
    pub ctx: Arc<ServiceContext>,
    /// Declared zone management
    pub zone_service: ZoneService,
    /// Live state queries
    pub state_service: StateService,
    /// Query → diff → plan → apply pipeline
    pub reconcile_service: ReconcileService,
}

/// Builder injecting platform adapters into [`AppState`].
///
/// Every component has a production default: the JSON zone store at
/// [`default_config_path()`], hickory-based lookups, and the `nsupdate`
/// transport.
#[derive(Default)]
pub struct AppStateBuilder {
    zone_store: Option<Arc<dyn ZoneRepository>>,
    lookup: Option<Arc<dyn RecordLookup>>,
    transport: Option<Arc<dyn UpdateTransport>>,
    query_timeout: Option<Duration>,
}

impl AppStateBuilder {
    /// Start from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific zone store.
    #[must_use]
    pub fn with_zone_store(mut self, store: Arc<dyn ZoneRepository>) -> Self {
        self.zone_store = Some(store);
        self
    }

    /// Use a specific record lookup implementation.
    #[must_use]
    pub fn with_lookup(mut self, lookup: Arc<dyn RecordLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Use a specific update transport implementation.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn UpdateTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Override the per-query state lookup timeout.
    #[must_use]
    pub const fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Build the application state.
    #[must_use]
    pub fn build(self) -> AppState {
        let zone_store = self
            .zone_store
            .unwrap_or_else(|| Arc::new(JsonZoneStore::new(default_config_path())));
        let lookup = self
            .lookup
            .unwrap_or_else(|| Arc::new(HickoryLookup::new()));
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(NsupdateClient::new()));

        let mut ctx = ServiceContext::new(lookup, transport, zone_store);
        if let Some(timeout) = self.query_timeout {
            ctx = ctx.with_query_timeout(timeout);
        }
        let ctx = Arc::new(ctx);

        AppState {
            zone_service: ZoneService::new(ctx.clone()),
            state_service: StateService::new(ctx.clone()),
            reconcile_service: ReconcileService::new(ctx.clone()),
            ctx,
        }
    }
}

/// A starter configuration demonstrating the declaration format.
#[must_use]
pub fn sample_config() -> Vec<Zone> {
    vec![Zone {
        name: "example.com".to_string(),
        server: "ns1.example.com".to_string(),
        key_file: PathBuf::from("/etc/nsupdate/example.com.key"),
        notes: Some("Sandbox zone used for demonstrating zonesync.".to_string()),
        default_ttl: 3600,
        records: vec![
            Record {
                label: "@".to_string(),
                ttl: Some(600),
                data: RecordData::A {
                    address: std::net::Ipv4Addr::new(198, 51, 100, 10),
                },
            },
            Record {
                label: "www".to_string(),
                ttl: Some(300),
                data: RecordData::CNAME {
                    target: "@".to_string(),
                },
            },
            Record {
                label: "mail".to_string(),
                ttl: Some(300),
                data: RecordData::A {
                    address: std::net::Ipv4Addr::new(198, 51, 100, 20),
                },
            },
        ],
    }]
}
