//! Test helper module
//!
//! Provides mock implementations and convenient test factory methods.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use zonesync_authority::{
    AuthorityError, RecordAnswer, RecordData, RecordLookup, RecordType, UpdateTransport,
};

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::ZoneRepository;
use crate::types::{Record, Zone, DEFAULT_ZONE_TTL};

// ===== MockRecordLookup =====

/// Scripted lookup: answers and failures are keyed by `(fqdn, type)`;
/// anything unscripted resolves to an empty RRset, mirroring a label with
/// no published records.
pub struct MockRecordLookup {
    answers: RwLock<HashMap<(String, RecordType), Vec<RecordAnswer>>>,
    failures: RwLock<HashMap<(String, RecordType), String>>,
    queried: RwLock<Vec<(String, RecordType)>>,
}

impl MockRecordLookup {
    pub fn new() -> Self {
        Self {
            answers: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashMap::new()),
            queried: RwLock::new(Vec::new()),
        }
    }

    pub async fn answer(&self, fqdn: &str, record_type: RecordType, answers: Vec<RecordAnswer>) {
        self.answers
            .write()
            .await
            .insert((fqdn.to_string(), record_type), answers);
    }

    pub async fn fail(&self, fqdn: &str, record_type: RecordType, detail: &str) {
        self.failures
            .write()
            .await
            .insert((fqdn.to_string(), record_type), detail.to_string());
    }

    /// Every `(fqdn, type)` pair this mock was asked for, in call order.
    pub async fn queried(&self) -> Vec<(String, RecordType)> {
        self.queried.read().await.clone()
    }
}

#[async_trait]
impl RecordLookup for MockRecordLookup {
    async fn query(
        &self,
        _server: &str,
        fqdn: &str,
        record_type: RecordType,
    ) -> zonesync_authority::Result<Vec<RecordAnswer>> {
        self.queried
            .write()
            .await
            .push((fqdn.to_string(), record_type));
        let key = (fqdn.to_string(), record_type);
        if let Some(detail) = self.failures.read().await.get(&key) {
            return Err(AuthorityError::Network {
                detail: detail.clone(),
            });
        }
        Ok(self
            .answers
            .read()
            .await
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }
}

// ===== MockUpdateTransport =====

/// Captures submitted scripts; optionally fails every submission with a
/// preset error (for testing outcome classification paths).
pub struct MockUpdateTransport {
    scripts: RwLock<Vec<String>>,
    failure: RwLock<Option<AuthorityError>>,
}

impl MockUpdateTransport {
    pub fn new() -> Self {
        Self {
            scripts: RwLock::new(Vec::new()),
            failure: RwLock::new(None),
        }
    }

    pub async fn fail(&self, error: AuthorityError) {
        *self.failure.write().await = Some(error);
    }

    /// Every script submitted so far.
    pub async fn submitted(&self) -> Vec<String> {
        self.scripts.read().await.clone()
    }
}

#[async_trait]
impl UpdateTransport for MockUpdateTransport {
    async fn submit(
        &self,
        _server: &str,
        _key_file: &Path,
        script: &str,
    ) -> zonesync_authority::Result<String> {
        if let Some(error) = self.failure.read().await.clone() {
            return Err(error);
        }
        self.scripts.write().await.push(script.to_string());
        Ok(String::new())
    }
}

// ===== MockZoneRepository =====

pub struct MockZoneRepository {
    zones: RwLock<Vec<Zone>>,
}

impl MockZoneRepository {
    pub fn new() -> Self {
        Self {
            zones: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ZoneRepository for MockZoneRepository {
    async fn load_all(&self) -> CoreResult<Vec<Zone>> {
        Ok(self.zones.read().await.clone())
    }

    async fn save_all(&self, zones: &[Zone]) -> CoreResult<()> {
        *self.zones.write().await = zones.to_vec();
        Ok(())
    }
}

// ===== Factory methods =====

/// Create a test `ServiceContext` with all three mocks.
pub fn create_test_context() -> (
    Arc<ServiceContext>,
    Arc<MockRecordLookup>,
    Arc<MockUpdateTransport>,
    Arc<MockZoneRepository>,
) {
    let lookup = Arc::new(MockRecordLookup::new());
    let transport = Arc::new(MockUpdateTransport::new());
    let zone_repository = Arc::new(MockZoneRepository::new());

    let ctx = Arc::new(ServiceContext::new(
        lookup.clone(),
        transport.clone(),
        zone_repository.clone(),
    ));

    (ctx, lookup, transport, zone_repository)
}

/// A valid `example.com` zone around the given records.
pub fn test_zone(records: Vec<Record>) -> Zone {
    Zone {
        name: "example.com".to_string(),
        server: "ns1.example.com".to_string(),
        key_file: PathBuf::from("/etc/nsupdate/example.com.key"),
        notes: None,
        default_ttl: DEFAULT_ZONE_TTL,
        records,
    }
}

/// An observed A answer.
pub fn a_answer(address: &str, ttl: u32) -> RecordAnswer {
    RecordAnswer {
        ttl,
        data: RecordData::A {
            address: address.parse().unwrap(),
        },
    }
}

/// An observed TXT answer.
pub fn txt_answer(text: &str, ttl: u32) -> RecordAnswer {
    RecordAnswer {
        ttl,
        data: RecordData::TXT {
            text: text.to_string(),
        },
    }
}
