//! JSON-file backed zone store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use zonesync_core::error::{CoreError, CoreResult};
use zonesync_core::traits::ZoneRepository;
use zonesync_core::types::Zone;

/// On-disk configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigDocument {
    #[serde(default)]
    zones: Vec<Zone>,
}

/// [`ZoneRepository`] persisting `{ "zones": [...] }` as pretty-printed
/// JSON.
///
/// A missing file reads as an empty configuration; parent directories are
/// created on first save.
pub struct JsonZoneStore {
    path: PathBuf,
}

impl JsonZoneStore {
    /// Create a store at the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ZoneRepository for JsonZoneStore {
    async fn load_all(&self) -> CoreResult<Vec<Zone>> {
        log::debug!("Loading configuration from {}", self.path.display());

        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!(
                    "Configuration file not found at {}, returning empty config",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(CoreError::Store(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        let document: ConfigDocument = serde_json::from_slice(&bytes).map_err(|e| {
            CoreError::Serialization(format!("invalid config at {}: {e}", self.path.display()))
        })?;
        log::info!(
            "Loaded configuration with {} zone(s) from {}",
            document.zones.len(),
            self.path.display()
        );
        Ok(document.zones)
    }

    async fn save_all(&self, zones: &[Zone]) -> CoreResult<()> {
        log::debug!("Saving configuration to {}", self.path.display());

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CoreError::Store(format!("failed to create {}: {e}", parent.display()))
            })?;
        }

        let document = ConfigDocument {
            zones: zones.to_vec(),
        };
        let bytes = serde_json::to_vec_pretty(&document)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        tokio::fs::write(&self.path, bytes).await.map_err(|e| {
            CoreError::Store(format!("failed to write {}: {e}", self.path.display()))
        })?;

        log::info!("Configuration saved to {}", self.path.display());
        Ok(())
    }
}
