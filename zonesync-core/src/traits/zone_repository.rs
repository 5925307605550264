//! Zone storage abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Zone;

/// Zone Repository Trait
///
/// Persists the declared zone set. The core reads and writes the whole
/// collection; platform layers provide the backing store (a JSON config
/// file in the app crate, in-memory stores in tests).
#[async_trait]
pub trait ZoneRepository: Send + Sync {
    /// Load every declared zone.
    async fn load_all(&self) -> CoreResult<Vec<Zone>>;

    /// Replace the declared zone set.
    async fn save_all(&self, zones: &[Zone]) -> CoreResult<()>;
}
