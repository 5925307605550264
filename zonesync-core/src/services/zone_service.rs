//! Declared zone management service.

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::Zone;

/// CRUD over the declared zone set.
///
/// Every mutation validates the zone before persisting and logs an audit
/// line. Zones are identified by name; names are unique within the store.
pub struct ZoneService {
    ctx: Arc<ServiceContext>,
}

impl ZoneService {
    /// Create a zone service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// List every declared zone.
    pub async fn list_zones(&self) -> CoreResult<Vec<Zone>> {
        self.ctx.zone_repository.load_all().await
    }

    /// Fetch one zone by name.
    pub async fn get_zone(&self, name: &str) -> CoreResult<Zone> {
        let zones = self.ctx.zone_repository.load_all().await?;
        zones
            .into_iter()
            .find(|z| z.name == name)
            .ok_or_else(|| CoreError::ZoneNotFound(name.to_string()))
    }

    /// Persist a new zone, optionally overwriting an existing entry.
    pub async fn add_zone(&self, zone: Zone, overwrite: bool) -> CoreResult<()> {
        zone.validate()?;
        log::debug!("Adding zone: {}", zone.name);

        let mut zones = self.ctx.zone_repository.load_all().await?;
        let existing = zones.iter().position(|z| z.name == zone.name);

        let action = match existing {
            Some(_) if !overwrite => {
                log::warn!("Zone '{}' already exists", zone.name);
                return Err(CoreError::ZoneExists(zone.name));
            }
            Some(index) => {
                zones[index] = zone.clone();
                "updated"
            }
            None => {
                zones.push(zone.clone());
                "created"
            }
        };

        self.ctx.zone_repository.save_all(&zones).await?;
        log::info!(
            "Zone '{}' {action} (server {}, {} record(s))",
            zone.name,
            zone.server,
            zone.records.len()
        );
        Ok(())
    }

    /// Update an existing zone, optionally renaming it.
    pub async fn update_zone(&self, original_name: &str, updated: Zone) -> CoreResult<()> {
        updated.validate()?;
        log::debug!("Updating zone: {original_name}");

        let mut zones = self.ctx.zone_repository.load_all().await?;
        let current = zones
            .iter()
            .position(|z| z.name == original_name)
            .ok_or_else(|| {
                log::warn!("Zone '{original_name}' not found for update");
                CoreError::ZoneNotFound(original_name.to_string())
            })?;

        if let Some(conflict) = zones.iter().position(|z| z.name == updated.name) {
            if conflict != current {
                log::warn!("Zone name conflict: '{}' already exists", updated.name);
                return Err(CoreError::ZoneExists(updated.name));
            }
        }

        let name = updated.name.clone();
        zones[current] = updated;
        self.ctx.zone_repository.save_all(&zones).await?;
        log::info!("Zone '{original_name}' updated (now '{name}')");
        Ok(())
    }

    /// Remove a zone by name.
    pub async fn delete_zone(&self, name: &str) -> CoreResult<()> {
        log::debug!("Deleting zone: {name}");

        let mut zones = self.ctx.zone_repository.load_all().await?;
        let index = zones.iter().position(|z| z.name == name).ok_or_else(|| {
            log::warn!("Zone '{name}' not found for deletion");
            CoreError::ZoneNotFound(name.to_string())
        })?;

        zones.remove(index);
        self.ctx.zone_repository.save_all(&zones).await?;
        log::info!("Zone '{name}' deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_context, test_zone};
    use crate::traits::ZoneRepository;

    fn named_zone(name: &str) -> Zone {
        let mut zone = test_zone(vec![]);
        zone.name = name.to_string();
        zone
    }

    #[tokio::test]
    async fn add_list_get_delete_round_trip() {
        let (ctx, _, _, _) = create_test_context();
        let service = ZoneService::new(ctx);

        service.add_zone(named_zone("example.com"), false).await.unwrap();
        service.add_zone(named_zone("example.net"), false).await.unwrap();

        assert_eq!(service.list_zones().await.unwrap().len(), 2);
        assert_eq!(service.get_zone("example.net").await.unwrap().name, "example.net");

        service.delete_zone("example.com").await.unwrap();
        assert_eq!(service.list_zones().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_add_requires_overwrite() {
        let (ctx, _, _, _) = create_test_context();
        let service = ZoneService::new(ctx);

        service.add_zone(named_zone("example.com"), false).await.unwrap();
        let err = service.add_zone(named_zone("example.com"), false).await.unwrap_err();
        assert!(matches!(err, CoreError::ZoneExists(_)));

        service.add_zone(named_zone("example.com"), true).await.unwrap();
        assert_eq!(service.list_zones().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_rejects_rename_onto_existing_zone() {
        let (ctx, _, _, _) = create_test_context();
        let service = ZoneService::new(ctx);

        service.add_zone(named_zone("example.com"), false).await.unwrap();
        service.add_zone(named_zone("example.net"), false).await.unwrap();

        let err = service
            .update_zone("example.com", named_zone("example.net"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ZoneExists(_)));
    }

    #[tokio::test]
    async fn update_can_rename() {
        let (ctx, _, _, _) = create_test_context();
        let service = ZoneService::new(ctx);

        service.add_zone(named_zone("example.com"), false).await.unwrap();
        service
            .update_zone("example.com", named_zone("example.org"))
            .await
            .unwrap();

        assert!(service.get_zone("example.com").await.is_err());
        assert!(service.get_zone("example.org").await.is_ok());
    }

    #[tokio::test]
    async fn missing_zone_operations_fail() {
        let (ctx, _, _, _) = create_test_context();
        let service = ZoneService::new(ctx);

        assert!(matches!(
            service.get_zone("nope.example").await.unwrap_err(),
            CoreError::ZoneNotFound(_)
        ));
        assert!(matches!(
            service.delete_zone("nope.example").await.unwrap_err(),
            CoreError::ZoneNotFound(_)
        ));
        assert!(matches!(
            service
                .update_zone("nope.example", named_zone("x.example"))
                .await
                .unwrap_err(),
            CoreError::ZoneNotFound(_)
        ));
    }

    #[tokio::test]
    async fn invalid_zone_is_never_persisted() {
        let (ctx, _, _, repo) = create_test_context();
        let service = ZoneService::new(ctx);

        let mut zone = named_zone("example.com");
        zone.default_ttl = 10;
        assert!(service.add_zone(zone, false).await.is_err());
        assert!(repo.load_all().await.unwrap().is_empty());
    }
}
