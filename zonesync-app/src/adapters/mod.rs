//! Storage adapters injected into the core.

mod json_zone_store;

pub use json_zone_store::JsonZoneStore;
