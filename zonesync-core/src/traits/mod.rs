//! Abstract traits for platform-provided capabilities.

mod zone_repository;

pub use zone_repository::ZoneRepository;

// The I/O seams for the authoritative server live in the access library.
pub use zonesync_authority::{RecordLookup, UpdateTransport};
