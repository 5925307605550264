//! Resolver construction helpers shared by the lookup client.

use std::net::IpAddr;
use std::sync::LazyLock;

use hickory_resolver::{
    TokioResolver,
    config::{NameServerConfigGroup, ResolverConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
};

use crate::error::AuthorityError;

/// Shared resolver following the host system configuration.
///
/// Used to turn a zone's advertised server hostname into an address. Falls
/// back to Hickory's default upstream set when the system configuration
/// cannot be loaded.
static SYSTEM_RESOLVER: LazyLock<TokioResolver> = LazyLock::new(build_system_resolver);

/// Build a resolver pinned to a single nameserver address.
///
/// Queries built from this resolver go to `ns_ip` only, which is what a
/// state query needs: the records as the authoritative server publishes
/// them, not as a recursive cache has them.
#[must_use]
pub fn build_resolver_for_ns(ns_ip: IpAddr) -> TokioResolver {
    let config = ResolverConfig::from_parts(
        None,
        vec![],
        NameServerConfigGroup::from_ips_clear(&[ns_ip], 53, true),
    );
    let provider = TokioConnectionProvider::default();
    TokioResolver::builder_with_config(config, provider)
        .with_options(ResolverOpts::default())
        .build()
}

/// Resolve a configured server string to a nameserver address.
///
/// IP literals are used as-is; hostnames are resolved through the system
/// resolver.
pub async fn resolve_server_ip(server: &str) -> Result<IpAddr, AuthorityError> {
    if server.is_empty() {
        return Err(AuthorityError::InvalidServer {
            server: server.to_string(),
            detail: "server must not be empty".to_string(),
        });
    }

    if let Ok(ip) = server.parse::<IpAddr>() {
        return Ok(ip);
    }

    let lookup = SYSTEM_RESOLVER
        .lookup_ip(server)
        .await
        .map_err(|e| AuthorityError::InvalidServer {
            server: server.to_string(),
            detail: format!("failed to resolve server address: {e}"),
        })?;

    lookup
        .iter()
        .next()
        .ok_or_else(|| AuthorityError::InvalidServer {
            server: server.to_string(),
            detail: "server name has no address records".to_string(),
        })
}

/// Build a resolver using the host system DNS configuration (with fallback).
fn build_system_resolver() -> TokioResolver {
    #[cfg(any(unix, target_os = "windows"))]
    {
        match TokioResolver::builder_tokio() {
            Ok(builder) => return builder.build(),
            Err(e) => {
                log::warn!(
                    "Failed to load system DNS configuration, falling back to defaults: {e}"
                );
            }
        }
    }

    let provider = TokioConnectionProvider::default();
    TokioResolver::builder_with_config(ResolverConfig::default(), provider)
        .with_options(ResolverOpts::default())
        .build()
}
