//! Node catalog - resolves the active set of measurement nodes.
//!
//! Resolution walks three tiers: a timestamped on-disk cache, live discovery
//! against the provider page, and a compiled-in static table as the
//! guaranteed final fallback. Failures in the first two tiers are absorbed,
//! never surfaced; `resolve()` is total and always yields a non-empty
//! snapshot.

pub mod cache;
pub mod discovery;
mod static_nodes;
pub mod types;

pub use cache::CacheStore;
pub use discovery::{DiscoverySource, HttpDiscovery};
pub use types::{MeasurementNode, NodeCatalogSnapshot, NodeRecord, SnapshotSource};

use anyhow::Result;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;

/// How long a cached snapshot is trusted without contacting upstream.
const CACHE_MAX_AGE_HOURS: i64 = 24;

/// Three-tier resolver for the usable probe node set.
pub struct NodeCatalog {
    cache: CacheStore,
    discovery: Arc<dyn DiscoverySource>,
    max_cache_age: Duration,
}

impl NodeCatalog {
    /// Build a catalog from configuration, with HTTP discovery.
    pub fn new(config: &Config) -> Result<Self> {
        let discovery =
            HttpDiscovery::new(&config.provider.base_url, &config.provider.user_agent)?;
        Ok(Self::with_discovery(CacheStore::new(&config.cache.path), Arc::new(discovery)))
    }

    /// Build a catalog with a custom discovery source.
    pub fn with_discovery(cache: CacheStore, discovery: Arc<dyn DiscoverySource>) -> Self {
        Self { cache, discovery, max_cache_age: Duration::hours(CACHE_MAX_AGE_HOURS) }
    }

    /// Resolve the active node set.
    ///
    /// Tier order: fresh cache, live discovery, static table. The chosen
    /// snapshot is written back to the cache; a write failure is logged and
    /// ignored.
    pub async fn resolve(&self) -> NodeCatalogSnapshot {
        if let Some(snapshot) = self.try_cache() {
            info!(nodes = snapshot.nodes.len(), "using recent node cache");
            return snapshot;
        }

        debug!("node cache is stale or missing, attempting live discovery");
        let resolved_at = Utc::now();
        let (records, source) = match self.discovery.fetch_nodes().await {
            Ok(records) if !records.is_empty() => (records, SnapshotSource::Dynamic),
            Ok(_) => {
                warn!("discovery produced no usable nodes, falling back to static table");
                (static_nodes::static_records(), SnapshotSource::Static)
            }
            Err(error) => {
                warn!("node discovery failed, falling back to static table: {error:#}");
                (static_nodes::static_records(), SnapshotSource::Static)
            }
        };

        if let Err(error) = self.cache.store(&records, resolved_at) {
            warn!("could not update node cache: {error:#}");
        }

        info!(nodes = records.len(), source = %source, "resolved node catalog");
        NodeCatalogSnapshot::from_records(records, source, resolved_at)
    }

    /// Tier 1: a cache snapshot younger than the max age, if one parses.
    fn try_cache(&self) -> Option<NodeCatalogSnapshot> {
        match self.cache.load() {
            Ok(Some((timestamp, records)))
                if Utc::now() - timestamp < self.max_cache_age && !records.is_empty() =>
            {
                Some(NodeCatalogSnapshot::from_records(
                    records,
                    SnapshotSource::Cache,
                    timestamp,
                ))
            }
            Ok(_) => None,
            Err(error) => {
                warn!("node cache is unreadable, will fetch fresh data: {error:#}");
                None
            }
        }
    }
}
