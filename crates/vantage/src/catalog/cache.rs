use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use super::types::NodeRecord;

/// On-disk shape of the node cache:
/// `{"timestamp": "<ISO-8601>", "nodes": {id: {country, city, location}}}`
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    timestamp: DateTime<Utc>,
    nodes: BTreeMap<String, NodeRecord>,
}

/// Reads and writes the timestamped node snapshot blob.
///
/// The cache is a pure optimization: callers treat every failure here as
/// "no cache" and fall through to the next resolution tier. Concurrent
/// writers race with last-writer-wins, which is acceptable for the same
/// reason.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the cached snapshot, if a cache file exists.
    ///
    /// Returns `Ok(None)` when there is no cache file; a file that cannot be
    /// read or parsed is an error the caller is expected to absorb.
    pub fn load(&self) -> Result<Option<(DateTime<Utc>, BTreeMap<String, NodeRecord>)>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read cache file {}", self.path.display()))?;
        let cache: CacheFile = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse cache file {}", self.path.display()))?;

        Ok(Some((cache.timestamp, cache.nodes)))
    }

    /// Persist a snapshot with the given resolution timestamp.
    pub fn store(
        &self,
        nodes: &BTreeMap<String, NodeRecord>,
        resolved_at: DateTime<Utc>,
    ) -> Result<()> {
        let cache = CacheFile { timestamp: resolved_at, nodes: nodes.clone() };
        let raw = serde_json::to_string_pretty(&cache)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create cache directory {}", parent.display()))?;
        }

        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write cache file {}", self.path.display()))
    }
}
