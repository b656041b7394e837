use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Node record as the provider and the cache file shape it.
///
/// Records are keyed by node id in a surrounding map; the provider calls the
/// region code `location`, which is kept on the wire for compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub country: String,
    pub city: String,
    #[serde(rename = "location")]
    pub region_code: String,
}

/// A probe node of the measurement network, as seen by consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementNode {
    /// Fully qualified node id, e.g. `de1.node.check-host.net`
    pub id: String,
    pub country: String,
    pub city: String,
    pub region_code: String,
}

/// Which resolution tier produced a catalog snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSource {
    Cache,
    Dynamic,
    Static,
}

impl std::fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotSource::Cache => write!(f, "cache"),
            SnapshotSource::Dynamic => write!(f, "dynamic"),
            SnapshotSource::Static => write!(f, "static"),
        }
    }
}

/// A resolved, timestamped view of the usable probe nodes.
///
/// Snapshots are immutable values; `nodes` is never empty (the static table
/// guarantees a final fallback tier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCatalogSnapshot {
    pub resolved_at: DateTime<Utc>,
    pub nodes: BTreeMap<String, MeasurementNode>,
    pub source: SnapshotSource,
}

impl NodeCatalogSnapshot {
    /// Build a snapshot from wire-format records.
    pub fn from_records(
        records: BTreeMap<String, NodeRecord>,
        source: SnapshotSource,
        resolved_at: DateTime<Utc>,
    ) -> Self {
        let nodes = records
            .into_iter()
            .map(|(id, record)| {
                let node = MeasurementNode {
                    id: id.clone(),
                    country: record.country,
                    city: record.city,
                    region_code: record.region_code,
                };
                (id, node)
            })
            .collect();

        Self { resolved_at, nodes, source }
    }

    /// The node ids of this snapshot, in stable order.
    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    /// Convert back to the wire-format record map (cache file shape).
    pub fn to_records(&self) -> BTreeMap<String, NodeRecord> {
        self.nodes
            .iter()
            .map(|(id, node)| {
                let record = NodeRecord {
                    country: node.country.clone(),
                    city: node.city.clone(),
                    region_code: node.region_code.clone(),
                };
                (id.clone(), record)
            })
            .collect()
    }
}
