use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// A reachability check to run against one target from a set of nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub host: String,
    pub port: u16,
    /// Candidate node ids, deduplicated.
    pub node_ids: BTreeSet<String>,
}

impl ProbeRequest {
    pub fn new(host: &str, port: u16, node_ids: impl IntoIterator<Item = String>) -> Self {
        Self { host: host.to_string(), port, node_ids: node_ids.into_iter().collect() }
    }

    /// The `host:port` form the provider expects.
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// A check job accepted by the provider, correlated by its request id.
#[derive(Debug, Clone)]
pub struct ProbeJob {
    pub request_id: String,
    pub request: ProbeRequest,
    pub submitted_at: DateTime<Utc>,
}

/// What one node reported about the target in one poll round.
///
/// Derived fresh from the raw payload each round; nothing is accumulated
/// across rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOutcome {
    /// The node has not reported yet (absent or null entry).
    Pending,
    /// A populated timing record: the target answered from this node.
    Success,
    /// An explicit error or an empty record.
    Failure,
}

impl NodeOutcome {
    /// Derive the outcome from a node's raw result entry.
    ///
    /// The result endpoint maps each node to `null` while the probe is in
    /// flight, or to a list whose first element carries a `time` field on
    /// success.
    pub fn from_entry(entry: Option<&Value>) -> Self {
        match entry {
            None | Some(Value::Null) => NodeOutcome::Pending,
            Some(Value::Array(items)) => match items.first() {
                Some(Value::Object(fields)) if fields.contains_key("time") => NodeOutcome::Success,
                _ => NodeOutcome::Failure,
            },
            Some(_) => NodeOutcome::Failure,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, NodeOutcome::Success)
    }

    pub fn is_pending(self) -> bool {
        matches!(self, NodeOutcome::Pending)
    }
}

/// Raw per-node payload of one poll round, as returned by the provider.
pub type RoundPayload = BTreeMap<String, Value>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_dedupes_node_ids() {
        let ids = ["de1".to_string(), "jp1".to_string(), "de1".to_string()];
        let request = ProbeRequest::new("example.com", 443, ids);
        assert_eq!(request.node_ids.len(), 2);
        assert_eq!(request.target(), "example.com:443");
    }

    #[test]
    fn test_outcome_success_requires_timing_record() {
        let ok = json!([{"time": 0.042, "address": "93.184.216.34"}]);
        assert_eq!(NodeOutcome::from_entry(Some(&ok)), NodeOutcome::Success);

        let error = json!([{"error": "connection refused"}]);
        assert_eq!(NodeOutcome::from_entry(Some(&error)), NodeOutcome::Failure);

        let empty = json!([]);
        assert_eq!(NodeOutcome::from_entry(Some(&empty)), NodeOutcome::Failure);
    }

    #[test]
    fn test_outcome_pending_for_absent_or_null() {
        assert_eq!(NodeOutcome::from_entry(None), NodeOutcome::Pending);
        assert_eq!(NodeOutcome::from_entry(Some(&Value::Null)), NodeOutcome::Pending);
    }

    #[test]
    fn test_outcome_unexpected_shape_is_failure() {
        let odd = json!("done");
        assert_eq!(NodeOutcome::from_entry(Some(&odd)), NodeOutcome::Failure);
    }
}
