//! Live node discovery (tier 2 of catalog resolution).
//!
//! The provider does not expose a node-list API; the probe-initiation page
//! embeds a `permanent_nodes` object in an inline script, which is extracted
//! by pattern matching. The format is inherently coupled to the provider's
//! page structure, so every failure here degrades to an empty tier result and
//! lets the catalog fall through to the static table.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Duration;

use super::types::NodeRecord;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const OVERALL_TIMEOUT: Duration = Duration::from_secs(15);

/// Domain suffix appended to the short node keys used on the provider page.
const NODE_ID_SUFFIX: &str = ".node.check-host.net";

/// Source of dynamically discovered nodes.
///
/// A trait seam so catalog tests can count calls or deny the network tier
/// entirely.
#[async_trait]
pub trait DiscoverySource: Send + Sync {
    /// Fetch the current node table. An `Err` or an empty map both mean the
    /// tier produced nothing usable.
    async fn fetch_nodes(&self) -> Result<BTreeMap<String, NodeRecord>>;
}

/// Scrapes the provider's probe page for the embedded node table.
pub struct HttpDiscovery {
    client: reqwest::Client,
    page_url: String,
}

impl HttpDiscovery {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(OVERALL_TIMEOUT)
            .build()?;

        Ok(Self { client, page_url: format!("{}/check-ping", base_url.trim_end_matches('/')) })
    }
}

#[async_trait]
impl DiscoverySource for HttpDiscovery {
    async fn fetch_nodes(&self) -> Result<BTreeMap<String, NodeRecord>> {
        let response = self
            .client
            .get(&self.page_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .with_context(|| format!("discovery request to {} failed", self.page_url))?;

        let page = response.text().await.context("failed to read discovery page body")?;
        let nodes = parse_permanent_nodes(&page)
            .ok_or_else(|| anyhow!("no permanent_nodes object found in discovery page"))?;

        tracing::info!(count = nodes.len(), "parsed node table from discovery page");
        Ok(nodes)
    }
}

/// Extract the script-declared node table from the page body.
///
/// Only entries carrying all of country, city and location survive; malformed
/// entries are dropped silently. Returns `None` when the pattern or the JSON
/// payload does not match.
fn parse_permanent_nodes(page: &str) -> Option<BTreeMap<String, NodeRecord>> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"var\s+permanent_nodes\s*=\s*(\{.*?\});").expect("valid regex"));

    let raw = pattern.captures(page)?.get(1)?.as_str();
    let entries: BTreeMap<String, serde_json::Value> = serde_json::from_str(raw).ok()?;

    let nodes = entries
        .into_iter()
        .filter_map(|(key, value)| {
            let record: NodeRecord = serde_json::from_value(value).ok()?;
            Some((format!("{key}{NODE_ID_SUFFIX}"), record))
        })
        .collect();

    Some(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extracts_complete_entries() {
        let page = concat!(
            "<html><script>\n",
            r#"var permanent_nodes = {"de1": {"country": "Germany", "city": "Frankfurt", "location": "de"}, "jp1": {"country": "Japan", "city": "Tokyo", "location": "jp"}};"#,
            "\n</script></html>",
        );

        let nodes = parse_permanent_nodes(page).unwrap();
        assert_eq!(nodes.len(), 2);

        let de1 = &nodes["de1.node.check-host.net"];
        assert_eq!(de1.country, "Germany");
        assert_eq!(de1.city, "Frankfurt");
        assert_eq!(de1.region_code, "de");
    }

    #[test]
    fn test_parse_drops_malformed_entries() {
        let page = r#"var permanent_nodes = {"ok1": {"country": "France", "city": "Paris", "location": "fr"}, "gone": null, "partial": {"country": "Spain"}};"#;

        let nodes = parse_permanent_nodes(page).unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(nodes.contains_key("ok1.node.check-host.net"));
    }

    #[test]
    fn test_parse_missing_pattern_yields_none() {
        assert!(parse_permanent_nodes("<html>nothing to see</html>").is_none());
        assert!(parse_permanent_nodes("var permanent_nodes = not json;").is_none());
    }
}
