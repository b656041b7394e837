use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::types::RoundPayload;

const SUBMIT_TIMEOUT: Duration = Duration::from_secs(15);
const RESULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Wire access to the measurement provider.
///
/// A trait seam so the session protocol can be exercised against scripted
/// fakes; `HttpTransport` is the production implementation.
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    /// Submit a TCP check for `target` (`host:port`) on the given nodes and
    /// return the provider's request id.
    async fn submit(&self, target: &str, node_ids: &[String]) -> Result<String>;

    /// Fetch the current raw results for a submitted job. A transport error
    /// or non-200 response is an `Err`; the session treats that as "no new
    /// data this round".
    async fn fetch_results(&self, request_id: &str) -> Result<RoundPayload>;
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    request_id: Option<String>,
}

/// HTTP client for the provider's submit and result endpoints.
///
/// Each session owns its own transport (and thus its own connection pool);
/// nothing is shared across checks.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }
}

#[async_trait]
impl ProbeTransport for HttpTransport {
    async fn submit(&self, target: &str, node_ids: &[String]) -> Result<String> {
        let url = format!("{}/check-tcp", self.base_url);
        let params: Vec<(&str, &str)> = std::iter::once(("host", target))
            .chain(node_ids.iter().map(|id| ("node", id.as_str())))
            .collect();

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(SUBMIT_TIMEOUT)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .with_context(|| format!("check submission for {target} failed"))?;

        let body: SubmitResponse =
            response.json().await.context("check submission returned non-JSON body")?;

        body.request_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| anyhow!("provider response carried no request id"))
    }

    async fn fetch_results(&self, request_id: &str) -> Result<RoundPayload> {
        let url = format!("{}/check-result/{request_id}", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(RESULT_TIMEOUT)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .with_context(|| format!("result fetch for request {request_id} failed"))?;

        response.json().await.context("result endpoint returned non-JSON body")
    }
}
