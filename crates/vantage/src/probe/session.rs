use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::stability;
use super::transport::{HttpTransport, ProbeTransport};
use super::types::{NodeOutcome, ProbeJob, ProbeRequest, RoundPayload};
use crate::config::Config;
use crate::error::ProbeError;

/// Poll rounds per session; together with the interval this bounds a check
/// at roughly 20 seconds of waiting.
const POLL_ROUNDS: u32 = 4;
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// One submit-and-poll conversation with the measurement provider.
///
/// A session carries no state between `check()` calls; concurrent checks for
/// different targets are fully independent.
pub struct ProbeSession {
    transport: Arc<dyn ProbeTransport>,
    rounds: u32,
    poll_interval: Duration,
}

impl ProbeSession {
    /// Build a session with HTTP transport from configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let transport =
            HttpTransport::new(&config.provider.base_url, &config.provider.user_agent)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Build a session over a custom transport.
    pub fn with_transport(transport: Arc<dyn ProbeTransport>) -> Self {
        Self { transport, rounds: POLL_ROUNDS, poll_interval: POLL_INTERVAL }
    }

    /// Check whether `host:port` answers, as seen from the candidate nodes.
    ///
    /// Returns one verdict per deduplicated node id: `true` means the
    /// endpoint was judged reachable from that node at verdict time, `false`
    /// means an explicit failure or no data by the deadline. An empty
    /// candidate set short-circuits to an empty map without touching the
    /// network. No partial verdict is ever produced: on
    /// [`ProbeError::Submit`] or [`ProbeError::Timeout`] the caller may
    /// simply retry, which submits a fresh job.
    pub async fn check(
        &self,
        host: &str,
        port: u16,
        candidate_node_ids: impl IntoIterator<Item = String>,
    ) -> Result<BTreeMap<String, bool>, ProbeError> {
        let request = ProbeRequest::new(host, port, candidate_node_ids);
        if request.node_ids.is_empty() {
            return Ok(BTreeMap::new());
        }

        let target = request.target();
        let node_ids: Vec<String> = request.node_ids.iter().cloned().collect();

        let request_id = self.transport.submit(&target, &node_ids).await.map_err(|error| {
            ProbeError::Submit { target: target.clone(), reason: format!("{error:#}") }
        })?;

        let job = ProbeJob { request_id, request, submitted_at: Utc::now() };
        info!(
            target = %target,
            request_id = %job.request_id,
            nodes = node_ids.len(),
            "check submitted, polling for results"
        );

        match self.poll_until_stable(&job).await {
            Some(outcomes) => Ok(outcomes
                .into_iter()
                .map(|(node_id, outcome)| (node_id, outcome.is_success()))
                .collect()),
            None => {
                warn!(target = %target, request_id = %job.request_id, "no usable result round");
                Err(ProbeError::Timeout { target, request_id: job.request_id })
            }
        }
    }

    /// Run the bounded poll loop; `None` means the budget ran out without a
    /// single usable round (every round's fetch failed).
    async fn poll_until_stable(&self, job: &ProbeJob) -> Option<BTreeMap<String, NodeOutcome>> {
        for round in 1..=self.rounds {
            let final_round = round == self.rounds;
            tokio::time::sleep(self.poll_interval).await;

            let payload = match self.transport.fetch_results(&job.request_id).await {
                Ok(payload) => payload,
                Err(error) => {
                    warn!(
                        request_id = %job.request_id,
                        round,
                        "poll round yielded no data: {error:#}"
                    );
                    continue;
                }
            };

            let outcomes = derive_outcomes(&job.request, &payload);

            // Completion gate: while some nodes are silent, keep polling
            // instead of judging an incomplete picture.
            let pending = outcomes.values().filter(|outcome| outcome.is_pending()).count();
            if pending > 0 && !final_round {
                info!(request_id = %job.request_id, round, pending, "results incomplete, retrying");
                continue;
            }

            let eval = stability::evaluate_round(&outcomes, final_round);
            if eval.accepted {
                if eval.forced {
                    warn!(
                        request_id = %job.request_id,
                        failures = eval.failures,
                        total = eval.total,
                        "accepting unstable result on final round"
                    );
                } else {
                    info!(
                        request_id = %job.request_id,
                        round,
                        failures = eval.failures,
                        "result stable, accepting"
                    );
                }
                return Some(outcomes);
            }

            warn!(
                request_id = %job.request_id,
                round,
                failures = eval.failures,
                total = eval.total,
                "too many failures, polling again for stability"
            );
        }

        None
    }
}

/// Evaluate every requested node against the round's raw payload.
///
/// Only the request's own node ids are consulted; stray ids in the payload
/// are ignored.
fn derive_outcomes(request: &ProbeRequest, payload: &RoundPayload) -> BTreeMap<String, NodeOutcome> {
    request
        .node_ids
        .iter()
        .map(|node_id| (node_id.clone(), NodeOutcome::from_entry(payload.get(node_id))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum ScriptedRound {
        Payload(RoundPayload),
        HttpError,
    }

    struct FakeTransport {
        submit_fails: bool,
        submits: AtomicUsize,
        polls: AtomicUsize,
        rounds: Mutex<VecDeque<ScriptedRound>>,
    }

    impl FakeTransport {
        fn scripted(rounds: Vec<ScriptedRound>) -> Arc<Self> {
            Arc::new(Self {
                submit_fails: false,
                submits: AtomicUsize::new(0),
                polls: AtomicUsize::new(0),
                rounds: Mutex::new(rounds.into()),
            })
        }

        fn refusing_submission() -> Arc<Self> {
            Arc::new(Self {
                submit_fails: true,
                submits: AtomicUsize::new(0),
                polls: AtomicUsize::new(0),
                rounds: Mutex::new(VecDeque::new()),
            })
        }

        fn submits(&self) -> usize {
            self.submits.load(Ordering::SeqCst)
        }

        fn polls(&self) -> usize {
            self.polls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProbeTransport for FakeTransport {
        async fn submit(&self, _target: &str, _node_ids: &[String]) -> Result<String> {
            self.submits.fetch_add(1, Ordering::SeqCst);
            if self.submit_fails {
                return Err(anyhow!("synthetic submit outage"));
            }
            Ok("req-1".to_string())
        }

        async fn fetch_results(&self, _request_id: &str) -> Result<RoundPayload> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            let round = self.rounds.lock().unwrap().pop_front();
            match round {
                Some(ScriptedRound::Payload(payload)) => Ok(payload),
                Some(ScriptedRound::HttpError) | None => Err(anyhow!("synthetic 502")),
            }
        }
    }

    fn node_ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("n{i}.node.check-host.net")).collect()
    }

    fn payload(up: &[String], down: &[String]) -> RoundPayload {
        let mut map = RoundPayload::new();
        for id in up {
            map.insert(id.clone(), json!([{"time": 0.031, "address": "93.184.216.34"}]));
        }
        for id in down {
            map.insert(id.clone(), json!([{"error": "connection refused"}]));
        }
        map
    }

    #[tokio::test]
    async fn test_empty_candidate_set_is_not_an_error() {
        let transport = FakeTransport::scripted(vec![]);
        let session = ProbeSession::with_transport(transport.clone());

        let verdicts = session.check("example.com", 443, vec![]).await.unwrap();

        assert!(verdicts.is_empty());
        assert_eq!(transport.submits(), 0);
        assert_eq!(transport.polls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_successes_accepts_on_first_round() {
        let ids = node_ids(3);
        let transport = FakeTransport::scripted(vec![ScriptedRound::Payload(payload(&ids, &[]))]);
        let session = ProbeSession::with_transport(transport.clone());

        let verdicts = session.check("example.com", 443, ids.clone()).await.unwrap();

        assert_eq!(transport.polls(), 1);
        assert!(ids.iter().all(|id| verdicts[id]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_failures_triggers_another_round() {
        let ids = node_ids(10);
        let (up, down) = ids.split_at(5);

        // Round 1: 5 of 10 down (5 < 10/2 does not hold). Round 2: all up.
        let transport = FakeTransport::scripted(vec![
            ScriptedRound::Payload(payload(up, down)),
            ScriptedRound::Payload(payload(&ids, &[])),
        ]);
        let session = ProbeSession::with_transport(transport.clone());

        let verdicts = session.check("example.com", 443, ids.clone()).await.unwrap();

        assert_eq!(transport.polls(), 2);
        assert!(ids.iter().all(|id| verdicts[id]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_majority_failures_forced_on_final_round() {
        let ids = node_ids(4);
        let (up, down) = ids.split_at(1);
        let unstable = || ScriptedRound::Payload(payload(up, down));

        let transport =
            FakeTransport::scripted(vec![unstable(), unstable(), unstable(), unstable()]);
        let session = ProbeSession::with_transport(transport.clone());

        let verdicts = session.check("example.com", 443, ids.clone()).await.unwrap();

        assert_eq!(transport.polls(), 4);
        assert!(verdicts[&ids[0]]);
        assert!(down.iter().all(|id| !verdicts[id]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_round_keeps_polling() {
        let ids = node_ids(3);
        let partial = payload(&ids[..2], &[]);

        let transport = FakeTransport::scripted(vec![
            ScriptedRound::Payload(partial),
            ScriptedRound::Payload(payload(&ids, &[])),
        ]);
        let session = ProbeSession::with_transport(transport.clone());

        let verdicts = session.check("example.com", 443, ids.clone()).await.unwrap();

        assert_eq!(transport.polls(), 2);
        assert!(ids.iter().all(|id| verdicts[id]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_node_is_false_by_deadline() {
        let ids = node_ids(3);
        let reporting = ids[..2].to_vec();
        let partial = || ScriptedRound::Payload(payload(&reporting, &[]));

        // One node never reports in any round; the final round judges it.
        let transport = FakeTransport::scripted(vec![partial(), partial(), partial(), partial()]);
        let session = ProbeSession::with_transport(transport.clone());

        let verdicts = session.check("example.com", 443, ids.clone()).await.unwrap();

        assert_eq!(transport.polls(), 4);
        assert!(verdicts[&ids[0]] && verdicts[&ids[1]]);
        assert!(!verdicts[&ids[2]]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stray_payload_ids_are_ignored() {
        let ids = node_ids(2);
        let mut round = payload(&ids, &[]);
        round.insert("zz9.node.check-host.net".to_string(), json!([{"time": 0.2}]));

        let transport = FakeTransport::scripted(vec![ScriptedRound::Payload(round)]);
        let session = ProbeSession::with_transport(transport);

        let verdicts = session.check("example.com", 443, ids).await.unwrap();
        assert_eq!(verdicts.len(), 2);
        assert!(!verdicts.contains_key("zz9.node.check-host.net"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_round_failing_times_out_without_verdict() {
        let transport = FakeTransport::scripted(vec![
            ScriptedRound::HttpError,
            ScriptedRound::HttpError,
            ScriptedRound::HttpError,
            ScriptedRound::HttpError,
        ]);
        let session = ProbeSession::with_transport(transport.clone());

        let error = session.check("example.com", 443, node_ids(3)).await.unwrap_err();

        assert_eq!(transport.polls(), 4);
        assert!(matches!(error, ProbeError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_failed_submission_fails_the_whole_call() {
        let transport = FakeTransport::refusing_submission();
        let session = ProbeSession::with_transport(transport.clone());

        let error = session.check("example.com", 443, node_ids(3)).await.unwrap_err();

        assert!(matches!(error, ProbeError::Submit { .. }));
        assert_eq!(transport.polls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_candidates_submit_once_each() {
        let ids = node_ids(2);
        let mut candidates = ids.clone();
        candidates.extend(ids.clone());

        let transport = FakeTransport::scripted(vec![ScriptedRound::Payload(payload(&ids, &[]))]);
        let session = ProbeSession::with_transport(transport);

        let verdicts = session.check("example.com", 443, candidates).await.unwrap();
        assert_eq!(verdicts.len(), 2);
    }
}
