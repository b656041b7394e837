//! Majority-stability rule for poll-round acceptance.
//!
//! A transient, localized outage on the measurement network can make a
//! healthy target look down from many nodes at once. The rule treats a
//! minority of node failures as signal and a majority as suspect noise worth
//! one more poll round, while the final round always accepts whatever was
//! observed so a session can never block past its budget.

use std::collections::BTreeMap;

use super::types::NodeOutcome;

/// Outcome of evaluating one poll round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundEvaluation {
    pub total: usize,
    pub failures: usize,
    pub accepted: bool,
    /// Accepted only because the round budget ran out.
    pub forced: bool,
}

/// Decide whether a round's per-node outcomes are trustworthy enough.
///
/// Accepts iff `failures < total / 2` (integer division) or `final_round`
/// holds. Anything not a `Success` counts as a failure here; the session's
/// completion gate ensures `Pending` outcomes only reach evaluation on the
/// final round.
///
/// Note the `total == 1` corner: `failures < 0` can never hold, so a
/// single-node check is only ever accepted through the final-round path.
pub fn evaluate_round(
    outcomes: &BTreeMap<String, NodeOutcome>,
    final_round: bool,
) -> RoundEvaluation {
    let total = outcomes.len();
    let failures = outcomes.values().filter(|outcome| !outcome.is_success()).count();

    let stable = failures < total / 2;
    RoundEvaluation { total, failures, accepted: stable || final_round, forced: !stable && final_round }
}
