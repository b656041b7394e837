use thiserror::Error;

/// Errors that fail a single probe session.
///
/// Both variants are scoped to one `check()` call; the caller may retry, which
/// is safe because the provider issues a fresh request id per submission.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The check job could not be submitted, or the provider returned no
    /// request id. No verdict exists for this call.
    #[error("failed to submit probe for {target}: {reason}")]
    Submit { target: String, reason: String },

    /// The poll budget ran out without a single usable result round.
    #[error("no result for {target} (request {request_id}) within the poll budget")]
    Timeout { target: String, request_id: String },
}
