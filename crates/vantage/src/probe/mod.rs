//! Probe protocol - submit a check job and poll its asynchronous results.
//!
//! This module is responsible for:
//! - Submitting one TCP check per session to the measurement provider
//! - Polling the per-job result endpoint within a bounded round budget
//! - Deriving per-node outcomes and applying the stability rule
//! - Turning the accepted round into a `node id -> reachable` verdict map

pub mod session;
pub mod stability;
pub mod transport;
pub mod types;

pub use session::ProbeSession;
pub use transport::{HttpTransport, ProbeTransport};
pub use types::{NodeOutcome, ProbeJob, ProbeRequest, RoundPayload};
