//! Vantage - remote reachability verdicts from a distributed measurement network
//!
//! This library answers one question for a monitoring/failover stack: is a
//! `host:port` endpoint reachable right now, as seen from a set of remote
//! probe nodes? The actual TCP probing is delegated to a third-party
//! measurement service; vantage resolves the usable node set, submits the
//! check, polls the asynchronously-arriving results and decides when they are
//! trustworthy enough to report.

pub mod catalog;
pub mod config;
pub mod error;
pub mod probe;

// Re-export main types
pub use catalog::{MeasurementNode, NodeCatalog, NodeCatalogSnapshot, SnapshotSource};
pub use config::Config;
pub use error::ProbeError;
pub use probe::{HttpTransport, ProbeSession, ProbeTransport};

/// Default base URL of the measurement provider.
pub const DEFAULT_BASE_URL: &str = "https://check-host.net";
