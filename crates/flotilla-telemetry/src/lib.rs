//! Deployment telemetry for Flotilla: a thin client for the remote logging
//! API and a best-effort own-address discovery helper.
//!
//! Both collaborators are synchronous and make a single attempt per remote
//! call; the caller decides whether anything is worth retrying.

pub mod discovery;
pub mod logger;

#[cfg(test)]
mod testutil;

pub use discovery::{discover_own_address, LOOPBACK_ADDRESS};
pub use logger::{LogClient, DEFAULT_CLIENT_IP};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("health check failed for {url}: {reason}")]
    Health { url: String, reason: String },
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("logging API rejected request with HTTP {status}: {body}")]
    Remote { status: u16, body: String },
}
