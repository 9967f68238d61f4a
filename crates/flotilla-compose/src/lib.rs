//! Service topology model and compose-style manifest generation for Flotilla.
//!
//! This crate defines the core engine: the service model (`ServiceUnit`) with
//! placeholder-driven template substitution, the aggregate document
//! (`Manifest`) with deterministic rendering and atomic persistence, source
//! repository retrieval with per-unit status reporting, and the versioned
//! TOML topology file format (`TopologyV1`) the CLI consumes.

pub mod config;
pub mod fetch;
pub mod manifest;
pub mod service;

pub use config::{parse_topology_file, parse_topology_str, ServiceEntry, TopologyV1};
pub use fetch::{FetchError, FetchReport, TOKEN_PLACEHOLDER};
pub use manifest::{Manifest, DEFAULT_SCHEMA_VERSION};
pub use service::{Networks, ServiceUnit};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("topology I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse topology: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unsupported topology_version: {0}, expected 1")]
    UnsupportedVersion(u32),
    #[error("invalid service name '{0}': must be 1-64 characters of [a-zA-Z0-9._-]")]
    InvalidServiceName(String),
    #[error("duplicate service name: {0}")]
    DuplicateService(String),
    #[error("service '{service}' declares an empty network name")]
    EmptyNetwork { service: String },
}
