//! Normalization engine for Cloud Foundry application manifests.
//!
//! The `Normalizer` maps one decoded manifest entry onto the canonical
//! `Application` model by running a set of independent field resolvers:
//! metadata, routes, services, docker, sidecars and processes (which in turn
//! resolve liveness and readiness probes and the inlined process shorthand).
//! All resolvers are pure and total; the only failure is an application node
//! that cannot be read as an application record at all. `discover` applies
//! the normalizer to every entry of a manifest and collects per-entry results.

pub mod discover;
pub mod normalize;
mod presence;
pub mod probe;
pub mod process;
pub mod resolve;
pub mod route;

pub use discover::{discover, discover_fail_fast, discover_str, DiscoveryReport};
pub use normalize::{normalize, Normalizer};
pub use probe::{resolve_probe, ProbeKind};
pub use process::{inlined_process, resolve_process, resolve_processes};
pub use route::{resolve_routes, RouteFlags};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("manifest error: {0}")]
    Manifest(#[from] cfdiscover_schema::ManifestError),
    #[error("application #{index} ({}) is malformed: {message}", display_name(.name.as_deref()))]
    Structural {
        index: usize,
        name: Option<String>,
        message: String,
    },
}

impl DiscoverError {
    /// Index of the offending application entry, for per-entry errors.
    pub fn index(&self) -> Option<usize> {
        match self {
            DiscoverError::Structural { index, .. } => Some(*index),
            DiscoverError::Manifest(_) => None,
        }
    }
}

fn display_name(name: Option<&str>) -> &str {
    name.unwrap_or("unnamed")
}
