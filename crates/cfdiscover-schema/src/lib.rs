//! Source and target schemas for cfdiscover.
//!
//! This crate defines both ends of the normalization: the Cloud Foundry
//! application manifest as decoded from YAML (`Manifest`, `AppManifest`) and
//! the canonical, platform-neutral application model (`Application`) that
//! downstream tooling translates into Kubernetes resources.

pub mod manifest;
pub mod model;
pub mod types;

pub use manifest::{
    parse_app_str, parse_manifest_file, parse_manifest_str, AppManifest, AppManifestDocker,
    AppManifestProcess, AppManifestRoute, AppManifestService, AppManifestSidecar, AppMetadata,
    Manifest, ManifestEntry, ManifestError,
};
pub use model::{Application, Docker, Metadata, Probe, Process, Route, Service, Sidecar};
pub use types::{LifecycleType, ProbeType, ProcessType, RouteProtocol};
