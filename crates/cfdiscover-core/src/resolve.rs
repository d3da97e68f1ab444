//! Resolvers for the application fields that need no precedence rules:
//! metadata, build packs, services, docker and sidecars.

use crate::presence::non_empty;
use cfdiscover_schema::{
    AppManifest, AppManifestDocker, AppManifestService, AppManifestSidecar, Docker, Metadata,
    ProcessType, Service, Sidecar,
};
use tracing::debug;

pub const DEFAULT_VERSION: &str = "1";

/// Name, version, space, labels and annotations. Version and space come from
/// the caller; labels and annotations are copied and stay absent when the
/// manifest has no metadata block.
pub fn resolve_metadata(app: &AppManifest, version: Option<&str>, space: Option<&str>) -> Metadata {
    let (labels, annotations) = app
        .metadata
        .as_ref()
        .map(|m| (m.labels.clone(), m.annotations.clone()))
        .unwrap_or_default();

    Metadata {
        name: app.name.clone().unwrap_or_default(),
        space: non_empty(space).map(str::to_owned),
        labels,
        annotations,
        version: non_empty(version).unwrap_or(DEFAULT_VERSION).to_owned(),
    }
}

/// `buildpacks` as written, or the deprecated singular `buildpack` when the
/// list is missing.
pub fn resolve_buildpacks(app: &AppManifest) -> Option<Vec<String>> {
    if app.buildpacks.is_some() {
        return app.buildpacks.clone();
    }
    let legacy = non_empty(app.buildpack.as_deref())?;
    debug!("using deprecated 'buildpack' field '{legacy}'");
    Some(vec![legacy.to_owned()])
}

pub fn resolve_services(services: Option<&[AppManifestService]>) -> Vec<Service> {
    services
        .unwrap_or_default()
        .iter()
        .map(|svc| Service {
            name: svc.name.clone(),
            parameters: svc.parameters.clone(),
            binding_name: svc.binding_name.clone(),
        })
        .collect()
}

pub fn resolve_docker(docker: Option<&AppManifestDocker>) -> Docker {
    let Some(docker) = docker else {
        return Docker::default();
    };
    Docker {
        image: docker.image.clone().unwrap_or_default(),
        username: docker.username.clone(),
    }
}

pub fn resolve_sidecars(sidecars: Option<&[AppManifestSidecar]>) -> Vec<Sidecar> {
    sidecars
        .unwrap_or_default()
        .iter()
        .map(|sidecar| Sidecar {
            name: sidecar.name.clone().unwrap_or_default(),
            process_types: resolve_process_types(sidecar.process_types.as_deref()),
            command: sidecar.command.clone().unwrap_or_default(),
            memory: sidecar.memory.clone(),
        })
        .collect()
}

/// Tags are kept verbatim; the platform only documents `web` and `worker` but
/// nothing here enforces that.
pub fn resolve_process_types(types: Option<&[String]>) -> Vec<ProcessType> {
    types
        .unwrap_or_default()
        .iter()
        .map(|t| ProcessType::from(t.as_str()))
        .collect()
}
