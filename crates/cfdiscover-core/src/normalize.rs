use crate::presence::non_zero;
use crate::process::{resolve_processes, DEFAULT_INSTANCES};
use crate::resolve::{
    resolve_buildpacks, resolve_docker, resolve_metadata, resolve_services, resolve_sidecars,
};
use crate::route::{resolve_routes, RouteFlags};
use crate::DiscoverError;
use cfdiscover_schema::{AppManifest, Application, Manifest, ManifestEntry};
use tracing::debug;

/// Seconds granted to an application to start when the manifest is silent.
pub const DEFAULT_TIMEOUT_SECS: u32 = 60;

/// Normalize one application entry into the canonical model.
///
/// `version_override` and `space_override` are used when non-empty; the
/// version otherwise defaults to `"1"` and the space stays unset.
pub fn normalize(
    app: &AppManifest,
    version_override: Option<&str>,
    space_override: Option<&str>,
) -> Application {
    let name = app.name.as_deref().unwrap_or_default();
    debug!("normalizing application '{name}'");

    Application {
        metadata: resolve_metadata(app, version_override, space_override),
        env: app.env.clone(),
        routes: resolve_routes(name, app.routes.as_deref(), RouteFlags::from_app(app)),
        services: resolve_services(app.services.as_deref()),
        processes: resolve_processes(app),
        sidecars: resolve_sidecars(app.sidecars.as_deref()),
        stack: app.stack.clone(),
        build_packs: resolve_buildpacks(app),
        docker: resolve_docker(app.docker.as_ref()),
        timeout: non_zero(app.timeout).unwrap_or(DEFAULT_TIMEOUT_SECS),
        instances: app.instances.unwrap_or(DEFAULT_INSTANCES),
    }
}

/// Normalization settings shared by every entry of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalizer {
    version: Option<String>,
    space: Option<String>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_space(mut self, space: impl Into<String>) -> Self {
        self.space = Some(space.into());
        self
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn space(&self) -> Option<&str> {
        self.space.as_deref()
    }

    /// Settings for the entries of `manifest`: an explicit version override
    /// wins, otherwise the manifest's own schema version applies.
    #[must_use]
    pub fn for_manifest(&self, manifest: &Manifest) -> Self {
        let version = self
            .version
            .clone()
            .filter(|v| !v.is_empty())
            .or_else(|| manifest.version.clone());
        Self {
            version,
            space: self.space.clone(),
        }
    }

    pub fn normalize(&self, app: &AppManifest) -> Application {
        normalize(app, self.version(), self.space())
    }

    /// Decode a raw `applications` node and normalize it. A node that cannot
    /// be read as an application record is a structural error.
    pub fn normalize_entry(
        &self,
        index: usize,
        entry: &ManifestEntry,
    ) -> Result<Application, DiscoverError> {
        let app = entry.decode().map_err(|e| DiscoverError::Structural {
            index,
            name: entry.name(),
            message: e.to_string(),
        })?;
        Ok(self.normalize(&app))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfdiscover_schema::{parse_app_str, parse_manifest_str, AppManifestProcess, ProbeType};

    fn minimal() -> AppManifest {
        AppManifest {
            name: Some("hello".to_owned()),
            ..AppManifest::default()
        }
    }

    #[test]
    fn minimal_manifest_resolves_defaults() {
        let app = normalize(&minimal(), None, None);
        assert_eq!(app.metadata.name, "hello");
        assert_eq!(app.metadata.version, "1");
        assert_eq!(app.metadata.space, None);
        assert_eq!(app.timeout, 60);
        assert_eq!(app.instances, 1);
        assert!(app.routes.is_empty());
        assert!(app.services.is_empty());
        assert!(app.processes.is_empty());
        assert!(app.sidecars.is_empty());
        assert!(app.docker.is_empty());
        assert_eq!(app.env, None);
        assert_eq!(app.stack, None);
        assert_eq!(app.build_packs, None);
    }

    #[test]
    fn zero_timeout_and_missing_instances_default() {
        let app = normalize(
            &AppManifest {
                timeout: Some(0),
                instances: None,
                ..minimal()
            },
            None,
            None,
        );
        assert_eq!(app.timeout, 60);
        assert_eq!(app.instances, 1);
    }

    #[test]
    fn explicit_timeout_and_instances() {
        let app = normalize(
            &AppManifest {
                timeout: Some(180),
                instances: Some(4),
                ..minimal()
            },
            None,
            None,
        );
        assert_eq!(app.timeout, 180);
        assert_eq!(app.instances, 4);
    }

    #[test]
    fn overrides_reach_metadata() {
        let app = normalize(&minimal(), Some("3"), Some("prod"));
        assert_eq!(app.metadata.version, "3");
        assert_eq!(app.metadata.space.as_deref(), Some("prod"));
    }

    #[test]
    fn pass_through_fields_are_copied() {
        let source = parse_app_str(
            r"
name: web
stack: cflinuxfs4
buildpacks: [nodejs_buildpack]
env:
  NODE_ENV: production
",
        )
        .unwrap();
        let app = normalize(&source, None, None);
        assert_eq!(app.stack.as_deref(), Some("cflinuxfs4"));
        assert_eq!(app.build_packs, Some(vec!["nodejs_buildpack".to_owned()]));
        assert_eq!(app.env.unwrap()["NODE_ENV"], "production");
    }

    #[test]
    fn random_route_uses_application_name() {
        let source = parse_app_str(
            r"
name: billing
random-route: true
routes:
- route: billing.example.com
",
        )
        .unwrap();
        let app = normalize(&source, None, None);
        assert_eq!(app.routes.len(), 1);
        assert_eq!(app.routes[0].url, "billing");
    }

    #[test]
    fn inlined_and_listed_processes_combine() {
        let source = AppManifest {
            process_type: Some("web".to_owned()),
            health_check_type: Some("http".to_owned()),
            processes: Some(vec![AppManifestProcess {
                process_type: Some("worker".to_owned()),
                ..AppManifestProcess::default()
            }]),
            ..minimal()
        };
        let app = normalize(&source, None, None);
        assert_eq!(app.processes.len(), 2);
        assert_eq!(app.processes[0].process_type, "worker");
        assert_eq!(app.processes[1].process_type, "web");
        assert_eq!(app.processes[1].health_check.probe_type, ProbeType::http());
        assert_eq!(
            app.processes[1].readiness_check.probe_type,
            ProbeType::process()
        );
    }

    #[test]
    fn normalization_is_deterministic() {
        let source = parse_app_str(
            r"
name: stable
env: {B: '2', A: '1', C: '3'}
metadata:
  labels: {z: last, a: first}
",
        )
        .unwrap();
        let first = normalize(&source, None, None).canonical_json().unwrap();
        let second = normalize(&source, None, None).canonical_json().unwrap();
        assert_eq!(first, second);
        assert!(first.find("\"A\"").unwrap() < first.find("\"B\"").unwrap());
    }

    #[test]
    fn normalizer_carries_overrides() {
        let normalizer = Normalizer::new().with_version("2").with_space("dev");
        let app = normalizer.normalize(&minimal());
        assert_eq!(app.metadata.version, "2");
        assert_eq!(app.metadata.space.as_deref(), Some("dev"));
    }

    #[test]
    fn manifest_version_applies_without_override() {
        let manifest = parse_manifest_str("version: 7\napplications: []\n").unwrap();
        assert_eq!(Normalizer::new().for_manifest(&manifest).version(), Some("7"));
        assert_eq!(
            Normalizer::new()
                .with_version("9")
                .for_manifest(&manifest)
                .version(),
            Some("9")
        );
        assert_eq!(
            Normalizer::new()
                .with_version("")
                .for_manifest(&manifest)
                .version(),
            Some("7")
        );

        let unversioned = parse_manifest_str("applications: []\n").unwrap();
        let app = Normalizer::new()
            .for_manifest(&unversioned)
            .normalize(&minimal());
        assert_eq!(app.metadata.version, "1");
    }

    #[test]
    fn malformed_entry_is_structural_error() {
        let manifest = parse_manifest_str(
            r"
applications:
- name: broken
  routes: 5
",
        )
        .unwrap();
        let err = Normalizer::new()
            .normalize_entry(0, &manifest.applications[0])
            .unwrap_err();
        match err {
            DiscoverError::Structural { index, name, .. } => {
                assert_eq!(index, 0);
                assert_eq!(name.as_deref(), Some("broken"));
            }
            other @ DiscoverError::Manifest(_) => panic!("unexpected error: {other}"),
        }
    }
}
