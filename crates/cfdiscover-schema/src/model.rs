use crate::types::{LifecycleType, ProbeType, ProcessType, RouteProtocol};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Platform-neutral interpretation of one Cloud Foundry application.
///
/// Every optional manifest field has been resolved to its default, so the
/// structure can be translated to a Kubernetes workload without consulting
/// Cloud Foundry semantics again. Maps are ordered, which keeps serialized
/// output stable across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(flatten)]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    #[serde(rename = "route", default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,
    #[serde(rename = "service", default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<Service>,
    #[serde(rename = "process", default, skip_serializing_if = "Vec::is_empty")]
    pub processes: Vec<Process>,
    #[serde(rename = "sidecar", default, skip_serializing_if = "Vec::is_empty")]
    pub sidecars: Vec<Sidecar>,
    /// Informational only; stacks have no Kubernetes counterpart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_packs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Docker::is_empty")]
    pub docker: Docker,
    /// Seconds the platform waits for the application to start.
    pub timeout: u32,
    pub instances: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    /// Supplied by the caller; manifests do not name their space.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, Option<String>>>,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Route {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<RouteProtocol>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_name: Option<String>,
}

/// Container image reference. An empty image means the application is not
/// deployed from a container image.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Docker {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Docker {
    pub fn is_empty(&self) -> bool {
        self.image.is_empty() && self.username.is_none()
    }
}

/// Sidecar processes may attach to several process types at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Sidecar {
    pub name: String,
    #[serde(rename = "processType", default)]
    pub process_types: Vec<ProcessType>,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    #[serde(rename = "type", default, skip_serializing_if = "ProcessType::is_empty")]
    pub process_type: ProcessType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(rename = "disk", default, skip_serializing_if = "Option::is_none")]
    pub disk_quota: Option<String>,
    pub memory: String,
    pub health_check: Probe,
    pub readiness_check: Probe,
    pub instances: u32,
    pub log_rate_limit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<LifecycleType>,
}

/// Health or readiness check. Timeout and interval are in seconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Probe {
    pub endpoint: String,
    pub timeout: u32,
    pub interval: u32,
    #[serde(rename = "type")]
    pub probe_type: ProbeType,
}

impl Application {
    pub fn canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn canonical_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(probe_type: ProbeType) -> Probe {
        Probe {
            endpoint: "/".to_owned(),
            timeout: 1,
            interval: 30,
            probe_type,
        }
    }

    fn sample() -> Application {
        Application {
            metadata: Metadata {
                name: "billing".to_owned(),
                version: "1".to_owned(),
                ..Metadata::default()
            },
            routes: vec![Route {
                url: "billing.example.com".to_owned(),
                protocol: Some(RouteProtocol::http2()),
            }],
            services: vec![Service {
                name: "db".to_owned(),
                binding_name: Some("primary".to_owned()),
                ..Service::default()
            }],
            processes: vec![Process {
                process_type: ProcessType::web(),
                memory: "1G".to_owned(),
                health_check: probe(ProbeType::port()),
                readiness_check: probe(ProbeType::process()),
                instances: 1,
                log_rate_limit: "16K".to_owned(),
                ..Process::default()
            }],
            sidecars: vec![Sidecar {
                name: "envoy".to_owned(),
                process_types: vec![ProcessType::web()],
                command: "envoy".to_owned(),
                memory: None,
            }],
            build_packs: Some(vec!["go_buildpack".to_owned()]),
            timeout: 60,
            instances: 1,
            ..Application::default()
        }
    }

    #[test]
    fn serializes_with_canonical_field_names() {
        let json: serde_json::Value = serde_json::from_str(&sample().canonical_json().unwrap()).unwrap();
        assert_eq!(json["name"], "billing");
        assert_eq!(json["version"], "1");
        assert_eq!(json["route"][0]["url"], "billing.example.com");
        assert_eq!(json["route"][0]["protocol"], "http2");
        assert_eq!(json["service"][0]["bindingName"], "primary");
        assert_eq!(json["process"][0]["type"], "web");
        assert_eq!(json["process"][0]["healthCheck"]["type"], "port");
        assert_eq!(json["process"][0]["readinessCheck"]["type"], "process");
        assert_eq!(json["process"][0]["logRateLimit"], "16K");
        assert_eq!(json["sidecar"][0]["processType"][0], "web");
        assert_eq!(json["buildPacks"][0], "go_buildpack");
        assert_eq!(json["timeout"], 60);
        assert_eq!(json["instances"], 1);
    }

    #[test]
    fn omits_empty_and_absent_fields() {
        let json: serde_json::Value = serde_json::from_str(
            &Application {
                metadata: Metadata {
                    name: "bare".to_owned(),
                    version: "1".to_owned(),
                    ..Metadata::default()
                },
                timeout: 60,
                instances: 1,
                ..Application::default()
            }
            .canonical_json()
            .unwrap(),
        )
        .unwrap();
        let obj = json.as_object().unwrap();
        for absent in [
            "space", "labels", "annotations", "env", "route", "service", "process", "sidecar",
            "stack", "buildPacks", "docker",
        ] {
            assert!(!obj.contains_key(absent), "{absent} should be omitted");
        }
    }

    #[test]
    fn docker_emptiness() {
        assert!(Docker::default().is_empty());
        assert!(!Docker {
            image: "nginx".to_owned(),
            username: None
        }
        .is_empty());
    }

    #[test]
    fn yaml_output_parses_back() {
        let app = sample();
        let yaml = app.canonical_yaml().unwrap();
        let back: Application = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, app);
    }
}
