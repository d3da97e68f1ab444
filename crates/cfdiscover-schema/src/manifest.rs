use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("invalid application entry: {0}")]
    InvalidEntry(serde_yaml::Error),
}

/// A Cloud Foundry application manifest: a schema version plus the list of
/// application entries.
///
/// Entries are kept undecoded so that one malformed application does not
/// prevent the rest of the manifest from being read.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Manifest {
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub version: Option<String>,
    #[serde(default)]
    pub applications: Vec<ManifestEntry>,
}

/// One undecoded node of the `applications` list.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ManifestEntry(Value);

impl ManifestEntry {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The `name` of the entry rendered as a string, if the node is a mapping
    /// whose name (own or inherited through `<<`) is a scalar.
    pub fn name(&self) -> Option<String> {
        let merged = self.merged().ok();
        match merged.as_ref().unwrap_or(&self.0).get("name")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Interpret the node as an application record, after resolving `<<`
    /// merge keys.
    pub fn decode(&self) -> Result<AppManifest, ManifestError> {
        serde_yaml::from_value(self.merged()?).map_err(ManifestError::InvalidEntry)
    }

    fn merged(&self) -> Result<Value, ManifestError> {
        let mut value = self.0.clone();
        value.apply_merge().map_err(ManifestError::InvalidEntry)?;
        Ok(value)
    }
}

impl From<Value> for ManifestEntry {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A single application entry.
///
/// Besides the application-level fields, the node may carry a process definition
/// inline (`type`, `command`, `memory`, health checks, ...). That legacy
/// shorthand describes one extra process when `type` is set.
///
/// String fields accept any YAML scalar: `name: 2048` reads as `"2048"`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct AppManifest {
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_list")]
    pub buildpacks: Option<Vec<String>>,
    /// Deprecated singular form of `buildpacks`.
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub buildpack: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub stack: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_map")]
    pub env: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub docker: Option<AppManifestDocker>,
    #[serde(default)]
    pub metadata: Option<AppMetadata>,

    #[serde(default)]
    pub routes: Option<Vec<AppManifestRoute>>,
    #[serde(default)]
    pub no_route: Option<bool>,
    #[serde(default)]
    pub random_route: Option<bool>,
    #[serde(default)]
    pub default_route: Option<bool>,

    #[serde(default)]
    pub services: Option<Vec<AppManifestService>>,
    #[serde(default)]
    pub sidecars: Option<Vec<AppManifestSidecar>>,
    #[serde(default)]
    pub processes: Option<Vec<AppManifestProcess>>,

    // Inlined process definition.
    #[serde(default, rename = "type", deserialize_with = "opt_scalar_string")]
    pub process_type: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub command: Option<String>,
    #[serde(
        default,
        rename = "disk_quota",
        alias = "disk-quota",
        deserialize_with = "opt_scalar_string"
    )]
    pub disk_quota: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub memory: Option<String>,
    #[serde(default)]
    pub instances: Option<u32>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub log_rate_limit_per_second: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub health_check_type: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub health_check_http_endpoint: Option<String>,
    #[serde(default)]
    pub health_check_interval: Option<u32>,
    #[serde(default)]
    pub health_check_invocation_timeout: Option<u32>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub readiness_health_check_type: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub readiness_health_check_http_endpoint: Option<String>,
    #[serde(default)]
    pub readiness_health_check_interval: Option<u32>,
    #[serde(default)]
    pub readiness_health_check_invocation_timeout: Option<u32>,
    #[serde(default)]
    pub timeout: Option<u32>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub lifecycle: Option<String>,
}

/// An entry of the `processes` list.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct AppManifestProcess {
    #[serde(default, rename = "type", deserialize_with = "opt_scalar_string")]
    pub process_type: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub command: Option<String>,
    #[serde(
        default,
        rename = "disk_quota",
        alias = "disk-quota",
        deserialize_with = "opt_scalar_string"
    )]
    pub disk_quota: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub memory: Option<String>,
    #[serde(default)]
    pub instances: Option<u32>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub log_rate_limit_per_second: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub health_check_type: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub health_check_http_endpoint: Option<String>,
    #[serde(default)]
    pub health_check_interval: Option<u32>,
    #[serde(default)]
    pub health_check_invocation_timeout: Option<u32>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub readiness_health_check_type: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub readiness_health_check_http_endpoint: Option<String>,
    #[serde(default)]
    pub readiness_health_check_interval: Option<u32>,
    #[serde(default)]
    pub readiness_health_check_invocation_timeout: Option<u32>,
    #[serde(default)]
    pub timeout: Option<u32>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub lifecycle: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AppManifestDocker {
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub username: Option<String>,
}

/// Label and annotation values may be null, which is kept apart from an
/// empty string.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AppMetadata {
    #[serde(default, deserialize_with = "opt_scalar_labels")]
    pub labels: Option<BTreeMap<String, Option<String>>>,
    #[serde(default, deserialize_with = "opt_scalar_labels")]
    pub annotations: Option<BTreeMap<String, Option<String>>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AppManifestRoute {
    #[serde(deserialize_with = "scalar_string")]
    pub route: String,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub protocol: Option<String>,
}

/// A service binding. Manifests list services either as a bare name or as a
/// mapping with optional parameters and binding name.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(from = "ServiceRepr")]
pub struct AppManifestService {
    pub name: String,
    pub parameters: Option<BTreeMap<String, serde_json::Value>>,
    pub binding_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ServiceRepr {
    Name(Scalar),
    Full {
        #[serde(deserialize_with = "scalar_string")]
        name: String,
        #[serde(default)]
        parameters: Option<BTreeMap<String, serde_json::Value>>,
        #[serde(default, deserialize_with = "opt_scalar_string")]
        binding_name: Option<String>,
    },
}

impl From<ServiceRepr> for AppManifestService {
    fn from(repr: ServiceRepr) -> Self {
        match repr {
            ServiceRepr::Name(name) => Self {
                name: name.into_string(),
                parameters: None,
                binding_name: None,
            },
            ServiceRepr::Full {
                name,
                parameters,
                binding_name,
            } => Self {
                name,
                parameters,
                binding_name,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AppManifestSidecar {
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_list")]
    pub process_types: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub command: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar_string")]
    pub memory: Option<String>,
}

/// YAML scalars accepted where the schema expects a string (`memory: 512`,
/// `PORT: 8080`, `version: 1`).
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Null(()),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Str(s) => s,
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(n) => n.to_string(),
            Scalar::UInt(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Null(()) => String::new(),
        }
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Scalar::deserialize(deserializer)?.into_string())
}

fn opt_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

fn opt_scalar_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Scalar>>::deserialize(deserializer)?;
    Ok(raw.map(|items| items.into_iter().map(Scalar::into_string).collect()))
}

fn opt_scalar_map<'de, D>(deserializer: D) -> Result<Option<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Scalar>>::deserialize(deserializer)?;
    Ok(raw.map(|map| {
        map.into_iter()
            .map(|(key, value)| (key, value.into_string()))
            .collect()
    }))
}

fn opt_scalar_labels<'de, D>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, Option<String>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Option<Scalar>>>::deserialize(deserializer)?;
    Ok(raw.map(|map| {
        map.into_iter()
            .map(|(key, value)| (key, value.map(Scalar::into_string)))
            .collect()
    }))
}

pub fn parse_manifest_str(input: &str) -> Result<Manifest, ManifestError> {
    Ok(serde_yaml::from_str(input)?)
}

pub fn parse_manifest_file(path: impl AsRef<Path>) -> Result<Manifest, ManifestError> {
    let content = fs::read_to_string(path)?;
    parse_manifest_str(&content)
}

/// Parse a single application entry, without the surrounding manifest.
pub fn parse_app_str(input: &str) -> Result<AppManifest, ManifestError> {
    let value: Value = serde_yaml::from_str(input).map_err(ManifestError::InvalidEntry)?;
    ManifestEntry::new(value).decode()
}
