use crate::presence::{non_empty, non_zero};
use cfdiscover_schema::{AppManifestProcess, Probe, ProbeType};
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "/";
pub const DEFAULT_TIMEOUT_SECS: u32 = 1;
pub const DEFAULT_INTERVAL_SECS: u32 = 30;

/// Which check a probe drives. The two kinds read different manifest fields
/// and fall back to different probe types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// `health-check-*` fields, defaulting to a port check.
    Liveness,
    /// `readiness-health-check-*` fields, defaulting to a process check.
    Readiness,
}

impl ProbeKind {
    pub fn default_type(self) -> ProbeType {
        match self {
            ProbeKind::Liveness => ProbeType::port(),
            ProbeKind::Readiness => ProbeType::process(),
        }
    }

    /// Resolve this kind of probe from the matching fields of a process definition.
    pub fn resolve(self, process: &AppManifestProcess) -> Probe {
        match self {
            ProbeKind::Liveness => resolve_probe(
                process.health_check_type.as_deref(),
                process.health_check_http_endpoint.as_deref(),
                process.health_check_interval,
                process.health_check_invocation_timeout,
                self.default_type(),
            ),
            ProbeKind::Readiness => resolve_probe(
                process.readiness_health_check_type.as_deref(),
                process.readiness_health_check_http_endpoint.as_deref(),
                process.readiness_health_check_interval,
                process.readiness_health_check_invocation_timeout,
                self.default_type(),
            ),
        }
    }
}

/// Build a probe from raw manifest values, substituting defaults for every
/// value that is absent, empty or zero. Unknown type strings are kept.
pub fn resolve_probe(
    raw_type: Option<&str>,
    raw_endpoint: Option<&str>,
    raw_interval: Option<u32>,
    raw_timeout: Option<u32>,
    default_type: ProbeType,
) -> Probe {
    let probe_type = non_empty(raw_type).map_or(default_type, ProbeType::from);
    if !probe_type.is_known() {
        debug!("passing through unrecognized health check type '{probe_type}'");
    }
    Probe {
        endpoint: non_empty(raw_endpoint)
            .unwrap_or(DEFAULT_ENDPOINT)
            .to_owned(),
        timeout: non_zero(raw_timeout).unwrap_or(DEFAULT_TIMEOUT_SECS),
        interval: non_zero(raw_interval).unwrap_or(DEFAULT_INTERVAL_SECS),
        probe_type,
    }
}
