use crate::presence::non_empty;
use crate::probe::ProbeKind;
use cfdiscover_schema::{AppManifest, AppManifestProcess, LifecycleType, Process, ProcessType};
use tracing::debug;

pub const DEFAULT_MEMORY: &str = "1G";
pub const DEFAULT_INSTANCES: u32 = 1;
pub const DEFAULT_LOG_RATE_LIMIT: &str = "16K";

/// Resolve every process of an application.
///
/// Entries of the `processes` list come first, in manifest order. A process
/// definition inlined on the application node is appended last.
pub fn resolve_processes(app: &AppManifest) -> Vec<Process> {
    let mut processes: Vec<Process> = app
        .processes
        .iter()
        .flatten()
        .map(resolve_process)
        .collect();

    if let Some(inlined) = inlined_process(app) {
        debug!(
            "application '{}' carries an inlined '{}' process definition",
            app.name.as_deref().unwrap_or_default(),
            inlined.process_type.as_deref().unwrap_or_default()
        );
        processes.push(resolve_process(&inlined));
    }

    processes
}

/// Extract the process definition written directly on the application node.
///
/// `type` is the only mandatory field of a process, so an application without
/// a top-level `type` has no inlined definition.
pub fn inlined_process(app: &AppManifest) -> Option<AppManifestProcess> {
    non_empty(app.process_type.as_deref())?;
    Some(AppManifestProcess {
        process_type: app.process_type.clone(),
        command: app.command.clone(),
        disk_quota: app.disk_quota.clone(),
        memory: app.memory.clone(),
        instances: app.instances,
        log_rate_limit_per_second: app.log_rate_limit_per_second.clone(),
        health_check_type: app.health_check_type.clone(),
        health_check_http_endpoint: app.health_check_http_endpoint.clone(),
        health_check_interval: app.health_check_interval,
        health_check_invocation_timeout: app.health_check_invocation_timeout,
        readiness_health_check_type: app.readiness_health_check_type.clone(),
        readiness_health_check_http_endpoint: app.readiness_health_check_http_endpoint.clone(),
        readiness_health_check_interval: app.readiness_health_check_interval,
        readiness_health_check_invocation_timeout: app.readiness_health_check_invocation_timeout,
        timeout: app.timeout,
        lifecycle: app.lifecycle.clone(),
    })
}

/// Map one process definition, filling memory, instances, log rate limit and both
/// probes with their defaults.
pub fn resolve_process(source: &AppManifestProcess) -> Process {
    let process_type = ProcessType::from(source.process_type.as_deref().unwrap_or_default());
    if !process_type.is_empty() && !process_type.is_known() {
        debug!("passing through unrecognized process type '{process_type}'");
    }

    Process {
        process_type,
        command: source.command.clone(),
        disk_quota: source.disk_quota.clone(),
        memory: non_empty(source.memory.as_deref())
            .unwrap_or(DEFAULT_MEMORY)
            .to_owned(),
        health_check: ProbeKind::Liveness.resolve(source),
        readiness_check: ProbeKind::Readiness.resolve(source),
        instances: source.instances.unwrap_or(DEFAULT_INSTANCES),
        log_rate_limit: non_empty(source.log_rate_limit_per_second.as_deref())
            .unwrap_or(DEFAULT_LOG_RATE_LIMIT)
            .to_owned(),
        lifecycle: non_empty(source.lifecycle.as_deref()).map(LifecycleType::from),
    }
}
