use crate::normalize::Normalizer;
use crate::DiscoverError;
use cfdiscover_schema::{parse_manifest_str, Application, Manifest};
use tracing::debug;

/// Per-entry outcome of normalizing a whole manifest, in manifest order.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub entries: Vec<Result<Application, DiscoverError>>,
}

impl DiscoveryReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every entry normalized successfully.
    pub fn is_clean(&self) -> bool {
        self.entries.iter().all(Result::is_ok)
    }

    pub fn applications(&self) -> impl Iterator<Item = &Application> {
        self.entries.iter().filter_map(|e| e.as_ref().ok())
    }

    pub fn errors(&self) -> impl Iterator<Item = &DiscoverError> {
        self.entries.iter().filter_map(|e| e.as_ref().err())
    }

    /// Collapse into all applications, or the first error.
    pub fn into_result(self) -> Result<Vec<Application>, DiscoverError> {
        self.entries.into_iter().collect()
    }
}

/// Normalize every application of `manifest`, collecting one result per
/// entry. A malformed entry does not stop the others.
pub fn discover(manifest: &Manifest, normalizer: &Normalizer) -> DiscoveryReport {
    let scoped = normalizer.for_manifest(manifest);
    debug!(
        "discovering {} application(s), schema version {}",
        manifest.applications.len(),
        scoped.version().unwrap_or(crate::resolve::DEFAULT_VERSION)
    );

    let entries = manifest
        .applications
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let result = scoped.normalize_entry(index, entry);
            if let Err(e) = &result {
                debug!("skipping entry: {e}");
            }
            result
        })
        .collect();
    DiscoveryReport { entries }
}

/// Normalize every application of `manifest`, stopping at the first
/// malformed entry.
pub fn discover_fail_fast(
    manifest: &Manifest,
    normalizer: &Normalizer,
) -> Result<Vec<Application>, DiscoverError> {
    let scoped = normalizer.for_manifest(manifest);
    manifest
        .applications
        .iter()
        .enumerate()
        .map(|(index, entry)| scoped.normalize_entry(index, entry))
        .collect()
}

/// Parse manifest YAML and discover its applications.
pub fn discover_str(input: &str, normalizer: &Normalizer) -> Result<DiscoveryReport, DiscoverError> {
    let manifest = parse_manifest_str(input)?;
    Ok(discover(&manifest, normalizer))
}
