use super::{json_pretty, status_fail, status_ok, yaml, EXIT_ENTRY_ERROR, EXIT_SUCCESS};
use crate::config::OutputFormat;
use cfdiscover_core::{discover, discover_fail_fast, DiscoverError, Normalizer};
use cfdiscover_schema::{parse_manifest_file, Application};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Effective settings after merging flags over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoverOptions {
    pub space: Option<String>,
    pub schema_version: Option<String>,
    pub output: OutputFormat,
    pub fail_fast: bool,
}

impl DiscoverOptions {
    fn normalizer(&self) -> Normalizer {
        let mut normalizer = Normalizer::new();
        if let Some(version) = &self.schema_version {
            normalizer = normalizer.with_version(version.as_str());
        }
        if let Some(space) = &self.space {
            normalizer = normalizer.with_space(space.as_str());
        }
        normalizer
    }
}

#[derive(Serialize)]
struct EntryOutput<'a> {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    application: Option<&'a Application>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(manifest_path: &Path, options: &DiscoverOptions) -> Result<u8, String> {
    let manifest = parse_manifest_file(manifest_path).map_err(|e| e.to_string())?;
    if manifest.applications.is_empty() {
        println!("No applications found.");
        return Ok(EXIT_SUCCESS);
    }
    info!(
        "normalizing {} application(s) from {}",
        manifest.applications.len(),
        manifest_path.display()
    );

    let normalizer = options.normalizer();
    let entries: Vec<Result<Application, DiscoverError>> = if options.fail_fast {
        discover_fail_fast(&manifest, &normalizer)
            .map_err(|e| e.to_string())?
            .into_iter()
            .map(Ok)
            .collect()
    } else {
        discover(&manifest, &normalizer).entries
    };

    print!("{}", render(&entries, options.output)?);

    let failed: Vec<&DiscoverError> = entries.iter().filter_map(|e| e.as_ref().err()).collect();
    if failed.is_empty() {
        eprintln!(
            "{}",
            status_ok(&format!("{} application(s) normalized", entries.len()))
        );
        return Ok(EXIT_SUCCESS);
    }
    for err in &failed {
        eprintln!("{}", status_fail(&err.to_string()));
    }
    eprintln!(
        "{} of {} application(s) could not be normalized",
        failed.len(),
        entries.len()
    );
    Ok(EXIT_ENTRY_ERROR)
}

fn render(
    entries: &[Result<Application, DiscoverError>],
    format: OutputFormat,
) -> Result<String, String> {
    match format {
        OutputFormat::Yaml => {
            let mut out = String::new();
            for (index, entry) in entries.iter().enumerate() {
                if let Ok(app) = entry {
                    out.push_str(&format!("#{index}\n{}\n", yaml(app)?));
                }
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let outputs: Vec<EntryOutput<'_>> = entries
                .iter()
                .enumerate()
                .map(|(index, entry)| match entry {
                    Ok(app) => EntryOutput {
                        index,
                        application: Some(app),
                        error: None,
                    },
                    Err(e) => EntryOutput {
                        index,
                        application: None,
                        error: Some(e.to_string()),
                    },
                })
                .collect();
            Ok(format!("{}\n", json_pretty(&outputs)?))
        }
    }
}
