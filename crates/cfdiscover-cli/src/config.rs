use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One YAML document per application, each preceded by `#<index>`.
    #[default]
    Yaml,
    /// A single JSON array with one object per application entry.
    Json,
}

/// Defaults for `discover`, read from a TOML file. Command-line flags take
/// precedence over every value here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    #[serde(default)]
    pub space: Option<String>,
    #[serde(default)]
    pub schema_version: Option<String>,
    #[serde(default)]
    pub output: Option<OutputFormat>,
    #[serde(default)]
    pub fail_fast: bool,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("config error: failed to read {}: {e}", path.display()))?;
        toml::from_str(&content)
            .map_err(|e| format!("config error: invalid {}: {e}", path.display()))
    }

    /// Like [`CliConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, String> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load `~/.config/cfdiscover/config.toml`. A missing file yields the
    /// defaults.
    pub fn load_default() -> Result<Self, String> {
        match default_config_path() {
            Some(path) => Self::load_or_default(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                format!("config error: failed to create {}: {e}", parent.display())
            })?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content)
            .map_err(|e| format!("config error: failed to write {}: {e}", path.display()))
    }

    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("config error: serialization failed: {e}"))
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".config/cfdiscover/config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
space = "staging"
schema_version = "1"
output = "json"
fail_fast = true
"#,
        )
        .unwrap();

        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.space.as_deref(), Some("staging"));
        assert_eq!(config.schema_version.as_deref(), Some("1"));
        assert_eq!(config.output, Some(OutputFormat::Json));
        assert!(config.fail_fast);
    }

    #[test]
    fn empty_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();
        assert_eq!(CliConfig::load(&path).unwrap(), CliConfig::default());
    }

    #[test]
    fn rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "colour = \"always\"\n").unwrap();
        let err = CliConfig::load(&path).unwrap_err();
        assert!(err.starts_with("config error:"));
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CliConfig::load(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/cfdiscover/config.toml");

        let config = CliConfig {
            space: Some("dev".to_owned()),
            output: Some(OutputFormat::Yaml),
            fail_fast: true,
            ..CliConfig::default()
        };
        config.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("space = \"dev\""));
        assert!(text.contains("output = \"yaml\""));
        assert!(!text.contains("schema_version"));
        assert_eq!(CliConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, CliConfig::default());
    }
}
