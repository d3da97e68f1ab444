use super::{status_ok, EXIT_SUCCESS};
use crate::config::{CliConfig, OutputFormat};
use std::path::Path;

/// Values to store as `discover` defaults. `None` leaves the saved value as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub space: Option<String>,
    pub schema_version: Option<String>,
    pub output: Option<OutputFormat>,
    pub fail_fast: Option<bool>,
}

impl ConfigUpdate {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(&self, config: &mut CliConfig) {
        if let Some(space) = &self.space {
            config.space = Some(space.clone()).filter(|s| !s.is_empty());
        }
        if let Some(version) = &self.schema_version {
            config.schema_version = Some(version.clone()).filter(|v| !v.is_empty());
        }
        if let Some(output) = self.output {
            config.output = Some(output);
        }
        if let Some(fail_fast) = self.fail_fast {
            config.fail_fast = fail_fast;
        }
    }
}

/// Print the stored defaults, or merge `update` into them and save.
pub fn run(path: &Path, update: &ConfigUpdate) -> Result<u8, String> {
    let mut config = CliConfig::load_or_default(path)?;
    if update.is_empty() {
        print!("{}", config.to_toml()?);
        return Ok(EXIT_SUCCESS);
    }

    update.apply(&mut config);
    config.save(path)?;
    eprintln!(
        "{}",
        status_ok(&format!("defaults saved to {}", path.display()))
    );
    Ok(EXIT_SUCCESS)
}
