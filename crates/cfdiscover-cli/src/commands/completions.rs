use super::{status_ok, EXIT_SUCCESS};
use clap::CommandFactory;
use clap_complete::Shell;
use std::path::Path;

pub const BIN_NAME: &str = "cfdiscover";

/// Emit the completion script for `shell` on stdout, or install it as a file
/// under `dir` (named the way each shell expects, e.g. `_cfdiscover` for zsh).
pub fn run<C: CommandFactory>(shell: Shell, dir: Option<&Path>) -> Result<u8, String> {
    let mut cmd = C::command();
    let Some(dir) = dir else {
        clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut std::io::stdout());
        return Ok(EXIT_SUCCESS);
    };

    std::fs::create_dir_all(dir)
        .map_err(|e| format!("failed to create {}: {e}", dir.display()))?;
    let path = clap_complete::generate_to(shell, &mut cmd, BIN_NAME, dir)
        .map_err(|e| format!("failed to write {shell} completions: {e}"))?;
    eprintln!(
        "{}",
        status_ok(&format!("{shell} completions written to {}", path.display()))
    );
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Parser, ValueHint};
    use std::path::PathBuf;

    #[derive(Parser)]
    #[command(name = "cfdiscover")]
    struct Fixture {
        #[arg(value_hint = ValueHint::FilePath)]
        manifest: PathBuf,
    }

    #[test]
    fn installs_zsh_completions_under_conventional_name() {
        let dir = tempfile::tempdir().unwrap();
        run::<Fixture>(Shell::Zsh, Some(dir.path())).unwrap();
        let script = std::fs::read_to_string(dir.path().join("_cfdiscover")).unwrap();
        assert!(script.contains("_files"));
    }

    #[test]
    fn installs_bash_completions() {
        let dir = tempfile::tempdir().unwrap();
        run::<Fixture>(Shell::Bash, Some(&dir.path().join("bash"))).unwrap();
        assert!(dir.path().join("bash/cfdiscover.bash").exists());
    }
}
