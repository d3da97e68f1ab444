use super::{completions::BIN_NAME, EXIT_SUCCESS};
use clap::CommandFactory;
use std::path::{Path, PathBuf};

/// Subcommands that get a page of their own. The rest only document
/// themselves and are covered by the top-level page.
const PAGED_SUBCOMMANDS: &[&str] = &["discover", "config"];

fn render(cmd: clap::Command, path: &Path) -> Result<(), String> {
    let mut buf = Vec::new();
    clap_mangen::Man::new(cmd)
        .render(&mut buf)
        .map_err(|e| format!("man page render failed: {e}"))?;
    std::fs::write(path, &buf).map_err(|e| format!("failed to write {}: {e}", path.display()))
}

/// Write `cfdiscover.1` plus one `cfdiscover-<sub>.1` page per paged
/// subcommand into `dir`, returning the written paths.
pub fn write_pages<C: CommandFactory>(dir: &Path) -> Result<Vec<PathBuf>, String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("failed to create dir: {e}"))?;
    let cmd = C::command();

    let mut written = Vec::with_capacity(PAGED_SUBCOMMANDS.len() + 1);
    let path = dir.join(format!("{BIN_NAME}.1"));
    render(cmd.clone(), &path)?;
    written.push(path);

    for name in PAGED_SUBCOMMANDS {
        let Some(sub) = cmd.find_subcommand(name) else {
            continue;
        };
        let path = dir.join(format!("{BIN_NAME}-{name}.1"));
        render(sub.clone(), &path)?;
        written.push(path);
    }
    Ok(written)
}

pub fn run<C: CommandFactory>(dir: &Path) -> Result<u8, String> {
    for path in write_pages::<C>(dir)? {
        println!("{}", path.display());
    }
    Ok(EXIT_SUCCESS)
}
