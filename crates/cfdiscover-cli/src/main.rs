mod commands;
mod config;

use clap::{Parser, Subcommand, ValueHint};
use clap_complete::Shell;
use commands::config::ConfigUpdate;
use commands::discover::DiscoverOptions;
use commands::{EXIT_ENTRY_ERROR, EXIT_FAILURE, EXIT_MANIFEST_ERROR};
use config::{default_config_path, CliConfig, OutputFormat};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const AFTER_HELP: &str = "\
EXIT STATUS:
  0  every application was normalized
  1  usage, config or output failure
  2  the manifest could not be read or parsed
  3  at least one application entry is malformed

ENVIRONMENT:
  CFDISCOVER_LOG  tracing filter, overrides --verbose and --trace

FILES:
  ~/.config/cfdiscover/config.toml  defaults for discover, written by `cfdiscover config`";

#[derive(Debug, Parser)]
#[command(
    name = "cfdiscover",
    version,
    about = "Normalize Cloud Foundry application manifests into canonical application documents",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    /// Path to a TOML config file (default: ~/.config/cfdiscover/config.toml).
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Normalize every application in a manifest.
    Discover {
        /// Path to the manifest YAML file.
        #[arg(value_hint = ValueHint::FilePath)]
        manifest: PathBuf,
        /// Space name recorded in each application's metadata.
        #[arg(long)]
        space: Option<String>,
        /// Schema version, overriding the manifest's own `version`.
        #[arg(long)]
        schema_version: Option<String>,
        /// Output format.
        #[arg(long, value_enum)]
        output: Option<OutputFormat>,
        /// Stop at the first malformed application.
        #[arg(long, default_value_t = false)]
        fail_fast: bool,
    },
    /// Show or change the defaults used by `discover`.
    ///
    /// Without options the stored defaults are printed. Passing an empty value
    /// (`--space ""`) removes that default.
    Config {
        #[arg(long)]
        space: Option<String>,
        #[arg(long)]
        schema_version: Option<String>,
        #[arg(long, value_enum)]
        output: Option<OutputFormat>,
        #[arg(long)]
        fail_fast: Option<bool>,
    },
    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
        /// Write the script into this directory instead of stdout.
        #[arg(long, value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },
    /// Generate man pages.
    ManPages {
        /// Output directory.
        #[arg(default_value = "man", value_hint = ValueHint::DirPath)]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("CFDISCOVER_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let result = match cli.command {
        Commands::Discover {
            manifest,
            space,
            schema_version,
            output,
            fail_fast,
        } => load_config(cli.config.as_deref()).and_then(|config| {
            let options = DiscoverOptions {
                space: space.or(config.space),
                schema_version: schema_version.or(config.schema_version),
                output: output.or(config.output).unwrap_or_default(),
                fail_fast: fail_fast || config.fail_fast,
            };
            commands::discover::run(&manifest, &options)
        }),
        Commands::Config {
            space,
            schema_version,
            output,
            fail_fast,
        } => config_path(cli.config.as_deref()).and_then(|path| {
            let update = ConfigUpdate {
                space,
                schema_version,
                output,
                fail_fast,
            };
            commands::config::run(&path, &update)
        }),
        Commands::Completions { shell, dir } => {
            commands::completions::run::<Cli>(shell, dir.as_deref())
        }
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(exit_code_for(&msg))
        }
    }
}

fn load_config(explicit: Option<&Path>) -> Result<CliConfig, String> {
    match explicit {
        Some(path) => CliConfig::load(path),
        None => CliConfig::load_default(),
    }
}

fn config_path(explicit: Option<&Path>) -> Result<PathBuf, String> {
    explicit
        .map(Path::to_path_buf)
        .or_else(default_config_path)
        .ok_or_else(|| "config error: HOME is not set; pass --config".to_owned())
}

fn exit_code_for(msg: &str) -> u8 {
    if msg.starts_with("manifest error:")
        || msg.starts_with("failed to parse manifest")
        || msg.starts_with("failed to read manifest")
    {
        EXIT_MANIFEST_ERROR
    } else if msg.starts_with("application #") {
        EXIT_ENTRY_ERROR
    } else {
        EXIT_FAILURE
    }
}
