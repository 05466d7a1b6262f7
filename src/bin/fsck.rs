//! Offline volume checker

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::prelude::*;
use volume_fsck::volume::DatabaseState;
use volume_fsck::{CheckSuite, Console, FsckConfig, Verbosity, Volume};

#[derive(Parser, Debug)]
#[command(name = "volume-fsck")]
#[command(about = "Check and repair an object-storage volume offline")]
#[command(version)]
struct Cli {
    /// Volume root directory
    path: PathBuf,

    /// Repair what can be repaired (quarantine orphaned objects)
    #[arg(short = 'F', long)]
    fix: bool,

    /// Succeed without checking if the volume has no metadata store
    #[arg(short = 'I', long)]
    ignore_uninitialized: bool,

    /// Print nothing; the exit status is the result
    #[arg(short, long)]
    quiet: bool,

    /// Print every inspected item
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet {
        "off".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        cli.log_level.clone()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!(error = %e, "fsck aborted");
            if !cli.quiet {
                eprintln!("error: {:#}", e);
            }
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let config = FsckConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let volume = Volume::open(&cli.path, config)?;
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);

    tracing::info!(
        root = %volume.root().display(),
        fix = cli.fix,
        %verbosity,
        version = volume_fsck::VERSION,
        "starting volume check"
    );

    if cli.ignore_uninitialized && volume.database_state() == DatabaseState::Missing {
        tracing::info!("no metadata store, volume is uninitialized; nothing to check");
        return Ok(true);
    }

    let store = volume.open_metadata()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut console = Console::new(verbosity, &mut out);

    let report = CheckSuite::standard(&volume, &store)
        .run(&mut console, cli.fix)
        .with_context(|| format!("checking {}", volume.root().display()))?;

    tracing::debug!(?report, "check run finished");
    Ok(report.all_passed)
}
