//! gsa: report disk usage of a grootfs store.
//!
//! Prints a single usage report and exits. The report goes to stdout; log
//! messages (including warnings about figures that could not be computed)
//! go to stderr and are filtered with `RUST_LOG` (default `warn`).
//!
//! ```bash
//! # JSON for monitoring agents
//! gsa --grootfs-bin /var/vcap/packages/grootfs/bin/grootfs \
//!     --grootfs-config /var/vcap/jobs/garden/config/grootfs_config.yml
//!
//! # Human-readable summary
//! gsa -r
//! ```

mod output;

use anyhow::{Context, Result};
use clap::Parser;
use gsa_rs::{store_usage, GrootConfig, GrootfsStats, UsageError};
use output::{write_usage, OutputFormat};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_GROOTFS_BIN: &str = "/var/vcap/packages/grootfs/bin/grootfs";
const DEFAULT_GROOTFS_CONFIG: &str = "/var/vcap/jobs/garden/config/grootfs_config.yml";

#[derive(Parser)]
#[command(name = "gsa")]
#[command(about = "Disk usage of a grootfs store", long_about = None)]
struct Cli {
    /// Path to the grootfs binary
    #[arg(long, default_value = DEFAULT_GROOTFS_BIN)]
    grootfs_bin: PathBuf,

    /// Path to grootfs' config
    #[arg(long, default_value = DEFAULT_GROOTFS_CONFIG)]
    grootfs_config: PathBuf,

    /// Store root (default: the `store` key of the grootfs config)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Human readable result (same as `--format human`)
    #[arg(short = 'r', long)]
    human_readable: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

impl Cli {
    fn output_format(&self) -> OutputFormat {
        if self.human_readable {
            OutputFormat::Human
        } else {
            self.format
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Both inputs are checked before anything is read from the store
    if !cli.grootfs_bin.exists() {
        return Err(UsageError::BinaryNotFound(cli.grootfs_bin).into());
    }
    let config = GrootConfig::load(&cli.grootfs_config)?;

    let store = cli.store.clone().unwrap_or(config.store);
    tracing::debug!(store = %store.display(), "computing store usage");

    let stats = GrootfsStats::new(&cli.grootfs_bin, &cli.grootfs_config);
    let usage = store_usage(&store, &stats).context("Failed to compute store usage")?;

    let stdout = std::io::stdout();
    write_usage(&mut stdout.lock(), &usage, cli.output_format())
        .context("Failed to write result")?;

    Ok(())
}
