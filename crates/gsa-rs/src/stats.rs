//! Per-container exclusive usage from `grootfs stats`.
//!
//! A container's writable layer is only measurable by grootfs itself, so this
//! module shells out to it:
//!
//! ```text
//! $ grootfs --config /path/to/config.yml stats <container-id>
//! {"disk_usage":{"total_bytes_used":1357,"exclusive_bytes_used":123}}
//! ```
//!
//! The [`StatsProvider`] trait is the seam between the aggregator and the
//! process; tests substitute an in-memory implementation.

use serde::Deserialize;
use std::path::PathBuf;
use std::process::Command;

use crate::error::{Result, UsageError};

/// Source of exclusive disk usage for a container.
pub trait StatsProvider {
    /// Bytes used by the container's own writable layer.
    fn exclusive_bytes(&self, container_id: &str) -> Result<u64>;
}

/// Disk usage section of a `grootfs stats` record.
#[derive(Debug, Clone, Deserialize)]
pub struct DiskUsage {
    /// Bytes used including shared layers.
    #[serde(default)]
    pub total_bytes_used: u64,
    /// Bytes used by the container alone.
    pub exclusive_bytes_used: u64,
}

/// A `grootfs stats` record.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageStats {
    pub disk_usage: DiskUsage,
}

/// Parse the output of `grootfs stats`.
///
/// On failure the raw output is kept in the error so a protocol mismatch can
/// be diagnosed from the message alone.
pub fn parse_stats(output: &str) -> Result<ImageStats> {
    serde_json::from_str(output).map_err(|source| UsageError::MangledStats {
        source,
        output: output.to_string(),
    })
}

/// [`StatsProvider`] backed by the grootfs binary.
#[derive(Debug, Clone)]
pub struct GrootfsStats {
    bin: PathBuf,
    config: PathBuf,
}

impl GrootfsStats {
    /// Create a provider invoking `bin` with the config file at `config`.
    pub fn new(bin: impl Into<PathBuf>, config: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            config: config.into(),
        }
    }
}

impl StatsProvider for GrootfsStats {
    fn exclusive_bytes(&self, container_id: &str) -> Result<u64> {
        let output = Command::new(&self.bin)
            .arg("--config")
            .arg(&self.config)
            .arg("stats")
            .arg(container_id)
            .output()
            .map_err(|e| UsageError::ExternalTool {
                reason: format!("failed to spawn {}: {}", self.bin.display(), e),
                output: String::new(),
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(UsageError::ExternalTool {
                reason: output.status.to_string(),
                output: combined,
            });
        }

        let stats = parse_stats(&combined)?;
        tracing::debug!(
            container = container_id,
            exclusive = stats.disk_usage.exclusive_bytes_used,
            "collected container stats"
        );
        Ok(stats.disk_usage.exclusive_bytes_used)
    }
}

/// Sum exclusive usage over `containers`.
///
/// The first failure aborts the whole sum: one bad response means the tool's
/// output cannot be trusted for any container.
pub fn collect_containers<P>(provider: &P, containers: &[String]) -> Result<u64>
where
    P: StatsProvider + ?Sized,
{
    containers.iter().try_fold(0u64, |total, id| {
        Ok(total.saturating_add(provider.exclusive_bytes(id)?))
    })
}
