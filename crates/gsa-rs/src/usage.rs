//! Store usage aggregation.
//!
//! [`store_usage`] combines container stats from a [`StatsProvider`] with the
//! volume metadata in the store into a [`StoreUsage`] report.
//!
//! # Degraded Results
//!
//! The container figure and the layer figures are computed independently. If
//! reading the store fails for one of them, that figure is reported as zero
//! and a warning is logged; the other still computes. A zero in the report can
//! therefore mean "failed to compute" as well as "nothing there".
//!
//! Failures of the stats tool itself are different: they are returned as
//! errors, since a tool that answers one container wrongly cannot be trusted
//! for the others.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::resolve::resolve;
use crate::stats::{collect_containers, StatsProvider};
use crate::store::Store;

/// Disk usage of a grootfs store at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreUsage {
    /// Exclusive bytes of all containers' writable layers.
    #[serde(rename = "total_bytes_containers")]
    pub containers: u64,
    /// Bytes of all volumes, referenced or not.
    #[serde(rename = "total_bytes_layers")]
    pub layers: u64,
    /// Bytes of volumes referenced by at least one container.
    #[serde(rename = "total_bytes_active_layers")]
    pub active: u64,
    /// `containers + layers`.
    #[serde(rename = "total_bytes_store")]
    pub total: u64,
}

impl StoreUsage {
    /// Build a report, deriving `total`.
    pub fn new(containers: u64, layers: u64, active: u64) -> Self {
        Self {
            containers,
            layers,
            active,
            total: containers.saturating_add(layers),
        }
    }
}

/// Layer figures of a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VolumeUsage {
    /// Size of every volume.
    pub layers: u64,
    /// Size of the referenced volumes only.
    pub active: u64,
}

/// Compute the usage report for the store at `store_root`.
///
/// # Errors
///
/// Only stats tool failures ([`crate::UsageError::is_protocol_failure`]) are
/// returned. Store errors degrade the affected figure to zero.
pub fn store_usage<P>(store_root: &Path, provider: &P) -> Result<StoreUsage>
where
    P: StatsProvider + ?Sized,
{
    let containers = degrade(
        "failed to get total container image disk usage",
        Store::open(store_root).and_then(|store| container_usage(&store, provider)),
    )?;

    let volumes = degrade(
        "failed to get active layers disk usage",
        Store::open(store_root).and_then(|store| volume_usage(&store)),
    )?;

    Ok(StoreUsage::new(containers, volumes.layers, volumes.active))
}

/// Exclusive bytes summed over every container in the store.
pub fn container_usage<P>(store: &Store, provider: &P) -> Result<u64>
where
    P: StatsProvider + ?Sized,
{
    let containers = store.list_containers()?;
    tracing::debug!(count = containers.len(), "collecting container stats");
    collect_containers(provider, &containers)
}

/// Total and active volume bytes.
///
/// A dependency on a volume without a metadata record fails the whole
/// computation with [`crate::UsageError::VolumeNotFound`].
pub fn volume_usage(store: &Store) -> Result<VolumeUsage> {
    let volumes = store.list_volumes()?;
    let manifests = store.read_all_manifests()?;
    let sets = resolve(&volumes, &manifests);

    let mut usage = VolumeUsage::default();

    for id in &sets.inactive {
        let size = store.read_volume_size(id)?;
        usage.layers = usage.layers.saturating_add(size);
    }

    for id in &sets.active {
        let size = store.read_volume_size(id)?;
        usage.layers = usage.layers.saturating_add(size);
        usage.active = usage.active.saturating_add(size);
    }

    tracing::debug!(
        volumes = volumes.len(),
        active = sets.active.len(),
        "read volume metadata"
    );
    Ok(usage)
}

/// Swap a store error for the default value, keeping stats tool errors.
fn degrade<T: Default>(what: &str, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_protocol_failure() => Err(e),
        Err(e) => {
            tracing::warn!("{}: {}", what, e);
            Ok(T::default())
        }
    }
}
