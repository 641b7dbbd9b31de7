#![forbid(unsafe_code)]
//! Read-only disk usage report for a grootfs image store.
//!
//! grootfs keeps container root filesystems as a writable layer per container
//! on top of shared, content-addressed read-only volumes. This library answers
//! four questions about a store:
//!
//! - how many bytes the containers' writable layers use (asked of grootfs),
//! - how many bytes all volumes use,
//! - how many of those belong to volumes some container references,
//! - and the sum of containers and volumes.
//!
//! # Example
//!
//! ```no_run
//! use gsa_rs::{store_usage, GrootConfig, GrootfsStats};
//!
//! let config_path = "/var/vcap/jobs/garden/config/grootfs_config.yml";
//! let config = GrootConfig::load(config_path)?;
//! let stats = GrootfsStats::new("/var/vcap/packages/grootfs/bin/grootfs", config_path);
//!
//! let usage = store_usage(&config.store, &stats)?;
//! println!("{} bytes in store", usage.total);
//! # Ok::<(), gsa_rs::UsageError>(())
//! ```
//!
//! # Architecture
//!
//! - [`store`] reads listings and records from the store layout
//! - [`resolve`] splits volumes into active and inactive sets
//! - [`stats`] asks grootfs for per-container exclusive usage
//! - [`usage`] puts the pieces together and decides which failures degrade
//!
//! Nothing in this crate writes to the store or exits the process.

pub mod config;
pub mod error;
pub mod resolve;
pub mod stats;
pub mod store;
pub mod usage;

pub use config::GrootConfig;
pub use error::{Result, UsageError};
pub use resolve::{resolve, volume_key, VolumeSets};
pub use stats::{GrootfsStats, StatsProvider};
pub use store::Store;
pub use usage::{store_usage, StoreUsage};
