//! Parsing of the grootfs configuration file.
//!
//! grootfs reads a YAML config that, among many other settings, names the
//! store root:
//!
//! ```yaml
//! store: /var/vcap/data/grootfs/store/unprivileged
//! log_level: info
//! create:
//!   with_clean: false
//! ```
//!
//! Only `store` is needed here; every other key is ignored. The same file is
//! passed through to `grootfs --config` when collecting container stats.
//!
//! ```no_run
//! use gsa_rs::GrootConfig;
//!
//! let config = GrootConfig::load("/var/vcap/jobs/garden/config/grootfs_config.yml")?;
//! println!("Store: {:?}", config.store);
//! # Ok::<(), gsa_rs::UsageError>(())
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, UsageError};

/// The subset of a grootfs config this tool consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct GrootConfig {
    /// Root directory of the grootfs store.
    pub store: PathBuf,
}

impl GrootConfig {
    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Read and parse the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::ConfigNotFound`] if the file does not exist,
    /// [`UsageError::ConfigRead`] if it cannot be read, and
    /// [`UsageError::ConfigParse`] if it is not a YAML mapping with a `store`
    /// key.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                UsageError::ConfigNotFound(path.to_path_buf())
            } else {
                UsageError::ConfigRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        Self::from_yaml(&content).map_err(|source| UsageError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml_reads_store() {
        let config = GrootConfig::from_yaml("store: /var/vcap/data/grootfs/store\n").unwrap();
        assert_eq!(config.store, PathBuf::from("/var/vcap/data/grootfs/store"));
    }

    #[test]
    fn test_from_yaml_ignores_other_keys() {
        let yaml = "log_level: debug\nstore: /tmp/store\ncreate:\n  with_clean: true\n";
        let config = GrootConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.store, PathBuf::from("/tmp/store"));
    }

    #[test]
    fn test_from_yaml_missing_store() {
        let err = GrootConfig::from_yaml("log_level: debug\n").unwrap_err();
        assert!(err.to_string().contains("store"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yml");
        assert!(matches!(
            GrootConfig::load(&path),
            Err(UsageError::ConfigNotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();

        let err = GrootConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, UsageError::ConfigRead { ref path, .. } if path == dir.path()));
        assert!(err.to_string().contains(&dir.path().display().to_string()));
    }

    #[test]
    fn test_load_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage-config.yml");
        std::fs::write(&path, "some-garbage").unwrap();

        let err = GrootConfig::load(&path).unwrap_err();
        assert!(matches!(err, UsageError::ConfigParse { .. }));
        assert!(err.to_string().contains("garbage-config.yml"));
    }
}
