//! Read-only access to the grootfs store layout.
//!
//! This module provides [`Store`], which turns the on-disk layout into plain
//! listings and records. It carries no business logic; reconciling the
//! listings is done in [`crate::resolve`] and [`crate::usage`].
//!
//! # Store Structure
//!
//! ```text
//! <store>/
//! ├── images/
//! │   └── <container-id>/          # One directory per container
//! └── meta/
//!     ├── volume-<sha>             # {"Size": <bytes>} per volume
//!     └── dependencies/
//!         └── image:<container-id>.json   # ["<sha>", ...]
//! ```
//!
//! All file access goes through a cap-std [`Dir`] handle on the store root,
//! so nothing outside the store can be reached through a crafted entry name.

use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde::Deserialize;
use std::path::Path;

use crate::error::{Result, UsageError};

/// Directory holding one subdirectory per container.
pub const IMAGES_DIR: &str = "images";

/// Directory holding volume metadata records.
pub const META_DIR: &str = "meta";

/// Directory (under [`META_DIR`]) holding per-container dependency manifests.
pub const DEPENDENCIES_DIR: &str = "dependencies";

/// Metadata record stored for each volume.
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeMeta {
    /// Volume size in bytes.
    #[serde(rename = "Size")]
    pub size: u64,
}

/// Name of the dependency manifest grootfs writes for a container.
pub fn manifest_name(container_id: &str) -> String {
    format!("image:{}.json", container_id)
}

/// Handle on a grootfs store root.
#[derive(Debug)]
pub struct Store {
    root_dir: Dir,
}

impl Store {
    /// Open the store at `root`.
    ///
    /// No layout validation happens here: a store missing `images/` can still
    /// report layer usage, and vice versa.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::StoreNotFound`] if `root` does not exist.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root_path = root.as_ref();
        let root_dir = Dir::open_ambient_dir(root_path, ambient_authority()).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                UsageError::StoreNotFound(root_path.to_path_buf())
            } else {
                UsageError::Io(e)
            }
        })?;

        Ok(Self { root_dir })
    }

    /// List container identifiers (directory names under `images/`).
    pub fn list_containers(&self) -> Result<Vec<String>> {
        let images_dir = open_subdir(&self.root_dir, IMAGES_DIR)?;
        list_entries(&images_dir, EntryKind::Dir)
    }

    /// List volume identifiers (file names under `meta/`).
    ///
    /// The `dependencies` directory and any other subdirectory are skipped.
    pub fn list_volumes(&self) -> Result<Vec<String>> {
        let meta_dir = open_subdir(&self.root_dir, META_DIR)?;
        list_entries(&meta_dir, EntryKind::File)
    }

    /// List dependency manifest file names under `meta/dependencies/`.
    pub fn list_dependency_manifests(&self) -> Result<Vec<String>> {
        let deps_dir = self.dependencies_dir()?;
        list_entries(&deps_dir, EntryKind::File)
    }

    /// Read the size recorded for a volume.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::VolumeNotFound`] if there is no record for
    /// `volume_id` and [`UsageError::Parse`] if the record lacks a numeric
    /// `Size`.
    pub fn read_volume_size(&self, volume_id: &str) -> Result<u64> {
        let meta_dir = open_subdir(&self.root_dir, META_DIR)?;
        let data = meta_dir.read(volume_id).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                UsageError::VolumeNotFound(volume_id.to_string())
            } else {
                UsageError::Io(e)
            }
        })?;

        let meta: VolumeMeta =
            serde_json::from_slice(&data).map_err(|source| UsageError::Parse {
                path: format!("{}/{}", META_DIR, volume_id),
                source,
            })?;
        Ok(meta.size)
    }

    /// Read the short volume references a container depends on.
    ///
    /// The returned strings are not yet full volume keys; see
    /// [`crate::resolve::volume_key`].
    pub fn read_dependency_manifest(&self, container_id: &str) -> Result<Vec<String>> {
        self.read_manifest_file(&manifest_name(container_id))
    }

    /// Read a dependency manifest by its file name.
    pub fn read_manifest_file(&self, name: &str) -> Result<Vec<String>> {
        let deps_dir = self.dependencies_dir()?;
        let data = deps_dir.read(name).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                UsageError::ManifestNotFound(name.to_string())
            } else {
                UsageError::Io(e)
            }
        })?;

        serde_json::from_slice(&data).map_err(|source| UsageError::Parse {
            path: format!("{}/{}/{}", META_DIR, DEPENDENCIES_DIR, name),
            source,
        })
    }

    /// Read every dependency manifest in the store, one list per file.
    pub fn read_all_manifests(&self) -> Result<Vec<Vec<String>>> {
        self.list_dependency_manifests()?
            .iter()
            .map(|name| self.read_manifest_file(name))
            .collect()
    }

    fn dependencies_dir(&self) -> Result<Dir> {
        open_subdir(
            &self.root_dir,
            &format!("{}/{}", META_DIR, DEPENDENCIES_DIR),
        )
    }
}

/// Open a directory of the store layout, reporting a missing one by name.
fn open_subdir(root: &Dir, path: &str) -> Result<Dir> {
    root.open_dir(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            UsageError::InvalidStore(format!("missing {}", path))
        } else {
            UsageError::Io(e)
        }
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
}

/// Collect entry names of one kind, sorted.
fn list_entries(dir: &Dir, kind: EntryKind) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in dir.entries()? {
        let entry = entry?;
        let is_dir = entry.file_type()?.is_dir();
        if is_dir != (kind == EntryKind::Dir) {
            continue;
        }

        let name = entry.file_name().into_string().map_err(|name| {
            UsageError::InvalidStore(format!("non UTF-8 entry name: {:?}", name))
        })?;
        names.push(name);
    }

    names.sort();
    Ok(names)
}
