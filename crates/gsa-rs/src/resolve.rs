//! Reconciliation of stored volumes against container references.
//!
//! Dependency manifests list short volume references; metadata records are
//! keyed by the full volume name. [`volume_key`] is the one place that
//! mapping lives.

use std::collections::HashSet;

/// Prefix grootfs puts in front of a short reference to name the volume.
pub const VOLUME_PREFIX: &str = "volume-";

/// Map a short reference from a dependency manifest to its volume key.
pub fn volume_key(short: &str) -> String {
    format!("{}{}", VOLUME_PREFIX, short)
}

/// Volumes of a store split by whether any container references them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeSets {
    /// Referenced volume keys, unique, in first-seen order.
    pub active: Vec<String>,
    /// Stored volumes no manifest references.
    pub inactive: Vec<String>,
}

/// Split `volumes` into active and inactive sets.
///
/// `manifests` holds one list of short references per container. A volume
/// referenced several times is active once. Active keys are taken from the
/// manifests, not from `volumes`, so a reference to a volume that has no
/// metadata record stays in the active set and fails when its size is read.
pub fn resolve<M, S>(volumes: &[String], manifests: M) -> VolumeSets
where
    M: IntoIterator,
    M::Item: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut active = Vec::new();

    for reference in manifests.into_iter().flatten() {
        let key = volume_key(reference.as_ref());
        if seen.insert(key.clone()) {
            active.push(key);
        }
    }

    let inactive = volumes
        .iter()
        .filter(|v| !seen.contains(v.as_str()))
        .cloned()
        .collect();

    VolumeSets { active, inactive }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_volume_key() {
        assert_eq!(volume_key("one-volume"), "volume-one-volume");
        assert_eq!(volume_key(""), "volume-");
        assert_eq!(volume_key("sha256:abc123"), "volume-sha256:abc123");
    }

    #[test]
    fn test_resolve_no_manifests() {
        let volumes = strings(&["volume-a", "volume-b"]);
        let sets = resolve(&volumes, Vec::<Vec<String>>::new());
        assert!(sets.active.is_empty());
        assert_eq!(sets.inactive, volumes);
    }

    #[test]
    fn test_resolve_dedups_shared_reference() {
        let volumes = strings(&["volume-one-volume", "volume-two-volume"]);
        let manifests = vec![strings(&["one-volume"]), strings(&["one-volume"])];

        let sets = resolve(&volumes, manifests);
        assert_eq!(sets.active, ["volume-one-volume"]);
        assert_eq!(sets.inactive, ["volume-two-volume"]);
    }

    #[test]
    fn test_resolve_unions_all_manifests() {
        let volumes = strings(&["volume-a", "volume-b", "volume-c", "volume-d"]);
        let manifests = vec![strings(&["c", "a"]), strings(&["a", "b", "c"])];

        let sets = resolve(&volumes, manifests);
        assert_eq!(sets.active, ["volume-c", "volume-a", "volume-b"]);
        assert_eq!(sets.inactive, ["volume-d"]);
    }

    #[test]
    fn test_resolve_keeps_dangling_reference() {
        let volumes = strings(&["volume-a"]);
        let sets = resolve(&volumes, vec![vec!["ghost"]]);
        assert_eq!(sets.active, ["volume-ghost"]);
        assert_eq!(sets.inactive, ["volume-a"]);
    }

    #[test]
    fn test_resolve_exact_identity() {
        let volumes = strings(&["volume-ABC", "volume-abc"]);
        let sets = resolve(&volumes, vec![vec!["abc"]]);
        assert_eq!(sets.active, ["volume-abc"]);
        assert_eq!(sets.inactive, ["volume-ABC"]);
    }
}
