//! The in-memory pending-CRC set (`§3`, `§9`).

use std::{collections::HashSet, path::PathBuf};

/// Absolute file paths currently uploaded but not yet CRC-confirmed.
///
/// Owned exclusively by the dispatcher's single thread; no synchronization
/// is needed (`§5`).
#[derive(Debug, Default)]
pub struct PendingCrcSet {
    paths: HashSet<PathBuf>,
}

impl PendingCrcSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `path` is currently awaiting CRC confirmation.
    #[must_use]
    pub fn contains(&self, path: &PathBuf) -> bool {
        self.paths.contains(path)
    }

    /// Mark `path` as awaiting CRC confirmation. Idempotent.
    pub fn insert(&mut self, path: PathBuf) {
        self.paths.insert(path);
    }

    /// Stop tracking `path`, on confirmation (1104) or abort (1106).
    pub fn remove(&mut self, path: &PathBuf) {
        self.paths.remove(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_contains() {
        let mut set = PendingCrcSet::new();
        let path = PathBuf::from("/srv/vaultwire/abc/file.txt");
        assert!(!set.contains(&path));
        set.insert(path.clone());
        assert!(set.contains(&path));
    }

    #[test]
    fn remove_clears_membership() {
        let mut set = PendingCrcSet::new();
        let path = PathBuf::from("/srv/vaultwire/abc/file.txt");
        set.insert(path.clone());
        set.remove(&path);
        assert!(!set.contains(&path));
    }

    #[test]
    fn reinserting_same_path_is_idempotent() {
        let mut set = PendingCrcSet::new();
        let path = PathBuf::from("/srv/vaultwire/abc/file.txt");
        set.insert(path.clone());
        set.insert(path.clone());
        assert!(set.contains(&path));
        set.remove(&path);
        assert!(!set.contains(&path));
    }
}
