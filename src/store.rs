use std::path::{Path, PathBuf};

use bornle_engine::cache::SessionStore;
use walkdir::WalkDir;

/// File-per-key store: the terminal stand-in for the browser's
/// `sessionStorage`. Lives in the system temp directory by default, so it
/// is cleared along with it.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirStore { root: root.into() }
    }

    pub fn default_root() -> PathBuf {
        std::env::temp_dir().join("bornle")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl SessionStore for DirStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        std::fs::create_dir_all(&self.root).map_err(|e| format!("cannot create {}: {e}", self.root.display()))?;
        let path = self.path(key);
        std::fs::write(&path, value).map_err(|e| format!("cannot write {}: {e}", path.display()))
    }

    fn keys(&self) -> Vec<String> {
        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let name = e.file_name().to_str()?;
                name.strip_suffix(".json").map(str::to_string)
            })
            .collect()
    }

    fn remove(&mut self, key: &str) {
        let path = self.path(key);
        if let Err(e) = std::fs::remove_file(&path) {
            tracing::debug!(path = %path.display(), error = %e, "cache entry not removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> DirStore {
        let root = std::env::temp_dir().join(format!("bornle-store-test-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        DirStore::new(root)
    }

    #[test]
    fn test_set_get_keys_remove() {
        let mut store = scratch("basic");
        assert_eq!(store.get("people_v5"), None);
        assert!(store.keys().is_empty());

        store.set("people_v5", "[]").unwrap();
        store.set("people_v4", "[]").unwrap();
        assert_eq!(store.get("people_v5").as_deref(), Some("[]"));

        let mut keys = store.keys();
        keys.sort();
        assert_eq!(keys, vec!["people_v4", "people_v5"]);

        store.remove("people_v4");
        store.remove("never_written");
        assert_eq!(store.keys(), vec!["people_v5"]);
        let _ = std::fs::remove_dir_all(store.root());
    }
}
