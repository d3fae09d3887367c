//! File-backed metadata store of resolved and installed components.
//!
//! A single JSON document under the SDK home, written atomically via a
//! temp file. A mutex serializes mutation; readers get clones.

use crate::error::Result;
use sdk_core::{Component, MvnArtifact};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    #[serde(default)]
    resolved: Vec<Component>,
    #[serde(default)]
    installed: Vec<Component>,
}

pub struct MetadataStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl MetadataStore {
    /// Opens (or initializes) the store file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.is_file() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            StoreState::default()
        };
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, state: &StoreState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(state)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "metadata store written");
        Ok(())
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> Result<T> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let out = f(&mut state);
        self.persist(&state)?;
        Ok(out)
    }

    /// Records a component as resolved, replacing any previous entry with
    /// the same coordinates.
    pub fn save_resolved(&self, component: &Component) -> Result<()> {
        self.with_state(|state| {
            state
                .resolved
                .retain(|c| c.coordinates() != component.coordinates());
            state.resolved.push(component.clone());
        })
    }

    /// Records a component as installed (uploaded to a target).
    pub fn save_installed(&self, component: &Component) -> Result<()> {
        self.with_state(|state| {
            state
                .installed
                .retain(|c| c.coordinates() != component.coordinates());
            state.installed.push(component.clone());
        })
    }

    /// Drops a component from both sets. Returns false when it was in
    /// neither.
    pub fn remove(&self, coordinates: &str) -> Result<bool> {
        self.with_state(|state| {
            let before = state.resolved.len() + state.installed.len();
            state.resolved.retain(|c| !c.matches(coordinates));
            state.installed.retain(|c| !c.matches(coordinates));
            before != state.resolved.len() + state.installed.len()
        })
    }

    pub fn find_resolved(&self, coordinates: &str) -> Option<Component> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state
            .resolved
            .iter()
            .find(|c| c.matches(coordinates))
            .cloned()
    }

    pub fn find_installed(&self, coordinates: &str) -> Option<Component> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state
            .installed
            .iter()
            .find(|c| c.matches(coordinates))
            .cloned()
    }

    pub fn list_resolved(&self) -> Vec<Component> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.resolved.clone()
    }

    pub fn list_installed(&self) -> Vec<Component> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.installed.clone()
    }

    /// Whether an artifact is also owned by a resolved component other
    /// than `except`. Guards removal of shared dependencies.
    pub fn is_shared(&self, artifact: &MvnArtifact, except: &str) -> bool {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state
            .resolved
            .iter()
            .filter(|c| c.coordinates() != except)
            .any(|c| c.owns_artifact(artifact))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdk_core::ComponentKind;

    fn component(artifact_id: &str, version: &str) -> Component {
        Component::new(ComponentKind::Addon, "com.example", artifact_id, version)
    }

    fn store(tmp: &tempfile::TempDir) -> MetadataStore {
        MetadataStore::open(tmp.path().join("sdk-metadata.json")).unwrap()
    }

    #[test]
    fn test_save_and_reload() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let store = store(&tmp);
            store.save_resolved(&component("addon-a", "1.0")).unwrap();
            store.save_installed(&component("addon-a", "1.0")).unwrap();
        }
        // Fresh handle reads the persisted file.
        let store = store(&tmp);
        assert_eq!(store.list_resolved().len(), 1);
        assert_eq!(store.list_installed().len(), 1);
        assert!(store.find_resolved("com.example:addon-a:1.0").is_some());
    }

    #[test]
    fn test_save_replaces_same_coordinates() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(&tmp);
        let mut c = component("addon-a", "1.0");
        store.save_resolved(&c).unwrap();
        c.artifacts.push(MvnArtifact::new("org.dep", "x", "2.0"));
        store.save_resolved(&c).unwrap();

        let all = store.list_resolved();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].artifacts.len(), 1);
    }

    #[test]
    fn test_find_by_unversioned_coordinates() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(&tmp);
        store.save_resolved(&component("addon-a", "1.0")).unwrap();
        assert!(store.find_resolved("com.example:addon-a").is_some());
        assert!(store.find_resolved("com.example:other").is_none());
    }

    #[test]
    fn test_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(&tmp);
        store.save_resolved(&component("addon-a", "1.0")).unwrap();
        store.save_installed(&component("addon-a", "1.0")).unwrap();

        assert!(store.remove("com.example:addon-a:1.0").unwrap());
        assert!(store.list_resolved().is_empty());
        assert!(store.list_installed().is_empty());
        assert!(!store.remove("com.example:addon-a:1.0").unwrap());
    }

    #[test]
    fn test_is_shared() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(&tmp);
        let shared_dep = MvnArtifact::new("org.slf4j", "slf4j-api", "1.7.36");

        let mut a = component("addon-a", "1.0");
        a.artifacts.push(shared_dep.clone());
        let mut b = component("addon-b", "2.0");
        b.artifacts.push(shared_dep.clone());
        store.save_resolved(&a).unwrap();
        store.save_resolved(&b).unwrap();

        assert!(store.is_shared(&shared_dep, "com.example:addon-a:1.0"));

        store.remove("com.example:addon-b:2.0").unwrap();
        assert!(!store.is_shared(&shared_dep, "com.example:addon-a:1.0"));
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("sdk-metadata.json");
        fs::write(&path, "{not json").unwrap();
        assert!(MetadataStore::open(&path).is_err());
    }
}
