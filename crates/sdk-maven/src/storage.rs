//! Local artifact storage mirroring the Maven repository layout.
//!
//! Everything the sdk resolves lands here (`<sdk home>/maven/`) before it
//! is pushed anywhere; the store doubles as the download cache.

use crate::error::Result;
use crate::layout;
use sdk_core::{Classifier, MvnArtifact};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding all variants of the artifact.
    pub fn artifact_dir(&self, artifact: &MvnArtifact) -> PathBuf {
        self.root.join(layout::artifact_dir(
            &artifact.group_id,
            &artifact.artifact_id,
            &artifact.version,
        ))
    }

    pub fn file_path(&self, artifact: &MvnArtifact, classifier: &Classifier) -> PathBuf {
        self.artifact_dir(artifact).join(artifact.file_name(classifier))
    }

    pub fn contains(&self, artifact: &MvnArtifact, classifier: &Classifier) -> bool {
        self.file_path(artifact, classifier).is_file()
    }

    /// Path to a stored variant, if present.
    pub fn get(&self, artifact: &MvnArtifact, classifier: &Classifier) -> Option<PathBuf> {
        let path = self.file_path(artifact, classifier);
        path.is_file().then_some(path)
    }

    pub fn read(&self, artifact: &MvnArtifact, classifier: &Classifier) -> Result<Option<Vec<u8>>> {
        match self.get(artifact, classifier) {
            Some(path) => Ok(Some(fs::read(path)?)),
            None => Ok(None),
        }
    }

    /// Stores variant data, creating directories as needed.
    pub fn put(
        &self,
        artifact: &MvnArtifact,
        classifier: &Classifier,
        data: &[u8],
    ) -> Result<PathBuf> {
        let dir = self.artifact_dir(artifact);
        fs::create_dir_all(&dir)?;
        let path = dir.join(artifact.file_name(classifier));
        fs::write(&path, data)?;
        Ok(path)
    }

    /// Removes every stored variant of the artifact (the whole version
    /// directory), cleaning up parent directories left empty. Returns
    /// false when nothing was stored.
    pub fn remove_artifact(&self, artifact: &MvnArtifact) -> Result<bool> {
        let dir = self.artifact_dir(artifact);
        if !dir.is_dir() {
            return Ok(false);
        }
        fs::remove_dir_all(&dir)?;

        let mut parent = dir.parent().map(Path::to_path_buf);
        while let Some(p) = parent {
            if p == self.root || !is_empty_dir(&p) {
                break;
            }
            fs::remove_dir(&p)?;
            parent = p.parent().map(Path::to_path_buf);
        }
        Ok(true)
    }

    /// Deletes the entire storage tree.
    pub fn clear(&self) -> Result<()> {
        if self.root.is_dir() {
            fs::remove_dir_all(&self.root)?;
        }
        Ok(())
    }

    /// Total size in bytes of everything stored.
    pub fn size(&self) -> u64 {
        dir_size(&self.root)
    }
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

fn dir_size(path: &Path) -> u64 {
    let mut total = 0u64;
    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            if let Ok(meta) = entry.metadata() {
                if meta.is_dir() {
                    total += dir_size(&entry.path());
                } else {
                    total += meta.len();
                }
            }
        }
    }
    total
}
