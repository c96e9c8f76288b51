//! JSON file-based document storage
//!
//! Documents are written to a temporary sibling and renamed into place, so a
//! reader never observes a partially written document. Every relative path is
//! validated component by component; anything that could escape the root
//! fails closed with `PathViolation`.

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("path escapes storage root: {path}")]
    PathViolation { path: String },
}

/// Root-scoped JSON document store
#[derive(Clone)]
pub struct DocStore {
    root: PathBuf,
}

impl DocStore {
    /// Open a store rooted at the given directory, creating it if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Open a temporary store for testing
    pub fn open_temp() -> Result<Self, StorageError> {
        let dir = std::env::temp_dir().join(format!("cg-test-{}", uuid::Uuid::new_v4()));
        Self::open(dir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a document durably; readers see either the old or new version
    pub fn write<T: Serialize>(&self, rel: impl AsRef<Path>, doc: &T) -> Result<(), StorageError> {
        let path = self.resolve(rel.as_ref())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(doc)?;
        let tmp = tmp_sibling(&path);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Read a document; a missing file is `None`, not an error
    pub fn read<T: DeserializeOwned>(
        &self,
        rel: impl AsRef<Path>,
    ) -> Result<Option<T>, StorageError> {
        let path = self.resolve(rel.as_ref())?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Check whether a document exists
    pub fn exists(&self, rel: impl AsRef<Path>) -> Result<bool, StorageError> {
        Ok(self.resolve(rel.as_ref())?.exists())
    }

    /// Copy an external file into the store, creating parent directories
    pub fn copy_in(
        &self,
        rel: impl AsRef<Path>,
        source: &Path,
    ) -> Result<PathBuf, StorageError> {
        let dest = self.resolve(rel.as_ref())?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, &dest)?;
        Ok(dest)
    }

    /// Remove a directory subtree under the root, if present
    pub fn remove_dir(&self, rel: impl AsRef<Path>) -> Result<(), StorageError> {
        let path = self.resolve(rel.as_ref())?;
        if path.exists() {
            fs::remove_dir_all(&path)?;
        }
        Ok(())
    }

    /// Resolve a relative document path, rejecting anything that could
    /// escape the root
    fn resolve(&self, rel: &Path) -> Result<PathBuf, StorageError> {
        let violation = || StorageError::PathViolation {
            path: rel.display().to_string(),
        };
        if rel.as_os_str().is_empty() {
            return Err(violation());
        }
        for component in rel.components() {
            match component {
                Component::Normal(_) => {}
                _ => return Err(violation()),
            }
        }
        Ok(self.root.join(rel))
    }
}

/// Temporary sibling path used for atomic writes
fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
