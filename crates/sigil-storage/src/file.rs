//! File-backed storage.
//!
//! Each storage path maps to one file below the root directory, with `/`
//! separating directories. Writes go to a hidden temporary file that is then
//! renamed over the target, so readers never observe a partial value.

use crate::error::{StorageError, StorageResult};
use crate::Storage;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Storage rooted at a directory on the local filesystem.
pub struct FileStorage {
    root: PathBuf,
    tmp_counter: AtomicU64,
}

impl FileStorage {
    /// Create a file storage rooted at `root`, creating the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)
            .map_err(|e| StorageError::io(&root.display().to_string(), e))?;
        Ok(Self {
            root,
            tmp_counter: AtomicU64::new(0),
        })
    }

    fn resolve(&self, path: &str) -> StorageResult<PathBuf> {
        if path.is_empty() {
            return Err(StorageError::invalid_path(path, "path is empty"));
        }

        let mut resolved = self.root.clone();
        for segment in path.split('/') {
            check_segment(path, segment)?;
            resolved.push(segment);
        }
        Ok(resolved)
    }

    fn resolve_dir(&self, prefix: &str) -> StorageResult<PathBuf> {
        let trimmed = prefix.trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(self.root.clone());
        }
        self.resolve(trimmed)
    }
}

fn check_segment(path: &str, segment: &str) -> StorageResult<()> {
    if segment.is_empty() {
        return Err(StorageError::invalid_path(path, "empty path segment"));
    }
    if segment.starts_with('.') {
        return Err(StorageError::invalid_path(
            path,
            "path segments must not start with '.'",
        ));
    }
    if segment.contains(['\\', '\0', ':']) {
        return Err(StorageError::invalid_path(
            path,
            "path segments must not contain '\\', ':' or NUL",
        ));
    }
    Ok(())
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, path: &str) -> StorageResult<Option<Vec<u8>>> {
        let file = self.resolve(path)?;
        match tokio::fs::read(&file).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    async fn put(&self, path: &str, value: Vec<u8>) -> StorageResult<()> {
        let file = self.resolve(path)?;
        let parent = file
            .parent()
            .ok_or_else(|| StorageError::invalid_path(path, "path has no parent"))?;
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StorageError::io(path, e))?;

        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StorageError::invalid_path(path, "path has no file name"))?;
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let tmp = parent.join(format!(".{}.{}.{}.tmp", name, std::process::id(), n));

        tokio::fs::write(&tmp, &value)
            .await
            .map_err(|e| StorageError::io(path, e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &file).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StorageError::io(path, e));
        }

        tracing::trace!(path, bytes = value.len(), "stored value");
        Ok(())
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        let file = self.resolve(path)?;
        match tokio::fs::remove_file(&file).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let dir = self.resolve_dir(prefix)?;
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(prefix, e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io(prefix, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| StorageError::io(prefix, e))?;
            if !file_type.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !name.starts_with('.') {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_roundtrip_and_overwrite() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        assert_eq!(storage.get("secret/r1/s1").await.unwrap(), None);
        storage.put("secret/r1/s1", b"first".to_vec()).await.unwrap();
        storage.put("secret/r1/s1", b"second".to_vec()).await.unwrap();
        assert_eq!(
            storage.get("secret/r1/s1").await.unwrap(),
            Some(b"second".to_vec())
        );

        // No temporary files are left behind.
        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("secret/r1"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        for bad in ["../etc/passwd", "role/../../x", "role//a", "", "role/.hidden", "a\\b"] {
            let err = storage.put(bad, vec![]).await.unwrap_err();
            assert!(
                matches!(err, StorageError::InvalidPath { .. }),
                "expected InvalidPath for {bad:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        storage.put("key/b", vec![]).await.unwrap();
        storage.put("key/a", vec![]).await.unwrap();
        assert_eq!(storage.list("key/").await.unwrap(), vec!["a", "b"]);
        assert!(storage.list("role/").await.unwrap().is_empty());

        storage.delete("key/a").await.unwrap();
        storage.delete("key/a").await.unwrap();
        assert_eq!(storage.list("key/").await.unwrap(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_persists_across_instances() {
        let dir = tempdir().unwrap();
        FileStorage::new(dir.path())
            .unwrap()
            .put("salt", vec![7; 32])
            .await
            .unwrap();

        let reopened = FileStorage::new(dir.path()).unwrap();
        assert_eq!(reopened.get("salt").await.unwrap(), Some(vec![7; 32]));
    }
}
