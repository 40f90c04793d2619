//! File-backed store implementation.
//!
//! Stores one JSON file per owner under a base directory. Useful for local
//! development and self-hosted deployments; hosted deployments put a real
//! document store behind [`LayoutStore`] instead.

use super::{now_millis, BoxFuture, LayoutStore, SaveReceipt, StoreError, StoreResult};
use crate::document::LayoutDocument;
use std::fs;
use std::path::PathBuf;

/// File-backed layout store.
pub struct FileStore {
    /// Base directory for layout files.
    base_path: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `base_path`, creating the directory if
    /// needed.
    pub fn new(base_path: PathBuf) -> StoreResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StoreError::Io(format!("failed to create store directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Get the file path for an owner id.
    ///
    /// The id is escaped rather than stripped so distinct ids never share a
    /// file: ASCII alphanumerics and `-` pass through, every other byte
    /// (including `_`, the escape character) becomes `_xx` hex.
    fn layout_path(&self, owner_id: &str) -> PathBuf {
        let mut safe_id = String::with_capacity(owner_id.len());
        for byte in owner_id.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                safe_id.push(byte as char);
            } else {
                safe_id.push_str(&format!("_{:02x}", byte));
            }
        }
        self.base_path.join(format!("{}.json", safe_id))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

impl LayoutStore for FileStore {
    fn load(&self, owner_id: &str) -> BoxFuture<'_, StoreResult<LayoutDocument>> {
        let path = self.layout_path(owner_id);
        let owner_id = owner_id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StoreError::NotFound(owner_id));
            }

            let json = fs::read_to_string(&path).map_err(|e| {
                StoreError::Io(format!("failed to read {}: {}", path.display(), e))
            })?;

            LayoutDocument::from_json(&json).map_err(|e| {
                StoreError::Serialization(format!("failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn save(&self, document: &LayoutDocument) -> BoxFuture<'_, StoreResult<SaveReceipt>> {
        let path = self.layout_path(&document.owner_id);
        let mut document = document.clone();

        Box::pin(async move {
            let updated_at = now_millis();
            document.updated_at = Some(updated_at);

            let json = document
                .to_json()
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            fs::write(&path, json).map_err(|e| {
                StoreError::Io(format!("failed to write {}: {}", path.display(), e))
            })?;
            Ok(SaveReceipt { updated_at })
        })
    }

    fn delete(&self, owner_id: &str) -> BoxFuture<'_, StoreResult<()>> {
        let path = self.layout_path(owner_id);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StoreError::Io(format!("failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn exists(&self, owner_id: &str) -> BoxFuture<'_, StoreResult<bool>> {
        let path = self.layout_path(owner_id);
        Box::pin(async move { Ok(path.exists()) })
    }
}
