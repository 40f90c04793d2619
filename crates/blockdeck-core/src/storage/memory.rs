//! In-memory store implementation.

use super::{now_millis, BoxFuture, LayoutStore, SaveReceipt, StoreError, StoreResult};
use crate::document::LayoutDocument;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStore {
    layouts: RwLock<HashMap<String, LayoutDocument>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayoutStore for MemoryStore {
    fn load(&self, owner_id: &str) -> BoxFuture<'_, StoreResult<LayoutDocument>> {
        let owner_id = owner_id.to_string();
        Box::pin(async move {
            let layouts = self
                .layouts
                .read()
                .map_err(|e| StoreError::Other(format!("lock error: {}", e)))?;
            layouts
                .get(&owner_id)
                .cloned()
                .ok_or(StoreError::NotFound(owner_id))
        })
    }

    fn save(&self, document: &LayoutDocument) -> BoxFuture<'_, StoreResult<SaveReceipt>> {
        let mut document = document.clone();
        Box::pin(async move {
            let updated_at = now_millis();
            document.updated_at = Some(updated_at);

            let mut layouts = self
                .layouts
                .write()
                .map_err(|e| StoreError::Other(format!("lock error: {}", e)))?;
            layouts.insert(document.owner_id.clone(), document);
            Ok(SaveReceipt { updated_at })
        })
    }

    fn delete(&self, owner_id: &str) -> BoxFuture<'_, StoreResult<()>> {
        let owner_id = owner_id.to_string();
        Box::pin(async move {
            let mut layouts = self
                .layouts
                .write()
                .map_err(|e| StoreError::Other(format!("lock error: {}", e)))?;
            layouts.remove(&owner_id);
            Ok(())
        })
    }

    fn exists(&self, owner_id: &str) -> BoxFuture<'_, StoreResult<bool>> {
        let owner_id = owner_id.to_string();
        Box::pin(async move {
            let layouts = self
                .layouts
                .read()
                .map_err(|e| StoreError::Other(format!("lock error: {}", e)))?;
            Ok(layouts.contains_key(&owner_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::block_on;

    #[test]
    fn test_save_and_load() {
        let store = MemoryStore::new();
        let doc = LayoutDocument::default_for_owner("owner-1");

        let receipt = block_on(store.save(&doc)).unwrap();
        let loaded = block_on(store.load("owner-1")).unwrap();

        assert_eq!(loaded.blocks.len(), doc.blocks.len());
        assert_eq!(loaded.updated_at, Some(receipt.updated_at));
    }

    #[test]
    fn test_not_found() {
        let store = MemoryStore::new();
        let result = block_on(store.load("nobody"));

        assert_eq!(result, Err(StoreError::NotFound("nobody".to_string())));
    }

    #[test]
    fn test_exists() {
        let store = MemoryStore::new();
        let doc = LayoutDocument::default_for_owner("owner-1");

        assert!(!block_on(store.exists("owner-1")).unwrap());
        block_on(store.save(&doc)).unwrap();
        assert!(block_on(store.exists("owner-1")).unwrap());
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        let doc = LayoutDocument::default_for_owner("owner-1");

        block_on(store.save(&doc)).unwrap();
        block_on(store.delete("owner-1")).unwrap();
        assert!(!block_on(store.exists("owner-1")).unwrap());

        // Deleting again is not an error.
        block_on(store.delete("owner-1")).unwrap();
    }
}
