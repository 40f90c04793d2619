//! Layout store abstraction for persistence.
//!
//! The engine only ever talks to the [`LayoutStore`] trait; which backend
//! sits behind it (memory, files, a hosted document store) is a deployment
//! choice the engine never learns about.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::document::LayoutDocument;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Store errors.
///
/// Clonable so the composer can retain the last failure in its session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no layout on record for owner {0}")]
    NotFound(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("store error: {0}")]
    Other(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future for async store operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Acknowledgement returned by a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    /// Epoch milliseconds at which the store accepted the document.
    pub updated_at: u64,
}

/// Trait for layout persistence backends, keyed by owner id.
pub trait LayoutStore: Send + Sync {
    /// Load the layout for an owner. `StoreError::NotFound` when none exists.
    fn load(&self, owner_id: &str) -> BoxFuture<'_, StoreResult<LayoutDocument>>;

    /// Persist a layout under its owner id, stamping `updated_at`.
    fn save(&self, document: &LayoutDocument) -> BoxFuture<'_, StoreResult<SaveReceipt>>;

    /// Delete the layout for an owner. Removing a layout that does not exist
    /// is not an error.
    fn delete(&self, owner_id: &str) -> BoxFuture<'_, StoreResult<()>>;

    /// Check whether a layout exists for an owner.
    fn exists(&self, owner_id: &str) -> BoxFuture<'_, StoreResult<bool>>;
}

/// Current time as epoch milliseconds, for save receipts.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
