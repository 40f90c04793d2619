//! Editing-session controller for a layout document.
//!
//! A [`Composer`] owns the single working copy of one owner's layout for the
//! duration of an editing session and serializes all mutations against it.
//! Construct one per session and drop it afterwards; there is no ambient
//! session state.

use crate::document::{BlockConfig, BlockId, LayoutDocument, ValidationError};
use crate::registry::{self, BlockKind};
use crate::storage::{LayoutStore, SaveReceipt, StoreError};
use crate::theme::Theme;
use log::{debug, warn};
use std::sync::Arc;
use thiserror::Error;

/// Where the session currently stands.
///
/// `load` drives `Uninitialized → Loading → Ready`; `commit` loops
/// `Ready → Saving → Ready`. A failed load parks the session in
/// `LoadFailed`, recoverable by calling `load` again. A failed save returns
/// to `Ready` with the working copy retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Loading,
    Ready,
    Saving,
    LoadFailed(StoreError),
}

/// Errors surfaced by composer operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComposerError {
    /// No working copy yet: `load` has not completed successfully.
    #[error("no layout is loaded")]
    NotLoaded,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The editing-session controller.
pub struct Composer<S: LayoutStore> {
    store: Arc<S>,
    owner_id: String,
    state: SessionState,
    document: Option<LayoutDocument>,
    /// Bumped on every applied mutation; lets a commit tell whether edits
    /// landed after its snapshot was taken.
    revision: u64,
    /// Revision covered by the last successful save.
    saved_revision: u64,
}

impl<S: LayoutStore> Composer<S> {
    /// Create a composer for one owner's editing session.
    pub fn new(store: Arc<S>, owner_id: impl Into<String>) -> Self {
        Self {
            store,
            owner_id: owner_id.into(),
            state: SessionState::Uninitialized,
            document: None,
            revision: 0,
            saved_revision: 0,
        }
    }

    /// The owner whose layout this session edits.
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The working copy, once loaded.
    pub fn document(&self) -> Option<&LayoutDocument> {
        self.document.as_ref()
    }

    /// Whether the working copy has edits not yet covered by a successful
    /// save.
    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    /// Load the owner's layout from the store.
    ///
    /// If none exists, synthesizes the default layout and persists it once
    /// before exposing the session as ready.
    pub async fn load(&mut self) -> Result<(), ComposerError> {
        self.state = SessionState::Loading;

        match self.store.load(&self.owner_id).await {
            Ok(doc) => {
                debug!("loaded layout for {} ({} blocks)", self.owner_id, doc.blocks.len());
                self.document = Some(normalize(doc));
                self.saved_revision = self.revision;
                self.state = SessionState::Ready;
                Ok(())
            }
            Err(StoreError::NotFound(_)) => {
                debug!("no layout for {}, bootstrapping default", self.owner_id);
                let doc = LayoutDocument::default_for_owner(&self.owner_id);
                match self.store.save(&doc).await {
                    Ok(receipt) => {
                        let mut doc = doc;
                        doc.updated_at = Some(receipt.updated_at);
                        self.document = Some(doc);
                        self.saved_revision = self.revision;
                        self.state = SessionState::Ready;
                        Ok(())
                    }
                    Err(e) => {
                        self.state = SessionState::LoadFailed(e.clone());
                        Err(e.into())
                    }
                }
            }
            Err(e) => {
                warn!("load failed for {}: {}", self.owner_id, e);
                self.state = SessionState::LoadFailed(e.clone());
                Err(e.into())
            }
        }
    }

    /// Apply one document-model operation to the working copy.
    /// A failed operation leaves the working copy untouched.
    fn apply(
        &mut self,
        op: impl FnOnce(&LayoutDocument) -> Result<LayoutDocument, ValidationError>,
    ) -> Result<(), ComposerError> {
        let doc = self.document.as_ref().ok_or(ComposerError::NotLoaded)?;
        let next = op(doc)?;
        self.document = Some(next);
        self.revision += 1;
        Ok(())
    }

    /// Append a new block with the given variant or the type's default.
    pub fn add_block(
        &mut self,
        kind: BlockKind,
        variant: Option<&str>,
    ) -> Result<(), ComposerError> {
        self.apply(|doc| doc.with_block_added(kind, variant))
    }

    /// Remove a block. The header block is rejected.
    pub fn remove_block(&mut self, id: BlockId) -> Result<(), ComposerError> {
        self.apply(|doc| doc.with_block_removed(id))
    }

    /// Replace the block order with a permutation of the current ids.
    pub fn reorder(&mut self, order: &[BlockId]) -> Result<(), ComposerError> {
        self.apply(|doc| doc.with_blocks_reordered(order))
    }

    /// Set a block's presentation variant.
    pub fn set_variant(&mut self, id: BlockId, variant: &str) -> Result<(), ComposerError> {
        self.apply(|doc| doc.with_variant_set(id, variant))
    }

    /// Replace a block's opaque config.
    pub fn set_config(&mut self, id: BlockId, config: BlockConfig) -> Result<(), ComposerError> {
        self.apply(|doc| doc.with_config_set(id, config))
    }

    /// Replace the page theme.
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), ComposerError> {
        self.apply(|doc| doc.with_theme_set(theme))
    }

    /// Persist the working copy as of this call.
    ///
    /// On store failure the working copy is retained unchanged, so the user
    /// can retry without re-entering edits. Mutations applied after the
    /// snapshot was taken stay pending and ride the next commit.
    pub async fn commit(&mut self) -> Result<SaveReceipt, ComposerError> {
        let snapshot = self.document.clone().ok_or(ComposerError::NotLoaded)?;

        // Defense in depth: mutations are validated on the way in, but never
        // hand the store a document that breaks an invariant.
        if let Err(errors) = snapshot.validate() {
            if let Some(first) = errors.into_iter().next() {
                return Err(first.into());
            }
        }

        let snapshot_revision = self.revision;
        self.state = SessionState::Saving;
        let result = self.store.save(&snapshot).await;
        self.state = SessionState::Ready;

        match result {
            Ok(receipt) => {
                if let Some(doc) = self.document.as_mut() {
                    doc.updated_at = Some(receipt.updated_at);
                }
                self.saved_revision = snapshot_revision;
                debug!("committed layout for {} at {}", self.owner_id, receipt.updated_at);
                Ok(receipt)
            }
            Err(e) => {
                warn!("commit failed for {}: {}", self.owner_id, e);
                Err(e.into())
            }
        }
    }
}

/// Replace variants that are no longer registered for their (known) type
/// with the type's default. Unknown types are left as-is for the renderer's
/// placeholder path.
fn normalize(mut doc: LayoutDocument) -> LayoutDocument {
    for block in &mut doc.blocks {
        if block.kind == BlockKind::Unknown || block.variant.is_empty() {
            continue;
        }
        if !registry::is_valid_variant(block.kind, &block.variant) {
            let default = registry::default_variant(block.kind).unwrap_or_default();
            warn!(
                "block {} has unregistered variant {:?} for {:?}, falling back to {:?}",
                block.id, block.variant, block.kind, default
            );
            block.variant = default.to_string();
        }
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Block;
    use crate::storage::testing::block_on;
    use crate::storage::{BoxFuture, MemoryStore, StoreResult};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Memory-backed store with save counting and failure injection.
    #[derive(Default)]
    struct TestStore {
        inner: MemoryStore,
        saves: AtomicUsize,
        fail_saves: AtomicBool,
    }

    impl TestStore {
        fn save_count(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }

        fn fail_next_saves(&self, fail: bool) {
            self.fail_saves.store(fail, Ordering::SeqCst);
        }
    }

    impl LayoutStore for TestStore {
        fn load(&self, owner_id: &str) -> BoxFuture<'_, StoreResult<LayoutDocument>> {
            self.inner.load(owner_id)
        }

        fn save(&self, document: &LayoutDocument) -> BoxFuture<'_, StoreResult<SaveReceipt>> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail_saves.load(Ordering::SeqCst) {
                return Box::pin(async { Err(StoreError::Io("simulated outage".to_string())) });
            }
            self.inner.save(document)
        }

        fn delete(&self, owner_id: &str) -> BoxFuture<'_, StoreResult<()>> {
            self.inner.delete(owner_id)
        }

        fn exists(&self, owner_id: &str) -> BoxFuture<'_, StoreResult<bool>> {
            self.inner.exists(owner_id)
        }
    }

    fn ready_composer() -> (Arc<TestStore>, Composer<TestStore>) {
        let store = Arc::new(TestStore::default());
        let mut composer = Composer::new(store.clone(), "owner-1");
        block_on(composer.load()).unwrap();
        (store, composer)
    }

    #[test]
    fn test_bootstrap_default_layout() {
        let (store, composer) = ready_composer();

        assert_eq!(composer.state(), &SessionState::Ready);
        let doc = composer.document().unwrap();
        assert!(doc.blocks[0].kind.is_header());
        assert_eq!(doc.blocks.len(), 5);
        assert_eq!(doc.theme, Theme::default());
        assert!(doc.updated_at.is_some());
        // Exactly one save call for the bootstrap.
        assert_eq!(store.save_count(), 1);
        assert!(!composer.is_dirty());
    }

    #[test]
    fn test_load_existing_layout() {
        let store = Arc::new(TestStore::default());
        let existing = LayoutDocument::default_for_owner("owner-1");
        block_on(store.inner.save(&existing)).unwrap();

        let mut composer = Composer::new(store.clone(), "owner-1");
        block_on(composer.load()).unwrap();

        // Found on record, so no bootstrap save.
        assert_eq!(store.save_count(), 0);
        assert_eq!(composer.document().unwrap().blocks.len(), 5);
    }

    #[test]
    fn test_mutations_require_load() {
        let store = Arc::new(TestStore::default());
        let mut composer = Composer::new(store, "owner-1");

        assert_eq!(
            composer.add_block(BlockKind::Gallery, None),
            Err(ComposerError::NotLoaded)
        );
        assert_eq!(composer.state(), &SessionState::Uninitialized);
    }

    #[test]
    fn test_failed_mutation_leaves_working_copy_unchanged() {
        let (_, mut composer) = ready_composer();
        let before = composer.document().unwrap().clone();

        let header_id = before.blocks[0].id;
        let err = composer.remove_block(header_id).unwrap_err();
        assert_eq!(
            err,
            ComposerError::Validation(ValidationError::HeaderNotRemovable)
        );
        assert_eq!(composer.document().unwrap(), &before);
        assert!(!composer.is_dirty());
    }

    #[test]
    fn test_edit_and_commit() {
        let (store, mut composer) = ready_composer();

        composer.add_block(BlockKind::Gallery, None).unwrap();
        assert!(composer.is_dirty());

        let receipt = block_on(composer.commit()).unwrap();
        assert_eq!(composer.state(), &SessionState::Ready);
        assert!(!composer.is_dirty());
        assert_eq!(
            composer.document().unwrap().updated_at,
            Some(receipt.updated_at)
        );

        let persisted = block_on(store.inner.load("owner-1")).unwrap();
        assert_eq!(persisted.blocks.len(), 6);
    }

    #[test]
    fn test_commit_failure_retains_edits() {
        let (store, mut composer) = ready_composer();

        // Three mutations, then a failing save.
        composer.add_block(BlockKind::Gallery, None).unwrap();
        composer.add_block(BlockKind::About, None).unwrap();
        let games_id = composer.document().unwrap().blocks[2].id;
        composer.set_variant(games_id, "shelf").unwrap();

        store.fail_next_saves(true);
        let err = block_on(composer.commit()).unwrap_err();
        assert!(matches!(err, ComposerError::Store(StoreError::Io(_))));

        // Back to Ready with all three edits still in the working copy.
        assert_eq!(composer.state(), &SessionState::Ready);
        assert!(composer.is_dirty());
        let doc = composer.document().unwrap();
        assert_eq!(doc.blocks.len(), 7);
        assert_eq!(doc.block(games_id).unwrap().variant, "shelf");

        // A retry against a healthy store persists everything.
        store.fail_next_saves(false);
        block_on(composer.commit()).unwrap();
        assert!(!composer.is_dirty());
        let persisted = block_on(store.inner.load("owner-1")).unwrap();
        assert_eq!(persisted.blocks.len(), 7);
        assert_eq!(persisted.block(games_id).unwrap().variant, "shelf");
    }

    #[test]
    fn test_bootstrap_save_failure_parks_session() {
        let store = Arc::new(TestStore::default());
        store.fail_next_saves(true);

        let mut composer = Composer::new(store.clone(), "owner-1");
        let err = block_on(composer.load()).unwrap_err();
        assert!(matches!(err, ComposerError::Store(_)));
        assert!(matches!(composer.state(), SessionState::LoadFailed(_)));

        // Retry once the store is healthy again.
        store.fail_next_saves(false);
        block_on(composer.load()).unwrap();
        assert_eq!(composer.state(), &SessionState::Ready);
    }

    #[test]
    fn test_load_normalizes_unregistered_variant() {
        let store = Arc::new(TestStore::default());
        let mut existing = LayoutDocument::default_for_owner("owner-1");
        existing.blocks[2].variant = "retired-mode".to_string();
        block_on(store.inner.save(&existing)).unwrap();

        let mut composer = Composer::new(store, "owner-1");
        block_on(composer.load()).unwrap();

        let doc = composer.document().unwrap();
        assert_eq!(doc.blocks[2].variant, "showcase");
    }

    #[test]
    fn test_load_keeps_unknown_kind_blocks() {
        let store = Arc::new(TestStore::default());
        let mut existing = LayoutDocument::default_for_owner("owner-1");
        existing.blocks.push(Block {
            kind: BlockKind::Unknown,
            variant: "wall".to_string(),
            ..Block::new(BlockKind::Custom)
        });
        block_on(store.inner.save(&existing)).unwrap();

        let mut composer = Composer::new(store, "owner-1");
        block_on(composer.load()).unwrap();

        let doc = composer.document().unwrap();
        let unknown = doc.blocks.last().unwrap();
        assert_eq!(unknown.kind, BlockKind::Unknown);
        // Variant preserved for the placeholder path, and still deletable.
        assert_eq!(unknown.variant, "wall");
        let unknown_id = unknown.id;
        composer.remove_block(unknown_id).unwrap();
    }

    #[test]
    fn test_partial_theme_layout_commits() {
        use crate::theme::ThemeColors;

        // A persisted theme with most slots unset must not wedge the
        // session: the layout loads, edits apply, and commit succeeds.
        let store = Arc::new(TestStore::default());
        let mut existing = LayoutDocument::default_for_owner("owner-1");
        existing.theme = Theme {
            name: "custom".to_string(),
            colors: ThemeColors {
                accent: "#ff00aa".to_string(),
                ..ThemeColors::default()
            },
        };
        block_on(store.inner.save(&existing)).unwrap();

        let mut composer = Composer::new(store.clone(), "owner-1");
        block_on(composer.load()).unwrap();
        composer.add_block(BlockKind::Gallery, None).unwrap();
        block_on(composer.commit()).unwrap();

        let persisted = block_on(store.inner.load("owner-1")).unwrap();
        assert_eq!(persisted.blocks.len(), 6);
        assert_eq!(persisted.theme.colors.accent, "#ff00aa");
        assert!(persisted.theme.colors.text.is_empty());
    }

    #[test]
    fn test_set_theme_and_config() {
        let (_, mut composer) = ready_composer();

        composer.set_theme(Theme::preset("midnight").unwrap()).unwrap();
        assert_eq!(composer.document().unwrap().theme.name, "midnight");

        let about_id = {
            composer.add_block(BlockKind::About, None).unwrap();
            composer.document().unwrap().blocks.last().unwrap().id
        };
        let mut config = BlockConfig::new();
        config.insert("text".to_string(), "hello".into());
        composer.set_config(about_id, config).unwrap();
        assert_eq!(
            composer.document().unwrap().block(about_id).unwrap().config["text"],
            "hello"
        );
    }
}
