//! Blockdeck Core Library
//!
//! Platform-agnostic composition engine for block-based profile pages:
//! the block type registry, the layout document model and its validation
//! rules, the editing-session composer, the drag-reorder state machine,
//! the theme resolver, and the persistence boundary.
//!
//! Rendering, routing, authentication, and the social/catalog integrations
//! live outside this crate; they consume committed layout documents and
//! resolved theme tokens but never mutate them.

pub mod composer;
pub mod document;
pub mod drag;
pub mod registry;
pub mod storage;
pub mod theme;

pub use composer::{Composer, ComposerError, SessionState};
pub use document::{Block, BlockConfig, BlockId, LayoutDocument, ValidationError};
pub use drag::{DragController, DragState, DropOutcome};
pub use registry::{BlockKind, BlockType, VariantInfo};
pub use storage::{
    BoxFuture, FileStore, LayoutStore, MemoryStore, SaveReceipt, StoreError, StoreResult,
};
pub use theme::{resolve, Rgb, Theme, ThemeColors, TokenSet};
