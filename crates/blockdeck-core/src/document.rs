//! Layout document model and validation.
//!
//! All editing operations are pure `with_*` functions: they take the document
//! by reference and either return a new document or an error, never a
//! partially mutated state. Invariants enforced here:
//!
//! - block ids are unique within a document
//! - exactly one header block exists and it is pinned to position 0
//! - a block's variant is registered for its type (or empty, meaning the
//!   type's default)
//! - every populated theme color slot is a syntactically valid hex color
//!   (empty slots mean unset; the resolver fills them from the default
//!   theme)

use crate::registry::{self, BlockKind};
use crate::theme::{self, Theme};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

/// Stable block identity, used as the reorder key.
pub type BlockId = Uuid;

/// Opaque per-block configuration, interpreted only by the renderer.
pub type BlockConfig = Map<String, Value>;

/// A violated document invariant.
///
/// Returned as a value, never panicked: invalid mutations are an expected
/// outcome of user interaction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("block type is not registered")]
    UnknownType,
    #[error("variant {variant:?} is not registered for {kind:?}")]
    UnknownVariant { kind: BlockKind, variant: String },
    #[error("no block with id {0}")]
    UnknownBlock(BlockId),
    #[error("duplicate block id {0}")]
    DuplicateId(BlockId),
    #[error("layout has no header block")]
    MissingHeader,
    #[error("layout has more than one header block")]
    DuplicateHeader,
    #[error("header block must stay at position 0")]
    HeaderNotFirst,
    #[error("the header block cannot be removed")]
    HeaderNotRemovable,
    #[error("new order is not a permutation of the current block ids")]
    NotAPermutation,
    #[error("color slot {slot} holds invalid value {value:?}")]
    InvalidColor { slot: &'static str, value: String },
}

/// One content module placed on a profile layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Unique id, stable for the lifetime of the block.
    pub id: BlockId,
    /// Fixed category; immutable after creation.
    pub kind: BlockKind,
    /// Presentation variant. Empty means the type's default.
    #[serde(default)]
    pub variant: String,
    /// Opaque renderer configuration.
    #[serde(default)]
    pub config: BlockConfig,
}

impl Block {
    /// Create a block of the given kind with a fresh id, the type's default
    /// variant and empty config.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            variant: registry::default_variant(kind).unwrap_or_default().to_string(),
            config: BlockConfig::new(),
        }
    }

    /// The variant to render: the stored one, or the type's default when the
    /// stored value is empty.
    pub fn effective_variant(&self) -> &str {
        if self.variant.is_empty() {
            registry::default_variant(self.kind).unwrap_or_default()
        } else {
            &self.variant
        }
    }
}

/// The full editable unit for one profile: ordered blocks plus a theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Opaque reference to the external profile identity. Never dereferenced
    /// by the engine.
    pub owner_id: String,
    /// Blocks in display order. Position 0 is always the header.
    pub blocks: Vec<Block>,
    /// Page color theme.
    pub theme: Theme,
    /// Epoch milliseconds of the last successful save, set by the store.
    /// Display/debug only; not used for conflict detection.
    #[serde(default)]
    pub updated_at: Option<u64>,
}

impl LayoutDocument {
    /// Synthesize the starter layout for an owner with nothing on record:
    /// header plus a small fixed set of blocks, default theme.
    pub fn default_for_owner(owner_id: &str) -> Self {
        let blocks = [
            BlockKind::Header,
            BlockKind::Friends,
            BlockKind::Games,
            BlockKind::Achievements,
            BlockKind::Accounts,
        ]
        .into_iter()
        .map(Block::new)
        .collect();

        Self {
            owner_id: owner_id.to_string(),
            blocks,
            theme: Theme::default(),
            updated_at: None,
        }
    }

    /// Get a block by id.
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Get a block's position in the sequence.
    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    /// Block ids in display order.
    pub fn block_ids(&self) -> Vec<BlockId> {
        self.blocks.iter().map(|b| b.id).collect()
    }

    /// Check every document invariant, collecting all violations.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let mut seen = HashSet::new();
        for block in &self.blocks {
            if !seen.insert(block.id) {
                errors.push(ValidationError::DuplicateId(block.id));
            }
        }

        let header_positions: Vec<usize> = self
            .blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.kind.is_header())
            .map(|(i, _)| i)
            .collect();
        match header_positions.as_slice() {
            [] => errors.push(ValidationError::MissingHeader),
            [0] => {}
            [_] => errors.push(ValidationError::HeaderNotFirst),
            _ => errors.push(ValidationError::DuplicateHeader),
        }

        for block in &self.blocks {
            // Unknown kinds are tolerated: the renderer shows a placeholder
            // and the user can delete the block.
            if block.kind == BlockKind::Unknown || block.variant.is_empty() {
                continue;
            }
            if !registry::is_valid_variant(block.kind, &block.variant) {
                errors.push(ValidationError::UnknownVariant {
                    kind: block.kind,
                    variant: block.variant.clone(),
                });
            }
        }

        for (slot, value) in self.theme.colors.slots() {
            // Empty means unset, filled by the resolver.
            if !value.is_empty() && !theme::is_valid_hex(value) {
                errors.push(ValidationError::InvalidColor {
                    slot,
                    value: value.to_string(),
                });
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Append a new block of `kind`, with the given variant or the type's
    /// default.
    pub fn with_block_added(
        &self,
        kind: BlockKind,
        variant: Option<&str>,
    ) -> Result<Self, ValidationError> {
        // Every valid document already carries its one header.
        if kind.is_header() {
            return Err(ValidationError::DuplicateHeader);
        }
        let Some(block_type) = registry::get(kind) else {
            return Err(ValidationError::UnknownType);
        };
        let variant = match variant {
            Some(v) => {
                if !registry::is_valid_variant(kind, v) {
                    return Err(ValidationError::UnknownVariant {
                        kind,
                        variant: v.to_string(),
                    });
                }
                v.to_string()
            }
            None => block_type.default_variant.to_string(),
        };

        let mut next = self.clone();
        next.blocks.push(Block {
            id: Uuid::new_v4(),
            kind,
            variant,
            config: BlockConfig::new(),
        });
        Ok(next)
    }

    /// Remove the block with `id`. The header block cannot be removed.
    pub fn with_block_removed(&self, id: BlockId) -> Result<Self, ValidationError> {
        let Some(block) = self.block(id) else {
            return Err(ValidationError::UnknownBlock(id));
        };
        if block.kind.is_header() {
            return Err(ValidationError::HeaderNotRemovable);
        }

        let mut next = self.clone();
        next.blocks.retain(|b| b.id != id);
        Ok(next)
    }

    /// Replace the block order with `order`, which must be a permutation of
    /// the current ids that keeps the header at position 0.
    pub fn with_blocks_reordered(&self, order: &[BlockId]) -> Result<Self, ValidationError> {
        if order.len() != self.blocks.len() {
            return Err(ValidationError::NotAPermutation);
        }
        let mut seen = HashSet::new();
        let mut reordered = Vec::with_capacity(order.len());
        for &id in order {
            if !seen.insert(id) {
                return Err(ValidationError::NotAPermutation);
            }
            let Some(block) = self.block(id) else {
                return Err(ValidationError::NotAPermutation);
            };
            reordered.push(block.clone());
        }
        if reordered.first().is_none_or(|b| !b.kind.is_header()) {
            return Err(ValidationError::HeaderNotFirst);
        }

        let mut next = self.clone();
        next.blocks = reordered;
        Ok(next)
    }

    /// Set the variant of the block with `id`.
    pub fn with_variant_set(&self, id: BlockId, variant: &str) -> Result<Self, ValidationError> {
        let Some(position) = self.position(id) else {
            return Err(ValidationError::UnknownBlock(id));
        };
        let kind = self.blocks[position].kind;
        if !registry::is_valid_variant(kind, variant) {
            return Err(ValidationError::UnknownVariant {
                kind,
                variant: variant.to_string(),
            });
        }

        let mut next = self.clone();
        next.blocks[position].variant = variant.to_string();
        Ok(next)
    }

    /// Replace the opaque config of the block with `id`. The engine does not
    /// interpret config contents.
    pub fn with_config_set(&self, id: BlockId, config: BlockConfig) -> Result<Self, ValidationError> {
        let Some(position) = self.position(id) else {
            return Err(ValidationError::UnknownBlock(id));
        };

        let mut next = self.clone();
        next.blocks[position].config = config;
        Ok(next)
    }

    /// Replace the theme. Every populated color slot must be valid hex;
    /// empty slots mean unset and resolve to the default theme's values.
    pub fn with_theme_set(&self, theme: Theme) -> Result<Self, ValidationError> {
        for (slot, value) in theme.colors.slots() {
            if !value.is_empty() && !theme::is_valid_hex(value) {
                return Err(ValidationError::InvalidColor {
                    slot,
                    value: value.to_string(),
                });
            }
        }

        let mut next = self.clone();
        next.theme = theme;
        Ok(next)
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
