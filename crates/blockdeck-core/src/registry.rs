//! Static catalog of block types and their presentation variants.
//!
//! The registry is read-only at runtime: adding a type or variant is a
//! deployment-time edit of the table below, never a runtime operation.

use serde::{Deserialize, Serialize};

/// The fixed category of a block. Immutable after the block is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Header,
    Friends,
    Games,
    Achievements,
    Accounts,
    About,
    Stream,
    Roster,
    Gallery,
    MusicTracks,
    Custom,
    /// A type present in persisted data that is no longer registered.
    ///
    /// Deserializes without error so the page still loads; the renderer
    /// shows a generic placeholder and the block stays deletable.
    #[serde(other)]
    Unknown,
}

impl BlockKind {
    /// Check if this is the pinned header kind.
    pub fn is_header(self) -> bool {
        matches!(self, Self::Header)
    }
}

/// A presentation variant registered for a block type.
#[derive(Debug, Clone, Copy)]
pub struct VariantInfo {
    /// Stable variant identifier, stored on blocks.
    pub id: &'static str,
    /// Human-readable name for pickers.
    pub display_name: &'static str,
    /// Short description of the presentation mode.
    pub description: &'static str,
}

/// Registry entry describing one block type.
#[derive(Debug, Clone, Copy)]
pub struct BlockType {
    /// The type this entry describes.
    pub kind: BlockKind,
    /// Human-readable name for pickers.
    pub display_name: &'static str,
    /// Short description of what the block shows.
    pub description: &'static str,
    /// Variants in picker order.
    pub variants: &'static [VariantInfo],
    /// Variant assumed when a block carries none.
    pub default_variant: &'static str,
}

const fn variant(id: &'static str, display_name: &'static str, description: &'static str) -> VariantInfo {
    VariantInfo { id, display_name, description }
}

/// All registered block types, in picker order.
pub const BLOCK_TYPES: &[BlockType] = &[
    BlockType {
        kind: BlockKind::Header,
        display_name: "Header",
        description: "Identity banner with avatar, name and status",
        variants: &[
            variant("banner", "Banner", "Full-width banner with avatar overlay"),
            variant("compact", "Compact", "Single row with small avatar"),
            variant("minimal", "Minimal", "Name and status only"),
        ],
        default_variant: "banner",
    },
    BlockType {
        kind: BlockKind::Friends,
        display_name: "Friends",
        description: "Friend list pulled from the social graph",
        variants: &[
            variant("grid", "Grid", "Avatar grid"),
            variant("list", "List", "Rows with name and presence"),
            variant("count", "Count", "Friend count badge only"),
        ],
        default_variant: "grid",
    },
    BlockType {
        kind: BlockKind::Games,
        display_name: "Games",
        description: "Game library highlights",
        variants: &[
            variant("showcase", "Showcase", "Large cover art for a few picks"),
            variant("shelf", "Shelf", "Horizontal cover shelf"),
            variant("list", "List", "Compact rows with playtime"),
        ],
        default_variant: "showcase",
    },
    BlockType {
        kind: BlockKind::Achievements,
        display_name: "Achievements",
        description: "Earned achievements and completion stats",
        variants: &[
            variant("highlights", "Highlights", "Rarest achievements with art"),
            variant("grid", "Grid", "Icon grid"),
            variant("progress", "Progress", "Completion bars per game"),
        ],
        default_variant: "highlights",
    },
    BlockType {
        kind: BlockKind::Accounts,
        display_name: "Connected accounts",
        description: "Linked third-party accounts",
        variants: &[
            variant("badges", "Badges", "Icon badges in a row"),
            variant("list", "List", "Rows with handle per service"),
        ],
        default_variant: "badges",
    },
    BlockType {
        kind: BlockKind::About,
        display_name: "About",
        description: "Free-form text about the owner",
        variants: &[
            variant("card", "Card", "Text on a card background"),
            variant("plain", "Plain", "Borderless text"),
        ],
        default_variant: "card",
    },
    BlockType {
        kind: BlockKind::Stream,
        display_name: "Stream",
        description: "Live stream embed or offline status",
        variants: &[
            variant("player", "Player", "Embedded player"),
            variant("status", "Status", "Live/offline indicator with link"),
        ],
        default_variant: "player",
    },
    BlockType {
        kind: BlockKind::Roster,
        display_name: "Roster",
        description: "Team or clan roster",
        variants: &[
            variant("cards", "Cards", "Member cards with roles"),
            variant("table", "Table", "Dense member table"),
        ],
        default_variant: "cards",
    },
    BlockType {
        kind: BlockKind::Gallery,
        display_name: "Gallery",
        description: "Image and clip gallery",
        variants: &[
            variant("masonry", "Masonry", "Variable-height columns"),
            variant("carousel", "Carousel", "One item at a time with arrows"),
            variant("grid", "Grid", "Uniform thumbnail grid"),
        ],
        default_variant: "masonry",
    },
    BlockType {
        kind: BlockKind::MusicTracks,
        display_name: "Music tracks",
        description: "Pinned tracks from a linked music service",
        variants: &[
            variant("player", "Player", "Inline players per track"),
            variant("list", "List", "Track titles only"),
        ],
        default_variant: "player",
    },
    BlockType {
        kind: BlockKind::Custom,
        display_name: "Custom",
        description: "Owner-defined content panel",
        variants: &[
            variant("panel", "Panel", "Single configurable panel"),
        ],
        default_variant: "panel",
    },
];

/// Get all registered block types.
pub fn all() -> &'static [BlockType] {
    BLOCK_TYPES
}

/// Look up the registry entry for a kind.
///
/// Returns `None` for [`BlockKind::Unknown`] or any kind missing from the
/// table; callers degrade softly instead of failing hard.
pub fn get(kind: BlockKind) -> Option<&'static BlockType> {
    BLOCK_TYPES.iter().find(|t| t.kind == kind)
}

/// Check whether `variant` is registered for `kind`.
pub fn is_valid_variant(kind: BlockKind, variant: &str) -> bool {
    get(kind)
        .map(|t| t.variants.iter().any(|v| v.id == variant))
        .unwrap_or(false)
}

/// Get the default variant for a kind, if the kind is registered.
pub fn default_variant(kind: BlockKind) -> Option<&'static str> {
    get(kind).map(|t| t.default_variant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_variants() {
        for block_type in all() {
            assert!(
                !block_type.variants.is_empty(),
                "{:?} has no variants",
                block_type.kind
            );
        }
    }

    #[test]
    fn test_default_variant_is_registered() {
        for block_type in all() {
            assert!(
                is_valid_variant(block_type.kind, block_type.default_variant),
                "{:?} default variant {:?} missing from its variant list",
                block_type.kind,
                block_type.default_variant
            );
        }
    }

    #[test]
    fn test_lookup() {
        let games = get(BlockKind::Games).unwrap();
        assert_eq!(games.display_name, "Games");
        assert!(is_valid_variant(BlockKind::Games, "shelf"));
        assert!(!is_valid_variant(BlockKind::Games, "masonry"));
    }

    #[test]
    fn test_unknown_kind_has_no_entry() {
        assert!(get(BlockKind::Unknown).is_none());
        assert!(!is_valid_variant(BlockKind::Unknown, "panel"));
        assert_eq!(default_variant(BlockKind::Unknown), None);
    }

    #[test]
    fn test_kind_serde_kebab_case() {
        let json = serde_json::to_string(&BlockKind::MusicTracks).unwrap();
        assert_eq!(json, "\"music-tracks\"");

        let kind: BlockKind = serde_json::from_str("\"friends\"").unwrap();
        assert_eq!(kind, BlockKind::Friends);
    }

    #[test]
    fn test_retired_kind_deserializes_as_unknown() {
        let kind: BlockKind = serde_json::from_str("\"guestbook\"").unwrap();
        assert_eq!(kind, BlockKind::Unknown);
    }
}
