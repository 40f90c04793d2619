//! Color themes and the renderer-facing token set.
//!
//! A [`Theme`] is the persisted color bundle on a layout; a [`TokenSet`] is
//! its resolved form handed to block renderers, so renderers only ever branch
//! on token values, never on the theme name.

use serde::{Deserialize, Serialize};

/// Sentinel theme name for hand-edited color sets.
pub const CUSTOM_THEME_NAME: &str = "custom";

/// Names of the shipped presets, in picker order.
pub const PRESET_NAMES: &[&str] = &["slate", "midnight", "sunset", "meadow"];

/// The fixed record of named color slots carried by a theme.
///
/// Each slot holds a `#rrggbb` string. Slots default to empty so partially
/// populated persisted themes still deserialize; resolution fills the gaps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThemeColors {
    /// Top of the page background gradient.
    #[serde(default)]
    pub background_start: String,
    /// Bottom of the page background gradient.
    #[serde(default)]
    pub background_end: String,
    #[serde(default)]
    pub accent: String,
    #[serde(default)]
    pub accent_secondary: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub text_secondary: String,
    #[serde(default)]
    pub card_background: String,
    #[serde(default)]
    pub card_border: String,
}

impl ThemeColors {
    /// All slots as `(slot name, value)` pairs, in declaration order.
    pub fn slots(&self) -> [(&'static str, &str); 8] {
        [
            ("background_start", &self.background_start),
            ("background_end", &self.background_end),
            ("accent", &self.accent),
            ("accent_secondary", &self.accent_secondary),
            ("text", &self.text),
            ("text_secondary", &self.text_secondary),
            ("card_background", &self.card_background),
            ("card_border", &self.card_border),
        ]
    }
}

/// A named bundle of color tokens for one layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Preset identifier, or [`CUSTOM_THEME_NAME`].
    pub name: String,
    /// Color slot values.
    pub colors: ThemeColors,
}

impl Default for Theme {
    fn default() -> Self {
        // Slate is the out-of-the-box look.
        Self::slate()
    }
}

impl Theme {
    fn slate() -> Self {
        Self {
            name: "slate".to_string(),
            colors: ThemeColors {
                background_start: "#0f172a".to_string(),
                background_end: "#1e293b".to_string(),
                accent: "#38bdf8".to_string(),
                accent_secondary: "#818cf8".to_string(),
                text: "#f1f5f9".to_string(),
                text_secondary: "#94a3b8".to_string(),
                card_background: "#1e293b".to_string(),
                card_border: "#334155".to_string(),
            },
        }
    }

    fn midnight() -> Self {
        Self {
            name: "midnight".to_string(),
            colors: ThemeColors {
                background_start: "#030712".to_string(),
                background_end: "#111827".to_string(),
                accent: "#a78bfa".to_string(),
                accent_secondary: "#f472b6".to_string(),
                text: "#f9fafb".to_string(),
                text_secondary: "#9ca3af".to_string(),
                card_background: "#111827".to_string(),
                card_border: "#1f2937".to_string(),
            },
        }
    }

    fn sunset() -> Self {
        Self {
            name: "sunset".to_string(),
            colors: ThemeColors {
                background_start: "#431407".to_string(),
                background_end: "#7c2d12".to_string(),
                accent: "#fb923c".to_string(),
                accent_secondary: "#fbbf24".to_string(),
                text: "#fff7ed".to_string(),
                text_secondary: "#fdba74".to_string(),
                card_background: "#7c2d12".to_string(),
                card_border: "#9a3412".to_string(),
            },
        }
    }

    fn meadow() -> Self {
        Self {
            name: "meadow".to_string(),
            colors: ThemeColors {
                background_start: "#052e16".to_string(),
                background_end: "#14532d".to_string(),
                accent: "#4ade80".to_string(),
                accent_secondary: "#a3e635".to_string(),
                text: "#f0fdf4".to_string(),
                text_secondary: "#86efac".to_string(),
                card_background: "#14532d".to_string(),
                card_border: "#166534".to_string(),
            },
        }
    }

    /// Look up a shipped preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "slate" => Some(Self::slate()),
            "midnight" => Some(Self::midnight()),
            "sunset" => Some(Self::sunset()),
            "meadow" => Some(Self::meadow()),
            _ => None,
        }
    }

    /// A copy of this theme renamed to the custom sentinel, for hand edits.
    pub fn into_custom(mut self) -> Self {
        self.name = CUSTOM_THEME_NAME.to_string();
        self
    }
}

/// Check that a color value is a syntactically valid `#rrggbb` string.
///
/// No semantic validation (contrast etc.) happens here; that is a product
/// concern, not an engine concern.
pub fn is_valid_hex(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Resolved color value (RGB8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` string.
    pub fn from_hex(value: &str) -> Option<Self> {
        if !is_valid_hex(value) {
            return None;
        }
        let hex = &value[1..];
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Format as a `#rrggbb` string.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The fixed set of resolved color tokens consumed by every block renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Page background gradient, top to bottom.
    pub background: (Rgb, Rgb),
    pub accent: Rgb,
    pub accent_secondary: Rgb,
    pub text: Rgb,
    pub text_secondary: Rgb,
    pub card_background: Rgb,
    pub card_border: Rgb,
}

// Fallback tokens, kept in sync with Theme::slate().
const FALLBACK_BACKGROUND_START: Rgb = Rgb::new(0x0f, 0x17, 0x2a);
const FALLBACK_BACKGROUND_END: Rgb = Rgb::new(0x1e, 0x29, 0x3b);
const FALLBACK_ACCENT: Rgb = Rgb::new(0x38, 0xbd, 0xf8);
const FALLBACK_ACCENT_SECONDARY: Rgb = Rgb::new(0x81, 0x8c, 0xf8);
const FALLBACK_TEXT: Rgb = Rgb::new(0xf1, 0xf5, 0xf9);
const FALLBACK_TEXT_SECONDARY: Rgb = Rgb::new(0x94, 0xa3, 0xb8);
const FALLBACK_CARD_BACKGROUND: Rgb = Rgb::new(0x1e, 0x29, 0x3b);
const FALLBACK_CARD_BORDER: Rgb = Rgb::new(0x33, 0x41, 0x55);

fn slot(value: &str, fallback: Rgb) -> Rgb {
    Rgb::from_hex(value).unwrap_or(fallback)
}

/// Resolve a theme into renderer tokens.
///
/// Total: a missing or malformed slot falls back to the corresponding
/// default slot, so every token is always defined.
pub fn resolve(theme: &Theme) -> TokenSet {
    let colors = &theme.colors;
    TokenSet {
        background: (
            slot(&colors.background_start, FALLBACK_BACKGROUND_START),
            slot(&colors.background_end, FALLBACK_BACKGROUND_END),
        ),
        accent: slot(&colors.accent, FALLBACK_ACCENT),
        accent_secondary: slot(&colors.accent_secondary, FALLBACK_ACCENT_SECONDARY),
        text: slot(&colors.text, FALLBACK_TEXT),
        text_secondary: slot(&colors.text_secondary, FALLBACK_TEXT_SECONDARY),
        card_background: slot(&colors.card_background, FALLBACK_CARD_BACKGROUND),
        card_border: slot(&colors.card_border, FALLBACK_CARD_BORDER),
    }
}
