//! Generation options read from the settings document.
//!
//! [`GenerationOptions`] is a flat record with `snake_case` keys. Every key
//! except `app_name` has a default, so a minimal document is:
//!
//! ```json
//! { "app_name": "My Site" }
//! ```
//!
//! Colors deserialize through [`HexColor`] and are rejected at parse time when
//! they are not `#rrggbb`. [`GenerationOptions::validate`] re-checks the
//! remaining constraints before the pipeline starts.

use serde::{Deserialize, Deserializer, Serialize};

use crate::color::HexColor;
use crate::error::ValidationError;

/// Largest padding percentage accepted on any edge.
pub const MAX_PADDING: u8 = 40;

/// Longest allowed `app_short_name`, and the prefix length used to derive it.
pub const SHORT_NAME_LEN: usize = 12;

// ============================================================================
// Enumerations
// ============================================================================

/// How the vector favicon adapts to `prefers-color-scheme: dark`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DarkModeStyle {
    #[default]
    Invert,
    Lighten,
    Custom,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum TextFont {
    #[default]
    SystemUi,
    SansSerif,
    Serif,
    Monospace,
}

impl TextFont {
    /// The CSS `font-family` stack for this font choice.
    pub fn font_family(self) -> &'static str {
        match self {
            Self::SansSerif => {
                r#"ui-sans-serif, system-ui, -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif"#
            }
            Self::Serif => r#"ui-serif, Georgia, Cambria, "Times New Roman", Times, serif"#,
            Self::Monospace => "ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, monospace",
            Self::SystemUi => {
                r#"system-ui, -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif"#
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum TextWeight {
    Normal,
    Medium,
    #[default]
    Bold,
}

impl TextWeight {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Medium => "medium",
            Self::Bold => "bold",
        }
    }
}

// ============================================================================
// GenerationOptions
// ============================================================================

/// Options for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub theme_color: HexColor,
    pub background_color: HexColor,

    /// Application name written to the manifest. Required.
    pub app_name: String,
    /// At most 12 characters; derived from `app_name` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_short_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_description: Option<String>,

    pub dark_mode_style: DarkModeStyle,
    /// Target color for [`DarkModeStyle::Custom`].
    pub dark_mode_color: HexColor,

    pub use_custom_icon_color: bool,
    pub icon_color: HexColor,
    pub dark_mode_icon_color: HexColor,

    /// Margin on each edge in percent, clamped to `0..=40`.
    #[serde(deserialize_with = "deserialize_padding")]
    pub icon_padding: u8,

    pub png_transparent: bool,
    pub png_background: HexColor,
    pub png_dark_background: HexColor,

    pub text_font: TextFont,
    pub text_weight: TextWeight,
    pub text_color: HexColor,
    /// Falls back to `theme_color` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_background_color: Option<HexColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_dark_color: Option<HexColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_dark_background_color: Option<HexColor>,
}

/// Accepts any integer and clamps it into `0..=MAX_PADDING`.
fn deserialize_padding<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, i64::from(MAX_PADDING)) as u8)
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            theme_color: HexColor::new(0x4f, 0x46, 0xe5),
            background_color: HexColor::WHITE,
            app_name: String::new(),
            app_short_name: None,
            app_description: None,
            dark_mode_style: DarkModeStyle::default(),
            dark_mode_color: HexColor::WHITE,
            use_custom_icon_color: false,
            icon_color: HexColor::BLACK,
            dark_mode_icon_color: HexColor::WHITE,
            icon_padding: 0,
            png_transparent: true,
            png_background: HexColor::WHITE,
            png_dark_background: HexColor::new(0x1a, 0x1a, 0x1a),
            text_font: TextFont::default(),
            text_weight: TextWeight::default(),
            text_color: HexColor::WHITE,
            text_background_color: None,
            text_dark_color: None,
            text_dark_background_color: None,
        }
    }
}

impl GenerationOptions {
    /// Creates default options for the given application name.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Self::default()
        }
    }

    /// Checks the constraints that cannot be expressed in the types.
    ///
    /// Color fields are already validated by [`HexColor`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.app_name.trim().is_empty() {
            return Err(ValidationError::MissingAppName);
        }
        if let Some(short) = &self.app_short_name {
            let len = short.chars().count();
            if len > SHORT_NAME_LEN {
                return Err(ValidationError::ShortNameTooLong { len });
            }
        }
        Ok(())
    }

    /// The padding percentage, clamped to the supported range.
    pub fn padding(&self) -> u8 {
        self.icon_padding.min(MAX_PADDING)
    }

    /// The explicit short name, or the first 12 characters of `app_name`.
    pub fn short_name(&self) -> String {
        match &self.app_short_name {
            Some(short) if !short.is_empty() => short.clone(),
            _ => self.app_name.chars().take(SHORT_NAME_LEN).collect(),
        }
    }

    /// The description, treating an empty string as absent.
    pub fn description(&self) -> Option<&str> {
        self.app_description.as_deref().filter(|d| !d.is_empty())
    }

    /// The color substituted for `currentColor` and black fills when rasterizing.
    pub fn resolved_icon_color(&self) -> HexColor {
        if self.use_custom_icon_color {
            self.icon_color
        } else {
            HexColor::BLACK
        }
    }

    pub fn text_background(&self) -> HexColor {
        self.text_background_color.unwrap_or(self.theme_color)
    }

    pub fn text_dark_background(&self) -> HexColor {
        self.text_dark_background_color
            .unwrap_or_else(|| self.text_background())
    }

    pub fn text_dark(&self) -> HexColor {
        self.text_dark_color.unwrap_or(self.text_color)
    }

    // ---- Builder helpers ----

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.app_short_name = Some(short_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.app_description = Some(description.into());
        self
    }

    pub fn with_padding(mut self, percent: u8) -> Self {
        self.icon_padding = percent.min(MAX_PADDING);
        self
    }

    pub fn with_dark_mode(mut self, style: DarkModeStyle, color: HexColor) -> Self {
        self.dark_mode_style = style;
        self.dark_mode_color = color;
        self
    }

    pub fn with_background(mut self, light: HexColor, dark: HexColor) -> Self {
        self.png_transparent = false;
        self.png_background = light;
        self.png_dark_background = dark;
        self
    }

    pub fn with_icon_colors(mut self, light: HexColor, dark: HexColor) -> Self {
        self.use_custom_icon_color = true;
        self.icon_color = light;
        self.dark_mode_icon_color = dark;
        self
    }

    /// Serializes the options to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes options from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================
