//! Source descriptors: where the icon comes from.

use std::path::Path;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::ValidationError;

/// Longest text accepted for [`SourceDescriptor::Text`], in characters.
pub const MAX_TEXT_CHARS: usize = 4;

/// The input a generation run starts from.
///
/// Serializes as `{ "type": "emoji", "value": "🦆" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum SourceDescriptor {
    /// A local file path, or a logical asset path resolved by an
    /// [`AssetResolver`](crate::fetch::AssetResolver).
    AssetPath(String),
    /// An `http://` or `https://` URL.
    RemoteUrl(String),
    /// A single emoji grapheme cluster.
    Emoji(String),
    /// Up to four characters rendered as a text glyph.
    Text(String),
}

impl SourceDescriptor {
    /// Builds a descriptor from a path or URL string.
    pub fn from_location(location: impl Into<String>) -> Self {
        let location = location.into();
        if is_url(&location) {
            Self::RemoteUrl(location)
        } else {
            Self::AssetPath(location)
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::AssetPath(s) | Self::RemoteUrl(s) | Self::Emoji(s) | Self::Text(s)
                if s.trim().is_empty() =>
            {
                Err(ValidationError::EmptySource)
            }
            Self::Text(text) => {
                let len = text.chars().count();
                if len > MAX_TEXT_CHARS {
                    Err(ValidationError::TextTooLong { len })
                } else {
                    Ok(())
                }
            }
            Self::Emoji(emoji) => {
                let clusters = emoji.graphemes(true).count();
                if clusters != 1 {
                    Err(ValidationError::InvalidEmoji { clusters })
                } else {
                    Ok(())
                }
            }
            Self::AssetPath(_) | Self::RemoteUrl(_) => Ok(()),
        }
    }

    /// Returns `true` when the path or URL names an `.svg` file.
    pub fn has_svg_extension(&self) -> bool {
        match self {
            Self::AssetPath(location) | Self::RemoteUrl(location) => {
                extension(location).is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
            }
            Self::Emoji(_) | Self::Text(_) => false,
        }
    }

    /// The path, URL, or glyph string, for diagnostics.
    pub fn as_str(&self) -> &str {
        match self {
            Self::AssetPath(s) | Self::RemoteUrl(s) | Self::Emoji(s) | Self::Text(s) => s,
        }
    }
}

pub(crate) fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// The file extension of a path or URL, ignoring any query or fragment.
pub(crate) fn extension(location: &str) -> Option<&str> {
    let path = location
        .split(['?', '#'])
        .next()
        .unwrap_or(location);
    Path::new(path).extension().and_then(|ext| ext.to_str())
}

/// MIME type of raster source bytes: by extension first, then by content,
/// falling back to `image/png`.
pub fn mime_type_for(location: &str, bytes: &[u8]) -> &'static str {
    let by_extension = extension(location).and_then(|ext| {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some("image/png"),
            "jpg" | "jpeg" => Some("image/jpeg"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            "svg" => Some("image/svg+xml"),
            _ => None,
        }
    });

    by_extension
        .or_else(|| image::guess_format(bytes).ok().map(|f| f.to_mime_type()))
        .unwrap_or("image/png")
}

/// Returns `true` when the bytes look like SVG markup.
pub fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with('<') && text.contains("<svg"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_detection() {
        assert_eq!(mime_type_for("logo.JPG", b""), "image/jpeg");
        assert_eq!(mime_type_for("https://x.test/a.webp?x=1", b""), "image/webp");
        assert_eq!(mime_type_for("upload", b"GIF89a\x01\x00\x01\x00"), "image/gif");
        assert_eq!(mime_type_for("upload.bin", b"????"), "image/png");
    }

    #[test]
    fn svg_sniffing() {
        assert!(looks_like_svg(b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>"));
        assert!(looks_like_svg(b"  <?xml version=\"1.0\"?>\n<!-- logo -->\n<svg></svg>"));
        assert!(!looks_like_svg(b"\x89PNG\r\n\x1a\n"));
        assert!(!looks_like_svg(b"hello <svg"));
    }

    #[test]
    fn location_classification() {
        assert_eq!(
            SourceDescriptor::from_location("https://example.com/logo.png"),
            SourceDescriptor::RemoteUrl("https://example.com/logo.png".into())
        );
        assert_eq!(
            SourceDescriptor::from_location("assets/logo.png"),
            SourceDescriptor::AssetPath("assets/logo.png".into())
        );
    }

    #[test]
    fn svg_extension_ignores_query() {
        assert!(SourceDescriptor::from_location("https://cdn.test/icon.SVG?v=3").has_svg_extension());
        assert!(SourceDescriptor::from_location("media/logo.svg").has_svg_extension());
        assert!(!SourceDescriptor::from_location("media/logo.png").has_svg_extension());
        assert!(!SourceDescriptor::Text("svg".into()).has_svg_extension());
    }

    #[test]
    fn text_limited_to_four_chars() {
        assert!(SourceDescriptor::Text("ABCD".into()).validate().is_ok());
        assert_eq!(
            SourceDescriptor::Text("ABCDE".into()).validate(),
            Err(ValidationError::TextTooLong { len: 5 })
        );
    }

    #[test]
    fn empty_sources_rejected() {
        assert_eq!(
            SourceDescriptor::Text("  ".into()).validate(),
            Err(ValidationError::EmptySource)
        );
        assert_eq!(
            SourceDescriptor::AssetPath(String::new()).validate(),
            Err(ValidationError::EmptySource)
        );
    }

    #[test]
    fn emoji_must_be_one_cluster() {
        assert!(SourceDescriptor::Emoji("🦆".into()).validate().is_ok());
        // Family: man, woman, girl joined by zero-width joiners.
        assert!(SourceDescriptor::Emoji("👨\u{200d}👩\u{200d}👧".into()).validate().is_ok());
        assert_eq!(
            SourceDescriptor::Emoji("🦆🦆".into()).validate(),
            Err(ValidationError::InvalidEmoji { clusters: 2 })
        );
    }

    #[test]
    fn serializes_tagged() {
        let json = serde_json::to_string(&SourceDescriptor::Text("AB".into())).unwrap();
        assert_eq!(json, r#"{"type":"text","value":"AB"}"#);
        let source: SourceDescriptor =
            serde_json::from_str(r#"{"type":"asset-path","value":"media/logo.svg"}"#).unwrap();
        assert_eq!(source, SourceDescriptor::AssetPath("media/logo.svg".into()));
    }
}
