//! Emoji and text glyph sources.
//!
//! Emoji and short text sources have no file behind them. This module builds
//! their vector markup and looks up external emoji artwork through a
//! [`GlyphSource`].

use std::fmt::Write as _;

use crate::fetch::{Fetch, GLYPH_FETCH_TIMEOUT};
use crate::options::GenerationOptions;
use crate::svg::{DARK_MEDIA, escape_xml};

/// Font stack that resolves to a color emoji font on common platforms.
pub const EMOJI_FONT_STACK: &str = "Apple Color Emoji, Segoe UI Emoji, Noto Color Emoji, sans-serif";

/// Base URL of the Twemoji SVG set on the jsDelivr CDN.
pub const TWEMOJI_CDN_BASE: &str = "https://cdn.jsdelivr.net/gh/twitter/twemoji@latest/assets/svg";

// ============================================================================
// Synthesized markup
// ============================================================================

/// Builds a 100x100 SVG with the emoji centered at font-size 80.
///
/// A `.favicon-bg` rect with light/dark fills is added when the background
/// is opaque.
pub fn generate_from_emoji(emoji: &str, options: &GenerationOptions) -> String {
    let background = if options.png_transparent {
        String::new()
    } else {
        format!(
            r#"<style>.favicon-bg {{ fill: {}; }} {DARK_MEDIA} {{ .favicon-bg {{ fill: {}; }} }}</style><rect class="favicon-bg" x="0" y="0" width="100" height="100"/>"#,
            options.png_background, options.png_dark_background
        )
    };

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100" width="100" height="100">
  {background}<text x="50" y="55" text-anchor="middle" dominant-baseline="central" font-size="80" font-family="{EMOJI_FONT_STACK}">{}</text>
</svg>
"#,
        escape_xml(emoji)
    )
}

/// Font size for a text glyph of `chars` characters.
pub fn text_font_size(chars: usize) -> u32 {
    match chars {
        0 | 1 => 70,
        2 => 55,
        3 => 40,
        _ => 32,
    }
}

/// Builds a 100x100 SVG with up to four characters on a colored square.
///
/// Background and text colors have light values and optional dark values;
/// the dark media block is only emitted when one of them differs.
pub fn generate_from_text(text: &str, options: &GenerationOptions) -> String {
    let font_size = text_font_size(text.chars().count());
    let css = text_css(options);

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100" width="100" height="100">
  <style>{css}</style>
  <rect class="favicon-bg" x="0" y="0" width="100" height="100"/>
  <text class="favicon-text" x="50" y="55" text-anchor="middle" dominant-baseline="central" font-size="{font_size}" font-weight="{}" font-family="{}">{}</text>
</svg>
"#,
        options.text_weight.as_css(),
        escape_xml(options.text_font.font_family()),
        escape_xml(text)
    )
}

fn text_css(options: &GenerationOptions) -> String {
    let background = options.text_background();
    let color = options.text_color;
    let dark_background = options.text_dark_background();
    let dark_color = options.text_dark();

    let mut css = format!(".favicon-bg {{ fill: {background}; }} .favicon-text {{ fill: {color}; }}");
    if dark_background != background || dark_color != color {
        let _ = write!(
            css,
            " {DARK_MEDIA} {{ .favicon-bg {{ fill: {dark_background}; }} .favicon-text {{ fill: {dark_color}; }} }}"
        );
    }
    css
}

// ============================================================================
// Glyph lookup
// ============================================================================

/// Looks up artwork for an emoji.
///
/// A `None` is a soft failure: the caller synthesizes a placeholder instead.
pub trait GlyphSource {
    fn lookup(&self, emoji: &str) -> Option<String>;
}

/// A glyph source that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGlyphs;

impl GlyphSource for NoGlyphs {
    fn lookup(&self, _emoji: &str) -> Option<String> {
        None
    }
}

/// Twemoji SVGs bundled into the binary through `twemoji-assets`.
#[cfg(feature = "twemoji")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TwemojiAssets;

#[cfg(feature = "twemoji")]
impl GlyphSource for TwemojiAssets {
    fn lookup(&self, emoji: &str) -> Option<String> {
        use twemoji_assets::svg::SvgTwemojiAsset;

        let asset = SvgTwemojiAsset::from_emoji(emoji)?;
        let svg: &str = asset.as_ref();
        Some(svg.to_string())
    }
}

/// Twemoji SVGs downloaded from a CDN, one request per lookup.
#[derive(Debug, Clone)]
pub struct TwemojiCdn<F> {
    fetcher: F,
    base_url: String,
}

impl<F: Fetch> TwemojiCdn<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            base_url: TWEMOJI_CDN_BASE.to_string(),
        }
    }

    /// Points lookups at a mirror of the Twemoji `assets/svg` directory.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn url_for(&self, emoji: &str) -> Option<String> {
        twemoji_codepoints(emoji).map(|cp| format!("{}/{}.svg", self.base_url, cp))
    }
}

impl<F: Fetch> GlyphSource for TwemojiCdn<F> {
    fn lookup(&self, emoji: &str) -> Option<String> {
        let url = self.url_for(emoji)?;

        match self.fetcher.fetch(&url, GLYPH_FETCH_TIMEOUT) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(svg) => Some(svg),
                Err(e) => {
                    tracing::warn!("glyph response from {} is not UTF-8: {}", url, e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("glyph lookup for {:?} failed: {}", emoji, e);
                None
            }
        }
    }
}

/// Twemoji file stem for an emoji: lowercase hex codepoints joined by `-`,
/// variation selectors U+FE0E and U+FE0F skipped.
pub fn twemoji_codepoints(emoji: &str) -> Option<String> {
    let codepoints: Vec<String> = emoji
        .chars()
        .filter(|c| !matches!(c, '\u{fe0e}' | '\u{fe0f}'))
        .map(|c| format!("{:x}", u32::from(c)))
        .collect();

    (!codepoints.is_empty()).then(|| codepoints.join("-"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::time::Duration;

    use super::*;
    use crate::color::HexColor;
    use crate::fetch::{FetchError, NoFetch};

    #[test]
    fn font_size_table() {
        let options = GenerationOptions::new("T");
        for (text, size) in [("A", 70), ("AB", 55), ("ABC", 40), ("ABCD", 32)] {
            let svg = generate_from_text(text, &options);
            assert!(svg.contains(&format!(r#"font-size="{size}""#)), "{text}");
        }
    }

    #[test]
    fn text_svg_light_only_by_default() {
        let svg = generate_from_text("Hi", &GenerationOptions::new("T"));
        assert!(svg.contains(".favicon-bg { fill: #4f46e5; } .favicon-text { fill: #ffffff; }"));
        assert!(!svg.contains("@media"));
        assert!(svg.contains(r#"font-weight="bold""#));
        assert!(svg.contains(">Hi</text>"));
    }

    #[test]
    fn text_svg_dark_block_when_colors_differ() {
        let mut options = GenerationOptions::new("T");
        options.text_dark_background_color = Some(HexColor::new(0, 0, 0));
        let svg = generate_from_text("A", &options);
        assert!(svg.contains(
            "@media (prefers-color-scheme: dark) { .favicon-bg { fill: #000000; } .favicon-text { fill: #ffffff; } }"
        ));
    }

    #[test]
    fn text_is_escaped() {
        let svg = generate_from_text("<&>", &GenerationOptions::new("T"));
        assert!(svg.contains(">&lt;&amp;&gt;</text>"));
        // The quoted "Segoe UI" in the font stack must not end the attribute.
        assert!(svg.contains("&quot;Segoe UI&quot;"));
    }

    #[test]
    fn emoji_svg_background_only_when_opaque() {
        let svg = generate_from_emoji("🦆", &GenerationOptions::new("T"));
        assert!(svg.contains(r#"viewBox="0 0 100 100""#));
        assert!(svg.contains(r#"font-size="80""#));
        assert!(svg.contains(">🦆</text>"));
        assert!(!svg.contains("favicon-bg"));

        let options = GenerationOptions::new("T").with_background(HexColor::WHITE, HexColor::BLACK);
        let svg = generate_from_emoji("🦆", &options);
        assert!(svg.contains(".favicon-bg { fill: #ffffff; }"));
        assert!(svg.contains("{ .favicon-bg { fill: #000000; } }"));
        assert!(svg.contains(r#"<rect class="favicon-bg" x="0" y="0" width="100" height="100"/><text"#));
    }

    #[test]
    fn codepoints_skip_variation_selectors() {
        assert_eq!(twemoji_codepoints("🦆").as_deref(), Some("1f986"));
        assert_eq!(twemoji_codepoints("❤\u{fe0f}").as_deref(), Some("2764"));
        assert_eq!(
            twemoji_codepoints("👨\u{200d}👩\u{200d}👧").as_deref(),
            Some("1f468-200d-1f469-200d-1f467")
        );
        assert_eq!(twemoji_codepoints("\u{fe0f}"), None);
    }

    struct RecordingFetch {
        urls: RefCell<Vec<String>>,
        body: &'static str,
    }

    impl Fetch for RecordingFetch {
        fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
            assert_eq!(timeout, GLYPH_FETCH_TIMEOUT);
            self.urls.borrow_mut().push(url.to_string());
            Ok(self.body.as_bytes().to_vec())
        }
    }

    #[test]
    fn cdn_lookup_builds_url() {
        let cdn = TwemojiCdn::new(RecordingFetch {
            urls: RefCell::new(Vec::new()),
            body: "<svg/>",
        });
        assert_eq!(cdn.lookup("🦆").as_deref(), Some("<svg/>"));
        assert_eq!(
            cdn.fetcher.urls.borrow().as_slice(),
            ["https://cdn.jsdelivr.net/gh/twitter/twemoji@latest/assets/svg/1f986.svg"]
        );
    }

    #[test]
    fn cdn_failure_is_soft() {
        let cdn = TwemojiCdn::new(NoFetch).with_base_url("https://mirror.test/svg/");
        assert_eq!(cdn.url_for("🦆").as_deref(), Some("https://mirror.test/svg/1f986.svg"));
        assert_eq!(cdn.lookup("🦆"), None);
        assert_eq!(NoGlyphs.lookup("🦆"), None);
    }

    #[cfg(feature = "twemoji")]
    #[test]
    fn bundled_twemoji_lookup() {
        let svg = TwemojiAssets.lookup("🦆").expect("duck should be bundled");
        assert!(svg.contains("<svg"));
        assert!(TwemojiAssets.lookup("not-an-emoji").is_none());
    }
}
