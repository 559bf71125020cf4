//! SVG theming by text substitution.
//!
//! These functions edit SVG markup with regular expressions rather than a DOM.
//! The insertion points are part of the contract:
//!
//! - a `<style>` element is replaced in place when one exists, otherwise a new
//!   one is inserted right after the opening `<svg ...>` tag
//! - the background rect goes after the first `</style>`, otherwise after the
//!   opening `<svg ...>` tag
//! - the padding group opens after the background rect, otherwise after the
//!   first `</style>`, otherwise after the opening `<svg ...>` tag, and closes
//!   right before the first `</svg>`
//!
//! Markup without an `<svg>` tag passes through unchanged.

use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::{Captures, Regex};

use crate::color::HexColor;
use crate::options::{DarkModeStyle, GenerationOptions};

/// The media query every dark-mode rule lives in.
pub const DARK_MEDIA: &str = "@media (prefers-color-scheme: dark)";

/// Fallback document size when neither a viewBox nor width/height is present.
const DEFAULT_DIMENSIONS: (f64, f64) = (100.0, 100.0);

/// Fallback size of a glyph SVG without a viewBox (Twemoji's canvas).
const DEFAULT_GLYPH_DIMENSIONS: (f64, f64) = (36.0, 36.0);

pub(crate) static SVG_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<svg[^>]*>").unwrap());
static SVG_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</svg>").unwrap());
static SVG_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)(<svg[^>]*>)(.*?)(</svg>)").unwrap());
static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)(<style[^>]*>).*?(</style>)").unwrap());
static STYLE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</style>").unwrap());
static BACKGROUND_RECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<rect[^>]*class=["']favicon-bg["'][^>]*/?>"#).unwrap()
});
static VIEW_BOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"viewBox=["']([^"']+)["']"#).unwrap());
static VIEW_BOX_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s,]+").unwrap());
static WIDTH_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\swidth=["'](\d+(?:\.\d+)?)["']"#).unwrap());
static HEIGHT_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\sheight=["'](\d+(?:\.\d+)?)["']"#).unwrap());
pub(crate) static BLACK_FILL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)fill=["']#0{3,6}["']"#).unwrap());

// ============================================================================
// Raster wrapping
// ============================================================================

/// Embeds raster bytes as a base64 data URI inside a 32x32 SVG shell.
pub fn wrap_raster(bytes: &[u8], mime_type: &str, style: DarkModeStyle, color: HexColor) -> String {
    let encoded = STANDARD.encode(bytes);
    let rule = dark_mode_rule(style, color);

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32" width="32" height="32">
  <style>
    {DARK_MEDIA} {{
      {rule}
    }}
  </style>
  <image href="data:{mime_type};base64,{encoded}" width="32" height="32" preserveAspectRatio="xMidYMid meet"/>
</svg>
"#
    )
}

// ============================================================================
// Dark mode and colors
// ============================================================================

/// The CSS rule applied in dark mode for `style`.
pub fn dark_mode_rule(style: DarkModeStyle, color: HexColor) -> String {
    match style {
        DarkModeStyle::Invert => "svg { filter: invert(1) hue-rotate(180deg); }".to_string(),
        DarkModeStyle::Lighten => "svg { filter: brightness(1.5) contrast(1.1); }".to_string(),
        DarkModeStyle::Custom => custom_color_rule(color),
        DarkModeStyle::None => "/* No dark mode changes */".to_string(),
    }
}

/// Approximates a tint toward `color` with CSS filter primitives.
///
/// Black is inverted to white, sepia-toned, then rotated to the target hue.
/// Saturation scales as `S / 30 * 100` percent and brightness as `L / 50`;
/// a brightness of 1 is left out.
fn custom_color_rule(color: HexColor) -> String {
    let hsl = color.to_hsl();

    let mut filters = vec![
        "invert(1)".to_string(),
        "sepia(1)".to_string(),
        format!("hue-rotate({}deg)", hsl.h),
    ];

    if hsl.s > 0 {
        let saturation = f64::from(hsl.s) / 30.0 * 100.0;
        filters.push(format!("saturate({}%)", round2(saturation)));
    } else {
        filters.push("saturate(0)".to_string());
    }

    let brightness = f64::from(hsl.l) / 50.0;
    if (brightness - 1.0).abs() > 0.001 {
        filters.push(format!("brightness({})", round2(brightness)));
    }

    format!("svg {{ filter: {}; }}", filters.join(" "))
}

/// Injects a dark-mode rule into `svg`.
///
/// With an opaque background the stylesheet also carries the `.favicon-bg`
/// rules, a background rect is added, and the dark rule shares the
/// background's dark media block.
pub fn inject_dark_mode(
    svg: &str,
    style: DarkModeStyle,
    color: HexColor,
    options: &GenerationOptions,
) -> String {
    let rule = dark_mode_rule(style, color);

    let css = if options.png_transparent {
        format!("{DARK_MEDIA} {{ {rule} }}")
    } else {
        background_css(options, Some(&rule))
    };

    finish_themed(inject_style_element(svg, &css), options)
}

/// Routes `currentColor` and black fills through the `--icon-color` custom
/// property, set to `light` normally and `dark` in dark mode.
pub fn apply_custom_icon_colors(
    svg: &str,
    light: HexColor,
    dark: HexColor,
    options: &GenerationOptions,
) -> String {
    let svg = svg.replace("currentColor", "var(--icon-color)");
    let svg = BLACK_FILL.replace_all(&svg, r#"fill="var(--icon-color)""#);

    let mut css = format!(
        ":root {{ --icon-color: {light}; }} {DARK_MEDIA} {{ :root {{ --icon-color: {dark}; }} }}"
    );
    if !options.png_transparent {
        css.push(' ');
        css.push_str(&background_css(options, None));
    }

    finish_themed(inject_style_element(&svg, &css), options)
}

/// Themes the markup of an SVG source for use as `favicon.svg`.
///
/// Custom icon colors take precedence over the dark-mode style. With neither,
/// an opaque background is still added.
pub fn theme_svg_source(svg: &str, options: &GenerationOptions) -> String {
    if options.use_custom_icon_color {
        apply_custom_icon_colors(svg, options.icon_color, options.dark_mode_icon_color, options)
    } else if options.dark_mode_style != DarkModeStyle::None {
        inject_dark_mode(svg, options.dark_mode_style, options.dark_mode_color, options)
    } else if !options.png_transparent {
        add_background_to_svg(svg, options)
    } else {
        apply_padding_to_svg(svg, options.padding())
    }
}

/// Adds the light/dark background without touching icon colors.
pub fn add_background_to_svg(svg: &str, options: &GenerationOptions) -> String {
    let css = background_css(options, None);
    let svg = inject_style_element(svg, &css);
    let svg = add_background_rect(&svg);
    apply_padding_to_svg(&svg, options.padding())
}

/// Adds the background rect when opaque, then the padding group.
fn finish_themed(svg: String, options: &GenerationOptions) -> String {
    let svg = if options.png_transparent {
        svg
    } else {
        add_background_rect(&svg)
    };
    apply_padding_to_svg(&svg, options.padding())
}

/// `.favicon-bg` fill rules for light and dark mode.
///
/// `dark_extra` is appended inside the dark media block.
pub fn background_css(options: &GenerationOptions, dark_extra: Option<&str>) -> String {
    let mut dark = format!(".favicon-bg {{ fill: {}; }}", options.png_dark_background);
    if let Some(extra) = dark_extra {
        dark.push(' ');
        dark.push_str(extra);
    }
    format!(
        ".favicon-bg {{ fill: {}; }} {DARK_MEDIA} {{ {dark} }}",
        options.png_background
    )
}

/// Replaces the content of every `<style>` element, or inserts one.
pub fn inject_style_element(svg: &str, css: &str) -> String {
    if STYLE_BLOCK.is_match(svg) {
        return STYLE_BLOCK
            .replace_all(svg, |caps: &Captures| format!("{}{}{}", &caps[1], css, &caps[2]))
            .into_owned();
    }

    insert_after_first(svg, &SVG_OPEN, &format!("<style>{css}</style>"))
        .unwrap_or_else(|| svg.to_string())
}

// ============================================================================
// Geometry
// ============================================================================

/// Inserts `<rect class="favicon-bg">` covering the whole document.
pub fn add_background_rect(svg: &str) -> String {
    let (width, height) = extract_dimensions(svg);
    let rect = format!(
        r#"<rect class="favicon-bg" x="0" y="0" width="{width}" height="{height}"/>"#
    );

    insert_after_first(svg, &STYLE_CLOSE, &rect)
        .or_else(|| insert_after_first(svg, &SVG_OPEN, &rect))
        .unwrap_or_else(|| svg.to_string())
}

/// Shrinks all drawable content toward the center by `percent` on each edge.
///
/// Content is wrapped in `<g transform="translate(tx,ty) scale(s)">` where
/// `s = 1 - 2 * percent / 100` and `tx`, `ty` are `percent` of the width and
/// height. A padding of zero leaves the markup untouched.
pub fn apply_padding_to_svg(svg: &str, percent: u8) -> String {
    if percent == 0 || !SVG_OPEN.is_match(svg) {
        return svg.to_string();
    }

    let (width, height) = extract_dimensions(svg);
    let p = f64::from(percent);
    let scale = (100.0 - 2.0 * p) / 100.0;
    let translate_x = width * p / 100.0;
    let translate_y = height * p / 100.0;

    let group = format!(r#"<g transform="translate({translate_x},{translate_y}) scale({scale})">"#);

    let closed = insert_before_first(svg, &SVG_CLOSE, "</g>").unwrap_or_else(|| svg.to_string());

    insert_after_first(&closed, &BACKGROUND_RECT, &group)
        .or_else(|| insert_after_first(&closed, &STYLE_CLOSE, &group))
        .or_else(|| insert_after_first(&closed, &SVG_OPEN, &group))
        .unwrap_or(closed)
}

/// Document size from the viewBox, then the `<svg>` width/height, then 100x100.
pub fn extract_dimensions(svg: &str) -> (f64, f64) {
    view_box_size(svg)
        .or_else(|| declared_size(svg))
        .unwrap_or(DEFAULT_DIMENSIONS)
}

/// Width and height of the first viewBox, if it has four numbers.
pub(crate) fn view_box_size(svg: &str) -> Option<(f64, f64)> {
    let caps = VIEW_BOX.captures(svg)?;
    let values: Vec<f64> = VIEW_BOX_SEPARATOR
        .split(caps[1].trim())
        .map(|v| v.parse().unwrap_or(0.0))
        .collect();
    (values.len() >= 4).then(|| (values[2], values[3]))
}

/// The numeric `width` and `height` attributes of the opening `<svg>` tag.
pub(crate) fn declared_size(svg: &str) -> Option<(f64, f64)> {
    Some((declared_attr(svg, &WIDTH_ATTR)?, declared_attr(svg, &HEIGHT_ATTR)?))
}

/// Declared width and height, each falling back to `fallback` on its own.
pub(crate) fn declared_size_or(svg: &str, fallback: f64) -> (f64, f64) {
    (
        declared_attr(svg, &WIDTH_ATTR).unwrap_or(fallback),
        declared_attr(svg, &HEIGHT_ATTR).unwrap_or(fallback),
    )
}

fn declared_attr(svg: &str, attr: &Regex) -> Option<f64> {
    let tag = SVG_OPEN.find(svg)?.as_str();
    attr.captures(tag)?[1].parse().ok()
}

// ============================================================================
// Glyph wrapping
// ============================================================================

/// Prepares an externally sourced glyph SVG (e.g. Twemoji) as the favicon.
///
/// Adds the background stylesheet and rect when the background is opaque, and
/// moves the original content into the padding group when padding is set.
pub fn wrap_glyph_svg(glyph: &str, options: &GenerationOptions) -> String {
    let (width, height) = view_box_size(glyph).unwrap_or(DEFAULT_GLYPH_DIMENSIONS);

    let (style, rect) = if options.png_transparent {
        (String::new(), String::new())
    } else {
        (
            format!("<style>{}</style>", background_css(options, None)),
            format!(r#"<rect class="favicon-bg" x="0" y="0" width="{width}" height="{height}"/>"#),
        )
    };

    let padding = options.padding();
    if padding > 0 {
        let p = f64::from(padding);
        let scale = (100.0 - 2.0 * p) / 100.0;
        let translate_x = width * p / 100.0;
        let translate_y = height * p / 100.0;

        if let Some(caps) = SVG_BODY.captures(glyph) {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            return format!(
                r#"{}{}{}{}<g transform="translate({translate_x},{translate_y}) scale({scale})">{}</g>{}{}"#,
                &glyph[..whole.start],
                &caps[1],
                style,
                rect,
                &caps[2],
                &caps[3],
                &glyph[whole.end..],
            );
        }
        return glyph.to_string();
    }

    if rect.is_empty() {
        return glyph.to_string();
    }

    insert_after_first(glyph, &SVG_OPEN, &format!("{style}{rect}"))
        .unwrap_or_else(|| glyph.to_string())
}

// ============================================================================
// Helpers
// ============================================================================

fn insert_after_first(haystack: &str, pattern: &Regex, insertion: &str) -> Option<String> {
    let end = pattern.find(haystack)?.end();
    Some(splice(haystack, end, insertion))
}

fn insert_before_first(haystack: &str, pattern: &Regex, insertion: &str) -> Option<String> {
    let start = pattern.find(haystack)?.start();
    Some(splice(haystack, start, insertion))
}

fn splice(haystack: &str, at: usize, insertion: &str) -> String {
    let mut out = String::with_capacity(haystack.len() + insertion.len());
    out.push_str(&haystack[..at]);
    out.push_str(insertion);
    out.push_str(&haystack[at..]);
    out
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Escapes text for use in XML/HTML content and attribute values.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
