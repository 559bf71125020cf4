//! Loading sources into the canonical bitmap.
//!
//! Raster bytes go through the `image` decoders. SVG markup is preprocessed
//! for a fixed, light-mode rendering and handed to a [`VectorRasterizer`],
//! which renders it with resvg by default.

use std::sync::LazyLock;

use image::{Rgba, RgbaImage};
use regex::Regex;
use resvg::tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::{FaviconError, Result};
use crate::icon::CanonicalBitmap;
use crate::options::GenerationOptions;
use crate::svg::{BLACK_FILL, declared_size_or};

static HAS_VIEW_BOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"viewBox\s*=\s*["'][^"']+["']"#).unwrap());
static SVG_TAG_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<svg\s").unwrap());
static DARK_MEDIA_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)@media\s*\(\s*prefers-color-scheme:\s*dark\s*\)\s*\{").unwrap()
});

/// Radius of the placeholder circle relative to the bitmap edge.
const PLACEHOLDER_RADIUS: f32 = 0.35;

// ============================================================================
// VectorRasterizer
// ============================================================================

/// Strategy for turning SVG markup into pixels.
///
/// The generator asks [`can_process_svg`](Self::can_process_svg) before it
/// accepts an SVG source.
pub trait VectorRasterizer {
    fn can_process_svg(&self) -> bool;

    /// Renders `svg` so that both edges are at least `min_edge` pixels.
    fn rasterize(&self, svg: &str, min_edge: u32) -> Result<RgbaImage>;
}

/// The production rasterizer, backed by resvg with the system font database.
pub struct ResvgRasterizer {
    options: Options<'static>,
}

impl ResvgRasterizer {
    pub fn new() -> Self {
        let mut options = Options::default();
        options.fontdb_mut().load_system_fonts();
        tracing::debug!("loaded {} font faces for SVG text", options.fontdb.len());
        Self { options }
    }
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorRasterizer for ResvgRasterizer {
    fn can_process_svg(&self) -> bool {
        true
    }

    fn rasterize(&self, svg: &str, min_edge: u32) -> Result<RgbaImage> {
        let tree = Tree::from_str(svg, &self.options)
            .map_err(|e| FaviconError::decode("SVG markup", e))?;

        let size = tree.size();
        let min_edge = min_edge as f32;
        let scale = (min_edge / size.width())
            .max(min_edge / size.height())
            .max(1.0);
        let width = (size.width() * scale).ceil() as u32;
        let height = (size.height() * scale).ceil() as u32;

        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            FaviconError::encoding(
                "canonical bitmap",
                format!("cannot allocate a {}x{} surface", width, height),
            )
        })?;
        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        Ok(pixmap_to_rgba_image(&pixmap))
    }
}

/// A rasterizer for builds without vector support. Rejects every SVG.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedRasterizer;

impl VectorRasterizer for UnsupportedRasterizer {
    fn can_process_svg(&self) -> bool {
        false
    }

    fn rasterize(&self, _svg: &str, _min_edge: u32) -> Result<RgbaImage> {
        Err(FaviconError::SvgUnsupported)
    }
}

/// Converts a premultiplied tiny-skia pixmap to straight-alpha RGBA.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());

    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let color = src.demultiply();
        *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }

    img
}

// ============================================================================
// Rasterizer
// ============================================================================

/// Produces the [`CanonicalBitmap`] for a run.
pub struct Rasterizer {
    vector: Box<dyn VectorRasterizer>,
}

impl Rasterizer {
    pub fn new(vector: Box<dyn VectorRasterizer>) -> Self {
        Self { vector }
    }

    pub fn can_process_svg(&self) -> bool {
        self.vector.can_process_svg()
    }

    /// Decodes PNG, JPEG, GIF, WebP, ICO and the other formats `image` knows.
    pub fn load_raster(&self, bytes: &[u8], source_name: &str) -> Result<CanonicalBitmap> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| FaviconError::decode(source_name, e))?;
        Ok(CanonicalBitmap::new(decoded.to_rgba8()))
    }

    /// Preprocesses and rasterizes SVG markup at the canonical resolution.
    pub fn load_svg(&self, svg: &str, options: &GenerationOptions) -> Result<CanonicalBitmap> {
        if !self.can_process_svg() {
            return Err(FaviconError::SvgUnsupported);
        }
        let prepared = prepare_svg_for_rasterization(svg, options);
        let data = self.vector.rasterize(&prepared, CanonicalBitmap::MIN_EDGE)?;
        Ok(CanonicalBitmap::new(data))
    }

    /// Rasterizes synthesized glyph markup. Colors are kept as authored;
    /// only dark-mode blocks are dropped.
    pub fn load_glyph_svg(&self, svg: &str) -> Result<CanonicalBitmap> {
        if !self.can_process_svg() {
            return Err(FaviconError::SvgUnsupported);
        }
        let prepared = ensure_view_box(&strip_dark_media_queries(svg));
        let data = self.vector.rasterize(&prepared, CanonicalBitmap::MIN_EDGE)?;
        Ok(CanonicalBitmap::new(data))
    }

    /// A theme-colored circle on a transparent canvas, used when no emoji
    /// artwork could be found.
    pub fn placeholder(&self, options: &GenerationOptions) -> Result<CanonicalBitmap> {
        placeholder_bitmap(options, CanonicalBitmap::MIN_EDGE)
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new(Box::new(ResvgRasterizer::new()))
    }
}

/// Draws the emoji placeholder: a circle of radius `0.35 * size` in the theme
/// color, centered on a transparent `size`x`size` canvas.
pub fn placeholder_bitmap(options: &GenerationOptions, size: u32) -> Result<CanonicalBitmap> {
    let variant = "emoji placeholder";
    let mut pixmap = Pixmap::new(size, size)
        .ok_or_else(|| FaviconError::encoding(variant, "cannot allocate the canvas"))?;

    let center = size as f32 / 2.0;
    let path = PathBuilder::from_circle(center, center, size as f32 * PLACEHOLDER_RADIUS)
        .ok_or_else(|| FaviconError::encoding(variant, "degenerate circle"))?;

    let [r, g, b, a] = options.theme_color.to_rgba();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;

    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);

    Ok(CanonicalBitmap::new(pixmap_to_rgba_image(&pixmap)))
}

// ============================================================================
// SVG preprocessing
// ============================================================================

/// Rewrites SVG markup for a fixed rasterization.
///
/// - `currentColor` and black fills become the resolved icon color
/// - dark-mode media blocks are removed
/// - a padded viewBox is added when none exists
pub fn prepare_svg_for_rasterization(svg: &str, options: &GenerationOptions) -> String {
    let icon_color = options.resolved_icon_color().to_string();

    let svg = svg.replace("currentColor", &icon_color);
    let svg = BLACK_FILL.replace_all(&svg, format!(r#"fill="{icon_color}""#).as_str());
    let svg = strip_dark_media_queries(&svg);
    ensure_view_box(&svg)
}

/// Removes every `@media (prefers-color-scheme: dark) { ... }` block,
/// including blocks that contain nested rules.
pub fn strip_dark_media_queries(svg: &str) -> String {
    let mut out = String::with_capacity(svg.len());
    let mut rest = svg;

    while let Some(open) = DARK_MEDIA_OPEN.find(rest) {
        out.push_str(&rest[..open.start()]);
        let body = &rest[open.end()..];

        let mut depth = 1usize;
        let mut close = None;
        for (i, c) in body.char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i + 1);
                        break;
                    }
                }
                _ => {}
            }
        }

        match close {
            Some(end) => rest = &body[end..],
            None => {
                // Unterminated block: keep the remainder as is.
                out.push_str(&rest[open.start()..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Adds `viewBox="-p -p w+2p h+2p"` with `p = 1%` of the larger declared
/// dimension when the markup has no viewBox. Width and height come from the
/// opening `<svg>` tag and default to 100.
pub fn ensure_view_box(svg: &str) -> String {
    if HAS_VIEW_BOX.is_match(svg) {
        return svg.to_string();
    }

    let (width, height) = declared_size_or(svg, 100.0);
    let padding = width.max(height) * 0.01;
    let view_box = format!(
        r#"viewBox="{:.2} {:.2} {:.2} {:.2}" "#,
        -padding,
        -padding,
        width + padding * 2.0,
        height + padding * 2.0
    );

    match SVG_TAG_START.find(svg) {
        Some(m) => format!("{}{}{}", &svg[..m.end()], view_box, &svg[m.end()..]),
        None => svg.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
