//! Sizing, padding and compositing of the canonical bitmap.
//!
//! Every PNG, maskable PNG and ICO frame goes through [`render_sized`]: the
//! bitmap is fitted inside the padded area with a Lanczos3 filter and
//! composited, centered, onto a transparent or solid canvas.

use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::color::HexColor;
use crate::error::{FaviconError, Result};
use crate::icon::CanonicalBitmap;
use crate::options::{GenerationOptions, MAX_PADDING};

/// Safe-zone padding added on top of the user's padding for maskable icons.
pub const MASKABLE_EXTRA_PADDING: u8 = 10;

/// Canvas fill for a rendered icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Transparent,
    Solid(HexColor),
}

impl Background {
    /// The background for plain PNGs and ICO frames.
    pub fn for_png(options: &GenerationOptions) -> Self {
        if options.png_transparent {
            Self::Transparent
        } else {
            Self::Solid(options.png_background)
        }
    }

    /// Maskable icons are always opaque.
    pub fn for_maskable(options: &GenerationOptions) -> Self {
        Self::Solid(options.png_background)
    }

    fn pixel(self) -> Rgba<u8> {
        match self {
            Self::Transparent => Rgba([0, 0, 0, 0]),
            Self::Solid(color) => Rgba(color.to_rgba()),
        }
    }
}

/// Edge length of the icon inside a `size` canvas with `padding` percent on
/// each side. Never less than 1.
pub fn inner_icon_size(size: u32, padding: u8) -> u32 {
    let fraction = f64::from(padding.min(MAX_PADDING)) / 100.0;
    let inner = (f64::from(size) * (1.0 - 2.0 * fraction)).round() as u32;
    inner.max(1)
}

/// Total padding for maskable icons: the user's padding plus the safe zone,
/// capped at 40.
pub fn maskable_padding(user_padding: u8) -> u8 {
    user_padding
        .saturating_add(MASKABLE_EXTRA_PADDING)
        .min(MAX_PADDING)
}

/// Largest size with the aspect ratio of `width`x`height` that fits in a
/// `bound`x`bound` square.
pub fn contain_size(width: u32, height: u32, bound: u32) -> (u32, u32) {
    let ratio = (f64::from(bound) / f64::from(width)).min(f64::from(bound) / f64::from(height));
    let fit = |edge: u32| ((f64::from(edge) * ratio).round() as u32).max(1);
    (fit(width), fit(height))
}

/// Renders the bitmap onto a `size`x`size` canvas.
pub fn render_rgba(
    bitmap: &CanonicalBitmap,
    size: u32,
    padding: u8,
    background: Background,
) -> RgbaImage {
    let source = &bitmap.data;
    let inner = inner_icon_size(size, padding);
    let (width, height) = contain_size(source.width(), source.height(), inner);

    let mut canvas = RgbaImage::from_pixel(size, size, background.pixel());

    let offset_x = (size.saturating_sub(width) / 2) as i32;
    let offset_y = (size.saturating_sub(height) / 2) as i32;

    if (width, height) == source.dimensions() {
        composite_over(&mut canvas, source, offset_x, offset_y);
    } else {
        let resized = imageops::resize(source, width, height, FilterType::Lanczos3);
        composite_over(&mut canvas, &resized, offset_x, offset_y);
    }

    canvas
}

/// Renders the bitmap at `size` and encodes it as PNG.
///
/// `variant` names the output in errors.
pub fn render_sized(
    bitmap: &CanonicalBitmap,
    size: u32,
    padding: u8,
    background: Background,
    variant: &str,
) -> Result<Vec<u8>> {
    let image = render_rgba(bitmap, size, padding, background);
    encode_png(&image, variant)
}

/// Encodes an RGBA image as a 32-bit PNG.
pub fn encode_png(image: &RgbaImage, variant: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| FaviconError::encoding(variant, e))?;
    Ok(bytes)
}

// ============================================================================
// Compositing
// ============================================================================

/// Composites a source image onto a destination image at the specified position.
///
/// Uses standard alpha blending (source over destination).
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let dest_width = dest.width() as i32;
    let dest_height = dest.height() as i32;

    for (sx, sy, src_pixel) in src.enumerate_pixels() {
        let dx = x + sx as i32;
        let dy = y + sy as i32;

        if dx < 0 || dy < 0 || dx >= dest_width || dy >= dest_height {
            continue;
        }

        let dst_pixel = dest.get_pixel_mut(dx as u32, dy as u32);
        *dst_pixel = alpha_blend(*src_pixel, *dst_pixel);
    }
}

/// Source-over blend of two straight-alpha pixels.
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);

    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

// ============================================================================
// Tests
// ============================================================================
