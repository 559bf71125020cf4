//! Icon size catalogue and the canonical working bitmap.
//!
//! The catalogue is the fixed, ordered table of outputs a run produces. Every
//! raster output is derived from one [`CanonicalBitmap`].

use image::RgbaImage;

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

// ============================================================================
// Catalogue
// ============================================================================

/// What kind of file an [`IconSizeSpec`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    /// The scalable vector favicon.
    Svg,
    /// A plain PNG honoring the user's padding and transparency.
    Png,
    /// An Android maskable PNG with extra safe-zone padding and a solid background.
    Maskable,
    /// A multi-frame ICO container.
    Ico,
}

/// One entry in the output catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSizeSpec {
    pub file_name: &'static str,
    /// Edge length in pixels; `0` for the scalable SVG.
    pub size: u32,
    pub kind: IconKind,
}

impl IconSizeSpec {
    const fn new(file_name: &'static str, size: u32, kind: IconKind) -> Self {
        Self {
            file_name,
            size,
            kind,
        }
    }

    pub fn is_maskable(&self) -> bool {
        self.kind == IconKind::Maskable
    }

    /// The `WxH` string used by manifests and link tags.
    pub fn sizes_attr(&self) -> String {
        format!("{}x{}", self.size, self.size)
    }
}

/// Frame sizes packed into `favicon.ico`, in order.
pub const ICO_SIZES: [u32; 3] = [16, 32, 48];

pub const SVG_FILE: &str = "favicon.svg";
pub const ICO_FILE: &str = "favicon.ico";
pub const MANIFEST_FILE: &str = "site.webmanifest";

/// Every icon produced by a run, in generation order.
pub static CATALOGUE: [IconSizeSpec; 8] = [
    IconSizeSpec::new(SVG_FILE, 0, IconKind::Svg),
    IconSizeSpec::new("favicon-96x96.png", 96, IconKind::Png),
    IconSizeSpec::new("apple-touch-icon.png", 180, IconKind::Png),
    IconSizeSpec::new("icon-192.png", 192, IconKind::Png),
    IconSizeSpec::new("icon-512.png", 512, IconKind::Png),
    IconSizeSpec::new("icon-192-maskable.png", 192, IconKind::Maskable),
    IconSizeSpec::new("icon-512-maskable.png", 512, IconKind::Maskable),
    IconSizeSpec::new(ICO_FILE, 48, IconKind::Ico),
];

/// Catalogue entries of the given kind, in catalogue order.
pub fn specs_of(kind: IconKind) -> impl Iterator<Item = &'static IconSizeSpec> {
    CATALOGUE.iter().filter(move |spec| spec.kind == kind)
}

/// Entries listed in the web manifest: plain PNGs of 192px and up, then maskables.
pub fn manifest_specs() -> impl Iterator<Item = &'static IconSizeSpec> {
    specs_of(IconKind::Png)
        .filter(|spec| spec.size >= 192)
        .chain(specs_of(IconKind::Maskable))
}

/// Names of every file a run writes, including the manifest.
pub fn output_file_names() -> impl Iterator<Item = &'static str> {
    CATALOGUE
        .iter()
        .map(|spec| spec.file_name)
        .chain(std::iter::once(MANIFEST_FILE))
}

// ============================================================================
// CanonicalBitmap
// ============================================================================

/// The single working raster every PNG and ICO frame is downsampled from.
///
/// Vector and synthesized sources produce at least
/// [`MIN_EDGE`](Self::MIN_EDGE) pixels per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalBitmap {
    pub data: RgbaImage,
}

impl CanonicalBitmap {
    /// Minimum edge length for bitmaps rendered from vector content.
    pub const MIN_EDGE: u32 = 1024;

    pub fn new(data: RgbaImage) -> Self {
        Self { data }
    }

    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_has_fixed_order() {
        let names: Vec<_> = output_file_names().collect();
        assert_eq!(
            names,
            [
                "favicon.svg",
                "favicon-96x96.png",
                "apple-touch-icon.png",
                "icon-192.png",
                "icon-512.png",
                "icon-192-maskable.png",
                "icon-512-maskable.png",
                "favicon.ico",
                "site.webmanifest",
            ]
        );
    }

    #[test]
    fn manifest_icons_order() {
        let icons: Vec<_> = manifest_specs().map(|s| (s.file_name, s.is_maskable())).collect();
        assert_eq!(
            icons,
            [
                ("icon-192.png", false),
                ("icon-512.png", false),
                ("icon-192-maskable.png", true),
                ("icon-512-maskable.png", true),
            ]
        );
    }

    #[test]
    fn sizes_attr_format() {
        assert_eq!(CATALOGUE[2].sizes_attr(), "180x180");
    }
}
