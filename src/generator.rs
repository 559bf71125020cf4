//! The generation pipeline.
//!
//! [`FaviconGenerator`] resolves a source, builds `favicon.svg` and the
//! canonical bitmap, renders every catalogue entry in memory and only then
//! writes the files. A failure anywhere before the write phase leaves the
//! output directory untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::compositor::{Background, maskable_padding, render_sized};
use crate::error::{FaviconError, Result};
use crate::fetch::{AssetResolver, Fetch, NoAssets, NoFetch, ResolvedAsset, SOURCE_FETCH_TIMEOUT};
use crate::glyph::{GlyphSource, generate_from_emoji, generate_from_text};
use crate::icon::{CATALOGUE, CanonicalBitmap, ICO_SIZES, IconKind, MANIFEST_FILE, output_file_names};
use crate::ico::{self, IcoFrame};
use crate::manifest;
use crate::options::GenerationOptions;
use crate::raster::{Rasterizer, VectorRasterizer};
use crate::source::{SourceDescriptor, looks_like_svg, mime_type_for};
use crate::svg::{apply_padding_to_svg, theme_svg_source, wrap_glyph_svg, wrap_raster};

/// Raster sources smaller than this on either edge are accepted with a warning.
const RECOMMENDED_RASTER_EDGE: u32 = 512;

// ============================================================================
// GeneratedFileSet
// ============================================================================

/// The files written by one run, in catalogue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFileSet {
    pub output_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

impl GeneratedFileSet {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    /// File names without the directory.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
    }
}

/// A source loaded into memory: the vector favicon and the working bitmap.
struct PreparedSource {
    svg: String,
    bitmap: CanonicalBitmap,
}

// ============================================================================
// FaviconGenerator
// ============================================================================

/// Generates the favicon set into one output directory.
///
/// ```no_run
/// use favicon_generator::{FaviconGenerator, GenerationOptions, SourceDescriptor};
///
/// let generator = FaviconGenerator::new("public");
/// let files = generator.generate(
///     &SourceDescriptor::from_location("assets/logo.svg"),
///     &GenerationOptions::new("My Site"),
/// )?;
/// println!("wrote {} files", files.len());
/// # Ok::<(), favicon_generator::FaviconError>(())
/// ```
///
/// Runs against the same directory must not overlap.
pub struct FaviconGenerator {
    output_dir: PathBuf,
    rasterizer: Rasterizer,
    fetcher: Box<dyn Fetch>,
    assets: Box<dyn AssetResolver>,
    glyphs: Box<dyn GlyphSource>,
}

impl FaviconGenerator {
    /// A generator with the resvg rasterizer, the default fetcher and glyph
    /// source for the enabled features, and no asset containers.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            rasterizer: Rasterizer::default(),
            fetcher: default_fetcher(),
            assets: Box::new(NoAssets),
            glyphs: default_glyphs(),
        }
    }

    pub fn with_rasterizer(mut self, rasterizer: impl VectorRasterizer + 'static) -> Self {
        self.rasterizer = Rasterizer::new(Box::new(rasterizer));
        self
    }

    pub fn with_fetcher(mut self, fetcher: impl Fetch + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    pub fn with_assets(mut self, assets: impl AssetResolver + 'static) -> Self {
        self.assets = Box::new(assets);
        self
    }

    pub fn with_glyphs(mut self, glyphs: impl GlyphSource + 'static) -> Self {
        self.glyphs = Box::new(glyphs);
        self
    }

    /// Whether SVG sources are accepted.
    pub fn can_process_svg(&self) -> bool {
        self.rasterizer.can_process_svg()
    }

    /// Runs the whole pipeline and returns the written paths.
    pub fn generate(
        &self,
        source: &SourceDescriptor,
        options: &GenerationOptions,
    ) -> Result<GeneratedFileSet> {
        options.validate()?;
        source.validate()?;

        let prepared = match source {
            SourceDescriptor::Emoji(emoji) => self.prepare_emoji(emoji, options)?,
            SourceDescriptor::Text(text) => self.prepare_text(text, options)?,
            SourceDescriptor::AssetPath(_) | SourceDescriptor::RemoteUrl(_) => {
                self.prepare_file(source, options)?
            }
        };

        let size = prepared.bitmap.dimensions();
        tracing::debug!("canonical bitmap is {}x{}", size.width, size.height);

        let outputs = render_outputs(prepared, options)?;
        self.write_outputs(outputs)
    }

    /// Removes every well-known output file that exists.
    pub fn clear(&self) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();

        for name in output_file_names() {
            let path = self.output_dir.join(name);
            match fs::remove_file(&path) {
                Ok(()) => removed.push(path),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!("removed {} files from {}", removed.len(), self.output_dir.display());
        Ok(removed)
    }

    /// Whether `file_name` exists in the output directory.
    pub fn exists(&self, file_name: &str) -> bool {
        self.output_dir.join(file_name).is_file()
    }

    // ---- Source preparation ----

    fn prepare_file(
        &self,
        source: &SourceDescriptor,
        options: &GenerationOptions,
    ) -> Result<PreparedSource> {
        let location = source.as_str();
        let bytes = self.load_bytes(source)?;

        if source.has_svg_extension() || looks_like_svg(&bytes) {
            if !self.can_process_svg() {
                return Err(FaviconError::SvgUnsupported);
            }
            let markup =
                String::from_utf8(bytes).map_err(|e| FaviconError::decode(location, e))?;

            let bitmap = self.rasterizer.load_svg(&markup, options)?;
            let svg = theme_svg_source(&markup, options);
            return Ok(PreparedSource { svg, bitmap });
        }

        let bitmap = self.rasterizer.load_raster(&bytes, location)?;
        let size = bitmap.dimensions();
        if size.width < RECOMMENDED_RASTER_EDGE || size.height < RECOMMENDED_RASTER_EDGE {
            tracing::warn!(
                "{} is {}x{}; sources of at least {}x{} give sharper icons",
                location,
                size.width,
                size.height,
                RECOMMENDED_RASTER_EDGE,
                RECOMMENDED_RASTER_EDGE
            );
        }

        let svg = wrap_raster(
            &bytes,
            mime_type_for(location, &bytes),
            options.dark_mode_style,
            options.dark_mode_color,
        );
        Ok(PreparedSource { svg, bitmap })
    }

    fn prepare_emoji(&self, emoji: &str, options: &GenerationOptions) -> Result<PreparedSource> {
        let Some(glyph) = self.glyphs.lookup(emoji) else {
            tracing::warn!("no glyph artwork for {:?}, drawing a placeholder", emoji);
            let svg = apply_padding_to_svg(&generate_from_emoji(emoji, options), options.padding());
            let bitmap = self.rasterizer.placeholder(options)?;
            return Ok(PreparedSource { svg, bitmap });
        };

        let bitmap = match self.rasterizer.load_glyph_svg(&glyph) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                tracing::warn!("could not rasterize the glyph for {:?}: {}", emoji, e);
                self.rasterizer.placeholder(options)?
            }
        };

        Ok(PreparedSource {
            svg: wrap_glyph_svg(&glyph, options),
            bitmap,
        })
    }

    fn prepare_text(&self, text: &str, options: &GenerationOptions) -> Result<PreparedSource> {
        let markup = generate_from_text(text, options);
        let bitmap = self.rasterizer.load_glyph_svg(&markup)?;
        let svg = apply_padding_to_svg(&markup, options.padding());
        Ok(PreparedSource { svg, bitmap })
    }

    /// Reads a local file, a resolved asset, or a remote URL.
    fn load_bytes(&self, source: &SourceDescriptor) -> Result<Vec<u8>> {
        let location = source.as_str();

        if let SourceDescriptor::RemoteUrl(url) = source {
            return self.fetch_source(url);
        }

        let local = Path::new(location);
        if local.is_file() {
            tracing::debug!("reading source from {}", local.display());
            return Ok(fs::read(local)?);
        }

        match self.assets.resolve(location) {
            Some(ResolvedAsset::File(path)) => {
                tracing::debug!("asset {} resolved to {}", location, path.display());
                Ok(fs::read(path)?)
            }
            Some(ResolvedAsset::Url(url)) => {
                tracing::debug!("asset {} resolved to {}", location, url);
                self.fetch_source(&url)
            }
            Some(ResolvedAsset::Bytes(bytes)) => Ok(bytes),
            None => Err(FaviconError::SourceNotFound {
                path: local.to_path_buf(),
            }),
        }
    }

    fn fetch_source(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("downloading source from {}", url);
        self.fetcher
            .fetch(url, SOURCE_FETCH_TIMEOUT)
            .map_err(|source| FaviconError::RemoteFetch {
                url: url.to_string(),
                source,
            })
    }

    // ---- Output ----

    fn write_outputs(&self, outputs: Vec<(&'static str, Vec<u8>)>) -> Result<GeneratedFileSet> {
        fs::create_dir_all(&self.output_dir)?;

        let mut files: Vec<PathBuf> = Vec::with_capacity(outputs.len());
        for (name, bytes) in outputs {
            let path = self.output_dir.join(name);
            if let Err(e) = fs::write(&path, bytes) {
                let written: Vec<_> = files.iter().map(|p| p.display().to_string()).collect();
                tracing::error!(
                    "failed to write {}: {}; output is incomplete, already written: [{}]",
                    path.display(),
                    e,
                    written.join(", ")
                );
                return Err(e.into());
            }
            files.push(path);
        }

        tracing::info!("generated {} files in {}", files.len(), self.output_dir.display());

        Ok(GeneratedFileSet {
            output_dir: self.output_dir.clone(),
            files,
        })
    }
}

/// Renders every catalogue entry plus the manifest, in catalogue order.
fn render_outputs(
    prepared: PreparedSource,
    options: &GenerationOptions,
) -> Result<Vec<(&'static str, Vec<u8>)>> {
    let PreparedSource { svg, bitmap } = prepared;
    let padding = options.padding();
    let mut outputs = Vec::with_capacity(CATALOGUE.len() + 1);
    let mut svg = Some(svg);

    for spec in CATALOGUE.iter() {
        let bytes = match spec.kind {
            IconKind::Svg => svg.take().unwrap_or_default().into_bytes(),
            IconKind::Png => render_sized(
                &bitmap,
                spec.size,
                padding,
                Background::for_png(options),
                spec.file_name,
            )?,
            IconKind::Maskable => render_sized(
                &bitmap,
                spec.size,
                maskable_padding(padding),
                Background::for_maskable(options),
                spec.file_name,
            )?,
            IconKind::Ico => {
                let frames = ICO_SIZES
                    .iter()
                    .map(|&size| {
                        let png = render_sized(
                            &bitmap,
                            size,
                            padding,
                            Background::for_png(options),
                            spec.file_name,
                        )?;
                        Ok(IcoFrame::square(size, png))
                    })
                    .collect::<Result<Vec<_>>>()?;
                ico::encode(&frames)?
            }
        };

        tracing::debug!("rendered {} ({} bytes)", spec.file_name, bytes.len());
        outputs.push((spec.file_name, bytes));
    }

    outputs.push((MANIFEST_FILE, manifest::build(options)?.into_bytes()));
    Ok(outputs)
}

#[cfg(feature = "http")]
fn default_fetcher() -> Box<dyn Fetch> {
    match crate::fetch::HttpFetcher::new() {
        Ok(fetcher) => Box::new(fetcher),
        Err(e) => {
            tracing::warn!("remote sources are disabled: {}", e);
            Box::new(NoFetch)
        }
    }
}

#[cfg(not(feature = "http"))]
fn default_fetcher() -> Box<dyn Fetch> {
    Box::new(NoFetch)
}

#[cfg(feature = "twemoji")]
fn default_glyphs() -> Box<dyn GlyphSource> {
    Box::new(crate::glyph::TwemojiAssets)
}

#[cfg(not(feature = "twemoji"))]
fn default_glyphs() -> Box<dyn GlyphSource> {
    Box::new(crate::glyph::NoGlyphs)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use image::{Rgba, RgbaImage};
    use serde_json::Value;

    use super::*;
    use crate::color::HexColor;
    use crate::compositor::encode_png;
    use crate::fetch::{ContainerResolver, FetchError};
    use crate::glyph::NoGlyphs;
    use crate::ico::read_entries;
    use crate::raster::UnsupportedRasterizer;

    const EXPECTED_FILES: [&str; 9] = [
        "favicon.svg",
        "favicon-96x96.png",
        "apple-touch-icon.png",
        "icon-192.png",
        "icon-512.png",
        "icon-192-maskable.png",
        "icon-512-maskable.png",
        "favicon.ico",
        "site.webmanifest",
    ];

    const ICON_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path fill="currentColor" d="M2 2h20v20H2z"/></svg>"#;

    fn png_fixture(size: u32) -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(size, size, Rgba([200, 30, 30, 255])), "fixture").unwrap()
    }

    fn offline(dir: &Path) -> FaviconGenerator {
        FaviconGenerator::new(dir)
            .with_fetcher(NoFetch)
            .with_glyphs(NoGlyphs)
    }

    fn png_size(path: &Path) -> (u32, u32) {
        let img = image::open(path).unwrap();
        (img.width(), img.height())
    }

    struct StaticFetch(Vec<u8>);

    impl Fetch for StaticFetch {
        fn fetch(&self, _url: &str, timeout: Duration) -> std::result::Result<Vec<u8>, FetchError> {
            assert_eq!(timeout, SOURCE_FETCH_TIMEOUT);
            Ok(self.0.clone())
        }
    }

    struct StaticGlyph;

    impl GlyphSource for StaticGlyph {
        fn lookup(&self, _emoji: &str) -> Option<String> {
            Some(
                r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 36 36"><circle cx="18" cy="18" r="18" fill="#ffcc4d"/></svg>"##
                    .to_string(),
            )
        }
    }

    #[test]
    fn raster_source_produces_full_set() {
        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("logo.png");
        fs::write(&source_path, png_fixture(512)).unwrap();
        let out = dir.path().join("public");

        let files = offline(&out)
            .generate(
                &SourceDescriptor::from_location(source_path.to_string_lossy()),
                &GenerationOptions::new("My Test Website"),
            )
            .unwrap();

        assert_eq!(files.file_names().collect::<Vec<_>>(), EXPECTED_FILES);
        for path in files.iter() {
            assert!(path.is_file(), "{} missing", path.display());
        }

        assert_eq!(png_size(&out.join("favicon-96x96.png")), (96, 96));
        assert_eq!(png_size(&out.join("apple-touch-icon.png")), (180, 180));
        assert_eq!(png_size(&out.join("icon-512-maskable.png")), (512, 512));

        let ico = fs::read(out.join("favicon.ico")).unwrap();
        assert_eq!(&ico[..6], &[0, 0, 1, 0, 3, 0]);
        let sizes: Vec<_> = read_entries(&ico).unwrap().iter().map(|e| e.width).collect();
        assert_eq!(sizes, [16, 32, 48]);

        let svg = fs::read_to_string(out.join("favicon.svg")).unwrap();
        assert!(svg.contains("data:image/png;base64,"));

        let manifest: Value =
            serde_json::from_str(&fs::read_to_string(out.join("site.webmanifest")).unwrap()).unwrap();
        assert_eq!(manifest["short_name"], "My Test Webs");
        assert_eq!(manifest["icons"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn maskable_has_opaque_corners() {
        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("logo.png");
        fs::write(&source_path, png_fixture(512)).unwrap();

        offline(dir.path())
            .generate(
                &SourceDescriptor::AssetPath(source_path.to_string_lossy().into_owned()),
                &GenerationOptions::new("App"),
            )
            .unwrap();

        let plain = image::open(dir.path().join("icon-192.png")).unwrap().to_rgba8();
        let maskable = image::open(dir.path().join("icon-192-maskable.png")).unwrap().to_rgba8();
        assert_eq!(plain.get_pixel(0, 0)[3], 255);
        assert_eq!(maskable.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(maskable.get_pixel(96, 96).0, [200, 30, 30, 255]);
    }

    #[test]
    fn svg_source_is_themed_and_rasterized() {
        let dir = tempfile::tempdir().unwrap();
        let assets = dir.path().join("assets");
        fs::create_dir_all(&assets).unwrap();
        fs::write(assets.join("logo.svg"), ICON_SVG).unwrap();
        let out = dir.path().join("out");

        let generator = offline(&out).with_assets(ContainerResolver::new().with_container("assets", &assets));
        let options = GenerationOptions::new("App").with_padding(10);
        generator
            .generate(&SourceDescriptor::AssetPath("assets::logo.svg".into()), &options)
            .unwrap();

        let svg = fs::read_to_string(out.join("favicon.svg")).unwrap();
        assert!(svg.contains("@media (prefers-color-scheme: dark)"));
        assert!(svg.contains("invert(1)"));
        assert!(svg.contains(r#"<g transform="translate(2.4,2.4) scale(0.8)">"#));

        let icon = image::open(out.join("icon-512.png")).unwrap().to_rgba8();
        assert_eq!(icon.get_pixel(256, 256).0, [0, 0, 0, 255]);
        assert_eq!(icon.get_pixel(5, 5)[3], 0);
    }

    #[test]
    fn svg_source_rejected_without_vector_support() {
        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("logo.svg");
        fs::write(&source_path, ICON_SVG).unwrap();
        let out = dir.path().join("out");

        let generator = offline(&out).with_rasterizer(UnsupportedRasterizer);
        assert!(!generator.can_process_svg());

        let err = generator
            .generate(
                &SourceDescriptor::from_location(source_path.to_string_lossy()),
                &GenerationOptions::new("App"),
            )
            .unwrap_err();
        assert!(matches!(err, FaviconError::SvgUnsupported));
        assert!(!out.exists());
    }

    #[test]
    fn remote_source_uses_fetcher() {
        let dir = tempfile::tempdir().unwrap();
        let generator = FaviconGenerator::new(dir.path())
            .with_fetcher(StaticFetch(png_fixture(600)))
            .with_glyphs(NoGlyphs);

        let files = generator
            .generate(
                &SourceDescriptor::from_location("https://cdn.test/logo"),
                &GenerationOptions::new("App"),
            )
            .unwrap();
        assert_eq!(files.len(), 9);
    }

    #[test]
    fn remote_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");

        let err = offline(&out)
            .generate(
                &SourceDescriptor::from_location("https://cdn.test/logo.png"),
                &GenerationOptions::new("App"),
            )
            .unwrap_err();

        assert!(matches!(err, FaviconError::RemoteFetch { ref url, .. } if url == "https://cdn.test/logo.png"));
        assert!(!out.exists());
    }

    #[test]
    fn missing_source_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = offline(dir.path())
            .generate(
                &SourceDescriptor::AssetPath("media/nope.png".into()),
                &GenerationOptions::new("App"),
            )
            .unwrap_err();
        assert!(matches!(err, FaviconError::SourceNotFound { .. }));
    }

    #[test]
    fn corrupt_source_leaves_directory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("broken.png");
        fs::write(&source_path, b"not an image").unwrap();
        let out = dir.path().join("out");

        let err = offline(&out)
            .generate(
                &SourceDescriptor::from_location(source_path.to_string_lossy()),
                &GenerationOptions::new("App"),
            )
            .unwrap_err();
        assert!(matches!(err, FaviconError::Decode { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn failed_write_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("logo.png");
        fs::write(&source_path, png_fixture(64)).unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(out.join("favicon-96x96.png")).unwrap();

        let err = offline(&out)
            .generate(
                &SourceDescriptor::from_location(source_path.to_string_lossy()),
                &GenerationOptions::new("App"),
            )
            .unwrap_err();

        assert!(matches!(err, FaviconError::Io(_)));
        // Files before the failing one stay behind.
        assert!(out.join("favicon.svg").is_file());
        assert!(!out.join("site.webmanifest").exists());
    }

    #[test]
    fn validation_happens_first() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");

        let err = offline(&out)
            .generate(&SourceDescriptor::Text("A".into()), &GenerationOptions::default())
            .unwrap_err();
        assert!(matches!(err, FaviconError::Validation(_)));

        let err = offline(&out)
            .generate(&SourceDescriptor::Text("TOOLONG".into()), &GenerationOptions::new("App"))
            .unwrap_err();
        assert!(matches!(err, FaviconError::Validation(_)));
        assert!(!out.exists());
    }

    #[test]
    fn emoji_without_glyph_uses_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let files = offline(dir.path())
            .generate(&SourceDescriptor::Emoji("🦆".into()), &GenerationOptions::new("Duck"))
            .unwrap();
        assert_eq!(files.len(), 9);

        let svg = fs::read_to_string(dir.path().join("favicon.svg")).unwrap();
        assert!(svg.contains(">🦆</text>"));

        let icon = image::open(dir.path().join("icon-512.png")).unwrap().to_rgba8();
        assert_eq!(icon.get_pixel(256, 256).0, [0x4f, 0x46, 0xe5, 255]);
        assert_eq!(icon.get_pixel(3, 3)[3], 0);
    }

    #[test]
    fn emoji_with_glyph_uses_artwork() {
        let dir = tempfile::tempdir().unwrap();
        let options = GenerationOptions::new("Sun").with_background(HexColor::WHITE, HexColor::BLACK);

        offline(dir.path())
            .with_glyphs(StaticGlyph)
            .generate(&SourceDescriptor::Emoji("🌞".into()), &options)
            .unwrap();

        let svg = fs::read_to_string(dir.path().join("favicon.svg")).unwrap();
        assert!(svg.contains(r##"fill="#ffcc4d""##));
        assert!(svg.contains(r#"<rect class="favicon-bg" x="0" y="0" width="36" height="36"/>"#));

        let icon = image::open(dir.path().join("icon-192.png")).unwrap().to_rgba8();
        assert_eq!(icon.get_pixel(96, 96).0, [0xff, 0xcc, 0x4d, 255]);
        assert_eq!(icon.get_pixel(1, 1).0, [255, 255, 255, 255]);
    }

    #[test]
    fn text_source_uses_text_svg() {
        let dir = tempfile::tempdir().unwrap();
        offline(dir.path())
            .generate(&SourceDescriptor::Text("AB".into()), &GenerationOptions::new("App"))
            .unwrap();

        let svg = fs::read_to_string(dir.path().join("favicon.svg")).unwrap();
        assert!(svg.contains(r#"font-size="55""#));
        assert!(svg.contains(">AB</text>"));

        // The background square fills the whole bitmap.
        let icon = image::open(dir.path().join("apple-touch-icon.png")).unwrap().to_rgba8();
        assert_eq!(icon.get_pixel(2, 2).0, [0x4f, 0x46, 0xe5, 255]);
    }

    #[test]
    fn regenerate_overwrites_and_clear_removes() {
        let dir = tempfile::tempdir().unwrap();
        let generator = offline(dir.path());
        let options = GenerationOptions::new("App");

        generator.generate(&SourceDescriptor::Text("A".into()), &options).unwrap();
        generator.generate(&SourceDescriptor::Text("B".into()), &options).unwrap();
        let svg = fs::read_to_string(dir.path().join("favicon.svg")).unwrap();
        assert!(svg.contains(">B</text>"));

        fs::write(dir.path().join("robots.txt"), "keep").unwrap();
        let removed = generator.clear().unwrap();
        assert_eq!(removed.len(), 9);
        assert!(!generator.exists("favicon.ico"));
        assert!(dir.path().join("robots.txt").exists());
        assert!(generator.clear().unwrap().is_empty());
    }
}
