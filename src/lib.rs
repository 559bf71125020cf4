//! favicon-generator: favicon and app icon sets from one source
//!
//! This crate turns a single source (an image file, a remote URL, an emoji or
//! up to four characters of text) into the files a website needs:
//!
//! - `favicon.svg` with dark-mode styling
//! - `favicon-96x96.png`, `apple-touch-icon.png`, `icon-192.png`, `icon-512.png`
//! - Android maskable variants `icon-192-maskable.png` and `icon-512-maskable.png`
//! - a 16/32/48 px `favicon.ico`
//! - `site.webmanifest`
//!
//! # Example
//!
//! ```no_run
//! use favicon_generator::{
//!     DarkModeStyle, FaviconGenerator, GenerationOptions, HexColor, SourceDescriptor,
//! };
//!
//! let options = GenerationOptions::new("My Site")
//!     .with_padding(10)
//!     .with_dark_mode(DarkModeStyle::Custom, HexColor::new(0xfa, 0xcc, 0x15));
//!
//! let files = FaviconGenerator::new("public")
//!     .generate(&SourceDescriptor::Emoji("🦆".into()), &options)?;
//!
//! for path in files.iter() {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), favicon_generator::FaviconError>(())
//! ```
//!
//! # Collaborators
//!
//! Remote downloads, asset lookup and emoji artwork are injected through the
//! [`Fetch`], [`AssetResolver`] and [`GlyphSource`] traits. The vector
//! rasterizer is a [`VectorRasterizer`] strategy; [`UnsupportedRasterizer`]
//! makes the generator reject SVG sources up front.
//!
//! # Settings and head tags
//!
//! [`SettingsDocument`] persists the last-used options as JSON, and
//! [`HeadTags`] renders the matching `<link>`/`<meta>` block.

mod color;
mod error;
mod generator;
mod head;
mod icon;
mod options;
mod settings;
mod source;

pub mod compositor;
pub mod fetch;
pub mod glyph;
pub mod ico;
pub mod manifest;
pub mod raster;
pub mod svg;

pub use color::{HexColor, Hsl, hex_to_rgb, rgb_to_hsl};
pub use error::{FaviconError, Result, ValidationError};
pub use fetch::{
    AssetResolver, ContainerResolver, Fetch, FetchError, NoAssets, NoFetch, ResolvedAsset,
};
#[cfg(feature = "http")]
pub use fetch::HttpFetcher;
pub use generator::{FaviconGenerator, GeneratedFileSet};
pub use glyph::{GlyphSource, NoGlyphs, TwemojiCdn};
#[cfg(feature = "twemoji")]
pub use glyph::TwemojiAssets;
pub use head::HeadTags;
pub use icon::{
    CATALOGUE, CanonicalBitmap, ICO_SIZES, IconKind, IconSizeSpec, SizePx, output_file_names,
};
pub use manifest::{ManifestDocument, ManifestIcon};
pub use options::{DarkModeStyle, GenerationOptions, MAX_PADDING, TextFont, TextWeight};
pub use raster::{Rasterizer, ResvgRasterizer, UnsupportedRasterizer, VectorRasterizer};
pub use settings::SettingsDocument;
pub use source::{MAX_TEXT_CHARS, SourceDescriptor};
