//! Error types for the favicon pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::fetch::FetchError;

/// Result alias used throughout the crate.
pub type Result<T, E = FaviconError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum FaviconError {
    #[error("the source {} could not be found locally or through the asset resolver", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("failed to decode {source_name}: {reason}")]
    Decode { source_name: String, reason: String },

    #[error("failed to fetch {url}: {source}")]
    RemoteFetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to encode {variant}: {reason}")]
    Encoding { variant: String, reason: String },

    #[error("SVG sources cannot be processed: no vector rasterizer is available")]
    SvgUnsupported,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("an I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("an error occurred while reading or writing the settings document: {0}")]
    Settings(#[from] serde_json::Error),
}

impl FaviconError {
    pub(crate) fn decode(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn encoding(variant: impl Into<String>, reason: impl ToString) -> Self {
        Self::Encoding {
            variant: variant.into(),
            reason: reason.to_string(),
        }
    }
}

/// Rejections raised before the pipeline touches the filesystem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be a 6-digit hex color like #4f46e5, got {value:?}")]
    InvalidColor { field: &'static str, value: String },

    #[error("app_name is required")]
    MissingAppName,

    #[error("app_short_name must be at most 12 characters, got {len}")]
    ShortNameTooLong { len: usize },

    #[error("the source is empty")]
    EmptySource,

    #[error("text sources are limited to 4 characters, got {len}")]
    TextTooLong { len: usize },

    #[error("an emoji source must be a single grapheme cluster, got {clusters}")]
    InvalidEmoji { clusters: usize },
}
