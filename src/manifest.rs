//! The `site.webmanifest` document.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::icon::{IconSizeSpec, manifest_specs};
use crate::options::GenerationOptions;

/// A web app manifest, serialized with keys in this field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestDocument {
    pub name: String,
    pub short_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_url: String,
    pub scope: String,
    pub display: String,
    pub orientation: String,
    pub theme_color: String,
    pub background_color: String,
    pub icons: Vec<ManifestIcon>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

impl ManifestIcon {
    fn from_spec(spec: &IconSizeSpec) -> Self {
        Self {
            src: format!("/{}", spec.file_name),
            sizes: spec.sizes_attr(),
            mime_type: "image/png".to_string(),
            purpose: spec.is_maskable().then(|| "maskable".to_string()),
        }
    }
}

impl ManifestDocument {
    /// Builds the manifest for `options` with the given icons.
    pub fn new<'a>(
        options: &GenerationOptions,
        icons: impl IntoIterator<Item = &'a IconSizeSpec>,
    ) -> Self {
        Self {
            name: options.app_name.clone(),
            short_name: options.short_name(),
            description: options.description().map(str::to_string),
            start_url: "/".to_string(),
            scope: "/".to_string(),
            display: "standalone".to_string(),
            orientation: "any".to_string(),
            theme_color: options.theme_color.to_string(),
            background_color: options.background_color.to_string(),
            icons: icons.into_iter().map(ManifestIcon::from_spec).collect(),
        }
    }

    /// Pretty-printed JSON. `serde_json` never escapes forward slashes.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The manifest for a standard run: 192/512 PNGs then their maskable variants.
pub fn build(options: &GenerationOptions) -> Result<String> {
    ManifestDocument::new(options, manifest_specs()).to_json_pretty()
}
