//! The persisted settings document.
//!
//! One JSON object holding the last-used options (flattened, so the option
//! keys sit at the top level), the source, and the time of the last run.

use std::fs;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::options::GenerationOptions;
use crate::source::SourceDescriptor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsDocument {
    #[serde(flatten)]
    pub options: GenerationOptions,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceDescriptor>,

    /// Unix timestamp (seconds) of the last successful generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<u64>,
}

impl SettingsDocument {
    pub fn new(options: GenerationOptions) -> Self {
        Self {
            options,
            source: None,
            generated_at: None,
        }
    }

    pub fn with_source(mut self, source: SourceDescriptor) -> Self {
        self.source = Some(source);
        self
    }

    /// Loads the document at `path`. A missing file yields `None`.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Writes the document as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::debug!("saved settings to {}", path.display());
        Ok(())
    }

    /// Stamps the document with the current time.
    pub fn mark_generated(&mut self) {
        self.generated_at = Some(unix_now());
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HexColor;
    use crate::error::FaviconError;

    #[test]
    fn options_are_flattened() {
        let doc = SettingsDocument::new(GenerationOptions::new("Site"))
            .with_source(SourceDescriptor::Emoji("🦆".into()));
        let json: serde_json::Value = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["app_name"], "Site");
        assert_eq!(json["theme_color"], "#4f46e5");
        assert_eq!(json["source"]["type"], "emoji");
        assert!(json.get("generated_at").is_none());
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content/favicon-generator.json");

        let mut doc = SettingsDocument::new(
            GenerationOptions::new("Site").with_dark_mode(Default::default(), HexColor::new(1, 2, 3)),
        );
        doc.mark_generated();
        doc.save(&path).unwrap();

        let loaded = SettingsDocument::load(&path).unwrap().unwrap();
        assert_eq!(loaded, doc);
        assert!(loaded.generated_at.unwrap() > 1_600_000_000);
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SettingsDocument::load(dir.path().join("nope.json")).unwrap().is_none());
    }

    #[test]
    fn bad_color_is_settings_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "app_name": "A", "theme_color": "blue" }"#).unwrap();

        let err = SettingsDocument::load(&path).unwrap_err();
        assert!(matches!(err, FaviconError::Settings(_)));
    }
}
