//! HTML `<head>` tags for a generated favicon set.

use std::collections::BTreeSet;
use std::path::Path;

use crate::color::HexColor;
use crate::icon::{ICO_FILE, MANIFEST_FILE, SVG_FILE, output_file_names};
use crate::settings::SettingsDocument;
use crate::svg::escape_xml;

const PNG_96_FILE: &str = "favicon-96x96.png";
const APPLE_TOUCH_FILE: &str = "apple-touch-icon.png";

/// Renders `<link>` and `<meta>` tags.
///
/// Links are only emitted for files that are present. With a cache buster,
/// every link carries `?v=<generated_at>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadTags {
    theme_color: HexColor,
    app_name: String,
    present: BTreeSet<String>,
    version: Option<u64>,
}

impl HeadTags {
    pub fn new(theme_color: HexColor, app_name: impl Into<String>) -> Self {
        Self {
            theme_color,
            app_name: app_name.into(),
            present: BTreeSet::new(),
            version: None,
        }
    }

    /// Tags for a persisted settings document, without any files yet.
    pub fn from_settings(settings: &SettingsDocument) -> Self {
        Self::new(settings.options.theme_color, settings.options.app_name.clone())
    }

    /// Marks the given output files as present.
    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.present.extend(files.into_iter().map(Into::into));
        self
    }

    /// Marks every well-known output file found in `dir` as present.
    pub fn scan(self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let found = output_file_names().filter(|name| dir.join(name).is_file());
        self.with_files(found)
    }

    /// Appends `?v=<version>` to every link.
    pub fn with_cache_buster(mut self, version: Option<u64>) -> Self {
        self.version = version;
        self
    }

    fn has(&self, file: &str) -> bool {
        self.present.contains(file)
    }

    fn href(&self, file: &str) -> String {
        match self.version {
            Some(v) => format!("/{file}?v={v}"),
            None => format!("/{file}"),
        }
    }

    /// The full tag block, one tag per line.
    pub fn render(&self) -> String {
        let mut html = Vec::new();

        if self.has(ICO_FILE) {
            html.push(format!(
                r#"<link rel="icon" href="{}" sizes="32x32">"#,
                self.href(ICO_FILE)
            ));
        }
        if self.has(SVG_FILE) {
            html.push(format!(
                r#"<link rel="icon" href="{}" type="image/svg+xml">"#,
                self.href(SVG_FILE)
            ));
        }
        if self.has(PNG_96_FILE) {
            html.push(format!(
                r#"<link rel="icon" type="image/png" href="{}" sizes="96x96">"#,
                self.href(PNG_96_FILE)
            ));
        }
        if self.has(APPLE_TOUCH_FILE) {
            html.push(format!(
                r#"<link rel="apple-touch-icon" href="{}">"#,
                self.href(APPLE_TOUCH_FILE)
            ));
        }
        let manifest = self.manifest();
        if !manifest.is_empty() {
            html.push(manifest);
        }

        html.push(self.theme_color());

        if !self.app_name.is_empty() {
            html.push(format!(
                r#"<meta name="application-name" content="{}">"#,
                escape_xml(&self.app_name)
            ));
        }
        html.push(self.apple_meta());
        html.push(self.microsoft());

        html.join("\n")
    }

    /// The manifest link, or an empty string when there is no manifest.
    pub fn manifest(&self) -> String {
        if !self.has(MANIFEST_FILE) {
            return String::new();
        }
        format!(r#"<link rel="manifest" href="{}">"#, self.href(MANIFEST_FILE))
    }

    pub fn theme_color(&self) -> String {
        format!(r#"<meta name="theme-color" content="{}">"#, self.theme_color)
    }

    pub fn apple_meta(&self) -> String {
        let mut html = Vec::new();
        if !self.app_name.is_empty() {
            html.push(format!(
                r#"<meta name="apple-mobile-web-app-title" content="{}">"#,
                escape_xml(&self.app_name)
            ));
        }
        html.push(r#"<meta name="apple-mobile-web-app-capable" content="yes">"#.to_string());
        html.push(
            r#"<meta name="apple-mobile-web-app-status-bar-style" content="default">"#.to_string(),
        );
        html.join("\n")
    }

    pub fn microsoft(&self) -> String {
        format!(
            "<meta name=\"msapplication-TileColor\" content=\"{}\">\n<meta name=\"msapplication-config\" content=\"none\">",
            self.theme_color
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GenerationOptions;

    fn tags() -> HeadTags {
        HeadTags::new(HexColor::new(0x4f, 0x46, 0xe5), "Test Site")
    }

    #[test]
    fn only_present_files_are_linked() {
        let html = tags().with_files(["favicon.ico", "site.webmanifest"]).render();

        assert!(html.contains(r#"<link rel="icon" href="/favicon.ico" sizes="32x32">"#));
        assert!(html.contains(r#"<link rel="manifest" href="/site.webmanifest">"#));
        assert!(!html.contains("favicon.svg"));
        assert!(!html.contains("apple-touch-icon.png"));
    }

    #[test]
    fn full_block_order() {
        let html = tags()
            .with_files(output_file_names())
            .with_cache_buster(Some(1700000000))
            .render();

        let lines: Vec<_> = html.lines().collect();
        assert_eq!(
            lines,
            [
                r#"<link rel="icon" href="/favicon.ico?v=1700000000" sizes="32x32">"#,
                r#"<link rel="icon" href="/favicon.svg?v=1700000000" type="image/svg+xml">"#,
                r#"<link rel="icon" type="image/png" href="/favicon-96x96.png?v=1700000000" sizes="96x96">"#,
                r#"<link rel="apple-touch-icon" href="/apple-touch-icon.png?v=1700000000">"#,
                r#"<link rel="manifest" href="/site.webmanifest?v=1700000000">"#,
                r##"<meta name="theme-color" content="#4f46e5">"##,
                r#"<meta name="application-name" content="Test Site">"#,
                r#"<meta name="apple-mobile-web-app-title" content="Test Site">"#,
                r#"<meta name="apple-mobile-web-app-capable" content="yes">"#,
                r#"<meta name="apple-mobile-web-app-status-bar-style" content="default">"#,
                r##"<meta name="msapplication-TileColor" content="#4f46e5">"##,
                r#"<meta name="msapplication-config" content="none">"#,
            ]
        );
    }

    #[test]
    fn app_name_is_escaped_and_optional() {
        let html = HeadTags::new(HexColor::WHITE, r#"Tom & "Jerry""#).render();
        assert!(html.contains(r#"content="Tom &amp; &quot;Jerry&quot;""#));

        let html = HeadTags::new(HexColor::WHITE, "").render();
        assert!(!html.contains("application-name"));
        assert!(!html.contains("apple-mobile-web-app-title"));
    }

    #[test]
    fn manifest_link_empty_without_file() {
        assert_eq!(tags().manifest(), "");
    }

    #[test]
    fn scans_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("favicon.svg"), "<svg/>").unwrap();

        let settings = SettingsDocument::new(GenerationOptions::new("Scanned"));
        let html = HeadTags::from_settings(&settings).scan(dir.path()).render();

        assert!(html.contains(r#"href="/favicon.svg""#));
        assert!(!html.contains("favicon.ico"));
        assert!(html.contains(r#"content="Scanned""#));
    }
}
