//! The APK catalog (`data/apks.json`): one entry per packaged app.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// One Android application listed in the catalog (e.g. `data/apks.json`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Stable identifier (e.g. "`org.example.app`"). The packaged app id is
    /// derived from it.
    pub id: String,

    /// Display name shown in the desktop entry and `AppStream` metadata.
    pub name: String,

    /// One-line description.
    pub summary: String,

    /// SPDX-style license identifier of the upstream project.
    pub license: String,

    /// URL of the APK to package.
    pub apk_file: String,

    /// URL of the source icon image.
    pub icon: String,

    /// Optional donation page.
    #[serde(default)]
    pub donations: Option<String>,

    /// Optional translation platform page.
    #[serde(default)]
    pub translations: Option<String>,

    /// Upstream source repository. Informational only.
    #[serde(default)]
    pub repo: Option<String>,

    /// Regenerate the output even when it already exists.
    #[serde(default, rename = "shouldUpdate")]
    pub should_update: Option<bool>,
}

impl CatalogEntry {
    /// Whether this entry asks to be regenerated regardless of existing output.
    pub fn forces_update(&self) -> bool {
        self.should_update.unwrap_or(false)
    }
}

/// Errors that can occur when loading a [`Catalog`].
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Read {
        /// Path that was being read.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The catalog is not a JSON array of entries.
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The ordered list of applications to package.
///
/// The catalog is loaded once and passed explicitly to the pipeline, so tests
/// can build one in memory with [`Catalog::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Wrap an already materialized list of entries.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parse a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if `json` is not an array of entries.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// Read and parse a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Read`] if the file cannot be read, or
    /// [`CatalogError::Parse`] if its content is malformed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// All entries, in catalog order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only the entry whose id equals `id`.
    pub fn retain_id(&mut self, id: &str) {
        self.entries.retain(|e| e.id == id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "name": "Foo App",
            "repo": "https://example.com/foo",
            "license": "MIT",
            "apk_file": "https://example.com/foo.apk",
            "donations": null,
            "id": "org.example.foo",
            "summary": "Does foo",
            "translations": "https://example.com/translate",
            "icon": "https://example.com/foo.png"
        },
        {
            "name": "Bar",
            "license": "GPL-3.0-or-later",
            "apk_file": "https://example.com/bar.apk",
            "id": "org.example.bar",
            "summary": "Does bar",
            "icon": "https://example.com/bar.png",
            "shouldUpdate": true
        }
    ]"#;

    #[test]
    fn test_parse_catalog_preserves_order_and_optionals() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);

        let foo = &catalog.entries()[0];
        assert_eq!(foo.id, "org.example.foo");
        assert_eq!(foo.donations, None);
        assert_eq!(
            foo.translations.as_deref(),
            Some("https://example.com/translate")
        );
        assert!(!foo.forces_update());

        let bar = &catalog.entries()[1];
        assert_eq!(bar.repo, None);
        assert!(bar.forces_update());
    }

    #[test]
    fn test_malformed_catalog_is_error() {
        let err = Catalog::from_json(r#"{"id": "not-an-array"}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load(&dir.path().join("apks.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[test]
    fn test_load_and_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apks.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let mut catalog = Catalog::load(&path).unwrap();
        catalog.retain_id("org.example.bar");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].name, "Bar");
    }
}
