//! Color schemes.
//!
//! A color scheme maps semantic keys such as `text/primary` or
//! `search/field/background` to concrete color strings. Schemes are stored as
//! TOML where nested tables form the key path:
//!
//! ```toml
//! [text]
//! primary = "#202020"
//!
//! [search.field]
//! background = "#FFFFFF"
//! ```
//!
//! yields the keys `text/primary` and `search/field/background`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use trailmark_core::logging::targets;

use crate::template::ColorSource;
use crate::{Color, Error, Result};

/// Value returned for keys the scheme does not define.
pub const DEFAULT_COLOR: &str = "#FFFFFF";

/// A flat mapping from `/` separated keys to color strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorScheme {
    colors: HashMap<String, String>,
    source_path: Option<PathBuf>,
}

impl ColorScheme {
    /// Create an empty scheme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a scheme from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let mut scheme = Self::parse_toml(&content, &path.display().to_string())?;
        scheme.source_path = Some(path.to_path_buf());
        tracing::debug!(
            target: targets::COLOR_SCHEME,
            path = %path.display(),
            colors = scheme.len(),
            "loaded color scheme"
        );
        Ok(scheme)
    }

    /// Parse a scheme from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse_toml(content, "<inline>")
    }

    fn parse_toml(content: &str, source_name: &str) -> Result<Self> {
        let table: toml::Table = content
            .parse()
            .map_err(|e: toml::de::Error| Error::color_scheme(source_name, e.message()))?;

        let mut colors = HashMap::new();
        flatten_table(&table, "", &mut colors);
        Ok(Self {
            colors,
            source_path: None,
        })
    }

    /// Set a color value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.colors.insert(key.into(), value.into());
    }

    /// The stored value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.colors.get(key).map(|s| s.as_str())
    }

    /// Check if a key is defined.
    pub fn contains(&self, key: &str) -> bool {
        self.colors.contains_key(key)
    }

    /// The color string for `key`, or [`DEFAULT_COLOR`] if it is undefined.
    pub fn color(&self, key: &str) -> String {
        match self.get(key) {
            Some(value) => value.to_string(),
            None => {
                tracing::warn!(
                    target: targets::COLOR_SCHEME,
                    key,
                    "color not defined in scheme, using {}",
                    DEFAULT_COLOR
                );
                DEFAULT_COLOR.to_string()
            }
        }
    }

    /// The parsed color for `key`. Undefined keys parse the default.
    pub fn parsed_color(&self, key: &str) -> Result<Color> {
        Color::parse(&self.color(key))
    }

    /// Number of defined keys.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if the scheme is empty.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Iterate over all keys and values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.colors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The file this scheme was loaded from.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
}

impl ColorSource for ColorScheme {
    fn color(&self, key: &str) -> String {
        ColorScheme::color(self, key)
    }
}

fn flatten_table(table: &toml::Table, prefix: &str, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}/{key}")
        };

        match value {
            toml::Value::Table(inner) => flatten_table(inner, &path, out),
            toml::Value::String(s) => {
                out.insert(path, s.clone());
            }
            toml::Value::Integer(i) => {
                out.insert(path, i.to_string());
            }
            toml::Value::Float(f) => {
                out.insert(path, f.to_string());
            }
            toml::Value::Boolean(b) => {
                out.insert(path, b.to_string());
            }
            toml::Value::Array(_) | toml::Value::Datetime(_) => {
                tracing::debug!(target: targets::COLOR_SCHEME, key = %path, "skipping non-scalar color entry");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEME: &str = r##"
        [window]
        background = "#F0F0F0"

        [text]
        primary = "#202020"

        [search.field]
        background = "#FFFFFF"
        border_width = 1
    "##;

    #[test]
    fn nested_tables_flatten_to_paths() {
        let scheme = ColorScheme::from_toml_str(SCHEME).unwrap();
        assert_eq!(scheme.get("window/background"), Some("#F0F0F0"));
        assert_eq!(scheme.get("text/primary"), Some("#202020"));
        assert_eq!(scheme.get("search/field/background"), Some("#FFFFFF"));
        assert_eq!(scheme.get("search/field/border_width"), Some("1"));
        assert_eq!(scheme.len(), 4);
    }

    #[test]
    fn unknown_key_yields_default() {
        let scheme = ColorScheme::from_toml_str(SCHEME).unwrap();
        assert_eq!(scheme.color("does/not/exist"), DEFAULT_COLOR);
        assert_eq!(scheme.parsed_color("does/not/exist").unwrap(), Color::WHITE);
    }

    #[test]
    fn set_overrides() {
        let mut scheme = ColorScheme::new();
        scheme.set("text/primary", "#000000");
        assert!(scheme.contains("text/primary"));
        assert_eq!(scheme.color("text/primary"), "#000000");
    }

    #[test]
    fn invalid_toml_is_reported() {
        let err = ColorScheme::from_toml_str("[text\nprimary =").unwrap_err();
        assert!(matches!(err, Error::ColorScheme { .. }));
    }

    #[test]
    fn load_remembers_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bright.toml");
        std::fs::write(&path, SCHEME).unwrap();

        let scheme = ColorScheme::load(&path).unwrap();
        assert_eq!(scheme.source_path(), Some(path.as_path()));
        assert_eq!(scheme.color("text/primary"), "#202020");
    }
}
