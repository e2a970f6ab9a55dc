//! Resolved stylesheets.

use std::path::{Path, PathBuf};

use trailmark_core::logging::targets;

use crate::template::StyleTemplateResolver;
use crate::Result;

/// A stylesheet whose template directives have all been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    source_path: Option<PathBuf>,
    text: String,
}

impl StyleSheet {
    /// Load a template file and resolve it.
    pub fn from_file(path: impl AsRef<Path>, resolver: &StyleTemplateResolver<'_>) -> Result<Self> {
        let path = path.as_ref();
        let text = resolver.resolve_file(path)?;
        tracing::info!(target: targets::TEMPLATE, "Loaded stylesheet: {}", path.display());

        Ok(Self {
            source_path: Some(path.to_path_buf()),
            text,
        })
    }

    /// Resolve template text. `name` identifies it in errors.
    pub fn from_template(name: &str, template: &str, resolver: &StyleTemplateResolver<'_>) -> Result<Self> {
        Ok(Self {
            source_path: None,
            text: resolver.resolve_named(name, template)?,
        })
    }

    /// The file the stylesheet was loaded from.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// The resolved stylesheet text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the stylesheet, returning its text.
    pub fn into_text(self) -> String {
        self.text
    }

    /// Check if the resolved text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::FixedStyleSettings;
    use crate::ColorScheme;
    use trailmark_core::OsType;

    #[test]
    fn from_file_keeps_source_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.css");
        std::fs::write(&path, "QWidget { margin: <platform_wml:1px|2px|3px>; }").unwrap();

        let settings = FixedStyleSettings::new(10, "Fira Sans", "/gui");
        let colors = ColorScheme::new();
        let resolver = StyleTemplateResolver::new(&settings, &colors).with_platform(OsType::Mac);

        let sheet = StyleSheet::from_file(&path, &resolver).unwrap();
        assert_eq!(sheet.source_path(), Some(path.as_path()));
        assert_eq!(sheet.text(), "QWidget { margin: 2px; }");
    }

    #[test]
    fn from_template_has_no_path() {
        let settings = FixedStyleSettings::new(10, "Fira Sans", "/gui");
        let colors = ColorScheme::new();
        let resolver = StyleTemplateResolver::new(&settings, &colors);

        let sheet = StyleSheet::from_template("inline", "", &resolver).unwrap();
        assert!(sheet.is_empty());
        assert!(sheet.source_path().is_none());
        assert_eq!(sheet.into_text(), "");
    }
}
