//! Stylesheet templates.
//!
//! Stylesheets are written as templates: plain stylesheet text with embedded
//! directives of the form `<category:argument>`. Resolving a template replaces
//! every directive with a value taken from the application:
//!
//! | directive | value |
//! |---|---|
//! | `<setting:font_size>` | base font size |
//! | `<setting:font_size+2>` | base font size plus 2 (also `-`, `*`, `/`) |
//! | `<setting:font_name>` | configured font family |
//! | `<setting:gui_path>` | GUI resource directory, each `\` replaced by `/` |
//! | `<color:text/primary>` | color scheme entry |
//! | `<platform_wml:4px\|2px\|3px>` | value for Windows, macOS, Linux |
//!
//! # Example
//!
//! ```
//! use trailmark_core::OsType;
//! use trailmark_style::{ColorScheme, FixedStyleSettings, StyleTemplateResolver};
//!
//! let settings = FixedStyleSettings::new(12, "Source Code Pro", "/opt/trailmark/data/gui/");
//! let mut colors = ColorScheme::new();
//! colors.set("text/primary", "#202020");
//!
//! let resolver = StyleTemplateResolver::new(&settings, &colors).with_platform(OsType::Linux);
//! let css = resolver
//!     .resolve("QLabel { font-size: <setting:font_size+2>pt; color: <color:text/primary>; }")
//!     .unwrap();
//!
//! assert_eq!(css, "QLabel { font-size: 14pt; color: #202020; }");
//! ```

mod directive;
mod resolver;

use std::path::PathBuf;

pub use resolver::StyleTemplateResolver;

/// Settings a template can read.
pub trait StyleSettings {
    /// Base font size in points.
    fn font_size(&self) -> i32;

    /// Font family name.
    fn font_name(&self) -> String;

    /// Directory holding GUI resources (stylesheets, images).
    ///
    /// Templates append file names directly to `<setting:gui_path>`, so the
    /// path should end with a separator.
    fn gui_path(&self) -> PathBuf;
}

/// Source of `color:` directive values.
pub trait ColorSource {
    /// The color string stored for `key`.
    ///
    /// What an unknown key yields is up to the implementation.
    fn color(&self, key: &str) -> String;
}

/// [`StyleSettings`] backed by fixed values.
///
/// Handy for previews and tooling that resolve templates outside a running
/// application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedStyleSettings {
    pub font_size: i32,
    pub font_name: String,
    pub gui_path: PathBuf,
}

impl FixedStyleSettings {
    /// Create fixed settings.
    pub fn new(font_size: i32, font_name: impl Into<String>, gui_path: impl Into<PathBuf>) -> Self {
        Self {
            font_size,
            font_name: font_name.into(),
            gui_path: gui_path.into(),
        }
    }
}

impl StyleSettings for FixedStyleSettings {
    fn font_size(&self) -> i32 {
        self.font_size
    }

    fn font_name(&self) -> String {
        self.font_name.clone()
    }

    fn gui_path(&self) -> PathBuf {
        self.gui_path.clone()
    }
}
