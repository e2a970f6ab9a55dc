//! Stylesheet templates and colors for Trailmark.
//!
//! This crate turns stylesheet templates into the stylesheets the GUI applies:
//!
//! - **Templates**: `<category:argument>` directives resolved against settings,
//!   the color scheme and the current platform
//! - **Color schemes**: TOML files mapping semantic keys to colors
//! - **Icons**: single-color masks painted with scheme colors
//! - **Hot Reload**: re-resolve templates when they change on disk
//!
//! # Example
//!
//! ```ignore
//! use trailmark_style::prelude::*;
//!
//! let colors = ColorScheme::load("data/color_schemes/bright.toml")?;
//! let resolver = StyleTemplateResolver::new(&settings, &colors);
//! let sheet = StyleSheet::from_file("data/gui/main/main.css", &resolver)?;
//! ```

pub mod color;
pub mod color_scheme;
pub mod icon;
pub mod stylesheet;
pub mod template;

#[cfg(feature = "hot-reload")]
pub mod hot_reload;

mod error;

pub use color::Color;
pub use color_scheme::{ColorScheme, DEFAULT_COLOR};
pub use error::{Error, Result, SyntaxReason};
pub use icon::{ButtonIcon, colorize};
pub use stylesheet::StyleSheet;
pub use template::{ColorSource, FixedStyleSettings, StyleSettings, StyleTemplateResolver};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::color_scheme::ColorScheme;
    pub use crate::icon::ButtonIcon;
    pub use crate::stylesheet::StyleSheet;
    pub use crate::template::{ColorSource, FixedStyleSettings, StyleSettings, StyleTemplateResolver};
    pub use crate::{Error, Result};

    #[cfg(feature = "hot-reload")]
    pub use crate::hot_reload::StylesheetWatcher;
}
