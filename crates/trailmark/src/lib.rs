//! Trailmark application services.
//!
//! This is the umbrella crate of the Trailmark GUI. It re-exports the core and
//! style crates and adds the services the application runs on:
//!
//! - [`file`]: file helpers and installation of bundled user data
//! - [`settings`]: the persistent settings store and the typed application
//!   settings on top of it
//! - [`resources`]: where bundled resources and user data live
//! - [`fonts`]: loading the bundled fonts
//! - [`path_detector`]: finding system header directories
//! - [`context`]: the [`AppContext`] tying it all together
//!
//! # Example
//!
//! ```no_run
//! use trailmark::{AppContext, ResourcePaths, UserPaths};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = AppContext::init(ResourcePaths::from_executable()?, UserPaths::new()?)?;
//!     let css = context.load_style_sheet("main/main.css");
//!     println!("{css}");
//!     context.teardown()?;
//!     Ok(())
//! }
//! ```

pub use trailmark_core::*;

/// Stylesheet templates, colors and icons.
pub mod style {
    pub use trailmark_style::*;
}

pub mod context;
pub mod file;
pub mod fonts;
pub mod path_detector;
pub mod resources;
pub mod settings;

mod error;

pub use context::AppContext;
pub use error::{Error, Result};
pub use resources::{ResourcePaths, UserPaths};
pub use settings::{ApplicationSettings, Settings};
