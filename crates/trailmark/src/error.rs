//! Application error type.

use trailmark_core::CoreError;

use crate::file::FileError;

/// Errors surfaced by the application services.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error(transparent)]
    File(#[from] FileError),

    /// Resolving a stylesheet or loading colors failed.
    #[error(transparent)]
    Style(#[from] trailmark_style::Error),

    /// Setting up logging failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for application services.
pub type Result<T> = std::result::Result<T, Error>;
