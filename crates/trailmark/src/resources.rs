//! Where bundled resources and user data live.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::file::{FileError, FileErrorKind, FileResult};

/// Paths of the resources shipped with the application.
///
/// Everything lives below `<root>/data`:
///
/// ```text
/// data/
/// ├── gui/             stylesheet templates and images
/// ├── fonts/           bundled fonts
/// ├── color_schemes/   color scheme files
/// └── user/            defaults copied into the user data directory
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    root: PathBuf,
}

impl ResourcePaths {
    /// Resources installed below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resources installed next to the running executable.
    pub fn from_executable() -> FileResult<Self> {
        let exe = std::env::current_exe().map_err(FileError::from)?;
        let root = exe
            .parent()
            .ok_or_else(|| FileError::new(FileErrorKind::NotFound, Some(exe.clone()), None))?;
        Ok(Self::new(root))
    }

    /// The installation root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_path(&self) -> PathBuf {
        self.root.join("data")
    }

    /// Stylesheet templates and GUI images, with a trailing separator.
    pub fn gui_path(&self) -> PathBuf {
        self.data_path().join("gui").join("")
    }

    pub fn fonts_path(&self) -> PathBuf {
        self.data_path().join("fonts")
    }

    pub fn color_schemes_path(&self) -> PathBuf {
        self.data_path().join("color_schemes")
    }

    /// Defaults copied into the user data directory on start.
    pub fn user_data_path(&self) -> PathBuf {
        self.data_path().join("user")
    }

    /// Resolve a color scheme setting: relative paths are looked up in
    /// [`color_schemes_path`](Self::color_schemes_path).
    pub fn color_scheme_file(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.color_schemes_path().join(path)
        }
    }
}

/// Per-user directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPaths {
    data: PathBuf,
}

impl UserPaths {
    /// The platform's data directory for this application.
    pub fn new() -> FileResult<Self> {
        let dirs = ProjectDirs::from("io", "Trailmark", "Trailmark").ok_or_else(|| {
            FileError::new(
                FileErrorKind::NotFound,
                None,
                Some(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "could not determine application directories",
                )),
            )
        })?;
        Ok(Self::in_directory(dirs.data_dir()))
    }

    /// User data stored in `data`, for portable installs and tests.
    pub fn in_directory(data: impl Into<PathBuf>) -> Self {
        Self { data: data.into() }
    }

    pub fn data_path(&self) -> &Path {
        &self.data
    }

    pub fn settings_file(&self) -> PathBuf {
        self.data.join("settings.toml")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data.join("log")
    }
}
