//! Error types for file operations.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for file operations.
#[derive(Debug)]
pub struct FileError {
    kind: FileErrorKind,
    path: Option<PathBuf>,
    source: Option<io::Error>,
}

/// The kind of file error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileErrorKind {
    /// File or directory not found.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// File already exists.
    AlreadyExists,
    /// The path is a directory, not a file.
    IsDirectory,
    /// The path is a file, not a directory.
    NotDirectory,
    /// Invalid data or encoding, including malformed settings files.
    InvalidData,
    /// Any other failure.
    Other,
}

impl FileErrorKind {
    fn classify(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::AlreadyExists => Self::AlreadyExists,
            io::ErrorKind::IsADirectory => Self::IsDirectory,
            io::ErrorKind::NotADirectory => Self::NotDirectory,
            io::ErrorKind::InvalidData => Self::InvalidData,
            _ => Self::Other,
        }
    }
}

impl FileError {
    /// Creates a new file error.
    pub fn new(kind: FileErrorKind, path: Option<PathBuf>, source: Option<io::Error>) -> Self {
        Self { kind, path, source }
    }

    /// Creates a file error from an I/O error and path.
    pub fn from_io(err: io::Error, path: impl Into<PathBuf>) -> Self {
        Self {
            kind: FileErrorKind::classify(err.kind()),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Creates a "not found" error for the given path.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(FileErrorKind::NotFound, Some(path.into()), None)
    }

    /// Creates an "invalid data" error for a file that could not be parsed.
    pub fn invalid_data(path: Option<PathBuf>, error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::new(
            FileErrorKind::InvalidData,
            path,
            Some(io::Error::new(io::ErrorKind::InvalidData, error)),
        )
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> FileErrorKind {
        self.kind
    }

    /// Returns the path involved in the error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Returns the underlying I/O error, if any.
    pub fn io_error(&self) -> Option<&io::Error> {
        self.source.as_ref()
    }

    /// Returns true if this error indicates the file was not found.
    pub fn is_not_found(&self) -> bool {
        self.kind == FileErrorKind::NotFound
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.path, &self.source) {
            (Some(path), Some(source)) => write!(f, "{}: {} ({})", self.kind, path.display(), source),
            (Some(path), None) => write!(f, "{}: {}", self.kind, path.display()),
            (None, Some(source)) => write!(f, "{}: {}", self.kind, source),
            (None, None) => write!(f, "{}", self.kind),
        }
    }
}

impl fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileErrorKind::NotFound => write!(f, "file not found"),
            FileErrorKind::PermissionDenied => write!(f, "permission denied"),
            FileErrorKind::AlreadyExists => write!(f, "file already exists"),
            FileErrorKind::IsDirectory => write!(f, "is a directory"),
            FileErrorKind::NotDirectory => write!(f, "not a directory"),
            FileErrorKind::InvalidData => write!(f, "invalid data"),
            FileErrorKind::Other => write!(f, "file error"),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<io::Error> for FileError {
    fn from(err: io::Error) -> Self {
        Self {
            kind: FileErrorKind::classify(err.kind()),
            path: None,
            source: Some(err),
        }
    }
}

/// A specialized Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_classified() {
        let err = FileError::from_io(io::Error::new(io::ErrorKind::NotFound, "gone"), "a.json");
        assert!(err.is_not_found());
        assert_eq!(err.path().map(|p| p.as_path()), Some(std::path::Path::new("a.json")));
        assert_eq!(err.to_string(), "file not found: a.json (gone)");
    }

    #[test]
    fn invalid_data_keeps_message() {
        let err = FileError::invalid_data(None, "expected value at line 1");
        assert_eq!(err.kind(), FileErrorKind::InvalidData);
        assert!(err.to_string().contains("expected value"));
    }
}
