//! File I/O utilities.
//!
//! Thin wrappers over `std::fs` that attach the offending path to every error,
//! plus the directory helpers used when installing bundled resources.

mod error;
mod operations;

pub use error::{FileError, FileErrorKind, FileResult};
pub use operations::{AtomicWriter, atomic_write, copy_new_files, files_with_extension, read_text, write_text};
