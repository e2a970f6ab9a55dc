//! Convenience functions for common file operations.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use trailmark_core::logging::targets;

use super::error::{FileError, FileResult};

/// Reads the entire contents of a file as a string.
pub fn read_text(path: impl AsRef<Path>) -> FileResult<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| FileError::from_io(e, path))
}

/// Writes a string to a file, creating parent directories as needed.
///
/// If the file already exists, its contents are replaced.
pub fn write_text(path: impl AsRef<Path>, contents: impl AsRef<str>) -> FileResult<()> {
    let path = path.as_ref();
    create_parent_dirs(path)?;
    fs::write(path, contents.as_ref()).map_err(|e| FileError::from_io(e, path))
}

/// Writes a file atomically through a temporary file and a rename.
///
/// If `f` or any step after it fails, the original file is left unchanged.
///
/// ```ignore
/// atomic_write("settings.json", |w| w.write_all(b"{}"))?;
/// ```
pub fn atomic_write<F>(path: impl AsRef<Path>, f: F) -> FileResult<()>
where
    F: FnOnce(&mut AtomicWriter) -> FileResult<()>,
{
    let mut writer = AtomicWriter::new(path)?;
    f(&mut writer)?;
    writer.commit()
}

/// A writer that replaces its target file only on [`commit`](Self::commit).
///
/// The temporary file lives next to the target so the final rename stays on
/// one filesystem. Dropping the writer without committing removes it.
pub struct AtomicWriter {
    target_path: PathBuf,
    temp_path: PathBuf,
    writer: Option<BufWriter<fs::File>>,
    committed: bool,
}

impl AtomicWriter {
    /// Creates a temporary file next to `path`.
    pub fn new(path: impl AsRef<Path>) -> FileResult<Self> {
        let target_path = path.as_ref().to_path_buf();
        create_parent_dirs(&target_path)?;

        let parent = target_path.parent().unwrap_or(Path::new("."));
        let file_name = target_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".to_string());
        let temp_path = parent.join(format!(".{}.tmp.{}", file_name, std::process::id()));

        let file = fs::File::create(&temp_path).map_err(|e| FileError::from_io(e, &target_path))?;

        Ok(Self {
            target_path,
            temp_path,
            writer: Some(BufWriter::new(file)),
            committed: false,
        })
    }

    /// Returns the target path.
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Writes all bytes to the temporary file.
    pub fn write_all(&mut self, buf: &[u8]) -> FileResult<()> {
        let writer = self.writer.as_mut().ok_or_else(|| consumed(&self.target_path))?;
        writer
            .write_all(buf)
            .map_err(|e| FileError::from_io(e, &self.target_path))
    }

    /// Flushes and syncs the temporary file, then renames it over the target.
    pub fn commit(mut self) -> FileResult<()> {
        let mut writer = self.writer.take().ok_or_else(|| consumed(&self.target_path))?;

        writer
            .flush()
            .map_err(|e| FileError::from_io(e, &self.target_path))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| FileError::from_io(e, &self.target_path))?;
        drop(writer);

        fs::rename(&self.temp_path, &self.target_path)
            .map_err(|e| FileError::from_io(e, &self.target_path))?;

        self.committed = true;
        Ok(())
    }
}

impl Drop for AtomicWriter {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

impl std::fmt::Debug for AtomicWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicWriter")
            .field("target_path", &self.target_path)
            .field("temp_path", &self.temp_path)
            .field("committed", &self.committed)
            .finish()
    }
}

fn consumed(path: &Path) -> FileError {
    FileError::from_io(std::io::Error::other("atomic writer already consumed"), path)
}

fn create_parent_dirs(path: &Path) -> FileResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| FileError::from_io(e, parent))
        }
        _ => Ok(()),
    }
}

/// Recursively copy files from `src` into `dst` that do not exist there yet.
///
/// Existing destination files are never overwritten, so user edits to copied
/// defaults survive updates. A missing `src` copies nothing. Returns the
/// destination paths of the copied files.
pub fn copy_new_files(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> FileResult<Vec<PathBuf>> {
    let src = src.as_ref();
    let dst = dst.as_ref();
    let mut copied = Vec::new();

    if !src.is_dir() {
        tracing::debug!(target: targets::RESOURCES, src = %src.display(), "no bundled files to copy");
        return Ok(copied);
    }

    copy_new_files_into(src, dst, &mut copied)?;
    for path in &copied {
        tracing::info!(target: targets::RESOURCES, "Copied file: {}", path.display());
    }
    Ok(copied)
}

fn copy_new_files_into(src: &Path, dst: &Path, copied: &mut Vec<PathBuf>) -> FileResult<()> {
    fs::create_dir_all(dst).map_err(|e| FileError::from_io(e, dst))?;

    let entries = fs::read_dir(src).map_err(|e| FileError::from_io(e, src))?;
    for entry in entries {
        let entry = entry.map_err(|e| FileError::from_io(e, src))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());

        if from.is_dir() {
            copy_new_files_into(&from, &to, copied)?;
        } else if !to.exists() {
            fs::copy(&from, &to).map_err(|e| FileError::from_io(e, &from))?;
            copied.push(to);
        }
    }
    Ok(())
}

/// Recursively list files under `dir` whose extension matches `extension`.
///
/// The extension is compared case-insensitively and may be given with or
/// without the leading dot. Results are sorted.
pub fn files_with_extension(dir: impl AsRef<Path>, extension: &str) -> FileResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let extension = extension.trim_start_matches('.');
    let mut found = Vec::new();

    if !dir.is_dir() {
        return Err(FileError::not_found(dir));
    }
    collect_files(dir, extension, &mut found)?;
    found.sort();
    Ok(found)
}

fn collect_files(dir: &Path, extension: &str, found: &mut Vec<PathBuf>) -> FileResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| FileError::from_io(e, dir))?;
    for entry in entries {
        let path = entry.map_err(|e| FileError::from_io(e, dir))?.path();
        if path.is_dir() {
            collect_files(&path, extension, found)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        {
            found.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/file.txt");
        write_text(&path, "hello").unwrap();
        assert_eq!(read_text(&path).unwrap(), "hello");
    }

    #[test]
    fn read_missing_file() {
        let err = read_text("/definitely/missing.txt").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn atomic_write_replaces_target() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "old").unwrap();

        atomic_write(&path, |w| w.write_all(b"new")).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_atomic_write_keeps_original() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "old").unwrap();

        let result = atomic_write(&path, |w| {
            w.write_all(b"partial")?;
            Err(FileError::invalid_data(None, "serializer failed"))
        });
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn copy_new_files_keeps_existing() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        fs::create_dir_all(src.join("color_schemes")).unwrap();
        fs::write(src.join("color_schemes/bright.toml"), "bundled").unwrap();
        fs::write(src.join("readme.txt"), "bundled").unwrap();
        fs::create_dir_all(&dst).unwrap();
        fs::write(dst.join("readme.txt"), "user edit").unwrap();

        let copied = copy_new_files(&src, &dst).unwrap();

        assert_eq!(copied, vec![dst.join("color_schemes/bright.toml")]);
        assert_eq!(fs::read_to_string(dst.join("readme.txt")).unwrap(), "user edit");
        assert!(copy_new_files(&src, &dst).unwrap().is_empty());
    }

    #[test]
    fn copy_from_missing_source_is_noop() {
        let dir = tempdir().unwrap();
        let copied = copy_new_files(dir.path().join("nope"), dir.path().join("dst")).unwrap();
        assert!(copied.is_empty());
        assert!(!dir.path().join("dst").exists());
    }

    #[test]
    fn files_with_extension_recurses() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("one.otf"), "").unwrap();
        fs::write(dir.path().join("a/b/two.OTF"), "").unwrap();
        fs::write(dir.path().join("a/three.ttf"), "").unwrap();

        let found = files_with_extension(dir.path(), ".otf").unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.extension().unwrap().eq_ignore_ascii_case("otf")));
    }
}
