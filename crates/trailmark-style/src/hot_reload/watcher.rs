//! File watching for stylesheet templates.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebouncedEventKind, Debouncer, new_debouncer};
use trailmark_core::logging::targets;

use crate::stylesheet::StyleSheet;
use crate::template::StyleTemplateResolver;
use crate::{Error, Result};

/// A watched template file changed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// Type of file change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File was modified or recreated.
    Modified,
    /// File was removed.
    Removed,
}

/// Watches stylesheet templates and re-resolves them when they change.
///
/// # Example
///
/// ```ignore
/// let mut watcher = StylesheetWatcher::new()?;
/// watcher.watch(resources.gui_path().join("main/main.css"))?;
///
/// // In the event loop:
/// let changes = watcher.poll();
/// for (path, sheet) in watcher.reload(&context.style_resolver(), &changes) {
///     match sheet {
///         Ok(sheet) => apply(sheet.text()),
///         Err(e) => eprintln!("{}: {e}", path.display()),
///     }
/// }
/// ```
pub struct StylesheetWatcher {
    debouncer: Debouncer<RecommendedWatcher>,
    rx: Receiver<std::result::Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>>,
    watched_paths: HashSet<PathBuf>,
}

impl StylesheetWatcher {
    /// Create a watcher with no watched files.
    pub fn new() -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        let debouncer = new_debouncer(Duration::from_millis(100), tx)
            .map_err(|e| Error::HotReload(e.to_string()))?;

        Ok(Self {
            debouncer,
            rx,
            watched_paths: HashSet::new(),
        })
    }

    /// Start watching a template file.
    pub fn watch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path
            .as_ref()
            .canonicalize()
            .map_err(|e| Error::io(path.as_ref(), e))?;

        if !self.watched_paths.contains(&path) {
            self.debouncer
                .watcher()
                .watch(&path, RecursiveMode::NonRecursive)
                .map_err(|e| Error::HotReload(e.to_string()))?;

            tracing::info!(target: targets::TEMPLATE, "Watching stylesheet: {}", path.display());
            self.watched_paths.insert(path);
        }

        Ok(())
    }

    /// Stop watching a template file. Unknown paths are ignored.
    pub fn unwatch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let Ok(path) = path.as_ref().canonicalize() else {
            return Ok(());
        };

        if self.watched_paths.remove(&path) {
            let _ = self.debouncer.watcher().unwatch(&path);
            tracing::info!(target: targets::TEMPLATE, "Stopped watching stylesheet: {}", path.display());
        }

        Ok(())
    }

    /// Drain pending changes to watched files, one event per file.
    pub fn poll(&mut self) -> Vec<StylesheetChangeEvent> {
        let mut changes = vec![];

        loop {
            match self.rx.try_recv() {
                Ok(Ok(events)) => {
                    for event in events {
                        if event.kind != DebouncedEventKind::Any || !self.watched_paths.contains(&event.path) {
                            continue;
                        }
                        let kind = if event.path.exists() {
                            ChangeKind::Modified
                        } else {
                            ChangeKind::Removed
                        };
                        changes.push(StylesheetChangeEvent { path: event.path, kind });
                    }
                }
                Ok(Err(e)) => {
                    tracing::warn!(target: targets::TEMPLATE, "File watcher error: {}", e);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!(target: targets::TEMPLATE, "File watcher disconnected");
                    break;
                }
            }
        }

        changes.sort_by(|a, b| a.path.cmp(&b.path));
        changes.dedup_by(|a, b| a.path == b.path);
        changes
    }

    /// Re-resolve every modified template in `changes`.
    ///
    /// Removed files are skipped. Each result is paired with its path so one
    /// broken template does not hide the others.
    pub fn reload(
        &self,
        resolver: &StyleTemplateResolver<'_>,
        changes: &[StylesheetChangeEvent],
    ) -> Vec<(PathBuf, Result<StyleSheet>)> {
        changes
            .iter()
            .filter_map(|change| match change.kind {
                ChangeKind::Modified => {
                    tracing::info!(target: targets::TEMPLATE, "Reloading stylesheet: {}", change.path.display());
                    let sheet = StyleSheet::from_file(&change.path, resolver);
                    if let Err(e) = &sheet {
                        tracing::error!(target: targets::TEMPLATE, "Failed to reload stylesheet {}: {}", change.path.display(), e);
                    }
                    Some((change.path.clone(), sheet))
                }
                ChangeKind::Removed => {
                    tracing::info!(target: targets::TEMPLATE, "Stylesheet removed: {}", change.path.display());
                    None
                }
            })
            .collect()
    }

    /// Number of watched files.
    pub fn watched_count(&self) -> usize {
        self.watched_paths.len()
    }

    /// The watched paths, canonicalized.
    pub fn watched_paths(&self) -> impl Iterator<Item = &Path> {
        self.watched_paths.iter().map(|p| p.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::tempdir;

    use crate::template::FixedStyleSettings;
    use crate::ColorScheme;

    #[test]
    fn watch_and_unwatch() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("main.css");
        fs::write(&file_path, "QWidget { font-size: <setting:font_size>pt; }").unwrap();

        let mut watcher = StylesheetWatcher::new().unwrap();
        watcher.watch(&file_path).unwrap();
        watcher.watch(&file_path).unwrap();
        assert_eq!(watcher.watched_count(), 1);

        watcher.unwatch(&file_path).unwrap();
        assert_eq!(watcher.watched_count(), 0);
    }

    #[test]
    fn watching_missing_file_fails() {
        let mut watcher = StylesheetWatcher::new().unwrap();
        assert!(matches!(watcher.watch("/no/such/file.css"), Err(Error::Io { .. })));
    }

    #[test]
    fn reload_resolves_modified_files_only() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.css");
        let bad = dir.path().join("bad.css");
        fs::write(&good, "<setting:font_size>").unwrap();
        fs::write(&bad, "<nope:1>").unwrap();

        let settings = FixedStyleSettings::new(9, "Fira Sans", "/gui");
        let colors = ColorScheme::new();
        let resolver = StyleTemplateResolver::new(&settings, &colors);
        let watcher = StylesheetWatcher::new().unwrap();

        let changes = vec![
            StylesheetChangeEvent { path: good.clone(), kind: ChangeKind::Modified },
            StylesheetChangeEvent { path: bad.clone(), kind: ChangeKind::Modified },
            StylesheetChangeEvent { path: dir.path().join("gone.css"), kind: ChangeKind::Removed },
        ];
        let results = watcher.reload(&resolver, &changes);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, good);
        assert_eq!(results[0].1.as_ref().unwrap().text(), "9");
        assert!(results[1].1.as_ref().unwrap_err().is_syntax());
    }
}
