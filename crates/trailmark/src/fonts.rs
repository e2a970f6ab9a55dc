//! Loading bundled fonts.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use trailmark_core::logging::targets;

use crate::file::{FileResult, files_with_extension};

/// Load every font file with `extension` below `dir` into `db`.
///
/// Files that are not valid fonts are skipped. Returns the sorted family
/// names of the faces added by this call; each family is logged once.
pub fn load_fonts_from_directory(
    db: &mut fontdb::Database,
    dir: impl AsRef<Path>,
    extension: &str,
) -> FileResult<Vec<String>> {
    let dir = dir.as_ref();
    let known: HashSet<fontdb::ID> = db.faces().map(|face| face.id).collect();

    for path in files_with_extension(dir, extension)? {
        match std::fs::read(&path) {
            Ok(data) => db.load_font_data(data),
            Err(e) => {
                tracing::warn!(target: targets::FONTS, path = %path.display(), "failed to read font: {}", e);
            }
        }
    }

    let families: BTreeSet<String> = db
        .faces()
        .filter(|face| !known.contains(&face.id))
        .filter_map(|face| face.families.first().map(|(name, _)| name.clone()))
        .collect();

    for family in &families {
        tracing::info!(target: targets::FONTS, "Loaded font family: {}", family);
    }
    Ok(families.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_font_files_add_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.otf"), b"not a font").unwrap();

        let mut db = fontdb::Database::new();
        let families = load_fonts_from_directory(&mut db, dir.path(), "otf").unwrap();
        assert!(families.is_empty());
        assert_eq!(db.len(), 0);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let mut db = fontdb::Database::new();
        let err = load_fonts_from_directory(&mut db, "/no/such/fonts", "otf").unwrap_err();
        assert!(err.is_not_found());
    }
}
