//! Catalog file storage and loading
//!
//! The catalog is stored as JSON: `{"books": [ ...records in order... ]}`.
//! Saving writes a sibling temp file and renames it over the target, after
//! copying the previous version to `<file>.backup`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::catalog::{BookRecord, Catalog};
use crate::error::Result;

/// On-disk shape of the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogFile {
    books: Vec<BookRecord>,
}

/// Load a catalog from file
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)?;
    let file: CatalogFile = serde_json::from_str(&content)?;
    let catalog = Catalog::from_records(file.books)?;
    info!("Loaded {} books from {:?}", catalog.len(), path);
    Ok(catalog)
}

/// Load a catalog from file, or fall back to the built-in shelf if the
/// file does not exist yet
pub fn load_or_builtin(path: &Path) -> Result<Catalog> {
    if path.exists() {
        load_catalog(path)
    } else {
        info!("No catalog at {:?}, using built-in catalog", path);
        Ok(Catalog::builtin())
    }
}

/// Save a catalog to file
pub fn save_catalog(catalog: &Catalog, path: &Path) -> Result<()> {
    let file = CatalogFile {
        books: catalog.iter().cloned().collect(),
    };
    let content = serde_json::to_string_pretty(&file)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    if path.exists() {
        let backup = backup_path(path);
        std::fs::copy(path, &backup)?;
        debug!("Backed up previous catalog to {:?}", backup);
    }

    let temp = sibling_with_suffix(path, ".tmp");
    std::fs::write(&temp, content)?;
    std::fs::rename(&temp, path)?;

    info!("Saved {} books to {:?}", catalog.len(), path);
    Ok(())
}

/// Path the previous catalog version is copied to on save
pub fn backup_path(path: &Path) -> PathBuf {
    sibling_with_suffix(path, ".backup")
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BookUpdate;
    use crate::error::LocatorError;
    use crate::geometry::{NormBox, Quad, Region};
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_save_and_load_keeps_order_and_geometry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let catalog = Catalog::builtin();

        save_catalog(&catalog, &path).unwrap();
        let loaded = load_catalog(&path).unwrap();

        let original: Vec<&BookRecord> = catalog.iter().collect();
        let reloaded: Vec<&BookRecord> = loaded.iter().collect();
        assert_eq!(original, reloaded);
    }

    #[test]
    fn test_save_writes_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let mut catalog = Catalog::builtin();
        save_catalog(&catalog, &path).unwrap();
        assert!(!backup_path(&path).exists());

        catalog
            .update(
                "coffee lids",
                BookUpdate {
                    name: Some("Coffee Lids: Peel, Pinch, Pucker, Puncture".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        save_catalog(&catalog, &path).unwrap();

        let backup = load_catalog(&backup_path(&path)).unwrap();
        assert_eq!(backup.get("coffee lids").unwrap().name, "COFFEE LIDS");
        let current = load_catalog(&path).unwrap();
        assert_eq!(
            current.get("coffee lids").unwrap().name,
            "Coffee Lids: Peel, Pinch, Pucker, Puncture"
        );
    }

    #[test]
    fn test_load_or_builtin_without_file() {
        let dir = tempdir().unwrap();
        let catalog = load_or_builtin(&dir.path().join("missing.json")).unwrap();
        assert_eq!(catalog.len(), Catalog::builtin().len());
    }

    #[test]
    fn test_load_hand_written_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            r#"{{"books": [
                {{"key": "Sprint", "full_name": "SPRINT", "shelf": 1,
                  "position": [0.5, 0.5, 0.05, 0.2]}},
                {{"key": "hooked", "full_name": "Hooked", "position": [0.2, 0.5, 0.05, 0.2],
                  "points": [[0.18, 0.4], [0.22, 0.4], [0.22, 0.6], [0.18, 0.6]]}}
            ]}}"#
        )
        .unwrap();

        let catalog = load_catalog(temp_file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        // Keys are normalized on load
        assert!(catalog.contains("sprint"));
        let hooked = catalog.get("hooked").unwrap();
        assert_eq!(hooked.shelf, 0);
        assert!(matches!(hooked.render_region(), Region::Quad(_)));
    }

    #[test]
    fn test_load_rejects_bad_point_count() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            r#"{{"books": [{{"key": "x", "full_name": "X", "position": [0.5, 0.5, 0.1, 0.1],
                "points": [[0.1, 0.1]]}}]}}"#
        )
        .unwrap();

        assert!(matches!(load_catalog(temp_file.path()), Err(LocatorError::Json(_))));
    }

    #[test]
    fn test_load_rejects_duplicate_keys() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            r#"{{"books": [
                {{"key": "x", "full_name": "X", "position": [0.5, 0.5, 0.1, 0.1]}},
                {{"key": "X", "full_name": "X again", "position": [0.5, 0.5, 0.1, 0.1]}}
            ]}}"#
        )
        .unwrap();

        assert!(matches!(load_catalog(temp_file.path()), Err(LocatorError::DuplicateBook(_))));
    }

    #[test]
    fn test_added_quad_book_survives_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("catalog.json");
        let mut catalog = Catalog::new();
        let quad = Quad::from_points(&[(0.1, 0.1), (0.2, 0.1), (0.2, 0.3), (0.1, 0.3)]).unwrap();
        catalog
            .add(BookRecord::new(
                "the shape of design",
                "The Shape of Design",
                0,
                Region::Quad(quad),
            ))
            .unwrap();
        catalog
            .add(BookRecord::new(
                "sprint",
                "Sprint",
                1,
                Region::Box(NormBox::new(0.6, 0.7, 0.05, 0.2)),
            ))
            .unwrap();

        save_catalog(&catalog, &path).unwrap();
        let loaded = load_catalog(&path).unwrap();

        let keys: Vec<&str> = loaded.keys().collect();
        assert_eq!(keys, vec!["the shape of design", "sprint"]);
        assert_eq!(loaded.get("the shape of design").unwrap().points, Some(quad));
    }

    #[test]
    fn test_load_catalog_file_not_found() {
        assert!(matches!(
            load_catalog(Path::new("/nonexistent/path/catalog.json")),
            Err(LocatorError::Io(_))
        ));
    }
}
