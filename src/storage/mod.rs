//! Storage Layer
//!
//! Handles persistence of the book catalog and locates the application's
//! data and configuration directories.

pub mod catalog_file;

pub use catalog_file::{load_catalog, load_or_builtin, save_catalog};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "shelfspot", "ShelfSpot")
        .ok_or_else(|| anyhow::anyhow!("Could not determine a home directory"))
}

fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    Ok(dir.to_path_buf())
}

/// Directory holding the catalog and rendered output, created on demand
pub fn get_data_dir() -> Result<PathBuf> {
    ensure_dir(project_dirs()?.data_dir())
}

/// Directory holding `config.toml`, created on demand
pub fn get_config_dir() -> Result<PathBuf> {
    ensure_dir(project_dirs()?.config_dir())
}

/// Default location of the catalog file
pub fn default_catalog_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("catalog.json"))
}
