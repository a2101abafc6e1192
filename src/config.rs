//! Configuration loading and command line overrides
//!
//! Settings are layered: built-in defaults, then the optional
//! `config.toml` in the user's config directory, then the command line.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::document::TableOptions;

/// Persistent defaults for docx-cards, read from `config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Index of the table to parse in each document (0-based)
    pub table_index: usize,
    /// Whether the first row of the table is a header
    pub has_header: bool,
    /// Directory scanned for .docx files
    pub docx_dir: PathBuf,
    /// Where JSON, images and the manifest go; see [`default_output_dir`]
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            table_index: 0,
            has_header: true,
            docx_dir: PathBuf::from("."),
            output_dir: None,
        }
    }
}

/// Values given on the command line, each replacing the config file's
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub table_index: Option<usize>,
    pub no_header: bool,
    pub docx_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

/// Fully resolved settings for one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub table: TableOptions,
    pub docx_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Config {
    /// Load config from the config directory, or defaults if there is none
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::get_config_path() {
            if config_path.exists() {
                return Self::load_from(&config_path);
            }
        }

        // Return defaults if no config found
        Ok(Config::default())
    }

    /// Load config from an explicit file, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Save config to the given path
    pub fn save(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docx-cards").join("config.toml"))
    }

    /// Initialize default config file, returning where it was written
    pub fn init_default() -> Result<PathBuf> {
        let path = Self::get_config_path()
            .context("No configuration directory available on this platform")?;
        Config::default().save(&path)?;
        Ok(path)
    }

    /// Apply command line overrides and make directories absolute
    pub fn resolve(&self, overrides: Overrides) -> Result<Settings> {
        let table = TableOptions {
            table_index: overrides.table_index.unwrap_or(self.table_index),
            has_header: self.has_header && !overrides.no_header,
        };

        let docx_dir = overrides.docx_dir.unwrap_or_else(|| self.docx_dir.clone());
        let docx_dir = absolute_path(&docx_dir)
            .with_context(|| format!("Invalid docx directory {}", docx_dir.display()))?;

        let output_dir = match overrides.output_dir.or_else(|| self.output_dir.clone()) {
            Some(dir) => absolute_path(&dir)
                .with_context(|| format!("Invalid output directory {}", dir.display()))?,
            None => default_output_dir(&docx_dir),
        };

        Ok(Settings {
            table,
            docx_dir,
            output_dir,
        })
    }
}

/// `../VTNECards/Data` next to the scanned directory.
///
/// `docx_dir` must already be normalized, see [`absolute_path`].
pub fn default_output_dir(docx_dir: &Path) -> PathBuf {
    let parent = docx_dir.parent().unwrap_or(docx_dir);
    parent.join("VTNECards").join("Data")
}

/// Make `path` absolute and collapse `.` and `..` lexically.
///
/// `..` at the root stays at the root. Symlinks are not resolved.
pub fn absolute_path(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}
