//! Loader configuration
//!
//! Where content packages live and which files inside them matter. Stored as
//! RON; every field is optional and falls back to its default.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one load pass
///
/// # Example
///
/// ```
/// use perkpack_script::LoaderConfig;
///
/// let config = LoaderConfig::from_ron_str(r#"(perks_root: "mods/perks")"#).unwrap();
/// assert_eq!(config.perks_root.to_str(), Some("mods/perks"));
/// assert_eq!(config.assets_dir, "Assets");
/// assert!(config.create_root);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory scanned for content packages
    pub perks_root: PathBuf,
    /// Definition file names, in lookup order
    ///
    /// A folder holding any of these is a content package.
    pub definition_files: Vec<String>,
    /// Per-package image folder
    pub assets_dir: String,
    /// Built-in card frames, relative to `perks_root`
    pub frames_dir: String,
    /// Create `perks_root` when it does not exist
    pub create_root: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            perks_root: PathBuf::from("Perks"),
            definition_files: vec!["config.json".to_string(), "config.ron".to_string()],
            assets_dir: "Assets".to_string(),
            frames_dir: "Frames".to_string(),
            create_root: true,
        }
    }
}

impl LoaderConfig {
    /// Default configuration rooted at `perks_root`
    pub fn with_perks_root(perks_root: impl Into<PathBuf>) -> Self {
        Self {
            perks_root: perks_root.into(),
            ..Self::default()
        }
    }

    /// Read a RON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    pub fn from_ron_str(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    /// Absolute location of the built-in frame images
    pub fn frames_path(&self) -> PathBuf {
        self.perks_root.join(&self.frames_dir)
    }

    /// First configured definition file present in `dir`
    pub fn definition_file_in(&self, dir: &Path) -> Option<PathBuf> {
        self.definition_files
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }
}
