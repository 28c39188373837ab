//! Loading recipe tables from configuration documents.
//!
//! The container only needs an ordered id → [`RawRecipe`] mapping.
//! [`RegistryConfig`] is that mapping, plus loaders for JSON and TOML that
//! keep the document's key order (eager builds follow it).
//!
//! ```toml
//! [mailer]
//! class = "Mailer"
//! constructor_attributes = ["smtp://localhost"]
//! setter_attributes = { retries = 3 }
//!
//! [request]
//! use_lazyload = true
//! must_be_set = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::recipe::RawRecipe;

/// Error type for recipe loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported config format: {} (expected .json or .toml)", .path.display())]
    UnsupportedFormat { path: PathBuf },
}

/// Ordered id → raw recipe table.
///
/// # Examples
/// ```
/// use sijill_container::config::RegistryConfig;
///
/// let config = RegistryConfig::from_json_str(r#"{
///     "second": { "class": "B" },
///     "first":  { "class": "A", "use_lazyload": true }
/// }"#).unwrap();
///
/// let ids: Vec<&str> = config.ids().collect();
/// assert_eq!(ids, vec!["second", "first"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryConfig {
    recipes: IndexMap<String, RawRecipe>,
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, replacing a previous one with the same id in place.
    pub fn insert(&mut self, id: impl Into<String>, recipe: RawRecipe) -> Option<RawRecipe> {
        self.recipes.insert(id.into(), recipe)
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, id: impl Into<String>, recipe: RawRecipe) -> Self {
        self.insert(id, recipe);
        self
    }

    pub fn get(&self, id: &str) -> Option<&RawRecipe> {
        self.recipes.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.recipes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Appends every entry of `other`; later entries win.
    pub fn merge(&mut self, other: RegistryConfig) {
        self.recipes.extend(other.recipes);
    }

    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Reads a `.json` or `.toml` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = match format.as_deref() {
            Some("json") => Self::from_json_str(&content)?,
            Some("toml") => Self::from_toml_str(&content)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                });
            }
        };

        debug!(path = %path.display(), recipes = config.len(), "Loaded registry config");
        Ok(config)
    }
}

impl FromIterator<(String, RawRecipe)> for RegistryConfig {
    fn from_iter<I: IntoIterator<Item = (String, RawRecipe)>>(iter: I) -> Self {
        Self {
            recipes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RegistryConfig {
    type Item = (String, RawRecipe);
    type IntoIter = indexmap::map::IntoIter<String, RawRecipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.into_iter()
    }
}
