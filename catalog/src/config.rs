//! Catalog configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CatalogError, Result};

/// Where the dataset lives and how many suggestions to show.
///
/// Every field is optional in TOML; missing ones take their defaults.
///
/// ```toml
/// movies_path = "data/tmdb_5000_movies.csv"
/// credits_path = "data/tmdb_5000_credits.csv"
/// suggestion_limit = 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Movies CSV file.
    pub movies_path: PathBuf,
    /// Credits CSV file.
    pub credits_path: PathBuf,
    /// Most suggestions returned per query.
    pub suggestion_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            movies_path: PathBuf::from("data/tmdb_5000_movies.csv"),
            credits_path: PathBuf::from("data/tmdb_5000_credits.csv"),
            suggestion_limit: 5,
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }
}
