//! Catalog errors.

use std::path::PathBuf;

/// Error type for loading and importing catalog data.
#[derive(Debug)]
pub enum CatalogError {
    /// A file could not be opened or read.
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The CSV stream itself failed.
    Csv(csv::Error),
    /// The configuration file is not valid TOML for [`Config`](crate::Config).
    Config(toml::de::Error),
}

impl From<csv::Error> for CatalogError {
    fn from(e: csv::Error) -> Self {
        CatalogError::Csv(e)
    }
}

impl From<toml::de::Error> for CatalogError {
    fn from(e: toml::de::Error) -> Self {
        CatalogError::Config(e)
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            CatalogError::Csv(e) => write!(f, "CSV error: {}", e),
            CatalogError::Config(e) => write!(f, "invalid config: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io { source, .. } => Some(source),
            CatalogError::Csv(e) => Some(e),
            CatalogError::Config(e) => Some(e),
        }
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
