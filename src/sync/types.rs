//! Synchronization error definitions.

use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors that abort a whole synchronization.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Template extraction failed; nothing was written
    #[error("Template extraction failed: {0}")]
    Extraction(String),

    /// Extracted template could not be read
    #[error("Template error: {0}")]
    Template(#[source] CatalogError),

    /// Catalogs could not be re-read after synchronization
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Catalog compilation failed
    #[error("Catalog compilation failed: {0}")]
    Compile(String),
}

/// Merge failure of one locale. Other locales are still merged.
#[derive(Debug, Error)]
#[error("Merge failed for {locale}: {source}")]
pub struct MergeError {
    /// Locale whose catalog could not be updated
    pub locale: String,
    /// Underlying failure
    #[source]
    pub source: CatalogError,
}
