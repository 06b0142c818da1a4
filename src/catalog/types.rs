//! Shared catalog types and error definitions.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default gettext domain.
pub const DEFAULT_DOMAIN: &str = "messages";

/// Directory between the locale directory and the catalog file.
pub const MESSAGES_DIR: &str = "LC_MESSAGES";

/// Error types for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No locale catalogs were found under the root
    #[error("No catalogs found under {}", .root.display())]
    EmptyCatalog {
        /// Directory that was scanned
        root: PathBuf,
    },

    /// Catalog root does not exist
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    /// Generic filesystem error
    #[error("IO error: {0}")]
    Io(String),

    /// Catalog content could not be parsed
    #[error("Parse error in {} at line {line}: {message}", .path.display())]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Two entries share a key
    #[error("Duplicate key {key:?} in {}", .path.display())]
    DuplicateKey {
        /// File being parsed
        path: PathBuf,
        /// The repeated key
        key: String,
    },

    /// Saving a catalog failed; in-memory edits are kept
    #[error("Failed to save {}: {message}", .path.display())]
    Persistence {
        /// Destination file
        path: PathBuf,
        /// Underlying error
        message: String,
    },

    /// A locale list was required but empty
    #[error("At least one locale is required")]
    NoLocales,

    /// Invalid locale code
    #[error("Invalid locale code: {0:?}")]
    InvalidLocale(String),
}

/// Reasons a key rename is rejected. A rejected rename leaves the set unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    #[error("New key is empty")]
    EmptyKey,

    #[error("New key is identical to the old key")]
    Unchanged,

    #[error("Key {0:?} already exists")]
    Collision(String),

    #[error("Key {0:?} not found")]
    UnknownKey(String),
}

/// Filesystem layout of a locales directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLayout {
    /// Catalog domain (file stem), e.g. `messages`
    pub domain: String,
    /// Locale to use as reference when present
    pub reference_locale: Option<String>,
}

impl Default for CatalogLayout {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            reference_locale: None,
        }
    }
}

impl CatalogLayout {
    /// Create a layout for the given domain.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            reference_locale: None,
        }
    }

    /// Prefer the given locale as reference.
    pub fn with_reference(mut self, locale: impl Into<String>) -> Self {
        self.reference_locale = Some(locale.into());
        self
    }

    /// Path of a locale's catalog: `<root>/<locale>/LC_MESSAGES/<domain>.po`.
    pub fn catalog_path(&self, root: &Path, locale: &str) -> PathBuf {
        root.join(locale)
            .join(MESSAGES_DIR)
            .join(format!("{}.po", self.domain))
    }

    /// Path of the template: `<root>/<domain>.pot`.
    pub fn template_path(&self, root: &Path) -> PathBuf {
        root.join(format!("{}.pot", self.domain))
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err.to_string())
    }
}
