//! polocalize - gettext catalog maintenance
//!
//! Keeps the per-locale PO catalogs of a project consistent with the keys
//! extracted from its sources, and fills missing values through a machine
//! translation service. Catalog edits stay in memory until saved.

pub mod catalog;
pub mod storage;
pub mod sync;
pub mod translate;

// Re-export commonly used types
pub use catalog::{CatalogError, CatalogFile, CatalogLayout, CatalogSet, Entry, RenameError};
pub use storage::config::AppConfig;
pub use sync::{SyncError, SyncReport, SynchronizationEngine};
pub use translate::{CancellationToken, OracleError, TranslationOracle, TranslationOrchestrator};
