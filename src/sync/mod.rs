//! Catalog synchronization against an extracted key template.

pub mod engine;
pub mod merge;
pub mod template;
pub mod tools;
pub mod types;

pub use engine::{LocaleMerge, SyncReport, SynchronizationEngine};
pub use merge::{merge_entries, MergeOutcome};
pub use template::Template;
pub use tools::{project_dir, CatalogCompiler, Extractor, Pybabel};
pub use types::{MergeError, SyncError};
