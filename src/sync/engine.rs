//! Synchronization engine.
//!
//! Reconciles every catalog of a set against a freshly extracted template:
//!
//! 1. extract the template (failure aborts before anything is written)
//! 2. merge each locale and save it; a failing locale is reported and skipped
//! 3. purge obsolete entries, only when every merge succeeded
//! 4. re-read the catalogs so memory matches disk

use crate::catalog::CatalogSet;

use super::merge::merge_entries;
use super::template::Template;
use super::tools::{project_dir, Extractor};
use super::types::{MergeError, SyncError};

/// Per-locale merge statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleMerge {
    /// Locale code
    pub locale: String,
    /// New empty entries
    pub added: usize,
    /// Entries marked obsolete
    pub obsoleted: usize,
    /// Obsolete entries brought back
    pub revived: usize,
}

/// Result of a synchronization run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Number of keys in the template
    pub template_keys: usize,
    /// Locales merged and saved
    pub merged: Vec<LocaleMerge>,
    /// Locales that failed to merge
    pub merge_errors: Vec<MergeError>,
    /// Obsolete entries removed across all locales
    pub purged: usize,
    /// Locales whose purged catalog could not be saved
    pub purge_errors: Vec<MergeError>,
    /// Purge was skipped because a merge failed
    pub purge_skipped: bool,
    /// Locales whose catalog on disk no longer matches the reference keys
    pub inconsistent: Vec<String>,
}

impl SyncReport {
    /// Whether every locale was merged (and purged, if requested) cleanly.
    pub fn is_clean(&self) -> bool {
        self.merge_errors.is_empty() && self.purge_errors.is_empty() && self.inconsistent.is_empty()
    }
}

/// Drives template extraction and catalog merging.
pub struct SynchronizationEngine<E: Extractor> {
    extractor: E,
    purge_obsolete: bool,
}

impl<E: Extractor> SynchronizationEngine<E> {
    /// Create an engine that purges obsolete entries after merging.
    pub fn new(extractor: E) -> Self {
        Self {
            extractor,
            purge_obsolete: true,
        }
    }

    /// Keep obsolete entries (marked `#~`) instead of purging them.
    pub fn with_purge(mut self, purge_obsolete: bool) -> Self {
        self.purge_obsolete = purge_obsolete;
        self
    }

    /// Extract a fresh template and merge it into every catalog of `set`.
    ///
    /// The project directory is the parent of the locales directory.
    pub fn synchronize(&self, set: &mut CatalogSet) -> Result<SyncReport, SyncError> {
        let root = set.root().to_path_buf();
        let template_path = set.layout().template_path(&root);

        let template = self.extractor.extract(&project_dir(&root), &template_path)?;
        self.apply(set, &template)
    }

    /// Merge an already extracted template into every catalog of `set`.
    pub fn apply(&self, set: &mut CatalogSet, template: &Template) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport {
            template_keys: template.len(),
            ..Default::default()
        };

        let locales = set.locales().to_vec();
        for locale in &locales {
            let Some(file) = set.file_mut(locale) else {
                continue;
            };
            let outcome = merge_entries(file.all_entries(), template);
            let stats = LocaleMerge {
                locale: locale.clone(),
                added: outcome.added,
                obsoleted: outcome.obsoleted,
                revived: outcome.revived,
            };
            file.replace_entries(outcome.entries);

            match file.save() {
                Ok(_) => {
                    tracing::debug!(
                        "Merged {}: {} added, {} obsolete, {} revived",
                        locale,
                        stats.added,
                        stats.obsoleted,
                        stats.revived
                    );
                    report.merged.push(stats);
                }
                Err(source) => {
                    tracing::warn!("Merge failed for {}: {}", locale, source);
                    report.merge_errors.push(MergeError {
                        locale: locale.clone(),
                        source,
                    });
                }
            }
        }

        if self.purge_obsolete {
            if report.merge_errors.is_empty() {
                self.purge(set, &locales, &mut report);
            } else {
                report.purge_skipped = true;
                tracing::warn!(
                    "Skipping obsolete purge: {} locale(s) failed to merge",
                    report.merge_errors.len()
                );
            }
        }

        let failed: Vec<String> = report
            .merge_errors
            .iter()
            .chain(report.purge_errors.iter())
            .map(|e| e.locale.clone())
            .collect();

        if failed.is_empty() {
            set.reload()?;
        } else {
            // Unsaved merges stay in memory (dirty) so a later save can retry.
            set.refresh_keys();
        }

        let mut inconsistent = set.inconsistent_locales();
        for locale in failed {
            if !inconsistent.contains(&locale) {
                inconsistent.push(locale);
            }
        }
        if !inconsistent.is_empty() {
            tracing::warn!(
                "Catalogs out of sync with the reference keys: {}",
                inconsistent.join(", ")
            );
        }
        report.inconsistent = inconsistent;

        tracing::info!(
            "Synchronized {} locale(s) against {} template keys",
            report.merged.len(),
            report.template_keys
        );
        Ok(report)
    }

    fn purge(&self, set: &mut CatalogSet, locales: &[String], report: &mut SyncReport) {
        for locale in locales {
            let Some(file) = set.file_mut(locale) else {
                continue;
            };
            let removed = file.purge_obsolete();
            if removed == 0 {
                continue;
            }
            match file.save() {
                Ok(_) => report.purged += removed,
                Err(source) => {
                    tracing::warn!("Failed to save purged catalog for {}: {}", locale, source);
                    report.purge_errors.push(MergeError {
                        locale: locale.clone(),
                        source,
                    });
                }
            }
        }
    }
}
