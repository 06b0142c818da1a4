//! Batch translation of missing catalog values.
//!
//! For each key the orchestrator asks the oracle once, for every locale that
//! lacks a value, using the reference text as source. A failing key is
//! reported and skipped; the rest of the batch continues. Work done before a
//! cancellation or failure is kept.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

use super::oracle::{OracleError, TranslationOracle};
use crate::catalog::CatalogSet;
use crate::storage::config::TranslateSettings;

/// Cooperative cancellation flag, shared between the batch and its caller.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the running batch to stop before its next key.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Translation state of one key across all locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// Nothing was filled in
    Untranslated,
    /// Some missing locales were filled, others are still missing
    PartiallyTranslated,
    /// Every locale has a value
    Translated,
}

/// Result of translating one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOutcome {
    pub key: String,
    pub state: KeyState,
    /// Locales that received a value, in locale order
    pub filled: Vec<String>,
    /// Locales still missing a value afterwards
    pub remaining: Vec<String>,
    /// Whether the oracle was consulted
    pub oracle_called: bool,
}

/// A key whose oracle request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFailure {
    pub key: String,
    /// Locales that were requested
    pub locales: Vec<String>,
    pub error: OracleError,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Keys scheduled
    pub total: usize,
    /// Keys handled before the batch ended
    pub processed: usize,
    /// Keys that needed no oracle call
    pub skipped: usize,
    /// Keys completed by the oracle
    pub translated: Vec<String>,
    /// Keys the oracle only partly covered
    pub partial: Vec<String>,
    /// Keys the oracle answered without any usable text
    pub untranslated: Vec<String>,
    /// Keys whose request failed
    pub failures: Vec<KeyFailure>,
    /// The batch stopped on a cancellation request
    pub cancelled: bool,
}

/// Progress notifications published while translating.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationEvent {
    /// An oracle request is about to be sent
    KeyStarted { key: String, locales: Vec<String> },
    /// Results for a key were applied
    KeyTranslated {
        key: String,
        filled: Vec<String>,
        state: KeyState,
    },
    /// The request for a key failed; its entries are unchanged
    KeyFailed {
        key: String,
        locales: Vec<String>,
        error: OracleError,
    },
    /// A key of the batch was handled
    Progress { processed: usize, total: usize },
    /// The batch stopped before `processed` reached `total`
    Cancelled { processed: usize, total: usize },
    /// The batch ended
    Finished {
        processed: usize,
        total: usize,
        failed: usize,
    },
}

/// Fills missing translations through a [`TranslationOracle`].
pub struct TranslationOrchestrator<O: TranslationOracle> {
    oracle: O,
    settings: TranslateSettings,
    event_tx: broadcast::Sender<TranslationEvent>,
}

impl<O: TranslationOracle> TranslationOrchestrator<O> {
    pub fn new(oracle: O, settings: TranslateSettings) -> Self {
        let (event_tx, _) = broadcast::channel(settings.event_capacity.max(1));
        Self {
            oracle,
            settings,
            event_tx,
        }
    }

    /// Subscribe to progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<TranslationEvent> {
        self.event_tx.subscribe()
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    fn emit(&self, event: TranslationEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    /// Fill the missing locales of one key.
    ///
    /// Does nothing when no locale is missing. On oracle failure every entry
    /// is left as it was and the error is returned.
    pub async fn translate_key(
        &self,
        set: &mut CatalogSet,
        key: &str,
    ) -> Result<KeyOutcome, OracleError> {
        let missing = set.missing_locales(key);
        if missing.is_empty() {
            return Ok(KeyOutcome {
                key: key.to_string(),
                state: KeyState::Translated,
                filled: Vec::new(),
                remaining: Vec::new(),
                oracle_called: false,
            });
        }

        let source = set.source_text(key);
        self.emit(TranslationEvent::KeyStarted {
            key: key.to_string(),
            locales: missing.clone(),
        });

        let response = match self.oracle.request_translation(&source, &missing).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(
                    "Translation failed for {:?} ({}): {}",
                    key,
                    missing.join(", "),
                    error
                );
                self.emit(TranslationEvent::KeyFailed {
                    key: key.to_string(),
                    locales: missing,
                    error: error.clone(),
                });
                return Err(error);
            }
        };

        for locale in response.keys().filter(|l| !missing.contains(*l)) {
            tracing::debug!("Ignoring unrequested locale {} for {:?}", locale, key);
        }

        let mut filled = Vec::new();
        for locale in &missing {
            let Some(text) = response.get(locale).filter(|t| !t.trim().is_empty()) else {
                continue;
            };
            if !set.set_value(locale, key, text) {
                continue;
            }
            if self.settings.mark_fuzzy {
                if let Some(file) = set.file_mut(locale) {
                    file.set_fuzzy(key, true);
                }
            }
            filled.push(locale.clone());
        }

        let remaining = set.missing_locales(key);
        let state = if remaining.is_empty() {
            KeyState::Translated
        } else if filled.is_empty() {
            KeyState::Untranslated
        } else {
            KeyState::PartiallyTranslated
        };
        tracing::debug!(
            "Translated {:?}: filled {:?}, still missing {:?}",
            key,
            filled,
            remaining
        );

        self.emit(TranslationEvent::KeyTranslated {
            key: key.to_string(),
            filled: filled.clone(),
            state,
        });

        Ok(KeyOutcome {
            key: key.to_string(),
            state,
            filled,
            remaining,
            oracle_called: true,
        })
    }

    /// Translate every reference key, in reference order.
    pub async fn translate_all(
        &self,
        set: &mut CatalogSet,
        cancel: &CancellationToken,
    ) -> BatchReport {
        let keys = set.keys().to_vec();
        self.run_batch(set, keys, cancel).await
    }

    /// Translate the given keys. Known keys run in reference order, unknown
    /// ones after them in the order given.
    pub async fn translate_keys(
        &self,
        set: &mut CatalogSet,
        keys: &[String],
        cancel: &CancellationToken,
    ) -> BatchReport {
        let requested: HashSet<&str> = keys.iter().map(String::as_str).collect();
        let mut ordered: Vec<String> = set
            .keys()
            .iter()
            .filter(|k| requested.contains(k.as_str()))
            .cloned()
            .collect();
        for key in keys {
            if !set.has_key(key) && !ordered.contains(key) {
                ordered.push(key.clone());
            }
        }
        self.run_batch(set, ordered, cancel).await
    }

    async fn run_batch(
        &self,
        set: &mut CatalogSet,
        keys: Vec<String>,
        cancel: &CancellationToken,
    ) -> BatchReport {
        let total = keys.len();
        let mut report = BatchReport {
            total,
            ..Default::default()
        };
        tracing::info!("Translating {} key(s)", total);

        for key in keys {
            if cancel.is_cancelled() {
                report.cancelled = true;
                tracing::info!("Translation cancelled after {}/{} keys", report.processed, total);
                self.emit(TranslationEvent::Cancelled {
                    processed: report.processed,
                    total,
                });
                break;
            }

            let locales = set.missing_locales(&key);
            match self.translate_key(set, &key).await {
                Ok(outcome) if !outcome.oracle_called => report.skipped += 1,
                Ok(outcome) => match outcome.state {
                    KeyState::Translated => report.translated.push(key),
                    KeyState::PartiallyTranslated => report.partial.push(key),
                    KeyState::Untranslated => report.untranslated.push(key),
                },
                Err(error) => report.failures.push(KeyFailure {
                    key,
                    locales,
                    error,
                }),
            }

            report.processed += 1;
            self.emit(TranslationEvent::Progress {
                processed: report.processed,
                total,
            });
        }

        tracing::info!(
            "Translation finished: {} translated, {} partial, {} unanswered, {} failed, {} skipped",
            report.translated.len(),
            report.partial.len(),
            report.untranslated.len(),
            report.failures.len(),
            report.skipped
        );
        self.emit(TranslationEvent::Finished {
            processed: report.processed,
            total,
            failed: report.failures.len(),
        });
        report
    }
}
