//! Order-preserving merge of a template into a catalog's entries.
//!
//! Entries are matched by id (context and msgid), never by position. The result lists the
//! template keys in template order, followed by entries the template no
//! longer has, marked obsolete.

use std::collections::{HashMap, HashSet};

use crate::catalog::{Entry, PluralForms};

use super::template::Template;

/// Result of merging one catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Merged entries
    pub entries: Vec<Entry>,
    /// Template keys that had no entry
    pub added: usize,
    /// Entries newly marked obsolete
    pub obsoleted: usize,
    /// Obsolete entries brought back by the template
    pub revived: usize,
}

/// Merge `template` into `existing`.
///
/// Kept entries retain their value, translator comments and flags; their
/// extracted comments and references are refreshed from the template.
pub fn merge_entries(existing: &[Entry], template: &Template) -> MergeOutcome {
    let by_id: HashMap<String, &Entry> = existing.iter().map(|e| (e.id(), e)).collect();
    let mut outcome = MergeOutcome::default();

    for source in template.entries() {
        let merged = match by_id.get(&source.id()) {
            Some(current) => {
                if current.obsolete {
                    outcome.revived += 1;
                }
                refresh(current, source)
            }
            None => {
                outcome.added += 1;
                fresh(source)
            }
        };
        outcome.entries.push(merged);
    }

    let template_ids: HashSet<&str> = template.keys().collect();
    for entry in existing
        .iter()
        .filter(|e| !template_ids.contains(e.id().as_str()))
    {
        let mut stale = entry.clone();
        if !stale.obsolete {
            stale.obsolete = true;
            outcome.obsoleted += 1;
        }
        outcome.entries.push(stale);
    }

    outcome
}

fn refresh(current: &Entry, source: &Entry) -> Entry {
    let mut merged = current.clone();
    merged.obsolete = false;
    merged.extracted_comments = source.extracted_comments.clone();
    merged.references = source.references.clone();
    for flag in &source.flags {
        merged.add_flag(flag);
    }

    merged.plural = match (&source.plural, &current.plural) {
        (Some(src), Some(cur)) => Some(PluralForms {
            id: src.id.clone(),
            forms: cur.forms.clone(),
        }),
        (Some(src), None) => Some(empty_forms(src)),
        (None, _) => None,
    };
    merged
}

fn fresh(source: &Entry) -> Entry {
    let mut entry = source.clone();
    entry.value.clear();
    entry.obsolete = false;
    entry.plural = source.plural.as_ref().map(empty_forms);
    entry
}

fn empty_forms(plural: &PluralForms) -> PluralForms {
    PluralForms {
        id: plural.id.clone(),
        forms: vec![String::new(); plural.forms.len().max(1)],
    }
}
