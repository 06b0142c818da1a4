//! Extracted key template.

use std::collections::HashMap;
use std::path::Path;

use crate::catalog::{parse_po_file, CatalogError, Entry, PoDocument};

/// Ordered, duplicate-free list of source keys with their extraction metadata.
///
/// Keys are entry ids, so one msgid may appear once per context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    doc: PoDocument,
    /// Id of each entry in `doc.entries`
    ids: Vec<String>,
}

impl Template {
    /// Build a template from bare keys. Later duplicates are ignored.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_document(PoDocument {
            header: None,
            entries: keys
                .into_iter()
                .map(|key| {
                    let key: String = key.into();
                    Entry::from_id(&key, "")
                })
                .collect(),
        })
    }

    /// Build a template from a parsed POT document.
    ///
    /// Obsolete entries are dropped and values cleared.
    pub fn from_document(doc: PoDocument) -> Self {
        let mut template = Self {
            doc: PoDocument {
                header: doc.header,
                entries: Vec::new(),
            },
            ids: Vec::new(),
        };
        template.extend(doc.entries);
        template
    }

    /// Load a template file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        Ok(Self::from_document(parse_po_file(path)?))
    }

    fn extend(&mut self, entries: Vec<Entry>) {
        let mut positions: HashMap<String, usize> = self
            .ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        for mut entry in entries.into_iter().filter(|e| !e.obsolete && !e.key.is_empty()) {
            let id = entry.id();
            if let Some(&i) = positions.get(&id) {
                let existing = &mut self.doc.entries[i];
                for reference in entry.references {
                    if !existing.references.contains(&reference) {
                        existing.references.push(reference);
                    }
                }
                for flag in &entry.flags {
                    existing.add_flag(flag);
                }
                continue;
            }
            entry.value.clear();
            if let Some(plural) = entry.plural.as_mut() {
                plural.forms.iter_mut().for_each(String::clear);
            }
            positions.insert(id.clone(), self.doc.entries.len());
            self.ids.push(id);
            self.doc.entries.push(entry);
        }
    }

    /// Merge another template into this one, appending keys not seen yet.
    pub fn union(&mut self, other: Template) {
        if self.doc.header.is_none() {
            self.doc.header = other.doc.header;
        }
        self.extend(other.doc.entries);
    }

    /// Keys in template order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Template entries in order.
    pub fn entries(&self) -> &[Entry] {
        &self.doc.entries
    }

    /// Look up a template entry.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.ids
            .iter()
            .position(|id| id == key)
            .map(|i| &self.doc.entries[i])
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.doc.entries.len()
    }

    /// Whether the template has no keys.
    pub fn is_empty(&self) -> bool {
        self.doc.entries.is_empty()
    }

    /// The template as a PO document.
    pub fn document(&self) -> &PoDocument {
        &self.doc
    }
}
