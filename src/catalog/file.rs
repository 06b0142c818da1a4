//! Catalog file: the ordered entries of one locale.
//!
//! Entries are kept in file order with a key index alongside, so lookups stay
//! O(1) while iteration order is preserved. Obsolete entries stay in the
//! sequence until purged but are invisible to lookups.
//!
//! Keys are entry ids (see [`Entry::id`]): the msgid, or the context and msgid
//! joined by [`CONTEXT_SEPARATOR`](super::entry::CONTEXT_SEPARATOR).

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::entry::{Entry, FUZZY_FLAG};
use super::po::{self, PoDocument};
use super::types::CatalogError;

/// Header field refreshed on every save.
const REVISION_DATE_FIELD: &str = "PO-Revision-Date";

/// The catalog of a single locale.
#[derive(Debug, Clone)]
pub struct CatalogFile {
    /// Location on disk
    path: PathBuf,
    /// Locale code this catalog belongs to
    locale: String,
    /// Header entry (`msgid ""`)
    header: Option<Entry>,
    /// Entries in file order
    entries: Vec<Entry>,
    /// Id of each entry, same positions as `entries`
    ids: Vec<String>,
    /// Id -> position in `entries`
    index: HashMap<String, usize>,
    /// Set on any mutation, cleared after a successful save
    dirty: bool,
}

impl CatalogFile {
    /// Load a catalog from disk.
    pub fn open(path: impl Into<PathBuf>, locale: impl Into<String>) -> Result<Self, CatalogError> {
        let path = path.into();
        let doc = po::parse_po_file(&path)?;
        Ok(Self::from_document(path, locale, doc))
    }

    /// Build a catalog from an already parsed document. The result is clean.
    pub fn from_document(
        path: impl Into<PathBuf>,
        locale: impl Into<String>,
        doc: PoDocument,
    ) -> Self {
        let mut file = Self {
            path: path.into(),
            locale: locale.into(),
            header: doc.header,
            entries: doc.entries,
            ids: Vec::new(),
            index: HashMap::new(),
            dirty: false,
        };
        file.reindex();
        file
    }

    /// Create a catalog that does not exist on disk yet. The result is dirty.
    pub fn create(
        path: impl Into<PathBuf>,
        locale: impl Into<String>,
        header: Option<Entry>,
        entries: Vec<Entry>,
    ) -> Self {
        let mut file = Self::from_document(path, locale, PoDocument { header, entries });
        file.dirty = true;
        file
    }

    fn reindex(&mut self) {
        self.ids = self.entries.iter().map(Entry::id).collect();
        self.index = self
            .ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
    }

    /// Path of the catalog file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Locale code.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Header entry, if any.
    pub fn header(&self) -> Option<&Entry> {
        self.header.as_ref()
    }

    /// Whether there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of active (non-obsolete) entries.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| !e.obsolete).count()
    }

    /// Whether there are no active entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Active entries in file order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.obsolete)
    }

    /// All entries in file order, obsolete ones included.
    pub fn all_entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Keys of active entries in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .zip(&self.ids)
            .filter(|(entry, _)| !entry.obsolete)
            .map(|(_, id)| id.as_str())
    }

    /// Look up an active entry.
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.index
            .get(key)
            .map(|&i| &self.entries[i])
            .filter(|e| !e.obsolete)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.index
            .get(key)
            .copied()
            .filter(|&i| !self.entries[i].obsolete)
    }

    /// Whether an active entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Value for `key`, or `None` if there is no active entry.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entry(key).map(|e| e.value.as_str())
    }

    /// Overwrite the value of an existing entry.
    ///
    /// Returns false without touching anything when `key` has no entry; new
    /// keys come from [`CatalogFile::append`] or synchronization.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let Some(i) = self.position(key) else {
            return false;
        };
        let entry = &mut self.entries[i];
        if entry.value != value {
            entry.value = value.to_string();
            self.dirty = true;
        }
        true
    }

    /// Set or clear the fuzzy flag of an existing entry.
    pub fn set_fuzzy(&mut self, key: &str, fuzzy: bool) -> bool {
        let Some(i) = self.position(key) else {
            return false;
        };
        let entry = &mut self.entries[i];
        let changed = if fuzzy {
            let had = entry.is_fuzzy();
            entry.add_flag(FUZZY_FLAG);
            !had
        } else {
            entry.remove_flag(FUZZY_FLAG)
        };
        self.dirty |= changed;
        true
    }

    /// Add a new entry at the end.
    ///
    /// An existing active entry is updated in place instead, keeping keys unique.
    /// An obsolete entry with the same key is replaced.
    pub fn append(&mut self, key: &str, value: &str) {
        if self.contains(key) {
            self.set(key, value);
            return;
        }
        if let Some(&i) = self.index.get(key) {
            self.entries.remove(i);
        }
        self.entries.push(Entry::from_id(key, value));
        self.reindex();
        self.dirty = true;
    }

    /// Entries whose value is empty or flagged fuzzy, in file order.
    pub fn untranslated(&self) -> Vec<&Entry> {
        self.entries().filter(|e| !e.is_translated()).collect()
    }

    /// Change the key of an active entry. Returns false if `old` is absent or
    /// `new` is used by an active entry. An obsolete entry under `new` is
    /// dropped.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if self.contains(new) {
            return false;
        }
        let Some(mut i) = self.position(old) else {
            return false;
        };
        if let Some(&stale) = self.index.get(new) {
            self.entries.remove(stale);
            if stale < i {
                i -= 1;
            }
        }
        self.entries[i].set_id(new);
        self.reindex();
        self.dirty = true;
        true
    }

    /// Replace the entry sequence, e.g. with the result of a template merge.
    pub fn replace_entries(&mut self, entries: Vec<Entry>) {
        if entries != self.entries {
            self.entries = entries;
            self.reindex();
            self.dirty = true;
        }
    }

    /// Remove every obsolete entry. Returns the number removed.
    pub fn purge_obsolete(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !e.obsolete);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.reindex();
            self.dirty = true;
        }
        removed
    }

    /// Render the catalog as PO text.
    pub fn to_po_string(&self) -> String {
        po::write_po(self.header.as_ref(), &self.entries)
    }

    /// Persist the catalog if it has unsaved changes.
    ///
    /// The content is written to a temporary file in the same directory and
    /// renamed over the destination, so a failed save never leaves a partial
    /// file. On failure the dirty flag stays set. Returns whether anything was
    /// written.
    pub fn save(&mut self) -> Result<bool, CatalogError> {
        if !self.dirty {
            return Ok(false);
        }

        if let Some(header) = self.header.as_mut() {
            let now = Utc::now().format("%Y-%m-%d %H:%M%z").to_string();
            po::set_header_field(header, REVISION_DATE_FIELD, &now);
        }

        let persistence = |message: String| CatalogError::Persistence {
            path: self.path.clone(),
            message,
        };

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(|e| persistence(e.to_string()))?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(&parent).map_err(|e| persistence(e.to_string()))?;
        tmp.write_all(self.to_po_string().as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| persistence(e.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|e| persistence(e.error.to_string()))?;

        self.dirty = false;
        tracing::debug!("Saved catalog {}", self.path.display());
        Ok(true)
    }
}

impl std::fmt::Display for CatalogFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} entries)", self.path.display(), self.len())
    }
}
