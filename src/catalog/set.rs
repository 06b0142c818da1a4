//! Catalog set: the catalogs of every locale of one project.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::entry::{split_entry_id, Entry};
use super::file::CatalogFile;
use super::locale;
use super::po::{self, PoDocument};
use super::types::{CatalogError, CatalogLayout, RenameError};

/// Header fields written into freshly created catalogs.
const NEW_CATALOG_HEADER: &str = "Content-Type: text/plain; charset=UTF-8\nContent-Transfer-Encoding: 8bit\nMIME-Version: 1.0\n";

/// Catalogs of all discovered locales plus the reference key order.
#[derive(Debug, Clone)]
pub struct CatalogSet {
    /// Locales directory
    root: PathBuf,
    /// File layout under `root`
    layout: CatalogLayout,
    /// Locale codes, reference locale first
    locales: Vec<String>,
    /// Catalog per locale
    files: HashMap<String, CatalogFile>,
    /// Canonical key order, taken from the reference locale
    reference_keys: Vec<String>,
}

/// Outcome of saving every catalog in a set.
#[derive(Debug, Default)]
pub struct SaveReport {
    /// Locales that were written
    pub saved: Vec<String>,
    /// Locales whose save failed; their edits remain in memory
    pub failed: Vec<(String, CatalogError)>,
}

impl SaveReport {
    /// Whether every dirty catalog was written.
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

impl CatalogSet {
    /// Discover catalogs under `root` using the default layout.
    pub fn discover(root: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::discover_with(root, CatalogLayout::default())
    }

    /// Discover catalogs under `root`.
    ///
    /// Every subdirectory holding `LC_MESSAGES/<domain>.po` becomes a locale.
    /// Directories without a catalog are skipped. Locales are ordered by code;
    /// the layout's preferred reference locale is moved to the front if found.
    pub fn discover_with(
        root: impl AsRef<Path>,
        layout: CatalogLayout,
    ) -> Result<Self, CatalogError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(CatalogError::DirectoryNotFound(root.display().to_string()));
        }

        let mut candidates = Vec::new();
        for dir_entry in std::fs::read_dir(&root)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(code) = dir_entry.file_name().to_str() {
                candidates.push(code.to_string());
            }
        }
        candidates.sort();

        let mut locales = Vec::new();
        let mut files = HashMap::new();
        for code in candidates {
            let path = layout.catalog_path(&root, &code);
            if !path.is_file() {
                tracing::debug!("Skipping {}: no catalog at {}", code, path.display());
                continue;
            }
            let file = CatalogFile::open(path, code.clone())?;
            locales.push(code.clone());
            files.insert(code, file);
        }

        if locales.is_empty() {
            return Err(CatalogError::EmptyCatalog { root });
        }

        if let Some(preferred) = &layout.reference_locale {
            if let Some(pos) = locales.iter().position(|l| l == preferred) {
                let code = locales.remove(pos);
                locales.insert(0, code);
            }
        }

        let reference_keys = files[&locales[0]].keys().map(str::to_string).collect();
        tracing::info!(
            "Discovered {} locales under {} (reference: {})",
            locales.len(),
            root.display(),
            locales[0]
        );

        Ok(Self {
            root,
            layout,
            locales,
            files,
            reference_keys,
        })
    }

    /// Create catalogs for `locales` from a template document.
    ///
    /// Existing catalogs are left as they are. New catalogs are written to
    /// disk immediately. The resulting set is re-discovered from disk.
    pub fn initialize(
        root: impl AsRef<Path>,
        layout: CatalogLayout,
        locales: &[String],
        template: &PoDocument,
    ) -> Result<Self, CatalogError> {
        let root = root.as_ref();
        if locales.is_empty() {
            return Err(CatalogError::NoLocales);
        }

        for code in locales {
            if code.trim().is_empty() || code.contains(['/', '\\']) {
                return Err(CatalogError::InvalidLocale(code.clone()));
            }
            let path = layout.catalog_path(root, code);
            if path.exists() {
                tracing::info!("Catalog for {} already exists, keeping it", code);
                continue;
            }

            let mut header = template
                .header
                .clone()
                .unwrap_or_else(|| Entry::new("", NEW_CATALOG_HEADER));
            header.remove_flag(super::entry::FUZZY_FLAG);
            po::set_header_field(&mut header, "Language", code);

            let entries = template
                .entries
                .iter()
                .filter(|e| !e.obsolete)
                .map(|e| Entry {
                    value: String::new(),
                    plural: e.plural.as_ref().map(|p| super::entry::PluralForms {
                        id: p.id.clone(),
                        forms: vec![String::new(); p.forms.len().max(1)],
                    }),
                    ..e.clone()
                })
                .collect();

            let mut file = CatalogFile::create(path, code.clone(), Some(header), entries);
            file.save()?;
            tracing::info!("Created catalog {}", file);
        }

        Self::discover_with(root, layout)
    }

    /// Locales directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File layout.
    pub fn layout(&self) -> &CatalogLayout {
        &self.layout
    }

    /// Active locale codes, reference first.
    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    /// The reference locale.
    pub fn reference_locale(&self) -> &str {
        &self.locales[0]
    }

    /// Keys in canonical (reference) order.
    pub fn keys(&self) -> &[String] {
        &self.reference_keys
    }

    /// Whether `key` is part of the reference key list.
    pub fn has_key(&self, key: &str) -> bool {
        self.reference_keys.iter().any(|k| k == key)
    }

    /// Catalog of a locale.
    pub fn file(&self, locale: &str) -> Option<&CatalogFile> {
        self.files.get(locale)
    }

    /// Mutable catalog of a locale.
    pub fn file_mut(&mut self, locale: &str) -> Option<&mut CatalogFile> {
        self.files.get_mut(locale)
    }

    /// Catalogs in locale order.
    pub fn files(&self) -> impl Iterator<Item = &CatalogFile> {
        self.locales.iter().filter_map(|l| self.files.get(l))
    }

    /// Whether any catalog has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.files.values().any(CatalogFile::is_dirty)
    }

    /// Text to translate for `key`: the reference value, or the msgid if that
    /// is empty.
    pub fn source_text(&self, key: &str) -> String {
        self.file(self.reference_locale())
            .and_then(|f| f.get(key))
            .filter(|v| !v.is_empty())
            .unwrap_or(split_entry_id(key).1)
            .to_string()
    }

    /// Locales that have no entry for `key` or an empty value, in locale order.
    pub fn missing_locales(&self, key: &str) -> Vec<String> {
        self.locales
            .iter()
            .filter(|l| {
                self.files
                    .get(*l)
                    .and_then(|f| f.get(key))
                    .map_or(true, |v| v.trim().is_empty())
            })
            .cloned()
            .collect()
    }

    /// Set the value of `key` in one locale, appending the entry if absent.
    ///
    /// A key appended to the reference catalog joins the reference key list.
    /// Returns false for an unknown locale.
    pub fn set_value(&mut self, locale: &str, key: &str, value: &str) -> bool {
        let Some(file) = self.files.get_mut(locale) else {
            return false;
        };
        if file.contains(key) {
            file.set(key, value);
            return true;
        }
        file.append(key, value);
        if locale == self.locales[0] && !self.has_key(key) {
            self.reference_keys.push(key.to_string());
        }
        true
    }

    /// Rename a key in every locale.
    ///
    /// Rejected, leaving everything unchanged, when `new` is empty, equal to
    /// `old`, already present, or when `old` is unknown. In memory only;
    /// callers persist with [`CatalogSet::save_all`].
    pub fn rename_key(&mut self, old: &str, new: &str) -> Result<(), RenameError> {
        let new = new.trim();
        if split_entry_id(new).1.is_empty() {
            return Err(RenameError::EmptyKey);
        }
        if new == old {
            return Err(RenameError::Unchanged);
        }
        if self.has_key(new) || self.files.values().any(|f| f.contains(new)) {
            return Err(RenameError::Collision(new.to_string()));
        }
        let Some(pos) = self.reference_keys.iter().position(|k| k == old) else {
            return Err(RenameError::UnknownKey(old.to_string()));
        };

        for file in self.files.values_mut() {
            file.rename(old, new);
        }
        self.reference_keys[pos] = new.to_string();
        tracing::info!("Renamed key {:?} to {:?}", old, new);
        Ok(())
    }

    /// Readable name of a locale, e.g. `"French (fr)"`.
    pub fn language_display_name(&self, code: &str, reference: &str) -> String {
        locale::language_display_name(code, reference)
    }

    /// Locales whose key set differs from the reference.
    pub fn inconsistent_locales(&self) -> Vec<String> {
        let reference: std::collections::HashSet<&str> =
            self.reference_keys.iter().map(String::as_str).collect();
        self.locales
            .iter()
            .filter(|l| {
                self.files.get(*l).map_or(true, |f| {
                    f.len() != reference.len() || f.keys().any(|k| !reference.contains(k))
                })
            })
            .cloned()
            .collect()
    }

    /// Save every dirty catalog. A failure for one locale does not stop the others.
    pub fn save_all(&mut self) -> SaveReport {
        let mut report = SaveReport::default();
        for locale in &self.locales {
            let Some(file) = self.files.get_mut(locale) else {
                continue;
            };
            match file.save() {
                Ok(true) => report.saved.push(locale.clone()),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!("Failed to save catalog for {}: {}", locale, e);
                    report.failed.push((locale.clone(), e));
                }
            }
        }
        report
    }

    /// Recompute the reference key order from the reference catalog.
    pub fn refresh_keys(&mut self) {
        self.reference_keys = self
            .files
            .get(&self.locales[0])
            .map(|f| f.keys().map(str::to_string).collect())
            .unwrap_or_default();
    }

    /// Reload every catalog from disk, discarding in-memory changes.
    pub fn reload(&mut self) -> Result<(), CatalogError> {
        *self = Self::discover_with(&self.root, self.layout.clone())?;
        Ok(())
    }
}
