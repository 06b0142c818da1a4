//! Catalog entry: one translatable key with its value for a single locale.

use serde::{Deserialize, Serialize};

/// Flag marking a value as an approximate guess that needs review.
pub const FUZZY_FLAG: &str = "fuzzy";

/// Separator between context and msgid in an entry id, as in compiled catalogs.
pub const CONTEXT_SEPARATOR: char = '\u{4}';

/// Id of an entry: the msgid, prefixed by `context` and [`CONTEXT_SEPARATOR`]
/// when there is a context.
pub fn entry_id(context: Option<&str>, key: &str) -> String {
    match context {
        Some(context) => format!("{context}{CONTEXT_SEPARATOR}{key}"),
        None => key.to_string(),
    }
}

/// Split an entry id into its context and msgid.
pub fn split_entry_id(id: &str) -> (Option<&str>, &str) {
    match id.split_once(CONTEXT_SEPARATOR) {
        Some((context, key)) => (Some(context), key),
        None => (None, id),
    }
}

/// Plural forms of an entry beyond the first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluralForms {
    /// Source text of the plural form (`msgid_plural`)
    pub id: String,
    /// Translated forms `msgstr[1..]`; form 0 lives in [`Entry::value`]
    pub forms: Vec<String>,
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Source text of the translatable unit (`msgid`)
    pub key: String,
    /// Translated text, possibly empty
    pub value: String,
    /// Optional disambiguating context (`msgctxt`)
    pub context: Option<String>,
    /// Plural data, if this is a plural entry
    pub plural: Option<PluralForms>,
    /// Flags such as `fuzzy` or `python-format`
    pub flags: Vec<String>,
    /// Translator comments (`# ...`)
    pub translator_comments: Vec<String>,
    /// Comments produced by extraction (`#. ...`)
    pub extracted_comments: Vec<String>,
    /// Source references (`#: file:line`)
    pub references: Vec<String>,
    /// Previous-source comments (`#| ...`), kept verbatim
    pub previous: Vec<String>,
    /// Whether the entry is no longer present in the template
    pub obsolete: bool,
}

impl Entry {
    /// Create an entry with the given key and value.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            context: None,
            plural: None,
            flags: Vec::new(),
            translator_comments: Vec::new(),
            extracted_comments: Vec::new(),
            references: Vec::new(),
            previous: Vec::new(),
            obsolete: false,
        }
    }

    /// Create an entry with an empty value.
    pub fn untranslated(key: impl Into<String>) -> Self {
        Self::new(key, String::new())
    }

    /// Create an entry from an id as returned by [`Entry::id`].
    pub fn from_id(id: &str, value: impl Into<String>) -> Self {
        let mut entry = Self::new("", value);
        entry.set_id(id);
        entry
    }

    /// Identity within a catalog. Entries sharing a msgid are told apart by
    /// their context.
    pub fn id(&self) -> String {
        entry_id(self.context.as_deref(), &self.key)
    }

    /// Replace key and context from an id.
    pub fn set_id(&mut self, id: &str) {
        let (context, key) = split_entry_id(id);
        self.context = context.map(str::to_string);
        self.key = key.to_string();
    }

    /// Whether the entry carries the given flag.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// Whether the entry is marked fuzzy.
    pub fn is_fuzzy(&self) -> bool {
        self.has_flag(FUZZY_FLAG)
    }

    /// Add a flag if not already present.
    pub fn add_flag(&mut self, flag: &str) {
        if !self.has_flag(flag) {
            self.flags.push(flag.to_string());
        }
    }

    /// Remove a flag. Returns true if it was present.
    pub fn remove_flag(&mut self, flag: &str) -> bool {
        let before = self.flags.len();
        self.flags.retain(|f| f != flag);
        self.flags.len() != before
    }

    /// Whether the value is non-empty (all plural forms included).
    pub fn has_value(&self) -> bool {
        if self.value.is_empty() {
            return false;
        }
        match &self.plural {
            Some(plural) => plural.forms.iter().all(|form| !form.is_empty()),
            None => true,
        }
    }

    /// Whether the entry counts as translated: a value is present and it is not fuzzy.
    pub fn is_translated(&self) -> bool {
        self.has_value() && !self.is_fuzzy()
    }

    /// Whether this is the catalog header (`msgid ""`).
    pub fn is_header(&self) -> bool {
        self.key.is_empty() && self.context.is_none()
    }
}
