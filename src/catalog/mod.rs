//! Per-locale message catalogs.
//!
//! A project keeps one catalog per locale under
//! `<locales>/<code>/LC_MESSAGES/<domain>.po`, all sharing the keys of a
//! template at `<locales>/<domain>.pot`.

pub mod entry;
pub mod file;
pub mod locale;
pub mod po;
pub mod set;
pub mod types;

pub use entry::{
    entry_id, split_entry_id, Entry, PluralForms, CONTEXT_SEPARATOR, FUZZY_FLAG,
};
pub use file::CatalogFile;
pub use locale::{language_display_name, locale_info, BuiltinLocaleNames, LocaleInfo, LocaleNames};
pub use po::{parse_po, parse_po_file, write_po, PoDocument};
pub use set::{CatalogSet, SaveReport};
pub use types::{CatalogError, CatalogLayout, RenameError, DEFAULT_DOMAIN};
