//! Unit tests for renaming keys across locales.

use std::path::Path;

use polocalize::catalog::{CatalogLayout, CatalogSet, RenameError};

fn write_catalog(root: &Path, locale: &str, body: &str) {
    let path = CatalogLayout::default().catalog_path(root, locale);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

fn catalogs() -> (tempfile::TempDir, CatalogSet) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("locales");
    write_catalog(
        &root,
        "en",
        "msgid \"a\"\nmsgstr \"Alpha\"\n\nmsgid \"b\"\nmsgstr \"Beta\"\n\nmsgid \"c\"\nmsgstr \"Gamma\"\n",
    );
    write_catalog(
        &root,
        "fr",
        "msgid \"a\"\nmsgstr \"Alpha\"\n\nmsgid \"b\"\nmsgstr \"Bêta\"\n\nmsgid \"c\"\nmsgstr \"\"\n\n#~ msgid \"beta\"\n#~ msgstr \"ancien\"\n",
    );
    let set = CatalogSet::discover(&root).unwrap();
    (dir, set)
}

#[test]
fn test_rename_keeps_position_and_values() {
    let (_dir, mut set) = catalogs();
    set.rename_key("b", "beta").unwrap();

    assert_eq!(set.keys(), &["a", "beta", "c"].map(String::from));
    assert_eq!(set.file("en").unwrap().get("beta"), Some("Beta"));
    assert_eq!(set.file("fr").unwrap().get("beta"), Some("Bêta"));
    assert!(!set.has_key("b"));
    assert!(set.inconsistent_locales().is_empty());
}

#[test]
fn test_rename_persists_after_save() {
    let (_dir, mut set) = catalogs();
    set.rename_key("c", "  gamma  ").unwrap();
    assert!(set.save_all().is_ok());

    let reloaded = CatalogSet::discover(set.root()).unwrap();
    assert_eq!(reloaded.keys(), &["a", "b", "gamma"].map(String::from));
    assert_eq!(reloaded.file("fr").unwrap().get("gamma"), Some(""));
}

#[test]
fn test_rejections_leave_set_unchanged() {
    let (_dir, mut set) = catalogs();

    assert_eq!(set.rename_key("a", ""), Err(RenameError::EmptyKey));
    assert_eq!(set.rename_key("a", "a"), Err(RenameError::Unchanged));
    assert_eq!(
        set.rename_key("a", "c"),
        Err(RenameError::Collision("c".to_string()))
    );
    assert_eq!(
        set.rename_key("zzz", "y"),
        Err(RenameError::UnknownKey("zzz".to_string()))
    );

    assert!(!set.is_dirty());
    assert_eq!(set.keys(), &["a", "b", "c"].map(String::from));
}
