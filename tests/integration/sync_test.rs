//! Integration tests for catalog synchronization.

use std::path::Path;

use polocalize::catalog::CatalogSet;
use polocalize::sync::{Extractor, SyncError, SynchronizationEngine, Template};

use super::fixtures::Project;

/// Extractor returning a fixed key list.
struct KeyList(Vec<&'static str>);

impl Extractor for KeyList {
    fn extract(&self, _project_dir: &Path, _template_path: &Path) -> Result<Template, SyncError> {
        Ok(Template::from_keys(self.0.iter().copied()))
    }
}

/// Extractor loading a template written by the test.
struct PotFile(String);

impl Extractor for PotFile {
    fn extract(&self, _project_dir: &Path, template_path: &Path) -> Result<Template, SyncError> {
        std::fs::write(template_path, &self.0).unwrap();
        Ok(Template::load(template_path)?)
    }
}

const EN: &str = "msgid \"a\"\nmsgstr \"Apple\"\n\nmsgid \"x\"\nmsgstr \"Xylophone\"\n";
const FR: &str = "msgid \"a\"\nmsgstr \"Pomme\"\n\nmsgid \"x\"\nmsgstr \"Xylophone\"\n";

#[test]
fn test_sync_adds_new_keys_and_purges_removed() {
    let project = Project::new();
    project.write_catalog("en", EN);
    project.write_catalog("fr", FR);

    let mut set = CatalogSet::discover(project.root()).unwrap();
    let report = SynchronizationEngine::new(KeyList(vec!["a", "b", "c"]))
        .synchronize(&mut set)
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.template_keys, 3);
    assert_eq!(report.merged.len(), 2);
    assert_eq!(report.merged[0].added, 2);
    assert_eq!(report.merged[0].obsoleted, 1);
    assert_eq!(report.purged, 2);

    assert_eq!(set.keys(), &["a", "b", "c"].map(String::from));
    for locale in ["en", "fr"] {
        let file = set.file(locale).unwrap();
        assert_eq!(file.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert!(!file.is_dirty());
        assert!(!project.read_catalog(locale).contains("Xylophone"));
    }
    assert_eq!(set.file("fr").unwrap().get("a"), Some("Pomme"));
    assert_eq!(set.file("fr").unwrap().get("b"), Some(""));
}

#[test]
fn test_sync_carries_unsaved_edits() {
    let project = Project::new();
    project.write_catalog("en", EN);
    project.write_catalog("fr", FR);

    let mut set = CatalogSet::discover(project.root()).unwrap();
    set.file_mut("fr").unwrap().set("a", "Pomme verte");

    SynchronizationEngine::new(KeyList(vec!["a"]))
        .synchronize(&mut set)
        .unwrap();

    assert_eq!(set.file("fr").unwrap().get("a"), Some("Pomme verte"));
    assert!(project.read_catalog("fr").contains("Pomme verte"));
}

#[test]
fn test_failed_locale_is_reported_and_others_continue() {
    let project = Project::new();
    project.write_catalog("en", EN);
    project.write_catalog("fr", FR);

    let mut set = CatalogSet::discover(project.root()).unwrap();
    // The fr catalog can no longer be replaced by a file
    std::fs::remove_file(project.catalog_path("fr")).unwrap();
    std::fs::create_dir(project.catalog_path("fr")).unwrap();

    let report = SynchronizationEngine::new(KeyList(vec!["a", "b"]))
        .synchronize(&mut set)
        .unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.merge_errors.len(), 1);
    assert_eq!(report.merge_errors[0].locale, "fr");
    assert!(report.purge_skipped);
    assert!(report.inconsistent.contains(&"fr".to_string()));
    assert_eq!(report.merged.len(), 1);

    // en was merged and saved, obsolete entry kept because the purge was skipped
    let en = project.read_catalog("en");
    assert!(en.contains("msgid \"b\""));
    assert!(en.contains("#~ msgid \"x\""));

    // fr keeps its merged state in memory for a later save
    let fr = set.file("fr").unwrap();
    assert!(fr.is_dirty());
    assert_eq!(fr.keys().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn test_obsolete_entry_revived_with_value() {
    let project = Project::new();
    project.write_catalog("en", EN);

    let mut set = CatalogSet::discover(project.root()).unwrap();
    SynchronizationEngine::new(KeyList(vec!["a"]))
        .with_purge(false)
        .synchronize(&mut set)
        .unwrap();
    assert!(project.read_catalog("en").contains("#~ msgid \"x\""));
    assert!(!set.has_key("x"));

    let report = SynchronizationEngine::new(KeyList(vec!["a", "x"]))
        .with_purge(false)
        .synchronize(&mut set)
        .unwrap();

    assert_eq!(report.merged[0].revived, 1);
    assert_eq!(set.file("en").unwrap().get("x"), Some("Xylophone"));
    assert!(!project.read_catalog("en").contains("#~"));
}

#[test]
fn test_sync_keeps_context_twins_apart() {
    let project = Project::new();
    project.write_catalog("en", "msgid \"Open\"\nmsgstr \"Open\"\n");
    project.write_catalog("fr", "msgid \"Open\"\nmsgstr \"Ouvert\"\n");
    let pot = "msgid \"Open\"\nmsgstr \"\"\n\nmsgctxt \"menu\"\nmsgid \"Open\"\nmsgstr \"\"\n";

    let mut set = CatalogSet::discover(project.root()).unwrap();
    let report = SynchronizationEngine::new(PotFile(pot.to_string()))
        .synchronize(&mut set)
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.merged[0].added, 1);
    assert_eq!(set.keys(), &["Open".to_string(), "menu\u{4}Open".to_string()]);

    let fr = set.file("fr").unwrap();
    assert_eq!(fr.get("Open"), Some("Ouvert"));
    assert_eq!(fr.get("menu\u{4}Open"), Some(""));
    assert!(project
        .read_catalog("fr")
        .contains("msgctxt \"menu\"\nmsgid \"Open\"\nmsgstr \"\""));
}
