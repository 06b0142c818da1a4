//! Integration tests for batch translation against catalogs on disk.

use polocalize::catalog::{CatalogLayout, CatalogSet};
use polocalize::storage::TranslateSettings;
use polocalize::translate::{CancellationToken, TranslationOrchestrator};

use super::fixtures::{DictionaryOracle, Project};

fn project() -> Project {
    let project = Project::new();
    project.write_catalog(
        "en",
        "msgid \"hello\"\nmsgstr \"Hello\"\n\nmsgid \"bye\"\nmsgstr \"Goodbye\"\n",
    );
    project.write_catalog("fr", "msgid \"hello\"\nmsgstr \"\"\n");
    project.write_catalog(
        "de",
        "msgid \"hello\"\nmsgstr \"\"\n\nmsgid \"bye\"\nmsgstr \"Tschüss\"\n",
    );
    project
}

fn dictionary() -> DictionaryOracle {
    DictionaryOracle::default()
        .with("Hello", "fr", "Bonjour")
        .with("Hello", "de", "Hallo")
        .with("Goodbye", "fr", "Au revoir")
}

fn open(project: &Project) -> CatalogSet {
    CatalogSet::discover_with(project.root(), CatalogLayout::default().with_reference("en"))
        .unwrap()
}

#[tokio::test]
async fn test_translate_all_and_save() {
    let project = project();
    let mut set = open(&project);
    let orchestrator = TranslationOrchestrator::new(dictionary(), TranslateSettings::default());

    let report = orchestrator
        .translate_all(&mut set, &CancellationToken::new())
        .await;
    assert_eq!(report.processed, 2);
    assert_eq!(report.translated.len(), 2);
    assert!(set.save_all().is_ok());

    let reloaded = open(&project);
    let fr = reloaded.file("fr").unwrap();
    assert_eq!(fr.get("hello"), Some("Bonjour"));
    assert_eq!(fr.get("bye"), Some("Au revoir"));
    assert_eq!(reloaded.file("de").unwrap().get("hello"), Some("Hallo"));
    assert_eq!(reloaded.file("de").unwrap().get("bye"), Some("Tschüss"));
    assert!(reloaded.inconsistent_locales().is_empty());
}

#[tokio::test]
async fn test_second_run_is_a_no_op() {
    let project = project();
    let mut set = open(&project);
    let orchestrator = TranslationOrchestrator::new(dictionary(), TranslateSettings::default());
    let cancel = CancellationToken::new();

    orchestrator.translate_all(&mut set, &cancel).await;
    let calls = orchestrator.oracle().calls().len();
    let report = orchestrator.translate_all(&mut set, &cancel).await;

    assert_eq!(orchestrator.oracle().calls().len(), calls);
    assert_eq!(report.skipped, 2);
}

#[tokio::test]
async fn test_failed_key_does_not_block_others() {
    let project = project();
    let mut set = open(&project);
    let oracle = dictionary().failing_on("Hello");
    let orchestrator = TranslationOrchestrator::new(oracle, TranslateSettings::default());

    let report = orchestrator
        .translate_all(&mut set, &CancellationToken::new())
        .await;
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].key, "hello");
    assert_eq!(report.translated, vec!["bye"]);
    assert!(set.save_all().is_ok());

    let reloaded = open(&project);
    assert_eq!(reloaded.file("fr").unwrap().get("hello"), Some(""));
    assert_eq!(reloaded.file("fr").unwrap().get("bye"), Some("Au revoir"));
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let project = project();
    let mut set = open(&project);
    let orchestrator = TranslationOrchestrator::new(dictionary(), TranslateSettings::default());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = orchestrator.translate_all(&mut set, &cancel).await;

    assert!(report.cancelled);
    assert_eq!(report.processed, 0);
    assert!(orchestrator.oracle().calls().is_empty());
    assert!(!set.is_dirty());
}
