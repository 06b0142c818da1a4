//! Unit tests for merging catalogs against a template.

use std::path::Path;

use polocalize::catalog::{parse_po, Entry, PluralForms};
use polocalize::sync::{merge_entries, Template};

fn template(pot: &str) -> Template {
    Template::from_document(parse_po(pot, Path::new("messages.pot")).unwrap())
}

#[test]
fn test_new_plural_key_gets_empty_forms() {
    let pot = "msgid \"file\"\nmsgid_plural \"files\"\nmsgstr[0] \"\"\nmsgstr[1] \"\"\n";
    let outcome = merge_entries(&[], &template(pot));

    let entry = &outcome.entries[0];
    assert_eq!(entry.value, "");
    assert_eq!(
        entry.plural,
        Some(PluralForms {
            id: "files".to_string(),
            forms: vec![String::new()],
        })
    );
    assert_eq!(outcome.added, 1);
}

#[test]
fn test_existing_plural_forms_kept() {
    let pot = "msgid \"file\"\nmsgid_plural \"files\"\nmsgstr[0] \"\"\nmsgstr[1] \"\"\n";
    let mut existing = Entry::new("file", "Datei");
    existing.plural = Some(PluralForms {
        id: "files".to_string(),
        forms: vec!["Dateien".to_string()],
    });

    let outcome = merge_entries(&[existing], &template(pot));
    assert_eq!(outcome.entries[0].value, "Datei");
    assert_eq!(outcome.entries[0].plural.as_ref().unwrap().forms, vec!["Dateien"]);
    assert_eq!(outcome.added, 0);
}

#[test]
fn test_references_follow_template() {
    let pot = "#: app/new.py:3\nmsgid \"hello\"\nmsgstr \"\"\n";
    let mut existing = Entry::new("hello", "Hallo");
    existing.references = vec!["app/old.py:1".to_string()];
    existing.translator_comments = vec!["checked".to_string()];

    let outcome = merge_entries(&[existing], &template(pot));
    let merged = &outcome.entries[0];
    assert_eq!(merged.references, vec!["app/new.py:3"]);
    assert_eq!(merged.translator_comments, vec!["checked"]);
    assert_eq!(merged.value, "Hallo");
}

#[test]
fn test_every_locale_gets_same_key_order() {
    let tpl = Template::from_keys(["c", "a", "b"]);
    let en = vec![Entry::new("a", "A"), Entry::new("b", "B")];
    let fr = vec![Entry::new("b", "Bé"), Entry::new("z", "Zed")];

    let order = |entries: &[Entry]| -> Vec<String> {
        entries
            .iter()
            .filter(|e| !e.obsolete)
            .map(|e| e.key.clone())
            .collect()
    };
    let en = merge_entries(&en, &tpl);
    let fr = merge_entries(&fr, &tpl);

    assert_eq!(order(&en.entries), vec!["c", "a", "b"]);
    assert_eq!(order(&en.entries), order(&fr.entries));
    assert_eq!(fr.obsoleted, 1);
}
