//! Unit tests for the PO reader and writer.

use std::path::Path;

use polocalize::catalog::po::header_field;
use polocalize::catalog::{parse_po, write_po, CatalogError};

/// Catalog as produced by `pybabel update`.
const BABEL_CATALOG: &str = r#"# German translations for PROJECT.
# Copyright (C) 2024 ORGANIZATION
#
msgid ""
msgstr ""
"Project-Id-Version: PROJECT VERSION\n"
"Language: de\n"
"Plural-Forms: nplurals=2; plural=(n != 1);\n"
"Content-Type: text/plain; charset=utf-8\n"

#: app/views.py:10 app/views.py:42
msgid "Settings"
msgstr "Einstellungen"

#. TRANSLATORS: keep it short
#: app/views.py:12
#, python-format
msgid "%(count)d file"
msgid_plural "%(count)d files"
msgstr[0] "%(count)d Datei"
msgstr[1] "%(count)d Dateien"

#: app/menu.py:3
msgctxt "menu"
msgid "Open"
msgstr ""

#: app/about.py:7
msgid ""
"First line\n"
"second line"
msgstr ""
"Erste Zeile\n"
"zweite Zeile"

#~ msgid "Removed"
#~ msgstr "Entfernt"
"#;

#[test]
fn test_babel_catalog() {
    let doc = parse_po(BABEL_CATALOG, Path::new("de.po")).unwrap();

    let header = doc.header.as_ref().unwrap();
    assert_eq!(header_field(header, "Language").as_deref(), Some("de"));
    assert_eq!(
        header_field(header, "Plural-Forms").as_deref(),
        Some("nplurals=2; plural=(n != 1);")
    );

    assert_eq!(doc.entries.len(), 5);
    let settings = &doc.entries[0];
    assert_eq!(settings.value, "Einstellungen");
    assert_eq!(settings.references, vec!["app/views.py:10 app/views.py:42"]);

    let files = &doc.entries[1];
    assert_eq!(files.key, "%(count)d file");
    assert_eq!(files.value, "%(count)d Datei");
    assert_eq!(files.extracted_comments, vec!["TRANSLATORS: keep it short"]);
    assert!(files.has_flag("python-format"));
    assert!(files.is_translated());

    let open = &doc.entries[2];
    assert_eq!(open.context.as_deref(), Some("menu"));
    assert!(!open.is_translated());

    let multi = &doc.entries[3];
    assert_eq!(multi.key, "First line\nsecond line");
    assert_eq!(multi.value, "Erste Zeile\nzweite Zeile");

    assert!(doc.entries[4].obsolete);
}

#[test]
fn test_written_catalog_reads_back_identically() {
    let doc = parse_po(BABEL_CATALOG, Path::new("de.po")).unwrap();
    let written = write_po(doc.header.as_ref(), &doc.entries);

    assert!(written.contains("#~ msgid \"Removed\""));
    assert!(written.contains("msgstr[1] \"%(count)d Dateien\""));
    assert_eq!(parse_po(&written, Path::new("de.po")).unwrap(), doc);
}

#[test]
fn test_empty_input() {
    let doc = parse_po("", Path::new("empty.po")).unwrap();
    assert!(doc.header.is_none());
    assert!(doc.entries.is_empty());
}

#[test]
fn test_error_reports_path() {
    let err = parse_po("msgid \"a\"\nmsgstr \"b\"\nmsgfoo \"c\"\n", Path::new("x/fr.po"))
        .unwrap_err();
    match err {
        CatalogError::Parse { path, line, .. } => {
            assert_eq!(path, Path::new("x/fr.po"));
            assert_eq!(line, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}
