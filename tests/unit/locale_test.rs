//! Unit tests for locale display names.

use polocalize::catalog::locale::{display_name_with, LocaleNames};
use polocalize::catalog::{language_display_name, locale_info};

#[test]
fn test_names_in_reference_language() {
    assert_eq!(language_display_name("ru", "en"), "Russian (ru)");
    assert_eq!(language_display_name("en", "ru"), "Английский (en)");
    assert_eq!(language_display_name("fr", "fr"), "Français (fr)");
}

#[test]
fn test_region_code_keeps_raw_form() {
    assert_eq!(language_display_name("de_AT", "en"), "German (de_AT)");
    assert_eq!(language_display_name("de-AT", "en"), "German (de-AT)");
    assert_eq!(locale_info("de_AT", "en").region, "Austria");
}

struct Shouting;

impl LocaleNames for Shouting {
    fn language_name(&self, code: &str, _in_language: &str) -> Option<String> {
        (code == "fr").then(|| "french".to_string())
    }

    fn region_name(&self, _code: &str) -> Option<String> {
        None
    }
}

#[test]
fn test_custom_naming_service() {
    assert_eq!(display_name_with(&Shouting, "fr", "en"), "French (fr)");
    assert_eq!(display_name_with(&Shouting, "de", "en"), "de");
}
