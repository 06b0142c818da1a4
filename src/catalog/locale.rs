//! Locale display names.
//!
//! Resolution never fails: anything that cannot be resolved falls back to
//! the raw locale code.

use unic_langid::LanguageIdentifier;

/// English language names, keyed by ISO 639 code.
const ENGLISH_NAMES: &[(&str, &str)] = &[
    ("ar", "arabic"),
    ("be", "belarusian"),
    ("bg", "bulgarian"),
    ("bn", "bangla"),
    ("ca", "catalan"),
    ("cs", "czech"),
    ("da", "danish"),
    ("de", "german"),
    ("el", "greek"),
    ("en", "english"),
    ("eo", "esperanto"),
    ("es", "spanish"),
    ("et", "estonian"),
    ("eu", "basque"),
    ("fa", "persian"),
    ("fi", "finnish"),
    ("fr", "french"),
    ("ga", "irish"),
    ("gl", "galician"),
    ("he", "hebrew"),
    ("hi", "hindi"),
    ("hr", "croatian"),
    ("hu", "hungarian"),
    ("hy", "armenian"),
    ("id", "indonesian"),
    ("is", "icelandic"),
    ("it", "italian"),
    ("ja", "japanese"),
    ("ka", "georgian"),
    ("kk", "kazakh"),
    ("ko", "korean"),
    ("lt", "lithuanian"),
    ("lv", "latvian"),
    ("mk", "macedonian"),
    ("ms", "malay"),
    ("nb", "norwegian bokmål"),
    ("nl", "dutch"),
    ("nn", "norwegian nynorsk"),
    ("pl", "polish"),
    ("pt", "portuguese"),
    ("ro", "romanian"),
    ("ru", "russian"),
    ("sk", "slovak"),
    ("sl", "slovenian"),
    ("sq", "albanian"),
    ("sr", "serbian"),
    ("sv", "swedish"),
    ("ta", "tamil"),
    ("th", "thai"),
    ("tr", "turkish"),
    ("uk", "ukrainian"),
    ("uz", "uzbek"),
    ("vi", "vietnamese"),
    ("zh", "chinese"),
];

/// Language names in the language itself.
const NATIVE_NAMES: &[(&str, &str)] = &[
    ("ar", "العربية"),
    ("be", "беларуская"),
    ("bg", "български"),
    ("cs", "čeština"),
    ("da", "dansk"),
    ("de", "deutsch"),
    ("el", "ελληνικά"),
    ("en", "english"),
    ("es", "español"),
    ("fi", "suomi"),
    ("fr", "français"),
    ("he", "עברית"),
    ("hu", "magyar"),
    ("it", "italiano"),
    ("ja", "日本語"),
    ("kk", "қазақ тілі"),
    ("ko", "한국어"),
    ("nl", "nederlands"),
    ("pl", "polski"),
    ("pt", "português"),
    ("ro", "română"),
    ("ru", "русский"),
    ("sv", "svenska"),
    ("tr", "türkçe"),
    ("uk", "українська"),
    ("zh", "中文"),
];

/// Russian language names.
const RUSSIAN_NAMES: &[(&str, &str)] = &[
    ("ar", "арабский"),
    ("be", "белорусский"),
    ("de", "немецкий"),
    ("en", "английский"),
    ("es", "испанский"),
    ("fr", "французский"),
    ("it", "итальянский"),
    ("ja", "японский"),
    ("kk", "казахский"),
    ("ko", "корейский"),
    ("pl", "польский"),
    ("pt", "португальский"),
    ("ru", "русский"),
    ("tr", "турецкий"),
    ("uk", "украинский"),
    ("zh", "китайский"),
];

/// English region names, keyed by ISO 3166 code.
const REGION_NAMES: &[(&str, &str)] = &[
    ("AT", "Austria"),
    ("AU", "Australia"),
    ("BE", "Belgium"),
    ("BR", "Brazil"),
    ("BY", "Belarus"),
    ("CA", "Canada"),
    ("CH", "Switzerland"),
    ("CN", "China"),
    ("DE", "Germany"),
    ("ES", "Spain"),
    ("FR", "France"),
    ("GB", "United Kingdom"),
    ("IN", "India"),
    ("IT", "Italy"),
    ("JP", "Japan"),
    ("KR", "South Korea"),
    ("KZ", "Kazakhstan"),
    ("MX", "Mexico"),
    ("NL", "Netherlands"),
    ("PT", "Portugal"),
    ("RU", "Russia"),
    ("TW", "Taiwan"),
    ("UA", "Ukraine"),
    ("US", "United States"),
];

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Parse a locale code, accepting both `pt_BR` and `pt-BR`.
pub fn parse_locale(code: &str) -> Option<LanguageIdentifier> {
    code.replace('_', "-").parse().ok()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Display metadata for a locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleInfo {
    /// Raw locale code
    pub code: String,
    /// Language name, or the raw code if unknown
    pub language: String,
    /// Region name, empty if the code has no (known) region
    pub region: String,
}

/// Boundary to a locale naming service.
pub trait LocaleNames {
    /// Name of `code`'s language, expressed in `in_language`.
    fn language_name(&self, code: &str, in_language: &str) -> Option<String>;

    /// Name of `code`'s region, if it has one.
    fn region_name(&self, code: &str) -> Option<String>;
}

/// Built-in naming tables.
///
/// Names are available in English and Russian, and every language knows its
/// own name. Other display languages fall back to English.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinLocaleNames;

impl LocaleNames for BuiltinLocaleNames {
    fn language_name(&self, code: &str, in_language: &str) -> Option<String> {
        let lang = parse_locale(code)?;
        let target = parse_locale(in_language)
            .map(|l| l.language.as_str().to_string())
            .unwrap_or_default();
        let subject = lang.language.as_str();

        let localized = match target.as_str() {
            "ru" => lookup(RUSSIAN_NAMES, subject),
            t if t == subject => lookup(NATIVE_NAMES, subject),
            _ => None,
        };
        localized
            .or_else(|| lookup(ENGLISH_NAMES, subject))
            .map(str::to_string)
    }

    fn region_name(&self, code: &str) -> Option<String> {
        let lang = parse_locale(code)?;
        let region = lang.region?;
        lookup(REGION_NAMES, region.as_str()).map(str::to_string)
    }
}

/// Readable name for `code` in the reference language, e.g. `"French (fr)"`.
///
/// Falls back to the raw code when the name cannot be resolved.
pub fn language_display_name(code: &str, reference: &str) -> String {
    display_name_with(&BuiltinLocaleNames, code, reference)
}

/// [`language_display_name`] with an explicit naming service.
pub fn display_name_with(names: &dyn LocaleNames, code: &str, reference: &str) -> String {
    match names.language_name(code, reference) {
        Some(name) => format!("{} ({})", capitalize(&name), code),
        None => code.to_string(),
    }
}

/// Full display metadata for a locale.
pub fn locale_info(code: &str, reference: &str) -> LocaleInfo {
    let names = BuiltinLocaleNames;
    LocaleInfo {
        code: code.to_string(),
        language: names
            .language_name(code, reference)
            .map(|n| capitalize(&n))
            .unwrap_or_else(|| code.to_string()),
        region: names.region_name(code).unwrap_or_default(),
    }
}
