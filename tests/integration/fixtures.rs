//! Shared test fixtures: a project tree on disk, a stand-in for `pybabel`
//! and a dictionary-backed translation oracle.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

use polocalize::catalog::CatalogLayout;
use polocalize::sync::Pybabel;
use polocalize::translate::{OracleError, OracleResponse, TranslationOracle};

/// Shell script understanding the `extract` and `compile` calls made by
/// [`Pybabel`]. Extraction reads keys from `keys.txt` (base pass) and
/// `keyword_keys.txt` (keyword pass) in the working directory; compilation
/// copies each `.po` next to itself as `.mo`.
const FAKE_PYBABEL: &str = r#"#!/bin/sh
cmd="$1"; shift
out=""; dir=""; domain=""; keyed=0
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift ;;
    -d) dir="$2"; shift ;;
    -D) domain="$2"; shift ;;
    -k) keyed=1; shift ;;
  esac
  shift
done
case "$cmd" in
  extract)
    src=keys.txt
    [ "$keyed" = 1 ] && src=keyword_keys.txt
    : > "$out"
    [ -f "$src" ] || exit 0
    while IFS= read -r key; do
      printf 'msgid "%s"\nmsgstr ""\n\n' "$key" >> "$out"
    done < "$src"
    ;;
  compile)
    for po in "$dir"/*/LC_MESSAGES/"$domain".po; do
      cp "$po" "${po%.po}.mo"
    done
    ;;
  *)
    echo "unknown command $cmd" >&2
    exit 2
    ;;
esac
"#;

/// A project directory with a `locales/` catalog tree.
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("project").join("locales")).unwrap();
        Self { dir }
    }

    pub fn project_dir(&self) -> PathBuf {
        self.dir.path().join("project")
    }

    pub fn root(&self) -> PathBuf {
        self.project_dir().join("locales")
    }

    pub fn catalog_path(&self, locale: &str) -> PathBuf {
        CatalogLayout::default().catalog_path(&self.root(), locale)
    }

    pub fn write_catalog(&self, locale: &str, body: &str) {
        let path = self.catalog_path(locale);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }

    pub fn read_catalog(&self, locale: &str) -> String {
        std::fs::read_to_string(self.catalog_path(locale)).unwrap()
    }

    /// Keys the stand-in extractor finds in the sources.
    pub fn set_source_keys(&self, keys: &[&str]) {
        write_lines(self.project_dir().join("keys.txt"), keys);
    }

    /// Keys only the keyword extraction pass finds.
    pub fn set_keyword_keys(&self, keys: &[&str]) {
        write_lines(self.project_dir().join("keyword_keys.txt"), keys);
    }

    /// A [`Pybabel`] running the stand-in script.
    #[cfg(unix)]
    pub fn pybabel(&self) -> Pybabel {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let bin = self.dir.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        let script = bin.join("pybabel");
        {
            let mut file = std::fs::File::create(&script).unwrap();
            file.write_all(FAKE_PYBABEL.as_bytes()).unwrap();
            file.sync_all().unwrap();
        }
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        Pybabel {
            program: script.display().to_string(),
            ..Default::default()
        }
    }
}

fn write_lines(path: PathBuf, lines: &[&str]) {
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(path, content).unwrap();
}

/// Oracle answering from a fixed dictionary of `(source, locale) -> text`.
#[derive(Default)]
pub struct DictionaryOracle {
    entries: HashMap<(String, String), String>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl DictionaryOracle {
    pub fn with(mut self, source: &str, locale: &str, text: &str) -> Self {
        self.entries
            .insert((source.to_string(), locale.to_string()), text.to_string());
        self
    }

    pub fn failing_on(mut self, source: &str) -> Self {
        self.failing.insert(source.to_string());
        self
    }

    /// Source texts requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl TranslationOracle for DictionaryOracle {
    async fn request_translation(
        &self,
        source_text: &str,
        target_locales: &[String],
    ) -> Result<OracleResponse, OracleError> {
        self.calls.lock().unwrap().push(source_text.to_string());
        if self.failing.contains(source_text) {
            return Err(OracleError::Unavailable("scripted failure".to_string()));
        }
        Ok(target_locales
            .iter()
            .filter_map(|locale| {
                self.entries
                    .get(&(source_text.to_string(), locale.clone()))
                    .map(|text| (locale.clone(), text.clone()))
            })
            .collect())
    }
}
