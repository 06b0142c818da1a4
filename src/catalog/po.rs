//! Gettext PO/POT reader and writer.
//!
//! Covers the subset of the format produced by common extraction tools:
//! header entry, comments of every kind, flags, `msgctxt`, plural forms,
//! multi-line strings and obsolete (`#~`) entries. Line wrapping is not
//! reproduced on output; strings are only split at embedded newlines.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use super::entry::{Entry, PluralForms};
use super::types::CatalogError;

/// A parsed PO or POT document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoDocument {
    /// Header entry (`msgid ""`), if present
    pub header: Option<Entry>,
    /// Entries in file order, obsolete ones included
    pub entries: Vec<Entry>,
}

/// Which string a continuation line appends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Context,
    Id,
    IdPlural,
    Str,
    StrPlural(usize),
}

/// Entry being assembled while reading lines.
#[derive(Default)]
struct Pending {
    context: Option<String>,
    id: Option<String>,
    id_plural: Option<String>,
    value: Option<String>,
    plural_values: BTreeMap<usize, String>,
    flags: Vec<String>,
    translator_comments: Vec<String>,
    extracted_comments: Vec<String>,
    references: Vec<String>,
    previous: Vec<String>,
    obsolete: bool,
}

impl Pending {
    fn has_msgstr(&self) -> bool {
        self.value.is_some() || !self.plural_values.is_empty()
    }

    fn into_entry(mut self) -> Option<Entry> {
        let key = self.id.take()?;
        let (value, plural) = match self.id_plural.take() {
            Some(id) => {
                let value = self.plural_values.remove(&0).unwrap_or_default();
                let count = self.plural_values.keys().max().copied().unwrap_or(1);
                let forms = (1..=count)
                    .map(|i| self.plural_values.remove(&i).unwrap_or_default())
                    .collect();
                (value, Some(PluralForms { id, forms }))
            }
            None => (self.value.take().unwrap_or_default(), None),
        };

        Some(Entry {
            key,
            value,
            context: self.context,
            plural,
            flags: self.flags,
            translator_comments: self.translator_comments,
            extracted_comments: self.extracted_comments,
            references: self.references,
            previous: self.previous,
            obsolete: self.obsolete,
        })
    }
}

/// Parse PO content. `path` is only used for error messages.
pub fn parse_po(content: &str, path: &Path) -> Result<PoDocument, CatalogError> {
    let mut doc = PoDocument::default();
    let mut pending = Pending::default();
    let mut field = Field::None;

    let parse_err = |line: usize, message: String| CatalogError::Parse {
        path: path.to_path_buf(),
        line,
        message,
    };

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let mut line = raw.trim();

        if line.is_empty() {
            finish(&mut doc, std::mem::take(&mut pending));
            field = Field::None;
            continue;
        }

        let mut obsolete = false;
        if let Some(rest) = line.strip_prefix("#~") {
            obsolete = true;
            line = rest.trim_start();
            if line.is_empty() {
                continue;
            }
        }

        if line.starts_with('#') && !obsolete {
            // A comment after a complete msgstr starts the next entry.
            if pending.has_msgstr() {
                finish(&mut doc, std::mem::take(&mut pending));
            }
            field = Field::None;
            parse_comment(&mut pending, line);
            continue;
        }

        if obsolete {
            // "#~|" previous-source lines of obsolete entries
            if let Some(rest) = line.strip_prefix('|') {
                pending.previous.push(rest.trim().to_string());
                continue;
            }
            if line.starts_with('#') {
                continue;
            }
        }

        if line.starts_with('"') {
            let text = parse_quoted(line).map_err(|m| parse_err(line_no, m))?;
            let target = match field {
                Field::None => {
                    return Err(parse_err(line_no, "string without keyword".to_string()))
                }
                Field::Context => pending.context.get_or_insert_with(String::new),
                Field::Id => pending.id.get_or_insert_with(String::new),
                Field::IdPlural => pending.id_plural.get_or_insert_with(String::new),
                Field::Str => pending.value.get_or_insert_with(String::new),
                Field::StrPlural(n) => pending.plural_values.entry(n).or_default(),
            };
            target.push_str(&text);
            continue;
        }

        let (keyword, rest) = match line.find(|c: char| c.is_whitespace()) {
            Some(pos) => (&line[..pos], line[pos..].trim_start()),
            None => return Err(parse_err(line_no, format!("unexpected line {line:?}"))),
        };
        let text = parse_quoted(rest).map_err(|m| parse_err(line_no, m))?;

        if matches!(keyword, "msgctxt" | "msgid") && pending.has_msgstr() {
            finish(&mut doc, std::mem::take(&mut pending));
        }
        pending.obsolete |= obsolete;

        field = match keyword {
            "msgctxt" => {
                pending.context = Some(text);
                Field::Context
            }
            "msgid" => {
                pending.id = Some(text);
                Field::Id
            }
            "msgid_plural" => {
                pending.id_plural = Some(text);
                Field::IdPlural
            }
            "msgstr" => {
                pending.value = Some(text);
                Field::Str
            }
            other => match plural_index(other) {
                Some(n) => {
                    pending.plural_values.insert(n, text);
                    Field::StrPlural(n)
                }
                None => {
                    return Err(parse_err(line_no, format!("unknown keyword {other:?}")));
                }
            },
        };
    }
    finish(&mut doc, pending);

    check_unique(&mut doc, path)?;
    Ok(doc)
}

/// Parse a PO file from disk.
pub fn parse_po_file(path: &Path) -> Result<PoDocument, CatalogError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CatalogError::Io(format!("{}: {}", path.display(), e)))?;
    parse_po(&content, path)
}

fn finish(doc: &mut PoDocument, pending: Pending) {
    if let Some(entry) = pending.into_entry() {
        if entry.is_header() && doc.header.is_none() && doc.entries.is_empty() {
            doc.header = Some(entry);
        } else {
            doc.entries.push(entry);
        }
    }
}

/// Active entry ids must be unique; the same msgid may appear once per
/// context. An obsolete entry that repeats an id is dropped.
fn check_unique(doc: &mut PoDocument, path: &Path) -> Result<(), CatalogError> {
    let mut active = HashSet::new();
    for entry in doc.entries.iter().filter(|e| !e.obsolete) {
        let id = entry.id();
        if active.contains(&id) {
            return Err(CatalogError::DuplicateKey {
                path: path.to_path_buf(),
                key: id,
            });
        }
        active.insert(id);
    }

    let mut obsolete_seen = HashSet::new();
    doc.entries.retain(|entry| {
        if !entry.obsolete {
            return true;
        }
        let id = entry.id();
        let keep = !active.contains(&id) && obsolete_seen.insert(id);
        if !keep {
            tracing::warn!(
                "Dropping duplicate obsolete entry {:?} in {}",
                entry.key,
                path.display()
            );
        }
        keep
    });
    Ok(())
}

fn parse_comment(pending: &mut Pending, line: &str) {
    let mut chars = line.chars();
    chars.next();
    let kind = chars.next();
    let rest = |skip: usize| line[skip..].trim().to_string();

    match kind {
        Some(',') => {
            for flag in line[2..].split(',') {
                let flag = flag.trim();
                if !flag.is_empty() && !pending.flags.iter().any(|f| f == flag) {
                    pending.flags.push(flag.to_string());
                }
            }
        }
        Some('.') => pending.extracted_comments.push(rest(2)),
        Some(':') => pending.references.push(rest(2)),
        Some('|') => pending.previous.push(rest(2)),
        Some(' ') => pending.translator_comments.push(line[2..].to_string()),
        _ => pending.translator_comments.push(line[1..].to_string()),
    }
}

fn plural_index(keyword: &str) -> Option<usize> {
    keyword
        .strip_prefix("msgstr[")?
        .strip_suffix(']')?
        .parse()
        .ok()
}

/// Parse a double-quoted C-style string literal.
fn parse_quoted(s: &str) -> Result<String, String> {
    let inner = s
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| format!("expected quoted string, got {s:?}"))?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => return Err("dangling escape at end of string".to_string()),
        }
    }
    Ok(out)
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Write one keyword line, splitting multi-line strings after each `\n`.
fn write_field(out: &mut String, prefix: &str, keyword: &str, text: &str) {
    let trimmed = text.strip_suffix('\n').unwrap_or(text);
    if !trimmed.contains('\n') {
        out.push_str(&format!("{prefix}{keyword} \"{}\"\n", escape(text)));
        return;
    }

    out.push_str(&format!("{prefix}{keyword} \"\"\n"));
    for chunk in text.split_inclusive('\n') {
        out.push_str(&format!("{prefix}\"{}\"\n", escape(chunk)));
    }
}

fn write_entry(out: &mut String, entry: &Entry) {
    for comment in &entry.translator_comments {
        if comment.is_empty() {
            out.push_str("#\n");
        } else {
            out.push_str(&format!("# {comment}\n"));
        }
    }

    let prefix = if entry.obsolete {
        "#~ "
    } else {
        for comment in &entry.extracted_comments {
            out.push_str(&format!("#. {comment}\n"));
        }
        for reference in &entry.references {
            out.push_str(&format!("#: {reference}\n"));
        }
        ""
    };

    if !entry.flags.is_empty() {
        out.push_str(&format!("#, {}\n", entry.flags.join(", ")));
    }
    for previous in &entry.previous {
        if entry.obsolete {
            out.push_str(&format!("#~| {previous}\n"));
        } else {
            out.push_str(&format!("#| {previous}\n"));
        }
    }

    if let Some(context) = &entry.context {
        write_field(out, prefix, "msgctxt", context);
    }
    write_field(out, prefix, "msgid", &entry.key);
    match &entry.plural {
        Some(plural) => {
            write_field(out, prefix, "msgid_plural", &plural.id);
            write_field(out, prefix, "msgstr[0]", &entry.value);
            for (i, form) in plural.forms.iter().enumerate() {
                write_field(out, prefix, &format!("msgstr[{}]", i + 1), form);
            }
        }
        None => write_field(out, prefix, "msgstr", &entry.value),
    }
}

/// Serialize a header and entries to PO text.
pub fn write_po(header: Option<&Entry>, entries: &[Entry]) -> String {
    let mut out = String::new();
    let mut first = true;

    for entry in header.into_iter().chain(entries.iter()) {
        if !first {
            out.push('\n');
        }
        first = false;
        write_entry(&mut out, entry);
    }
    out
}

/// Read a `Name: value` field from a header entry.
pub fn header_field(header: &Entry, name: &str) -> Option<String> {
    header.value.lines().find_map(|line| {
        let (field, value) = line.split_once(':')?;
        (field.trim() == name).then(|| value.trim().to_string())
    })
}

/// Set or append a `Name: value` field on a header entry.
pub fn set_header_field(header: &mut Entry, name: &str, value: &str) {
    let mut found = false;
    let mut lines: Vec<String> = header
        .value
        .lines()
        .map(|line| match line.split_once(':') {
            Some((field, _)) if field.trim() == name => {
                found = true;
                format!("{name}: {value}")
            }
            _ => line.to_string(),
        })
        .collect();
    if !found {
        lines.push(format!("{name}: {value}"));
    }

    let mut joined = lines.join("\n");
    joined.push('\n');
    header.value = joined;
}
