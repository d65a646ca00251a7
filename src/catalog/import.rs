//! Import collaborators: the `Importer` capability, a JSON implementation
//! and the filename-to-locale guesser.

use super::error::ImportError;
use super::store::Resources;
use super::tag::{LocaleTag, UNDEFINED};
use serde_json::Value as JsonValue;
use std::io::Read;
use std::path::Path;

/// Populates a value store from a byte source.
pub trait Importer: Send + Sync {
    /// Parse `src` and `put` its entries into `target`.
    ///
    /// Returns the number of entries written.
    fn import(&self, target: &Resources, src: &mut dyn Read) -> Result<usize, ImportError>;
}

/// Reads JSON objects mapping IDs to texts.
///
/// Nested objects are flattened with `.`:
///
/// ```json
/// { "greeting": "Hello %s", "menu": { "open": "Open" } }
/// ```
///
/// yields `greeting` and `menu.open`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonImporter;

impl Importer for JsonImporter {
    fn import(&self, target: &Resources, src: &mut dyn Read) -> Result<usize, ImportError> {
        let document: JsonValue = serde_json::from_reader(src)?;
        let JsonValue::Object(map) = document else {
            return Err(ImportError::Malformed(
                "top level must be an object".to_string(),
            ));
        };

        let mut texts = Vec::new();
        flatten("", &map, &mut texts)?;

        let count = texts.len();
        for (id, text) in texts {
            target.put_text(id, text);
        }
        Ok(count)
    }
}

fn flatten(
    prefix: &str,
    map: &serde_json::Map<String, JsonValue>,
    out: &mut Vec<(String, String)>,
) -> Result<(), ImportError> {
    for (key, value) in map {
        let id = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            JsonValue::String(text) => out.push((id, text.clone())),
            JsonValue::Object(nested) => flatten(&id, nested, out)?,
            other => {
                return Err(ImportError::Malformed(format!(
                    "value for '{}' must be a string, got {}",
                    id, other
                )))
            }
        }
    }
    Ok(())
}

/// Guess a locale from a file path.
///
/// Looks at the dot-separated parts of the file stem from last to first
/// (`app.de-AT.json` -> `de-AT`), then at `_`/`-` suffixes of each part
/// (`strings_fr.json` -> `fr`), then at the parent directory name
/// (`locales/pt-BR/app.json` -> `pt-BR`). Only two-letter languages and
/// `und` are accepted, so words such as `app` are not mistaken for
/// locales. Within a part, a candidate written in canonical case wins over
/// a longer one that is not (`ui_fr.json` -> `fr`, `en_US.json` -> `en-US`).
/// Falls back to `und`.
pub fn guess_locale_from_filename(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    for segment in stem.rsplit('.') {
        if let Some(tag) = guess_from_segment(segment) {
            return tag.to_string();
        }
    }

    path.parent()
        .and_then(|dir| dir.file_name())
        .and_then(|name| name.to_str())
        .and_then(guess_from_segment)
        .map(|tag| tag.to_string())
        .unwrap_or_else(|| UNDEFINED.to_string())
}

fn guess_from_segment(segment: &str) -> Option<LocaleTag> {
    let tokens: Vec<&str> = segment.split(['-', '_']).collect();
    let candidates: Vec<(String, LocaleTag)> = (0..tokens.len())
        .filter_map(|start| {
            let candidate = tokens[start..].join("-");
            LocaleTag::parse(&candidate)
                .ok()
                .filter(|tag| tag.language().len() == 2 || tag.is_undefined())
                .map(|tag| (candidate, tag))
        })
        .collect();

    // Canonically cased candidates first: `ui_fr` is a word plus `fr`,
    // while `en_US` is a language plus region.
    let canonical = candidates
        .iter()
        .position(|(candidate, tag)| *candidate == tag.to_string());
    let pick = canonical.unwrap_or(0);
    candidates.into_iter().nth(pick).map(|(_, tag)| tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn import_json(json: &str) -> (Resources, Result<usize, ImportError>) {
        let target = Resources::new(LocaleTag::parse("en").unwrap());
        let result = JsonImporter.import(&target, &mut Cursor::new(json.as_bytes()));
        (target, result)
    }

    // ==================== JSON Importer Tests ====================

    #[test]
    fn test_json_flat() {
        let (target, result) = import_json(r#"{"greeting": "Hello %s", "bye": "Bye"}"#);
        assert_eq!(result.unwrap(), 2);
        assert_eq!(target.get("greeting").unwrap().text(), "Hello %s");
    }

    #[test]
    fn test_json_nested_flattened() {
        let (target, result) = import_json(r#"{"menu": {"file": {"open": "Open"}}}"#);
        assert_eq!(result.unwrap(), 1);
        assert!(target.contains("menu.file.open"));
    }

    #[test]
    fn test_json_entries_carry_store_tag() {
        let (target, _) = import_json(r#"{"a": "A"}"#);
        assert_eq!(target.get("a").unwrap().tag().to_string(), "en");
    }

    #[test]
    fn test_json_invalid_syntax() {
        let (target, result) = import_json("{not json");
        assert!(matches!(result, Err(ImportError::Json(_))));
        assert!(target.is_empty());
    }

    #[test]
    fn test_json_top_level_array() {
        let (_, result) = import_json(r#"["a", "b"]"#);
        assert!(matches!(result, Err(ImportError::Malformed(_))));
    }

    #[test]
    fn test_json_non_string_value() {
        let (target, result) = import_json(r#"{"a": "A", "n": 3}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("'n'"));
        assert!(target.is_empty());
    }

    // ==================== Filename Guessing Tests ====================

    #[test]
    fn test_guess_plain_locale_name() {
        assert_eq!(guess_locale_from_filename(Path::new("de.json")), "de");
        assert_eq!(guess_locale_from_filename(Path::new("en_US.json")), "en-US");
    }

    #[test]
    fn test_guess_dotted_suffix() {
        assert_eq!(
            guess_locale_from_filename(Path::new("i18n/app.de-AT.json")),
            "de-AT"
        );
    }

    #[test]
    fn test_guess_underscore_suffix() {
        assert_eq!(
            guess_locale_from_filename(Path::new("strings_fr.json")),
            "fr"
        );
        assert_eq!(
            guess_locale_from_filename(Path::new("messages-zh-Hant-TW.json")),
            "zh-Hant-TW"
        );
    }

    #[test]
    fn test_guess_two_letter_word_prefix() {
        assert_eq!(guess_locale_from_filename(Path::new("ui_fr.json")), "fr");
        assert_eq!(guess_locale_from_filename(Path::new("my-de.json")), "de");
        assert_eq!(
            guess_locale_from_filename(Path::new("ui_pt_BR.json")),
            "pt-BR"
        );
    }

    #[test]
    fn test_guess_non_canonical_case_still_parses() {
        assert_eq!(guess_locale_from_filename(Path::new("EN.json")), "en");
        assert_eq!(guess_locale_from_filename(Path::new("Fr.json")), "fr");
    }

    #[test]
    fn test_guess_parent_directory() {
        assert_eq!(
            guess_locale_from_filename(Path::new("locales/pt-BR/app.json")),
            "pt-BR"
        );
    }

    #[test]
    fn test_guess_falls_back_to_und() {
        assert_eq!(guess_locale_from_filename(Path::new("resources/app.json")), "und");
        assert_eq!(guess_locale_from_filename(Path::new("")), "und");
    }
}
