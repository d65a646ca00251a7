//! Cross-locale consistency validation.
//!
//! Two checks run over a snapshot of all stores:
//! - completeness: every ID present in some store is present in all of them
//! - directive consistency: every translation of an ID uses the same
//!   printf-style directives (same count, same verb per argument)
//!
//! All defects are collected; nothing is mutated.

use super::store::Resources;
use super::tag::LocaleTag;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::info;

/// One substitution directive: which argument it consumes and its verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Directive {
    /// 1-based argument index
    pub argument: usize,
    pub verb: char,
}

/// Directives of a text, ordered by argument index, then verb.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DirectiveSignature(Vec<Directive>);

impl DirectiveSignature {
    pub fn directives(&self) -> &[Directive] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DirectiveSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        let mut sequential = 1;
        for (i, directive) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if directive.argument == sequential {
                write!(f, "%{}", directive.verb)?;
                sequential = sequential.saturating_add(1);
            } else {
                write!(f, "%[{}]{}", directive.argument, directive.verb)?;
            }
        }
        f.write_str("]")
    }
}

impl Serialize for DirectiveSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Verb recorded for an argument consumed by a `*` width or precision.
pub const STAR_VERB: char = '*';

static DIRECTIVE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Extract the directive signature of a text.
///
/// Understands sequential directives (`%s`, `%5.2f`), Go-style explicit
/// indexes (`%[2]d`) and POSIX positions (`%2$d`). `%%` is a literal percent
/// sign. A `*` width or precision consumes an argument of its own, recorded
/// with the verb `*`. After an explicit index, implicit directives continue
/// from the following argument. An argument used with several verbs keeps
/// all of them.
pub fn extract_directives(text: &str) -> DirectiveSignature {
    let regex = DIRECTIVE_REGEX.get_or_init(|| {
        Regex::new(
            r"%(?:\[(\d+)\]|(\d+)\$)?[-+# 0]*(\d+|\*)?(?:\.(\d+|\*)?)?(?:\[(\d+)\])?([a-zA-Z%])",
        )
        .expect("directive pattern is valid")
    });

    // Indexes too large for usize still name an argument no one can pass
    let index = |m: regex::Match<'_>| m.as_str().parse::<usize>().unwrap_or(usize::MAX);

    let mut by_argument: BTreeMap<usize, BTreeSet<char>> = BTreeMap::new();
    let mut next: usize = 1;

    for cap in regex.captures_iter(text) {
        let verb = match cap.get(6).and_then(|m| m.as_str().chars().next()) {
            Some('%') | None => continue,
            Some(verb) => verb,
        };

        if let Some(m) = cap.get(1).or_else(|| cap.get(2)) {
            next = index(m);
        }
        for star in [cap.get(3), cap.get(4)].into_iter().flatten() {
            if star.as_str() == "*" {
                by_argument.entry(next).or_default().insert(STAR_VERB);
                next = next.saturating_add(1);
            }
        }
        if let Some(m) = cap.get(5) {
            next = index(m);
        }

        by_argument.entry(next).or_default().insert(verb);
        next = next.saturating_add(1);
    }

    DirectiveSignature(
        by_argument
            .into_iter()
            .flat_map(|(argument, verbs)| {
                verbs
                    .into_iter()
                    .map(move |verb| Directive { argument, verb })
            })
            .collect(),
    )
}

/// A single validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Defect {
    /// `id` exists elsewhere but not in `locale`.
    MissingEntry { locale: LocaleTag, id: String },

    /// `locale` uses different directives for `id` than `reference`.
    DirectiveMismatch {
        id: String,
        reference: LocaleTag,
        locale: LocaleTag,
        expected: DirectiveSignature,
        found: DirectiveSignature,
    },
}

impl Defect {
    /// The string ID this defect concerns.
    pub fn id(&self) -> &str {
        match self {
            Defect::MissingEntry { id, .. } | Defect::DirectiveMismatch { id, .. } => id,
        }
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defect::MissingEntry { locale, id } => {
                write!(f, "missing translation: '{}' in {}", id, locale)
            }
            Defect::DirectiveMismatch {
                id,
                reference,
                locale,
                expected,
                found,
            } => write!(
                f,
                "directive mismatch for '{}': {} has {}, {} has {}",
                id, reference, expected, locale, found
            ),
        }
    }
}

/// Aggregated validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub defects: Vec<Defect>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} translation defect(s)", self.defects.len())?;
        for defect in &self.defects {
            write!(f, "\n  - {}", defect)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Validation report for a catalog snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Locales that took part in the check
    pub locales: Vec<LocaleTag>,

    /// Number of distinct string IDs checked
    pub ids_checked: usize,

    pub defects: Vec<Defect>,
}

impl ValidationReport {
    /// Check if the report has no defects
    pub fn is_clean(&self) -> bool {
        self.defects.is_empty()
    }

    pub fn missing_entries(&self) -> impl Iterator<Item = &Defect> {
        self.defects
            .iter()
            .filter(|d| matches!(d, Defect::MissingEntry { .. }))
    }

    pub fn directive_mismatches(&self) -> impl Iterator<Item = &Defect> {
        self.defects
            .iter()
            .filter(|d| matches!(d, Defect::DirectiveMismatch { .. }))
    }

    /// Convert into a `Result`, failing if any defect was found.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.defects.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                defects: self.defects,
            })
        }
    }
}

/// Validate a snapshot of stores.
///
/// # Errors
/// Returns a `ValidationError` listing every defect.
pub fn validate(stores: &[Arc<Resources>]) -> Result<(), ValidationError> {
    check(stores).into_result()
}

/// Run both checks and report every defect.
///
/// An empty `und` store is left out: it only exists as the implicit
/// fallback. When `und` does carry entries it is the reference text for
/// directive comparison; otherwise the first locale (by tag) that has the
/// ID is.
pub fn check(stores: &[Arc<Resources>]) -> ValidationReport {
    let mut snapshot: Vec<(LocaleTag, HashMap<String, String>)> = stores
        .iter()
        .filter(|store| !(store.tag().is_undefined() && store.is_empty()))
        .map(|store| (store.tag().clone(), store.texts()))
        .collect();
    snapshot.sort_by(|(a, _), (b, _)| (!a.is_undefined(), a).cmp(&(!b.is_undefined(), b)));

    let ids: BTreeSet<&String> = snapshot.iter().flat_map(|(_, texts)| texts.keys()).collect();
    let mut defects = Vec::new();

    for id in &ids {
        for (tag, texts) in &snapshot {
            if !texts.contains_key(*id) {
                defects.push(Defect::MissingEntry {
                    locale: tag.clone(),
                    id: id.to_string(),
                });
            }
        }

        let mut present = snapshot.iter().filter_map(|(tag, texts)| {
            texts.get(*id).map(|text| (tag, extract_directives(text)))
        });
        let Some((reference, expected)) = present.next() else {
            continue;
        };

        for (tag, found) in present {
            if found != expected {
                defects.push(Defect::DirectiveMismatch {
                    id: id.to_string(),
                    reference: reference.clone(),
                    locale: tag.clone(),
                    expected: expected.clone(),
                    found,
                });
            }
        }
    }

    info!(
        "Validated {} locale(s) and {} string(s): {} defect(s)",
        snapshot.len(),
        ids.len(),
        defects.len()
    );

    ValidationReport {
        locales: snapshot.iter().map(|(tag, _)| tag.clone()).collect(),
        ids_checked: ids.len(),
        defects,
    }
}
