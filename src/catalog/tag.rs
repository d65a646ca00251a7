//! Locale tags: parsed, normalized locale identifiers.
//!
//! A `LocaleTag` is a small immutable value with explicit subtag fields. Two
//! comparisons matter to the catalog: full equality (every present subtag
//! matches) and language-only equality (primary subtags match).

use super::error::CatalogError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Primary subtag of the undefined locale.
pub const UNDEFINED: &str = "und";

/// A normalized BCP 47 style locale identifier.
///
/// Normalization rules:
/// - language is lowercase (`EN` -> `en`)
/// - script is titlecase (`hant` -> `Hant`)
/// - region is uppercase (`us` -> `US`), or three digits (`419`)
/// - variants are lowercase, kept in input order
///
/// `_` is accepted as a separator and POSIX suffixes such as `.UTF-8` or
/// `@euro` are dropped, so `en_US.UTF-8` parses as `en-US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocaleTag {
    language: String,
    script: Option<String>,
    region: Option<String>,
    variants: Vec<String>,
}

impl LocaleTag {
    /// The undefined locale, `und`. Denotes the default fallback store.
    pub fn undefined() -> Self {
        Self {
            language: UNDEFINED.to_string(),
            script: None,
            region: None,
            variants: Vec::new(),
        }
    }

    /// Parse a locale string strictly.
    ///
    /// # Errors
    /// Returns `CatalogError::InvalidLocale` if the string is empty or any
    /// subtag is malformed.
    pub fn parse(input: &str) -> Result<Self, CatalogError> {
        let invalid = |reason: &str| CatalogError::InvalidLocale {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        // Strip POSIX codeset and modifier (en_US.UTF-8@euro)
        let core = input.split(['.', '@']).next().unwrap_or_default().trim();
        if core.is_empty() {
            return Err(invalid("empty locale"));
        }

        let mut parts = core.split(['-', '_']);
        let language = parts.next().unwrap_or_default();
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(invalid("language subtag must be 2-3 letters"));
        }

        let mut tag = Self {
            language: language.to_ascii_lowercase(),
            script: None,
            region: None,
            variants: Vec::new(),
        };

        for part in parts {
            if part.is_empty() {
                return Err(invalid("empty subtag"));
            }
            if !part.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(invalid("subtags must be alphanumeric"));
            }

            let alphabetic = part.chars().all(|c| c.is_ascii_alphabetic());
            let numeric = part.chars().all(|c| c.is_ascii_digit());

            match part.len() {
                4 if alphabetic && tag.script.is_none() && tag.region.is_none() => {
                    let lower = part.to_ascii_lowercase();
                    let mut script = lower[..1].to_ascii_uppercase();
                    script.push_str(&lower[1..]);
                    tag.script = Some(script);
                }
                2 if alphabetic && tag.region.is_none() && tag.variants.is_empty() => {
                    tag.region = Some(part.to_ascii_uppercase());
                }
                3 if numeric && tag.region.is_none() && tag.variants.is_empty() => {
                    tag.region = Some(part.to_string());
                }
                5..=8 => tag.variants.push(part.to_ascii_lowercase()),
                4 if part.starts_with(|c: char| c.is_ascii_digit()) => {
                    tag.variants.push(part.to_ascii_lowercase())
                }
                _ => return Err(invalid("unrecognized subtag")),
            }
        }

        Ok(tag)
    }

    /// Parse a locale string, falling back to `und` when it is malformed.
    ///
    /// This is the normalization used by the registry: any string a caller
    /// hands in resolves to some store.
    pub fn normalize(input: &str) -> Self {
        match Self::parse(input) {
            Ok(tag) => tag,
            Err(e) => {
                warn!("{}, using '{}'", e, UNDEFINED);
                Self::undefined()
            }
        }
    }

    /// Primary language subtag (e.g. "en").
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Script subtag, if present (e.g. "Hant").
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    /// Region subtag, if present (e.g. "US").
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Whether this is the undefined locale.
    pub fn is_undefined(&self) -> bool {
        self.language == UNDEFINED
            && self.script.is_none()
            && self.region.is_none()
            && self.variants.is_empty()
    }

    /// Whether both tags share the primary language, ignoring script,
    /// region and variants.
    pub fn same_language(&self, other: &LocaleTag) -> bool {
        self.language == other.language
    }

    /// The language-only form of this tag (`en-US` -> `en`).
    pub fn base(&self) -> Self {
        Self {
            language: self.language.clone(),
            script: None,
            region: None,
            variants: Vec::new(),
        }
    }
}

impl Default for LocaleTag {
    fn default() -> Self {
        Self::undefined()
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if let Some(script) = &self.script {
            write!(f, "-{}", script)?;
        }
        if let Some(region) = &self.region {
            write!(f, "-{}", region)?;
        }
        for variant in &self.variants {
            write!(f, "-{}", variant)?;
        }
        Ok(())
    }
}

impl FromStr for LocaleTag {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for LocaleTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LocaleTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
