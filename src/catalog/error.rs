//! Error types for the catalog.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A locale string could not be parsed into a tag.
    #[error("invalid locale '{input}': {reason}")]
    InvalidLocale { input: String, reason: String },

    /// The requested entry is not present in the store. Expected during
    /// fallback; callers decide whether it matters.
    #[error("string not found: '{id}' in locale '{locale}'")]
    TextNotFound { locale: String, id: String },

    /// An importer could not parse its source.
    #[error("failed to parse '{source_name}'")]
    Import {
        source_name: String,
        #[source]
        source: ImportError,
    },

    /// A file could not be opened or read.
    #[error("cannot open file '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Whether this is the not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::TextNotFound { .. })
    }
}

/// Errors raised by `Importer` implementations.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("read failed")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON")]
    Json(#[from] serde_json::Error),

    #[error("malformed document: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_text_not_found_message() {
        let err = CatalogError::TextNotFound {
            locale: "fr".to_string(),
            id: "greeting".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "string not found: 'greeting' in locale 'fr'"
        );
    }

    #[test]
    fn test_import_error_keeps_source_chain() {
        let err = CatalogError::Import {
            source_name: "de.json".to_string(),
            source: ImportError::Malformed("expected an object".to_string()),
        };
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("de.json"));
        let source = err.source().expect("Should have a source");
        assert!(source.to_string().contains("expected an object"));
    }
}
