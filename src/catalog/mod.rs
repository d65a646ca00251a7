//! Translation catalog: locale-keyed stores of translated strings.
//!
//! # Architecture
//!
//! - `tag`: `LocaleTag`, the normalized locale identifier
//! - `store`: `Resources`, the per-locale entry store, and the `Value` capability
//! - `registry`: `Registry`, tag -> store mapping with fallback priority
//! - `matcher`: locale negotiation over a registry snapshot
//! - `validator`: completeness and directive consistency checks
//! - `import`: the `Importer` capability, JSON importer, filename guessing
//! - `metrics`: matcher outcome counters
//!
//! # Example
//!
//! ```rust
//! use text_catalog::catalog::Registry;
//!
//! let registry = Registry::new();
//! registry.configure("en-US").put_text("greeting", "Hello %s");
//! registry.configure("en-GB").put_text("greeting", "Hello %s");
//! registry.set_translation_priority(&["en-US", "en-GB", "und"]);
//!
//! let store = registry.match_locales(&["en-CA"]);
//! assert_eq!(store.tag().to_string(), "en-US");
//! assert!(registry.validate().is_ok());
//! ```

mod error;
mod import;
mod matcher;
mod metrics;
mod registry;
mod store;
mod tag;
mod validator;

pub use error::{CatalogError, ImportError};
pub use import::{guess_locale_from_filename, Importer, JsonImporter};
pub use matcher::{negotiate, MatchKind};
pub use metrics::{MatchMetrics, MatchMetricsReport};
pub use registry::Registry;
pub use store::{Entry, RawValue, Resources, Value};
pub use tag::{LocaleTag, UNDEFINED};
pub use validator::{
    check, extract_directives, validate, Defect, Directive, DirectiveSignature, ValidationError,
    ValidationReport,
};
