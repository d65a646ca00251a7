//! Process-wide catalog.
//!
//! Thin functions over `Registry::global()` for applications that keep one
//! catalog for their whole lifetime. Code that needs isolation (tests,
//! multi-tenant services) should own a `Registry` instead.

use crate::catalog::{CatalogError, Importer, Registry, Resources, ValidationError, Value};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Import `src` into the global store for `locale`.
///
/// The order of imports is the fallback order until
/// `translation_priority` is called, so import the default language first.
pub fn import(
    importer: &dyn Importer,
    locale: &str,
    src: &mut dyn Read,
) -> Result<Arc<Resources>, CatalogError> {
    Registry::global().import(importer, locale, locale, src)
}

/// Import a file into the global catalog, guessing its locale from its name.
pub fn import_file(
    importer: &dyn Importer,
    path: impl AsRef<Path>,
) -> Result<Arc<Resources>, CatalogError> {
    Registry::global().import_file(importer, path)
}

/// Add or replace one value in the global catalog.
pub fn import_value<V: Value + ?Sized>(value: &mut V) -> Arc<Resources> {
    Registry::global().import_value(value)
}

/// The best matching global store for the given locales.
pub fn from<S: AsRef<str>>(locales: &[S]) -> Arc<Resources> {
    Registry::global().match_locales(locales)
}

/// Validate the global catalog.
///
/// `Ok` means every ID is translated in every locale and the printf
/// directives agree across translations.
pub fn validate() -> Result<(), ValidationError> {
    Registry::global().validate()
}

/// Set the global resolution order and drop locales not listed. `und` is
/// the undefined default locale and is always kept.
pub fn translation_priority<S: AsRef<str>>(locales: &[S]) {
    Registry::global().set_translation_priority(locales)
}
