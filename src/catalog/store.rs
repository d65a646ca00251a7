//! Value stores: the per-locale containers of translated entries.

use super::error::CatalogError;
use super::tag::LocaleTag;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// A translated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    id: String,
    tag: LocaleTag,
    text: String,
}

impl Entry {
    pub fn new(id: impl Into<String>, tag: LocaleTag, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag,
            text: text.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tag(&self) -> &LocaleTag {
        &self.tag
    }

    /// The translated text, including any substitution directives.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Anything that can be registered directly in a store, bypassing an
/// `Importer`.
///
/// `locale` is the raw locale string the value was built with. After the
/// registry normalizes it, `update_tag` is called with the tag of the store
/// the value lands in.
pub trait Value {
    fn id(&self) -> &str;
    fn locale(&self) -> &str;
    fn text(&self) -> &str;
    fn update_tag(&mut self, tag: &LocaleTag);
}

/// A plain value carrying its raw locale string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
    pub id: String,
    pub locale: String,
    pub text: String,
    pub tag: Option<LocaleTag>,
}

impl RawValue {
    pub fn new(id: impl Into<String>, locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            locale: locale.into(),
            text: text.into(),
            tag: None,
        }
    }
}

impl Value for RawValue {
    fn id(&self) -> &str {
        &self.id
    }

    fn locale(&self) -> &str {
        &self.locale
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn update_tag(&mut self, tag: &LocaleTag) {
        self.tag = Some(tag.clone());
    }
}

/// Translated entries for exactly one locale.
///
/// Shared as `Arc<Resources>`; all access goes through an internal
/// reader/writer lock.
#[derive(Debug)]
pub struct Resources {
    tag: LocaleTag,
    values: RwLock<HashMap<String, Entry>>,
}

impl Resources {
    pub(crate) fn new(tag: LocaleTag) -> Self {
        Self {
            tag,
            values: RwLock::new(HashMap::new()),
        }
    }

    /// The normalized tag this store belongs to.
    pub fn tag(&self) -> &LocaleTag {
        &self.tag
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.values.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up an entry by ID.
    pub fn get(&self, id: &str) -> Option<Entry> {
        self.read().get(id).cloned()
    }

    /// Look up an entry by ID, treating absence as an error.
    ///
    /// # Errors
    /// Returns `CatalogError::TextNotFound` if the ID is not present.
    pub fn require(&self, id: &str) -> Result<Entry, CatalogError> {
        self.get(id).ok_or_else(|| CatalogError::TextNotFound {
            locale: self.tag.to_string(),
            id: id.to_string(),
        })
    }

    /// The text for `id`, or the ID itself when it is missing.
    pub fn text_or_id(&self, id: &str) -> String {
        self.get(id)
            .map(|entry| entry.text)
            .unwrap_or_else(|| id.to_string())
    }

    /// Insert or replace an entry. The last writer for an ID wins.
    ///
    /// Directive consistency is not checked here; see `validate`.
    pub fn put(&self, entry: Entry) {
        let mut values = self.write();
        values.insert(entry.id.clone(), entry);
    }

    /// Insert or replace a text under this store's own tag.
    pub fn put_text(&self, id: impl Into<String>, text: impl Into<String>) {
        self.put(Entry::new(id, self.tag.clone(), text));
    }

    /// Correct the tag of an already stored entry.
    ///
    /// Returns `false` if no entry with that ID exists.
    pub fn rebind(&self, id: &str, tag: LocaleTag) -> bool {
        let mut values = self.write();
        match values.get_mut(id) {
            Some(entry) => {
                debug!("Rebinding '{}' from {} to {}", id, entry.tag, tag);
                entry.tag = tag;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// A copy of all entries, sorted by ID.
    pub fn entries(&self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self.read().values().cloned().collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries
    }

    /// A copy of the ID -> text mapping.
    pub(crate) fn texts(&self) -> HashMap<String, String> {
        self.read()
            .iter()
            .map(|(id, entry)| (id.clone(), entry.text.clone()))
            .collect()
    }
}
