//! Registry: the collection of value stores plus the fallback priority.
//!
//! A single reader/writer lock guards the tag -> store map and the priority
//! list, so every read sees either the state before or after a write, never
//! a partial one. Store contents have their own locks; the registry lock is
//! always released before a store lock is taken.

use super::error::CatalogError;
use super::import::{guess_locale_from_filename, Importer};
use super::matcher::{self, MatchKind};
use super::metrics::MatchMetrics;
use super::store::{Entry, Resources, Value};
use super::tag::LocaleTag;
use super::validator::{self, ValidationError};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

#[derive(Debug)]
struct RegistryState {
    stores: HashMap<LocaleTag, Arc<Resources>>,

    /// Fallback chain. Follows creation order until set explicitly.
    priority: Vec<LocaleTag>,

    explicit_priority: bool,
}

/// Thread-safe mapping from locale tag to value store.
///
/// The `und` store exists from construction on and is never pruned, so
/// matching always yields a store.
#[derive(Debug)]
pub struct Registry {
    state: RwLock<RegistryState>,
    undefined: Arc<Resources>,
    metrics: MatchMetrics,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<Registry> = OnceLock::new();

impl Registry {
    /// Create an empty registry holding only the `und` store.
    pub fn new() -> Self {
        let undefined = Arc::new(Resources::new(LocaleTag::undefined()));
        let mut stores = HashMap::new();
        stores.insert(LocaleTag::undefined(), Arc::clone(&undefined));

        Self {
            state: RwLock::new(RegistryState {
                stores,
                priority: Vec::new(),
                explicit_priority: false,
            }),
            undefined,
            metrics: MatchMetrics::new(),
        }
    }

    /// Get the process-wide registry instance.
    ///
    /// Initialized on first call; lives for the rest of the process.
    pub fn global() -> &'static Registry {
        REGISTRY.get_or_init(Registry::new)
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get or create the store for `locale`.
    ///
    /// Locale strings that normalize to the same tag share one store, even
    /// under concurrent calls. Malformed strings resolve to `und`.
    pub fn configure(&self, locale: &str) -> Arc<Resources> {
        self.configure_tag(LocaleTag::normalize(locale))
    }

    /// Get or create the store for an already normalized tag.
    pub fn configure_tag(&self, tag: LocaleTag) -> Arc<Resources> {
        if let Some(store) = self.read().stores.get(&tag) {
            return Arc::clone(store);
        }

        let mut state = self.write();
        if let Some(store) = state.stores.get(&tag) {
            return Arc::clone(store);
        }

        debug!("Creating store for {}", tag);
        let store = Arc::new(Resources::new(tag.clone()));
        state.stores.insert(tag.clone(), Arc::clone(&store));
        if !state.explicit_priority {
            state.priority.push(tag);
        }
        store
    }

    /// Replace the priority list and prune every store not on it.
    ///
    /// `und` is never pruned. Malformed entries in `locales` are skipped.
    /// Stores removed here become unreachable through matching; a later
    /// `configure` for the same locale creates a fresh empty store.
    pub fn set_translation_priority<S: AsRef<str>>(&self, locales: &[S]) {
        let mut priority: Vec<LocaleTag> = Vec::with_capacity(locales.len());
        for locale in locales {
            match LocaleTag::parse(locale.as_ref()) {
                Ok(tag) if !priority.contains(&tag) => priority.push(tag),
                Ok(_) => {}
                Err(e) => debug!("Skipping priority entry: {}", e),
            }
        }

        let mut state = self.write();
        let before = state.stores.len();
        state
            .stores
            .retain(|tag, _| tag.is_undefined() || priority.contains(tag));
        let pruned = before - state.stores.len();
        state.priority = priority;
        state.explicit_priority = true;

        info!(
            "Translation priority set to [{}], pruned {} store(s)",
            state
                .priority
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            pruned
        );
    }

    /// The current priority list.
    pub fn priority(&self) -> Vec<LocaleTag> {
        self.read().priority.clone()
    }

    /// Select the best store for the client's ordered locale preferences.
    ///
    /// Unparseable client locales are ignored. Never fails: the last resort
    /// is the `und` store.
    pub fn match_locales<S: AsRef<str>>(&self, locales: &[S]) -> Arc<Resources> {
        self.match_with_kind(locales).0
    }

    /// Like `match_locales`, also reporting which step matched.
    pub fn match_with_kind<S: AsRef<str>>(&self, locales: &[S]) -> (Arc<Resources>, MatchKind) {
        let requested: Vec<LocaleTag> = locales
            .iter()
            .filter_map(|locale| LocaleTag::parse(locale.as_ref()).ok())
            .collect();

        let found = {
            let state = self.read();
            matcher::negotiate(&state.stores, &state.priority, &requested)
        };
        let (store, kind) =
            found.unwrap_or_else(|| (Arc::clone(&self.undefined), MatchKind::Fallback));

        self.metrics.record(kind);
        (store, kind)
    }

    /// Alias of `match_locales`.
    pub fn from<S: AsRef<str>>(&self, locales: &[S]) -> Arc<Resources> {
        self.match_locales(locales)
    }

    /// The `und` store.
    pub fn undefined(&self) -> Arc<Resources> {
        Arc::clone(&self.undefined)
    }

    /// The store for `locale` if it exists, without creating one.
    pub fn get(&self, locale: &str) -> Option<Arc<Resources>> {
        let tag = LocaleTag::parse(locale).ok()?;
        self.read().stores.get(&tag).cloned()
    }

    /// All stores at one point in time, sorted by tag.
    pub fn snapshot(&self) -> Vec<Arc<Resources>> {
        let mut stores: Vec<Arc<Resources>> = self.read().stores.values().cloned().collect();
        stores.sort_by(|a, b| a.tag().cmp(b.tag()));
        stores
    }

    /// Tags of all current stores, sorted.
    pub fn locales(&self) -> Vec<LocaleTag> {
        let mut tags: Vec<LocaleTag> = self.read().stores.keys().cloned().collect();
        tags.sort();
        tags
    }

    /// Check completeness and directive consistency across all stores.
    ///
    /// # Errors
    /// Returns a `ValidationError` listing every defect found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validator::validate(&self.snapshot())
    }

    /// Populate the store for `locale` from `src`.
    ///
    /// Import your default fallback language first: until a priority list
    /// is set, import order is the fallback order.
    ///
    /// # Errors
    /// Returns `CatalogError::Import` naming `source_name` if the importer
    /// fails. Entries written before the failure remain.
    pub fn import(
        &self,
        importer: &dyn Importer,
        locale: &str,
        source_name: &str,
        src: &mut dyn Read,
    ) -> Result<Arc<Resources>, CatalogError> {
        let store = self.configure(locale);
        let count = importer
            .import(&store, src)
            .map_err(|source| CatalogError::Import {
                source_name: source_name.to_string(),
                source,
            })?;

        debug!("Imported {} entries into {} from {}", count, store.tag(), source_name);
        Ok(store)
    }

    /// Import a file, guessing its locale from the file name.
    ///
    /// # Errors
    /// Returns `CatalogError::Io` if the file cannot be opened and
    /// `CatalogError::Import` if it cannot be parsed.
    pub fn import_file(
        &self,
        importer: &dyn Importer,
        path: impl AsRef<Path>,
    ) -> Result<Arc<Resources>, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let locale = guess_locale_from_filename(path);
        let mut reader = BufReader::new(file);
        self.import(importer, &locale, &path.display().to_string(), &mut reader)
    }

    /// Add or replace a single value.
    ///
    /// The value's raw locale is normalized, the value is told its final
    /// tag through `update_tag`, and the entry is stored under that tag.
    pub fn import_value<V: Value + ?Sized>(&self, value: &mut V) -> Arc<Resources> {
        let store = self.configure(value.locale());
        value.update_tag(store.tag());
        store.put(Entry::new(value.id(), store.tag().clone(), value.text()));
        store
    }

    /// Matcher outcome counters.
    pub fn metrics(&self) -> &MatchMetrics {
        &self.metrics
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
