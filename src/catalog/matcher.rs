//! Locale negotiation.
//!
//! Picks one store for an ordered list of client locales:
//!
//! 1. exact tag match, client locales in order
//! 2. language-only match, client locales in order
//! 3. first existing store from the priority list
//! 4. the `und` store
//!
//! When several stores share a requested language (`en-US`, `en-GB` for a
//! request of `en-CA`), the one listed first in the priority list wins,
//! then the bare language store (`en`), then the smallest tag.

use super::store::Resources;
use super::tag::LocaleTag;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Which negotiation step produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Language,
    Priority,
    Fallback,
}

/// Select the best store for `requested`.
///
/// Returns `None` only when nothing matches and `stores` has no `und`
/// entry.
pub fn negotiate(
    stores: &HashMap<LocaleTag, Arc<Resources>>,
    priority: &[LocaleTag],
    requested: &[LocaleTag],
) -> Option<(Arc<Resources>, MatchKind)> {
    for tag in requested {
        if let Some(store) = stores.get(tag) {
            return Some((Arc::clone(store), MatchKind::Exact));
        }
    }

    for tag in requested {
        if let Some(store) = language_match(stores, priority, tag) {
            return Some((store, MatchKind::Language));
        }
    }

    for tag in priority {
        if let Some(store) = stores.get(tag) {
            return Some((Arc::clone(store), MatchKind::Priority));
        }
    }

    stores
        .get(&LocaleTag::undefined())
        .map(|store| (Arc::clone(store), MatchKind::Fallback))
}

fn language_match(
    stores: &HashMap<LocaleTag, Arc<Resources>>,
    priority: &[LocaleTag],
    requested: &LocaleTag,
) -> Option<Arc<Resources>> {
    if let Some(store) = priority
        .iter()
        .filter(|tag| tag.same_language(requested))
        .find_map(|tag| stores.get(tag))
    {
        return Some(Arc::clone(store));
    }

    if let Some(store) = stores.get(&requested.base()) {
        return Some(Arc::clone(store));
    }

    stores
        .iter()
        .filter(|(tag, _)| tag.same_language(requested))
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, store)| Arc::clone(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(s: &str) -> LocaleTag {
        LocaleTag::parse(s).unwrap()
    }

    fn tags(list: &[&str]) -> Vec<LocaleTag> {
        list.iter().map(|s| tag(s)).collect()
    }

    fn stores(list: &[&str]) -> HashMap<LocaleTag, Arc<Resources>> {
        list.iter()
            .map(|s| (tag(s), Arc::new(Resources::new(tag(s)))))
            .collect()
    }

    fn pick(
        stores: &HashMap<LocaleTag, Arc<Resources>>,
        priority: &[&str],
        requested: &[&str],
    ) -> (String, MatchKind) {
        let (store, kind) =
            negotiate(stores, &tags(priority), &tags(requested)).expect("Should match");
        (store.tag().to_string(), kind)
    }

    // ==================== Exact Match Tests ====================

    #[test]
    fn test_exact_match() {
        let stores = stores(&["en-US", "en-GB", "und"]);
        assert_eq!(
            pick(&stores, &[], &["en-US"]),
            ("en-US".to_string(), MatchKind::Exact)
        );
    }

    #[test]
    fn test_exact_match_respects_client_order() {
        let stores = stores(&["de", "fr", "und"]);
        assert_eq!(pick(&stores, &[], &["fr", "de"]).0, "fr");
    }

    #[test]
    fn test_exact_beats_earlier_language_match() {
        // "en-CA" has only a language match; "fr" has an exact one
        let stores = stores(&["en-US", "fr", "und"]);
        assert_eq!(
            pick(&stores, &[], &["en-CA", "fr"]),
            ("fr".to_string(), MatchKind::Exact)
        );
    }

    // ==================== Language Match Tests ====================

    #[test]
    fn test_language_match_uses_priority_for_ties() {
        let stores = stores(&["en-US", "en-GB", "und"]);
        assert_eq!(
            pick(&stores, &["en-GB", "en-US", "und"], &["en-CA"]),
            ("en-GB".to_string(), MatchKind::Language)
        );
        assert_eq!(
            pick(&stores, &["en-US", "en-GB", "und"], &["en-CA"]).0,
            "en-US"
        );
    }

    #[test]
    fn test_language_match_prefers_bare_language() {
        let stores = stores(&["pt-PT", "pt", "pt-BR", "und"]);
        assert_eq!(pick(&stores, &[], &["pt-AO"]).0, "pt");
    }

    #[test]
    fn test_language_match_smallest_tag_without_hints() {
        let stores = stores(&["en-US", "en-GB", "und"]);
        assert_eq!(pick(&stores, &[], &["en-CA"]).0, "en-GB");
    }

    #[test]
    fn test_language_match_client_order_before_priority() {
        let stores = stores(&["de-AT", "fr-CA", "und"]);
        assert_eq!(
            pick(&stores, &["de-AT"], &["fr-FR", "de-DE"]),
            ("fr-CA".to_string(), MatchKind::Language)
        );
    }

    // ==================== Priority / Fallback Tests ====================

    #[test]
    fn test_priority_walk() {
        let stores = stores(&["de", "en", "und"]);
        assert_eq!(
            pick(&stores, &["ja", "en", "und"], &["fr"]),
            ("en".to_string(), MatchKind::Priority)
        );
    }

    #[test]
    fn test_priority_list_reaching_und() {
        let stores = stores(&["en-US", "und"]);
        assert_eq!(
            pick(&stores, &["en", "und"], &["fr"]),
            ("und".to_string(), MatchKind::Priority)
        );
    }

    #[test]
    fn test_fallback_to_und() {
        let stores = stores(&["de", "und"]);
        assert_eq!(
            pick(&stores, &[], &["fr"]),
            ("und".to_string(), MatchKind::Fallback)
        );
    }

    #[test]
    fn test_empty_request_skips_to_priority() {
        let stores = stores(&["de", "en", "und"]);
        assert_eq!(
            pick(&stores, &["en"], &[]),
            ("en".to_string(), MatchKind::Priority)
        );
    }

    #[test]
    fn test_no_match_without_und() {
        let stores = stores(&["de"]);
        assert!(negotiate(&stores, &[], &tags(&["fr"])).is_none());
    }
}
