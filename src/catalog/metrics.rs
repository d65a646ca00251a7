//! Match metrics.
//!
//! Counts how each locale negotiation was resolved, so an operator can see
//! how often clients fall through to the priority chain or to `und`.

use super::matcher::MatchKind;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-registry counters for matcher outcomes.
#[derive(Debug, Default)]
pub struct MatchMetrics {
    /// Resolved by an exact tag match
    exact: AtomicUsize,

    /// Resolved by a language-only match
    language: AtomicUsize,

    /// Resolved through the priority list
    priority: AtomicUsize,

    /// Fell through to the `und` store
    fallback: AtomicUsize,
}

impl MatchMetrics {
    /// Create a set of counters, all zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one negotiation outcome.
    pub fn record(&self, kind: MatchKind) {
        let counter = match kind {
            MatchKind::Exact => &self.exact,
            MatchKind::Language => &self.language,
            MatchKind::Priority => &self.priority,
            MatchKind::Fallback => &self.fallback,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current count of exact tag matches.
    pub fn exact(&self) -> usize {
        self.exact.load(Ordering::Relaxed)
    }

    /// Get the current count of language-only matches.
    pub fn language(&self) -> usize {
        self.language.load(Ordering::Relaxed)
    }

    /// Get the current count of matches resolved through the priority list.
    pub fn priority(&self) -> usize {
        self.priority.load(Ordering::Relaxed)
    }

    /// Get the current count of fallbacks to the `und` store.
    pub fn fallback(&self) -> usize {
        self.fallback.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MatchMetricsReport {
        let exact = self.exact();
        let language = self.language();
        let priority = self.priority();
        let fallback = self.fallback();
        let total = exact + language + priority + fallback;

        // Share of requests that did not get a locale they asked for
        let fallback_rate = if total > 0 {
            ((priority + fallback) as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MatchMetricsReport {
            exact,
            language,
            priority,
            fallback,
            total,
            fallback_rate,
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.exact.store(0, Ordering::Relaxed);
        self.language.store(0, Ordering::Relaxed);
        self.priority.store(0, Ordering::Relaxed);
        self.fallback.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of matcher outcomes.
#[derive(Debug, Clone, Serialize)]
pub struct MatchMetricsReport {
    pub exact: usize,
    pub language: usize,
    pub priority: usize,
    pub fallback: usize,
    pub total: usize,

    /// Percentage (0-100) of negotiations resolved by the priority list or `und`
    pub fallback_rate: f64,
}
