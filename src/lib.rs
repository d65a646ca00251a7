//! Locale-keyed catalog of translated strings.
//!
//! `catalog` holds the registry, locale negotiation and validation;
//! `global` exposes a process-wide instance; `config` drives the
//! `catalog-check` binary.

pub mod catalog;
pub mod config;
pub mod global;

pub use catalog::{LocaleTag, Registry, Resources};
