//! Tests for the process-wide catalog functions.
//!
//! All tests here share `Registry::global()`, so they run serially and each
//! one starts with an empty priority list, which prunes whatever earlier
//! tests left behind. None of them write to `und`.

use serial_test::serial;
use std::io::Cursor;
use tempfile::TempDir;
use text_catalog::catalog::{JsonImporter, RawValue, Registry};
use text_catalog::global;

/// Drop every global store except `und`.
fn reset_global() {
    global::translation_priority::<&str>(&[]);
    assert_eq!(Registry::global().locales().len(), 1);
}

#[test]
#[serial]
fn test_global_import_and_from() {
    reset_global();
    global::import(&JsonImporter, "nl", &mut Cursor::new(r#"{"hi": "Hoi"}"#)).unwrap();

    let store = global::from(&["nl-BE", "en"]);
    assert_eq!(store.tag().to_string(), "nl");
    assert_eq!(store.get("hi").unwrap().text(), "Hoi");
}

#[test]
#[serial]
fn test_global_import_file() {
    reset_global();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.da.json");
    std::fs::write(&path, r#"{"hi": "Hej"}"#).unwrap();

    let store = global::import_file(&JsonImporter, &path).unwrap();
    assert_eq!(store.tag().to_string(), "da");
}

#[test]
#[serial]
fn test_global_translation_priority_prunes() {
    reset_global();
    global::import_value(&mut RawValue::new("hi", "fi", "Moi"));
    global::import_value(&mut RawValue::new("hi", "sv", "Hej"));
    global::translation_priority(&["sv", "und"]);

    assert!(Registry::global().get("fi").is_none());
    assert_eq!(global::from(&["fi"]).tag().to_string(), "sv");
}

#[test]
#[serial]
fn test_global_validate() {
    reset_global();
    global::import_value(&mut RawValue::new("n", "cs", "%d souborů"));
    global::import_value(&mut RawValue::new("n", "sk", "%d súborov"));
    assert!(global::validate().is_ok());

    global::import_value(&mut RawValue::new("n", "sk", "%s súborov"));
    let err = global::validate().unwrap_err();
    assert_eq!(err.defects.len(), 1);
    assert_eq!(err.defects[0].id(), "n");
}
