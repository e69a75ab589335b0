//! Tests for the Record contract
//!
//! These tests verify:
//! - Text round-trip keeps identity and payload
//! - Serialized form is never blank
//! - Document field helpers

#[path = "../common/mod.rs"]
mod common;

use common::Flavor;
use stashdb::record::json;
use stashdb::{Document, Record, StoreError};

#[test]
fn test_flavor_round_trip() {
    let mut original = Flavor::new("orange", "vanilla | with \"quotes\"\nand newline");
    original.set_identity(9);

    let text = original.to_text().unwrap();
    assert!(!text.trim().is_empty());

    let decoded = Flavor::from_text(&text).unwrap();
    assert_eq!(decoded, original);
    assert_eq!(decoded.identity(), 9);
}

#[test]
fn test_text_is_single_line() {
    let doc = Document::new().with("note", "line one\nline two");
    let text = doc.to_text().unwrap();
    assert_eq!(text.lines().count(), 1);
}

#[test]
fn test_from_blank_text_fails() {
    assert!(matches!(
        Flavor::from_text("   "),
        Err(StoreError::Serialization(_))
    ));
    assert!(matches!(
        json::from_text::<Document>(""),
        Err(StoreError::Serialization(_))
    ));
}

#[test]
fn test_from_text_ignores_surrounding_whitespace() {
    let doc = Document::from_text("\n {\"identity\":3,\"fields\":{\"a\":\"b\"}} \n").unwrap();
    assert_eq!(doc.identity, 3);
    assert_eq!(doc.get("a"), Some("b"));
}

#[test]
fn test_document_round_trip() {
    let mut doc = Document::new()
        .with("color", "blue")
        .with("flavor", "candy corn");
    doc.set_identity(2);

    let decoded = Document::from_text(&doc.to_text().unwrap()).unwrap();
    assert_eq!(decoded, doc);
}

#[test]
fn test_document_field_helpers() {
    let mut doc = Document::new().with("flavor", "taffy");

    assert_eq!(doc.set("flavor", "lemon"), Some("taffy".to_string()));
    assert_eq!(doc.get("flavor"), Some("lemon"));
    assert_eq!(doc.remove("flavor"), Some("lemon".to_string()));
    assert_eq!(doc.get("flavor"), None);
    assert_eq!(doc.identity(), 0);
}

#[test]
fn test_document_from_pairs() {
    let doc = Document::from_pairs(["color=orange", "flavor=oreo=double", "empty"]);

    assert_eq!(doc.get("color"), Some("orange"));
    assert_eq!(doc.get("flavor"), Some("oreo=double"));
    assert_eq!(doc.get("empty"), Some(""));
}
