//! Property-based tests for the XML round-trip
//!
//! These tests use proptest to verify:
//! 1. Roundtrip property: serialize(tree) -> parse == original tree
//! 2. Serialization idempotence: serialize -> parse -> serialize is identity
//! 3. Arbitrary input never panics the parser

use proptest::prelude::*;

use ijdoc::{Document, Element, Format};

/// Strategy for element and attribute names
fn arb_name() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_.-]{0,8}"
}

/// Strategy for attribute values, covering the escaped characters
fn arb_value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 /$&<>'\"._:-]{0,12}"
}

/// Strategy for text content; never whitespace-only (the parser drops
/// whitespace-only runs) and never adjacent to other text
fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9&<][a-zA-Z0-9 &<>.!-]{0,11}"
}

fn build_element(
    name: String,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
) -> Element {
    let mut element = Element::new(name);
    for (key, value) in attrs {
        element.set_attribute(key, value);
    }
    if let Some(text) = text {
        element.add_text(text);
    }
    for child in children {
        element.add_child(child);
    }
    element
}

/// Strategy for arbitrary element trees
fn arb_element() -> impl Strategy<Value = Element> {
    let leaf = (
        arb_name(),
        prop::collection::vec((arb_name(), arb_value()), 0..4),
        prop::option::of(arb_text()),
    )
        .prop_map(|(name, attrs, text)| build_element(name, attrs, text, Vec::new()));

    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            arb_name(),
            prop::collection::vec((arb_name(), arb_value()), 0..4),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(name, attrs, children)| build_element(name, attrs, None, children))
    })
}

proptest! {
    #[test]
    fn roundtrip_preserves_tree(root in arb_element()) {
        let document = Document::new().with_root(root);
        for format in [Format::Concise, Format::Pretty] {
            let text = document.to_xml_string(format);
            let reparsed = Document::parse(&text).unwrap();
            prop_assert_eq!(&reparsed, &document);
        }
    }

    #[test]
    fn serialization_is_idempotent(root in arb_element()) {
        let document = Document::new().with_root(root);
        for format in [Format::Concise, Format::Pretty] {
            let text = document.to_xml_string(format);
            let reparsed = Document::parse(&text).unwrap();
            prop_assert_eq!(reparsed.to_xml_string(format), text);
        }
    }

    #[test]
    fn formats_agree_on_structure(root in arb_element()) {
        let document = Document::new().with_root(root);
        let concise = Document::parse(&document.to_xml_string(Format::Concise)).unwrap();
        let pretty = Document::parse(&document.to_xml_string(Format::Pretty)).unwrap();
        prop_assert_eq!(concise, pretty);
    }

    #[test]
    fn parse_never_panics(input in ".{0,256}") {
        let _ = Document::parse(&input);
    }
}
