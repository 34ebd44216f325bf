//! XML data model and the element-tree access operations

use indexmap::IndexMap;
use std::fmt;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::xml::parser::Parser;
use crate::xml::writer::{self, Format};

/// XML declaration metadata (`<?xml version=".." encoding=".."?>`)
///
/// Purely cosmetic: affects serialization only.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Declaration {
    version: Option<String>,
    encoding: Option<String>,
}

impl Declaration {
    /// Creates an empty declaration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }
}

/// XML document: at most one root element plus optional declaration metadata
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    declaration: Option<Declaration>,
    root: Option<Element>,
}

impl Document {
    /// Creates an empty document with no declaration and no root
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an XML document from text
    pub fn parse(text: &str) -> Result<Self> {
        let mut parser = Parser::new(text.as_bytes());
        parser.parse()
    }

    pub fn declaration(&self) -> Option<&Declaration> {
        self.declaration.as_ref()
    }

    /// Replaces the declaration wholesale
    pub fn set_declaration(&mut self, declaration: Declaration) -> &mut Self {
        self.declaration = Some(declaration);
        self
    }

    /// Construction variant of [`set_declaration`](Self::set_declaration)
    pub fn with_declaration(mut self, declaration: Declaration) -> Self {
        self.declaration = Some(declaration);
        self
    }

    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.root.as_mut()
    }

    /// Replaces the root element wholesale
    pub fn set_root(&mut self, root: Element) -> &mut Self {
        self.root = Some(root);
        self
    }

    /// Construction variant of [`set_root`](Self::set_root)
    pub fn with_root(mut self, root: Element) -> Self {
        self.root = Some(root);
        self
    }

    /// Serialize this document at the given format
    pub fn to_xml_string(&self, format: Format) -> String {
        writer::write_document(self, format)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml_string(Format::Concise))
    }
}

/// A node in an element's child sequence
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Content {
    Element(Element),
    Text(String),
}

impl Content {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Element(_) => None,
            Self::Text(text) => Some(text),
        }
    }
}

/// A named node with string attributes and an ordered child sequence
///
/// Attributes preserve insertion order and keys are unique: setting an
/// existing key overwrites its value in place, new keys append at the end.
/// Children are owned exclusively by their parent. Equality is structural:
/// same name, same attribute mapping (order-independent), same child
/// sequence (order-dependent, deep).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    name: String,
    attributes: IndexMap<String, String>,
    children: Vec<Content>,
}

impl Element {
    /// Creates a new element with no attributes and no children
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "element name cannot be empty");
        Self {
            name,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets an attribute value
    ///
    /// Overwriting an existing key keeps the key's position in attribute
    /// order; a new key appends at the end.
    ///
    /// # Panics
    ///
    /// Panics if `key` is empty.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        assert!(!key.is_empty(), "attribute key cannot be empty");
        self.attributes.insert(key, value.into());
        self
    }

    /// Construction variant of [`set_attribute`](Self::set_attribute)
    ///
    /// # Panics
    ///
    /// Panics if `key` is empty.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Returns the attribute value for `name`
    ///
    /// Absence is distinguishable from an empty value: an attribute
    /// explicitly set to `""` is present and returns `Ok("")`.
    pub fn attribute_value(&self, name: &str) -> Result<&str> {
        match self.attributes.get(name) {
            Some(value) => Ok(value),
            None => Err(Error::new(
                ErrorKind::AttributeNotFound {
                    name: name.to_string(),
                },
                Span::empty(),
            )),
        }
    }

    /// Iterates over attributes in insertion order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Appends a child element; duplicate-looking children are permitted
    pub fn add_child(&mut self, child: Element) -> &mut Self {
        self.children.push(Content::Element(child));
        self
    }

    /// Construction variant of [`add_child`](Self::add_child)
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Content::Element(child));
        self
    }

    /// Appends a text node
    pub fn add_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.children.push(Content::Text(text.into()));
        self
    }

    pub fn children(&self) -> &[Content] {
        &self.children
    }

    /// Iterates over direct element children in document order
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Content::as_element)
    }

    /// Iterates mutably over direct element children in document order
    pub fn element_children_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Content::as_element_mut)
    }

    /// Iterates over direct element children with the given name
    pub fn element_children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.element_children().filter(move |child| child.name == name)
    }

    /// Iterates over direct element children satisfying `predicate`
    pub fn element_children_where<P>(&self, predicate: P) -> impl Iterator<Item = &Element>
    where
        P: Fn(&Element) -> bool,
    {
        self.element_children().filter(move |child| predicate(child))
    }

    /// Returns the first direct child element with the given name
    pub fn first_element_child(&self, name: &str) -> Result<&Element> {
        self.first_element_child_where(|child| child.name == name)
    }

    /// Returns the first direct child element satisfying `predicate`
    pub fn first_element_child_where<P>(&self, predicate: P) -> Result<&Element>
    where
        P: Fn(&Element) -> bool,
    {
        self.element_children()
            .find(|child| predicate(child))
            .ok_or_else(|| Error::new(ErrorKind::ChildNotFound, Span::empty()))
    }

    /// Returns the first direct child matching `kind`, creating and
    /// appending one if absent
    ///
    /// Repeated calls with the same kind never create a second child: the
    /// created child matches the kind by construction (see
    /// [`ChildKind::instantiate`]).
    pub fn first_or_create_child(&mut self, kind: &ChildKind) -> &mut Element {
        let pos = self
            .children
            .iter()
            .position(|child| child.as_element().is_some_and(|e| kind.matches(e)));
        let pos = match pos {
            Some(pos) => pos,
            None => {
                self.children.push(Content::Element(kind.instantiate()));
                self.children.len() - 1
            }
        };
        // `pos` always indexes the element found or just appended
        match self.children.get_mut(pos) {
            Some(Content::Element(element)) => element,
            _ => unreachable!(),
        }
    }

    /// Removes the first child structurally equal to `child`
    ///
    /// Fails with a not-found error if no child matches. Removing one
    /// specific known child is strict; the bulk removals below are not.
    pub fn remove_child(&mut self, child: &Element) -> Result<()> {
        let pos = self
            .children
            .iter()
            .position(|existing| existing.as_element() == Some(child));
        match pos {
            Some(pos) => {
                self.children.remove(pos);
                Ok(())
            }
            None => Err(Error::with_message(
                ErrorKind::ChildNotFound,
                Span::empty(),
                format!("no child equal to <{}> to remove", child.name),
            )),
        }
    }

    /// Removes all direct element children with the given name
    ///
    /// Zero matches is success.
    pub fn remove_element_children_named(&mut self, name: &str) -> &mut Self {
        self.remove_element_children_where(|child| child.name == name)
    }

    /// Removes all direct element children satisfying `predicate`
    ///
    /// Zero matches is success.
    pub fn remove_element_children_where<P>(&mut self, predicate: P) -> &mut Self
    where
        P: Fn(&Element) -> bool,
    {
        self.children
            .retain(|child| !child.as_element().is_some_and(|e| predicate(e)));
        self
    }

    /// Removes all children, text nodes included
    pub fn clear_children(&mut self) -> &mut Self {
        self.children.clear();
        self
    }

    /// Serialize this element at the given format
    pub fn to_xml_string(&self, format: Format) -> String {
        writer::write_element(self, format)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml_string(Format::Concise))
    }
}

/// Descriptor of a child-element slot: the one value both the search
/// predicate and the creation factory of
/// [`first_or_create_child`](Element::first_or_create_child) derive from
///
/// The element name and the optional discriminator attribute participate in
/// matching and in creation; initial attributes apply at creation only.
/// Extra attributes cannot make the name/discriminator predicate fail, so a
/// created child always matches its own kind.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildKind {
    name: String,
    discriminator: Option<(String, String)>,
    initial_attributes: Vec<(String, String)>,
}

impl ChildKind {
    /// A slot matched by element name alone
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "element name cannot be empty");
        Self {
            name,
            discriminator: None,
            initial_attributes: Vec::new(),
        }
    }

    /// Narrows the slot to elements whose `key` attribute equals `value`
    pub fn discriminated_by(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.discriminator = Some((key.into(), value.into()));
        self
    }

    /// Adds an attribute applied when the slot is instantiated, without
    /// narrowing the match
    pub fn with_initial_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.initial_attributes.push((key.into(), value.into()));
        self
    }

    /// True if `element` occupies this slot
    pub fn matches(&self, element: &Element) -> bool {
        if element.name != self.name {
            return false;
        }
        match &self.discriminator {
            Some((key, value)) => element.attribute_value(key).ok() == Some(value.as_str()),
            None => true,
        }
    }

    /// Builds a fresh element occupying this slot
    pub fn instantiate(&self) -> Element {
        let mut element = Element::new(self.name.clone());
        if let Some((key, value)) = &self.discriminator {
            element.set_attribute(key.clone(), value.clone());
        }
        for (key, value) in &self.initial_attributes {
            element.set_attribute(key.clone(), value.clone());
        }
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attribute_preserves_position() {
        let mut element = Element::new("a");
        element
            .set_attribute("first", "1")
            .set_attribute("second", "2")
            .set_attribute("first", "updated");

        let attrs: Vec<(&str, &str)> = element.attributes().collect();
        assert_eq!(attrs, vec![("first", "updated"), ("second", "2")]);
        assert_eq!(element.attribute_count(), 2);
    }

    #[test]
    fn test_attribute_absence_vs_empty() {
        let mut element = Element::new("a");
        element.set_attribute("empty", "");

        assert_eq!(element.attribute_value("empty"), Ok(""));
        let err = element.attribute_value("missing").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_equality_ignores_attribute_order() {
        let left = Element::new("a")
            .with_attribute("x", "1")
            .with_attribute("y", "2");
        let right = Element::new("a")
            .with_attribute("y", "2")
            .with_attribute("x", "1");
        assert_eq!(left, right);
    }

    #[test]
    fn test_equality_respects_child_order() {
        let left = Element::new("a")
            .with_child(Element::new("b"))
            .with_child(Element::new("c"));
        let right = Element::new("a")
            .with_child(Element::new("c"))
            .with_child(Element::new("b"));
        assert_ne!(left, right);
    }

    #[test]
    fn test_first_or_create_is_idempotent() {
        let kind = ChildKind::named("orderEntry").discriminated_by("type", "inheritedJdk");
        let mut parent = Element::new("component");

        parent.first_or_create_child(&kind);
        parent.first_or_create_child(&kind);

        assert_eq!(parent.element_children().count(), 1);
    }

    #[test]
    fn test_first_or_create_skips_non_matching_siblings() {
        let kind = ChildKind::named("component").discriminated_by("name", "RunManager");
        let mut parent = Element::new("project");
        parent.add_child(Element::new("component").with_attribute("name", "Other"));

        let created = parent.first_or_create_child(&kind);
        assert_eq!(created.attribute_value("name"), Ok("RunManager"));
        assert_eq!(parent.element_children().count(), 2);
    }

    #[test]
    fn test_initial_attributes_do_not_narrow_match() {
        let kind = ChildKind::named("content").with_initial_attribute("url", "file://$MODULE_DIR$");
        let mut parent = Element::new("component");
        parent.add_child(Element::new("content").with_attribute("url", "elsewhere"));

        parent.first_or_create_child(&kind);
        assert_eq!(parent.element_children().count(), 1);
    }

    #[test]
    fn test_remove_child_is_strict() {
        let mut parent = Element::new("a");
        parent.add_child(Element::new("b"));

        let missing = Element::new("c");
        assert!(parent.remove_child(&missing).unwrap_err().is_not_found());

        let present = Element::new("b");
        assert_eq!(parent.remove_child(&present), Ok(()));
        assert_eq!(parent.element_children().count(), 0);
    }

    #[test]
    fn test_remove_child_removes_first_match_only() {
        let mut parent = Element::new("a");
        parent.add_child(Element::new("b"));
        parent.add_child(Element::new("b"));

        parent.remove_child(&Element::new("b")).ok();
        assert_eq!(parent.element_children().count(), 1);
    }

    #[test]
    fn test_bulk_removal_is_forgiving() {
        let mut parent = Element::new("a");
        parent.remove_element_children_named("nothing");
        assert_eq!(parent, Element::new("a"));

        parent.add_child(Element::new("b"));
        parent.add_child(Element::new("c"));
        parent.add_child(Element::new("b"));
        parent.remove_element_children_named("b");

        let names: Vec<&str> = parent.element_children().map(Element::name).collect();
        assert_eq!(names, vec!["c"]);
    }

    #[test]
    fn test_clear_children() {
        let mut parent = Element::new("a");
        parent.add_child(Element::new("b"));
        parent.add_text("text");
        parent.clear_children();
        assert!(parent.children().is_empty());
    }

    #[test]
    fn test_document_root_replaced_wholesale() {
        let mut document = Document::new();
        assert!(document.root().is_none());

        document.set_root(Element::new("a"));
        document.set_root(Element::new("b"));
        assert_eq!(document.root().map(Element::name), Some("b"));
    }

    #[test]
    #[should_panic(expected = "element name cannot be empty")]
    fn test_empty_element_name_is_a_contract_violation() {
        Element::new("");
    }

    #[test]
    #[should_panic(expected = "attribute key cannot be empty")]
    fn test_empty_attribute_key_is_a_contract_violation() {
        Element::new("a").with_attribute("", "value");
    }
}
