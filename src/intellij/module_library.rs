//! Module-library order entries of an IntelliJ module descriptor

use std::fmt;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::xml::{ChildKind, Element, Format};

pub(crate) const ORDER_ENTRY_ELEMENT_NAME: &str = "orderEntry";
pub(crate) const TYPE_ATTRIBUTE_NAME: &str = "type";
pub(crate) const MODULE_LIBRARY_TYPE: &str = "module-library";
const LIBRARY_ELEMENT_NAME: &str = "library";
const CLASSES_ELEMENT_NAME: &str = "CLASSES";
const JAVADOC_ELEMENT_NAME: &str = "JAVADOC";
const SOURCES_ELEMENT_NAME: &str = "SOURCES";
const ROOT_ELEMENT_NAME: &str = "root";
const URL_ATTRIBUTE_NAME: &str = "url";

fn library_kind() -> ChildKind {
    ChildKind::named(LIBRARY_ELEMENT_NAME)
}

/// An `<orderEntry type="module-library">` entry
///
/// Wrapping ensures the `<library><CLASSES/><JAVADOC/><SOURCES/></library>`
/// skeleton exists.
#[derive(Clone, Debug, PartialEq)]
pub struct IntellijModuleLibrary {
    element: Element,
}

impl Default for IntellijModuleLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl IntellijModuleLibrary {
    /// Creates an empty module library
    pub fn new() -> Self {
        let element = Element::new(ORDER_ENTRY_ELEMENT_NAME)
            .with_attribute(TYPE_ATTRIBUTE_NAME, MODULE_LIBRARY_TYPE);
        let mut library = Self { element };
        library.ensure_skeleton();
        library
    }

    /// Wraps an existing `<orderEntry type="module-library">` element
    pub fn from_element(element: Element) -> Result<Self> {
        if element.name() != ORDER_ENTRY_ELEMENT_NAME {
            return Err(Error::new(
                ErrorKind::UnexpectedElement {
                    expected: ORDER_ENTRY_ELEMENT_NAME.to_string(),
                    found: element.name().to_string(),
                },
                Span::empty(),
            ));
        }
        let entry_type = element.attribute_value(TYPE_ATTRIBUTE_NAME).unwrap_or("");
        if entry_type != MODULE_LIBRARY_TYPE {
            return Err(Error::new(
                ErrorKind::UnexpectedElement {
                    expected: format!("{ORDER_ENTRY_ELEMENT_NAME} with {TYPE_ATTRIBUTE_NAME}={MODULE_LIBRARY_TYPE}"),
                    found: format!("{ORDER_ENTRY_ELEMENT_NAME} with {TYPE_ATTRIBUTE_NAME}={entry_type}"),
                },
                Span::empty(),
            ));
        }
        let mut library = Self { element };
        library.ensure_skeleton();
        Ok(library)
    }

    /// Wraps an element already known to carry the right name and type,
    /// without touching it (snapshots must stay equal to the tree node so
    /// they keep working as structural removal keys)
    pub(crate) fn from_tree(element: Element) -> Self {
        Self { element }
    }

    fn ensure_skeleton(&mut self) {
        let library = self.element.first_or_create_child(&library_kind());
        library.first_or_create_child(&ChildKind::named(CLASSES_ELEMENT_NAME));
        library.first_or_create_child(&ChildKind::named(JAVADOC_ELEMENT_NAME));
        library.first_or_create_child(&ChildKind::named(SOURCES_ELEMENT_NAME));
    }

    fn category_mut(&mut self, category: &str) -> &mut Element {
        self.element
            .first_or_create_child(&library_kind())
            .first_or_create_child(&ChildKind::named(category))
    }

    fn category_urls(&self, category: &str) -> Vec<String> {
        self.element
            .first_element_child(LIBRARY_ELEMENT_NAME)
            .and_then(|library| library.first_element_child(category))
            .map(|element| {
                element
                    .element_children_named(ROOT_ELEMENT_NAME)
                    .filter_map(|root| root.attribute_value(URL_ATTRIBUTE_NAME).ok())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn add_category_url(&mut self, category: &str, url: String) {
        self.category_mut(category)
            .add_child(Element::new(ROOT_ELEMENT_NAME).with_attribute(URL_ATTRIBUTE_NAME, url));
    }

    /// Appends a classes root url; duplicates are permitted
    ///
    /// # Panics
    ///
    /// Panics if `classes_url` is empty.
    pub fn add_classes_url(&mut self, classes_url: impl Into<String>) -> &mut Self {
        let classes_url = classes_url.into();
        assert!(!classes_url.is_empty(), "classes_url cannot be empty");
        self.add_category_url(CLASSES_ELEMENT_NAME, classes_url);
        self
    }

    /// The classes root urls in insertion order
    pub fn classes_urls(&self) -> Vec<String> {
        self.category_urls(CLASSES_ELEMENT_NAME)
    }

    /// Removes all classes root urls; sources are untouched
    pub fn clear_classes_urls(&mut self) -> &mut Self {
        self.category_mut(CLASSES_ELEMENT_NAME).clear_children();
        self
    }

    /// Appends a sources root url; duplicates are permitted
    ///
    /// # Panics
    ///
    /// Panics if `sources_url` is empty.
    pub fn add_sources_url(&mut self, sources_url: impl Into<String>) -> &mut Self {
        let sources_url = sources_url.into();
        assert!(!sources_url.is_empty(), "sources_url cannot be empty");
        self.add_category_url(SOURCES_ELEMENT_NAME, sources_url);
        self
    }

    /// The sources root urls in insertion order
    pub fn sources_urls(&self) -> Vec<String> {
        self.category_urls(SOURCES_ELEMENT_NAME)
    }

    /// Removes all sources root urls; classes are untouched
    pub fn clear_sources_urls(&mut self) -> &mut Self {
        self.category_mut(SOURCES_ELEMENT_NAME).clear_children();
        self
    }

    pub fn as_element(&self) -> &Element {
        &self.element
    }

    pub fn into_element(self) -> Element {
        self.element
    }

    pub fn to_xml_string(&self, format: Format) -> String {
        self.element.to_xml_string(format)
    }
}

impl fmt::Display for IntellijModuleLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml_string(Format::Concise))
    }
}
