//! Source folder entries of an IntelliJ module descriptor

use std::fmt;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::xml::{Element, Format};

const SOURCE_FOLDER_ELEMENT_NAME: &str = "sourceFolder";
const URL_ATTRIBUTE_NAME: &str = "url";
const IS_TEST_SOURCE_ATTRIBUTE_NAME: &str = "isTestSource";

/// A `<sourceFolder>` entry inside a module's content root
#[derive(Clone, Debug, PartialEq)]
pub struct IntellijSourceFolder {
    element: Element,
}

impl IntellijSourceFolder {
    /// Creates a source folder pointing at `url`
    ///
    /// # Panics
    ///
    /// Panics if `url` is empty.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        assert!(!url.is_empty(), "url cannot be empty");
        let mut folder = Self {
            element: Element::new(SOURCE_FOLDER_ELEMENT_NAME),
        };
        folder.set_url(url);
        folder
    }

    /// Wraps an existing `<sourceFolder>` element
    pub fn from_element(element: Element) -> Result<Self> {
        if element.name() != SOURCE_FOLDER_ELEMENT_NAME {
            return Err(Error::new(
                ErrorKind::UnexpectedElement {
                    expected: SOURCE_FOLDER_ELEMENT_NAME.to_string(),
                    found: element.name().to_string(),
                },
                Span::empty(),
            ));
        }
        Ok(Self { element })
    }

    /// The folder url, if one is set
    pub fn url(&self) -> Option<&str> {
        self.element.attribute_value(URL_ATTRIBUTE_NAME).ok()
    }

    /// # Panics
    ///
    /// Panics if `url` is empty.
    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        let url = url.into();
        assert!(!url.is_empty(), "url cannot be empty");
        self.element.set_attribute(URL_ATTRIBUTE_NAME, url);
        self
    }

    /// Whether this folder holds test sources
    ///
    /// Defaults to `false` when the attribute is missing or unparsable.
    pub fn is_test_source(&self) -> bool {
        self.element
            .attribute_value(IS_TEST_SOURCE_ATTRIBUTE_NAME)
            .ok()
            .and_then(|value| value.parse::<bool>().ok())
            .unwrap_or(false)
    }

    pub fn set_is_test_source(&mut self, is_test_source: bool) -> &mut Self {
        self.element
            .set_attribute(IS_TEST_SOURCE_ATTRIBUTE_NAME, is_test_source.to_string());
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

impl fmt::Display for IntellijSourceFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml_string(Format::Concise))
    }
}
