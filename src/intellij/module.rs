//! IntelliJ module descriptors (`.iml` documents)

use std::fmt;
use std::path::Path;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::intellij::module_library::{
    IntellijModuleLibrary, MODULE_LIBRARY_TYPE, ORDER_ENTRY_ELEMENT_NAME, TYPE_ATTRIBUTE_NAME,
};
use crate::intellij::source_folder::IntellijSourceFolder;
use crate::xml::{ChildKind, Declaration, Document, Element, Format};

const MODULE_ELEMENT_NAME: &str = "module";
const MODULE_TYPE_ATTRIBUTE_NAME: &str = "type";
const MODULE_TYPE_ATTRIBUTE_VALUE: &str = "JAVA_MODULE";
const MODULE_VERSION_ATTRIBUTE_NAME: &str = "version";
const MODULE_VERSION_ATTRIBUTE_VALUE: &str = "4";
const COMPONENT_ELEMENT_NAME: &str = "component";
const COMPONENT_NAME_ATTRIBUTE_NAME: &str = "name";
const COMPONENT_NAME_ATTRIBUTE_VALUE: &str = "NewModuleRootManager";
const OUTPUT_ELEMENT_NAME: &str = "output";
const OUTPUT_TEST_ELEMENT_NAME: &str = "output-test";
const URL_ATTRIBUTE_NAME: &str = "url";
const EXCLUDE_OUTPUT_ELEMENT_NAME: &str = "exclude-output";
const CONTENT_ELEMENT_NAME: &str = "content";
const CONTENT_URL_ATTRIBUTE_VALUE: &str = "file://$MODULE_DIR$";
const SOURCE_FOLDER_ELEMENT_NAME: &str = "sourceFolder";
const INHERITED_JDK_TYPE: &str = "inheritedJdk";
const SOURCE_FOLDER_TYPE: &str = "sourceFolder";
const FOR_TESTS_ATTRIBUTE_NAME: &str = "forTests";

fn component_kind() -> ChildKind {
    ChildKind::named(COMPONENT_ELEMENT_NAME)
        .with_initial_attribute(COMPONENT_NAME_ATTRIBUTE_NAME, COMPONENT_NAME_ATTRIBUTE_VALUE)
}

fn content_kind() -> ChildKind {
    ChildKind::named(CONTENT_ELEMENT_NAME)
        .with_initial_attribute(URL_ATTRIBUTE_NAME, CONTENT_URL_ATTRIBUTE_VALUE)
}

fn is_module_library(element: &Element) -> bool {
    element.name() == ORDER_ENTRY_ELEMENT_NAME
        && element.attribute_value(TYPE_ATTRIBUTE_NAME).ok() == Some(MODULE_LIBRARY_TYPE)
}

/// An IntelliJ module descriptor, typically read from a `.iml` file
#[derive(Clone, Debug, PartialEq)]
pub struct IntellijModule {
    document: Document,
}

impl Default for IntellijModule {
    fn default() -> Self {
        Self::new()
    }
}

impl IntellijModule {
    /// Creates a Java module document with its root-manager component
    pub fn new() -> Self {
        let document = Document::new()
            .with_declaration(Declaration::new().with_version("1.0").with_encoding("UTF-8"))
            .with_root(
                Element::new(MODULE_ELEMENT_NAME)
                    .with_attribute(MODULE_TYPE_ATTRIBUTE_NAME, MODULE_TYPE_ATTRIBUTE_VALUE)
                    .with_attribute(MODULE_VERSION_ATTRIBUTE_NAME, MODULE_VERSION_ATTRIBUTE_VALUE),
            );
        let mut module = Self { document };
        module.component_mut();
        module
    }

    /// Wraps an existing document whose root is `<module>`
    pub fn from_document(document: Document) -> Result<Self> {
        let root = document
            .root()
            .ok_or_else(|| Error::new(ErrorKind::MissingRoot, Span::empty()))?;
        if root.name() != MODULE_ELEMENT_NAME {
            return Err(Error::new(
                ErrorKind::UnexpectedElement {
                    expected: MODULE_ELEMENT_NAME.to_string(),
                    found: root.name().to_string(),
                },
                Span::empty(),
            ));
        }
        Ok(Self { document })
    }

    /// Parse a module descriptor from text
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_document(Document::parse(text)?)
    }

    /// Parse a module descriptor from a file
    pub fn parse_file(path: impl AsRef<Path> + fmt::Debug) -> Result<Self> {
        Self::from_document(crate::parse_file(path)?)
    }

    fn root_mut(&mut self) -> &mut Element {
        // construction guarantees the root element
        match self.document.root_mut() {
            Some(root) => root,
            None => unreachable!(),
        }
    }

    fn component(&self) -> Option<&Element> {
        let kind = component_kind();
        self.document
            .root()
            .and_then(|root| root.element_children().find(|child| kind.matches(child)))
    }

    fn component_mut(&mut self) -> &mut Element {
        self.root_mut().first_or_create_child(&component_kind())
    }

    /// Sets the compile output url
    ///
    /// # Panics
    ///
    /// Panics if `output_url` is empty.
    pub fn set_output_url(&mut self, output_url: impl Into<String>) -> &mut Self {
        let output_url = output_url.into();
        assert!(!output_url.is_empty(), "output_url cannot be empty");
        self.component_mut()
            .first_or_create_child(&ChildKind::named(OUTPUT_ELEMENT_NAME))
            .set_attribute(URL_ATTRIBUTE_NAME, output_url);
        self
    }

    /// Sets the test compile output url
    ///
    /// # Panics
    ///
    /// Panics if `output_test_url` is empty.
    pub fn set_output_test_url(&mut self, output_test_url: impl Into<String>) -> &mut Self {
        let output_test_url = output_test_url.into();
        assert!(!output_test_url.is_empty(), "output_test_url cannot be empty");
        self.component_mut()
            .first_or_create_child(&ChildKind::named(OUTPUT_TEST_ELEMENT_NAME))
            .set_attribute(URL_ATTRIBUTE_NAME, output_test_url);
        self
    }

    /// Toggles the `<exclude-output/>` marker
    ///
    /// `true` ensures a single marker exists; `false` removes it,
    /// tolerating absence. Idempotent in both directions.
    pub fn set_exclude_output(&mut self, exclude_output: bool) -> &mut Self {
        let component = self.component_mut();
        if exclude_output {
            component.first_or_create_child(&ChildKind::named(EXCLUDE_OUTPUT_ELEMENT_NAME));
        } else {
            component.remove_element_children_named(EXCLUDE_OUTPUT_ELEMENT_NAME);
        }
        self
    }

    /// Moves a source folder into the module's content root
    pub fn add_source_folder(&mut self, source_folder: IntellijSourceFolder) -> &mut Self {
        self.component_mut()
            .first_or_create_child(&content_kind())
            .add_child(source_folder.into_element());
        self
    }

    /// Snapshots of the source folders across all content roots
    pub fn source_folders(&self) -> Vec<IntellijSourceFolder> {
        self.component()
            .map(|component| {
                component
                    .element_children_named(CONTENT_ELEMENT_NAME)
                    .flat_map(|content| content.element_children_named(SOURCE_FOLDER_ELEMENT_NAME))
                    .cloned()
                    .filter_map(|element| IntellijSourceFolder::from_element(element).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Removes all source folders; other content-root children are untouched
    pub fn clear_source_folders(&mut self) -> &mut Self {
        for content in self
            .component_mut()
            .element_children_mut()
            .filter(|child| child.name() == CONTENT_ELEMENT_NAME)
        {
            content.remove_element_children_named(SOURCE_FOLDER_ELEMENT_NAME);
        }
        self
    }

    /// Toggles the `<orderEntry type="inheritedJdk"/>` marker
    pub fn set_inherited_jdk(&mut self, inherited_jdk: bool) -> &mut Self {
        let kind = ChildKind::named(ORDER_ENTRY_ELEMENT_NAME)
            .discriminated_by(TYPE_ATTRIBUTE_NAME, INHERITED_JDK_TYPE);
        let component = self.component_mut();
        if inherited_jdk {
            component.first_or_create_child(&kind);
        } else {
            component.remove_element_children_where(|child| kind.matches(child));
        }
        self
    }

    /// Sets whether the module's own sources order entry is for tests
    ///
    /// The `<orderEntry type="sourceFolder">` entry is created on demand
    /// and its `forTests` attribute rewritten either way.
    pub fn set_source_folder_for_tests(&mut self, for_tests: bool) -> &mut Self {
        self.component_mut()
            .first_or_create_child(
                &ChildKind::named(ORDER_ENTRY_ELEMENT_NAME)
                    .discriminated_by(TYPE_ATTRIBUTE_NAME, SOURCE_FOLDER_TYPE),
            )
            .set_attribute(FOR_TESTS_ATTRIBUTE_NAME, for_tests.to_string());
        self
    }

    /// Moves a module library into the root-manager component
    pub fn add_module_library(&mut self, module_library: IntellijModuleLibrary) -> &mut Self {
        self.component_mut().add_child(module_library.into_element());
        self
    }

    /// Snapshots of the module libraries, in document order
    pub fn module_libraries(&self) -> Vec<IntellijModuleLibrary> {
        self.component()
            .map(|component| {
                component
                    .element_children_where(is_module_library)
                    .cloned()
                    .map(IntellijModuleLibrary::from_tree)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Removes all module libraries; other order entries are untouched.
    /// Zero matches is success.
    pub fn clear_module_libraries(&mut self) -> &mut Self {
        self.component_mut()
            .remove_element_children_where(is_module_library);
        self
    }

    /// Removes the first module library structurally equal to
    /// `module_library`; fails with a not-found error if none matches
    pub fn remove_module_library(&mut self, module_library: &IntellijModuleLibrary) -> Result<()> {
        self.component_mut().remove_child(module_library.as_element())
    }

    pub fn as_document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn to_xml_string(&self, format: Format) -> String {
        self.document.to_xml_string(format)
    }
}

impl fmt::Display for IntellijModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml_string(Format::Concise))
    }
}
