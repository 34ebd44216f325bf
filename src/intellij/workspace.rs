//! IntelliJ workspace documents (`workspace.xml`)

use std::fmt;
use std::path::Path;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::intellij::run_configuration::{
    IntellijWorkspaceRunConfiguration, CONFIGURATION_ELEMENT_NAME,
};
use crate::xml::{ChildKind, Document, Element, Format};

const PROJECT_ELEMENT_NAME: &str = "project";
const PROJECT_VERSION_ATTRIBUTE_NAME: &str = "version";
const PROJECT_VERSION_ATTRIBUTE_VALUE: &str = "4";
const COMPONENT_ELEMENT_NAME: &str = "component";
const COMPONENT_NAME_ATTRIBUTE_NAME: &str = "name";
const RUN_MANAGER_ATTRIBUTE_VALUE: &str = "RunManager";

fn run_manager_kind() -> ChildKind {
    ChildKind::named(COMPONENT_ELEMENT_NAME)
        .discriminated_by(COMPONENT_NAME_ATTRIBUTE_NAME, RUN_MANAGER_ATTRIBUTE_VALUE)
}

/// An IntelliJ workspace document holding run configurations
#[derive(Clone, Debug, PartialEq)]
pub struct IntellijWorkspace {
    document: Document,
}

impl Default for IntellijWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl IntellijWorkspace {
    /// Creates an empty workspace document
    pub fn new() -> Self {
        let document = Document::new().with_root(
            Element::new(PROJECT_ELEMENT_NAME)
                .with_attribute(PROJECT_VERSION_ATTRIBUTE_NAME, PROJECT_VERSION_ATTRIBUTE_VALUE),
        );
        Self { document }
    }

    /// Wraps an existing document whose root is `<project>`
    pub fn from_document(document: Document) -> Result<Self> {
        let root = document
            .root()
            .ok_or_else(|| Error::new(ErrorKind::MissingRoot, Span::empty()))?;
        if root.name() != PROJECT_ELEMENT_NAME {
            return Err(Error::new(
                ErrorKind::UnexpectedElement {
                    expected: PROJECT_ELEMENT_NAME.to_string(),
                    found: root.name().to_string(),
                },
                Span::empty(),
            ));
        }
        Ok(Self { document })
    }

    /// Parse a workspace document from text
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_document(Document::parse(text)?)
    }

    /// Parse a workspace document from a file
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

    fn run_manager_mut(&mut self) -> &mut Element {
        self.root_mut().first_or_create_child(&run_manager_kind())
    }

    /// Snapshots of the run configurations, in document order
    ///
    /// Empty when the workspace has no RunManager component.
    pub fn run_configurations(&self) -> Vec<IntellijWorkspaceRunConfiguration> {
        let kind = run_manager_kind();
        self.document
            .root()
            .and_then(|root| root.element_children().find(|child| kind.matches(child)))
            .map(|run_manager| {
                run_manager
                    .element_children_named(CONFIGURATION_ELEMENT_NAME)
                    .cloned()
                    .filter_map(|element| {
                        IntellijWorkspaceRunConfiguration::from_element(element).ok()
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Moves a run configuration into the RunManager component
    pub fn add_run_configuration(
        &mut self,
        run_configuration: IntellijWorkspaceRunConfiguration,
    ) -> &mut Self {
        self.run_manager_mut()
            .add_child(run_configuration.into_element());
        self
    }

    /// Removes the first run configuration structurally equal to
    /// `run_configuration`; fails with a not-found error if none matches
    pub fn remove_run_configuration(
        &mut self,
        run_configuration: &IntellijWorkspaceRunConfiguration,
    ) -> Result<()> {
        self.run_manager_mut()
            .remove_child(run_configuration.as_element())
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

impl fmt::Display for IntellijWorkspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml_string(Format::Concise))
    }
}
