//! Run configuration entries of an IntelliJ workspace document

use std::fmt;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::xml::{ChildKind, Element, Format};

pub(crate) const CONFIGURATION_ELEMENT_NAME: &str = "configuration";
const NAME_ATTRIBUTE_NAME: &str = "name";
const TYPE_ATTRIBUTE_NAME: &str = "type";
const FACTORY_NAME_ATTRIBUTE_NAME: &str = "factoryName";
const APPLICATION_ATTRIBUTE_VALUE: &str = "Application";
const OPTION_ELEMENT_NAME: &str = "option";
const OPTION_NAME_ATTRIBUTE_NAME: &str = "name";
const OPTION_VALUE_ATTRIBUTE_NAME: &str = "value";
const MAIN_CLASS_NAME_OPTION: &str = "MAIN_CLASS_NAME";
const PROGRAM_PARAMETERS_OPTION: &str = "PROGRAM_PARAMETERS";
const VM_PARAMETERS_OPTION: &str = "VM_PARAMETERS";
const MODULE_ELEMENT_NAME: &str = "module";
const METHOD_ELEMENT_NAME: &str = "method";
const METHOD_V_ATTRIBUTE_NAME: &str = "v";
const METHOD_V_ATTRIBUTE_VALUE: &str = "2";
const OPTION_ENABLED_ATTRIBUTE_NAME: &str = "enabled";

fn option_kind(option_name: &str) -> ChildKind {
    ChildKind::named(OPTION_ELEMENT_NAME).discriminated_by(OPTION_NAME_ATTRIBUTE_NAME, option_name)
}

/// A `<configuration>` entry of the workspace RunManager component
#[derive(Clone, Debug, PartialEq)]
pub struct IntellijWorkspaceRunConfiguration {
    element: Element,
}

impl Default for IntellijWorkspaceRunConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl IntellijWorkspaceRunConfiguration {
    /// Creates an Application run configuration with the fixed build-step
    /// skeleton (`<method v="2">` with the Make option enabled)
    pub fn new() -> Self {
        let element = Element::new(CONFIGURATION_ELEMENT_NAME)
            .with_attribute(TYPE_ATTRIBUTE_NAME, APPLICATION_ATTRIBUTE_VALUE)
            .with_attribute(FACTORY_NAME_ATTRIBUTE_NAME, APPLICATION_ATTRIBUTE_VALUE)
            .with_child(
                Element::new(METHOD_ELEMENT_NAME)
                    .with_attribute(METHOD_V_ATTRIBUTE_NAME, METHOD_V_ATTRIBUTE_VALUE)
                    .with_child(
                        Element::new(OPTION_ELEMENT_NAME)
                            .with_attribute(OPTION_NAME_ATTRIBUTE_NAME, "Make")
                            .with_attribute(OPTION_ENABLED_ATTRIBUTE_NAME, "true"),
                    ),
            );
        Self { element }
    }

    /// Wraps an existing `<configuration>` element
    pub fn from_element(element: Element) -> Result<Self> {
        if element.name() != CONFIGURATION_ELEMENT_NAME {
            return Err(Error::new(
                ErrorKind::UnexpectedElement {
                    expected: CONFIGURATION_ELEMENT_NAME.to_string(),
                    found: element.name().to_string(),
                },
                Span::empty(),
            ));
        }
        Ok(Self { element })
    }

    /// The configuration name, if one is set
    pub fn name(&self) -> Option<&str> {
        self.element.attribute_value(NAME_ATTRIBUTE_NAME).ok()
    }

    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        assert!(!name.is_empty(), "name cannot be empty");
        self.element.set_attribute(NAME_ATTRIBUTE_NAME, name);
        self
    }

    /// The configuration type, if one is set
    pub fn config_type(&self) -> Option<&str> {
        self.element.attribute_value(TYPE_ATTRIBUTE_NAME).ok()
    }

    /// # Panics
    ///
    /// Panics if `config_type` is empty.
    pub fn set_config_type(&mut self, config_type: impl Into<String>) -> &mut Self {
        let config_type = config_type.into();
        assert!(!config_type.is_empty(), "config_type cannot be empty");
        self.element.set_attribute(TYPE_ATTRIBUTE_NAME, config_type);
        self
    }

    /// The factory name, if one is set
    pub fn factory_name(&self) -> Option<&str> {
        self.element.attribute_value(FACTORY_NAME_ATTRIBUTE_NAME).ok()
    }

    /// # Panics
    ///
    /// Panics if `factory_name` is empty.
    pub fn set_factory_name(&mut self, factory_name: impl Into<String>) -> &mut Self {
        let factory_name = factory_name.into();
        assert!(!factory_name.is_empty(), "factory_name cannot be empty");
        self.element
            .set_attribute(FACTORY_NAME_ATTRIBUTE_NAME, factory_name);
        self
    }

    fn option_value(&self, option_name: &str) -> Option<&str> {
        self.element
            .first_element_child_where(|child| option_kind(option_name).matches(child))
            .ok()
            .and_then(|option| option.attribute_value(OPTION_VALUE_ATTRIBUTE_NAME).ok())
    }

    fn set_option_value(&mut self, option_name: &str, value: String) {
        self.element
            .first_or_create_child(&option_kind(option_name))
            .set_attribute(OPTION_VALUE_ATTRIBUTE_NAME, value);
    }

    /// The full name of the main class, if one is set
    pub fn main_class_full_name(&self) -> Option<&str> {
        self.option_value(MAIN_CLASS_NAME_OPTION)
    }

    /// # Panics
    ///
    /// Panics if `main_class_full_name` is empty.
    pub fn set_main_class_full_name(&mut self, main_class_full_name: impl Into<String>) -> &mut Self {
        let main_class_full_name = main_class_full_name.into();
        assert!(
            !main_class_full_name.is_empty(),
            "main_class_full_name cannot be empty"
        );
        self.set_option_value(MAIN_CLASS_NAME_OPTION, main_class_full_name);
        self
    }

    /// The name of the module this configuration runs in, if one is set
    pub fn module_name(&self) -> Option<&str> {
        self.element
            .first_element_child(MODULE_ELEMENT_NAME)
            .ok()
            .and_then(|module| module.attribute_value(NAME_ATTRIBUTE_NAME).ok())
    }

    /// # Panics
    ///
    /// Panics if `module_name` is empty.
    pub fn set_module_name(&mut self, module_name: impl Into<String>) -> &mut Self {
        let module_name = module_name.into();
        assert!(!module_name.is_empty(), "module_name cannot be empty");
        self.element
            .first_or_create_child(&ChildKind::named(MODULE_ELEMENT_NAME))
            .set_attribute(NAME_ATTRIBUTE_NAME, module_name);
        self
    }

    /// The parameters passed to the program, if set
    pub fn program_parameters(&self) -> Option<&str> {
        self.option_value(PROGRAM_PARAMETERS_OPTION)
    }

    /// # Panics
    ///
    /// Panics if `program_parameters` is empty.
    pub fn set_program_parameters(&mut self, program_parameters: impl Into<String>) -> &mut Self {
        let program_parameters = program_parameters.into();
        assert!(
            !program_parameters.is_empty(),
            "program_parameters cannot be empty"
        );
        self.set_option_value(PROGRAM_PARAMETERS_OPTION, program_parameters);
        self
    }

    /// The parameters passed to the JVM, if set
    pub fn vm_parameters(&self) -> Option<&str> {
        self.option_value(VM_PARAMETERS_OPTION)
    }

    /// # Panics
    ///
    /// Panics if `vm_parameters` is empty.
    pub fn set_vm_parameters(&mut self, vm_parameters: impl Into<String>) -> &mut Self {
        let vm_parameters = vm_parameters.into();
        assert!(!vm_parameters.is_empty(), "vm_parameters cannot be empty");
        self.set_option_value(VM_PARAMETERS_OPTION, vm_parameters);
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

impl fmt::Display for IntellijWorkspaceRunConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml_string(Format::Concise))
    }
}
