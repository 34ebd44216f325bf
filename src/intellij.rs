//! Typed views over IntelliJ project documents
//!
//! The five wrappers are independent types composed with the XML tree;
//! each interprets one element shape as a semantic entity without copying
//! the underlying document.

pub mod module;
pub mod module_library;
pub mod run_configuration;
pub mod source_folder;
pub mod workspace;

pub use module::IntellijModule;
pub use module_library::IntellijModuleLibrary;
pub use run_configuration::IntellijWorkspaceRunConfiguration;
pub use source_folder::IntellijSourceFolder;
pub use workspace::IntellijWorkspace;
