//! ijdoc - Typed, round-trippable views over IntelliJ project XML documents
//!
//! # Quick Start
//!
//! ```
//! use ijdoc::{Format, IntellijModule};
//! # fn main() -> Result<(), ijdoc::Error> {
//! let mut module = IntellijModule::new();
//! module.set_output_url("file://$MODULE_DIR$/outputs");
//! let text = module.to_xml_string(Format::Pretty);
//! let reparsed = IntellijModule::parse(&text)?;
//! assert_eq!(module, reparsed);
//! # Ok(())
//! # }
//! ```
//!
//! Documents and wrappers are plain owned values: every mutation requires
//! exclusive access, so there is no locking and no shared mutable tree. A
//! document meant for concurrent use needs external synchronization.

#![forbid(unsafe_code)]

use std::path::Path;

use tracing::{debug, instrument};

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod xml;
pub use xml::{ChildKind, Content, Declaration, Document, Element, Format, Parser};

pub mod intellij;
pub use intellij::{
    IntellijModule, IntellijModuleLibrary, IntellijSourceFolder, IntellijWorkspace,
    IntellijWorkspaceRunConfiguration,
};

/// Parse an XML document from string
pub fn parse_str(s: &str) -> Result<Document> {
    debug!(len = s.len(), "parsing document from string");
    Document::parse(s)
}

/// Parse an XML document from a file
#[instrument]
pub fn parse_file(path: impl AsRef<Path> + std::fmt::Debug) -> Result<Document> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::with_message(
            ErrorKind::Io {
                message: e.to_string(),
            },
            Span::empty(),
            e.to_string(),
        )
    })?;
    debug!(len = content.len(), "file read, parsing");
    Document::parse(&content)
}
