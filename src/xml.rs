//! XML document model, parser and serializer

pub(crate) mod cursor;
pub mod model;
pub mod parser;
pub mod writer;

pub use model::{ChildKind, Content, Declaration, Document, Element};
pub use parser::Parser;
pub use writer::Format;
