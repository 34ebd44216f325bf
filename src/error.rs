//! Error types for ijdoc

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidToken,
    UnexpectedEof,
    MismatchedTag { expected: String, found: String },
    DuplicateAttribute { name: String },
    InvalidEntity,
    TrailingContent,
    MissingRoot,
    UnexpectedElement { expected: String, found: String },
    AttributeNotFound { name: String },
    ChildNotFound,
    Io { message: String },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected {expected}, found {found}")
            }
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::InvalidEntity => write!(f, "invalid xml entity"),
            Self::TrailingContent => {
                write!(f, "expected only whitespace after the root element")
            }
            Self::MissingRoot => write!(f, "document has no root element"),
            Self::UnexpectedElement { expected, found } => {
                write!(f, "expected element {expected}, found {found}")
            }
            Self::AttributeNotFound { name } => write!(f, "attribute not found: {name}"),
            Self::ChildNotFound => write!(f, "child element not found"),
            Self::Io { message } => write!(f, "io error: {message}"),
        }
    }
}

/// Main error type for ijdoc
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        let pos = Pos::new(offset, line, col);
        Self::new(kind, Span::new(pos, pos))
    }

    /// True for absence conditions (a requested attribute or child does not
    /// exist), as opposed to structural or parse errors. Typed getters catch
    /// these and substitute a default.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::AttributeNotFound { .. } | ErrorKind::ChildNotFound
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error at {}: {}", self.span.start, self.message)
    }
}

/// Result type alias for ijdoc
pub type Result<T> = std::result::Result<T, Error>;
