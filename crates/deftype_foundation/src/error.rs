//! Error types for the deftype compiler.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Every fatal condition in the pipeline (parsing, semantic validation,
//! generation) surfaces as exactly one [`Error`].

use std::fmt;

use thiserror::Error;

/// The main error type for deftype operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Pushes a frame for the declaration being processed.
    ///
    /// The innermost position wins: an existing line and column are kept.
    #[must_use]
    pub fn in_declaration(mut self, frame: impl Into<String>, line: usize, column: usize) -> Self {
        let mut context = self.context.take().unwrap_or_default().with_frame(frame);
        if context.line.is_none() {
            context = context.with_position(line, column);
        }
        self.context = Some(context);
        self
    }

    /// Names the source the error came from.
    #[must_use]
    pub fn in_source(mut self, source: impl Into<String>) -> Self {
        self.context = Some(self.context.take().unwrap_or_default().with_source(source));
        self
    }

    /// Creates an unsupported array shape error.
    #[must_use]
    pub fn unsupported_array_shape(
        owner: impl Into<String>,
        property: impl Into<String>,
        shape: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::UnsupportedArrayShape {
            owner: owner.into(),
            property: property.into(),
            shape: shape.into(),
        })
    }

    /// Creates a duplicate type error.
    #[must_use]
    pub fn duplicate_type(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateType { name: name.into() })
    }

    /// Creates an unresolved type error.
    #[must_use]
    pub fn unresolved_type(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnresolvedType {
            name: name.into(),
            namespace: namespace.into(),
        })
    }

    /// Creates an evaluation error.
    #[must_use]
    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Evaluation(message.into()))
    }

    /// Creates a duplicate member error.
    #[must_use]
    pub fn duplicate_member(owner: impl Into<String>, member: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateMember {
            owner: owner.into(),
            member: member.into(),
        })
    }

    /// Returns true if this is a parse error.
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self.kind, ErrorKind::ParseError { .. })
    }

    /// Returns the name of the grammar production that failed, for parse errors.
    #[must_use]
    pub fn production(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::ParseError { production, .. } => Some(production),
            _ => None,
        }
    }

    /// Returns the byte offset of the error in the source, for parse errors.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        match &self.kind {
            ErrorKind::ParseError { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Malformed or unexpected input in the DSL source.
    #[error("parse error at {line}:{column} (offset {offset}): expected {production}: {message}")]
    ParseError {
        /// Name of the grammar production that failed.
        production: String,
        /// Description of the parse error.
        message: String,
        /// Furthest byte offset reached before failing.
        offset: usize,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
        /// The source line where the error occurred.
        context: String,
    },

    /// Equality generation was requested for an array shape it cannot express.
    #[error("unsupported array shape {shape} on {owner}.{property}: only single-rank, one-dimensional arrays support equality")]
    UnsupportedArrayShape {
        /// The declaration owning the property.
        owner: String,
        /// The offending property.
        property: String,
        /// Rendering of the array type, e.g. `int[,]`.
        shape: String,
    },

    /// Two declarations share the same fully qualified name.
    #[error("duplicate type declaration: {name}")]
    DuplicateType {
        /// The fully qualified name declared more than once.
        name: String,
    },

    /// A named type could not be resolved (strict resolution only).
    #[error("unresolved type {name} in namespace {namespace}")]
    UnresolvedType {
        /// The name as written in the source.
        name: String,
        /// The namespace the reference occurred in.
        namespace: String,
    },

    /// Failure while evaluating a generated declaration tree.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Two members of one generated type would share a name, e.g. the
    /// properties `Id` and `id` both backed by `_id`.
    #[error("duplicate member {member} on {owner}")]
    DuplicateMember {
        /// The declaration owning the members.
        owner: String,
        /// The member whose name repeats an earlier one.
        member: String,
    },
}

/// Context about where an error occurred.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Source file or declaration name.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<usize>,
    /// Column number in source.
    pub column: Option<usize>,
    /// Chain of declarations being processed when the error occurred.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            line: None,
            column: None,
            stack: Vec::new(),
        }
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Adds a frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}

/// Result type alias using the deftype [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
