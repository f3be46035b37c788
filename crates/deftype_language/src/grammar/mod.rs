//! Recursive-descent grammar for the deftype DSL.
//!
//! The grammar consumes tokens from the [`Lexer`] with one token of
//! lookahead and builds the [`AbstractSyntaxTree`] directly. Every failure
//! names the production that was being parsed and the position of the
//! offending token, which is also the furthest position the parser reached.
//! There is no recovery: the first error aborts the parse.
//!
//! The flow is: Source → `Lexer` → `Parser` → `AbstractSyntaxTree`
//!
//! # Module Structure
//!
//! - `type_ref` - Type references in property position
//! - `declaration` - Namespaces, declarations, and conventions

mod declaration;
mod type_ref;

#[cfg(test)]
mod tests;

use std::fmt;

use deftype_foundation::{Error, ErrorKind, Result};
use tracing::debug;

use crate::ast::{AbstractSyntaxTree, TypeDecl};
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};
use crate::types::TypeRef;

/// Words that never name a type or a declaration.
pub const RESERVED_WORDS: &[&str] = &[
    "namespace",
    "defvaluetype",
    "defcommand",
    "defdomainevent",
    "defdto",
    "defenum",
    "defapplicationservice",
    "defconventions",
    "inherit",
    "abstract",
    "class",
    "enum",
    "false",
    "interface",
    "new",
    "null",
    "object",
    "private",
    "public",
    "sealed",
    "struct",
    "true",
    "void",
];

/// Returns true if `word` is reserved.
#[must_use]
pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

/// Grammar productions, named in parse errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Production {
    /// The whole source.
    CompilationUnit,
    /// `(defconventions ...)`
    Conventions,
    /// `:domainevents { inherit [...] }`
    ConventionGroup,
    /// `(namespace ...)`
    Namespace,
    /// Any declaration inside a namespace.
    TypeDeclaration,
    /// `(defvaluetype ...)`
    ValueType,
    /// `(defcommand ...)`
    Command,
    /// `(defdomainevent ...)`
    DomainEvent,
    /// `(defdto ...)`
    Dto,
    /// `(defenum ...)`
    Enum,
    /// `(defapplicationservice ...)`
    ApplicationService,
    /// `(Type Name, ...)`
    PropertyList,
    /// A type reference.
    TypeRef,
    /// `[]` after a type.
    ArrayRank,
    /// A dot-qualified type or namespace name.
    QualifiedName,
    /// A simple identifier.
    Identifier,
}

impl Production {
    /// Returns the human-readable production name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CompilationUnit => "compilation unit",
            Self::Conventions => "conventions declaration",
            Self::ConventionGroup => "convention group",
            Self::Namespace => "namespace",
            Self::TypeDeclaration => "type declaration",
            Self::ValueType => "value type declaration",
            Self::Command => "command declaration",
            Self::DomainEvent => "domain event declaration",
            Self::Dto => "dto declaration",
            Self::Enum => "enum declaration",
            Self::ApplicationService => "application service declaration",
            Self::PropertyList => "property list",
            Self::TypeRef => "type reference",
            Self::ArrayRank => "array rank specifier",
            Self::QualifiedName => "qualified name",
            Self::Identifier => "identifier",
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parser for deftype source code.
pub struct Parser<'src> {
    /// The lexer providing tokens.
    lexer: Lexer<'src>,
    /// Current token (lookahead), never trivia.
    current: Token,
    /// Source text (for error messages).
    source: &'src str,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let mut current = lexer.next_token();
        while current.kind.is_trivia() {
            current = lexer.next_token();
        }
        Self {
            lexer,
            current,
            source,
        }
    }

    /// Parses the whole source as a compilation unit.
    ///
    /// # Errors
    /// Returns a parse error if the source is malformed or has trailing input.
    pub fn parse_compilation_unit(&mut self) -> Result<AbstractSyntaxTree> {
        let mut ast = AbstractSyntaxTree::default();

        while self.current.kind == TokenKind::LParen {
            let open = self.current.span;
            self.advance();
            match self.current.as_ident() {
                Some("defconventions") if ast.conventions.is_none() && ast.namespaces.is_empty() => {
                    ast.conventions = Some(self.parse_conventions_body(open)?);
                }
                Some("defconventions") => {
                    return Err(self.error(
                        Production::CompilationUnit,
                        "defconventions must be the first form and may appear only once",
                    ));
                }
                Some("namespace") => ast.namespaces.push(self.parse_namespace_body(open)?),
                _ => return Err(self.unexpected(Production::Namespace, "'namespace'")),
            }
        }

        self.expect_end(Production::CompilationUnit)?;
        debug!(
            namespaces = ast.namespaces.len(),
            conventions = ast.conventions.is_some(),
            "parsed compilation unit"
        );
        Ok(ast)
    }

    /// Parses exactly one type declaration spanning the whole source.
    ///
    /// # Errors
    /// Returns a parse error if the source is not a single declaration.
    pub fn parse_single_declaration(&mut self) -> Result<TypeDecl> {
        let decl = self.parse_type_declaration()?;
        self.expect_end(Production::TypeDeclaration)?;
        Ok(decl)
    }

    /// Parses exactly one type reference spanning the whole source.
    ///
    /// # Errors
    /// Returns a parse error if the source is not a single type reference.
    pub fn parse_single_type_ref(&mut self) -> Result<TypeRef> {
        let ty = self.parse_type_ref()?;
        self.expect_end(Production::TypeRef)?;
        Ok(ty)
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    /// Advances to the next non-trivia token.
    fn advance(&mut self) {
        self.current = self.lexer.next_token();
        while self.current.kind.is_trivia() {
            self.current = self.lexer.next_token();
        }
    }

    /// Returns true if the current token is of the given kind.
    fn at(&self, kind: &TokenKind) -> bool {
        &self.current.kind == kind
    }

    /// Expects a punctuation token, then advances.
    fn expect(&mut self, expected: &TokenKind, production: Production) -> Result<Span> {
        if self.at(expected) {
            let span = self.current.span;
            self.advance();
            Ok(span)
        } else {
            Err(self.unexpected(production, expected.name()))
        }
    }

    /// Expects the exact symbol `symbol` (case-sensitive), then advances.
    fn expect_symbol(&mut self, symbol: &str, production: Production) -> Result<Span> {
        if self.current.is_ident(symbol) {
            let span = self.current.span;
            self.advance();
            Ok(span)
        } else {
            Err(self.unexpected(production, &format!("'{symbol}'")))
        }
    }

    /// Expects a possibly qualified, non-reserved name.
    fn expect_qualified_name(&mut self, production: Production) -> Result<(String, Span)> {
        let Some(name) = self.current.as_ident() else {
            return Err(self.unexpected(production, "a name"));
        };
        if is_reserved(name) {
            return Err(self.error(
                production,
                &format!("reserved word '{name}' cannot be used as a name"),
            ));
        }
        let result = (name.to_string(), self.current.span);
        self.advance();
        Ok(result)
    }

    /// Expects a simple (undotted) identifier.
    fn expect_identifier(&mut self, production: Production) -> Result<(String, Span)> {
        match self.current.as_ident() {
            Some(name) if name.contains('.') => Err(self.error(
                production,
                &format!("'{name}' must be a simple identifier"),
            )),
            Some(name) => {
                let result = (name.to_string(), self.current.span);
                self.advance();
                Ok(result)
            }
            None => Err(self.unexpected(production, "an identifier")),
        }
    }

    /// Expects the end of input.
    fn expect_end(&self, production: Production) -> Result<()> {
        if self.at(&TokenKind::Eof) {
            Ok(())
        } else {
            Err(self.unexpected(production, "end of input"))
        }
    }

    // =========================================================================
    // Errors
    // =========================================================================

    /// Creates an "expected X, found Y" error at the current token.
    fn unexpected(&self, production: Production, expected: &str) -> Error {
        let message = match &self.current.kind {
            TokenKind::Error(msg) => msg.clone(),
            TokenKind::Ident(name) => format!("expected {expected}, found '{name}'"),
            TokenKind::Keyword(name) => format!("expected {expected}, found ':{name}'"),
            other => format!("expected {expected}, found {}", other.name()),
        };
        self.error(production, &message)
    }

    /// Creates a parse error at the current position.
    fn error(&self, production: Production, message: &str) -> Error {
        self.error_at(self.current.span, production, message)
    }

    /// Creates a parse error at a specific span.
    fn error_at(&self, span: Span, production: Production, message: &str) -> Error {
        Error::new(ErrorKind::ParseError {
            production: production.name().to_string(),
            message: message.to_string(),
            offset: span.start,
            line: span.line,
            column: span.column,
            context: span.line_text(self.source).to_string(),
        })
    }
}

/// Parses a whole compilation unit.
///
/// # Errors
/// Returns a parse error if the source cannot be parsed.
pub fn parse(source: &str) -> Result<AbstractSyntaxTree> {
    Parser::new(source).parse_compilation_unit()
}

/// Parses a single type declaration, e.g. `(defdto Info (string Name))`.
///
/// # Errors
/// Returns a parse error if the source is not exactly one declaration.
pub fn parse_declaration(source: &str) -> Result<TypeDecl> {
    Parser::new(source).parse_single_declaration()
}

/// Parses a single type reference, e.g. `int?` or `Billing.Money[]`.
///
/// # Errors
/// Returns a parse error if the source is not exactly one type reference.
pub fn parse_type_ref(source: &str) -> Result<TypeRef> {
    Parser::new(source).parse_single_type_ref()
}
