//! Lexer, parser, and syntax tree for the deftype DSL.
//!
//! This crate provides:
//! - `Lexer` - Tokenization of deftype source
//! - `parse` - Parsing source into an [`AbstractSyntaxTree`]
//! - `apply_defaults` - Normalizing shorthand value types
//! - `pretty` - Printing a tree back to canonical source

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod defaults;
pub mod grammar;
pub mod lexer;
pub mod names;
pub mod pretty;
pub mod span;
pub mod token;
pub mod types;


pub use ast::{
    AbstractSyntaxTree, ApplicationServiceDecl, BaseTypes, CommandDecl, ConventionsDecl, DeclKind,
    DomainEventDecl, DtoDecl, EnumDecl, Namespace, PropertyDecl, TypeDecl, ValueTypeDecl,
};
pub use defaults::apply_defaults;
pub use grammar::{Parser, Production, is_reserved, parse, parse_declaration, parse_type_ref};
pub use lexer::Lexer;
pub use names::{NamespaceName, TypeName};
pub use span::Span;
pub use token::{Token, TokenKind};
pub use types::{Primitive, RankSpecifier, TypeRef};
