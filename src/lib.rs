//! deftype - Compiler for a parenthesized type-declaration DSL
//!
//! This crate re-exports all layers of the deftype compiler for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: deftype_codegen    - Declaration tree, generator, evaluator, pipeline
//! Layer 2: deftype_semantic   - Known types, conventions, semantic model
//! Layer 1: deftype_language   - Lexer, parser, AST, defaults, pretty-printer
//! Layer 0: deftype_foundation - Errors and compiler configuration
//! ```
//!
//! # Example
//!
//! ```
//! let output = deftype::compile("(namespace Test (defvaluetype EmployeeNumber int))").unwrap();
//! assert_eq!(output.root_namespaces(), vec!["Test"]);
//! ```

pub use deftype_codegen as codegen;
pub use deftype_foundation as foundation;
pub use deftype_language as language;
pub use deftype_semantic as semantic;

pub use deftype_codegen::{CompilationOutput, Compiler, compile};
pub use deftype_foundation::{CompilerConfig, Error, ErrorKind, Result};
