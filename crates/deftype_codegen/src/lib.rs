//! Declaration-tree generation for deftype.
//!
//! This crate provides:
//! - `CodeGenerator` - Value-semantics, enum, and service generation
//! - `CompilationOutput` - The target-agnostic declaration tree
//! - `compile` - The source-to-tree pipeline
//! - `Evaluator` - A reference interpreter for generated members

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod equality;
pub mod eval;
pub mod generator;
pub mod pipeline;
pub mod tree;


pub use eval::{Evaluator, Instance, Value};
pub use generator::{CodeGenerator, OBJECT_TYPE, comparison_for, field_name};
pub use pipeline::{Compiler, compile};
pub use tree::{
    Annotation, BaseType, BinaryOp, CompilationOutput, Constructor, ElementComparison, EnumValue,
    Expr, Field, GeneratedNamespace, GeneratedType, Member, Method, MethodModifier, Operator,
    OperatorKind, Parameter, Property, Stmt, TypeKind, Visibility,
};
