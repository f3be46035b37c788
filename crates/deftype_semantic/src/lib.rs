//! Semantic analysis for deftype.
//!
//! This crate provides:
//! - `harvest_known_types` - The symbol table of declared types
//! - `resolve_conventions` - Effective base types for commands and events
//! - `SemanticModel` - Per-compilation type resolution

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod conventions;
pub mod known_types;
pub mod model;
pub mod system_types;

pub use conventions::resolve_conventions;
pub use known_types::{KnownType, KnownTypeTable, harvest_known_types};
pub use model::{Resolution, ResolvedType, SemanticModel};
pub use system_types::lookup_system_type;
