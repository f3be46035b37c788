//! Errors, results, and compiler configuration for deftype.
//!
//! This crate provides:
//! - [`Error`] - Rich error types with context
//! - [`Result`] - Result alias over [`Error`]
//! - [`CompilerConfig`] - Knobs controlling a compilation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;

pub use config::CompilerConfig;
pub use error::{Error, ErrorContext, ErrorKind, Result};
