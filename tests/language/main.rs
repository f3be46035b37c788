//! Integration tests for Layer 1: Language
//!
//! Tests for the lexer, parser, defaulting pass, and pretty-printer.

mod defaults;
mod lexer;
mod parser;
mod pretty;
