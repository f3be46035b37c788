//! Integration tests for Layer 2: Semantic analysis
//!
//! Tests for known-type harvesting, conventions, and type resolution.

mod conventions;
mod known_types;
mod resolution;
