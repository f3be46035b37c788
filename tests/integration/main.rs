//! Cross-layer integration tests for deftype
//!
//! Tests that verify correct interaction between multiple crates.

mod pipeline;
mod robustness;
