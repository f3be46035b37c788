//! Integration tests for Layer 3: Code generation
//!
//! Tests for the declaration tree shape and the behavior of generated
//! members under the reference evaluator.

mod equality;
mod shape;
