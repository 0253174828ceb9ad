//! Integration tests for Layer 1: Parser
//!
//! Tests for strategy resolution and the strategies it produces:
//! - Resolution order, caching and determinism
//! - Scalar, array, container and map parsing

mod resolution;
