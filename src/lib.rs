//! Herald - Command registration and typed argument resolution
//!
//! This crate re-exports all layers of the Herald system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: herald_runtime    - REPL, CLI, config, logging setup
//! Layer 2: herald_command    - Discovery, special arguments, dispatch
//! Layer 1: herald_parser     - Strategies, cursor, parser registry
//! Layer 0: herald_foundation - Core types (Value, TypeDesc, Error)
//! ```

pub use herald_command as command;
pub use herald_foundation as foundation;
pub use herald_parser as parser;
pub use herald_runtime as runtime;
