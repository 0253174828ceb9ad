//! Core types, values, and persistent collections for Herald.
//!
//! This crate provides:
//! - [`Value`] - The value produced by parsing one command argument
//! - [`TypeDesc`] - Declared parameter types that drive strategy resolution
//! - [`Error`] - Configuration errors raised while registering commands
//! - Persistent collections ([`HVec`], [`HMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod types;
pub mod value;

pub use collections::{HMap, HVec};
pub use error::{Error, ErrorContext, ErrorKind};
pub use types::TypeDesc;
pub use value::Value;

/// Result type alias using Herald's configuration error type.
pub type Result<T> = std::result::Result<T, Error>;
