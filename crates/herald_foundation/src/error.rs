//! Error types for Herald.
//!
//! These are configuration errors: they are raised while commands are being
//! registered and abort the registration of the offending command. Failures
//! that happen while a command line is being dispatched are reported as
//! values by the command layer, never through this type.

use std::fmt;

use thiserror::Error;

use crate::types::TypeDesc;

/// The main error type for Herald registration.
#[derive(Debug, Error)]
#[error("{kind}{}", .context.as_ref().map(|c| format!(" ({c})")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a missing parser error.
    #[must_use]
    pub fn missing_parser(ty: TypeDesc) -> Self {
        Self::new(ErrorKind::MissingParser(ty))
    }

    /// Creates an unbound (static) command method error.
    #[must_use]
    pub fn unbound_method(method: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnboundMethod(method.into()))
    }

    /// Creates a missing executor error.
    #[must_use]
    pub fn missing_executor(command: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingExecutor(command.into()))
    }

    /// Creates an invalid special argument error.
    #[must_use]
    pub fn invalid_special_argument(declared: TypeDesc, expected: TypeDesc) -> Self {
        Self::new(ErrorKind::InvalidSpecialArgument { declared, expected })
    }

    /// Creates an alias collision error.
    #[must_use]
    pub fn alias_collision(label: impl Into<String>, existing: impl Into<String>) -> Self {
        Self::new(ErrorKind::AliasCollision {
            label: label.into(),
            existing: existing.into(),
        })
    }

    /// Creates an invalid attribute error.
    #[must_use]
    pub fn invalid_attribute(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidAttribute {
            attribute: attribute.into(),
            message: message.into(),
        })
    }

    /// Returns true if this is a configuration error.
    ///
    /// Every kind except [`ErrorKind::Internal`] is a configuration problem
    /// that the command author must fix.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        !matches!(self.kind, ErrorKind::Internal(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// No resolver produced a parsing strategy for a declared type.
    #[error("missing parser for type {0}")]
    MissingParser(TypeDesc),

    /// A command was declared on a method that is not bound to its holder.
    #[error("can't register unbound command method {0}")]
    UnboundMethod(String),

    /// A command was built without an executor.
    #[error("command {0} has no executor")]
    MissingExecutor(String),

    /// A parameter marked for injection can't receive the injected value.
    #[error("parameter of type {declared} can't receive an injected {expected}")]
    InvalidSpecialArgument {
        /// The declared parameter type.
        declared: TypeDesc,
        /// The type the injector supplies.
        expected: TypeDesc,
    },

    /// More than one parameter was marked for the same single-slot injection.
    #[error("more than one parameter is marked as {0}")]
    DuplicateSpecialArgument(String),

    /// A command label is already taken and the collision policy rejects it.
    #[error("label {label} is already registered to {existing}")]
    AliasCollision {
        /// The label that collided.
        label: String,
        /// The command that already owns it.
        existing: String,
    },

    /// A parameter attribute could not be applied.
    #[error("invalid {attribute} attribute: {message}")]
    InvalidAttribute {
        /// The attribute key.
        attribute: String,
        /// What was wrong with it.
        message: String,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Holder the method was discovered on.
    pub holder: Option<String>,
    /// Method or command name.
    pub method: Option<String>,
    /// Parameter index in declaration order.
    pub parameter: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the holder name.
    #[must_use]
    pub fn with_holder(mut self, holder: impl Into<String>) -> Self {
        self.holder = Some(holder.into());
        self
    }

    /// Sets the method name.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets the parameter index.
    #[must_use]
    pub fn with_parameter(mut self, index: usize) -> Self {
        self.parameter = Some(index);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        if let Some(holder) = &self.holder {
            write!(f, "in {holder}")?;
            wrote = true;
        }
        if let Some(method) = &self.method {
            if wrote {
                write!(f, "::")?;
            } else {
                write!(f, "in ")?;
            }
            write!(f, "{method}")?;
            wrote = true;
        }
        if let Some(index) = self.parameter {
            if wrote {
                write!(f, ", ")?;
            }
            write!(f, "parameter #{index}")?;
        }
        Ok(())
    }
}
