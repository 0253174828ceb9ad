//! Declared parameter types.
//!
//! A [`TypeDesc`] is what a command author writes down for each parameter.
//! Strategy resolution is driven entirely by these descriptors, so they carry
//! enough structure to express arrays, parameterized containers and
//! upper-bounded wildcards.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Declared type of a command parameter.
///
/// Equality and hashing are exact: `Collection<? extends float>` and
/// `Collection<float>` are distinct descriptors even though they resolve to
/// the same kind of strategy.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeDesc {
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// Boolean.
    Bool,
    /// Text.
    Str,
    /// An application-defined type referenced by name (actor kinds, domain types).
    Named(Arc<str>),
    /// Array of the element type.
    Array(Box<TypeDesc>),
    /// Parameterized container such as `Collection<float>` or `Map<Str, Int>`.
    Generic {
        /// Container name.
        container: Arc<str>,
        /// Type arguments in declaration order.
        args: Vec<TypeDesc>,
    },
    /// Wildcard type argument, optionally upper-bounded (`? extends T`).
    Wildcard {
        /// Upper bound, if any.
        upper: Option<Box<TypeDesc>>,
    },
}

impl TypeDesc {
    /// Creates a named application type.
    #[must_use]
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::Named(name.into())
    }

    /// Creates an array type with the given element type.
    #[must_use]
    pub fn array(element: TypeDesc) -> Self {
        Self::Array(Box::new(element))
    }

    /// Creates a parameterized container type.
    #[must_use]
    pub fn generic(container: impl Into<Arc<str>>, args: Vec<TypeDesc>) -> Self {
        Self::Generic {
            container: container.into(),
            args,
        }
    }

    /// Creates a single-argument `Collection<T>` type.
    #[must_use]
    pub fn collection(element: TypeDesc) -> Self {
        Self::generic("Collection", vec![element])
    }

    /// Creates a `Map<K, V>` type.
    #[must_use]
    pub fn map(key: TypeDesc, value: TypeDesc) -> Self {
        Self::generic("Map", vec![key, value])
    }

    /// Creates an upper-bounded wildcard (`? extends T`).
    #[must_use]
    pub fn extends(upper: TypeDesc) -> Self {
        Self::Wildcard {
            upper: Some(Box::new(upper)),
        }
    }

    /// Creates an unbounded wildcard (`?`).
    #[must_use]
    pub const fn wildcard() -> Self {
        Self::Wildcard { upper: None }
    }

    /// Returns true for the scalar types `Int`, `Float`, `Bool` and `Str`.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Self::Int | Self::Float | Self::Bool | Self::Str)
    }

    /// Returns the element type if this is an array.
    #[must_use]
    pub fn array_element(&self) -> Option<&TypeDesc> {
        match self {
            Self::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the type arguments if this is a parameterized container.
    #[must_use]
    pub fn type_args(&self) -> Option<&[TypeDesc]> {
        match self {
            Self::Generic { args, .. } => Some(args),
            _ => None,
        }
    }

    /// Returns the name if this is a named type.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Unwraps one level of upper-bounded wildcard.
    ///
    /// `? extends T` yields `T`, a bare `?` yields `None`, any other type is
    /// returned unchanged. The bound itself is not unwrapped again, so
    /// `? extends ? extends T` yields the inner wildcard.
    #[must_use]
    pub fn unwrap_wildcard(&self) -> Option<&TypeDesc> {
        match self {
            Self::Wildcard { upper } => upper.as_deref(),
            other => Some(other),
        }
    }
}

impl fmt::Debug for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Bool => write!(f, "bool"),
            Self::Str => write!(f, "string"),
            Self::Named(name) => write!(f, "{name}"),
            Self::Array(element) => write!(f, "{element}[]"),
            Self::Generic { container, args } => {
                write!(f, "{container}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ">")
            }
            Self::Wildcard { upper: Some(upper) } => write!(f, "? extends {upper}"),
            Self::Wildcard { upper: None } => write!(f, "?"),
        }
    }
}
