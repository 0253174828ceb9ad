//! Parameter declarations, argument descriptors and customizers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use herald_foundation::{Error, Result, TypeDesc};
use herald_parser::{
    EndPredicate, FloatConstraints, GreedyStringParser, IntConstraints, ParseResult, ParserCursor,
    Strategy, check_and_parse,
};
use parking_lot::RwLock;

/// Attribute attached to a declared parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamAttr {
    /// Inject the invoking actor.
    Actor,
    /// Inject the label the command was invoked with.
    Alias,
    /// Restrict a float argument.
    FloatArg(FloatConstraints),
    /// Restrict an integer argument.
    IntArg(IntConstraints),
    /// Let a string argument consume the rest of the line.
    Greedy,
    /// Application-defined attribute, handled by a customizer registered
    /// under `key`.
    Custom {
        /// Customizer key.
        key: Arc<str>,
        /// Free-form payload.
        value: Arc<str>,
    },
}

impl ParamAttr {
    /// Returns the key customizers and injectors are registered under.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Actor => "actor",
            Self::Alias => "alias",
            Self::FloatArg(_) => "float",
            Self::IntArg(_) => "int",
            Self::Greedy => "greedy",
            Self::Custom { key, .. } => key,
        }
    }
}

/// One declared parameter of a command method.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamDecl {
    /// Parameter name, for diagnostics only.
    pub name: Arc<str>,
    /// Declared type.
    pub ty: TypeDesc,
    /// Attributes in declaration order.
    pub attrs: Vec<ParamAttr>,
}

impl ParamDecl {
    /// Creates a parameter without attributes.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, ty: TypeDesc) -> Self {
        Self {
            name: name.into(),
            ty,
            attrs: Vec::new(),
        }
    }

    /// Creates a parameter that receives the invoking actor.
    #[must_use]
    pub fn actor(name: impl Into<Arc<str>>, kind: TypeDesc) -> Self {
        Self::new(name, kind).with_attr(ParamAttr::Actor)
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attr(mut self, attr: ParamAttr) -> Self {
        self.attrs.push(attr);
        self
    }

    /// Returns true if an attribute with the given key is present.
    #[must_use]
    pub fn has_attr(&self, key: &str) -> bool {
        self.attrs.iter().any(|attr| attr.key() == key)
    }
}

/// A resolved, parse-and-consume unit for one positional parameter.
#[derive(Clone)]
pub struct Argument {
    ty: TypeDesc,
    strategy: Strategy,
    end: EndPredicate,
}

impl Argument {
    /// Returns the declared type.
    #[must_use]
    pub const fn ty(&self) -> &TypeDesc {
        &self.ty
    }

    /// Returns the strategy.
    #[must_use]
    pub const fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Returns the end predicate.
    #[must_use]
    pub const fn end(&self) -> &EndPredicate {
        &self.end
    }

    /// Parses this argument at the cursor.
    ///
    /// # Errors
    ///
    /// Returns the strategy's failure; the cursor is left where it was.
    pub fn parse(&self, cursor: &mut ParserCursor<'_>) -> ParseResult {
        check_and_parse(self.strategy.as_ref(), cursor, &self.end)
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argument")
            .field("ty", &self.ty)
            .field("end", &self.end)
            .finish_non_exhaustive()
    }
}

/// Builds an [`Argument`]; customizers adjust it before it is finalized.
pub struct ArgumentBuilder {
    ty: TypeDesc,
    strategy: Option<Strategy>,
    end: Option<EndPredicate>,
}

impl ArgumentBuilder {
    /// Creates a builder for a declared type.
    #[must_use]
    pub const fn new(ty: TypeDesc) -> Self {
        Self {
            ty,
            strategy: None,
            end: None,
        }
    }

    /// Sets the strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Sets the end predicate.
    #[must_use]
    pub fn with_end(mut self, end: EndPredicate) -> Self {
        self.end = Some(end);
        self
    }

    /// Replaces the strategy.
    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = Some(strategy);
    }

    /// Replaces the end predicate.
    pub fn set_end(&mut self, end: EndPredicate) {
        self.end = Some(end);
    }

    /// Returns the declared type.
    #[must_use]
    pub const fn ty(&self) -> &TypeDesc {
        &self.ty
    }

    /// Returns the current strategy, if any.
    #[must_use]
    pub const fn strategy(&self) -> Option<&Strategy> {
        self.strategy.as_ref()
    }

    /// Finalizes the argument.
    ///
    /// Without an explicit end predicate the strategy's hint is used, and
    /// whitespace otherwise.
    ///
    /// # Errors
    ///
    /// Returns `MissingParser` if no strategy was set.
    pub fn build(self) -> Result<Argument> {
        let strategy = self
            .strategy
            .ok_or_else(|| Error::missing_parser(self.ty.clone()))?;
        let end = self
            .end
            .or_else(|| strategy.end_hint())
            .unwrap_or_default();
        Ok(Argument {
            ty: self.ty,
            strategy,
            end,
        })
    }
}

/// Adjusts an argument according to one parameter attribute.
pub trait Customizer: Send + Sync {
    /// Applies the attribute.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the attribute doesn't fit the
    /// parameter.
    fn apply(&self, builder: &mut ArgumentBuilder, attr: &ParamAttr, param: &ParamDecl) -> Result<()>;
}

impl<F> Customizer for F
where
    F: Fn(&mut ArgumentBuilder, &ParamAttr, &ParamDecl) -> Result<()> + Send + Sync,
{
    fn apply(&self, builder: &mut ArgumentBuilder, attr: &ParamAttr, param: &ParamDecl) -> Result<()> {
        self(builder, attr, param)
    }
}

fn float_customizer(builder: &mut ArgumentBuilder, attr: &ParamAttr, param: &ParamDecl) -> Result<()> {
    let ParamAttr::FloatArg(constraints) = attr else {
        return Ok(());
    };
    if !holds_floats(&param.ty) {
        return Err(Error::invalid_attribute(
            attr.key(),
            format!("applies to float parameters, not {}", param.ty),
        ));
    }
    let Some(inner) = builder.strategy() else {
        return Err(Error::missing_parser(param.ty.clone()));
    };
    // The attribute's checks replace the default ones; the parsing itself stays.
    let base = inner
        .without_float_checks()
        .unwrap_or_else(|| Arc::clone(inner));
    builder.set_strategy(constraints.clone().apply(base));
    Ok(())
}

/// `float`, arrays of it, and single-argument containers of it.
fn holds_floats(ty: &TypeDesc) -> bool {
    match ty {
        TypeDesc::Float => true,
        TypeDesc::Array(element) => holds_floats(element),
        TypeDesc::Generic { args, .. } => {
            matches!(args.as_slice(), [arg] if arg.unwrap_wildcard().is_some_and(holds_floats))
        }
        _ => false,
    }
}

fn int_customizer(builder: &mut ArgumentBuilder, attr: &ParamAttr, param: &ParamDecl) -> Result<()> {
    let ParamAttr::IntArg(constraints) = attr else {
        return Ok(());
    };
    let Some(inner) = builder.strategy().cloned() else {
        return Err(Error::missing_parser(param.ty.clone()));
    };
    builder.set_strategy(constraints.clone().apply(inner));
    Ok(())
}

fn greedy_customizer(builder: &mut ArgumentBuilder, attr: &ParamAttr, param: &ParamDecl) -> Result<()> {
    if param.ty != TypeDesc::Str {
        return Err(Error::invalid_attribute(
            attr.key(),
            format!("applies to string parameters, not {}", param.ty),
        ));
    }
    builder.set_strategy(Arc::new(GreedyStringParser));
    builder.set_end(EndPredicate::never());
    Ok(())
}

/// Customizers keyed by attribute key.
///
/// Attributes without a registered customizer are ignored, so attributes
/// meant for other consumers (injectors, documentation) pass through.
pub struct Customizers {
    by_key: RwLock<HashMap<Arc<str>, Arc<dyn Customizer>>>,
}

impl Customizers {
    /// Creates a table with the built-in `float`, `int` and `greedy`
    /// customizers.
    #[must_use]
    pub fn new() -> Self {
        let customizers = Self::empty();
        customizers.register("float", float_customizer);
        customizers.register("int", int_customizer);
        customizers.register("greedy", greedy_customizer);
        customizers
    }

    /// Creates an empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            by_key: RwLock::new(HashMap::new()),
        }
    }

    /// Registers (or replaces) the customizer for a key.
    pub fn register(&self, key: impl Into<Arc<str>>, customizer: impl Customizer + 'static) {
        self.by_key.write().insert(key.into(), Arc::new(customizer));
    }

    /// Returns the customizer for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<dyn Customizer>> {
        self.by_key.read().get(key).cloned()
    }

    /// Applies the customizers for each of the parameter's attributes, in
    /// attribute order.
    ///
    /// # Errors
    ///
    /// Returns the first customizer error.
    pub fn apply_all(&self, builder: &mut ArgumentBuilder, param: &ParamDecl) -> Result<()> {
        for attr in &param.attrs {
            if let Some(customizer) = self.get(attr.key()) {
                customizer.apply(builder, attr, param)?;
            }
        }
        Ok(())
    }
}

impl Default for Customizers {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Customizers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.by_key.read().keys().cloned().collect();
        keys.sort();
        f.debug_struct("Customizers").field("keys", &keys).finish()
    }
}
