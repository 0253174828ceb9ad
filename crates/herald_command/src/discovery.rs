//! Command discovery on holder objects.
//!
//! A holder lists its methods as [`CommandMethod`] values: a name, an
//! optional command marker, the declared parameters and a body. Discovery
//! turns every marked method into a [`RegisteredCommand`]; the body is bound
//! to the holder instance exactly once, here.

use std::fmt;
use std::sync::Arc;

use herald_foundation::{Error, ErrorContext, Result};
use herald_parser::{ParamSite, ParserRegistry};

use crate::actor::ActorKinds;
use crate::argument::{ArgumentBuilder, Customizers, ParamDecl};
use crate::builder::{CallContext, CommandBuilder, CommandResult, RegisteredCommand};
use crate::special::{Injectors, SpecialArgumentTable};

/// A method body that needs the holder instance.
pub type BoundBody<H> = Arc<dyn Fn(&H, &CallContext<'_>) -> CommandResult + Send + Sync>;

/// A method body that ignores the holder.
pub type StaticBody = Arc<dyn Fn(&CallContext<'_>) -> CommandResult + Send + Sync>;

/// The body of a declared method.
pub enum MethodBody<H> {
    /// Bound to the holder instance.
    Bound(BoundBody<H>),
    /// Not bound to any instance; can't be registered as a command.
    Static(StaticBody),
    /// No body was provided.
    Missing,
}

impl<H> Clone for MethodBody<H> {
    fn clone(&self) -> Self {
        match self {
            Self::Bound(body) => Self::Bound(Arc::clone(body)),
            Self::Static(body) => Self::Static(Arc::clone(body)),
            Self::Missing => Self::Missing,
        }
    }
}

/// Marks a method as a command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandAttr {
    /// Explicit name; the method name is used when absent or empty.
    pub name: Option<Arc<str>>,
    /// Aliases.
    pub aliases: Vec<Arc<str>>,
}

/// One method declared by a holder.
pub struct CommandMethod<H> {
    /// Method name.
    pub name: Arc<str>,
    /// Command marker; unmarked methods are skipped by discovery.
    pub command: Option<CommandAttr>,
    /// Declared parameters in order.
    pub params: Vec<ParamDecl>,
    /// Body.
    pub body: MethodBody<H>,
}

impl<H> CommandMethod<H> {
    /// Creates an unmarked method with no parameters and no body.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            command: None,
            params: Vec::new(),
            body: MethodBody::Missing,
        }
    }

    /// Marks the method as a command named after the method.
    #[must_use]
    pub fn command(mut self) -> Self {
        self.command.get_or_insert_with(CommandAttr::default);
        self
    }

    /// Marks the method as a command with an explicit name.
    #[must_use]
    pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
        self.command.get_or_insert_with(CommandAttr::default).name = Some(name.into());
        self
    }

    /// Marks the method as a command and adds an alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<Arc<str>>) -> Self {
        self.command
            .get_or_insert_with(CommandAttr::default)
            .aliases
            .push(alias.into());
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, param: ParamDecl) -> Self {
        self.params.push(param);
        self
    }

    /// Sets a body bound to the holder.
    #[must_use]
    pub fn bound(
        mut self,
        body: impl Fn(&H, &CallContext<'_>) -> CommandResult + Send + Sync + 'static,
    ) -> Self {
        self.body = MethodBody::Bound(Arc::new(body));
        self
    }

    /// Sets a body that is not bound to the holder.
    #[must_use]
    pub fn unbound(
        mut self,
        body: impl Fn(&CallContext<'_>) -> CommandResult + Send + Sync + 'static,
    ) -> Self {
        self.body = MethodBody::Static(Arc::new(body));
        self
    }

    /// Returns the command name this method registers under, if it is marked.
    #[must_use]
    pub fn command_name(&self) -> Option<&str> {
        let attr = self.command.as_ref()?;
        Some(
            attr.name
                .as_deref()
                .filter(|name| !name.is_empty())
                .unwrap_or(&self.name),
        )
    }
}

impl<H> fmt::Debug for CommandMethod<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandMethod")
            .field("name", &self.name)
            .field("command", &self.command)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// An object that declares command methods.
pub trait CommandHolder: Send + Sync + Sized + 'static {
    /// Name used in diagnostics and parameter sites.
    fn holder_name(&self) -> &str;

    /// Declared methods, marked or not.
    fn methods(&self) -> Vec<CommandMethod<Self>>;
}

/// Outcome of registering one holder.
#[derive(Debug, Default)]
pub struct RegistrationReport {
    /// Names of the commands that were registered.
    pub registered: Vec<Arc<str>>,
    /// Commands that built but lost every label to earlier commands.
    pub unreachable: Vec<Arc<str>>,
    /// Methods that failed, with the configuration error.
    pub failed: Vec<(Arc<str>, Error)>,
}

impl RegistrationReport {
    /// Returns true if every marked method registered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Builds commands from holder methods.
#[derive(Clone, Copy)]
pub struct Discovery<'a> {
    /// Strategy resolution.
    pub parsers: &'a ParserRegistry,
    /// Special-argument injectors.
    pub injectors: &'a Injectors,
    /// Attribute customizers.
    pub customizers: &'a Customizers,
    /// Actor kind hierarchy.
    pub kinds: &'a ActorKinds,
}

impl Discovery<'_> {
    /// Builds every marked method of a holder.
    ///
    /// Methods are independent: a failing method doesn't stop the others.
    pub fn discover<H: CommandHolder>(
        &self,
        holder: &Arc<H>,
    ) -> Vec<(Arc<str>, Result<RegisteredCommand>)> {
        holder
            .methods()
            .into_iter()
            .filter(|method| method.command.is_some())
            .map(|method| {
                let name = Arc::clone(&method.name);
                (name, self.build_method(holder, method))
            })
            .collect()
    }

    /// Builds one method into a command.
    ///
    /// # Errors
    ///
    /// Returns a configuration error, located at the holder and method, if
    /// the method isn't marked, isn't bound, has no body, declares a special
    /// slot wrongly, or has a parameter no strategy can parse.
    pub fn build_method<H: CommandHolder>(
        &self,
        holder: &Arc<H>,
        method: CommandMethod<H>,
    ) -> Result<RegisteredCommand> {
        let holder_name = holder.holder_name().to_string();
        let located = |err: Error| {
            let mut context = err.context.clone().unwrap_or_default();
            context.holder = Some(holder_name.clone());
            context.method = Some(method.name.to_string());
            err.with_context(context)
        };

        let Some(command_name) = method.command_name().map(Arc::<str>::from) else {
            return Err(located(Error::invalid_attribute(
                "command",
                "method is not marked as a command",
            )));
        };

        let body = match &method.body {
            MethodBody::Bound(body) => Arc::clone(body),
            MethodBody::Static(_) => {
                return Err(located(Error::unbound_method(method.name.as_ref())));
            }
            MethodBody::Missing => return Err(located(Error::missing_executor(command_name.as_ref()))),
        };

        let special =
            SpecialArgumentTable::build(&method.params, self.injectors, self.kinds).map_err(&located)?;

        let mut builder = CommandBuilder::new(Arc::clone(&command_name));
        if let Some(attr) = &method.command {
            builder = builder.with_aliases(attr.aliases.iter().cloned());
        }

        for (index, param) in method.params.iter().enumerate() {
            if special.is_special(index) {
                continue;
            }
            let at_param = |err: Error| {
                located(err.with_context(ErrorContext::new().with_parameter(index)))
            };
            let site = ParamSite::new(holder_name.as_str(), Arc::clone(&method.name), index);
            let strategy = self.parsers.require_site(&site, &param.ty).map_err(at_param)?;
            let mut argument = ArgumentBuilder::new(param.ty.clone()).with_strategy(strategy);
            self.customizers
                .apply_all(&mut argument, param)
                .map_err(at_param)?;
            builder = builder.with_argument(argument.build().map_err(at_param)?);
        }

        let instance = Arc::clone(holder);
        let command = builder
            .with_special(special)
            .with_executor(move |ctx| body(&instance, ctx))
            .build()
            .map_err(&located)?;

        tracing::debug!(
            holder = %holder_name,
            method = %method.name,
            command = %command.name(),
            arguments = command.arguments().len(),
            special = command.special().len(),
            "discovered command"
        );
        Ok(command)
    }
}

impl fmt::Debug for Discovery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Discovery").finish_non_exhaustive()
    }
}
