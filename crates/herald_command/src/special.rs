//! Special arguments: parameters supplied from the invocation context.
//!
//! At discovery time every declared parameter is offered to the injectors in
//! priority order; the first one that claims it records the slot in the
//! command's [`SpecialArgumentTable`]. At invocation the table fills those
//! slots before the parsed values are merged around them.

use std::fmt;
use std::sync::Arc;

use herald_foundation::{Error, ErrorContext, ErrorKind, Result, TypeDesc, Value};
use parking_lot::RwLock;
use thiserror::Error;

use crate::actor::{ActorHandle, ActorKinds};
use crate::argument::{ParamAttr, ParamDecl};
use crate::pipeline::CallArg;

/// What an injector sees when it fills a slot.
#[derive(Clone, Copy)]
pub struct InjectionContext<'a> {
    /// The invoking actor.
    pub actor: &'a ActorHandle,
    /// Primary name of the command.
    pub command: &'a str,
    /// Label the command was invoked with.
    pub alias: &'a str,
    /// Actor kind hierarchy.
    pub kinds: &'a ActorKinds,
}

/// The invoking context can't satisfy a special slot.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("slot {slot} expects {expected}, but {actual} was supplied")]
pub struct InjectionMismatch {
    /// Declaration index of the slot.
    pub slot: usize,
    /// The declared capability.
    pub expected: TypeDesc,
    /// What the context actually had.
    pub actual: TypeDesc,
}

/// Supplies one kind of context value.
pub trait SlotInjector: Send + Sync {
    /// Short name, used in diagnostics and duplicate checks.
    fn name(&self) -> &str;

    /// Decides at discovery time whether this injector owns the parameter.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the parameter is marked for this
    /// injector but its declared type can't receive the injected value.
    fn claims(&self, param: &ParamDecl, kinds: &ActorKinds) -> Result<bool>;

    /// Whether a command may have at most one slot of this kind.
    fn single_slot(&self) -> bool {
        true
    }

    /// Produces the value for a slot.
    ///
    /// # Errors
    ///
    /// Returns an [`InjectionMismatch`] if the context can't satisfy the
    /// declared type.
    fn provide(
        &self,
        slot: usize,
        declared: &TypeDesc,
        ctx: &InjectionContext<'_>,
    ) -> std::result::Result<CallArg, InjectionMismatch>;
}

/// Injects the invoking actor into parameters marked [`ParamAttr::Actor`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ActorInjector;

impl SlotInjector for ActorInjector {
    fn name(&self) -> &str {
        "actor"
    }

    fn claims(&self, param: &ParamDecl, kinds: &ActorKinds) -> Result<bool> {
        if !param.attrs.contains(&ParamAttr::Actor) {
            return Ok(false);
        }
        if !kinds.is_actor_kind(&param.ty) {
            return Err(Error::invalid_special_argument(
                param.ty.clone(),
                kinds.root().clone(),
            ));
        }
        Ok(true)
    }

    fn provide(
        &self,
        slot: usize,
        declared: &TypeDesc,
        ctx: &InjectionContext<'_>,
    ) -> std::result::Result<CallArg, InjectionMismatch> {
        let actual = ctx.actor.kind();
        if ctx.kinds.is_assignable(declared, &actual) {
            Ok(CallArg::Actor(Arc::clone(ctx.actor)))
        } else {
            Err(InjectionMismatch {
                slot,
                expected: declared.clone(),
                actual,
            })
        }
    }
}

/// Injects the invoked label into string parameters marked [`ParamAttr::Alias`].
#[derive(Clone, Copy, Debug, Default)]
pub struct AliasInjector;

impl SlotInjector for AliasInjector {
    fn name(&self) -> &str {
        "alias"
    }

    fn claims(&self, param: &ParamDecl, _kinds: &ActorKinds) -> Result<bool> {
        if !param.attrs.contains(&ParamAttr::Alias) {
            return Ok(false);
        }
        if param.ty != TypeDesc::Str {
            return Err(Error::invalid_special_argument(
                param.ty.clone(),
                TypeDesc::Str,
            ));
        }
        Ok(true)
    }

    fn single_slot(&self) -> bool {
        false
    }

    fn provide(
        &self,
        _slot: usize,
        _declared: &TypeDesc,
        ctx: &InjectionContext<'_>,
    ) -> std::result::Result<CallArg, InjectionMismatch> {
        Ok(CallArg::Value(Value::from(ctx.alias)))
    }
}

/// Priority-ordered injector list.
pub struct Injectors {
    list: RwLock<Vec<Arc<dyn SlotInjector>>>,
}

impl Injectors {
    /// Creates the default list: actor, then alias.
    #[must_use]
    pub fn new() -> Self {
        Self {
            list: RwLock::new(vec![Arc::new(ActorInjector), Arc::new(AliasInjector)]),
        }
    }

    /// Creates an empty list.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            list: RwLock::new(Vec::new()),
        }
    }

    /// Adds an injector ahead of every existing one.
    pub fn prepend(&self, injector: impl SlotInjector + 'static) {
        self.list.write().insert(0, Arc::new(injector));
    }

    /// Adds an injector after every existing one.
    pub fn push(&self, injector: impl SlotInjector + 'static) {
        self.list.write().push(Arc::new(injector));
    }

    /// Returns the number of injectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.read().len()
    }

    /// Returns true if there are no injectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.read().is_empty()
    }

    fn snapshot(&self) -> Vec<Arc<dyn SlotInjector>> {
        self.list.read().clone()
    }
}

impl Default for Injectors {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Injectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .list
            .read()
            .iter()
            .map(|injector| injector.name().to_string())
            .collect();
        f.debug_struct("Injectors").field("order", &names).finish()
    }
}

/// One context-supplied slot.
#[derive(Clone)]
pub struct SpecialSlot {
    /// Declaration index.
    pub index: usize,
    /// Declared type of the parameter.
    pub declared: TypeDesc,
    injector: Arc<dyn SlotInjector>,
}

impl SpecialSlot {
    /// Name of the injector that owns this slot.
    #[must_use]
    pub fn injector(&self) -> &str {
        self.injector.name()
    }
}

impl fmt::Debug for SpecialSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} <- {}", self.index, self.declared, self.injector.name())
    }
}

/// Per-command table of context-supplied slots, ordered by index.
#[derive(Clone, Debug, Default)]
pub struct SpecialArgumentTable {
    slots: Vec<SpecialSlot>,
}

impl SpecialArgumentTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table for a parameter list.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSpecialArgument` when a marked parameter can't receive
    /// the injected value, and `DuplicateSpecialArgument` when a single-slot
    /// injector claims two parameters. The error context carries the
    /// parameter index.
    pub fn build(params: &[ParamDecl], injectors: &Injectors, kinds: &ActorKinds) -> Result<Self> {
        let injectors = injectors.snapshot();
        let mut table = Self::new();

        for (index, param) in params.iter().enumerate() {
            let located = move |err: Error| err.with_context(ErrorContext::new().with_parameter(index));
            let mut owner = None;
            for injector in &injectors {
                if injector.claims(param, kinds).map_err(located)? {
                    owner = Some(Arc::clone(injector));
                    break;
                }
            }
            let Some(injector) = owner else {
                continue;
            };

            if injector.single_slot() && table.slots.iter().any(|s| s.injector() == injector.name())
            {
                return Err(located(Error::new(ErrorKind::DuplicateSpecialArgument(
                    injector.name().to_string(),
                ))));
            }
            table.slots.push(SpecialSlot {
                index,
                declared: param.ty.clone(),
                injector,
            });
        }
        Ok(table)
    }

    /// Marks a slot by hand, for commands assembled without discovery.
    #[must_use]
    pub fn with_slot(
        mut self,
        index: usize,
        declared: TypeDesc,
        injector: impl SlotInjector + 'static,
    ) -> Self {
        self.slots.retain(|slot| slot.index != index);
        self.slots.push(SpecialSlot {
            index,
            declared,
            injector: Arc::new(injector),
        });
        self.slots.sort_by_key(|slot| slot.index);
        self
    }

    /// Returns true if the slot is context-supplied.
    #[must_use]
    pub fn is_special(&self, index: usize) -> bool {
        self.slots.iter().any(|slot| slot.index == index)
    }

    /// Returns the slots in index order.
    #[must_use]
    pub fn slots(&self) -> &[SpecialSlot] {
        &self.slots
    }

    /// Returns the number of special slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no slot is special.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Fills the special slots of `out`.
    ///
    /// # Errors
    ///
    /// Returns the first slot whose declared type the context can't satisfy;
    /// `out` must then be discarded.
    pub fn provide(
        &self,
        out: &mut [Option<CallArg>],
        ctx: &InjectionContext<'_>,
    ) -> std::result::Result<(), InjectionMismatch> {
        for slot in &self.slots {
            let value = slot.injector.provide(slot.index, &slot.declared, ctx)?;
            if let Some(target) = out.get_mut(slot.index) {
                *target = Some(value);
            }
        }
        Ok(())
    }
}
