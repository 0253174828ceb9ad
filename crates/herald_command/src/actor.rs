//! Actors and the actor kind hierarchy.
//!
//! An actor is whoever issued a command line. Commands can ask for the actor
//! by marking a parameter with [`ParamAttr::Actor`](crate::argument::ParamAttr::Actor);
//! the declared type of that parameter is an actor kind, and the invoking
//! actor must be of that kind or one of its descendants.

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use herald_foundation::TypeDesc;
use parking_lot::RwLock;

/// Name of the root actor kind every actor belongs to.
pub const SENDER: &str = "Sender";
/// Name of the console actor kind.
pub const CONSOLE: &str = "Console";
/// Name of the player actor kind.
pub const PLAYER: &str = "Player";

/// Whoever issued a command.
pub trait Actor: Send + Sync {
    /// Display name.
    fn name(&self) -> &str;

    /// The most specific kind of this actor.
    fn kind(&self) -> TypeDesc;

    /// Access to the concrete type, for command bodies that downcast.
    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to an actor.
pub type ActorHandle = Arc<dyn Actor>;

impl fmt::Debug for dyn Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.name())
    }
}

/// The actor kind hierarchy.
///
/// Kinds form a directed acyclic graph rooted at [`SENDER`]; a kind may have
/// several parents. `Console` and `Player` are registered by default.
pub struct ActorKinds {
    root: TypeDesc,
    parents: RwLock<HashMap<TypeDesc, Vec<TypeDesc>>>,
}

impl ActorKinds {
    /// Creates the default hierarchy.
    #[must_use]
    pub fn new() -> Self {
        let kinds = Self::with_root(TypeDesc::named(SENDER));
        kinds.register(TypeDesc::named(CONSOLE), &[TypeDesc::named(SENDER)]);
        kinds.register(TypeDesc::named(PLAYER), &[TypeDesc::named(SENDER)]);
        kinds
    }

    /// Creates a hierarchy containing only the given root.
    #[must_use]
    pub fn with_root(root: TypeDesc) -> Self {
        let mut parents = HashMap::new();
        parents.insert(root.clone(), Vec::new());
        Self {
            root,
            parents: RwLock::new(parents),
        }
    }

    /// Returns the root kind.
    #[must_use]
    pub const fn root(&self) -> &TypeDesc {
        &self.root
    }

    /// Registers a kind under one or more parents.
    ///
    /// Registering an existing kind adds the new parents to it. A kind with
    /// no parents hangs off the root.
    pub fn register(&self, kind: TypeDesc, parents: &[TypeDesc]) {
        let mut map = self.parents.write();
        let entry = map.entry(kind).or_default();
        if parents.is_empty() && entry.is_empty() {
            entry.push(self.root.clone());
        }
        for parent in parents {
            if !entry.contains(parent) {
                entry.push(parent.clone());
            }
        }
    }

    /// Returns true if the kind is known.
    #[must_use]
    pub fn contains(&self, kind: &TypeDesc) -> bool {
        self.parents.read().contains_key(kind)
    }

    /// Returns true if a value of kind `from` can be used where `target` is
    /// declared, i.e. `target` is `from` or one of its ancestors.
    ///
    /// Unknown kinds are only assignable to themselves.
    #[must_use]
    pub fn is_assignable(&self, target: &TypeDesc, from: &TypeDesc) -> bool {
        if target == from {
            return true;
        }
        let map = self.parents.read();
        let mut queue: VecDeque<&TypeDesc> = VecDeque::from([from]);
        let mut seen: Vec<&TypeDesc> = Vec::new();
        while let Some(kind) = queue.pop_front() {
            if kind == target {
                return true;
            }
            if seen.contains(&kind) {
                continue;
            }
            seen.push(kind);
            if let Some(parents) = map.get(kind) {
                queue.extend(parents.iter());
            }
        }
        false
    }

    /// Returns true if the kind is the root or descends from it.
    #[must_use]
    pub fn is_actor_kind(&self, kind: &TypeDesc) -> bool {
        self.is_assignable(&self.root, kind)
    }
}

impl Default for ActorKinds {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ActorKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorKinds")
            .field("root", &self.root)
            .field("kinds", &self.parents.read().len())
            .finish()
    }
}
