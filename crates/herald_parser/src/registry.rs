//! Type to strategy resolution.
//!
//! The registry holds an ordered list of resolvers. Resolution walks the
//! user-registered resolvers first (the scalar defaults live there too), then
//! the built-ins in a fixed order:
//!
//! 1. primitive arrays (`int[]`, `float[]`)
//! 2. single-argument containers (`Collection<T>`, `Collection<? extends T>`)
//! 3. arrays of any resolvable element type
//! 4. `Map<K, V>`
//!
//! The first resolver that returns a strategy wins, and the result is cached
//! under the exact requested type. Parameter-site resolvers have their own
//! cache, consulted before the type-level one.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use herald_foundation::{Error, Result, TypeDesc};
use parking_lot::{Mutex, RwLock};

use crate::basic::{BoolParser, FloatConstraints, FloatParser, IntegerParser, StringParser};
use crate::collection::{ArrayParser, ArrayShape, MapParser, MapTokens};
use crate::strategy::Strategy;

/// Container name the built-in map resolver accepts.
pub const MAP_CONTAINER: &str = "Map";

/// Produces a strategy for a type, or declines with `None`.
///
/// Resolvers get the registry so compound types can resolve their element
/// types recursively.
pub trait Resolver: Send + Sync {
    /// Resolves a type.
    fn resolve(&self, ty: &TypeDesc, registry: &ParserRegistry) -> Option<Strategy>;
}

impl<F> Resolver for F
where
    F: Fn(&TypeDesc, &ParserRegistry) -> Option<Strategy> + Send + Sync,
{
    fn resolve(&self, ty: &TypeDesc, registry: &ParserRegistry) -> Option<Strategy> {
        self(ty, registry)
    }
}

/// Identifies one declared parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamSite {
    /// Holder the command was discovered on.
    pub holder: Arc<str>,
    /// Method (or command) name.
    pub method: Arc<str>,
    /// Parameter index in declaration order, special slots included.
    pub index: usize,
}

impl ParamSite {
    /// Creates a parameter site.
    #[must_use]
    pub fn new(holder: impl Into<Arc<str>>, method: impl Into<Arc<str>>, index: usize) -> Self {
        Self {
            holder: holder.into(),
            method: method.into(),
            index,
        }
    }
}

impl fmt::Display for ParamSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}#{}", self.holder, self.method, self.index)
    }
}

/// Produces a strategy for one parameter site, or declines with `None`.
pub trait SiteResolver: Send + Sync {
    /// Resolves a parameter site of the given declared type.
    fn resolve(&self, site: &ParamSite, ty: &TypeDesc, registry: &ParserRegistry)
    -> Option<Strategy>;
}

impl<F> SiteResolver for F
where
    F: Fn(&ParamSite, &TypeDesc, &ParserRegistry) -> Option<Strategy> + Send + Sync,
{
    fn resolve(
        &self,
        site: &ParamSite,
        ty: &TypeDesc,
        registry: &ParserRegistry,
    ) -> Option<Strategy> {
        self(site, ty, registry)
    }
}

type BuiltinResolver = fn(&TypeDesc, &ParserRegistry) -> Option<Strategy>;

const BUILTINS: [BuiltinResolver; 4] = [
    resolve_primitive_array,
    resolve_container,
    resolve_array,
    resolve_map,
];

fn resolve_primitive_array(ty: &TypeDesc, registry: &ParserRegistry) -> Option<Strategy> {
    let shape = match ty.array_element()? {
        TypeDesc::Int => ArrayShape::Ints,
        TypeDesc::Float => ArrayShape::Floats,
        _ => return None,
    };
    let element = registry.resolve(ty.array_element()?)?;
    Some(Arc::new(ArrayParser::new(element, shape)))
}

fn resolve_container(ty: &TypeDesc, registry: &ParserRegistry) -> Option<Strategy> {
    let [arg] = ty.type_args()? else {
        return None;
    };
    let element = registry.resolve(arg.unwrap_wildcard()?)?;
    Some(Arc::new(ArrayParser::new(element, ArrayShape::List)))
}

fn resolve_array(ty: &TypeDesc, registry: &ParserRegistry) -> Option<Strategy> {
    let element_type = ty.array_element()?;
    let element = registry.resolve(element_type)?;
    Some(Arc::new(ArrayParser::new(
        element,
        ArrayShape::Typed(element_type.clone()),
    )))
}

fn resolve_map(ty: &TypeDesc, registry: &ParserRegistry) -> Option<Strategy> {
    let TypeDesc::Generic { container, args } = ty else {
        return None;
    };
    let [key, value] = args.as_slice() else {
        return None;
    };
    if container.as_ref() != MAP_CONTAINER {
        return None;
    }
    let key = registry.resolve(key.unwrap_wildcard()?)?;
    let value = registry.resolve(value.unwrap_wildcard()?)?;
    Some(Arc::new(MapParser::new(key, value, MapTokens::default())))
}

/// Resolves declared parameter types to parsing strategies.
///
/// The registry is shared between threads. The resolver lists are guarded by
/// a mutex; resolution iterates a snapshot taken under that lock so that a
/// resolver may itself resolve element types. The caches only ever map a type
/// to a strategy a resolver produced for it, so a lost race between two
/// threads populating the same entry is harmless.
pub struct ParserRegistry {
    resolvers: Mutex<Vec<Arc<dyn Resolver>>>,
    site_resolvers: Mutex<Vec<Arc<dyn SiteResolver>>>,
    cache: RwLock<HashMap<TypeDesc, Strategy>>,
    site_cache: RwLock<HashMap<ParamSite, Strategy>>,
}

impl ParserRegistry {
    /// Creates a registry with the scalar defaults for `int`, `float`,
    /// `bool` and `string`.
    ///
    /// The default float strategy rejects infinity and NaN.
    #[must_use]
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.register_exact(TypeDesc::Int, Arc::new(IntegerParser::DECIMAL));
        registry.register_exact(
            TypeDesc::Float,
            FloatConstraints::default().apply(Arc::new(FloatParser)),
        );
        registry.register_exact(TypeDesc::Bool, Arc::new(BoolParser));
        registry.register_exact(TypeDesc::Str, Arc::new(StringParser));
        registry
    }

    /// Creates a registry with only the built-in compound resolvers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            resolvers: Mutex::new(Vec::new()),
            site_resolvers: Mutex::new(Vec::new()),
            cache: RwLock::new(HashMap::new()),
            site_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a strategy for exactly one type.
    ///
    /// Exact registrations are tried in call order, so an earlier
    /// registration for the same type wins.
    pub fn register_exact(&self, ty: TypeDesc, strategy: Strategy) {
        self.register_resolver(move |requested: &TypeDesc, _: &ParserRegistry| {
            (*requested == ty).then(|| Arc::clone(&strategy))
        });
    }

    /// Appends a resolver to the user resolver list.
    ///
    /// Clears the type cache, since earlier lookups may now resolve
    /// differently.
    pub fn register_resolver(&self, resolver: impl Resolver + 'static) {
        self.resolvers.lock().push(Arc::new(resolver));
        self.cache.write().clear();
    }

    /// Appends a parameter-site resolver.
    pub fn register_site_resolver(&self, resolver: impl SiteResolver + 'static) {
        self.site_resolvers.lock().push(Arc::new(resolver));
        self.site_cache.write().clear();
    }

    /// Resolves a type to a strategy.
    ///
    /// Returns `None` when no resolver claims the type.
    #[must_use]
    pub fn resolve(&self, ty: &TypeDesc) -> Option<Strategy> {
        if let Some(cached) = self.cache.read().get(ty) {
            return Some(Arc::clone(cached));
        }

        let resolvers = self.resolvers.lock().clone();
        let strategy = resolvers
            .iter()
            .find_map(|resolver| resolver.resolve(ty, self))
            .or_else(|| BUILTINS.iter().find_map(|builtin| builtin(ty, self)));

        match &strategy {
            Some(strategy) => {
                tracing::debug!(ty = %ty, "resolved parser");
                self.cache.write().insert(ty.clone(), Arc::clone(strategy));
            }
            None => tracing::debug!(ty = %ty, "no parser for type"),
        }
        strategy
    }

    /// Resolves a type, turning a miss into a configuration error.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MissingParser`](herald_foundation::ErrorKind::MissingParser)
    /// if no resolver claims the type.
    pub fn require(&self, ty: &TypeDesc) -> Result<Strategy> {
        self.resolve(ty)
            .ok_or_else(|| Error::missing_parser(ty.clone()))
    }

    /// Resolves a parameter site, falling back to its declared type.
    #[must_use]
    pub fn resolve_site(&self, site: &ParamSite, ty: &TypeDesc) -> Option<Strategy> {
        if let Some(cached) = self.site_cache.read().get(site) {
            return Some(Arc::clone(cached));
        }

        let resolvers = self.site_resolvers.lock().clone();
        if let Some(strategy) = resolvers
            .iter()
            .find_map(|resolver| resolver.resolve(site, ty, self))
        {
            tracing::debug!(site = %site, ty = %ty, "resolved site parser");
            self.site_cache.write().insert(site.clone(), Arc::clone(&strategy));
            return Some(strategy);
        }
        self.resolve(ty)
    }

    /// Resolves a parameter site, turning a miss into a configuration error.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MissingParser`](herald_foundation::ErrorKind::MissingParser)
    /// if neither a site resolver nor a type resolver claims the parameter.
    pub fn require_site(&self, site: &ParamSite, ty: &TypeDesc) -> Result<Strategy> {
        self.resolve_site(site, ty)
            .ok_or_else(|| Error::missing_parser(ty.clone()))
    }

    /// Drops every cached resolution.
    pub fn clear_cache(&self) {
        self.cache.write().clear();
        self.site_cache.write().clear();
    }

    /// Returns the number of cached type resolutions.
    #[must_use]
    pub fn cached_types(&self) -> usize {
        self.cache.read().len()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("resolvers", &self.resolvers.lock().len())
            .field("site_resolvers", &self.site_resolvers.lock().len())
            .field("cached_types", &self.cache.read().len())
            .finish_non_exhaustive()
    }
}
