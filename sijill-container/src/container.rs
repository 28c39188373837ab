//! # The Container — heart of Sijill
//!
//! Turns recipes into live instances, memoizes singletons and
//! injects setter attributes.
//!
//! # Architecture
//! ```text
//! ContainerBuilder ──build()──> normalize recipes ──> eager builds ──> Container
//!                                                                       │
//!                                            get(id) ── cache hit ──────┤
//!                                               │                       │
//!                                             build: class → construct → inject → cache
//! ```
//!
//! # Examples
//! ```rust
//! use sijill_container::prelude::*;
//!
//! struct Counter {
//!     value: i64,
//!     step: i64,
//! }
//!
//! let container = Container::builder()
//!     .class(
//!         Class::new("Counter", |args| Ok(Counter { value: args.get(0)?, step: 1 }))
//!             .method("set_step", |c: &mut Counter, step: i64| {
//!                 c.step = step;
//!                 Ok(())
//!             }),
//!     )
//!     .recipe("c1", RawRecipe::new("Counter").arg(10).attr("step", 2).lazy(true))
//!     .build()
//!     .expect("Failed to build container");
//!
//! let counter = container.get_as::<Counter>("c1").expect("Failed to resolve");
//! assert_eq!((counter.value, counter.step), (10, 2));
//! ```

use std::any::type_name;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;
use sijill_support::rendering::suggest_similar;
use tracing::{debug, info, instrument, trace, warn};

use crate::arguments::Arguments;
use crate::class::Class;
use crate::config::RegistryConfig;
use crate::error::{
    AttributeNotFoundError, CircularResolutionError, RegistryError, Result, TypeMismatchError,
    UnknownClassError, UnknownIdError,
};
use crate::provider::ClassProvider;
use crate::recipe::{RawRecipe, Recipe};
use crate::registry::{ClassRegistry, Instance, Resolver, injection_candidates};
use crate::store::ConfigStore;

// ============================================================
// ContainerBuilder
// ============================================================

/// Builds a [`Container`] from classes and recipes.
///
/// Register classes, supply recipes, optionally pre-seed instances, then
/// call [`build()`](ContainerBuilder::build) to normalize the recipes and
/// run the eager builds.
pub struct ContainerBuilder {
    classes: ClassRegistry,
    recipes: RegistryConfig,
    preset: IndexMap<String, Instance>,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self {
            classes: ClassRegistry::new(),
            recipes: RegistryConfig::new(),
            preset: IndexMap::new(),
        }
    }

    // ── Classes ──

    /// Register one class.
    pub fn class<T: Send + Sync + 'static>(mut self, class: Class<T>) -> Self {
        if let Some(previous) = self.classes.register(class) {
            warn!(class = previous.name(), "Class registered twice, keeping the latest");
        }
        self
    }

    /// Merge a prepared [`ClassRegistry`].
    pub fn classes(mut self, classes: ClassRegistry) -> Self {
        self.classes.extend(classes);
        self
    }

    /// Add a [`ClassProvider`] module.
    pub fn add_provider(mut self, provider: &dyn ClassProvider) -> Self {
        debug!(provider = provider.name(), "Adding class provider");
        provider.register(&mut self.classes);
        self
    }

    // ── Recipes ──

    /// Add one recipe. A recipe with the same id is replaced in place.
    pub fn recipe(mut self, id: impl Into<String>, recipe: RawRecipe) -> Self {
        self.recipes.insert(id, recipe);
        self
    }

    /// Append a whole recipe table, keeping its order.
    pub fn recipes(mut self, config: RegistryConfig) -> Self {
        self.recipes.merge(config);
        self
    }

    // ── Pre-seeded instances ──

    /// Put an instance in the cache before the eager builds run.
    ///
    /// Same semantics as [`Container::set`], but early enough for eager
    /// recipes and for eager `must_be_set` ids.
    pub fn instance<T: Send + Sync + 'static>(mut self, id: impl Into<String>, value: Arc<T>) -> Self {
        self.preset.insert(id.into(), value);
        self
    }

    // ── Build ──

    /// Normalize every recipe, then build the eager ones in table order.
    ///
    /// An eager recipe with `use_singleton = false` is built once here and
    /// dropped, so it is not cached afterwards.
    ///
    /// # Errors
    /// The first failing eager build aborts construction and is returned.
    #[instrument(skip(self), name = "container_build")]
    pub fn build(self) -> Result<Container> {
        info!(
            recipes = self.recipes.len(),
            classes = self.classes.len(),
            "Building container"
        );

        let recipes: IndexMap<String, Recipe> = self
            .recipes
            .into_iter()
            .map(|(id, raw)| (id, raw.normalize()))
            .collect();

        let build_locks = recipes
            .keys()
            .map(|id| (id.clone(), Mutex::new(())))
            .collect();

        let container = Container {
            recipes,
            classes: self.classes,
            instances: DashMap::new(),
            build_locks,
            config: ConfigStore::new(),
        };

        for (id, instance) in self.preset {
            container.set_instance(&id, instance);
        }

        let mut eager = 0usize;
        for (id, recipe) in &container.recipes {
            if recipe.is_eager() {
                debug!(id = %id, "Eager build");
                container.get(id)?;
                eager += 1;
            }
        }

        info!(eager, "Container built successfully ✓");
        Ok(container)
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// Recipe-driven, thread-safe dependency injection container.
///
/// Created by [`ContainerBuilder::build()`]. The recipe table and class
/// registry are frozen; only the instance cache and the auxiliary config
/// store change afterwards.
pub struct Container {
    recipes: IndexMap<String, Recipe>,
    classes: ClassRegistry,
    instances: DashMap<String, Instance>,
    /// One lock per configured id, fixed at build time.
    build_locks: HashMap<String, Mutex<()>>,
    config: ConfigStore,
}

impl Container {
    /// Create a new builder.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// Resolve the instance for `id`.
    ///
    /// A cached instance is returned as is. Otherwise the recipe is built,
    /// and the result is cached when the recipe is a singleton.
    ///
    /// # Errors
    /// - [`RegistryError::UnknownId`]: `id` has no recipe
    /// - [`RegistryError::MustBeSetViolation`]: `id` must be `set` first
    /// - [`RegistryError::AttributeNotFound`]: a setter attribute has no target
    /// - [`RegistryError::CircularResolution`]: the build of `id` reached
    ///   `id` again on this thread
    /// - [`RegistryError::MissingClass`], [`RegistryError::UnknownClass`],
    ///   [`RegistryError::ConstructionFailed`], [`RegistryError::InjectionFailed`]
    pub fn get(&self, id: &str) -> Result<Instance> {
        let recipe = self
            .recipes
            .get(id)
            .ok_or_else(|| self.unknown_id(id))?;

        if let Some(instance) = self.cached(id) {
            trace!(id, "Cache hit");
            return Ok(instance);
        }

        if recipe.must_be_set {
            return Err(RegistryError::MustBeSetViolation { id: id.to_string() });
        }

        // Must be taken before the build lock: re-locking it on this
        // thread would never return.
        let _resolving = Resolving::enter(self, id)?;

        if !recipe.scope().is_cached() {
            return self.build(id, recipe);
        }

        // Check, build and store under one per-id lock so a singleton is
        // built at most once.
        let _guard = self.build_locks.get(id).map(|lock| lock.lock());

        if let Some(instance) = self.cached(id) {
            trace!(id, "Built by another caller while waiting");
            return Ok(instance);
        }

        let instance = self.build(id, recipe)?;
        self.instances.insert(id.to_string(), Arc::clone(&instance));
        Ok(instance)
    }

    /// Resolve `id` and downcast it to `T`.
    ///
    /// ```rust,ignore
    /// let mailer: Arc<Mailer> = container.get_as("mailer")?;
    /// ```
    pub fn get_as<T: Send + Sync + 'static>(&self, id: &str) -> Result<Arc<T>> {
        let instance = self.get(id)?;

        instance.downcast::<T>().map_err(|_| {
            RegistryError::TypeMismatch(TypeMismatchError {
                id: id.to_string(),
                expected: type_name::<T>(),
                class: self.recipes.get(id).and_then(|r| r.class.clone()),
            })
        })
    }

    /// Store `instance` under `id`, replacing any cached entry.
    ///
    /// `id` does not need a recipe; an unconfigured id is stored without
    /// locking. An empty `id` is ignored.
    pub fn set<T: Send + Sync + 'static>(&self, id: &str, instance: Arc<T>) {
        self.set_instance(id, instance);
    }

    /// Type-erased [`set`](Self::set).
    pub fn set_instance(&self, id: &str, instance: Instance) {
        if id.is_empty() {
            warn!("Ignoring set() with an empty id");
            return;
        }

        let _guard = self.build_locks.get(id).map(|lock| lock.lock());

        debug!(id, "Instance set");
        self.instances.insert(id.to_string(), instance);
    }

    /// `true` if the cache holds an entry for `id`.
    pub fn object_exists(&self, id: &str) -> bool {
        self.instances.contains_key(id)
    }

    // ── Auxiliary config store ──

    pub fn get_config(&self, key: &str) -> Option<Value> {
        self.config.get_config(key)
    }

    pub fn set_config(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.config.set_config(key, value)
    }

    pub fn config_to_array(&self) -> std::collections::BTreeMap<String, Value> {
        self.config.config_to_array()
    }

    pub fn config_store(&self) -> &ConfigStore {
        &self.config
    }

    // ── Introspection ──

    /// The normalized recipe for `id`.
    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    /// Configured ids, in table order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.recipes.keys().map(String::as_str)
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Number of configured recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    // ── Internal ──

    fn cached(&self, id: &str) -> Option<Instance> {
        self.instances.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Construct and inject. Nothing is cached here, so a failure leaves
    /// no trace of the half-built instance.
    fn build(&self, id: &str, recipe: &Recipe) -> Result<Instance> {
        let class_name = recipe
            .class
            .as_deref()
            .ok_or_else(|| RegistryError::MissingClass { id: id.to_string() })?;

        let class = self.classes.get(class_name).ok_or_else(|| {
            RegistryError::UnknownClass(UnknownClassError {
                class: class_name.to_string(),
                id: id.to_string(),
                suggestions: self.classes.suggestions(class_name),
            })
        })?;

        debug!(id, class = class_name, scope = %recipe.scope(), "Building instance");

        let mut object = class
            .construct(Arguments::with_resolver(&recipe.constructor_attributes, self))
            .map_err(|source| RegistryError::ConstructionFailed {
                id: id.to_string(),
                class: class_name.to_string(),
                source,
            })?;

        for (attribute, value) in &recipe.setter_attributes {
            let target = class.injection_target(attribute).ok_or_else(|| {
                RegistryError::AttributeNotFound(AttributeNotFoundError {
                    attribute: attribute.clone(),
                    id: id.to_string(),
                    class: class_name.to_string(),
                    tried: injection_candidates(attribute)
                        .iter()
                        .map(|(kind, name)| format!("{kind} `{name}`"))
                        .collect(),
                })
            })?;

            trace!(id, attribute = %attribute, target = %target, "Injecting attribute");

            target
                .apply(object.as_mut(), value)
                .map_err(|source| RegistryError::InjectionFailed {
                    id: id.to_string(),
                    attribute: attribute.clone(),
                    target: target.to_string(),
                    source,
                })?;
        }

        Ok(Instance::from(object))
    }

    fn unknown_id(&self, id: &str) -> RegistryError {
        let available: Vec<&str> = self.ids().collect();
        RegistryError::UnknownId(UnknownIdError {
            id: id.to_string(),
            suggestions: suggest_similar(id, &available, 3),
        })
    }
}

impl Resolver for Container {
    fn resolve(&self, id: &str) -> Result<Instance> {
        self.get(id)
    }
}

thread_local! {
    /// Ids being built on this thread, tagged with their container's address.
    static RESOLVING: RefCell<Vec<(usize, String)>> = const { RefCell::new(Vec::new()) };
}

/// Marks `id` as being built on this thread until dropped.
struct Resolving;

impl Resolving {
    fn enter(container: &Container, id: &str) -> Result<Self> {
        let owner = container as *const Container as usize;

        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();

            if let Some(start) = stack.iter().position(|(o, i)| *o == owner && i == id) {
                let mut chain: Vec<String> = stack[start..]
                    .iter()
                    .filter(|(o, _)| *o == owner)
                    .map(|(_, i)| i.clone())
                    .collect();
                chain.push(id.to_string());
                warn!(id, chain = ?chain, "Circular resolution");

                return Err(RegistryError::CircularResolution(CircularResolutionError {
                    id: id.to_string(),
                    chain,
                }));
            }

            stack.push((owner, id.to_string()));
            Ok(Resolving)
        })
    }
}

impl Drop for Resolving {
    fn drop(&mut self) {
        let _ = RESOLVING.try_with(|stack| stack.borrow_mut().pop());
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("recipes", &self.recipes.len())
            .field("classes", &self.classes.len())
            .field("cached", &self.instances.len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ContainerBuilder};
    pub use crate::arguments::Arguments;
    pub use crate::class::Class;
    pub use crate::config::RegistryConfig;
    pub use crate::error::{BoxError, RegistryError, Result};
    pub use crate::provider::ClassProvider;
    pub use crate::recipe::{RawRecipe, Recipe};
    pub use crate::registry::{ClassRegistry, Instance, Resolver};
    pub use crate::scope::Scope;
    pub use serde_json::{Value, json};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
