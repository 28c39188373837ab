//! Class registry: the factory and injection capability.
//!
//! Recipes name their class with a string. The registry maps that string
//! to a [`ClassDescriptor`], which knows how to construct an instance from
//! positional arguments and which members accept setter attributes.
//!
//! # Injection precedence
//! For a setter attribute `name`, members are tried in this order and the
//! first one registered wins:
//! 1. field `name`
//! 2. method `name`
//! 3. method `set_<lowercase name>`
//! 4. method `set<Capitalized name>`

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use sijill_support::naming::{camel_setter, snake_setter};
use sijill_support::rendering::{shorten_type_name, suggest_similar};
use tracing::debug;

use crate::arguments::Arguments;
use crate::class::Class;
use crate::error::BoxError;

/// A live, type-erased instance as stored in the container cache.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Resolves other container-managed ids while an instance is being built.
///
/// Constructors reach it through [`Arguments::resolve`]. Implemented by
/// [`Container`](crate::container::Container).
pub trait Resolver: Send + Sync {
    fn resolve(&self, id: &str) -> crate::error::Result<Instance>;
}

/// Type alias for type-erased constructors.
pub(crate) type ConstructorFn =
    Arc<dyn Fn(Arguments<'_>) -> Result<Box<dyn Any + Send + Sync>, BoxError> + Send + Sync>;

/// Type alias for type-erased injection targets.
pub(crate) type MemberFn =
    Arc<dyn Fn(&mut (dyn Any + Send + Sync), &Value) -> Result<(), BoxError> + Send + Sync>;

/// What kind of member an injection target is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Method,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Field => write!(f, "field"),
            MemberKind::Method => write!(f, "method"),
        }
    }
}

/// Lists the members that may receive `attribute`, in precedence order.
///
/// ```
/// use sijill_container::registry::{injection_candidates, MemberKind};
///
/// let candidates = injection_candidates("step");
/// assert_eq!(candidates[0], (MemberKind::Field, "step".to_string()));
/// assert_eq!(candidates[3], (MemberKind::Method, "setStep".to_string()));
/// ```
pub fn injection_candidates(attribute: &str) -> [(MemberKind, String); 4] {
    [
        (MemberKind::Field, attribute.to_string()),
        (MemberKind::Method, attribute.to_string()),
        (MemberKind::Method, snake_setter(attribute)),
        (MemberKind::Method, camel_setter(attribute)),
    ]
}

/// The member selected to receive one setter attribute.
pub struct InjectionTarget<'a> {
    kind: MemberKind,
    name: &'a str,
    apply: &'a MemberFn,
}

impl InjectionTarget<'_> {
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub(crate) fn apply(
        &self,
        instance: &mut (dyn Any + Send + Sync),
        value: &Value,
    ) -> Result<(), BoxError> {
        (self.apply)(instance, value)
    }
}

impl fmt::Display for InjectionTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.kind, self.name)
    }
}

/// Constructor and member table for one class identifier.
#[derive(Clone)]
pub struct ClassDescriptor {
    pub(crate) name: String,
    pub(crate) type_name: &'static str,
    pub(crate) constructor: ConstructorFn,
    pub(crate) members: HashMap<(MemberKind, String), MemberFn>,
}

impl ClassDescriptor {
    /// The class identifier recipes refer to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The Rust type this class builds.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn has_member(&self, kind: MemberKind, name: &str) -> bool {
        self.members.contains_key(&(kind, name.to_string()))
    }

    /// Builds a fresh instance from positional arguments.
    pub(crate) fn construct(
        &self,
        args: Arguments<'_>,
    ) -> Result<Box<dyn Any + Send + Sync>, BoxError> {
        (self.constructor)(args)
    }

    /// Finds the member that receives `attribute`, if any.
    pub fn injection_target(&self, attribute: &str) -> Option<InjectionTarget<'_>> {
        injection_candidates(attribute)
            .into_iter()
            .find_map(|candidate| {
                self.members
                    .get_key_value(&candidate)
                    .map(|((kind, name), apply)| InjectionTarget {
                        kind: *kind,
                        name: name.as_str(),
                        apply,
                    })
            })
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut members: Vec<String> = self
            .members
            .keys()
            .map(|(kind, name)| format!("{kind} {name}"))
            .collect();
        members.sort();

        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("type", &shorten_type_name(self.type_name))
            .field("members", &members)
            .finish()
    }
}

/// Maps class identifiers to their descriptors.
///
/// Populated while building the container, read-only afterwards.
#[derive(Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, ClassDescriptor>,
}

impl ClassRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a typed class. Returns the descriptor it replaced, if any.
    pub fn register<T: Send + Sync + 'static>(&mut self, class: Class<T>) -> Option<ClassDescriptor> {
        self.register_descriptor(class.into_descriptor())
    }

    /// Registers an already-erased descriptor.
    pub fn register_descriptor(&mut self, descriptor: ClassDescriptor) -> Option<ClassDescriptor> {
        debug!(
            class = %descriptor.name,
            ty = %shorten_type_name(descriptor.type_name),
            members = descriptor.members.len(),
            "Registered class"
        );
        self.classes.insert(descriptor.name.clone(), descriptor)
    }

    /// Moves every class of `other` into this registry; `other` wins on clashes.
    pub fn extend(&mut self, other: ClassRegistry) {
        for (_, descriptor) in other.classes {
            self.register_descriptor(descriptor);
        }
    }

    pub fn get(&self, class: &str) -> Option<&ClassDescriptor> {
        self.classes.get(class)
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Registered class names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn suggestions(&self, class: &str) -> Vec<String> {
        suggest_similar(class, &self.names(), 3)
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("classes", &self.names())
            .finish()
    }
}
