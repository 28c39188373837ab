//! Error types for registry operations.
//!
//! Every failure names the id being resolved, and where it helps,
//! what the registry looked for and what it has instead.

use std::fmt;

use sijill_support::rendering::{render_chain, shorten_type_name};

use crate::config::ConfigError;

/// Boxed error returned by constructors and injection targets.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for all registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The id has no recipe in the configuration table.
    #[error("{}", .0)]
    UnknownId(UnknownIdError),

    /// The id is marked `must_be_set` and nothing was `set` for it yet.
    #[error(
        "id [{id}] must be provided with set() before it is resolved\n  Hint: call set(\"{id}\", ..) or pre-seed it with ContainerBuilder::instance()"
    )]
    MustBeSetViolation { id: String },

    /// No field or method on the built instance accepts the attribute.
    #[error("{}", .0)]
    AttributeNotFound(AttributeNotFoundError),

    /// The recipe has to be built but names no class.
    #[error("id [{id}] has no class configured and cannot be built")]
    MissingClass { id: String },

    /// The recipe names a class the registry does not know.
    #[error("{}", .0)]
    UnknownClass(UnknownClassError),

    /// A build re-entered an id that is already being built on this thread.
    #[error("{}", .0)]
    CircularResolution(CircularResolutionError),

    /// The class constructor returned an error.
    #[error("Failed to construct [{id}] ({class}): {source}")]
    ConstructionFailed {
        id: String,
        class: String,
        #[source]
        source: BoxError,
    },

    /// An injection target rejected the attribute value.
    #[error("Failed to inject attribute [{attribute}] into [{id}] via {target}: {source}")]
    InjectionFailed {
        id: String,
        attribute: String,
        target: String,
        #[source]
        source: BoxError,
    },

    /// A typed lookup asked for a different type than the one stored.
    #[error("{}", .0)]
    TypeMismatch(TypeMismatchError),

    /// Recipes could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The process-wide container exists already.
    #[error("The global container is already initialized")]
    GlobalAlreadyInitialized,
}

/// Error when an id is absent from the configuration table.
#[derive(Debug)]
pub struct UnknownIdError {
    /// The id that was requested
    pub id: String,
    /// Configured ids that look similar
    pub suggestions: Vec<String>,
}

impl fmt::Display for UnknownIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id [{}] not found in registry configuration", self.id)?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }
        Ok(())
    }
}

/// Error when no injection target matches a setter attribute.
///
/// Lists every member name that was tried, in the order tried.
#[derive(Debug)]
pub struct AttributeNotFoundError {
    pub attribute: String,
    pub id: String,
    pub class: String,
    pub tried: Vec<String>,
}

impl fmt::Display for AttributeNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attribute [{}] not found in [{}] (class {})",
            self.attribute, self.id, self.class,
        )?;
        write!(f, "\n  Tried: {}", render_chain(&self.tried))
    }
}

/// Error when resolving an id comes back to the same id.
///
/// `chain` starts and ends with `id`.
#[derive(Debug)]
pub struct CircularResolutionError {
    pub id: String,
    pub chain: Vec<String>,
}

impl fmt::Display for CircularResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Circular resolution of [{}]:\n  ", self.id)?;
        write!(f, "{}", render_chain(&self.chain))?;
        write!(
            f,
            "\n  Hint: make one side lazy and set() it, or break the cycle in the recipes"
        )
    }
}

/// Error when a recipe names an unregistered class.
#[derive(Debug)]
pub struct UnknownClassError {
    pub class: String,
    pub id: String,
    pub suggestions: Vec<String>,
}

impl fmt::Display for UnknownClassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class [{}] for id [{}] is not registered", self.class, self.id)?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: register it with ContainerBuilder::class(Class::new(\"{}\", ..))",
            self.class
        )
    }
}

/// Error when the stored instance is not of the requested type.
#[derive(Debug)]
pub struct TypeMismatchError {
    pub id: String,
    pub expected: &'static str,
    /// Configured class, when the id has a recipe
    pub class: Option<String>,
}

impl fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id [{}] does not hold a {}",
            self.id,
            shorten_type_name(self.expected),
        )?;
        if let Some(ref class) = self.class {
            write!(f, "\n  Configured class: {class}")?;
        }
        Ok(())
    }
}

/// Convenient Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
