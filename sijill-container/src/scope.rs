//! Instance lifecycle scopes.
//!
//! A recipe's `use_singleton` flag picks one of two scopes:
//! - [`Scope::Singleton`]: one instance per container, memoized by id
//! - [`Scope::Transient`]: a new instance on every `get`
use std::fmt;

/// Defines how long a built instance lives within the container.
///
/// # Examples
/// ```
/// use sijill_container::scope::Scope;
///
/// assert_eq!(Scope::from_singleton_flag(true), Scope::Singleton);
/// assert!(!Scope::Transient.is_cached());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One instance shared by every `get` on the id.
    ///
    /// Built on first resolve (or eagerly at container construction)
    /// and cached until the container is dropped.
    Singleton,

    /// New instance built on every `get`.
    ///
    /// Never cached, so `object_exists` keeps reporting `false`.
    Transient,
}

impl Scope {
    /// Maps the recipe flag to a scope.
    #[inline]
    pub fn from_singleton_flag(use_singleton: bool) -> Self {
        if use_singleton {
            Scope::Singleton
        } else {
            Scope::Transient
        }
    }

    /// Returns `true` if built instances go into the cache.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, Scope::Singleton)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Singleton => write!(f, "Singleton"),
            Scope::Transient => write!(f, "Transient"),
        }
    }
}
