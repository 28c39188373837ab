//! Positional constructor arguments.
//!
//! Recipes carry constructor arguments as untyped [`Value`]s. Constructors
//! receive them wrapped in [`Arguments`] and pull out typed values with
//! serde. Inside a container, [`Arguments`] also resolves other ids, so a
//! recipe can wire its instance to other configured instances.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{RegistryError, TypeMismatchError};
use crate::registry::{Instance, Resolver};

/// Error when a constructor argument is missing or has the wrong shape.
#[derive(Debug, thiserror::Error)]
pub enum ArgumentError {
    #[error("missing constructor argument #{index} (got {len})")]
    Missing { index: usize, len: usize },

    #[error("constructor argument #{index} is invalid: {source}")]
    Invalid {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected no constructor arguments, got {len}")]
    Unexpected { len: usize },

    #[error("cannot resolve [{id}]: no container attached")]
    Detached { id: String },

    #[error("dependency [{id}] could not be resolved: {source}")]
    Dependency {
        id: String,
        #[source]
        source: Box<RegistryError>,
    },
}

/// Borrowed view over a recipe's `constructor_attributes`.
///
/// # Examples
/// ```
/// use sijill_container::arguments::Arguments;
/// use serde_json::json;
///
/// let values = vec![json!(10), json!("ten")];
/// let args = Arguments::new(&values);
///
/// let start: i64 = args.get(0).unwrap();
/// let label: String = args.get(1).unwrap();
/// let step: i64 = args.get_or(2, 1).unwrap();
/// assert_eq!((start, label.as_str(), step), (10, "ten", 1));
/// ```
#[derive(Clone, Copy)]
pub struct Arguments<'a> {
    values: &'a [Value],
    resolver: Option<&'a dyn Resolver>,
}

impl<'a> Arguments<'a> {
    /// Arguments with no container behind them; [`resolve`](Self::resolve) fails.
    pub fn new(values: &'a [Value]) -> Self {
        Self {
            values,
            resolver: None,
        }
    }

    /// Arguments that resolve dependencies through `resolver`.
    pub fn with_resolver(values: &'a [Value], resolver: &'a dyn Resolver) -> Self {
        Self {
            values,
            resolver: Some(resolver),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the untyped value at `index`.
    pub fn raw(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index)
    }

    pub fn as_slice(&self) -> &'a [Value] {
        self.values
    }

    /// Deserializes the argument at `index`.
    ///
    /// # Errors
    /// [`ArgumentError::Missing`] past the end, [`ArgumentError::Invalid`]
    /// when the value does not fit `T`.
    pub fn get<T: DeserializeOwned>(&self, index: usize) -> Result<T, ArgumentError> {
        let value = self.raw(index).ok_or(ArgumentError::Missing {
            index,
            len: self.len(),
        })?;
        T::deserialize(value).map_err(|source| ArgumentError::Invalid { index, source })
    }

    /// Like [`get`](Self::get), but an absent trailing argument yields `default`.
    pub fn get_or<T: DeserializeOwned>(&self, index: usize, default: T) -> Result<T, ArgumentError> {
        if index >= self.len() {
            return Ok(default);
        }
        self.get(index)
    }

    /// Fails unless no arguments were given.
    pub fn expect_none(&self) -> Result<(), ArgumentError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ArgumentError::Unexpected { len: self.len() })
        }
    }

    // ── Dependencies ──

    /// Resolves another id through the container building this instance.
    pub fn resolve(&self, id: &str) -> Result<Instance, ArgumentError> {
        let resolver = self.resolver.ok_or_else(|| ArgumentError::Detached {
            id: id.to_string(),
        })?;
        resolver.resolve(id).map_err(|source| ArgumentError::Dependency {
            id: id.to_string(),
            source: Box::new(source),
        })
    }

    /// Resolves `id` and downcasts it to `T`.
    pub fn resolve_as<T: Send + Sync + 'static>(&self, id: &str) -> Result<Arc<T>, ArgumentError> {
        self.resolve(id)?
            .downcast::<T>()
            .map_err(|_| ArgumentError::Dependency {
                id: id.to_string(),
                source: Box::new(RegistryError::TypeMismatch(TypeMismatchError {
                    id: id.to_string(),
                    expected: type_name::<T>(),
                    class: None,
                })),
            })
    }

    /// Reads the argument at `index` as an id and resolves it to a `T`.
    ///
    /// This is how a recipe refers to another configured instance:
    /// `constructor_attributes = ["mailer"]`.
    pub fn reference<T: Send + Sync + 'static>(&self, index: usize) -> Result<Arc<T>, ArgumentError> {
        let id: String = self.get(index)?;
        self.resolve_as(&id)
    }
}

impl fmt::Debug for Arguments<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("values", &self.values)
            .field("attached", &self.resolver.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn missing_argument() {
        let values = vec![json!(1)];
        let args = Arguments::new(&values);

        match args.get::<i64>(3) {
            Err(ArgumentError::Missing { index: 3, len: 1 }) => {}
            other => panic!("Expected Missing, got: {other:?}"),
        }
    }

    #[test]
    fn invalid_argument() {
        let values = vec![json!("not a number")];
        let args = Arguments::new(&values);

        assert!(matches!(
            args.get::<u32>(0),
            Err(ArgumentError::Invalid { index: 0, .. })
        ));
    }

    #[test]
    fn structured_argument() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Endpoint {
            host: String,
            port: u16,
        }

        let values = vec![json!({"host": "localhost", "port": 5432})];
        let endpoint: Endpoint = Arguments::new(&values).get(0).unwrap();
        assert_eq!(endpoint, Endpoint { host: "localhost".into(), port: 5432 });
    }

    #[test]
    fn default_only_past_the_end() {
        let values = vec![json!(null)];
        let args = Arguments::new(&values);

        assert_eq!(args.get_or(1, 7u8).unwrap(), 7);
        assert!(args.get_or(0, 7u8).is_err());
    }

    #[test]
    fn expect_none_rejects_arguments() {
        let values = vec![json!(1), json!(2)];
        assert!(Arguments::new(&[]).expect_none().is_ok());
        assert!(matches!(
            Arguments::new(&values).expect_none(),
            Err(ArgumentError::Unexpected { len: 2 })
        ));
    }

    struct Fixed(HashMap<&'static str, Instance>);

    impl Resolver for Fixed {
        fn resolve(&self, id: &str) -> crate::error::Result<Instance> {
            self.0.get(id).cloned().ok_or_else(|| RegistryError::MissingClass {
                id: id.to_string(),
            })
        }
    }

    #[test]
    fn detached_arguments_cannot_resolve() {
        assert!(matches!(
            Arguments::new(&[]).resolve("mailer"),
            Err(ArgumentError::Detached { .. })
        ));
    }

    #[test]
    fn reference_resolves_by_id() {
        let resolver = Fixed(HashMap::from([("port", Arc::new(8080u16) as Instance)]));
        let values = vec![json!("port"), json!("nowhere")];
        let args = Arguments::with_resolver(&values, &resolver);

        assert_eq!(*args.reference::<u16>(0).unwrap(), 8080);
        assert!(matches!(
            args.reference::<u16>(1),
            Err(ArgumentError::Dependency { .. })
        ));
        match args.resolve_as::<String>("port") {
            Err(ArgumentError::Dependency { source, .. }) => {
                assert!(matches!(*source, RegistryError::TypeMismatch(_)));
            }
            other => panic!("Expected Dependency, got: {other:?}"),
        }
    }
}
