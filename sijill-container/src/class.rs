//! Typed class registration.
//!
//! [`Class<T>`] describes how the container builds a `T` and which of its
//! members accept setter attributes. It is erased into a
//! [`ClassDescriptor`] when registered.
//!
//! # Examples
//! ```rust
//! use sijill_container::class::Class;
//!
//! struct Counter {
//!     value: i64,
//!     step: i64,
//! }
//!
//! let class = Class::new("Counter", |args| {
//!     Ok(Counter { value: args.get(0)?, step: 1 })
//! })
//! .method("set_step", |counter: &mut Counter, step: i64| {
//!     counter.step = step;
//!     Ok(())
//! });
//! # let _ = class;
//! ```

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::arguments::Arguments;
use crate::error::BoxError;
use crate::registry::{ClassDescriptor, ConstructorFn, MemberFn, MemberKind};

/// Builder for a [`ClassDescriptor`] producing `T`.
pub struct Class<T> {
    name: String,
    constructor: ConstructorFn,
    members: HashMap<(MemberKind, String), MemberFn>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> Class<T> {
    /// Declares class `name` built by `constructor`.
    ///
    /// The constructor receives the recipe's `constructor_attributes`
    /// in order.
    pub fn new(
        name: impl Into<String>,
        constructor: impl Fn(Arguments<'_>) -> Result<T, BoxError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            constructor: Arc::new(move |args: Arguments<'_>| {
                Ok(Box::new(constructor(args)?) as Box<dyn Any + Send + Sync>)
            }),
            members: HashMap::new(),
            _marker: PhantomData,
        }
    }

    /// Declares class `name` built with `T::default()`.
    ///
    /// Recipes for it must not pass constructor arguments.
    pub fn with_default(name: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self::new(name, |args: Arguments<'_>| {
            args.expect_none()?;
            Ok(T::default())
        })
    }

    /// Registers a public field. The value is deserialized into `V`.
    pub fn field<V: DeserializeOwned + 'static>(
        self,
        name: impl Into<String>,
        assign: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        self.raw_field(name, move |target: &mut T, value: &Value| {
            assign(target, V::deserialize(value)?);
            Ok(())
        })
    }

    /// Registers a method taking one argument deserialized into `V`.
    pub fn method<V: DeserializeOwned + 'static>(
        self,
        name: impl Into<String>,
        call: impl Fn(&mut T, V) -> Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.raw_method(name, move |target: &mut T, value: &Value| {
            call(target, V::deserialize(value)?)
        })
    }

    /// Registers a field that takes the untyped value.
    pub fn raw_field(
        self,
        name: impl Into<String>,
        assign: impl Fn(&mut T, &Value) -> Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.member(MemberKind::Field, name.into(), assign)
    }

    /// Registers a method that takes the untyped value.
    pub fn raw_method(
        self,
        name: impl Into<String>,
        call: impl Fn(&mut T, &Value) -> Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.member(MemberKind::Method, name.into(), call)
    }

    fn member(
        mut self,
        kind: MemberKind,
        name: String,
        apply: impl Fn(&mut T, &Value) -> Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        let erased: MemberFn = Arc::new(move |instance: &mut (dyn Any + Send + Sync), value: &Value| {
            let target = instance
                .downcast_mut::<T>()
                .ok_or_else(|| BoxError::from(format!("instance is not a {}", type_name::<T>())))?;
            apply(target, value)
        });
        self.members.insert((kind, name), erased);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Erases the builder into a descriptor.
    pub fn into_descriptor(self) -> ClassDescriptor {
        ClassDescriptor {
            name: self.name,
            type_name: type_name::<T>(),
            constructor: self.constructor,
            members: self.members,
        }
    }
}
