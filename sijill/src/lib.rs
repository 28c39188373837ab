//! # Sijill: a recipe-driven dependency injection registry
//!
//! Describe components as recipes (class, constructor arguments, setter
//! attributes, singleton and lazy flags), register the classes they name,
//! and let the container build and wire them on demand.
//!
//! ```rust
//! use sijill::prelude::*;
//!
//! #[derive(Default)]
//! struct Greeter {
//!     greeting: String,
//! }
//!
//! let config = RegistryConfig::from_json_str(r#"{
//!     "greeter": { "class": "Greeter", "setter_attributes": { "greeting": "hello" } }
//! }"#).unwrap();
//!
//! let container = Container::builder()
//!     .class(Class::<Greeter>::with_default("Greeter")
//!         .field("greeting", |g: &mut Greeter, v: String| g.greeting = v))
//!     .recipes(config)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(container.get_as::<Greeter>("greeter").unwrap().greeting, "hello");
//! ```

pub use sijill_container::*;
pub use sijill_support::*;
