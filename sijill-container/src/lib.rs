//! Core container implementation for Sijill.

pub mod arguments;
pub mod class;
pub mod config;
pub mod container;
pub mod error;
pub mod global;
pub mod provider;
pub mod recipe;
pub mod registry;
pub mod scope;
pub mod store;

pub use container::prelude;
pub use error::{RegistryError, Result};
pub use registry::Instance;
pub use scope::Scope;
