//! Provider trait: a module of related class registrations.
//!
//! Providers let each part of an application declare the classes its
//! recipes refer to, instead of one giant registration block.
//!
//! # Examples
//! ```rust,ignore
//! struct MailProvider;
//!
//! impl ClassProvider for MailProvider {
//!     fn register(&self, classes: &mut ClassRegistry) {
//!         classes.register(Class::new("Mailer", |args| Ok(Mailer::new(args.get(0)?))));
//!         classes.register(Class::<Outbox>::with_default("Outbox"));
//!     }
//! }
//!
//! let container = Container::builder()
//!     .add_provider(&MailProvider)
//!     .recipes(config)
//!     .build()?;
//! ```

use crate::registry::ClassRegistry;

/// A module that registers classes into a [`ClassRegistry`].
pub trait ClassProvider: Send + Sync {
    /// Register classes. Called once while the container is assembled.
    fn register(&self, classes: &mut ClassRegistry);

    /// Optional: human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
