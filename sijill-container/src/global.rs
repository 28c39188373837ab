//! Optional process-wide container.
//!
//! Most code should build a [`Container`] at its composition root and pass
//! it around. For hosts that want one container per process, this module
//! keeps it in a static that is created on first access and lives until
//! exit.
//!
//! ```rust,ignore
//! sijill_container::global::configure(|| {
//!     Container::builder()
//!         .add_provider(&AppProvider)
//!         .recipes(RegistryConfig::from_path("registry.toml")?)
//!         .build()
//! })?;
//!
//! // at startup: run the eager builds now
//! sijill_container::global::init()?;
//!
//! let mailer = sijill_container::global::instance()?.get_as::<Mailer>("mailer")?;
//! ```

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::container::Container;
use crate::error::{RegistryError, Result};

type Bootstrap = Box<dyn Fn() -> Result<Container> + Send + Sync>;

static BOOTSTRAP: OnceCell<Bootstrap> = OnceCell::new();
static GLOBAL: OnceCell<Container> = OnceCell::new();

/// Register how the process-wide container is built.
///
/// # Errors
/// [`RegistryError::GlobalAlreadyInitialized`] if a bootstrap was already
/// configured or the container already exists.
pub fn configure(bootstrap: impl Fn() -> Result<Container> + Send + Sync + 'static) -> Result<()> {
    BOOTSTRAP
        .set(Box::new(bootstrap))
        .map_err(|_| RegistryError::GlobalAlreadyInitialized)?;

    // Checked after storing: a concurrent instance() may already have
    // built the container without this bootstrap.
    if GLOBAL.get().is_some() {
        return Err(RegistryError::GlobalAlreadyInitialized);
    }
    Ok(())
}

/// Get, or build on first call, the process-wide container.
///
/// Without a configured bootstrap the container is empty. A failed build
/// is returned and retried on the next call.
pub fn instance() -> Result<&'static Container> {
    GLOBAL.get_or_try_init(|| {
        info!("Creating global container");
        match BOOTSTRAP.get() {
            Some(bootstrap) => bootstrap(),
            None => {
                debug!("No bootstrap configured, using an empty container");
                Container::builder().build()
            }
        }
    })
}

/// Force creation of the process-wide container, running its eager builds.
pub fn init() -> Result<()> {
    instance().map(|_| ())
}

/// `true` once the process-wide container exists.
pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only test in this binary that touches the process-wide statics.
    #[test]
    fn configure_after_instance_is_rejected() {
        let empty = instance().unwrap();
        assert!(empty.is_empty());

        let result = configure(|| {
            Container::builder()
                .recipe("late", crate::recipe::RawRecipe::placeholder())
                .build()
        });
        assert!(matches!(result, Err(RegistryError::GlobalAlreadyInitialized)));

        assert!(instance().unwrap().recipe("late").is_none());
        assert!(std::ptr::eq(empty, instance().unwrap()));
    }
}
