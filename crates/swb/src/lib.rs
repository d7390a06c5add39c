//! Facade crate for Switchboard flag evaluation and shared modules.
//! Re-exports the engine, domain primitives and suite store, and hosts the
//! optional process-global evaluator behind the free functions.
//! Keep this crate thin: it should compose other crates, not implement flag logic.
//!
//! ## Usage
//! - Thread an explicit [`Flags`] evaluator through your application, or
//! - call [`install`] once at startup and use the free functions everywhere else.
//!
//! ```rust
//! use swb::prelude::*;
//!
//! static DARK_LAUNCH: FlagDescriptor =
//!     FlagDescriptor::fixed("dark-launch", DomainTag::Feature, false);
//!
//! fn main() -> Result<(), FlagError> {
//!     swb::install(
//!         Flags::builder()
//!             .store(SuiteStore::in_memory())
//!             .arguments(LaunchArguments::empty())
//!             .build(),
//!     )?;
//!
//!     assert!(!swb::value(&DARK_LAUNCH, "app.main")?);
//!     swb::set_value(&DARK_LAUNCH, "app.main", true)?;
//!     assert!(swb::value(&DARK_LAUNCH, "app.main")?);
//!     Ok(())
//! }
//! ```

pub use swb_domain as domain;
pub use swb_logger as logger;
pub use swb_store as store;

pub use swb_flags::{FlagDomain, FlagError, FlagErrorExt, Flags, FlagsBuilder};

use std::sync::OnceLock;
use swb_domain::FlagDescriptor;
use tracing::debug;

/// Single-import surface for applications.
pub mod prelude {
    pub use swb_domain::{BuildMode, DomainTag, FlagDefault, FlagDescriptor, LaunchArguments};
    pub use swb_flags::{FlagDomain, FlagError, FlagErrorExt, Flags, FlagsBuilder};
    pub use swb_logger::{LevelFilter, Logger};
    pub use swb_store::{SuiteStore, SuiteStoreBuilder};
}

static GLOBAL_FLAGS: OnceLock<Flags> = OnceLock::new();

/// Installs `flags` as the process-global evaluator behind the free functions.
///
/// Call once at startup, after building the evaluator. The global is
/// write-once for the process lifetime; there is no uninstall.
///
/// # Errors
///
/// Returns [`FlagError::Internal`] if an evaluator is already installed.
pub fn install(flags: Flags) -> Result<(), FlagError> {
    GLOBAL_FLAGS
        .set(flags)
        .map_err(|_| FlagError::from("A global flag evaluator is already installed"))?;
    debug!("Global flag evaluator installed");
    Ok(())
}

/// Returns a handle to the installed process-global evaluator.
///
/// # Errors
///
/// Returns [`FlagError::Internal`] if [`install`] has not been called yet.
pub fn flags() -> Result<Flags, FlagError> {
    GLOBAL_FLAGS
        .get()
        .cloned()
        .ok_or_else(|| FlagError::from("No global flag evaluator is installed"))
}

/// Resolved value of a flag within a suite, via the installed evaluator.
///
/// # Errors
///
/// Returns an error if no evaluator is installed, or if the flag's domain
/// has to be created and its suite cannot be opened.
pub fn value(descriptor: &FlagDescriptor, suite: &str) -> Result<bool, FlagError> {
    flags()?.value(descriptor, suite)
}

/// Persists `value` as the flag's override within a suite.
///
/// # Errors
///
/// Returns an error if no evaluator is installed, or if the suite cannot be
/// opened or the override cannot be persisted.
pub fn set_value(descriptor: &FlagDescriptor, suite: &str, value: bool) -> Result<(), FlagError> {
    flags()?.set_value(descriptor, suite, value)
}

/// Removes the flag's persisted override within a suite.
///
/// # Errors
///
/// Returns an error if no evaluator is installed, or if the suite cannot be
/// opened or the removal cannot be persisted.
pub fn unset(descriptor: &FlagDescriptor, suite: &str) -> Result<(), FlagError> {
    flags()?.unset(descriptor, suite)
}

/// Whether the suite currently persists an override for the flag.
///
/// # Errors
///
/// Returns an error if no evaluator is installed, or if the flag's domain
/// has to be created and its suite cannot be opened.
pub fn is_defined(descriptor: &FlagDescriptor, suite: &str) -> Result<bool, FlagError> {
    flags()?.is_defined(descriptor, suite)
}

/// All descriptors discovered so far across both domain tags of a suite,
/// sorted by key.
///
/// # Errors
///
/// Returns an error if no evaluator is installed.
pub fn all_flags(suite: &str) -> Result<Vec<FlagDescriptor>, FlagError> {
    Ok(flags()?.all_flags(suite))
}
