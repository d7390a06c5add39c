//! # Flag Evaluation Engine
//!
//! This crate resolves boolean flags by combining three layered sources: the
//! build-mode restriction on debugging flags, process launch arguments, and
//! persisted per-suite overrides. Resolved values are cached per domain and
//! kept consistent with the persisted store through its change notifications,
//! so external edits to a suite are observed without a restart.
//!
//! ## Architecture
//!
//! 1.  **[`Flags`]:** The evaluator handle and domain registry. One
//!     [`FlagDomain`] exists per (domain tag, suite) pair, created on first
//!     use and reused for the process lifetime.
//! 2.  **[`FlagDomain`]:** The core. Owns the resolution cache and the
//!     descriptor registry for its pair, serializes cache population,
//!     writes and change reconciliation behind one lock.
//! 3.  **Precedence resolution:** release-mode debugging restriction, then
//!     `--disable-<key>`, then `--enable-<key>`, then the persisted
//!     override, then the descriptor default.
//!
//! ## Features
//!
//! * **Always-fresh reads**: store change notifications recompute affected cache entries.
//! * **Lazy discovery**: descriptors register on first evaluation; [`Flags::all_flags`] reports exactly what has been seen.
//! * **Total evaluation**: malformed or missing persisted values fall through precedence, callers always receive a boolean.
//!
//! ## Example
//!
//! ```rust
//! use swb_domain::{DomainTag, FlagDescriptor, LaunchArguments};
//! use swb_flags::{FlagError, Flags};
//! use swb_store::SuiteStore;
//!
//! static DROP_SPAM: FlagDescriptor =
//!     FlagDescriptor::fixed("drop-spam", DomainTag::Feature, true);
//!
//! fn main() -> Result<(), FlagError> {
//!     let flags = Flags::builder()
//!         .store(SuiteStore::in_memory())
//!         .arguments(LaunchArguments::empty())
//!         .build();
//!
//!     assert!(flags.value(&DROP_SPAM, "app.main")?);
//!
//!     flags.set_value(&DROP_SPAM, "app.main", false)?;
//!     assert!(!flags.value(&DROP_SPAM, "app.main")?);
//!     assert!(flags.is_defined(&DROP_SPAM, "app.main")?);
//!
//!     flags.unset(&DROP_SPAM, "app.main")?;
//!     assert!(flags.value(&DROP_SPAM, "app.main")?);
//!     assert!(!flags.is_defined(&DROP_SPAM, "app.main")?);
//!
//!     Ok(())
//! }
//! ```

mod builder;
mod domain;
mod error;
mod registry;
mod resolve;

pub use builder::FlagsBuilder;
pub use domain::FlagDomain;
pub use error::{FlagError, FlagErrorExt};
pub use registry::Flags;
