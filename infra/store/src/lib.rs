//! A suite-scoped dictionary store with durable writes and change notifications.
//! Each suite is a named collection of dictionaries, keyed by a domain key and
//! persisted as a single JSON file. The whole suite lives in memory once opened,
//! so reads never touch the filesystem. All examples use temporary directories
//! to avoid writing to the real filesystem.
//!
//! # Core Features
//!
//! - **In-Memory Reads**: A suite is loaded once; every read afterwards is a plain map lookup.
//! - **Atomic Writes**: Uses an "atomic swap" pattern (unique temp write + `fsync` + `rename`) to prevent data corruption during crashes.
//! - **Change Notifications**: Subscribers are invoked on a dedicated thread whenever a dictionary is replaced, in registration order.
//! - **Ephemeral Mode**: An in-memory store with identical semantics and no filesystem footprint.
//! - **Self-Healing**: Automatically identifies and cleans up orphaned temporary files during initialization.
//!
//! # Architectural Overview
//!
//! The crate follows a layered approach:
//! 1.  **[`SuiteStore`]**: The primary thread-safe handle and entry point.
//! 2.  **[`SuiteStoreBuilder`]**: A type-safe fluent builder for configuration.
//! 3.  **[`Subscription`]**: An RAII handle tying a change callback to its registration.
//!
//! # Examples
//!
//! ```rust
//! use swb_store::{Dictionary, StoreError, SuiteStore};
//!
//! fn main() -> Result<(), StoreError> {
//!     // Use a temp directory for examples/tests
//!     # let tmp = tempfile::tempdir().unwrap();
//!     # let root = tmp.path().join("flags");
//!     let store = SuiteStore::builder().root(&root).create(true).open()?;
//!
//!     store.open_suite("app.main")?;
//!
//!     // Replace a dictionary atomically
//!     let mut overrides = Dictionary::new();
//!     overrides.insert("drop-spam".into(), serde_json::Value::Bool(true));
//!     store.write("app.main", "feature-flags", overrides)?;
//!
//!     // Reads are in-memory lookups
//!     assert!(store.contains("app.main", "feature-flags", "drop-spam"));
//!     assert!(store.read("app.main", "feature-flags")["drop-spam"].as_bool().unwrap());
//!
//!     Ok(())
//! }
//! ```
//!
//! ```rust
//! # use swb_store::{Dictionary, StoreError, SuiteStore};
//! # fn main() -> Result<(), StoreError> {
//! let store = SuiteStore::in_memory();
//! store.open_suite("scratch")?;
//!
//! let _watch = store.subscribe("scratch", "feature-flags", |dictionary| {
//!     println!("{} entries changed", dictionary.len());
//! });
//!
//! store.write("scratch", "feature-flags", Dictionary::new())?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod engine;
mod error;
mod maintenance;
mod name;
mod notify;

pub use builder::SuiteStoreBuilder;
pub use engine::{Dictionary, SuiteStore};
pub use error::{StoreError, StoreErrorExt};
pub use notify::Subscription;
