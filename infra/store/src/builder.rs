use crate::engine::SuiteStore;
use crate::error::{StoreError, StoreErrorExt};
use private::Sealed;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
struct StoreConfig {
    create: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { create: true }
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct SuiteStoreBuilder<S: Sealed = NoRoot> {
    state: S,
    config: StoreConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> SuiteStoreBuilder<S> {
    #[must_use = "Sets whether the store root should be created if it does not exist"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.config.create = enable;
        self
    }

    fn transition<N: Sealed>(self, state: N) -> SuiteStoreBuilder<N> {
        SuiteStoreBuilder { state, config: self.config }
    }
}

impl SuiteStoreBuilder<NoRoot> {
    #[must_use = "Creates a new store builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the root directory path for the store"]
    pub fn root(self, path: impl Into<PathBuf>) -> SuiteStoreBuilder<WithRoot> {
        self.transition(WithRoot(path.into()))
    }
}

impl SuiteStoreBuilder<WithRoot> {
    /// Consumes the configuration and opens the file-backed store.
    ///
    /// This method performs the following boot sequence:
    /// 1. **Bootstrapping**: Creates the root directory if `create(true)` was set.
    /// 2. **Canonicalization**: Resolves the root path to an absolute, physical path
    ///    on disk so suite files can never land elsewhere.
    /// 3. **Self-Healing**: Scans the root for orphaned temporary files left behind
    ///    by previous system crashes and removes them to reclaim space.
    /// 4. **Registration**: Returns a thread-safe [`SuiteStore`] handle.
    ///
    /// # Reliability
    ///
    /// The self-healing routine is non-critical; if cleanup fails (e.g., due to
    /// transient file locks), the initialization will still proceed, but a
    /// warning will be logged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if:
    /// - The root directory does not exist and `create` is false.
    /// - The process lacks permissions to create or resolve the root directory.
    pub fn open(self) -> Result<SuiteStore, StoreError> {
        let root = &self.state.0;

        if self.config.create {
            fs::create_dir_all(root)
                .context(format!("Failed to bootstrap store root: {}", root.display()))?;
            info!(path = %root.display(), "Bootstrapped store root directory");
        }

        let canonical = fs::canonicalize(root)
            .context(format!("Failed to resolve store root: {}", root.display()))?;

        let store = SuiteStore::open_at(canonical);
        store.purge_tmp();

        Ok(store)
    }
}
