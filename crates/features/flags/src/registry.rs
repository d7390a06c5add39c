use crate::builder::FlagsBuilder;
use crate::domain::FlagDomain;
use crate::error::FlagError;
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::ops::Deref;
use std::sync::Arc;
use swb_domain::{BuildMode, DomainTag, FlagDescriptor, LaunchArguments};
use swb_store::SuiteStore;
use tracing::debug;

/// The internal shared state of a [`Flags`] instance.
#[derive(Debug)]
pub struct FlagsInner {
    pub(crate) store: SuiteStore,
    pub(crate) arguments: LaunchArguments,
    pub(crate) build_mode: BuildMode,
    /// Domains created so far: tag to suite to domain.
    pub(crate) domains: Mutex<FxHashMap<DomainTag, FxHashMap<String, Arc<FlagDomain>>>>,
}

/// The primary thread-safe handle for flag evaluation.
///
/// `Flags` owns the domain registry: the process-wide mapping from
/// (domain tag, suite) to the single [`FlagDomain`] evaluating that pair.
/// Cloning is inexpensive and shares the registry, the store handle and the
/// captured launch arguments.
#[derive(Debug, Clone)]
pub struct Flags {
    pub(crate) inner: Arc<FlagsInner>,
}

impl Deref for Flags {
    type Target = FlagsInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Flags {
    /// Creates a new [`FlagsBuilder`] for configuring an evaluator.
    #[must_use = "The evaluator is not created until you call .build()"]
    pub fn builder() -> FlagsBuilder {
        FlagsBuilder::new()
    }

    /// Returns the domain for (tag, suite), creating it on first use.
    ///
    /// Lookup and construction are serialized: two concurrent first accesses
    /// for the same pair always receive the identical instance.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::Store`] if a new domain's suite cannot be opened.
    pub fn domain(&self, tag: DomainTag, suite: &str) -> Result<Arc<FlagDomain>, FlagError> {
        let mut domains = self.domains.lock();

        if let Some(domain) = domains.get(&tag).and_then(|suites| suites.get(suite)) {
            return Ok(Arc::clone(domain));
        }

        let domain =
            FlagDomain::open(tag, suite, &self.store, self.arguments.clone(), self.build_mode)?;
        domains.entry(tag).or_default().insert(suite.to_owned(), Arc::clone(&domain));
        debug!(suite, tag = %tag, "Flag domain registered");

        Ok(domain)
    }

    /// Resolved value of a flag within a suite.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::Store`] if the flag's domain has to be created
    /// and its suite cannot be opened. Evaluation itself is total.
    pub fn value(&self, descriptor: &FlagDescriptor, suite: &str) -> Result<bool, FlagError> {
        Ok(self.domain(descriptor.tag(), suite)?.value(descriptor))
    }

    /// Persists `value` as the flag's override within a suite.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::Store`] if the suite cannot be opened or the
    /// override cannot be persisted.
    pub fn set_value(
        &self,
        descriptor: &FlagDescriptor,
        suite: &str,
        value: bool,
    ) -> Result<(), FlagError> {
        self.domain(descriptor.tag(), suite)?.set_value(descriptor, value)
    }

    /// Removes the flag's persisted override within a suite.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::Store`] if the suite cannot be opened or the
    /// removal cannot be persisted.
    pub fn unset(&self, descriptor: &FlagDescriptor, suite: &str) -> Result<(), FlagError> {
        self.domain(descriptor.tag(), suite)?.unset(descriptor)
    }

    /// Whether the suite currently persists an override for the flag.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::Store`] if the flag's domain has to be created
    /// and its suite cannot be opened.
    pub fn is_defined(&self, descriptor: &FlagDescriptor, suite: &str) -> Result<bool, FlagError> {
        Ok(self.domain(descriptor.tag(), suite)?.is_defined(descriptor))
    }

    /// All descriptors discovered so far across both domain tags of a suite,
    /// sorted by key.
    ///
    /// Flags are discovered on first evaluation: a flag never read or
    /// written in this process does not appear.
    #[must_use]
    pub fn all_flags(&self, suite: &str) -> Vec<FlagDescriptor> {
        let domains = self.domains.lock();

        let mut flags: Vec<FlagDescriptor> = [DomainTag::Feature, DomainTag::Debugging]
            .into_iter()
            .filter_map(|tag| domains.get(&tag).and_then(|suites| suites.get(suite)))
            .flat_map(|domain| domain.descriptors())
            .collect();
        flags.sort_by(|a, b| a.key().cmp(b.key()));

        flags
    }
}
