use crate::error::FlagError;
use crate::resolve;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::{Arc, Weak};
use swb_domain::{BuildMode, DomainTag, FlagDescriptor, LaunchArguments};
use swb_store::{Dictionary, Subscription, SuiteStore};
use tracing::{debug, trace, warn};

/// Mutable per-domain state, kept behind one lock so a reader never observes
/// a half-applied update.
///
/// The cache never holds a key absent from the descriptor registry.
#[derive(Debug, Default)]
struct DomainState {
    /// Resolved values, populated lazily on first read.
    cache: FxHashMap<String, bool>,
    /// First-seen descriptor per key; later registrations are ignored.
    descriptors: FxHashMap<String, FlagDescriptor>,
}

/// Evaluates the flags of one domain tag within one suite.
///
/// A domain owns the resolution cache and descriptor registry for its
/// (tag, suite) pair and keeps them consistent with the persisted store:
/// it subscribes to store change notifications at construction time and
/// recomputes affected cache entries when the persisted dictionary changes,
/// whether the change came from this process or an external one.
///
/// At most one instance exists per (tag, suite) pair; construction goes
/// through the [`Flags`](crate::Flags) registry, which enforces that.
#[derive(Debug)]
pub struct FlagDomain {
    tag: DomainTag,
    suite: String,
    store: SuiteStore,
    arguments: LaunchArguments,
    build_mode: BuildMode,
    state: RwLock<DomainState>,
    _subscription: Subscription,
}

impl FlagDomain {
    /// Opens the domain's suite in the store and subscribes to changes on
    /// its dictionary.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::Store`] if the suite cannot be opened. This is a
    /// non-recoverable configuration error: no flag in the suite could ever
    /// be evaluated.
    pub(crate) fn open(
        tag: DomainTag,
        suite: &str,
        store: &SuiteStore,
        arguments: LaunchArguments,
        build_mode: BuildMode,
    ) -> Result<Arc<Self>, FlagError> {
        store.open_suite(suite)?;

        let domain = Arc::new_cyclic(|weak: &Weak<Self>| {
            let handle = weak.clone();
            let subscription = store.subscribe(suite, tag.domain_key(), move |snapshot| {
                if let Some(domain) = handle.upgrade() {
                    domain.apply_snapshot(snapshot);
                }
            });

            Self {
                tag,
                suite: suite.to_owned(),
                store: store.clone(),
                arguments,
                build_mode,
                state: RwLock::default(),
                _subscription: subscription,
            }
        });

        debug!(suite, tag = %tag, "Flag domain opened");
        Ok(domain)
    }

    /// Resolved value for the flag, registering the descriptor on first
    /// sight.
    ///
    /// Cached resolutions are served from memory; a miss reads the persisted
    /// dictionary, runs precedence resolution and caches the result. Total:
    /// the caller always receives a boolean.
    pub fn value(&self, descriptor: &FlagDescriptor) -> bool {
        let key = descriptor.key();

        {
            let state = self.state.read();
            if let Some(&value) = state.cache.get(key) {
                trace!(suite = %self.suite, key, value, "Cache hit");
                return value;
            }
        }

        let mut state = self.state.write();
        // Another thread may have populated the key while we waited.
        if let Some(&value) = state.cache.get(key) {
            return value;
        }

        self.register(&mut state, descriptor);

        let snapshot = self.store.read(&self.suite, self.tag.domain_key());
        let priority = snapshot.get(key).and_then(Value::as_bool);
        let value = resolve::resolve(descriptor, &self.arguments, self.build_mode, priority);

        state.cache.insert(key.to_owned(), value);
        debug!(suite = %self.suite, key, value, "Flag resolved");

        value
    }

    /// Persists `value` as the flag's override and caches it, as one unit
    /// relative to concurrent operations on this domain.
    ///
    /// The override is recorded unconditionally; higher-precedence sources
    /// (launch arguments, the release-mode debugging restriction) reassert
    /// themselves when the store's change notification is applied.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::Store`] if persisting fails; the cache keeps its
    /// previous value in that case.
    pub fn set_value(&self, descriptor: &FlagDescriptor, value: bool) -> Result<(), FlagError> {
        let key = descriptor.key();

        let mut state = self.state.write();
        self.register(&mut state, descriptor);

        let mut snapshot = self.store.read(&self.suite, self.tag.domain_key());
        snapshot.insert(key.to_owned(), Value::Bool(value));
        self.store.write(&self.suite, self.tag.domain_key(), snapshot)?;

        state.cache.insert(key.to_owned(), value);
        debug!(suite = %self.suite, key, value, "Flag override persisted");

        Ok(())
    }

    /// Removes the flag's persisted override and recomputes its resolution
    /// without a priority value.
    ///
    /// Recomputing runs full precedence resolution, so a matching launch
    /// argument reasserts itself the moment the override is gone.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::Store`] if persisting the removal fails.
    pub fn unset(&self, descriptor: &FlagDescriptor) -> Result<(), FlagError> {
        let key = descriptor.key();

        let mut state = self.state.write();
        self.register(&mut state, descriptor);

        let mut snapshot = self.store.read(&self.suite, self.tag.domain_key());
        if snapshot.remove(key).is_some() {
            self.store.write(&self.suite, self.tag.domain_key(), snapshot)?;
        }

        let value = resolve::resolve(descriptor, &self.arguments, self.build_mode, None);
        state.cache.insert(key.to_owned(), value);
        debug!(suite = %self.suite, key, value, "Flag override removed");

        Ok(())
    }

    /// Whether the persisted dictionary currently holds an entry for the
    /// flag, independent of cache state.
    pub fn is_defined(&self, descriptor: &FlagDescriptor) -> bool {
        self.store.contains(&self.suite, self.tag.domain_key(), descriptor.key())
    }

    /// Descriptors discovered so far, in no particular order.
    pub fn descriptors(&self) -> Vec<FlagDescriptor> {
        self.state.read().descriptors.values().cloned().collect()
    }

    /// Reconciles the cache with a fresh persisted dictionary snapshot.
    ///
    /// Every registered descriptor is re-resolved: a well-formed boolean in
    /// the snapshot becomes its priority value, anything else (malformed or
    /// absent) resolves with no priority and falls back to arguments and the
    /// default. Keys without a descriptor are ignored; they have not been
    /// discovered yet.
    pub(crate) fn apply_snapshot(&self, snapshot: &Dictionary) {
        let mut state = self.state.write();
        let DomainState { cache, descriptors } = &mut *state;

        for (key, descriptor) in descriptors.iter() {
            let priority = snapshot.get(key).and_then(Value::as_bool);
            let value = resolve::resolve(descriptor, &self.arguments, self.build_mode, priority);
            let stale = cache.insert(key.clone(), value);
            if stale != Some(value) {
                trace!(suite = %self.suite, key, value, "Flag recomputed after change");
            }
        }
    }

    fn register(&self, state: &mut DomainState, descriptor: &FlagDescriptor) {
        let key = descriptor.key();

        if let Some(existing) = state.descriptors.get(key) {
            if existing != descriptor {
                warn!(
                    suite = %self.suite,
                    key,
                    "Conflicting descriptor for an already-registered key, keeping the first"
                );
            }
            return;
        }

        if descriptor.tag() != self.tag {
            warn!(suite = %self.suite, key, "Descriptor tag does not match this domain");
        }

        state.descriptors.insert(key.to_owned(), descriptor.clone());
    }
}
