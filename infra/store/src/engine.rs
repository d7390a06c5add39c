use crate::builder::SuiteStoreBuilder;
use crate::error::{StoreError, StoreErrorExt};
use crate::maintenance;
use crate::name;
use crate::notify::{self, NotifierHandle, SubscriberRegistry, Subscription};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// A loosely-typed mapping of keys to persisted JSON values.
pub type Dictionary = serde_json::Map<String, Value>;

/// The internal shared state of a [`SuiteStore`] instance.
#[derive(Debug)]
pub struct StoreInner {
    /// Canonicalized directory holding one JSON file per suite.
    /// `None` keeps every suite in memory only.
    pub(crate) root: Option<PathBuf>,
    /// Loaded suites: suite name to domain key to dictionary.
    pub(crate) suites: RwLock<FxHashMap<String, FxHashMap<String, Dictionary>>>,
    /// Change subscribers keyed by (suite, domain key).
    pub(crate) subscribers: SubscriberRegistry,
    /// Queue feeding the notifier thread.
    pub(crate) notifier: NotifierHandle,
    /// A unique counter used to generate temporary file names.
    pub(crate) tmp_counter: AtomicU64,
}

/// The primary thread-safe handle of the store.
///
/// Cloning is inexpensive: clones share the same suite state, subscriber
/// registry and notifier thread. The notifier thread exits on its own once
/// the last handle is dropped.
#[derive(Debug, Clone)]
pub struct SuiteStore {
    inner: Arc<StoreInner>,
}

impl Deref for SuiteStore {
    type Target = StoreInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl SuiteStore {
    /// Creates a new [`SuiteStoreBuilder`] for configuring a file-backed store.
    #[must_use = "The store is not opened until you call .open()"]
    pub fn builder() -> SuiteStoreBuilder {
        SuiteStoreBuilder::new()
    }

    /// Creates an ephemeral store keeping every suite in memory.
    ///
    /// Writes skip persistence but keep their atomic replace-and-notify
    /// semantics, so the two modes are interchangeable for consumers.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(None)
    }

    pub(crate) fn open_at(root: PathBuf) -> Self {
        Self::new(Some(root))
    }

    fn new(root: Option<PathBuf>) -> Self {
        let inner = Arc::new_cyclic(|weak| StoreInner {
            root,
            suites: RwLock::default(),
            subscribers: SubscriberRegistry::default(),
            notifier: notify::spawn(weak.clone()),
            tmp_counter: AtomicU64::new(1),
        });
        Self { inner }
    }

    /// Loads a suite into memory, starting empty when no file exists yet.
    ///
    /// Idempotent: a suite that is already loaded is left untouched, so
    /// calling this again never clobbers writes made in the meantime.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidName`] if the suite name fails validation.
    /// Returns [`StoreError::Io`] if the suite file exists but cannot be read.
    /// Returns [`StoreError::Malformed`] if the suite file is not valid JSON.
    /// These are non-recoverable configuration errors: a store that cannot
    /// load a suite cannot answer for it.
    pub fn open_suite(&self, suite: &str) -> Result<(), StoreError> {
        name::validate_suite(suite)?;

        {
            let suites = self.suites.read();
            if suites.contains_key(suite) {
                return Ok(());
            }
        }

        let loaded = self.load_suite(suite)?;

        let mut suites = self.suites.write();
        if !suites.contains_key(suite) {
            debug!(suite, domains = loaded.len(), "Suite loaded");
            suites.insert(suite.to_owned(), loaded);
        }

        Ok(())
    }

    /// Current dictionary for a domain key within a suite.
    ///
    /// Total and purely in-memory: unknown suites and domain keys yield an
    /// empty dictionary.
    #[must_use]
    pub fn read(&self, suite: &str, domain_key: &str) -> Dictionary {
        let suites = self.suites.read();
        suites.get(suite).and_then(|data| data.get(domain_key)).cloned().unwrap_or_default()
    }

    /// Whether a key is present in the dictionary for (suite, domain key).
    #[must_use]
    pub fn contains(&self, suite: &str, domain_key: &str, key: &str) -> bool {
        let suites = self.suites.read();
        suites
            .get(suite)
            .and_then(|data| data.get(domain_key))
            .is_some_and(|dictionary| dictionary.contains_key(key))
    }

    /// Replaces the dictionary for a domain key and queues a change
    /// notification for its subscribers.
    ///
    /// The suite is loaded on demand. File-backed stores persist the whole
    /// suite atomically before the in-memory state is swapped: when
    /// persistence fails, memory keeps the previous dictionary and no
    /// notification is sent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidName`] if the suite name or domain key
    /// fails validation.
    /// Returns [`StoreError::Io`] if the suite file cannot be replaced.
    pub fn write(
        &self,
        suite: &str,
        domain_key: &str,
        entries: Dictionary,
    ) -> Result<(), StoreError> {
        name::validate_suite(suite)?;
        name::validate_domain_key(domain_key)?;
        self.open_suite(suite)?;

        {
            let mut suites = self.suites.write();
            let data = suites.entry(suite.to_owned()).or_default();

            if let Some(root) = &self.root {
                let mut document = Dictionary::new();
                for (key, dictionary) in data.iter() {
                    if key != domain_key {
                        document.insert(key.clone(), Value::Object(dictionary.clone()));
                    }
                }
                document.insert(domain_key.to_owned(), Value::Object(entries.clone()));
                self.persist(root, suite, &document)?;
            }

            data.insert(domain_key.to_owned(), entries);
        }

        debug!(suite, domain_key, "Dictionary replaced");
        self.notifier.notify(suite, domain_key);

        Ok(())
    }

    /// Registers a callback invoked whenever the dictionary for
    /// (suite, domain key) changes, including changes made through this
    /// very handle.
    ///
    /// Callbacks run on the dedicated notifier thread while no store lock is
    /// held, so they are free to call back into the store. Subscribers for
    /// the same (suite, domain key) are invoked in registration order. The
    /// dictionary passed to the callback is the current one at delivery
    /// time: rapid successive writes may coalesce into fewer invocations,
    /// but the last delivered state always matches the last write.
    #[must_use = "Dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, suite: &str, domain_key: &str, callback: F) -> Subscription
    where
        F: Fn(&Dictionary) + Send + Sync + 'static,
    {
        self.subscribers.register(&self.inner, suite, domain_key, callback)
    }

    pub(crate) fn purge_tmp(&self) {
        if let Some(root) = &self.root {
            maintenance::purge_tmp(root);
        }
    }

    fn load_suite(&self, suite: &str) -> Result<FxHashMap<String, Dictionary>, StoreError> {
        let Some(root) = &self.root else {
            return Ok(FxHashMap::default());
        };

        let path = suite_path(root, suite);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(suite, "No suite file yet, starting empty");
                return Ok(FxHashMap::default());
            },
            Err(err) => {
                return Err(StoreError::Io {
                    source: err,
                    context: Some(format!("Failed to read suite file: {}", path.display()).into()),
                });
            },
        };

        let document: Dictionary = serde_json::from_slice(&raw)
            .context(format!("Failed to parse suite file: {}", path.display()))?;

        let mut data = FxHashMap::default();
        for (domain_key, value) in document {
            match value {
                Value::Object(dictionary) => {
                    data.insert(domain_key, dictionary);
                },
                _ => {
                    warn!(suite, %domain_key, "Ignoring non-object domain entry in suite file");
                },
            }
        }

        Ok(data)
    }

    fn persist(&self, root: &Path, suite: &str, document: &Dictionary) -> Result<(), StoreError> {
        let target = suite_path(root, suite);
        let tmp = unique_tmp_path(&target, &self.tmp_counter);

        let payload = serde_json::to_vec_pretty(document)
            .context(format!("Failed to serialize suite: {suite}"))?;

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&tmp)
                .context(format!("Temp creation failed: {}", tmp.display()))?;
            file.write_all(&payload).context("Write failed")?;
            file.sync_all().context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&tmp, &target) {
            // Windows refuses to rename over an existing file.
            if err.kind() == std::io::ErrorKind::AlreadyExists {
                fs::remove_file(&target)
                    .context(format!("Failed to replace existing file: {}", target.display()))?;
                fs::rename(&tmp, &target).context(format!(
                    "Atomic swap failed: {} -> {}",
                    tmp.display(),
                    target.display()
                ))?;
            } else {
                return Err(StoreError::Io {
                    source: err,
                    context: Some(
                        format!("Atomic swap failed: {} -> {}", tmp.display(), target.display())
                            .into(),
                    ),
                });
            }
        }

        sync_dir(root);
        debug!(path = %target.display(), "Suite saved atomically");

        Ok(())
    }
}

fn suite_path(root: &Path, suite: &str) -> PathBuf {
    root.join(format!("{suite}.json"))
}

/// Generates a unique temporary path next to the target file.
fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let counter = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|name| name.to_str()).unwrap_or("suite");
    target.with_file_name(format!("{file_name}.swbtmp.{counter}"))
}

/// Best-effort directory sync so the rename itself survives a crash.
fn sync_dir(path: &Path) {
    match fs::File::open(path) {
        Ok(dir) => {
            if let Err(err) = dir.sync_all() {
                warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Directory open failed");
        },
    }
}
