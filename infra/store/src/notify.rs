use crate::engine::{Dictionary, StoreInner};
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Weak};
use std::thread;
use tracing::{debug, trace, warn};

type Callback = Arc<dyn Fn(&Dictionary) + Send + Sync>;

/// (suite, domain key) routing key for subscriptions and notifications.
type RouteKey = (String, String);

/// Registered change subscribers, keyed by route.
///
/// Vectors keep registration order: delivery walks each vector front to back.
#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    entries: Mutex<FxHashMap<RouteKey, Vec<(u64, Callback)>>>,
    next_token: AtomicU64,
}

impl SubscriberRegistry {
    pub(crate) fn register<F>(
        &self,
        store: &Arc<StoreInner>,
        suite: &str,
        domain_key: &str,
        callback: F,
    ) -> Subscription
    where
        F: Fn(&Dictionary) + Send + Sync + 'static,
    {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let route = (suite.to_owned(), domain_key.to_owned());

        self.entries.lock().entry(route.clone()).or_default().push((token, Arc::new(callback)));
        trace!(suite, domain_key, token, "Subscriber registered");

        Subscription { token, route, store: Arc::downgrade(store) }
    }

    pub(crate) fn unregister(&self, route: &RouteKey, token: u64) {
        let mut entries = self.entries.lock();
        if let Some(subscribers) = entries.get_mut(route) {
            subscribers.retain(|(candidate, _)| *candidate != token);
            if subscribers.is_empty() {
                entries.remove(route);
            }
        }
    }

    fn snapshot(&self, route: &RouteKey) -> Vec<Callback> {
        self.entries
            .lock()
            .get(route)
            .map(|subscribers| subscribers.iter().map(|(_, callback)| callback.clone()).collect())
            .unwrap_or_default()
    }
}

impl fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRegistry").finish_non_exhaustive()
    }
}

/// Sending half of the notification queue, owned by the store.
///
/// Dropping the store drops this handle, which disconnects the channel and
/// lets the notifier thread exit on its own.
#[derive(Debug)]
pub(crate) struct NotifierHandle {
    queue: Sender<RouteKey>,
}

impl NotifierHandle {
    pub(crate) fn notify(&self, suite: &str, domain_key: &str) {
        if self.queue.send((suite.to_owned(), domain_key.to_owned())).is_err() {
            warn!(suite, domain_key, "Notifier thread is gone, dropping change notification");
        }
    }
}

/// Spawns the detached notifier thread and returns its queue handle.
///
/// The thread holds only a [`Weak`] reference to the store, so it never keeps
/// the store alive by itself.
pub(crate) fn spawn(store: Weak<StoreInner>) -> NotifierHandle {
    let (queue, events) = mpsc::channel();

    let spawned = thread::Builder::new()
        .name("swb-store-notify".into())
        .spawn(move || deliver_loop(&store, &events));
    if let Err(err) = spawned {
        warn!(error = %err, "Failed to spawn notifier thread, change notifications are disabled");
    }

    NotifierHandle { queue }
}

fn deliver_loop(store: &Weak<StoreInner>, events: &Receiver<RouteKey>) {
    while let Ok(route) = events.recv() {
        let Some(store) = store.upgrade() else {
            break;
        };

        // Read the current dictionary at delivery time. Queued events for the
        // same route collapse into repeated deliveries of the latest state,
        // so a stale snapshot can never overwrite a newer write downstream.
        let contents = {
            let suites = store.suites.read();
            suites.get(&route.0).and_then(|data| data.get(&route.1)).cloned().unwrap_or_default()
        };
        let callbacks = store.subscribers.snapshot(&route);
        drop(store);

        trace!(
            suite = %route.0,
            domain_key = %route.1,
            subscribers = callbacks.len(),
            "Delivering change notification"
        );

        // No lock is held here: callbacks may freely call back into the store.
        for callback in callbacks {
            callback(&contents);
        }
    }

    debug!("Notifier thread stopped");
}

/// A registered change subscription.
///
/// The callback stays registered for as long as this handle is alive;
/// dropping it removes the callback from the store.
#[derive(Debug)]
#[must_use = "Dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    token: u64,
    route: RouteKey,
    store: Weak<StoreInner>,
}

impl Subscription {
    /// Removes the callback from the store. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.subscribers.unregister(&self.route, self.token);
            trace!(suite = %self.route.0, domain_key = %self.route.1, "Subscriber removed");
        }
    }
}
