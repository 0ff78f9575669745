// ── Observable state container ──
//
// A single current value plus two ways to follow it: synchronous callbacks
// (invoked on registration and after every change) and `watch`-backed
// streams for async consumers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::watch;

use crate::stream::StateStream;

type Callback<S> = Arc<dyn Fn(&Arc<S>) + Send + Sync>;

struct Registry<S> {
    next_id: u64,
    callbacks: Vec<(u64, Callback<S>)>,
}

fn lock<S>(registry: &Mutex<Registry<S>>) -> MutexGuard<'_, Registry<S>> {
    // A panicking subscriber must not take the whole store down with it.
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holder of an immutable state snapshot with subscribe/notify.
///
/// State is never mutated in place: every change publishes a fresh
/// `Arc<S>`, so `Arc::ptr_eq` on two snapshots tells whether anything
/// changed between them.
pub struct Observable<S: Send + Sync + 'static> {
    state: watch::Sender<Arc<S>>,
    registry: Arc<Mutex<Registry<S>>>,
}

impl<S: Send + Sync + 'static> Observable<S> {
    pub fn new(initial: S) -> Self {
        let (state, _) = watch::channel(Arc::new(initial));
        Self {
            state,
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                callbacks: Vec::new(),
            })),
        }
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn get_state(&self) -> Arc<S> {
        self.state.borrow().clone()
    }

    /// Register `callback`. It runs immediately with the current snapshot,
    /// then synchronously after every change until the returned
    /// [`Subscription`] is dropped or unsubscribed.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Arc<S>) + Send + Sync + 'static,
    {
        let callback: Callback<S> = Arc::new(callback);
        let id = {
            let mut registry = lock(&self.registry);
            let id = registry.next_id;
            registry.next_id += 1;
            registry.callbacks.push((id, Arc::clone(&callback)));
            id
        };

        callback(&self.get_state());

        let registry: Weak<Mutex<Registry<S>>> = Arc::downgrade(&self.registry);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    lock(&registry).callbacks.retain(|(cb_id, _)| *cb_id != id);
                }
            })),
        }
    }

    /// Async view of the same state for `select!`/`Stream` consumers.
    pub fn watch(&self) -> StateStream<S> {
        StateStream::new(self.state.subscribe())
    }

    /// Receiver that always borrows the newest published snapshot.
    pub(crate) fn receiver(&self) -> watch::Receiver<Arc<S>> {
        self.state.subscribe()
    }

    /// Replace the state wholesale and notify subscribers.
    ///
    /// Publishers on different threads are not serialized against each
    /// other's callbacks; a callback that needs the newest value should read
    /// [`get_state`](Self::get_state) instead of trusting its argument.
    pub fn set_state(&self, next: S) {
        let next = Arc::new(next);
        self.state.send_replace(Arc::clone(&next));
        self.notify(&next);
    }

    /// Atomically derive a new state from the current one and publish it.
    ///
    /// `f` runs while the state is write-locked; it must not call back into
    /// this observable.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&S) -> S,
    {
        let mut published = None;
        self.state.send_modify(|current| {
            let next = Arc::new(f(current));
            *current = Arc::clone(&next);
            published = Some(next);
        });
        if let Some(next) = published {
            self.notify(&next);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).callbacks.len()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Invoke every callback outside the registry lock, so callbacks may
    /// subscribe, unsubscribe, or read state themselves.
    fn notify(&self, state: &Arc<S>) {
        let callbacks: Vec<Callback<S>> = lock(&self.registry)
            .callbacks
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(state);
        }
    }
}

impl<S: Default + Send + Sync + 'static> Default for Observable<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

/// Handle returned by [`Observable::subscribe`]. Dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unsubscribes the callback"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Stop receiving notifications.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keep the callback registered for the lifetime of the observable.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
