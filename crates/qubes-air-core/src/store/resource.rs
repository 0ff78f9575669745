// ── Generic resource store ──
//
// One reconciliation engine shared by every collection. The API seam is the
// `ResourceApi` trait; the zone and qube stores only add their state
// transition endpoints on top.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use qubes_air_api::{Error, ListOptions, Resource};
use tracing::{debug, warn};

use super::state::CollectionState;
use crate::config::LoadOrdering;
use crate::observable::{Observable, Subscription};
use crate::stream::StateStream;
use crate::views::DerivedView;

/// The remote operations a [`ResourceStore`] needs for one collection.
pub trait ResourceApi: Send + Sync + 'static {
    type Entity: Resource;
    type Create: Send + Sync;
    type Update: Send + Sync;

    fn list(
        &self,
        options: &ListOptions,
    ) -> impl Future<Output = Result<Vec<Self::Entity>, Error>> + Send;

    fn create(
        &self,
        request: &Self::Create,
    ) -> impl Future<Output = Result<Self::Entity, Error>> + Send;

    fn update(
        &self,
        id: &str,
        request: &Self::Update,
    ) -> impl Future<Output = Result<Self::Entity, Error>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Client-side cache of one server collection plus its loading/error flags.
///
/// Operations are not serialized against each other: concurrent calls
/// reconcile in completion order. Only `load` swallows errors (into the
/// `error` field); every other operation returns them unmodified and leaves
/// the collection as it was.
pub struct ResourceStore<A: ResourceApi> {
    api: A,
    state: Observable<CollectionState<A::Entity>>,
    ordering: LoadOrdering,
    load_seq: AtomicU64,
}

impl<A: ResourceApi> ResourceStore<A> {
    pub fn new(api: A, ordering: LoadOrdering) -> Self {
        Self {
            api,
            state: Observable::default(),
            ordering,
            load_seq: AtomicU64::new(0),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn state(&self) -> Arc<CollectionState<A::Entity>> {
        self.state.get_state()
    }

    pub fn items(&self) -> Vec<Arc<A::Entity>> {
        self.state.get_state().items.clone()
    }

    pub fn get(&self, id: &str) -> Option<Arc<A::Entity>> {
        self.state.get_state().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.get_state().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.get_state().is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.state.get_state().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.get_state().error.clone()
    }

    /// Register a callback; it fires immediately and after every change.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Arc<CollectionState<A::Entity>>) + Send + Sync + 'static,
    {
        self.state.subscribe(callback)
    }

    pub fn watch(&self) -> StateStream<CollectionState<A::Entity>> {
        self.state.watch()
    }

    pub fn observable(&self) -> &Observable<CollectionState<A::Entity>> {
        &self.state
    }

    /// A cached projection of this store, recomputed on every change.
    pub fn derive<T, F>(&self, project: F) -> DerivedView<T>
    where
        T: Send + Sync + 'static,
        F: Fn(&CollectionState<A::Entity>) -> T + Send + Sync + 'static,
    {
        DerivedView::new(&self.state, project)
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Replace the collection with the server's list.
    ///
    /// Failure is recorded in `error`; existing items are kept.
    pub async fn load(&self, options: &ListOptions) {
        let kind = A::Entity::KIND;
        let token = self.load_seq.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(kind, token, "loading collection");

        self.state.update(CollectionState::loading_started);
        let result = self.api.list(options).await;

        if self.ordering == LoadOrdering::LatestRequest
            && self.load_seq.load(Ordering::SeqCst) != token
        {
            debug!(kind, token, "discarding response to superseded load");
            return;
        }

        match result {
            Ok(items) => {
                debug!(kind, count = items.len(), "collection loaded");
                self.state.update(|s| s.loaded(items));
            }
            Err(e) => {
                warn!(kind, error = %e, "failed to load collection");
                let message = e.message();
                self.state.update(|s| s.load_failed(message));
            }
        }
    }

    /// Create on the server, then append the confirmed entity.
    pub async fn create(&self, request: &A::Create) -> Result<Arc<A::Entity>, Error> {
        let kind = A::Entity::KIND;
        let created = Arc::new(self.api.create(request).await.inspect_err(|e| {
            warn!(kind, error = %e, "create rejected");
        })?);
        debug!(kind, id = created.id(), "created");

        self.state.update(|s| s.appended(Arc::clone(&created)));
        Ok(created)
    }

    /// Patch on the server, then replace the matching entry in place.
    pub async fn update(&self, id: &str, request: &A::Update) -> Result<Arc<A::Entity>, Error> {
        self.reconcile(id, "update", self.api.update(id, request))
            .await
    }

    /// Delete on the server, then drop the matching entry.
    pub async fn remove(&self, id: &str) -> Result<(), Error> {
        let kind = A::Entity::KIND;
        self.api.delete(id).await.inspect_err(|e| {
            warn!(kind, id, error = %e, "delete rejected");
        })?;
        debug!(kind, id, "deleted");

        self.state.update(|s| s.without(id));
        Ok(())
    }

    pub fn clear_error(&self) {
        self.state.update(CollectionState::error_cleared);
    }

    /// Back to the empty initial state in a single notification.
    ///
    /// Also invalidates in-flight loads under [`LoadOrdering::LatestRequest`].
    pub fn reset(&self) {
        self.load_seq.fetch_add(1, Ordering::SeqCst);
        self.state.set_state(CollectionState::default());
        debug!(kind = A::Entity::KIND, "store reset");
    }

    /// Await a server call that returns the full entity `id`, then swap it
    /// into the collection. Shared by `update` and the state transitions.
    pub(crate) async fn reconcile<F>(
        &self,
        id: &str,
        action: &'static str,
        call: F,
    ) -> Result<Arc<A::Entity>, Error>
    where
        F: Future<Output = Result<A::Entity, Error>>,
    {
        let kind = A::Entity::KIND;
        let entity = Arc::new(call.await.inspect_err(|e| {
            warn!(kind, id, action, error = %e, "request rejected");
        })?);
        debug!(kind, id, action, "reconciled");

        self.state.update(|s| s.replaced(id, &entity));
        Ok(entity)
    }
}

impl<A: ResourceApi> std::fmt::Debug for ResourceStore<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.get_state();
        f.debug_struct("ResourceStore")
            .field("kind", &A::Entity::KIND)
            .field("len", &state.len())
            .field("loading", &state.loading)
            .field("error", &state.error)
            .field("ordering", &self.ordering)
            .finish_non_exhaustive()
    }
}
