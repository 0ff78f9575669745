// ── Derived views ──
//
// Read-only projections of store state. The free functions are pure and can
// be called on any snapshot; `DerivedView` caches one of them and republishes
// it whenever its source changes.

use std::sync::{Arc, Mutex, PoisonError};

use qubes_air_api::{Qube, Zone};

use crate::observable::{Observable, Subscription};
use crate::store::{CollectionState, QubeStore, ZoneStore};
use crate::stream::StateStream;

// ── Zone projections ─────────────────────────────────────────────────

pub fn zones(state: &CollectionState<Zone>) -> &[Arc<Zone>] {
    &state.items
}

pub fn zones_loading(state: &CollectionState<Zone>) -> bool {
    state.loading
}

pub fn zones_error(state: &CollectionState<Zone>) -> Option<&str> {
    state.error.as_deref()
}

pub fn connected_zones(state: &CollectionState<Zone>) -> Vec<Arc<Zone>> {
    state
        .items
        .iter()
        .filter(|zone| zone.is_connected())
        .cloned()
        .collect()
}

// ── Qube projections ─────────────────────────────────────────────────

pub fn qubes(state: &CollectionState<Qube>) -> &[Arc<Qube>] {
    &state.items
}

pub fn qubes_loading(state: &CollectionState<Qube>) -> bool {
    state.loading
}

pub fn qubes_error(state: &CollectionState<Qube>) -> Option<&str> {
    state.error.as_deref()
}

pub fn running_qubes(state: &CollectionState<Qube>) -> Vec<Arc<Qube>> {
    state
        .items
        .iter()
        .filter(|qube| qube.is_running())
        .cloned()
        .collect()
}

pub fn qubes_in_zone(state: &CollectionState<Qube>, zone_id: &str) -> Vec<Arc<Qube>> {
    state
        .items
        .iter()
        .filter(|qube| qube.zone_id == zone_id)
        .cloned()
        .collect()
}

// ── Cached projection ────────────────────────────────────────────────

/// A projection of an [`Observable`] that is itself observable.
///
/// Recomputed in full on every source change. Dropping the view detaches
/// it from the source. Subscribers of the view must not publish to the
/// source from inside their callback.
pub struct DerivedView<T: Send + Sync + 'static> {
    output: Arc<Observable<T>>,
    _source: Subscription,
}

impl<T: Send + Sync + 'static> DerivedView<T> {
    pub fn new<S, F>(source: &Observable<S>, project: F) -> Self
    where
        S: Send + Sync + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        let output = Arc::new(Observable::new(project(&source.get_state())));
        let sink = Arc::downgrade(&output);
        let latest = source.receiver();
        let gate = Mutex::new(());

        // Project the newest source snapshot, never the callback argument;
        // racing publishers may notify out of order. `gate` spans read and
        // publish, so the last callback to run leaves the view current.
        let subscription = source.subscribe(move |_| {
            let _guard = gate.lock().unwrap_or_else(PoisonError::into_inner);
            let snapshot: Arc<S> = latest.borrow().clone();
            if let Some(output) = sink.upgrade() {
                output.set_state(project(&snapshot));
            }
        });

        Self {
            output,
            _source: subscription,
        }
    }

    pub fn get(&self) -> Arc<T> {
        self.output.get_state()
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Arc<T>) + Send + Sync + 'static,
    {
        self.output.subscribe(callback)
    }

    pub fn watch(&self) -> StateStream<T> {
        self.output.watch()
    }
}

impl<T: Send + Sync + std::fmt::Debug + 'static> std::fmt::Debug for DerivedView<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedView")
            .field("value", &self.output.get_state())
            .finish_non_exhaustive()
    }
}

// ── Store shortcuts ──────────────────────────────────────────────────

impl ZoneStore {
    pub fn connected_zones_view(&self) -> DerivedView<Vec<Arc<Zone>>> {
        self.derive(connected_zones)
    }
}

impl QubeStore {
    pub fn running_qubes_view(&self) -> DerivedView<Vec<Arc<Qube>>> {
        self.derive(running_qubes)
    }

    pub fn qubes_in_zone_view(&self, zone_id: impl Into<String>) -> DerivedView<Vec<Arc<Qube>>> {
        let zone_id = zone_id.into();
        self.derive(move |state| qubes_in_zone(state, &zone_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Barrier, Mutex};

    use super::*;

    fn zone(id: &str, status: &str) -> Zone {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("zone-{id}"),
            "type": "proxmox",
            "status": status,
            "config": { "endpoint": "https://pve.lan:8006" },
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    fn qube(id: &str, zone_id: &str, status: &str) -> Qube {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("qube-{id}"),
            "zone_id": zone_id,
            "type": "work",
            "status": status,
            "spec": { "vcpu": 2, "memory": 4096, "disk": 40, "template": "debian-12" },
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    fn zone_state(zones: Vec<Zone>) -> CollectionState<Zone> {
        CollectionState {
            items: zones.into_iter().map(Arc::new).collect(),
            loading: false,
            error: None,
        }
    }

    #[test]
    fn connected_zones_filters_by_status() {
        let state = zone_state(vec![
            zone("z1", "connected"),
            zone("z2", "disconnected"),
            zone("z3", "connected"),
        ]);
        let ids: Vec<_> = connected_zones(&state).iter().map(|z| z.id.clone()).collect();
        assert_eq!(ids, ["z1", "z3"]);
        assert_eq!(zones(&state).len(), 3);
        assert!(!zones_loading(&state));
        assert!(zones_error(&state).is_none());
    }

    #[test]
    fn qube_projections() {
        let state = CollectionState {
            items: vec![
                Arc::new(qube("q1", "z1", "running")),
                Arc::new(qube("q2", "z2", "stopped")),
                Arc::new(qube("q3", "z1", "pending")),
            ],
            loading: true,
            error: Some("stale".into()),
        };
        assert_eq!(running_qubes(&state).len(), 1);
        let in_z1: Vec<_> = qubes_in_zone(&state, "z1").iter().map(|q| q.id.clone()).collect();
        assert_eq!(in_z1, ["q1", "q3"]);
        assert_eq!(qubes(&state).len(), 3);
        assert!(qubes_loading(&state));
        assert_eq!(qubes_error(&state), Some("stale"));
    }

    #[test]
    fn derived_view_recomputes_on_every_change() {
        let source = Observable::new(zone_state(vec![zone("z1", "disconnected")]));
        let view = DerivedView::new(&source, connected_zones);
        assert!(view.get().is_empty());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = view.subscribe(move |v| sink.lock().unwrap().push(v.len()));

        source.set_state(zone_state(vec![zone("z1", "connected")]));
        assert_eq!(view.get().len(), 1);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1]);
    }

    #[test]
    fn view_converges_when_publishers_race() {
        let source = Arc::new(Observable::new(zone_state(vec![zone("z1", "disconnected")])));
        let entered = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));

        // Registered ahead of the view, so it stalls the spawned publisher
        // before the view hears about its change.
        let calls = AtomicUsize::new(0);
        let (e, r) = (Arc::clone(&entered), Arc::clone(&release));
        let _slow = source.subscribe(move |_| {
            if calls.fetch_add(1, Ordering::SeqCst) == 1 {
                e.wait();
                r.wait();
            }
        });
        let view = DerivedView::new(&source, connected_zones);

        let publisher = {
            let source = Arc::clone(&source);
            std::thread::spawn(move || source.set_state(zone_state(vec![zone("z1", "connected")])))
        };
        entered.wait();
        source.set_state(zone_state(vec![zone("z1", "disconnected")]));
        release.wait();
        publisher.join().unwrap();

        assert!(connected_zones(&source.get_state()).is_empty());
        assert!(view.get().is_empty());
    }

    #[test]
    fn dropping_view_detaches_from_source() {
        let source = Observable::new(zone_state(Vec::new()));
        let view = DerivedView::new(&source, connected_zones);
        assert_eq!(source.subscriber_count(), 1);
        drop(view);
        assert_eq!(source.subscriber_count(), 0);
    }

    #[test]
    fn view_never_writes_back() {
        let source = Observable::new(zone_state(vec![zone("z1", "connected")]));
        let before = source.get_state();
        let _view = DerivedView::new(&source, connected_zones);
        assert!(Arc::ptr_eq(&before, &source.get_state()));
    }
}
