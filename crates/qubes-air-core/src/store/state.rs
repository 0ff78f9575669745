use std::sync::Arc;

use qubes_air_api::Resource;

/// Published state of one resource collection.
///
/// Items keep server response order. Entities are shared behind `Arc`, so an
/// entry that a reconciliation did not touch is the same allocation in the
/// old and new snapshot.
#[derive(Debug)]
pub struct CollectionState<T> {
    pub items: Vec<Arc<T>>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T> Clone for CollectionState<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}

impl<T: Resource> CollectionState<T> {
    pub fn get(&self, id: &str) -> Option<&Arc<T>> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // ── Reconciliation ───────────────────────────────────────────────
    //
    // Each returns a fresh record; `self` is never modified.

    pub(crate) fn loading_started(&self) -> Self {
        Self {
            items: self.items.clone(),
            loading: true,
            error: None,
        }
    }

    /// Only `items` and `loading` change; an `error` recorded by an
    /// overlapping load stays until the next load starts.
    pub(crate) fn loaded(&self, items: Vec<T>) -> Self {
        Self {
            items: items.into_iter().map(Arc::new).collect(),
            loading: false,
            ..self.clone()
        }
    }

    pub(crate) fn load_failed(&self, message: String) -> Self {
        Self {
            items: self.items.clone(),
            loading: false,
            error: Some(message),
        }
    }

    pub(crate) fn appended(&self, entity: Arc<T>) -> Self {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend(self.items.iter().cloned());
        items.push(entity);
        Self {
            items,
            ..self.clone()
        }
    }

    /// Swap in `entity` for the entry with the requested `id`, whatever id
    /// the server echoed back. Nothing is inserted when `id` is unknown.
    pub(crate) fn replaced(&self, id: &str, entity: &Arc<T>) -> Self {
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id() == id {
                    Arc::clone(entity)
                } else {
                    Arc::clone(item)
                }
            })
            .collect();
        Self {
            items,
            ..self.clone()
        }
    }

    pub(crate) fn without(&self, id: &str) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| item.id() != id)
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    pub(crate) fn error_cleared(&self) -> Self {
        Self {
            error: None,
            ..self.clone()
        }
    }
}
