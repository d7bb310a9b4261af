//! Selectors: read-only projections of a feature state.
//!
//! Base selectors expose state fields. [`ListViewModel`] combines flags and
//! data into the booleans a list screen branches on. [`Memoized`] wraps any
//! projection so repeated reads of the same snapshot return the same value.

use std::sync::Arc;

use parking_lot::Mutex;
use store_types::{Entity, Pagination, QueryParams};

use crate::state::FeatureState;

/// Entities of the current page.
pub fn select_items<E: Entity>(state: &FeatureState<E>) -> &[E] {
    &state.items
}

/// The selected entity.
pub fn select_selected<E: Entity>(state: &FeatureState<E>) -> Option<&E> {
    state.selected.as_ref()
}

/// Pagination of the last successful list fetch.
pub fn select_pagination<E: Entity>(state: &FeatureState<E>) -> Pagination {
    state.pagination
}

/// Stored query parameters.
pub fn select_query<E: Entity>(state: &FeatureState<E>) -> &QueryParams {
    &state.query
}

/// List fetch in flight.
pub fn select_loading<E: Entity>(state: &FeatureState<E>) -> bool {
    state.loading
}

/// Create in flight.
pub fn select_saving<E: Entity>(state: &FeatureState<E>) -> bool {
    state.saving
}

/// Update in flight.
pub fn select_updating<E: Entity>(state: &FeatureState<E>) -> bool {
    state.updating
}

/// Delete in flight.
pub fn select_deleting<E: Entity>(state: &FeatureState<E>) -> bool {
    state.deleting
}

/// Last list failure.
pub fn select_error<E: Entity>(state: &FeatureState<E>) -> Option<&str> {
    state.error.as_deref()
}

/// Last create failure.
pub fn select_create_error<E: Entity>(state: &FeatureState<E>) -> Option<&str> {
    state.create_error.as_deref()
}

/// Last update failure.
pub fn select_update_error<E: Entity>(state: &FeatureState<E>) -> Option<&str> {
    state.update_error.as_deref()
}

/// Last delete failure.
pub fn select_delete_error<E: Entity>(state: &FeatureState<E>) -> Option<&str> {
    state.delete_error.as_deref()
}

/// Total entities across all pages.
pub fn select_total_elements<E: Entity>(state: &FeatureState<E>) -> u64 {
    state.pagination.total_elements
}

/// The entity with this key on the current page.
pub fn find_by_id<'a, E: Entity>(state: &'a FeatureState<E>, id: &E::Id) -> Option<&'a E> {
    state.items.iter().find(|item| item.id() == id)
}

/// What a list screen should render.
///
/// Exactly one of `show_loading`, `show_error`, `show_content` and
/// `is_empty` is true for any state. Data on screen wins over a spinner or
/// an error banner; `refreshing` tells the screen a reload is running
/// behind the content.
#[derive(Debug, Clone, PartialEq)]
pub struct ListViewModel<E> {
    /// Entities to render.
    pub items: Vec<E>,
    /// Pagination to render.
    pub pagination: Pagination,
    /// Last list failure.
    pub error: Option<String>,
    /// First load in progress, nothing to show yet.
    pub show_loading: bool,
    /// Load failed and there is nothing to show.
    pub show_error: bool,
    /// There are items to show.
    pub show_content: bool,
    /// The collection is genuinely empty.
    pub is_empty: bool,
    /// A reload is running while items are shown.
    pub refreshing: bool,
}

impl<E: Entity> ListViewModel<E> {
    /// Project the view model from a state.
    pub fn from_state(state: &FeatureState<E>) -> Self {
        let empty = state.items.is_empty();
        let failed = state.error.is_some();
        Self {
            items: state.items.clone(),
            pagination: state.pagination,
            error: state.error.clone(),
            show_loading: state.loading && empty,
            show_error: !state.loading && failed && empty,
            show_content: !empty,
            is_empty: !state.loading && !failed && empty,
            refreshing: state.loading && !empty,
        }
    }

    /// Number of true display flags. Always 1.
    pub fn active_flags(&self) -> usize {
        [
            self.show_loading,
            self.show_error,
            self.show_content,
            self.is_empty,
        ]
        .iter()
        .filter(|flag| **flag)
        .count()
    }
}

/// Projection function from a state.
pub type Projector<E, T> = fn(&FeatureState<E>) -> T;

/// A projection that recomputes only when the state snapshot changes.
///
/// Snapshots are compared by pointer: the store publishes a fresh `Arc` for
/// every reduced action, so an unchanged pointer means an unchanged state.
pub struct Memoized<E: Entity, T> {
    project: Projector<E, T>,
    cache: Mutex<Option<(Arc<FeatureState<E>>, Arc<T>)>>,
}

impl<E: Entity, T> Memoized<E, T> {
    /// Wrap a projection.
    pub fn new(project: Projector<E, T>) -> Self {
        Self {
            project,
            cache: Mutex::new(None),
        }
    }

    /// Project `state`, reusing the last value if `state` is the same snapshot.
    pub fn select(&self, state: &Arc<FeatureState<E>>) -> Arc<T> {
        let mut cache = self.cache.lock();
        if let Some((seen, value)) = cache.as_ref() {
            if Arc::ptr_eq(seen, state) {
                return Arc::clone(value);
            }
        }
        let value = Arc::new((self.project)(state));
        *cache = Some((Arc::clone(state), Arc::clone(&value)));
        value
    }
}

impl<E: Entity> Memoized<E, ListViewModel<E>> {
    /// Memoized [`ListViewModel`].
    pub fn list_view() -> Self {
        Self::new(ListViewModel::from_state)
    }
}

impl<E: Entity, T> std::fmt::Debug for Memoized<E, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoized")
            .field("cached", &self.cache.lock().is_some())
            .finish()
    }
}
