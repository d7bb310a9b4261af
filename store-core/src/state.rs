//! Feature state: the single value the reducer owns.
//!
//! One `FeatureState<E>` per entity type. It is created once with documented
//! defaults, advanced one action at a time by the reducer, and replaced
//! wholesale only by `ResetState`.

use store_types::{Entity, Pagination, QueryParams};

use crate::action::Operation;

/// State of one entity feature.
///
/// In-flight flags and error fields are tracked per operation class and
/// never inferred from each other: a list load and a delete may be in
/// flight at the same time.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureState<E: Entity> {
    /// Entities of the current page, unique by key.
    pub items: Vec<E>,
    /// Entity being viewed or edited. Not bound to `items`.
    pub selected: Option<E>,
    /// Pagination from the last successful list fetch.
    pub pagination: Pagination,
    /// Last-applied list request parameters.
    pub query: QueryParams,
    /// At least one list fetch has succeeded since the last reset.
    pub loaded: bool,

    /// A list fetch is in flight.
    pub loading: bool,
    /// A single-entity fetch is in flight.
    pub loading_one: bool,
    /// A create is in flight.
    pub saving: bool,
    /// An update or entity-specific operation is in flight.
    pub updating: bool,
    /// A delete is in flight.
    pub deleting: bool,

    /// Last list fetch failure.
    pub error: Option<String>,
    /// Last single-entity fetch failure.
    pub load_one_error: Option<String>,
    /// Last create failure.
    pub create_error: Option<String>,
    /// Last update or entity-specific operation failure.
    pub update_error: Option<String>,
    /// Last delete failure.
    pub delete_error: Option<String>,
}

impl<E: Entity> FeatureState<E> {
    /// Initial state with the entity's default query.
    pub fn new() -> Self {
        Self::with_query(E::default_query())
    }

    /// Initial state with explicit query parameters.
    pub fn with_query(query: QueryParams) -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            pagination: Pagination::new(query.page_size),
            query,
            loaded: false,
            loading: false,
            loading_one: false,
            saving: false,
            updating: false,
            deleting: false,
            error: None,
            load_one_error: None,
            create_error: None,
            update_error: None,
            delete_error: None,
        }
    }

    /// In-flight flag of an operation class.
    pub fn in_flight(&self, operation: Operation) -> bool {
        match operation {
            Operation::List => self.loading,
            Operation::LoadOne => self.loading_one,
            Operation::Create => self.saving,
            Operation::Update | Operation::Transition => self.updating,
            Operation::Delete => self.deleting,
        }
    }

    /// Error field of an operation class.
    pub fn error_for(&self, operation: Operation) -> Option<&str> {
        match operation {
            Operation::List => self.error.as_deref(),
            Operation::LoadOne => self.load_one_error.as_deref(),
            Operation::Create => self.create_error.as_deref(),
            Operation::Update | Operation::Transition => self.update_error.as_deref(),
            Operation::Delete => self.delete_error.as_deref(),
        }
    }

    /// Whether any call is in flight.
    pub fn is_busy(&self) -> bool {
        self.loading || self.loading_one || self.saving || self.updating || self.deleting
    }

    /// Position of the entity with this key in `items`.
    pub fn position_of(&self, id: &E::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub(crate) fn flag_mut(&mut self, operation: Operation) -> &mut bool {
        match operation {
            Operation::List => &mut self.loading,
            Operation::LoadOne => &mut self.loading_one,
            Operation::Create => &mut self.saving,
            Operation::Update | Operation::Transition => &mut self.updating,
            Operation::Delete => &mut self.deleting,
        }
    }

    pub(crate) fn error_mut(&mut self, operation: Operation) -> &mut Option<String> {
        match operation {
            Operation::List => &mut self.error,
            Operation::LoadOne => &mut self.load_one_error,
            Operation::Create => &mut self.create_error,
            Operation::Update | Operation::Transition => &mut self.update_error,
            Operation::Delete => &mut self.delete_error,
        }
    }
}

impl<E: Entity> Default for FeatureState<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store_types::{Address, SortDirection};

    #[test]
    fn starts_idle_and_empty() {
        let state = FeatureState::<Address>::new();

        assert!(state.items.is_empty());
        assert!(state.selected.is_none());
        assert!(!state.loaded);
        assert!(!state.is_busy());
        for op in crate::action::Operation::ALL {
            assert!(!state.in_flight(op));
            assert!(state.error_for(op).is_none());
        }
        assert_eq!(state.pagination.total_elements, 0);
        assert_eq!(state.pagination.total_pages, 0);
    }

    #[test]
    fn pagination_follows_initial_page_size() {
        let query = QueryParams::new("city", SortDirection::Desc).with_page_size(50);
        let state = FeatureState::<Address>::with_query(query);
        assert_eq!(state.pagination.page_size, 50);
        assert_eq!(state.query.sort_field, "city");
    }

    #[test]
    fn update_and_transition_share_a_flag() {
        let mut state = FeatureState::<Address>::new();
        *state.flag_mut(Operation::Transition) = true;
        assert!(state.in_flight(Operation::Update));
    }
}
