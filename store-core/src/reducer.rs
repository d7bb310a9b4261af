//! The reducer: `(state, action) → state`, with no side effects.
//!
//! Intent actions raise their class flag and clear their class error.
//! Success actions lower the flag, clear the error and apply the data
//! mutation. Failure actions lower the flag and store the message verbatim.

use store_types::{Entity, Pagination};

use crate::action::{Action, Operation, Phase};
use crate::state::FeatureState;

/// Pure reducer for one entity feature.
///
/// Holds the state `ResetState` returns to; everything else is a function of
/// its inputs.
#[derive(Debug, Clone)]
pub struct Reducer<E: Entity> {
    initial: FeatureState<E>,
}

impl<E: Entity> Reducer<E> {
    /// Reducer whose initial state is `initial`.
    pub fn new(initial: FeatureState<E>) -> Self {
        Self { initial }
    }

    /// The state a feature starts in and resets to.
    pub fn initial_state(&self) -> FeatureState<E> {
        self.initial.clone()
    }

    /// Derive the next state. Never mutates `state`.
    pub fn reduce(&self, state: &FeatureState<E>, action: &Action<E>) -> FeatureState<E> {
        if let Action::ResetState = action {
            return self.initial.clone();
        }

        let mut next = state.clone();

        if let Some(operation) = action.operation() {
            match action.phase() {
                Phase::Intent => begin(&mut next, operation),
                Phase::Success => finish(&mut next, operation, None),
                Phase::Failure => finish(&mut next, operation, action.failure_message()),
                Phase::Local => {}
            }
        }

        match action {
            Action::LoadList(patch) => {
                next.query = next.query.merged(patch);
            }
            Action::LoadListSuccess(page) => {
                next.items = unique_by_key(&page.content);
                next.pagination = Pagination::from_page(page);
                next.loaded = true;
            }
            Action::LoadOneSuccess(entity) => {
                next.selected = Some(entity.clone());
            }
            Action::CreateSuccess(entity) => {
                match next.position_of(entity.id()) {
                    Some(index) => next.items[index] = entity.clone(),
                    None => next.items.push(entity.clone()),
                }
                next.selected = Some(entity.clone());
            }
            Action::UpdateSuccess(entity) | Action::TransitionSuccess(entity) => {
                patch_one(&mut next, entity);
            }
            Action::DeleteSuccess(id) => {
                if let Some(index) = next.position_of(id) {
                    next.items.remove(index);
                }
                if next.selected.as_ref().is_some_and(|s| s.id() == id) {
                    next.selected = None;
                }
            }
            Action::SelectOne(id) => {
                next.selected = next.items.iter().find(|item| item.id() == id).cloned();
            }
            Action::ClearSelection => {
                next.selected = None;
            }
            Action::UpdateQueryParams(patch) => {
                next.query = next.query.merged(patch);
            }
            Action::ClearErrors => {
                for operation in Operation::ALL {
                    *next.error_mut(operation) = None;
                }
            }
            // Flag bookkeeping above is all these need.
            Action::LoadListFailure(_)
            | Action::LoadOne(_)
            | Action::LoadOneFailure(_)
            | Action::Create(_)
            | Action::CreateFailure(_)
            | Action::Update(..)
            | Action::UpdateFailure(_)
            | Action::Delete(_)
            | Action::DeleteFailure(_)
            | Action::Transition(..)
            | Action::TransitionFailure(_)
            | Action::ResetState => {}
        }

        next
    }
}

impl<E: Entity> Default for Reducer<E> {
    fn default() -> Self {
        Self::new(FeatureState::new())
    }
}

fn begin<E: Entity>(state: &mut FeatureState<E>, operation: Operation) {
    *state.flag_mut(operation) = true;
    *state.error_mut(operation) = None;
}

fn finish<E: Entity>(state: &mut FeatureState<E>, operation: Operation, error: Option<&str>) {
    *state.flag_mut(operation) = false;
    *state.error_mut(operation) = error.map(str::to_string);
}

/// First occurrence of each key, in page order.
fn unique_by_key<E: Entity>(content: &[E]) -> Vec<E> {
    let mut items: Vec<E> = Vec::with_capacity(content.len());
    for entity in content {
        if !items.iter().any(|kept| kept.id() == entity.id()) {
            items.push(entity.clone());
        }
    }
    items
}

/// Replace the item and the selection that share `entity`'s key.
fn patch_one<E: Entity>(state: &mut FeatureState<E>, entity: &E) {
    if let Some(index) = state.position_of(entity.id()) {
        state.items[index] = entity.clone();
    }
    if state
        .selected
        .as_ref()
        .is_some_and(|s| s.id() == entity.id())
    {
        state.selected = Some(entity.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use store_types::{
        Address, AddressInput, ClientOrder, ClientOrderStatus, OrderTransition, Page, QueryPatch,
    };

    fn address(id: i64, city: &str) -> Address {
        Address {
            address_id: id,
            street: format!("{} Main St", id),
            city: city.to_string(),
            state: None,
            country: None,
            zip_code: "00000".to_string(),
            client_id: 1,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn input(city: &str) -> AddressInput {
        AddressInput {
            street: "1 Main St".into(),
            city: city.into(),
            state: None,
            country: None,
            zip_code: "00000".into(),
            client_id: 1,
        }
    }

    fn page(items: Vec<Address>, total_pages: u32, page_index: u32) -> Page<Address> {
        Page {
            total_elements: items.len() as u64,
            content: items,
            total_pages,
            page_index,
            page_size: 10,
        }
    }

    fn loaded(items: Vec<Address>) -> FeatureState<Address> {
        Reducer::default().reduce(
            &FeatureState::new(),
            &Action::LoadListSuccess(page(items, 1, 0)),
        )
    }

    fn run(reducer: &Reducer<Address>, actions: &[Action<Address>]) -> FeatureState<Address> {
        actions
            .iter()
            .fold(reducer.initial_state(), |state, action| {
                reducer.reduce(&state, action)
            })
    }

    // ===========================================
    // Scenarios
    // ===========================================

    #[test]
    fn list_load_round_trip() {
        let reducer = Reducer::default();
        let initial = reducer.initial_state();
        assert!(initial.items.is_empty());
        assert!(!initial.loading);

        let loading = reducer.reduce(&initial, &Action::LoadList(QueryPatch::none()));
        assert!(loading.loading);

        let e1 = address(1, "Paris");
        let e2 = address(2, "Lyon");
        let done = reducer.reduce(
            &loading,
            &Action::LoadListSuccess(Page {
                content: vec![e1.clone(), e2.clone()],
                total_elements: 2,
                total_pages: 1,
                page_index: 0,
                page_size: 10,
            }),
        );

        assert_eq!(done.items, vec![e1, e2]);
        assert!(!done.loading);
        assert!(done.loaded);
        assert_eq!(
            done.pagination,
            Pagination {
                page_index: 0,
                page_size: 10,
                total_elements: 2,
                total_pages: 1
            }
        );
    }

    #[test]
    fn delete_removes_item_and_selection() {
        let reducer = Reducer::default();
        let state = loaded(vec![address(1, "Paris"), address(2, "Lyon")]);
        let state = reducer.reduce(&state, &Action::SelectOne(1));
        assert_eq!(state.selected.as_ref().map(|s| s.address_id), Some(1));

        let deleting = reducer.reduce(&state, &Action::Delete(1));
        assert!(deleting.deleting);

        let done = reducer.reduce(&deleting, &Action::DeleteSuccess(1));
        assert_eq!(done.items, vec![address(2, "Lyon")]);
        assert!(!done.deleting);
        assert!(done.selected.is_none());
    }

    #[test]
    fn create_conflict_leaves_items_alone() {
        let reducer = Reducer::default();
        let state = loaded(vec![address(1, "Paris")]);

        let saving = reducer.reduce(&state, &Action::Create(input("Lyon")));
        assert!(saving.saving);
        assert!(saving.create_error.is_none());

        let msg = "Conflict. Resource already exists.";
        let done = reducer.reduce(&saving, &Action::CreateFailure(msg.into()));
        assert_eq!(done.items, state.items);
        assert!(!done.saving);
        assert_eq!(done.create_error.as_deref(), Some(msg));
    }

    // ===========================================
    // Data mutations
    // ===========================================

    #[test]
    fn create_success_appends_and_selects() {
        let reducer = Reducer::default();
        let state = loaded(vec![address(1, "Paris")]);
        let saving = reducer.reduce(&state, &Action::Create(input("Lyon")));
        let done = reducer.reduce(&saving, &Action::CreateSuccess(address(2, "Lyon")));

        assert_eq!(done.items, vec![address(1, "Paris"), address(2, "Lyon")]);
        assert_eq!(done.selected, Some(address(2, "Lyon")));
        assert!(!done.saving);
    }

    #[test]
    fn create_success_with_known_key_keeps_keys_unique() {
        let reducer = Reducer::default();
        let state = loaded(vec![address(1, "Paris"), address(2, "Lyon")]);
        let done = reducer.reduce(&state, &Action::CreateSuccess(address(2, "Nice")));

        assert_eq!(done.items.len(), 2);
        assert_eq!(done.items[1].city, "Nice");
    }

    #[test]
    fn update_success_patches_only_the_matching_item() {
        let reducer = Reducer::default();
        let state = loaded(vec![
            address(1, "Paris"),
            address(2, "Lyon"),
            address(3, "Nice"),
        ]);
        let done = reducer.reduce(&state, &Action::UpdateSuccess(address(2, "Lille")));

        assert_eq!(done.items[0], state.items[0]);
        assert_eq!(done.items[1].city, "Lille");
        assert_eq!(done.items[2], state.items[2]);
    }

    #[test]
    fn update_success_refreshes_matching_selection_only() {
        let reducer = Reducer::default();
        let state = loaded(vec![address(1, "Paris"), address(2, "Lyon")]);
        let state = reducer.reduce(&state, &Action::SelectOne(1));

        let other = reducer.reduce(&state, &Action::UpdateSuccess(address(2, "Lille")));
        assert_eq!(other.selected, Some(address(1, "Paris")));

        let same = reducer.reduce(&state, &Action::UpdateSuccess(address(1, "Rouen")));
        assert_eq!(same.selected, Some(address(1, "Rouen")));
    }

    #[test]
    fn update_of_unknown_key_changes_no_items() {
        let reducer = Reducer::default();
        let state = loaded(vec![address(1, "Paris")]);
        let done = reducer.reduce(&state, &Action::UpdateSuccess(address(9, "Metz")));
        assert_eq!(done.items, state.items);
    }

    #[test]
    fn list_success_replaces_items_wholesale() {
        let reducer = Reducer::default();
        let state = loaded(vec![address(1, "Paris"), address(2, "Lyon")]);
        let done = reducer.reduce(
            &state,
            &Action::LoadListSuccess(page(vec![address(3, "Nice")], 1, 0)),
        );
        assert_eq!(done.items, vec![address(3, "Nice")]);
    }

    #[test]
    fn list_success_drops_repeated_keys() {
        let reducer = Reducer::default();
        let state = loaded(vec![
            address(1, "Paris"),
            address(1, "Paris bis"),
            address(2, "Lyon"),
        ]);
        assert_eq!(state.items, vec![address(1, "Paris"), address(2, "Lyon")]);

        let done = reducer.reduce(&state, &Action::DeleteSuccess(1));
        assert_eq!(done.items, vec![address(2, "Lyon")]);
    }

    #[test]
    fn list_failure_keeps_stale_items() {
        let reducer = Reducer::default();
        let state = loaded(vec![address(1, "Paris")]);
        let loading = reducer.reduce(&state, &Action::LoadList(QueryPatch::page(1)));
        let failed = reducer.reduce(&loading, &Action::LoadListFailure("boom".into()));

        assert_eq!(failed.items, state.items);
        assert_eq!(failed.error.as_deref(), Some("boom"));
        assert!(!failed.loading);
    }

    #[test]
    fn load_one_sets_selection_without_touching_items() {
        let reducer = Reducer::default();
        let state = loaded(vec![address(1, "Paris")]);
        let loading = reducer.reduce(&state, &Action::LoadOne(5));
        assert!(loading.loading_one);
        assert!(!loading.loading);

        let done = reducer.reduce(&loading, &Action::LoadOneSuccess(address(5, "Brest")));
        assert_eq!(done.selected, Some(address(5, "Brest")));
        assert_eq!(done.items, state.items);
        assert!(!done.loading_one);
    }

    #[test]
    fn selection_is_not_bound_to_items() {
        let reducer = Reducer::default();
        let state = loaded(vec![address(1, "Paris")]);
        let state = reducer.reduce(&state, &Action::SelectOne(1));
        let refreshed = reducer.reduce(
            &state,
            &Action::LoadListSuccess(page(vec![address(1, "Changed")], 1, 0)),
        );
        assert_eq!(refreshed.selected, Some(address(1, "Paris")));
    }

    #[test]
    fn select_unknown_key_clears_selection() {
        let reducer = Reducer::default();
        let state = loaded(vec![address(1, "Paris")]);
        let state = reducer.reduce(&state, &Action::SelectOne(1));
        let state = reducer.reduce(&state, &Action::SelectOne(42));
        assert!(state.selected.is_none());
    }

    #[test]
    fn transition_success_patches_order() {
        let reducer = Reducer::<ClientOrder>::default();
        let order = |status| ClientOrder {
            order_id: "o-1".into(),
            order_number: Some("CMD-1".into()),
            client_id: None,
            client: None,
            delivery_address_id: None,
            delivery_address: None,
            status,
            total_amount: None,
            items: vec![],
            created_at: None,
            updated_at: None,
        };
        let state = reducer.reduce(
            &FeatureState::new(),
            &Action::LoadListSuccess(Page {
                content: vec![order(ClientOrderStatus::InPreparation)],
                total_elements: 1,
                total_pages: 1,
                page_index: 0,
                page_size: 10,
            }),
        );

        let pending = reducer.reduce(
            &state,
            &Action::Transition("o-1".into(), OrderTransition::Cancel),
        );
        assert!(pending.updating);

        let done = reducer.reduce(
            &pending,
            &Action::TransitionSuccess(order(ClientOrderStatus::Cancelled)),
        );
        assert_eq!(done.items[0].status, ClientOrderStatus::Cancelled);
        assert!(!done.updating);
    }

    // ===========================================
    // Query params, errors, reset
    // ===========================================

    #[test]
    fn query_params_persist_across_loads() {
        let reducer = Reducer::default();
        let state = run(
            &reducer,
            &[
                Action::UpdateQueryParams(QueryPatch::page(2).with_page_size(25)),
                Action::LoadList(QueryPatch::none()),
            ],
        );
        assert_eq!(state.query.page_index, 2);
        assert_eq!(state.query.page_size, 25);
        assert_eq!(state.query.sort_field, "addressId");
    }

    #[test]
    fn update_query_params_touches_no_flag() {
        let reducer = Reducer::<Address>::default();
        let before = reducer.initial_state();
        let after = reducer.reduce(&before, &Action::UpdateQueryParams(QueryPatch::page(3)));
        assert!(!after.is_busy());
        assert_eq!(after.items, before.items);
    }

    #[test]
    fn clear_errors_clears_every_class() {
        let reducer = Reducer::default();
        let state = run(
            &reducer,
            &[
                Action::LoadListFailure("a".into()),
                Action::LoadOneFailure("b".into()),
                Action::CreateFailure("c".into()),
                Action::UpdateFailure("d".into()),
                Action::DeleteFailure("e".into()),
                Action::ClearErrors,
            ],
        );
        for op in Operation::ALL {
            assert!(state.error_for(op).is_none());
        }
    }

    #[test]
    fn reset_returns_initial_state_exactly() {
        let reducer = Reducer::default();
        let state = run(
            &reducer,
            &[
                Action::LoadListSuccess(page(vec![address(1, "Paris")], 1, 0)),
                Action::SelectOne(1),
                Action::Delete(1),
                Action::LoadList(QueryPatch::page(4)),
                Action::CreateFailure("x".into()),
                Action::ResetState,
            ],
        );
        assert_eq!(state, reducer.initial_state());
    }

    #[test]
    fn reset_uses_configured_initial_query() {
        let initial =
            FeatureState::<Address>::with_query(Address::default_query().with_page_size(50));
        let reducer = Reducer::new(initial.clone());
        let state = reducer.reduce(
            &reducer.reduce(&initial, &Action::LoadList(QueryPatch::page(3))),
            &Action::ResetState,
        );
        assert_eq!(state.query.page_size, 50);
        assert_eq!(state.query.page_index, 0);
    }

    // ===========================================
    // Properties
    // ===========================================

    fn arb_address() -> impl Strategy<Value = Address> {
        (1i64..6, "[a-z]{1,6}").prop_map(|(id, city)| address(id, &city))
    }

    fn arb_action() -> impl Strategy<Value = Action<Address>> {
        prop_oneof![
            (0u32..4).prop_map(|p| Action::LoadList(QueryPatch::page(p))),
            (prop::collection::vec(arb_address(), 0..5), 0u32..3, 0u32..3).prop_map(
                |(items, pages, index)| Action::LoadListSuccess(page(items, pages, index))
            ),
            "[a-z]{0,5}".prop_map(Action::LoadListFailure),
            (1i64..6).prop_map(Action::LoadOne),
            arb_address().prop_map(Action::LoadOneSuccess),
            "[a-z]{0,5}".prop_map(Action::LoadOneFailure),
            "[a-z]{1,5}".prop_map(|c| Action::Create(input(&c))),
            arb_address().prop_map(Action::CreateSuccess),
            "[a-z]{0,5}".prop_map(Action::CreateFailure),
            (1i64..6, "[a-z]{1,5}").prop_map(|(id, c)| Action::Update(id, input(&c))),
            arb_address().prop_map(Action::UpdateSuccess),
            "[a-z]{0,5}".prop_map(Action::UpdateFailure),
            (1i64..6).prop_map(Action::Delete),
            (1i64..6).prop_map(Action::DeleteSuccess),
            "[a-z]{0,5}".prop_map(Action::DeleteFailure),
            (1i64..6).prop_map(Action::SelectOne),
            Just(Action::ClearSelection),
            (0u32..4).prop_map(|p| Action::UpdateQueryParams(QueryPatch::page(p))),
            Just(Action::ClearErrors),
            Just(Action::ResetState),
        ]
    }

    fn arb_state() -> impl Strategy<Value = FeatureState<Address>> {
        prop::collection::vec(arb_action(), 0..12).prop_map(|actions| {
            let reducer = Reducer::default();
            run(&reducer, &actions)
        })
    }

    proptest! {
        #[test]
        fn reduce_is_pure(state in arb_state(), action in arb_action()) {
            let reducer = Reducer::default();
            let snapshot = state.clone();
            let first = reducer.reduce(&state, &action);
            let second = reducer.reduce(&state, &action);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(&state, &snapshot);
        }

        #[test]
        fn flags_and_errors_pair_up(state in arb_state(), action in arb_action()) {
            let reducer = Reducer::default();
            let next = reducer.reduce(&state, &action);
            if let Some(op) = action.operation() {
                match action.phase() {
                    Phase::Intent => {
                        prop_assert!(next.in_flight(op));
                        prop_assert!(next.error_for(op).is_none());
                    }
                    Phase::Success => {
                        prop_assert!(!next.in_flight(op));
                        prop_assert!(next.error_for(op).is_none());
                    }
                    Phase::Failure => {
                        prop_assert!(!next.in_flight(op));
                        prop_assert_eq!(next.error_for(op), action.failure_message());
                    }
                    Phase::Local => unreachable!(),
                }
            }
        }

        #[test]
        fn items_stay_unique_by_key(actions in prop::collection::vec(arb_action(), 0..20)) {
            let state = run(&Reducer::default(), &actions);
            let mut ids: Vec<i64> = state.items.iter().map(|a| a.address_id).collect();
            let len = ids.len();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), len);
            prop_assert!(state.pagination.is_consistent());
        }

        #[test]
        fn single_entity_actions_leave_other_items_alone(
            state in arb_state(),
            entity in arb_address(),
            delete in any::<bool>(),
        ) {
            let reducer = Reducer::default();
            let action = if delete {
                Action::DeleteSuccess(entity.address_id)
            } else {
                Action::UpdateSuccess(entity.clone())
            };
            let next = reducer.reduce(&state, &action);
            let others_before: Vec<&Address> =
                state.items.iter().filter(|a| a.address_id != entity.address_id).collect();
            let others_after: Vec<&Address> =
                next.items.iter().filter(|a| a.address_id != entity.address_id).collect();
            prop_assert_eq!(others_before, others_after);
        }
    }
}
