//! Command planning: which collaborator call an action asks for.
//!
//! The reducer never performs I/O. After it has produced the next state, the
//! dispatcher asks [`plan`] whether the action needs a collaborator call, and
//! if so runs the returned [`Command`].

use store_types::{Entity, QueryParams};

use crate::action::{Action, Operation};
use crate::state::FeatureState;

/// A collaborator call the I/O layer should perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Command<E: Entity> {
    /// Fetch one page with fully merged parameters.
    List(QueryParams),
    /// Fetch one entity.
    Get(E::Id),
    /// Create an entity.
    Create(E::Input),
    /// Update an entity.
    Update(E::Id, E::Input),
    /// Delete an entity.
    Delete(E::Id),
    /// Run an entity-specific operation.
    Transition(E::Id, E::Transition),
}

impl<E: Entity> Command<E> {
    /// Operation class the command belongs to.
    pub fn operation(&self) -> Operation {
        match self {
            Command::List(_) => Operation::List,
            Command::Get(_) => Operation::LoadOne,
            Command::Create(_) => Operation::Create,
            Command::Update(..) => Operation::Update,
            Command::Delete(_) => Operation::Delete,
            Command::Transition(..) => Operation::Transition,
        }
    }
}

/// Plan the call for `action`, given the state the reducer just produced.
///
/// List fetches use the merged query from `next`, so a caller only names the
/// parameters it wants to change.
pub fn plan<E: Entity>(next: &FeatureState<E>, action: &Action<E>) -> Option<Command<E>> {
    match action {
        Action::LoadList(_) => Some(Command::List(next.query.clone())),
        Action::LoadOne(id) => Some(Command::Get(id.clone())),
        Action::Create(input) => Some(Command::Create(input.clone())),
        Action::Update(id, input) => Some(Command::Update(id.clone(), input.clone())),
        Action::Delete(id) => Some(Command::Delete(id.clone())),
        Action::Transition(id, transition) => {
            Some(Command::Transition(id.clone(), transition.clone()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::Reducer;
    use store_types::{Address, QueryPatch, SortDirection};

    #[test]
    fn list_uses_merged_query() {
        let reducer = Reducer::<Address>::default();
        let state = reducer.reduce(
            &reducer.initial_state(),
            &Action::UpdateQueryParams(QueryPatch::none().with_filter("Paris")),
        );
        let action = Action::LoadList(QueryPatch::page(3).with_sort("city", SortDirection::Desc));
        let next = reducer.reduce(&state, &action);

        let Some(Command::List(query)) = plan(&next, &action) else {
            panic!("expected a list command");
        };
        assert_eq!(query.page_index, 3);
        assert_eq!(query.sort_field, "city");
        assert_eq!(query.sort_direction, SortDirection::Desc);
        assert_eq!(query.filter.as_deref(), Some("Paris"));
        assert_eq!(query.page_size, 10);
    }

    #[test]
    fn only_intents_plan_calls() {
        let state = FeatureState::<Address>::new();
        assert!(plan(&state, &Action::SelectOne(1)).is_none());
        assert!(plan(&state, &Action::DeleteSuccess(1)).is_none());
        assert!(plan(&state, &Action::ResetState).is_none());

        let cmd = plan(&state, &Action::Delete(4)).unwrap();
        assert_eq!(cmd, Command::Delete(4));
        assert_eq!(cmd.operation(), Operation::Delete);
    }
}
