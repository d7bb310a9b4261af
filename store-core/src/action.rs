//! Actions: tagged descriptions of something that happened.
//!
//! Intent actions describe what the user asked for and never carry a result.
//! Success and failure actions describe how a collaborator call ended and
//! never trigger I/O themselves.

use store_types::{Entity, Page, QueryPatch};

/// Every action a feature store reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Action<E: Entity> {
    /// Fetch a page, overriding some of the stored query parameters.
    LoadList(QueryPatch),
    /// A page arrived.
    LoadListSuccess(Page<E>),
    /// The list fetch failed.
    LoadListFailure(String),

    /// Fetch one entity by key.
    LoadOne(E::Id),
    /// The entity arrived.
    LoadOneSuccess(E),
    /// The single fetch failed.
    LoadOneFailure(String),

    /// Create an entity.
    Create(E::Input),
    /// The entity was created.
    CreateSuccess(E),
    /// Creation failed.
    CreateFailure(String),

    /// Replace an entity's fields.
    Update(E::Id, E::Input),
    /// The entity was updated.
    UpdateSuccess(E),
    /// The update failed.
    UpdateFailure(String),

    /// Delete an entity.
    Delete(E::Id),
    /// The entity with this key was deleted.
    DeleteSuccess(E::Id),
    /// The delete failed.
    DeleteFailure(String),

    /// Run an entity-specific operation (e.g. cancel an order).
    Transition(E::Id, E::Transition),
    /// The operation succeeded; carries the entity as it now is.
    TransitionSuccess(E),
    /// The operation failed.
    TransitionFailure(String),

    /// Select an entity already present in the list.
    SelectOne(E::Id),
    /// Drop the current selection.
    ClearSelection,
    /// Shallow-merge into the stored query parameters without fetching.
    UpdateQueryParams(QueryPatch),
    /// Clear every error field.
    ClearErrors,
    /// Return to the initial state.
    ResetState,
}

/// Operation classes. Each owns one in-flight flag and one error field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Paged list fetch.
    List,
    /// Single-entity fetch.
    LoadOne,
    /// Create.
    Create,
    /// Update.
    Update,
    /// Delete.
    Delete,
    /// Entity-specific operation.
    Transition,
}

impl Operation {
    /// All operation classes.
    pub const ALL: [Operation; 6] = [
        Operation::List,
        Operation::LoadOne,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
        Operation::Transition,
    ];

    /// Whether the operation only reads.
    pub fn is_read(self) -> bool {
        matches!(self, Operation::List | Operation::LoadOne)
    }

    /// Stable index, used by per-class tables.
    pub fn index(self) -> usize {
        match self {
            Operation::List => 0,
            Operation::LoadOne => 1,
            Operation::Create => 2,
            Operation::Update => 3,
            Operation::Delete => 4,
            Operation::Transition => 5,
        }
    }
}

/// Where an action sits in an operation's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Starts a collaborator call.
    Intent,
    /// Ends a call successfully.
    Success,
    /// Ends a call with an error.
    Failure,
    /// Purely local (selection, query params, reset).
    Local,
}

impl<E: Entity> Action<E> {
    /// The operation class this action belongs to, if any.
    pub fn operation(&self) -> Option<Operation> {
        use Action::*;
        match self {
            LoadList(_) | LoadListSuccess(_) | LoadListFailure(_) => Some(Operation::List),
            LoadOne(_) | LoadOneSuccess(_) | LoadOneFailure(_) => Some(Operation::LoadOne),
            Create(_) | CreateSuccess(_) | CreateFailure(_) => Some(Operation::Create),
            Update(..) | UpdateSuccess(_) | UpdateFailure(_) => Some(Operation::Update),
            Delete(_) | DeleteSuccess(_) | DeleteFailure(_) => Some(Operation::Delete),
            Transition(..) | TransitionSuccess(_) | TransitionFailure(_) => {
                Some(Operation::Transition)
            }
            SelectOne(_) | ClearSelection | UpdateQueryParams(_) | ClearErrors | ResetState => None,
        }
    }

    /// The lifecycle phase of this action.
    pub fn phase(&self) -> Phase {
        use Action::*;
        match self {
            LoadList(_) | LoadOne(_) | Create(_) | Update(..) | Delete(_) | Transition(..) => {
                Phase::Intent
            }
            LoadListSuccess(_) | LoadOneSuccess(_) | CreateSuccess(_) | UpdateSuccess(_)
            | DeleteSuccess(_) | TransitionSuccess(_) => Phase::Success,
            LoadListFailure(_) | LoadOneFailure(_) | CreateFailure(_) | UpdateFailure(_)
            | DeleteFailure(_) | TransitionFailure(_) => Phase::Failure,
            SelectOne(_) | ClearSelection | UpdateQueryParams(_) | ClearErrors | ResetState => {
                Phase::Local
            }
        }
    }

    /// Whether this action starts a collaborator call.
    pub fn is_intent(&self) -> bool {
        self.phase() == Phase::Intent
    }

    /// Whether this action ends a collaborator call.
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase(), Phase::Success | Phase::Failure)
    }

    /// The failure message, for failure actions.
    pub fn failure_message(&self) -> Option<&str> {
        use Action::*;
        match self {
            LoadListFailure(msg) | LoadOneFailure(msg) | CreateFailure(msg)
            | UpdateFailure(msg) | DeleteFailure(msg) | TransitionFailure(msg) => Some(msg),
            _ => None,
        }
    }

    /// Short tag for logs, without payloads.
    pub fn name(&self) -> &'static str {
        use Action::*;
        match self {
            LoadList(_) => "LoadList",
            LoadListSuccess(_) => "LoadListSuccess",
            LoadListFailure(_) => "LoadListFailure",
            LoadOne(_) => "LoadOne",
            LoadOneSuccess(_) => "LoadOneSuccess",
            LoadOneFailure(_) => "LoadOneFailure",
            Create(_) => "Create",
            CreateSuccess(_) => "CreateSuccess",
            CreateFailure(_) => "CreateFailure",
            Update(..) => "Update",
            UpdateSuccess(_) => "UpdateSuccess",
            UpdateFailure(_) => "UpdateFailure",
            Delete(_) => "Delete",
            DeleteSuccess(_) => "DeleteSuccess",
            DeleteFailure(_) => "DeleteFailure",
            Transition(..) => "Transition",
            TransitionSuccess(_) => "TransitionSuccess",
            TransitionFailure(_) => "TransitionFailure",
            SelectOne(_) => "SelectOne",
            ClearSelection => "ClearSelection",
            UpdateQueryParams(_) => "UpdateQueryParams",
            ClearErrors => "ClearErrors",
            ResetState => "ResetState",
        }
    }
}
