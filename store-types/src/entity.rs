//! The entity contract every feature module is generic over.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

use crate::query::{QueryParams, SortDirection};

/// A back-office entity managed by a feature store.
///
/// One implementation per entity type replaces a hand-written copy of the
/// action/reducer/selector set.
pub trait Entity:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Primary key.
    type Id: Clone + fmt::Debug + fmt::Display + PartialEq + Serialize + Send + Sync + 'static;

    /// Payload of create and update requests.
    type Input: Clone + fmt::Debug + PartialEq + Serialize + Send + Sync + 'static;

    /// Entity-specific operations beyond CRUD (e.g. cancelling an order).
    type Transition: Clone + fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static;

    /// Lowercase name used in logs (`"address"`).
    const KIND: &'static str;

    /// Capitalized name used in user-facing notices (`"Address"`).
    const LABEL: &'static str;

    /// Sort field of the initial query.
    const DEFAULT_SORT_FIELD: &'static str;

    /// Sort direction of the initial query.
    const DEFAULT_SORT_DIRECTION: SortDirection = SortDirection::Asc;

    /// The primary key of this entity.
    fn id(&self) -> &Self::Id;

    /// Query parameters a fresh feature starts with.
    fn default_query() -> QueryParams {
        QueryParams::new(Self::DEFAULT_SORT_FIELD, Self::DEFAULT_SORT_DIRECTION)
    }
}

/// Transition type for entities that only support CRUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoTransition {}

impl fmt::Display for NoTransition {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
