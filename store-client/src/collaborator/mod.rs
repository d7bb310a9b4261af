//! Collaborator abstraction for the back-office store.
//!
//! A collaborator is the data-access service an effect calls into: the
//! GraphQL backend in production, an in-memory mock in tests.
//!
//! # Design
//!
//! The trait is async and one method maps to one command:
//! - `list()` fetches a page with fully merged query parameters
//! - `get()` fetches one entity by key
//! - `create()`, `update()` and `delete()` mutate
//! - `transition()` runs an entity-specific operation
//!
//! # Example
//!
//! ```ignore
//! let collaborator = MockCollaborator::with_items(vec![address]);
//! let page = collaborator.list(&Address::default_query()).await?;
//! ```

mod graphql;
mod mock;

pub use graphql::{GqlOperation, GraphQlCollaborator, GraphQlResource};
pub use mock::{CollaboratorCall, MockCollaborator, MockEntity};

use async_trait::async_trait;
use store_types::{Entity, Page, QueryParams};
use thiserror::Error;

/// Collaborator errors.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// The server answered with an HTTP error status.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, possibly empty.
        message: String,
    },

    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),

    /// The GraphQL response carried errors.
    #[error("GraphQL Error: {0}")]
    GraphQl(String),

    /// The GraphQL response carried neither data nor errors.
    #[error("Invalid response from server - no data")]
    EmptyResponse,

    /// The response body did not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// No entity with the requested key.
    #[error("{0} not found")]
    NotFound(String),

    /// The collaborator does not offer this operation.
    #[error("operation not supported: {0}")]
    Unsupported(String),
}

impl CollaboratorError {
    /// HTTP status the failure maps to, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

/// Data-access service for one entity type.
#[async_trait]
pub trait Collaborator<E: Entity>: Send + Sync {
    /// Fetch one page.
    async fn list(&self, query: &QueryParams) -> Result<Page<E>, CollaboratorError>;

    /// Fetch one entity by key.
    async fn get(&self, id: &E::Id) -> Result<E, CollaboratorError>;

    /// Create an entity and return it as stored.
    async fn create(&self, input: &E::Input) -> Result<E, CollaboratorError>;

    /// Replace an entity's fields and return it as stored.
    async fn update(&self, id: &E::Id, input: &E::Input) -> Result<E, CollaboratorError>;

    /// Delete an entity.
    async fn delete(&self, id: &E::Id) -> Result<(), CollaboratorError>;

    /// Run an entity-specific operation and return the entity as it now is.
    async fn transition(
        &self,
        id: &E::Id,
        transition: &E::Transition,
    ) -> Result<E, CollaboratorError> {
        let _ = id;
        Err(CollaboratorError::Unsupported(format!(
            "{} {}",
            E::KIND,
            transition
        )))
    }
}
