//! # store-client
//!
//! Async runtime of the back-office store.
//!
//! This is the library applications use to hold entity state and talk to
//! the backend.
//!
//! ## Features
//!
//! - **Single-writer dispatcher**: one task reduces every action in arrival order
//! - **Effect runner**: each intent becomes exactly one collaborator call and one outcome
//! - **Response ordering**: stale reads and pre-reset completions are discarded by default
//! - **Collaborator abstraction**: pluggable data access (GraphQL, mock)
//! - **Pure core**: uses store-core for side-effect-free reduction
//!
//! ## Example
//!
//! ```ignore
//! use store_client::{GraphQlCollaborator, Store, StoreConfig, StoreOptions, TracingFeedback};
//!
//! let config = StoreConfig::from_file(Path::new("backoffice.toml"))?;
//! let collaborator = GraphQlCollaborator::<Address>::new(&config.api)?;
//! let store = Store::spawn(collaborator, StoreOptions::from(&config.store), Arc::new(TracingFeedback));
//!
//! let state = store.dispatch_and_settle(Action::LoadList(QueryPatch::none())).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collaborator;
pub mod config;
pub mod effects;
pub mod feedback;
pub mod store;

pub use collaborator::{
    Collaborator, CollaboratorCall, CollaboratorError, GqlOperation, GraphQlCollaborator,
    GraphQlResource, MockCollaborator, MockEntity,
};
pub use config::{ApiConfig, ConfigError, StoreConfig, StoreSection};
pub use feedback::{
    feedback_for, Feedback, FeedbackEvent, Navigation, NoFeedback, Notice, RecordingFeedback,
    TracingFeedback,
};
pub use store::{Store, StoreError, StoreOptions};
