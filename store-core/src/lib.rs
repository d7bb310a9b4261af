//! # store-core
//!
//! Pure logic for the back-office store (no I/O, instant tests).
//!
//! This crate implements the action/reducer/selector layer of a feature
//! store without any network access, so every transition can be tested
//! synchronously.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same state and action → same next state)
//! - One generic implementation shared by every entity type
//!
//! The actual I/O (collaborator calls) is performed by `store-client`, which
//! runs the [`Command`]s planned here and feeds their outcomes back as
//! actions.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod action;
pub mod command;
pub mod ledger;
pub mod reducer;
pub mod selectors;
pub mod state;

pub use action::{Action, Operation, Phase};
pub use command::{plan, Command};
pub use ledger::{RequestLedger, ResponseOrdering, Ticket};
pub use reducer::Reducer;
pub use selectors::{find_by_id, ListViewModel, Memoized, Projector};
pub use state::FeatureState;
