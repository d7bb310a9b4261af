//! # store-types
//!
//! Entity models and shared types for the back-office store.
//!
//! This crate provides the foundational types used across all store crates:
//! - [`Entity`] - The contract a feature store is generic over
//! - [`Address`], [`Client`], [`ClientOrder`] - Delivery entities
//! - [`QueryParams`], [`QueryPatch`], [`Page`], [`Pagination`] - List requests and responses
//! - [`ErrorClass`] - Status-based classification of collaborator failures

#![warn(clippy::all)]

mod address;
mod client;
mod entity;
mod error;
mod order;
mod query;

pub use address::{Address, AddressInput};
pub use client::{Client, ClientInput};
pub use entity::{Entity, NoTransition};
pub use error::{failure_message, ErrorClass, ParseEnumError, UNEXPECTED_ERROR};
pub use order::{
    ClientOrder, ClientOrderInput, ClientOrderStatus, OrderItem, OrderItemInput, OrderTransition,
};
pub use query::{Page, Pagination, QueryParams, QueryPatch, SortDirection, DEFAULT_PAGE_SIZE};
