//! Delivery clients.

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, NoTransition};

/// A client that places orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub client_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Create/update payload for a [`Client`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInput {
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

impl Entity for Client {
    type Id = String;
    type Input = ClientInput;
    type Transition = NoTransition;

    const KIND: &'static str = "client";
    const LABEL: &'static str = "Client";
    const DEFAULT_SORT_FIELD: &'static str = "name";

    fn id(&self) -> &String {
        &self.client_id
    }
}
