//! Delivery addresses.

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, NoTransition};

/// A delivery address belonging to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address_id: i64,
    pub street: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub zip_code: String,
    pub client_id: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Create/update payload for an [`Address`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub street: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub zip_code: String,
    pub client_id: i64,
}

impl Entity for Address {
    type Id = i64;
    type Input = AddressInput;
    type Transition = NoTransition;

    const KIND: &'static str = "address";
    const LABEL: &'static str = "Address";
    const DEFAULT_SORT_FIELD: &'static str = "addressId";

    fn id(&self) -> &i64 {
        &self.address_id
    }
}
