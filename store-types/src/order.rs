//! Client orders and their lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::address::Address;
use crate::client::Client;
use crate::entity::Entity;
use crate::error::ParseEnumError;
use crate::query::SortDirection;

/// Delivery status of a client order. Wire names are the backend's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientOrderStatus {
    #[serde(rename = "EN_PREPARATION")]
    InPreparation,
    #[serde(rename = "EN_ROUTE")]
    EnRoute,
    #[serde(rename = "LIVREE")]
    Delivered,
    #[serde(rename = "ANNULEE")]
    Cancelled,
}

impl ClientOrderStatus {
    /// Backend wire name, also used as the list filter value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InPreparation => "EN_PREPARATION",
            Self::EnRoute => "EN_ROUTE",
            Self::Delivered => "LIVREE",
            Self::Cancelled => "ANNULEE",
        }
    }

    /// Whether the order can still change.
    pub fn is_final(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for ClientOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientOrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EN_PREPARATION" => Ok(Self::InPreparation),
            "EN_ROUTE" => Ok(Self::EnRoute),
            "LIVREE" => Ok(Self::Delivered),
            "ANNULEE" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError {
                field: "order status",
                value: s.to_string(),
            }),
        }
    }
}

/// A line of a client order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub quantity: u32,
}

/// A line of a create/update order payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: String,
    pub quantity: u32,
}

/// An order placed by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOrder {
    pub order_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<Address>,
    pub status: ClientOrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Create/update payload for a [`ClientOrder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOrderInput {
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address_id: Option<String>,
    pub items: Vec<OrderItemInput>,
}

/// Lifecycle operations on an existing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderTransition {
    /// Cancel the order.
    Cancel,
    /// Hand the order to delivery (`EN_ROUTE`).
    StartDelivery,
    /// Record the order as delivered.
    MarkDelivered,
}

impl OrderTransition {
    /// Status the order ends up in when the transition succeeds.
    pub fn target_status(self) -> ClientOrderStatus {
        match self {
            Self::Cancel => ClientOrderStatus::Cancelled,
            Self::StartDelivery => ClientOrderStatus::EnRoute,
            Self::MarkDelivered => ClientOrderStatus::Delivered,
        }
    }
}

impl fmt::Display for OrderTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Cancel => "cancelled",
            Self::StartDelivery => "sent for delivery",
            Self::MarkDelivered => "marked as delivered",
        };
        f.write_str(verb)
    }
}

impl Entity for ClientOrder {
    type Id = String;
    type Input = ClientOrderInput;
    type Transition = OrderTransition;

    const KIND: &'static str = "client order";
    const LABEL: &'static str = "Client order";
    const DEFAULT_SORT_FIELD: &'static str = "createdAt";
    const DEFAULT_SORT_DIRECTION: SortDirection = SortDirection::Desc;

    fn id(&self) -> &String {
        &self.order_id
    }
}
