//! GraphQL collaborator.
//!
//! Every call is an HTTP POST of `{query, variables}` to one endpoint. The
//! documents and variable shapes per entity live in [`GraphQlResource`]
//! implementations; [`GraphQlCollaborator`] only knows how to send them and
//! unwrap the response envelope.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use store_types::{
    Address, Client, ClientOrder, ClientOrderStatus, Entity, OrderTransition, Page, QueryParams,
};
use tracing::debug;

use super::{Collaborator, CollaboratorError};
use crate::config::ApiConfig;

/// One GraphQL document and the `data` field its result is under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GqlOperation {
    /// Query or mutation text.
    pub document: &'static str,
    /// Top-level field of `data` holding the result.
    pub field: &'static str,
}

/// How an entity maps onto the backend's GraphQL schema.
///
/// Operations the backend does not expose are `None` and surface as
/// [`CollaboratorError::Unsupported`].
pub trait GraphQlResource: Entity {
    /// Paged list query.
    const LIST: GqlOperation;
    /// Fetch by id, taking `$id`.
    const GET: Option<GqlOperation> = None;
    /// Create mutation, taking `$input`.
    const CREATE: Option<GqlOperation> = None;
    /// Update mutation, taking `$id` and `$input`.
    const UPDATE: Option<GqlOperation> = None;
    /// Delete mutation, taking `$id`.
    const DELETE: Option<GqlOperation> = None;

    /// Operation and variables of a list request.
    fn list_request(query: &QueryParams) -> (GqlOperation, Value) {
        (
            Self::LIST,
            json!({
                "page": query.page_index,
                "size": query.page_size,
                "sortBy": query.sort_field,
                "sortDir": query.sort_direction.as_str(),
            }),
        )
    }

    /// Operation and variables of an entity-specific operation.
    fn transition_request(
        id: &Self::Id,
        transition: &Self::Transition,
    ) -> Option<(GqlOperation, Value)> {
        let _ = (id, transition);
        None
    }
}

impl GraphQlResource for Address {
    const LIST: GqlOperation = GqlOperation {
        document: "query GetAllAddresses($page: Int!, $size: Int!, $sortBy: String!, $sortDir: String!) { \
                   getAllAddresses(page: $page, size: $size, sortBy: $sortBy, sortDir: $sortDir) { \
                   content { addressId street city state country zipCode clientId createdAt updatedAt } \
                   totalElements totalPages number size empty } }",
        field: "getAllAddresses",
    };
    const GET: Option<GqlOperation> = Some(GqlOperation {
        document: "query GetAddressById($id: ID!) { getAddressById(id: $id) { \
                   addressId street city state country zipCode clientId createdAt updatedAt } }",
        field: "getAddressById",
    });
    const CREATE: Option<GqlOperation> = Some(GqlOperation {
        document: "mutation CreateAddress($input: AddressInput!) { createAddress(input: $input) { \
                   addressId street city state country zipCode clientId createdAt updatedAt } }",
        field: "createAddress",
    });
    const UPDATE: Option<GqlOperation> = Some(GqlOperation {
        document: "mutation UpdateAddress($id: ID!, $input: AddressInput!) { \
                   updateAddress(id: $id, input: $input) { \
                   addressId street city state country zipCode clientId createdAt updatedAt } }",
        field: "updateAddress",
    });
    const DELETE: Option<GqlOperation> = Some(GqlOperation {
        document: "mutation DeleteAddress($id: ID!) { deleteAddress(id: $id) }",
        field: "deleteAddress",
    });
}

impl GraphQlResource for Client {
    const LIST: GqlOperation = GqlOperation {
        document: "query GetAllClients($page: Int!, $size: Int!, $sortBy: String!, $sortDir: String!) { \
                   getAllClients(page: $page, size: $size, sortBy: $sortBy, sortDir: $sortDir) { \
                   content { clientId name email phoneNumber createdAt updatedAt } \
                   totalElements totalPages number size empty } }",
        field: "getAllClients",
    };
}

const ORDERS_BY_STATUS: GqlOperation = GqlOperation {
    document: "query GetClientOrdersByStatus($status: String!, $page: Int!, $size: Int!) { \
               getClientOrdersByStatus(status: $status, page: $page, size: $size) { \
               content { orderId orderNumber status totalAmount createdAt updatedAt } \
               totalElements totalPages number size } }",
    field: "getClientOrdersByStatus",
};

const CANCEL_ORDER: GqlOperation = GqlOperation {
    document: "mutation CancelClientOrder($id: ID!) { cancelClientOrder(id: $id) { \
               orderId orderNumber status updatedAt } }",
    field: "cancelClientOrder",
};

impl GraphQlResource for ClientOrder {
    const LIST: GqlOperation = GqlOperation {
        document: "query GetAllClientOrders($page: Int, $size: Int, $sortBy: String) { \
                   getAllClientOrders(page: $page, size: $size, sortBy: $sortBy) { \
                   content { orderId orderNumber status totalAmount createdAt updatedAt } \
                   totalElements totalPages number size } }",
        field: "getAllClientOrders",
    };
    const GET: Option<GqlOperation> = Some(GqlOperation {
        document: "query GetClientOrderById($id: ID!) { getClientOrderById(id: $id) { \
                   orderId orderNumber status totalAmount createdAt updatedAt } }",
        field: "getClientOrderById",
    });
    const CREATE: Option<GqlOperation> = Some(GqlOperation {
        document: "mutation CreateClientOrder($input: ClientOrderInput!) { \
                   createClientOrder(input: $input) { \
                   orderId orderNumber status totalAmount createdAt updatedAt } }",
        field: "createClientOrder",
    });
    const UPDATE: Option<GqlOperation> = Some(GqlOperation {
        document: "mutation UpdateClientOrder($id: ID!, $input: ClientOrderInput!) { \
                   updateClientOrder(id: $id, input: $input) { \
                   orderId orderNumber status totalAmount createdAt updatedAt } }",
        field: "updateClientOrder",
    });

    /// A filter naming a status switches to the by-status query, which the
    /// backend does not sort.
    fn list_request(query: &QueryParams) -> (GqlOperation, Value) {
        let status = query
            .filter
            .as_deref()
            .and_then(|f| f.parse::<ClientOrderStatus>().ok());
        match status {
            Some(status) => (
                ORDERS_BY_STATUS,
                json!({
                    "status": status.as_str(),
                    "page": query.page_index,
                    "size": query.page_size,
                }),
            ),
            None => (
                Self::LIST,
                json!({
                    "page": query.page_index,
                    "size": query.page_size,
                    "sortBy": query.sort_field,
                }),
            ),
        }
    }

    fn transition_request(
        id: &String,
        transition: &OrderTransition,
    ) -> Option<(GqlOperation, Value)> {
        match transition {
            OrderTransition::Cancel => Some((CANCEL_ORDER, json!({ "id": id }))),
            OrderTransition::StartDelivery | OrderTransition::MarkDelivered => None,
        }
    }
}

/// Pull `data.<field>` out of a GraphQL response body.
///
/// A non-empty `errors` array wins over any data.
pub fn extract_field(body: Value, field: &str) -> Result<Value, CollaboratorError> {
    if let Some(first) = body
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
    {
        let message = first
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(CollaboratorError::GraphQl(message.to_string()));
    }

    match body.get("data").and_then(|data| data.get(field)) {
        Some(value) => Ok(value.clone()),
        None => Err(CollaboratorError::EmptyResponse),
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, CollaboratorError> {
    serde_json::from_value(value).map_err(|e| CollaboratorError::Decode(e.to_string()))
}

/// Decode a mutation result; `null` counts as no data.
fn decode_present<T: DeserializeOwned>(value: Value) -> Result<T, CollaboratorError> {
    if value.is_null() {
        return Err(CollaboratorError::EmptyResponse);
    }
    decode(value)
}

fn unsupported<E: Entity>(what: &str) -> CollaboratorError {
    CollaboratorError::Unsupported(format!("{} {}", what, E::KIND))
}

/// Collaborator backed by a GraphQL endpoint.
pub struct GraphQlCollaborator<E> {
    http: reqwest::Client,
    endpoint: String,
    bearer_token: Option<String>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> GraphQlCollaborator<E> {
    /// Create a collaborator from API configuration.
    pub fn new(api: &ApiConfig) -> Result<Self, CollaboratorError> {
        let http = reqwest::Client::builder()
            .timeout(api.timeout())
            .build()
            .map_err(|e| CollaboratorError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: api.endpoint.clone(),
            bearer_token: api.bearer_token.clone(),
            _entity: PhantomData,
        })
    }

    /// Endpoint requests go to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one operation and return its result field.
    async fn execute(
        &self,
        operation: &GqlOperation,
        variables: Value,
    ) -> Result<Value, CollaboratorError> {
        debug!(field = operation.field, "GraphQL request");

        let mut request = self.http.post(&self.endpoint).json(&json!({
            "query": operation.document,
            "variables": variables,
        }));
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CollaboratorError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollaboratorError::Http {
                status: status.as_u16(),
                message: format!("Http failure response for {}: {}", self.endpoint, status),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Decode(e.to_string()))?;
        extract_field(body, operation.field)
    }
}

impl<E> std::fmt::Debug for GraphQlCollaborator<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQlCollaborator")
            .field("endpoint", &self.endpoint)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[async_trait]
impl<E: GraphQlResource> Collaborator<E> for GraphQlCollaborator<E> {
    async fn list(&self, query: &QueryParams) -> Result<Page<E>, CollaboratorError> {
        let (operation, variables) = E::list_request(query);
        let value = self.execute(&operation, variables).await?;
        decode_present(value)
    }

    async fn get(&self, id: &E::Id) -> Result<E, CollaboratorError> {
        let operation = E::GET.ok_or_else(|| unsupported::<E>("get"))?;
        let value = self.execute(&operation, json!({ "id": id })).await?;
        if value.is_null() {
            return Err(CollaboratorError::NotFound(format!("{} {}", E::KIND, id)));
        }
        decode(value)
    }

    async fn create(&self, input: &E::Input) -> Result<E, CollaboratorError> {
        let operation = E::CREATE.ok_or_else(|| unsupported::<E>("create"))?;
        let value = self.execute(&operation, json!({ "input": input })).await?;
        decode_present(value)
    }

    async fn update(&self, id: &E::Id, input: &E::Input) -> Result<E, CollaboratorError> {
        let operation = E::UPDATE.ok_or_else(|| unsupported::<E>("update"))?;
        let value = self
            .execute(&operation, json!({ "id": id, "input": input }))
            .await?;
        decode_present(value)
    }

    async fn delete(&self, id: &E::Id) -> Result<(), CollaboratorError> {
        let operation = E::DELETE.ok_or_else(|| unsupported::<E>("delete"))?;
        let value = self.execute(&operation, json!({ "id": id })).await?;
        // The mutation answers a bare boolean; only an explicit false is a refusal.
        if value == Value::Bool(false) {
            return Err(CollaboratorError::GraphQl(format!(
                "{} {} was not deleted",
                E::KIND,
                id
            )));
        }
        Ok(())
    }

    async fn transition(
        &self,
        id: &E::Id,
        transition: &E::Transition,
    ) -> Result<E, CollaboratorError> {
        let (operation, variables) = E::transition_request(id, transition).ok_or_else(|| {
            CollaboratorError::Unsupported(format!("{} {}", E::KIND, transition))
        })?;
        let value = self.execute(&operation, variables).await?;
        decode_present(value)
    }
}
