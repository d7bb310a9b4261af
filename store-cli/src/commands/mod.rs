//! CLI command implementations.
//!
//! Every command opens a store for one entity kind, dispatches intents
//! through it and reads the answer back from the settled state, the same
//! path a UI takes.

pub mod addresses;
pub mod clients;
pub mod orders;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use store_client::{
    GraphQlCollaborator, GraphQlResource, MockCollaborator, MockEntity, Store, StoreConfig,
    StoreOptions, TracingFeedback,
};
use store_core::{Action, FeatureState};
use store_types::{
    Address, AddressInput, Client, ClientInput, ClientOrder, ClientOrderInput, OrderItemInput,
    QueryPatch, SortDirection,
};
use tracing::debug;

/// Entity kinds the CLI can drive.
pub trait Resource: GraphQlResource + MockEntity {
    /// This kind's collaborator inside an in-memory backend.
    fn mock(backend: &MockBackend) -> MockCollaborator<Self>;
}

impl Resource for Address {
    fn mock(backend: &MockBackend) -> MockCollaborator<Self> {
        backend.addresses.clone()
    }
}

impl Resource for Client {
    fn mock(backend: &MockBackend) -> MockCollaborator<Self> {
        backend.clients.clone()
    }
}

impl Resource for ClientOrder {
    fn mock(backend: &MockBackend) -> MockCollaborator<Self> {
        backend.orders.clone()
    }
}

/// In-memory backend used with `--mock`.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    /// Addresses.
    pub addresses: MockCollaborator<Address>,
    /// Clients.
    pub clients: MockCollaborator<Client>,
    /// Client orders.
    pub orders: MockCollaborator<ClientOrder>,
}

impl MockBackend {
    /// A backend holding a few clients, addresses and orders.
    ///
    /// Clients are `c-1`..`c-3`, addresses `1`..`3` and orders `o-1`..`o-2`.
    pub fn seeded() -> Self {
        let clients = [
            ("Dupont SARL", "contact@dupont.fr"),
            ("Martin & Fils", "info@martin.fr"),
            ("Leroy Logistique", "hello@leroy.fr"),
        ];
        let clients = clients
            .iter()
            .enumerate()
            .map(|(i, (name, email))| {
                Client::build(
                    i as u64 + 1,
                    &ClientInput {
                        name: name.to_string(),
                        email: email.to_string(),
                        phone_number: format!("01020304{:02}", i + 1),
                    },
                )
            })
            .collect();

        let addresses = [("Paris", "75001"), ("Lyon", "69002"), ("Lille", "59000")];
        let addresses = addresses
            .iter()
            .enumerate()
            .map(|(i, (city, zip))| {
                Address::build(
                    i as u64 + 1,
                    &AddressInput {
                        street: format!("{} rue de la Paix", i + 1),
                        city: city.to_string(),
                        state: None,
                        country: Some("France".into()),
                        zip_code: zip.to_string(),
                        client_id: i as i64 + 1,
                    },
                )
            })
            .collect();

        let orders = (1..=2u64)
            .map(|seq| {
                ClientOrder::build(
                    seq,
                    &ClientOrderInput {
                        client_id: format!("c-{}", seq),
                        delivery_address_id: Some(seq.to_string()),
                        items: vec![OrderItemInput {
                            product_id: format!("P-{}", seq * 10),
                            quantity: seq as u32,
                        }],
                    },
                )
            })
            .collect();

        Self {
            addresses: MockCollaborator::with_items(addresses),
            clients: MockCollaborator::with_items(clients),
            orders: MockCollaborator::with_items(orders),
        }
    }
}

/// Where commands send their requests.
#[derive(Debug)]
pub struct Session {
    config: StoreConfig,
    mock: Option<MockBackend>,
}

impl Session {
    /// Talk to the configured GraphQL endpoint.
    pub fn remote(config: StoreConfig) -> Self {
        Self { config, mock: None }
    }

    /// Talk to an in-memory backend.
    pub fn mock(config: StoreConfig, backend: MockBackend) -> Self {
        Self {
            config,
            mock: Some(backend),
        }
    }

    /// Open a store for one entity kind.
    pub fn open<E: Resource>(&self) -> Result<Store<E>> {
        debug!(kind = E::KIND, mock = self.mock.is_some(), "opening store");
        let options = StoreOptions::from(&self.config.store);
        let feedback = Arc::new(TracingFeedback);

        match &self.mock {
            Some(backend) => Ok(Store::spawn(E::mock(backend), options, feedback)),
            None => {
                let collaborator = GraphQlCollaborator::<E>::new(&self.config.api)
                    .context("Failed to build HTTP client")?;
                Ok(Store::spawn(collaborator, options, feedback))
            }
        }
    }
}

/// Paging and sorting flags shared by every `list` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Zero-based page index
    #[arg(long)]
    pub page: Option<u32>,

    /// Items per page
    #[arg(long)]
    pub size: Option<u32>,

    /// Field to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending (requires --sort)
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

impl ListArgs {
    /// The query change these flags ask for.
    pub fn patch(&self) -> QueryPatch {
        let mut patch = QueryPatch::none();
        if let Some(page) = self.page {
            patch.page_index = Some(page);
        }
        if let Some(size) = self.size {
            patch = patch.with_page_size(size);
        }
        if let Some(field) = &self.sort {
            let direction = if self.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            patch = patch.with_sort(field, direction);
        }
        patch
    }
}

/// Dispatch `action` and fail if its operation ended in an error.
pub async fn settle<E: Resource>(
    store: &Store<E>,
    action: Action<E>,
) -> Result<Arc<FeatureState<E>>> {
    let operation = action.operation();
    let name = action.name();
    let state = store
        .dispatch_and_settle(action)
        .await
        .with_context(|| format!("Failed to run {}", name))?;

    if let Some(message) = operation.and_then(|op| state.error_for(op)) {
        debug!(kind = E::KIND, action = name, "command failed");
        bail!("{}", message);
    }
    Ok(state)
}

/// Load one page.
pub async fn list<E: Resource>(session: &Session, patch: QueryPatch) -> Result<Value> {
    let store = session.open::<E>()?;
    let state = settle(&store, Action::LoadList(patch)).await?;
    store.shutdown().await;

    Ok(json!({
        "items": state.items,
        "pagination": state.pagination,
    }))
}

/// Load one entity.
pub async fn get<E: Resource>(session: &Session, id: E::Id) -> Result<Value> {
    let store = session.open::<E>()?;
    let state = settle(&store, Action::LoadOne(id)).await?;
    store.shutdown().await;
    selected(&state)
}

/// Create an entity.
pub async fn create<E: Resource>(session: &Session, input: E::Input) -> Result<Value> {
    let store = session.open::<E>()?;
    let state = settle(&store, Action::Create(input)).await?;
    store.shutdown().await;
    selected(&state)
}

/// Update an entity.
///
/// The entity is loaded first, as an edit form would, so the updated version
/// replaces the selection.
pub async fn update<E: Resource>(session: &Session, id: E::Id, input: E::Input) -> Result<Value> {
    let store = session.open::<E>()?;
    settle(&store, Action::LoadOne(id.clone())).await?;
    let state = settle(&store, Action::Update(id, input)).await?;
    store.shutdown().await;
    selected(&state)
}

/// Delete an entity.
pub async fn delete<E: Resource>(session: &Session, id: E::Id) -> Result<Value> {
    let store = session.open::<E>()?;
    settle(&store, Action::Delete(id.clone())).await?;
    store.shutdown().await;
    Ok(json!({ "deleted": id }))
}

/// Apply an entity-specific operation.
pub async fn transition<E: Resource>(
    session: &Session,
    id: E::Id,
    transition: E::Transition,
) -> Result<Value> {
    let store = session.open::<E>()?;
    settle(&store, Action::LoadOne(id.clone())).await?;
    let state = settle(&store, Action::Transition(id, transition)).await?;
    store.shutdown().await;
    selected(&state)
}

fn selected<E: Resource>(state: &FeatureState<E>) -> Result<Value> {
    match &state.selected {
        Some(entity) => to_value(entity),
        None => bail!("{} missing from the response", E::LABEL),
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).context("Failed to serialize output")
}

/// Print a command's output as pretty JSON.
pub fn print(value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to format output")?;
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (Session, MockBackend) {
        let backend = MockBackend::default();
        (
            Session::mock(StoreConfig::default(), backend.clone()),
            backend,
        )
    }

    fn input(city: &str) -> AddressInput {
        AddressInput {
            street: "1 Main St".into(),
            city: city.into(),
            state: None,
            country: None,
            zip_code: "75001".into(),
            client_id: 7,
        }
    }

    #[test]
    fn list_args_build_patch() {
        let args = ListArgs {
            page: Some(2),
            size: Some(5),
            sort: Some("city".into()),
            desc: true,
        };
        let patch = args.patch();
        assert_eq!(patch.page_index, Some(2));
        assert_eq!(patch.page_size, Some(5));
        assert_eq!(patch.sort_field.as_deref(), Some("city"));
        assert_eq!(patch.sort_direction, Some(SortDirection::Desc));

        assert!(ListArgs::default().patch().is_empty());
    }

    #[tokio::test]
    async fn create_then_list() {
        let (session, _backend) = session();
        let created = create::<Address>(&session, input("Paris")).await.unwrap();
        assert_eq!(created["city"], "Paris");

        let page = list::<Address>(&session, QueryPatch::none()).await.unwrap();
        assert_eq!(page["items"].as_array().unwrap().len(), 1);
        assert_eq!(page["pagination"]["totalElements"], 1);
    }

    #[tokio::test]
    async fn update_returns_new_version() {
        let (session, _backend) = session();
        create::<Address>(&session, input("Paris")).await.unwrap();

        let updated = update::<Address>(&session, 1, input("Lyon")).await.unwrap();
        assert_eq!(updated["addressId"], 1);
        assert_eq!(updated["city"], "Lyon");
    }

    #[tokio::test]
    async fn missing_entity_is_an_error() {
        let (session, _backend) = session();
        let err = get::<Address>(&session, 42).await.unwrap_err();
        assert_eq!(err.to_string(), "Resource not found.");
    }

    #[tokio::test]
    async fn backend_failure_surfaces_message() {
        let (session, backend) = session();
        backend.addresses.fail_next_delete(409, "still referenced");
        let err = delete::<Address>(&session, 1).await.unwrap_err();
        assert_eq!(err.to_string(), "Conflict. Resource already exists.");
    }

    #[tokio::test]
    async fn seeded_backend_serves_every_kind() {
        let session = Session::mock(StoreConfig::default(), MockBackend::seeded());

        let addresses = list::<Address>(&session, QueryPatch::none()).await.unwrap();
        assert_eq!(addresses["pagination"]["totalElements"], 3);
        let clients = list::<Client>(&session, QueryPatch::none()).await.unwrap();
        assert_eq!(clients["items"].as_array().unwrap().len(), 3);

        let order = get::<ClientOrder>(&session, "o-2".into()).await.unwrap();
        assert_eq!(order["clientId"], "c-2");
        assert_eq!(order["status"], "EN_PREPARATION");

        let created = create::<Address>(&session, input("Nice")).await.unwrap();
        assert_eq!(created["addressId"], 4);
    }

    #[tokio::test]
    async fn delete_reports_key() {
        let (session, backend) = session();
        create::<Address>(&session, input("Paris")).await.unwrap();

        let out = delete::<Address>(&session, 1).await.unwrap();
        assert_eq!(out, json!({ "deleted": 1 }));
        assert!(backend.addresses.items().is_empty());
    }
}
