//! Mock collaborator for testing.
//!
//! Keeps entities in memory, records every call, and lets tests force
//! failures or hold list responses until released.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use store_core::{Command, Operation};
use store_types::{
    Address, Client, ClientOrder, Entity, OrderItem, Page, QueryParams,
};
use tokio::sync::oneshot;

use super::{Collaborator, CollaboratorError};

/// A call recorded by [`MockCollaborator`].
pub type CollaboratorCall<E> = Command<E>;

/// Entities the mock knows how to create and modify.
pub trait MockEntity: Entity {
    /// Build a stored entity from a create payload. `seq` starts at 1.
    fn build(seq: u64, input: &Self::Input) -> Self;

    /// Apply an update payload in place.
    fn apply(&mut self, input: &Self::Input);

    /// Apply an entity-specific operation in place.
    fn transition(&mut self, transition: &Self::Transition) -> Result<(), CollaboratorError>;
}

/// Mock collaborator for testing.
///
/// Clones share state, so a test can keep a handle after moving one into a
/// store.
pub struct MockCollaborator<E: Entity> {
    inner: Arc<Mutex<MockInner<E>>>,
}

struct MockInner<E: Entity> {
    items: Vec<E>,
    next_seq: u64,
    calls: Vec<CollaboratorCall<E>>,
    fail_next: HashMap<Operation, (u16, String)>,
    list_gates: HashMap<u32, oneshot::Receiver<()>>,
}

impl<E: Entity> MockCollaborator<E> {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Create a mock pre-loaded with entities.
    pub fn with_items(items: Vec<E>) -> Self {
        let next_seq = items.len() as u64 + 1;
        Self {
            inner: Arc::new(Mutex::new(MockInner {
                items,
                next_seq,
                calls: Vec::new(),
                fail_next: HashMap::new(),
                list_gates: HashMap::new(),
            })),
        }
    }

    /// Entities currently stored.
    pub fn items(&self) -> Vec<E> {
        self.inner.lock().items.clone()
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<CollaboratorCall<E>> {
        self.inner.lock().calls.clone()
    }

    /// Query parameters of every list call, in order.
    pub fn list_queries(&self) -> Vec<QueryParams> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Command::List(query) => Some(query.clone()),
                _ => None,
            })
            .collect()
    }

    /// Cause the next call of this class to fail with an HTTP status.
    pub fn fail_next(&self, operation: Operation, status: u16, message: &str) {
        self.inner
            .lock()
            .fail_next
            .insert(operation, (status, message.to_string()));
    }

    /// Cause the next list() to fail.
    pub fn fail_next_list(&self, status: u16, message: &str) {
        self.fail_next(Operation::List, status, message);
    }

    /// Cause the next create() to fail.
    pub fn fail_next_create(&self, status: u16, message: &str) {
        self.fail_next(Operation::Create, status, message);
    }

    /// Cause the next delete() to fail.
    pub fn fail_next_delete(&self, status: u16, message: &str) {
        self.fail_next(Operation::Delete, status, message);
    }

    /// Hold the next list() of `page_index` until the returned sender fires
    /// or is dropped.
    pub fn hold_list_page(&self, page_index: u32) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.inner.lock().list_gates.insert(page_index, rx);
        tx
    }

    /// Record the call and take a forced failure for its class.
    fn begin(&self, call: CollaboratorCall<E>) -> Result<(), CollaboratorError> {
        let mut inner = self.inner.lock();
        let operation = call.operation();
        inner.calls.push(call);
        match inner.fail_next.remove(&operation) {
            Some((status, message)) => Err(CollaboratorError::Http { status, message }),
            None => Ok(()),
        }
    }
}

impl<E: Entity> Default for MockCollaborator<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Clone for MockCollaborator<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Entity> std::fmt::Debug for MockCollaborator<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("MockCollaborator")
            .field("kind", &E::KIND)
            .field("items", &inner.items.len())
            .field("calls", &inner.calls.len())
            .finish()
    }
}

fn not_found<E: Entity>(id: &E::Id) -> CollaboratorError {
    CollaboratorError::NotFound(format!("{} {}", E::KIND, id))
}

fn matches_filter<E: Entity>(item: &E, filter: Option<&str>) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    serde_json::to_string(item)
        .map(|json| json.to_lowercase().contains(&filter.to_lowercase()))
        .unwrap_or(false)
}

#[async_trait]
impl<E: MockEntity> Collaborator<E> for MockCollaborator<E> {
    async fn list(&self, query: &QueryParams) -> Result<Page<E>, CollaboratorError> {
        self.begin(Command::List(query.clone()))?;

        let gate = self.inner.lock().list_gates.remove(&query.page_index);
        if let Some(gate) = gate {
            // A dropped sender releases the call too.
            let _ = gate.await;
        }

        let inner = self.inner.lock();
        let matching: Vec<&E> = inner
            .items
            .iter()
            .filter(|item| matches_filter(*item, query.filter.as_deref()))
            .collect();
        let size = query.page_size.max(1) as usize;
        let total_elements = matching.len() as u64;
        let total_pages = matching.len().div_ceil(size) as u32;
        let content = matching
            .into_iter()
            .skip(query.page_index as usize * size)
            .take(size)
            .cloned()
            .collect();

        Ok(Page {
            content,
            total_elements,
            total_pages,
            page_index: query.page_index,
            page_size: query.page_size,
        })
    }

    async fn get(&self, id: &E::Id) -> Result<E, CollaboratorError> {
        self.begin(Command::Get(id.clone()))?;
        let inner = self.inner.lock();
        inner
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or_else(|| not_found::<E>(id))
    }

    async fn create(&self, input: &E::Input) -> Result<E, CollaboratorError> {
        self.begin(Command::Create(input.clone()))?;
        let mut inner = self.inner.lock();
        let entity = E::build(inner.next_seq, input);
        inner.next_seq += 1;
        inner.items.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: &E::Id, input: &E::Input) -> Result<E, CollaboratorError> {
        self.begin(Command::Update(id.clone(), input.clone()))?;
        let mut inner = self.inner.lock();
        let item = inner
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| not_found::<E>(id))?;
        item.apply(input);
        Ok(item.clone())
    }

    async fn delete(&self, id: &E::Id) -> Result<(), CollaboratorError> {
        self.begin(Command::Delete(id.clone()))?;
        let mut inner = self.inner.lock();
        let index = inner
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| not_found::<E>(id))?;
        inner.items.remove(index);
        Ok(())
    }

    async fn transition(
        &self,
        id: &E::Id,
        transition: &E::Transition,
    ) -> Result<E, CollaboratorError> {
        self.begin(Command::Transition(id.clone(), transition.clone()))?;
        let mut inner = self.inner.lock();
        let item = inner
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| not_found::<E>(id))?;
        item.transition(transition)?;
        Ok(item.clone())
    }
}

// ===========================================
// Entity fixtures
// ===========================================

impl MockEntity for Address {
    fn build(seq: u64, input: &Self::Input) -> Self {
        let mut address = Address {
            address_id: seq as i64,
            street: String::new(),
            city: String::new(),
            state: None,
            country: None,
            zip_code: String::new(),
            client_id: input.client_id,
            created_at: String::new(),
            updated_at: String::new(),
        };
        address.apply(input);
        address
    }

    fn apply(&mut self, input: &Self::Input) {
        self.street = input.street.clone();
        self.city = input.city.clone();
        self.state = input.state.clone();
        self.country = input.country.clone();
        self.zip_code = input.zip_code.clone();
        self.client_id = input.client_id;
    }

    fn transition(&mut self, transition: &Self::Transition) -> Result<(), CollaboratorError> {
        match *transition {}
    }
}

impl MockEntity for Client {
    fn build(seq: u64, input: &Self::Input) -> Self {
        Client {
            client_id: format!("c-{}", seq),
            name: input.name.clone(),
            email: input.email.clone(),
            phone_number: input.phone_number.clone(),
            created_at: None,
            updated_at: None,
        }
    }

    fn apply(&mut self, input: &Self::Input) {
        self.name = input.name.clone();
        self.email = input.email.clone();
        self.phone_number = input.phone_number.clone();
    }

    fn transition(&mut self, transition: &Self::Transition) -> Result<(), CollaboratorError> {
        match *transition {}
    }
}

impl MockEntity for ClientOrder {
    fn build(seq: u64, input: &Self::Input) -> Self {
        let mut order = ClientOrder {
            order_id: format!("o-{}", seq),
            order_number: Some(format!("CMD-{:04}", seq)),
            client_id: None,
            client: None,
            delivery_address_id: None,
            delivery_address: None,
            status: store_types::ClientOrderStatus::InPreparation,
            total_amount: None,
            items: Vec::new(),
            created_at: None,
            updated_at: None,
        };
        order.apply(input);
        order
    }

    fn apply(&mut self, input: &Self::Input) {
        self.client_id = Some(input.client_id.clone());
        self.delivery_address_id = input.delivery_address_id.clone();
        self.items = input
            .items
            .iter()
            .map(|line| OrderItem {
                id: None,
                product_id: line.product_id.clone(),
                product_name: None,
                quantity: line.quantity,
            })
            .collect();
    }

    fn transition(&mut self, transition: &Self::Transition) -> Result<(), CollaboratorError> {
        if self.status.is_final() {
            return Err(CollaboratorError::Http {
                status: 400,
                message: format!("order {} is already {}", self.order_id, self.status),
            });
        }
        self.status = transition.target_status();
        Ok(())
    }
}
