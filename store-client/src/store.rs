//! Store - the main interface of the back-office store.
//!
//! This module provides [`Store`], the state container an application
//! dispatches actions into and reads state from.
//!
//! # Architecture
//!
//! A single dispatcher task owns the state. Actions from the application and
//! outcomes of finished effects go through one channel and are reduced in
//! arrival order. Each reduced state is published as a new snapshot.
//!
//! ```text
//! Application → dispatch → Dispatcher → Reducer (store-core, pure)
//!                              ↓   ↑
//!                         effect task → Collaborator → backend
//! ```
//!
//! # Example
//!
//! ```ignore
//! use store_client::{MockCollaborator, NoFeedback, Store, StoreOptions};
//!
//! let store = Store::<Address>::spawn(collaborator, StoreOptions::default(), Arc::new(NoFeedback));
//! store.dispatch(Action::LoadList(QueryPatch::none()))?;
//! store.settled().await?;
//! println!("{} addresses", store.state().items.len());
//! ```

use std::sync::Arc;

use store_core::{
    plan, Action, Command, FeatureState, ListViewModel, Memoized, Reducer, RequestLedger,
    ResponseOrdering, Ticket,
};
use store_types::{Entity, QueryParams};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::collaborator::Collaborator;
use crate::config::StoreSection;
use crate::effects;
use crate::feedback::{feedback_for, Feedback};

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The dispatcher task is gone.
    #[error("store is shut down")]
    Closed,
}

/// Options for a new store.
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// What to do with out-of-order completions.
    pub response_ordering: ResponseOrdering,
    /// Page size of the initial query; the entity default when unset.
    pub page_size: Option<u32>,
}

impl StoreOptions {
    /// Set the ordering policy.
    pub fn with_ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.response_ordering = ordering;
        self
    }

    /// Set the initial page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    fn initial_query<E: Entity>(&self) -> QueryParams {
        let query = E::default_query();
        match self.page_size {
            Some(size) => query.with_page_size(size),
            None => query,
        }
    }
}

impl From<&StoreSection> for StoreOptions {
    fn from(section: &StoreSection) -> Self {
        Self {
            response_ordering: section.response_ordering,
            page_size: Some(section.page_size),
        }
    }
}

enum Message<E: Entity> {
    Dispatch(Action<E>),
    Completed {
        ticket: Ticket,
        command: Command<E>,
        outcome: Action<E>,
    },
    Shutdown,
}

/// State container for one entity feature.
///
/// Must be created inside a tokio runtime. Dropping the store stops its
/// dispatcher; effects already running finish but their outcomes are lost.
pub struct Store<E: Entity> {
    inbox: mpsc::UnboundedSender<Message<E>>,
    snapshots: watch::Receiver<Arc<FeatureState<E>>>,
    /// Dispatched actions and running effects not yet reduced.
    pending: Arc<watch::Sender<usize>>,
    list_view: Memoized<E, ListViewModel<E>>,
    task: Option<JoinHandle<()>>,
}

impl<E: Entity> Store<E> {
    /// Start a store backed by `collaborator`.
    pub fn spawn<C>(collaborator: C, options: StoreOptions, feedback: Arc<dyn Feedback>) -> Self
    where
        C: Collaborator<E> + 'static,
    {
        let reducer = Reducer::new(FeatureState::with_query(options.initial_query::<E>()));
        let initial = Arc::new(reducer.initial_state());

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::clone(&initial));
        let (pending_tx, _) = watch::channel(0usize);
        let pending = Arc::new(pending_tx);

        let dispatcher = Dispatcher {
            reducer,
            state: initial,
            ledger: RequestLedger::new(options.response_ordering),
            collaborator: Arc::new(collaborator),
            feedback,
            inbox: inbox_tx.clone(),
            snapshots: snapshot_tx,
            pending: Arc::clone(&pending),
        };

        info!(
            kind = E::KIND,
            ordering = ?options.response_ordering,
            "store started"
        );
        let task = tokio::spawn(dispatcher.run(inbox_rx));

        Self {
            inbox: inbox_tx,
            snapshots: snapshot_rx,
            pending,
            list_view: Memoized::list_view(),
            task: Some(task),
        }
    }

    /// Queue an action. Returns before the action is reduced.
    pub fn dispatch(&self, action: Action<E>) -> Result<(), StoreError> {
        self.pending.send_modify(|n| *n += 1);
        self.inbox.send(Message::Dispatch(action)).map_err(|_| {
            self.pending.send_modify(|n| *n = n.saturating_sub(1));
            StoreError::Closed
        })
    }

    /// Queue an action and wait until the store is settled.
    pub async fn dispatch_and_settle(
        &self,
        action: Action<E>,
    ) -> Result<Arc<FeatureState<E>>, StoreError> {
        self.dispatch(action)?;
        self.settled().await?;
        Ok(self.state())
    }

    /// Wait until every dispatched action and every effect it started has
    /// been reduced.
    pub async fn settled(&self) -> Result<(), StoreError> {
        let mut pending = self.pending.subscribe();
        pending
            .wait_for(|n| *n == 0)
            .await
            .map(|_| ())
            .map_err(|_| StoreError::Closed)
    }

    /// The latest state snapshot.
    pub fn state(&self) -> Arc<FeatureState<E>> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// Receiver notified on every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<FeatureState<E>>> {
        self.snapshots.clone()
    }

    /// Evaluate a memoized selector against the latest snapshot.
    pub fn select<T>(&self, selector: &Memoized<E, T>) -> Arc<T> {
        selector.select(&self.state())
    }

    /// List view model of the latest snapshot.
    pub fn list_view(&self) -> Arc<ListViewModel<E>> {
        self.select(&self.list_view)
    }

    /// Stop the dispatcher after it has reduced everything queued so far.
    pub async fn shutdown(mut self) {
        let _ = self.inbox.send(Message::Shutdown);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl<E: Entity> Drop for Store<E> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<E: Entity> std::fmt::Debug for Store<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("kind", &E::KIND)
            .field("pending", &*self.pending.borrow())
            .finish()
    }
}

/// Owns the state; the only writer.
struct Dispatcher<E: Entity> {
    reducer: Reducer<E>,
    state: Arc<FeatureState<E>>,
    ledger: RequestLedger,
    collaborator: Arc<dyn Collaborator<E>>,
    feedback: Arc<dyn Feedback>,
    inbox: mpsc::UnboundedSender<Message<E>>,
    snapshots: watch::Sender<Arc<FeatureState<E>>>,
    pending: Arc<watch::Sender<usize>>,
}

impl<E: Entity> Dispatcher<E> {
    async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Message<E>>) {
        while let Some(message) = inbox.recv().await {
            match message {
                Message::Dispatch(action) => self.dispatch(action),
                Message::Completed {
                    ticket,
                    command,
                    outcome,
                } => self.complete(ticket, command, outcome),
                Message::Shutdown => break,
            }
        }
        info!(kind = E::KIND, "store stopped");
    }

    fn dispatch(&mut self, action: Action<E>) {
        debug!(kind = E::KIND, action = action.name(), "dispatch");

        if let Action::ResetState = action {
            self.ledger.reset();
        }
        self.apply(&action);

        match plan(self.state.as_ref(), &action) {
            // The effect inherits this action's pending slot.
            Some(command) => self.spawn_effect(command),
            None => self.settle_one(),
        }
    }

    fn complete(&mut self, ticket: Ticket, command: Command<E>, outcome: Action<E>) {
        if self.ledger.admit(&ticket) {
            debug!(
                kind = E::KIND,
                seq = ticket.seq,
                action = outcome.name(),
                "completed"
            );
            self.apply(&outcome);
            for event in feedback_for(&command, &outcome) {
                self.feedback.emit(event);
            }
        } else {
            debug!(
                kind = E::KIND,
                seq = ticket.seq,
                action = outcome.name(),
                "discarding stale completion"
            );
        }
        self.settle_one();
    }

    fn apply(&mut self, action: &Action<E>) {
        self.state = Arc::new(self.reducer.reduce(&self.state, action));
        self.snapshots.send_replace(Arc::clone(&self.state));
    }

    fn spawn_effect(&mut self, command: Command<E>) {
        let ticket = self.ledger.issue(command.operation());
        let collaborator = Arc::clone(&self.collaborator);
        let inbox = self.inbox.clone();

        tokio::spawn(async move {
            let outcome = effects::run(collaborator.as_ref(), &command).await;
            // The dispatcher may already be gone.
            let _ = inbox.send(Message::Completed {
                ticket,
                command,
                outcome,
            });
        });
    }

    fn settle_one(&self) {
        self.pending.send_modify(|n| *n = n.saturating_sub(1));
    }
}
