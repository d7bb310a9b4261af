//! Request ledger: decides whether a completed call may still be applied.
//!
//! Every planned call gets a [`Ticket`] with a monotonically increasing
//! sequence number. When the call completes, the dispatcher asks the ledger
//! to [`admit`](RequestLedger::admit) it before reducing its outcome.
//!
//! Under [`ResponseOrdering::LatestWins`]:
//! - a read outcome is applied only if no newer read of the same class was
//!   issued after it, so a slow page 1 cannot overwrite a fast page 2
//! - nothing issued before the last `ResetState` is applied
//!
//! Mutations are never superseded by other mutations; each is applied when
//! it arrives.

use serde::{Deserialize, Serialize};

use crate::action::Operation;

/// How out-of-order completions are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseOrdering {
    /// Apply every completion in arrival order, including stale reads.
    ArrivalOrder,
    /// Discard superseded reads and anything issued before a reset.
    #[default]
    LatestWins,
}

/// Identifies one planned collaborator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    /// Operation class of the call.
    pub operation: Operation,
    /// Issue order, starting at 1.
    pub seq: u64,
}

/// Tracks issued calls.
#[derive(Debug, Clone)]
pub struct RequestLedger {
    policy: ResponseOrdering,
    /// Last issued sequence number.
    last: u64,
    /// Latest sequence number per operation class.
    latest: [u64; 6],
    /// Tickets at or below this were issued before the last reset.
    barrier: u64,
}

impl RequestLedger {
    /// Empty ledger with the given policy.
    pub fn new(policy: ResponseOrdering) -> Self {
        Self {
            policy,
            last: 0,
            latest: [0; 6],
            barrier: 0,
        }
    }

    /// The ordering policy.
    pub fn policy(&self) -> ResponseOrdering {
        self.policy
    }

    /// Record a new call.
    pub fn issue(&mut self, operation: Operation) -> Ticket {
        self.last += 1;
        self.latest[operation.index()] = self.last;
        Ticket {
            operation,
            seq: self.last,
        }
    }

    /// Mark every call issued so far as belonging to a discarded state.
    pub fn reset(&mut self) {
        self.barrier = self.last;
    }

    /// Whether the outcome of `ticket` may be applied.
    pub fn admit(&self, ticket: &Ticket) -> bool {
        match self.policy {
            ResponseOrdering::ArrivalOrder => true,
            ResponseOrdering::LatestWins => {
                if ticket.seq <= self.barrier {
                    return false;
                }
                if ticket.operation.is_read() {
                    return ticket.seq == self.latest[ticket.operation.index()];
                }
                true
            }
        }
    }
}

impl Default for RequestLedger {
    fn default() -> Self {
        Self::new(ResponseOrdering::default())
    }
}
