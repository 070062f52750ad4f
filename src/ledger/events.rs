//! Ledger notifications for external listeners.
//!
//! Each subscriber owns an unbounded `tokio::sync::mpsc` queue. Events are
//! pushed while the ledger's write lock is held, so every subscriber sees them
//! in operation order and none is dropped however far a subscriber falls
//! behind. A subscriber only observes events sent after it subscribed.

use super::types::ProposalId;
use crate::identity::CallerId;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

/// Receiving half handed to a subscriber.
pub type EventReceiver = mpsc::UnboundedReceiver<LedgerEvent>;

/// Observable effect of a successful mutating operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    ProposalCreated {
        id: ProposalId,
        creator: CallerId,
        description: String,
    },
    VoteCast {
        proposal_id: ProposalId,
        voter: CallerId,
        support: bool,
    },
}

/// Subscriber registry owned by the ledger.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventBus {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<LedgerEvent>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> EventReceiver {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        receiver
    }

    /// Publish to current subscribers. Having none is not an error.
    ///
    /// Subscribers whose receiver was dropped are pruned.
    pub fn publish(&self, event: LedgerEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
        tracing::trace!(delivered = subscribers.len(), "ledger event published");
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
