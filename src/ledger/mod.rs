//! Proposal ledger.
//!
//! Owns every proposal and vote record and validates every mutation:
//! - Proposal IDs are sequential from 1, never reused, never deleted
//! - One vote per (proposal, caller); a vote record is never overwritten
//! - Voting is open while `now < expiration`, re-derived from the clock on
//!   every call (nothing fires at expiration)
//! - `votes_for + votes_against` always equals the number of vote records
//!
//! All state sits behind one lock. Validation and mutation of each operation
//! run under a single write guard, so concurrent callers observe strictly
//! serial execution and a failed operation changes nothing.

pub mod error;
pub mod events;
pub mod types;

#[cfg(test)]
mod proptests;

pub use error::{LedgerError, LedgerResult};
pub use events::{EventReceiver, LedgerEvent};
pub use types::{ProposalDetails, ProposalId, ProposalPhase, ProposalStatus, VoteCounts};

use crate::clock::Clock;
use crate::identity::CallerId;
use events::EventBus;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};
use types::Proposal;

#[derive(Debug)]
struct LedgerState {
    /// Ordered by ID, which is also creation order.
    proposals: BTreeMap<ProposalId, Proposal>,
    next_id: ProposalId,
    /// (proposal, voter) -> support. Presence is the "has voted" flag.
    votes: HashMap<(ProposalId, CallerId), bool>,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            proposals: BTreeMap::new(),
            next_id: ProposalId::FIRST,
            votes: HashMap::new(),
        }
    }
}

impl LedgerState {
    fn proposal(&self, id: ProposalId) -> LedgerResult<&Proposal> {
        self.proposals
            .get(&id)
            .ok_or(LedgerError::ProposalNotFound(id))
    }
}

/// Handle to a proposal ledger.
///
/// Clones share the same state, clock and event channel.
pub struct ProposalLedger<C: Clock> {
    state: Arc<RwLock<LedgerState>>,
    clock: Arc<C>,
    events: EventBus,
}

impl<C: Clock> Clone for ProposalLedger<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
            events: self.events.clone(),
        }
    }
}

impl<C: Clock> ProposalLedger<C> {
    /// Create an empty ledger reading time from `clock`.
    pub fn new(clock: C) -> Self {
        Self {
            state: Arc::new(RwLock::new(LedgerState::default())),
            clock: Arc::new(clock),
            events: EventBus::new(),
        }
    }

    /// Subscribe to ledger events emitted after this call.
    ///
    /// Every event is queued for the subscriber until received; nothing is
    /// dropped for a subscriber that falls behind.
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    // A panic while holding the lock cannot leave partial state behind, since
    // every operation finishes validating before it writes.
    fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new proposal created by `caller`.
    ///
    /// `expiration` (Unix seconds) must be strictly later than the clock
    /// reading taken at execution time. Returns the newly assigned ID and
    /// emits [`LedgerEvent::ProposalCreated`].
    pub fn create_proposal(
        &self,
        caller: &CallerId,
        description: impl Into<String>,
        expiration: u64,
    ) -> LedgerResult<ProposalId> {
        let description = description.into();
        let mut state = self.write();

        let now = self.clock.now();
        if expiration <= now {
            warn!(
                creator = %caller,
                expiration,
                now,
                "proposal rejected: expiration not in the future"
            );
            return Err(LedgerError::InvalidExpiration { expiration, now });
        }

        let id = state.next_id;
        let Some(next_id) = id.checked_next() else {
            warn!(creator = %caller, "proposal rejected: ID space exhausted");
            return Err(LedgerError::IdsExhausted);
        };
        state.proposals.insert(
            id,
            Proposal::new(id, description.clone(), caller.clone(), expiration),
        );
        state.next_id = next_id;

        info!(proposal = %id, creator = %caller, expiration, "proposal created");
        self.events.publish(LedgerEvent::ProposalCreated {
            id,
            creator: caller.clone(),
            description,
        });

        Ok(id)
    }

    /// Cast `caller`'s single vote on a proposal.
    ///
    /// Checks, in order: the proposal exists, voting is still open, and the
    /// caller has not voted on it yet.
    pub fn vote(
        &self,
        caller: &CallerId,
        proposal_id: ProposalId,
        support: bool,
    ) -> LedgerResult<()> {
        let mut guard = self.write();
        let state = &mut *guard;

        let proposal = state
            .proposals
            .get_mut(&proposal_id)
            .ok_or(LedgerError::ProposalNotFound(proposal_id))?;

        let now = self.clock.now();
        if !proposal.is_open_at(now) {
            warn!(
                proposal = %proposal_id,
                voter = %caller,
                now,
                expiration = proposal.expiration,
                "vote rejected: voting closed"
            );
            return Err(LedgerError::VotingClosed {
                id: proposal_id,
                expiration: proposal.expiration,
            });
        }

        let key = (proposal_id, caller.clone());
        if state.votes.contains_key(&key) {
            warn!(proposal = %proposal_id, voter = %caller, "vote rejected: already voted");
            return Err(LedgerError::DuplicateVote {
                id: proposal_id,
                voter: caller.clone(),
            });
        }

        state.votes.insert(key, support);
        if support {
            proposal.votes_for += 1;
        } else {
            proposal.votes_against += 1;
        }

        debug!(proposal = %proposal_id, voter = %caller, support, "vote recorded");
        self.events.publish(LedgerEvent::VoteCast {
            proposal_id,
            voter: caller.clone(),
            support,
        });

        Ok(())
    }

    /// Whether voting on the proposal is open right now.
    pub fn is_proposal_active(&self, proposal_id: ProposalId) -> LedgerResult<bool> {
        let state = self.read();
        let proposal = state.proposal(proposal_id)?;
        Ok(proposal.is_open_at(self.clock.now()))
    }

    pub fn get_proposal_details(
        &self,
        proposal_id: ProposalId,
    ) -> LedgerResult<ProposalDetails> {
        Ok(self.read().proposal(proposal_id)?.details())
    }

    pub fn get_vote_counts(&self, proposal_id: ProposalId) -> LedgerResult<VoteCounts> {
        Ok(self.read().proposal(proposal_id)?.counts())
    }

    /// All proposal IDs in creation order.
    pub fn get_all_proposal_ids(&self) -> Vec<ProposalId> {
        self.read().proposals.keys().copied().collect()
    }

    pub fn has_user_voted(&self, proposal_id: ProposalId, voter: &CallerId) -> LedgerResult<bool> {
        let state = self.read();
        state.proposal(proposal_id)?;
        Ok(state.votes.contains_key(&(proposal_id, voter.clone())))
    }

    /// The support flag `voter` cast on the proposal, if any.
    pub fn get_vote(
        &self,
        proposal_id: ProposalId,
        voter: &CallerId,
    ) -> LedgerResult<Option<bool>> {
        let state = self.read();
        state.proposal(proposal_id)?;
        Ok(state.votes.get(&(proposal_id, voter.clone())).copied())
    }

    /// Details, tallies and phase taken from one consistent read.
    pub fn proposal_status(&self, proposal_id: ProposalId) -> LedgerResult<ProposalStatus> {
        let state = self.read();
        let proposal = state.proposal(proposal_id)?;
        let now = self.clock.now();
        let phase = if proposal.is_open_at(now) {
            ProposalPhase::Open
        } else {
            ProposalPhase::Closed
        };

        Ok(ProposalStatus {
            details: proposal.details(),
            counts: proposal.counts(),
            phase,
            observed_at: now,
        })
    }

    pub fn proposal_count(&self) -> usize {
        self.read().proposals.len()
    }
}
