//! Proposal records and the read-only views handed out by the ledger.

use crate::identity::CallerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequential proposal identifier. The first proposal is `ProposalId(1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalId(pub u64);

impl ProposalId {
    pub const FIRST: ProposalId = ProposalId(1);

    /// The ID after this one, or `None` once the `u64` space is used up.
    pub fn checked_next(self) -> Option<ProposalId> {
        self.0.checked_add(1).map(ProposalId)
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stored proposal.
///
/// Only `votes_for` / `votes_against` change after creation, and only by the
/// ledger's vote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Proposal {
    pub id: ProposalId,
    pub description: String,
    pub creator: CallerId,
    /// Unix seconds. Voting is open while `now < expiration`.
    pub expiration: u64,
    pub votes_for: u64,
    pub votes_against: u64,
}

impl Proposal {
    pub fn new(id: ProposalId, description: String, creator: CallerId, expiration: u64) -> Self {
        Self {
            id,
            description,
            creator,
            expiration,
            votes_for: 0,
            votes_against: 0,
        }
    }

    pub fn is_open_at(&self, now: u64) -> bool {
        now < self.expiration
    }

    pub fn details(&self) -> ProposalDetails {
        ProposalDetails {
            id: self.id,
            description: self.description.clone(),
            creator: self.creator.clone(),
            expiration: self.expiration,
        }
    }

    pub fn counts(&self) -> VoteCounts {
        VoteCounts {
            votes_for: self.votes_for,
            votes_against: self.votes_against,
        }
    }
}

/// Immutable snapshot of a proposal's identifying fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalDetails {
    pub id: ProposalId,
    pub description: String,
    pub creator: CallerId,
    pub expiration: u64,
}

/// Current tallies for a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteCounts {
    pub votes_for: u64,
    pub votes_against: u64,
}

impl VoteCounts {
    pub fn total(&self) -> u64 {
        self.votes_for + self.votes_against
    }
}

/// Lifecycle phase, derived from the clock on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalPhase {
    /// `now < expiration`
    Open,
    /// `now >= expiration`
    Closed,
}

impl fmt::Display for ProposalPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProposalPhase::Open => write!(f, "open"),
            ProposalPhase::Closed => write!(f, "closed"),
        }
    }
}

/// Combined view of a proposal at one clock reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalStatus {
    pub details: ProposalDetails,
    pub counts: VoteCounts,
    pub phase: ProposalPhase,
    /// Clock reading the phase was derived from.
    pub observed_at: u64,
}
