//! Ledger error taxonomy.
//!
//! Every variant is a caller-input, timing or capacity violation. None is
//! fatal, and the ledger is left unchanged whenever one is returned.

use super::types::ProposalId;
use crate::identity::CallerId;
use thiserror::Error;

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Expiration must be in the future (expiration {expiration}, now {now})")]
    InvalidExpiration { expiration: u64, now: u64 },

    #[error("Proposal does not exist: {0}")]
    ProposalNotFound(ProposalId),

    #[error("Voting period has expired for proposal {id} (expired at {expiration})")]
    VotingClosed { id: ProposalId, expiration: u64 },

    #[error("User has already voted: {voter} on proposal {id}")]
    DuplicateVote { id: ProposalId, voter: CallerId },

    #[error("Proposal ID space exhausted")]
    IdsExhausted,
}

impl LedgerError {
    /// Stable machine-readable kind, for transports that map errors to codes.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::InvalidExpiration { .. } => "InvalidExpiration",
            LedgerError::ProposalNotFound(_) => "ProposalNotFound",
            LedgerError::VotingClosed { .. } => "VotingClosed",
            LedgerError::DuplicateVote { .. } => "DuplicateVote",
            LedgerError::IdsExhausted => "IdsExhausted",
        }
    }
}
