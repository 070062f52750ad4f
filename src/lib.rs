//! Votebook - Proposal and Vote Ledger
//!
//! Lets any caller register a time-bounded proposal and lets other
//! participants cast exactly one binary vote per proposal.
//!
//! Key principles:
//! - One owned ledger object, no hidden statics
//! - Open/closed phase derived from the clock on every access, never stored
//! - Caller identity is opaque and supplied by the execution environment
//! - Every failed operation leaves the ledger unchanged

pub mod clock;
pub mod identity;
pub mod ledger;
pub mod scenario;

pub use clock::{Clock, ManualClock, SystemClock};
pub use identity::CallerId;
pub use ledger::{LedgerError, LedgerEvent, LedgerResult, ProposalId, ProposalLedger};
