//! Property-based tests for the proposal ledger
//!
//! Tests for:
//! - Sequential IDs across any number of creations
//! - Expiration validation against the clock
//! - Tally consistency under arbitrary vote sequences
//! - Voting cutoff at the expiration boundary

use super::*;
use crate::clock::ManualClock;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

const START: u64 = 1_700_000_000;

/// One step of a randomly generated ledger workload.
#[derive(Debug, Clone)]
enum Op {
    Create { ttl: u64 },
    Vote { voter: u8, proposal: u64, support: bool },
    Advance { secs: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u64..500).prop_map(|ttl| Op::Create { ttl }),
        (0u8..6, 0u64..8, any::<bool>()).prop_map(|(voter, proposal, support)| Op::Vote {
            voter,
            proposal,
            support
        }),
        (0u64..120).prop_map(|secs| Op::Advance { secs }),
    ]
}

proptest! {
    /// Property: N successful creations return exactly 1..=N in call order
    #[test]
    fn ids_are_dense_and_sequential(ttls in prop::collection::vec(1u64..10_000, 0..50)) {
        let ledger = ProposalLedger::new(ManualClock::new(START));
        let creator = CallerId::new("creator");

        let ids: Vec<u64> = ttls
            .iter()
            .map(|ttl| ledger.create_proposal(&creator, "p", START + ttl).unwrap().0)
            .collect();

        let expected: Vec<u64> = (1..=ttls.len() as u64).collect();
        prop_assert_eq!(&ids, &expected);
        prop_assert_eq!(
            ledger.get_all_proposal_ids().into_iter().map(|id| id.0).collect::<Vec<_>>(),
            expected
        );
    }

    /// Property: creation succeeds iff expiration > now
    #[test]
    fn creation_requires_future_expiration(now in 1u64..u64::MAX / 2, offset in -1000i64..1000) {
        let ledger = ProposalLedger::new(ManualClock::new(now));
        let expiration = now.saturating_add_signed(offset);

        let result = ledger.create_proposal(&CallerId::new("c"), "p", expiration);

        if expiration > now {
            prop_assert_eq!(result, Ok(ProposalId(1)));
        } else {
            prop_assert_eq!(result, Err(LedgerError::InvalidExpiration { expiration, now }));
            prop_assert_eq!(ledger.proposal_count(), 0);
        }
    }

    /// Property: vote succeeds iff now < expiration, boundary included as closed
    #[test]
    fn vote_cutoff_is_strict(ttl in 1u64..1000, elapsed in 0u64..2000) {
        let clock = ManualClock::new(START);
        let ledger = ProposalLedger::new(clock.clone());
        let id = ledger.create_proposal(&CallerId::new("c"), "p", START + ttl).unwrap();

        clock.advance(std::time::Duration::from_secs(elapsed));
        let result = ledger.vote(&CallerId::new("v"), id, true);

        if elapsed < ttl {
            prop_assert!(result.is_ok());
            prop_assert!(ledger.is_proposal_active(id).unwrap());
        } else {
            let is_closed = matches!(result, Err(LedgerError::VotingClosed { .. }));
            prop_assert!(is_closed);
            prop_assert!(!ledger.is_proposal_active(id).unwrap());
            prop_assert_eq!(ledger.get_vote_counts(id).unwrap().total(), 0);
        }
    }

    /// Property: for any workload, tallies match a model of distinct voters
    /// and every recorded vote keeps its first support value
    #[test]
    fn tallies_match_distinct_voters(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let clock = ManualClock::new(START);
        let ledger = ProposalLedger::new(clock.clone());
        let creator = CallerId::new("creator");

        let mut model: HashMap<u64, HashMap<u8, bool>> = HashMap::new();
        let mut expirations: HashMap<u64, u64> = HashMap::new();

        for op in ops {
            match op {
                Op::Create { ttl } => {
                    let id = ledger.create_proposal(&creator, "p", clock.now() + ttl).unwrap();
                    expirations.insert(id.0, clock.now() + ttl);
                    model.insert(id.0, HashMap::new());
                }
                Op::Vote { voter, proposal, support } => {
                    let caller = CallerId::new(format!("voter-{}", voter));
                    let result = ledger.vote(&caller, ProposalId(proposal), support);

                    match expirations.get(&proposal) {
                        None => {
                            prop_assert_eq!(
                                result,
                                Err(LedgerError::ProposalNotFound(ProposalId(proposal)))
                            );
                        }
                        Some(&expiration) if clock.now() >= expiration => {
                            let is_closed = matches!(result, Err(LedgerError::VotingClosed { .. }));
                            prop_assert!(is_closed);
                        }
                        Some(_) => {
                            let votes = model.get_mut(&proposal).unwrap();
                            if votes.contains_key(&voter) {
                                let is_duplicate =
                                    matches!(result, Err(LedgerError::DuplicateVote { .. }));
                                prop_assert!(is_duplicate);
                            } else {
                                prop_assert!(result.is_ok());
                                votes.insert(voter, support);
                            }
                        }
                    }
                }
                Op::Advance { secs } => {
                    clock.advance(std::time::Duration::from_secs(secs));
                }
            }
        }

        for (id, votes) in &model {
            let counts = ledger.get_vote_counts(ProposalId(*id)).unwrap();
            let distinct: HashSet<&u8> = votes.keys().collect();

            prop_assert_eq!(counts.total(), distinct.len() as u64);
            prop_assert_eq!(counts.votes_for, votes.values().filter(|s| **s).count() as u64);

            for (voter, support) in votes {
                let caller = CallerId::new(format!("voter-{}", voter));
                prop_assert_eq!(ledger.get_vote(ProposalId(*id), &caller).unwrap(), Some(*support));
            }
        }
    }
}
