//! Scripted ledger scenarios.
//!
//! A scenario is a TOML document listing steps that are replayed against a
//! fresh in-memory ledger driven by a [`ManualClock`]. It stands in for the
//! transport layer: each step names the acting identity and the operation.
//!
//! ```toml
//! start = 1700000000
//!
//! [[step]]
//! action = "propose"
//! as = "owner"
//! description = "Test Proposal"
//! expires_in = "1h"
//!
//! [[step]]
//! action = "vote"
//! as = "alice"
//! proposal = 1
//! support = true
//!
//! [[step]]
//! action = "advance"
//! by = "1h 1s"
//! ```
//!
//! Ledger rejections are recorded per step and do not stop the run. A
//! malformed step (bad duration, ambiguous expiration) aborts it.

pub mod duration_parse;

pub use duration_parse::parse_duration_to_secs;

use crate::clock::{Clock, ManualClock};
use crate::identity::CallerId;
use crate::ledger::{LedgerError, LedgerEvent, ProposalId, ProposalLedger, ProposalStatus};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Scenario errors
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid step {index}: {reason}")]
    InvalidStep { index: usize, reason: String },
}

/// A scripted sequence of ledger operations.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Scenario {
    /// Initial clock reading (Unix seconds). Falls back to the caller's default.
    #[serde(default)]
    pub start: Option<u64>,

    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// One scenario step.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Create a proposal. Exactly one of the expiration fields must be set.
    Propose {
        #[serde(rename = "as")]
        caller: String,
        #[serde(default)]
        description: String,
        /// Relative to the clock at this step, e.g. "1h".
        expires_in: Option<String>,
        /// In the past relative to the clock at this step, e.g. "1h".
        expires_ago: Option<String>,
        /// Absolute Unix seconds.
        expires_at: Option<u64>,
    },
    Vote {
        #[serde(rename = "as")]
        caller: String,
        proposal: u64,
        support: bool,
    },
    /// Move the simulated clock forward.
    Advance { by: String },
    Status { proposal: u64 },
    List,
    HasVoted { proposal: u64, voter: String },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Propose { .. } => "propose",
            Step::Vote { .. } => "vote",
            Step::Advance { .. } => "advance",
            Step::Status { .. } => "status",
            Step::List => "list",
            Step::HasVoted { .. } => "has_voted",
        }
    }
}

impl Scenario {
    pub fn from_toml_str(contents: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load a scenario from a TOML file
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let contents = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}

/// Structured result data for a successful step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepData {
    Created { id: ProposalId },
    Status(ProposalStatus),
    Ids { ids: Vec<ProposalId> },
    Voted { voted: bool },
    Time { now: u64 },
    Empty {},
}

/// Outcome of one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum StepOutcome {
    Ok { summary: String, data: StepData },
    Rejected { kind: String, message: String },
}

impl StepOutcome {
    fn rejected(err: &LedgerError) -> Self {
        StepOutcome::Rejected {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, StepOutcome::Ok { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    /// 1-based position in the scenario.
    pub index: usize,
    pub action: &'static str,
    /// Clock reading when the step ran.
    pub at: u64,
    pub outcome: StepOutcome,
}

/// Everything observed while replaying a scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub start: u64,
    pub final_time: u64,
    pub steps: Vec<StepReport>,
    /// Ledger notifications in emission order.
    pub events: Vec<LedgerEvent>,
}

impl ScenarioReport {
    pub fn rejected_count(&self) -> usize {
        self.steps.iter().filter(|s| !s.outcome.is_ok()).count()
    }
}

/// Replay `scenario` against a fresh ledger.
///
/// The clock starts at `scenario.start`, or `default_start` when unset.
pub fn run_scenario(
    scenario: &Scenario,
    default_start: u64,
) -> Result<ScenarioReport, ScenarioError> {
    let start = scenario.start.unwrap_or(default_start);
    let clock = ManualClock::new(start);
    let ledger = ProposalLedger::new(clock.clone());
    let mut events_rx = ledger.subscribe();

    info!(start, steps = scenario.steps.len(), "running scenario");

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (offset, step) in scenario.steps.iter().enumerate() {
        let index = offset + 1;
        let at = clock.now();
        let outcome = apply_step(&ledger, &clock, index, step)?;
        debug!(index, action = step.name(), ?outcome, "scenario step");

        steps.push(StepReport {
            index,
            action: step.name(),
            at,
            outcome,
        });
    }

    let mut events = Vec::new();
    while let Ok(event) = events_rx.try_recv() {
        events.push(event);
    }

    Ok(ScenarioReport {
        start,
        final_time: clock.now(),
        steps,
        events,
    })
}

fn apply_step(
    ledger: &ProposalLedger<ManualClock>,
    clock: &ManualClock,
    index: usize,
    step: &Step,
) -> Result<StepOutcome, ScenarioError> {
    let invalid = |reason: String| ScenarioError::InvalidStep { index, reason };

    let outcome = match step {
        Step::Propose {
            caller,
            description,
            expires_in,
            expires_ago,
            expires_at,
        } => {
            let now = clock.now();
            let expiration = match (expires_in, expires_ago, expires_at) {
                (Some(d), None, None) => {
                    now.saturating_add(parse_duration_to_secs(d).map_err(invalid)?)
                }
                (None, Some(d), None) => {
                    now.saturating_sub(parse_duration_to_secs(d).map_err(invalid)?)
                }
                (None, None, Some(at)) => *at,
                _ => {
                    return Err(invalid(
                        "propose needs exactly one of expires_in, expires_ago, expires_at"
                            .to_string(),
                    ))
                }
            };

            let creator = CallerId::new(caller.as_str());
            match ledger.create_proposal(&creator, description.as_str(), expiration) {
                Ok(id) => StepOutcome::Ok {
                    summary: format!(
                        "{} created proposal {} (expires at {})",
                        caller, id, expiration
                    ),
                    data: StepData::Created { id },
                },
                Err(e) => StepOutcome::rejected(&e),
            }
        }
        Step::Vote {
            caller,
            proposal,
            support,
        } => {
            let id = ProposalId(*proposal);
            match ledger.vote(&CallerId::new(caller.as_str()), id, *support) {
                Ok(()) => StepOutcome::Ok {
                    summary: format!(
                        "{} voted {} proposal {}",
                        caller,
                        if *support { "for" } else { "against" },
                        id
                    ),
                    data: StepData::Empty {},
                },
                Err(e) => StepOutcome::rejected(&e),
            }
        }
        Step::Advance { by } => {
            let secs = parse_duration_to_secs(by).map_err(invalid)?;
            let now = clock.advance(Duration::from_secs(secs));
            StepOutcome::Ok {
                summary: format!("clock advanced by {}s to {}", secs, now),
                data: StepData::Time { now },
            }
        }
        Step::Status { proposal } => match ledger.proposal_status(ProposalId(*proposal)) {
            Ok(status) => StepOutcome::Ok {
                summary: format!(
                    "proposal {} is {}: {} for / {} against, expires at {}",
                    status.details.id,
                    status.phase,
                    status.counts.votes_for,
                    status.counts.votes_against,
                    status.details.expiration
                ),
                data: StepData::Status(status),
            },
            Err(e) => StepOutcome::rejected(&e),
        },
        Step::List => {
            let ids = ledger.get_all_proposal_ids();
            let listed: Vec<String> = ids.iter().map(|id| id.0.to_string()).collect();
            StepOutcome::Ok {
                summary: format!("proposals: [{}]", listed.join(", ")),
                data: StepData::Ids { ids },
            }
        }
        Step::HasVoted { proposal, voter } => {
            let id = ProposalId(*proposal);
            match ledger.has_user_voted(id, &CallerId::new(voter.as_str())) {
                Ok(voted) => StepOutcome::Ok {
                    summary: format!("{} has voted on proposal {}: {}", voter, id, voted),
                    data: StepData::Voted { voted },
                },
                Err(e) => StepOutcome::rejected(&e),
            }
        }
    };

    Ok(outcome)
}
