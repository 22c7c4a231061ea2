//! Official result of a motion

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the official tallies came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    /// Hand count entered by the secretary
    Manual,
    /// Electronically cast ballots
    Evote,
}

impl ResultSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultSource::Manual => "manual",
            ResultSource::Evote => "evote",
        }
    }
}

impl std::fmt::Display for ResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Final status of a motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Adopted,
    Rejected,
    NoQuorum,
    NoVotes,
    NoPolicy,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Adopted => "adopted",
            Decision::Rejected => "rejected",
            Decision::NoQuorum => "no_quorum",
            Decision::NoVotes => "no_votes",
            Decision::NoPolicy => "no_policy",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The single authoritative, persisted outcome of a motion
///
/// Re-consolidation overwrites it: it is the current statement, not a log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficialResult {
    pub source: ResultSource,
    pub for_weight: f64,
    pub against_weight: f64,
    pub abstain_weight: f64,
    pub total_weight: f64,
    pub decision: Decision,
    pub reason: String,
    pub decided_at: DateTime<Utc>,
}

impl OfficialResult {
    /// Same outcome, ignoring when it was decided
    pub fn same_outcome(&self, other: &OfficialResult) -> bool {
        self.source == other.source
            && self.for_weight == other.for_weight
            && self.against_weight == other.against_weight
            && self.abstain_weight == other.abstain_weight
            && self.total_weight == other.total_weight
            && self.decision == other.decision
            && self.reason == other.reason
    }
}
