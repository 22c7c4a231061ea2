//! Vote (majority) policy records

use crate::core::ids::VotePolicyId;
use crate::core::numeric::clamp_threshold;
use serde::{Deserialize, Serialize};

/// Denominator of the majority ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MajorityBase {
    /// Weight of expressed ballots (for + against + abstain)
    #[default]
    Expressed,
    /// Weight of all active members
    Eligible,
    /// Weight of members attending (present, remote or represented)
    Present,
}

impl MajorityBase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MajorityBase::Expressed => "expressed",
            MajorityBase::Eligible => "eligible",
            MajorityBase::Present => "present",
        }
    }
}

impl std::fmt::Display for MajorityBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_true() -> bool {
    true
}

/// Winning threshold and its denominator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotePolicy {
    pub id: VotePolicyId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base: MajorityBase,
    pub threshold: f64,
    /// Abstentions stay in the expressed denominator and so weigh against.
    ///
    /// This changes the arithmetic, not only the report: with `false` and
    /// the `expressed` base the ratio is `for / (for + against)`. The
    /// `eligible` and `present` bases ignore it.
    #[serde(default = "default_true")]
    pub abstention_as_against: bool,
}

impl VotePolicy {
    pub fn new(id: VotePolicyId, base: MajorityBase, threshold: f64) -> Self {
        Self {
            id,
            name: String::new(),
            base,
            threshold: clamp_threshold(threshold),
            abstention_as_against: true,
        }
    }

    /// Simple majority of expressed ballots
    pub fn simple(id: VotePolicyId) -> Self {
        Self::new(id, MajorityBase::Expressed, 0.5)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_abstention_as_against(mut self, value: bool) -> Self {
        self.abstention_as_against = value;
        self
    }
}
