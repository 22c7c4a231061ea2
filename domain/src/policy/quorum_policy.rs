//! Quorum policy records

use crate::core::ids::QuorumPolicyId;
use crate::core::numeric::clamp_threshold;
use serde::{Deserialize, Serialize};

/// How the quorum threshold is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuorumMode {
    /// One condition, one threshold
    #[default]
    Single,
    /// A different threshold applies on the second convocation
    Evolving,
    /// Two conditions must both hold
    Double,
}

impl QuorumMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuorumMode::Single => "single",
            QuorumMode::Evolving => "evolving",
            QuorumMode::Double => "double",
        }
    }
}

impl std::fmt::Display for QuorumMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Denominator of a quorum ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuorumBasis {
    /// Head count of active members
    #[default]
    EligibleMembers,
    /// Summed voting weight of active members
    EligibleWeight,
}

impl QuorumBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuorumBasis::EligibleMembers => "eligible_members",
            QuorumBasis::EligibleWeight => "eligible_weight",
        }
    }
}

impl std::fmt::Display for QuorumBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One denominator/threshold pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuorumCondition {
    pub basis: QuorumBasis,
    pub threshold: f64,
}

impl QuorumCondition {
    pub fn new(basis: QuorumBasis, threshold: f64) -> Self {
        Self {
            basis,
            threshold: clamp_threshold(threshold),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Minimum participation required for a vote to be valid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuorumPolicy {
    pub id: QuorumPolicyId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mode: QuorumMode,
    pub primary: QuorumCondition,
    /// Evolving mode: threshold used on the second convocation
    #[serde(default)]
    pub second_convocation_threshold: Option<f64>,
    /// Double mode: the second condition
    #[serde(default)]
    pub secondary: Option<QuorumCondition>,
    /// Count ballots cast by proxy toward the quorum
    #[serde(default = "default_true")]
    pub include_proxy: bool,
    /// Count remote ballots toward the quorum
    #[serde(default = "default_true")]
    pub include_remote: bool,
}

impl QuorumPolicy {
    pub fn single(id: QuorumPolicyId, basis: QuorumBasis, threshold: f64) -> Self {
        Self {
            id,
            name: String::new(),
            mode: QuorumMode::Single,
            primary: QuorumCondition::new(basis, threshold),
            second_convocation_threshold: None,
            secondary: None,
            include_proxy: true,
            include_remote: true,
        }
    }

    pub fn evolving(
        id: QuorumPolicyId,
        basis: QuorumBasis,
        threshold: f64,
        second_convocation_threshold: f64,
    ) -> Self {
        Self {
            mode: QuorumMode::Evolving,
            second_convocation_threshold: Some(clamp_threshold(second_convocation_threshold)),
            ..Self::single(id, basis, threshold)
        }
    }

    pub fn double(id: QuorumPolicyId, primary: QuorumCondition, secondary: QuorumCondition) -> Self {
        Self {
            mode: QuorumMode::Double,
            primary,
            secondary: Some(secondary),
            ..Self::single(id, primary.basis, primary.threshold)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn excluding_proxy(mut self) -> Self {
        self.include_proxy = false;
        self
    }

    pub fn excluding_remote(mut self) -> Self {
        self.include_remote = false;
        self
    }
}
