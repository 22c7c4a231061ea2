//! Tri-state verdict shared by quorum and majority resolution

use serde::{Deserialize, Serialize};

/// Outcome of evaluating one policy
///
/// `Unapplied` means no policy was configured. It is deliberately distinct
/// from both `Met` and `NotMet`: an unapplied quorum never blocks a motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    #[default]
    Unapplied,
    Met,
    NotMet,
}

impl Verdict {
    pub fn from_met(met: bool) -> Self {
        if met { Verdict::Met } else { Verdict::NotMet }
    }

    pub fn is_applied(&self) -> bool {
        !matches!(self, Verdict::Unapplied)
    }

    /// `None` when unapplied
    pub fn met(&self) -> Option<bool> {
        match self {
            Verdict::Unapplied => None,
            Verdict::Met => Some(true),
            Verdict::NotMet => Some(false),
        }
    }

    /// Only an explicit failure blocks.
    pub fn blocks(&self) -> bool {
        matches!(self, Verdict::NotMet)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Unapplied => "unapplied",
            Verdict::Met => "met",
            Verdict::NotMet => "not_met",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
