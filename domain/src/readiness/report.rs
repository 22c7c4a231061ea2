//! Meeting readiness for validation

use crate::core::ids::MeetingId;
use serde::{Deserialize, Serialize};

/// A blocker preventing validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ReadinessViolation {
    /// Motions still open
    OpenMotions { count: u64 },
    /// Closed motions with neither a consistent manual tally nor any ballot
    BadClosedResults { count: u64 },
    /// Closed motions without a persisted official result
    ConsolidationMissing { count: u64 },
    /// No chair recorded
    MissingPresident,
}

impl ReadinessViolation {
    /// Stable code, suitable for detecting transitions between evaluations
    pub fn code(&self) -> &'static str {
        match self {
            ReadinessViolation::OpenMotions { .. } => "open_motions",
            ReadinessViolation::BadClosedResults { .. } => "bad_closed_results",
            ReadinessViolation::ConsolidationMissing { .. } => "consolidation_missing",
            ReadinessViolation::MissingPresident => "missing_president",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ReadinessViolation::OpenMotions { count } => {
                format!("{} motion(s) are still open", count)
            }
            ReadinessViolation::BadClosedResults { count } => format!(
                "{} closed motion(s) have neither a consistent manual tally nor any ballot",
                count
            ),
            ReadinessViolation::ConsolidationMissing { count } => {
                format!("{} closed motion(s) have no official result yet", count)
            }
            ReadinessViolation::MissingPresident => {
                "No president has been recorded for the meeting".to_string()
            }
        }
    }
}

/// Raw counts readiness is computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadinessFacts {
    pub open_motions: u64,
    pub closed_without_exploitable_result: u64,
    pub closed_without_official: u64,
    pub has_president: bool,
}

/// Whether a meeting may be validated, and why not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub meeting: MeetingId,
    pub can_validate: bool,
    /// In a stable order
    pub violations: Vec<ReadinessViolation>,
}

impl ReadinessReport {
    pub fn from_facts(meeting: MeetingId, facts: ReadinessFacts) -> Self {
        let mut violations = Vec::new();
        if facts.open_motions > 0 {
            violations.push(ReadinessViolation::OpenMotions {
                count: facts.open_motions,
            });
        }
        if facts.closed_without_exploitable_result > 0 {
            violations.push(ReadinessViolation::BadClosedResults {
                count: facts.closed_without_exploitable_result,
            });
        }
        if facts.closed_without_official > 0 {
            violations.push(ReadinessViolation::ConsolidationMissing {
                count: facts.closed_without_official,
            });
        }
        if !facts.has_president {
            violations.push(ReadinessViolation::MissingPresident);
        }
        Self {
            meeting,
            can_validate: violations.is_empty(),
            violations,
        }
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.code()).collect()
    }

    /// Blockers that appeared or were resolved since `previous`
    pub fn diff(&self, previous: Option<&ReadinessReport>) -> ReadinessDiff {
        let before: Vec<&'static str> = previous.map(|p| p.codes()).unwrap_or_default();
        let now = self.codes();
        ReadinessDiff {
            appeared: now.iter().filter(|c| !before.contains(c)).copied().collect(),
            resolved: before.iter().filter(|c| !now.contains(c)).copied().collect(),
        }
    }
}

/// Change in blockers between two evaluations
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ReadinessDiff {
    pub appeared: Vec<&'static str>,
    pub resolved: Vec<&'static str>,
}

impl ReadinessDiff {
    pub fn is_empty(&self) -> bool {
        self.appeared.is_empty() && self.resolved.is_empty()
    }
}
