//! Meeting entity and its linear status machine

use crate::core::error::DomainError;
use crate::core::ids::{MeetingId, QuorumPolicyId, TenantId, VotePolicyId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a meeting
///
/// Transitions are strictly linear: each status may only move to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    Draft,
    Scheduled,
    Live,
    Closed,
    Validated,
    Archived,
}

impl MeetingStatus {
    pub const ALL: [MeetingStatus; 6] = [
        MeetingStatus::Draft,
        MeetingStatus::Scheduled,
        MeetingStatus::Live,
        MeetingStatus::Closed,
        MeetingStatus::Validated,
        MeetingStatus::Archived,
    ];

    /// The only status this one may move to
    pub fn next(&self) -> Option<MeetingStatus> {
        match self {
            MeetingStatus::Draft => Some(MeetingStatus::Scheduled),
            MeetingStatus::Scheduled => Some(MeetingStatus::Live),
            MeetingStatus::Live => Some(MeetingStatus::Closed),
            MeetingStatus::Closed => Some(MeetingStatus::Validated),
            MeetingStatus::Validated => Some(MeetingStatus::Archived),
            MeetingStatus::Archived => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Draft => "draft",
            MeetingStatus::Scheduled => "scheduled",
            MeetingStatus::Live => "live",
            MeetingStatus::Closed => "closed",
            MeetingStatus::Validated => "validated",
            MeetingStatus::Archived => "archived",
        }
    }
}

impl std::fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MeetingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        MeetingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown meeting status: {}. Valid: draft, scheduled, live, closed, validated, archived",
                    s
                )
            })
    }
}

/// Refused meeting status change
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot move meeting from {from} to {to}: statuses advance one step at a time")]
    NotLinear {
        from: MeetingStatus,
        to: MeetingStatus,
    },

    #[error("Meeting is {0}; no further status exists")]
    Terminal(MeetingStatus),
}

/// Which calling of the meeting this is
///
/// A second convocation may lower the quorum bar under an evolving policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum Convocation {
    #[default]
    First,
    Second,
}

impl Convocation {
    pub fn number(&self) -> u8 {
        match self {
            Convocation::First => 1,
            Convocation::Second => 2,
        }
    }
}

impl TryFrom<u8> for Convocation {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Convocation::First),
            2 => Ok(Convocation::Second),
            other => Err(DomainError::InvalidConvocation(other)),
        }
    }
}

impl From<Convocation> for u8 {
    fn from(value: Convocation) -> Self {
        value.number()
    }
}

/// A convened assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub tenant: TenantId,
    pub title: String,
    pub status: MeetingStatus,
    #[serde(default)]
    pub convocation: Convocation,
    /// Default quorum policy for motions that do not set their own
    #[serde(default)]
    pub quorum_policy: Option<QuorumPolicyId>,
    /// Default vote policy for motions that do not set their own
    #[serde(default)]
    pub vote_policy: Option<VotePolicyId>,
    /// Chair of the meeting, required before validation
    #[serde(default)]
    pub president: Option<String>,
    /// Once set, no ballot or correction is accepted
    #[serde(default)]
    pub validated_at: Option<DateTime<Utc>>,
}

impl Meeting {
    pub fn new(id: MeetingId, tenant: TenantId, title: impl Into<String>) -> Self {
        Self {
            id,
            tenant,
            title: title.into(),
            status: MeetingStatus::Draft,
            convocation: Convocation::First,
            quorum_policy: None,
            vote_policy: None,
            president: None,
            validated_at: None,
        }
    }

    pub fn with_status(mut self, status: MeetingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_convocation(mut self, convocation: Convocation) -> Self {
        self.convocation = convocation;
        self
    }

    pub fn with_quorum_policy(mut self, policy: QuorumPolicyId) -> Self {
        self.quorum_policy = Some(policy);
        self
    }

    pub fn with_vote_policy(mut self, policy: VotePolicyId) -> Self {
        self.vote_policy = Some(policy);
        self
    }

    pub fn with_president(mut self, name: impl Into<String>) -> Self {
        self.president = Some(name.into());
        self
    }

    pub fn is_live(&self) -> bool {
        self.status == MeetingStatus::Live
    }

    /// Validated meetings are frozen, whatever later status they reach.
    pub fn is_validated(&self) -> bool {
        self.validated_at.is_some() || self.status >= MeetingStatus::Validated
    }

    pub fn has_president(&self) -> bool {
        self.president
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    }

    /// Move to `target`, which must be the immediate next status.
    pub fn advance_to(
        &mut self,
        target: MeetingStatus,
        now: DateTime<Utc>,
    ) -> Result<MeetingStatus, TransitionError> {
        let from = self.status;
        match from.next() {
            None => Err(TransitionError::Terminal(from)),
            Some(next) if next != target => Err(TransitionError::NotLinear { from, to: target }),
            Some(next) => {
                self.status = next;
                if next == MeetingStatus::Validated {
                    self.validated_at = Some(now);
                }
                Ok(from)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meeting() -> Meeting {
        Meeting::new(MeetingId::new(1), TenantId::new(1), "AGM")
    }

    #[test]
    fn test_linear_transitions() {
        let mut m = meeting();
        let now = Utc::now();
        assert!(m.advance_to(MeetingStatus::Scheduled, now).is_ok());
        assert!(m.advance_to(MeetingStatus::Live, now).is_ok());
        assert!(m.is_live());

        let err = m.advance_to(MeetingStatus::Validated, now).unwrap_err();
        assert_eq!(
            err,
            TransitionError::NotLinear {
                from: MeetingStatus::Live,
                to: MeetingStatus::Validated
            }
        );
        assert_eq!(m.status, MeetingStatus::Live);
    }

    #[test]
    fn test_validation_sets_timestamp() {
        let mut m = meeting().with_status(MeetingStatus::Closed);
        assert!(!m.is_validated());
        let now = Utc::now();
        m.advance_to(MeetingStatus::Validated, now).unwrap();
        assert_eq!(m.validated_at, Some(now));
        assert!(m.is_validated());
    }

    #[test]
    fn test_archived_is_terminal() {
        let mut m = meeting().with_status(MeetingStatus::Archived);
        assert_eq!(
            m.advance_to(MeetingStatus::Archived, Utc::now()),
            Err(TransitionError::Terminal(MeetingStatus::Archived))
        );
    }

    #[test]
    fn test_no_backwards_move() {
        let mut m = meeting().with_status(MeetingStatus::Closed);
        assert!(m.advance_to(MeetingStatus::Live, Utc::now()).is_err());
    }

    #[test]
    fn test_convocation_serde() {
        let json = serde_json::to_string(&Convocation::Second).unwrap();
        assert_eq!(json, "2");
        assert!(serde_json::from_str::<Convocation>("3").is_err());
    }

    #[test]
    fn test_has_president_ignores_blank() {
        assert!(!meeting().with_president("   ").has_president());
        assert!(meeting().with_president("A. Chair").has_president());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("Live".parse::<MeetingStatus>(), Ok(MeetingStatus::Live));
        assert!("open".parse::<MeetingStatus>().is_err());
    }
}
