//! Motion entity

use super::manual_tally::ManualTally;
use crate::core::error::DomainError;
use crate::core::ids::{AgendaItemId, MeetingId, MotionId, QuorumPolicyId, VotePolicyId};
use crate::meeting::Meeting;
use crate::result::OfficialResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Voting state derived from the open/close timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionState {
    NotStarted,
    Open,
    Closed,
}

impl MotionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MotionState::NotStarted => "not_started",
            MotionState::Open => "open",
            MotionState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for MotionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A question put to the vote within a meeting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub id: MotionId,
    pub meeting: MeetingId,
    #[serde(default)]
    pub agenda_item: Option<AgendaItemId>,
    pub title: String,
    #[serde(default)]
    pub opened_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    /// Overrides the meeting-level quorum policy
    #[serde(default)]
    pub quorum_policy: Option<QuorumPolicyId>,
    /// Overrides the meeting-level vote policy
    #[serde(default)]
    pub vote_policy: Option<VotePolicyId>,
    #[serde(default)]
    pub secret: bool,
    #[serde(default)]
    pub manual_tally: Option<ManualTally>,
    #[serde(default)]
    pub official: Option<OfficialResult>,
}

impl Motion {
    pub fn new(id: MotionId, meeting: MeetingId, title: impl Into<String>) -> Self {
        Self {
            id,
            meeting,
            agenda_item: None,
            title: title.into(),
            opened_at: None,
            closed_at: None,
            quorum_policy: None,
            vote_policy: None,
            secret: false,
            manual_tally: None,
            official: None,
        }
    }

    pub fn with_quorum_policy(mut self, policy: QuorumPolicyId) -> Self {
        self.quorum_policy = Some(policy);
        self
    }

    pub fn with_vote_policy(mut self, policy: VotePolicyId) -> Self {
        self.vote_policy = Some(policy);
        self
    }

    pub fn with_manual_tally(mut self, tally: ManualTally) -> Self {
        self.manual_tally = Some(tally);
        self
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub fn state(&self) -> MotionState {
        match (self.opened_at, self.closed_at) {
            (None, None) => MotionState::NotStarted,
            (Some(_), None) => MotionState::Open,
            (_, Some(_)) => MotionState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == MotionState::Open
    }

    pub fn is_closed(&self) -> bool {
        self.state() == MotionState::Closed
    }

    /// Reject the impossible closed-without-opened combination.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.opened_at.is_none() && self.closed_at.is_some() {
            return Err(DomainError::ClosedWithoutOpened);
        }
        Ok(())
    }

    pub fn open(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.opened_at.is_some() {
            return Err(DomainError::MotionAlreadyOpened);
        }
        self.opened_at = Some(now);
        Ok(())
    }

    pub fn close(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if !self.is_open() {
            return Err(DomainError::MotionNotOpen);
        }
        // A clock running behind must not produce closed < opened.
        let opened = self.opened_at.unwrap_or(now);
        self.closed_at = Some(now.max(opened));
        Ok(())
    }

    /// Manual tally usable as the official source
    pub fn consistent_manual_tally(&self) -> Option<&ManualTally> {
        self.manual_tally.as_ref().filter(|t| t.is_consistent())
    }

    /// Motion-level quorum policy, falling back to the meeting default
    pub fn effective_quorum_policy(&self, meeting: &Meeting) -> Option<QuorumPolicyId> {
        self.quorum_policy.or(meeting.quorum_policy)
    }

    /// Motion-level vote policy, falling back to the meeting default
    pub fn effective_vote_policy(&self, meeting: &Meeting) -> Option<VotePolicyId> {
        self.vote_policy.or(meeting.vote_policy)
    }
}

/// Order motions by close time, then id; unclosed motions sort last.
pub fn closed_order(a: &Motion, b: &Motion) -> std::cmp::Ordering {
    match (a.closed_at, b.closed_at) {
        (Some(x), Some(y)) => x.cmp(&y).then(a.id.cmp(&b.id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    }
}
