//! Domain events
//!
//! Emitted after state changes have been committed. Secret motions never
//! carry the choice of a ballot.

use crate::ballot::{PresenceMode, VoteChoice};
use crate::core::ids::{MeetingId, MemberId, MotionId};
use crate::meeting::MeetingStatus;
use crate::result::{Decision, ResultSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    BallotRecorded {
        meeting: MeetingId,
        motion: MotionId,
        member: MemberId,
        /// `None` on secret motions
        choice: Option<VoteChoice>,
        presence: PresenceMode,
        proxy_voter: Option<MemberId>,
        /// An earlier ballot of the same member was replaced
        replaced: bool,
        at: DateTime<Utc>,
    },
    ProxyDelegated {
        meeting: MeetingId,
        giver: MemberId,
        receiver: MemberId,
        replaced_receiver: Option<MemberId>,
        at: DateTime<Utc>,
    },
    ProxyRevoked {
        meeting: MeetingId,
        giver: MemberId,
        at: DateTime<Utc>,
    },
    MotionOpened {
        meeting: MeetingId,
        motion: MotionId,
        at: DateTime<Utc>,
    },
    MotionClosed {
        meeting: MeetingId,
        motion: MotionId,
        at: DateTime<Utc>,
    },
    ManualTallyRecorded {
        meeting: MeetingId,
        motion: MotionId,
        consistent: bool,
        at: DateTime<Utc>,
    },
    MotionConsolidated {
        meeting: MeetingId,
        motion: MotionId,
        source: ResultSource,
        decision: Decision,
        /// False when the persisted outcome was already identical
        changed: bool,
        at: DateTime<Utc>,
    },
    MeetingConsolidated {
        meeting: MeetingId,
        consolidated: usize,
        failed: usize,
        at: DateTime<Utc>,
    },
    MeetingStatusChanged {
        meeting: MeetingId,
        from: MeetingStatus,
        to: MeetingStatus,
        at: DateTime<Utc>,
    },
    ReadinessChanged {
        meeting: MeetingId,
        can_validate: bool,
        appeared: Vec<String>,
        resolved: Vec<String>,
        at: DateTime<Utc>,
    },
}

impl DomainEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::BallotRecorded { .. } => "ballot_recorded",
            DomainEvent::ProxyDelegated { .. } => "proxy_delegated",
            DomainEvent::ProxyRevoked { .. } => "proxy_revoked",
            DomainEvent::MotionOpened { .. } => "motion_opened",
            DomainEvent::MotionClosed { .. } => "motion_closed",
            DomainEvent::ManualTallyRecorded { .. } => "manual_tally_recorded",
            DomainEvent::MotionConsolidated { .. } => "motion_consolidated",
            DomainEvent::MeetingConsolidated { .. } => "meeting_consolidated",
            DomainEvent::MeetingStatusChanged { .. } => "meeting_status_changed",
            DomainEvent::ReadinessChanged { .. } => "readiness_changed",
        }
    }

    pub fn meeting(&self) -> MeetingId {
        match self {
            DomainEvent::BallotRecorded { meeting, .. }
            | DomainEvent::ProxyDelegated { meeting, .. }
            | DomainEvent::ProxyRevoked { meeting, .. }
            | DomainEvent::MotionOpened { meeting, .. }
            | DomainEvent::MotionClosed { meeting, .. }
            | DomainEvent::ManualTallyRecorded { meeting, .. }
            | DomainEvent::MotionConsolidated { meeting, .. }
            | DomainEvent::MeetingConsolidated { meeting, .. }
            | DomainEvent::MeetingStatusChanged { meeting, .. }
            | DomainEvent::ReadinessChanged { meeting, .. } => *meeting,
        }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            DomainEvent::BallotRecorded { at, .. }
            | DomainEvent::ProxyDelegated { at, .. }
            | DomainEvent::ProxyRevoked { at, .. }
            | DomainEvent::MotionOpened { at, .. }
            | DomainEvent::MotionClosed { at, .. }
            | DomainEvent::ManualTallyRecorded { at, .. }
            | DomainEvent::MotionConsolidated { at, .. }
            | DomainEvent::MeetingConsolidated { at, .. }
            | DomainEvent::MeetingStatusChanged { at, .. }
            | DomainEvent::ReadinessChanged { at, .. } => *at,
        }
    }
}
