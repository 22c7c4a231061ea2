//! Cast ballot use case (ballot acceptance guard)
//!
//! Checks a proposed ballot against motion/meeting state and voter
//! eligibility, in order, failing fast:
//!
//! 1. motion and meeting exist; meeting is not validated and is live
//! 2. motion is open
//! 3. the member whose vote is cast exists, is in the meeting's tenant, and
//!    is active
//! 4. direct ballot: that member is present in the room or remotely
//! 5. proxy ballot: the proxy voter is eligible, directly present, and holds
//!    an active delegation from the member
//!
//! On success the ballot is inserted or replaced with the weight of the
//! member whose vote it is, frozen at cast time.

use super::motion_locks::MotionLocks;
use crate::ports::EnginePorts;
use crate::ports::attendance::Attendance;
use crate::ports::clock::Clock;
use crate::ports::event_sink::EventSink;
use crate::ports::proxy_store::ProxyStore;
use crate::ports::store::{
    BallotWrite, BallotWriter, MeetingReader, MemberDirectory, MotionReader, StoreError,
};
use assembly_domain::{
    Ballot, DomainEvent, Meeting, MeetingId, MeetingStatus, Member, MemberId, MotionId,
    MotionState, PresenceMode, VoteChoice,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Why a ballot was refused
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CastBallotError {
    #[error("{0} not found")]
    MotionNotFound(MotionId),

    #[error("{0} not found")]
    MeetingNotFound(MeetingId),

    #[error("{0} is validated; no further ballots are accepted")]
    MeetingValidated(MeetingId),

    #[error("{meeting} is {status}, ballots are only accepted while it is live")]
    MeetingNotLive {
        meeting: MeetingId,
        status: MeetingStatus,
    },

    #[error("{motion} is {state}, not open for voting")]
    MotionNotOpen { motion: MotionId, state: MotionState },

    #[error("{0} not found")]
    MemberNotFound(MemberId),

    #[error("{0} does not belong to the meeting's organisation")]
    ForeignTenant(MemberId),

    #[error("{0} is inactive")]
    MemberInactive(MemberId),

    #[error("{0} is not present in the room or remotely")]
    VoterNotPresent(MemberId),

    #[error("Proxy voter {0} is unknown, inactive or from another organisation")]
    ProxyVoterIneligible(MemberId),

    #[error("Proxy voter {0} is not present in the room or remotely")]
    ProxyNotPresent(MemberId),

    #[error("{receiver} holds no active delegation from {giver}")]
    NoActiveDelegation { giver: MemberId, receiver: MemberId },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CastBallotError {
    /// Stable code for callers
    pub fn code(&self) -> &'static str {
        match self {
            CastBallotError::MotionNotFound(_) => "motion_not_found",
            CastBallotError::MeetingNotFound(_) => "meeting_not_found",
            CastBallotError::MeetingValidated(_) => "meeting_validated",
            CastBallotError::MeetingNotLive { .. } => "meeting_not_live",
            CastBallotError::MotionNotOpen { .. } => "motion_not_open",
            CastBallotError::MemberNotFound(_) => "member_not_found",
            CastBallotError::ForeignTenant(_) => "foreign_tenant",
            CastBallotError::MemberInactive(_) => "member_inactive",
            CastBallotError::VoterNotPresent(_) => "voter_not_present",
            CastBallotError::ProxyVoterIneligible(_) => "proxy_voter_ineligible",
            CastBallotError::ProxyNotPresent(_) => "proxy_not_present",
            CastBallotError::NoActiveDelegation { .. } => "no_active_delegation",
            CastBallotError::Store(_) => "store_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastBallotInput {
    pub motion: MotionId,
    /// The member whose vote this is (the giver for proxy ballots)
    pub member: MemberId,
    pub choice: VoteChoice,
    /// Set when a delegate casts on behalf of `member`
    pub proxy_voter: Option<MemberId>,
}

impl CastBallotInput {
    pub fn direct(motion: MotionId, member: MemberId, choice: VoteChoice) -> Self {
        Self {
            motion,
            member,
            choice,
            proxy_voter: None,
        }
    }

    pub fn by_proxy(
        motion: MotionId,
        giver: MemberId,
        proxy_voter: MemberId,
        choice: VoteChoice,
    ) -> Self {
        Self {
            motion,
            member: giver,
            choice,
            proxy_voter: Some(proxy_voter),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastBallotOutput {
    pub ballot: Ballot,
    pub write: BallotWrite,
}

pub struct CastBallotUseCase {
    meetings: Arc<dyn MeetingReader>,
    motions: Arc<dyn MotionReader>,
    members: Arc<dyn MemberDirectory>,
    attendance: Arc<dyn Attendance>,
    proxies: Arc<dyn ProxyStore>,
    ballots: Arc<dyn BallotWriter>,
    events: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    locks: MotionLocks,
}

impl CastBallotUseCase {
    pub fn new(ports: &EnginePorts, locks: MotionLocks) -> Self {
        Self {
            meetings: ports.meetings.clone(),
            motions: ports.motions.clone(),
            members: ports.members.clone(),
            attendance: ports.attendance.clone(),
            proxies: ports.proxies.clone(),
            ballots: ports.ballot_writer.clone(),
            events: ports.events.clone(),
            clock: ports.clock.clone(),
            locks,
        }
    }

    pub async fn execute(&self, input: CastBallotInput) -> Result<CastBallotOutput, CastBallotError> {
        let _guard = self.locks.lock(input.motion).await;

        // 1. motion and meeting
        let motion = self
            .motions
            .motion(input.motion)
            .await?
            .ok_or(CastBallotError::MotionNotFound(input.motion))?;
        let meeting = self
            .meetings
            .meeting(motion.meeting)
            .await?
            .ok_or(CastBallotError::MeetingNotFound(motion.meeting))?;
        if meeting.is_validated() {
            return Err(CastBallotError::MeetingValidated(meeting.id));
        }
        if !meeting.is_live() {
            return Err(CastBallotError::MeetingNotLive {
                meeting: meeting.id,
                status: meeting.status,
            });
        }

        // 2. motion open
        if !motion.is_open() {
            return Err(CastBallotError::MotionNotOpen {
                motion: motion.id,
                state: motion.state(),
            });
        }

        // 3. member eligibility
        let member = self
            .members
            .member(input.member)
            .await?
            .ok_or(CastBallotError::MemberNotFound(input.member))?;
        Self::check_eligible(&member, &meeting)?;

        let now = self.clock.now();
        let ballot = match input.proxy_voter {
            // 4. direct presence
            None => {
                let presence = self
                    .attendance
                    .presence(meeting.id, member.id)
                    .await?
                    .filter(|mode| mode.is_direct())
                    .ok_or(CastBallotError::VoterNotPresent(member.id))?;
                Ballot::direct(
                    motion.id,
                    member.id,
                    input.choice,
                    member.voting_weight(),
                    presence,
                    now,
                )
            }
            // 5. proxy voter presence and delegation
            Some(voter_id) => {
                let voter = self
                    .members
                    .member(voter_id)
                    .await?
                    .ok_or(CastBallotError::ProxyVoterIneligible(voter_id))?;
                if Self::check_eligible(&voter, &meeting).is_err() {
                    return Err(CastBallotError::ProxyVoterIneligible(voter_id));
                }
                if !self.attendance.is_present_direct(meeting.id, voter.id).await? {
                    return Err(CastBallotError::ProxyNotPresent(voter.id));
                }
                let authorized = self
                    .proxies
                    .active_delegation(meeting.id, member.id)
                    .await?
                    .is_some_and(|d| d.authorizes(meeting.id, member.id, voter.id));
                if !authorized {
                    return Err(CastBallotError::NoActiveDelegation {
                        giver: member.id,
                        receiver: voter.id,
                    });
                }
                Ballot::by_proxy(
                    motion.id,
                    member.id,
                    voter.id,
                    input.choice,
                    member.voting_weight(),
                    now,
                )
            }
        };

        let write = self.ballots.upsert_ballot(ballot.clone()).await?;
        debug!(
            motion = %motion.id,
            member = %member.id,
            proxy = ballot.proxy,
            replaced = write.replaced(),
            "Ballot stored"
        );

        self.events.publish(&DomainEvent::BallotRecorded {
            meeting: meeting.id,
            motion: motion.id,
            member: member.id,
            choice: (!motion.secret).then_some(ballot.choice),
            presence: ballot.presence,
            proxy_voter: ballot.proxy_voter,
            replaced: write.replaced(),
            at: now,
        });
        info!(motion = %motion.id, member = %member.id, "Ballot recorded");

        Ok(CastBallotOutput { ballot, write })
    }

    fn check_eligible(member: &Member, meeting: &Meeting) -> Result<(), CastBallotError> {
        if member.tenant != meeting.tenant {
            return Err(CastBallotError::ForeignTenant(member.id));
        }
        if !member.active {
            return Err(CastBallotError::MemberInactive(member.id));
        }
        Ok(())
    }
}
