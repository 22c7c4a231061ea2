//! Store ports
//!
//! Narrow reader/writer traits per record type. A relational adapter may
//! implement all of them on one type; use cases only see the slice they
//! need.

use async_trait::async_trait;
use assembly_domain::{
    Ballot, Meeting, MeetingId, Member, MemberId, Motion, MotionId, QuorumPolicy, QuorumPolicyId,
    Roster, TenantId, VotePolicy, VotePolicyId,
};
use serde::Serialize;
use thiserror::Error;

/// Errors raised by store adapters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Write conflict: {0}")]
    Conflict(String),

    #[error("Cannot update missing {kind} #{id}")]
    Missing { kind: &'static str, id: u64 },
}

#[async_trait]
pub trait MeetingReader: Send + Sync {
    async fn meeting(&self, id: MeetingId) -> Result<Option<Meeting>, StoreError>;
}

#[async_trait]
pub trait MeetingWriter: Send + Sync {
    async fn save_meeting(&self, meeting: &Meeting) -> Result<(), StoreError>;
}

#[async_trait]
pub trait MotionReader: Send + Sync {
    async fn motion(&self, id: MotionId) -> Result<Option<Motion>, StoreError>;

    /// Every motion of the meeting, in no particular order
    async fn motions_for_meeting(&self, meeting: MeetingId) -> Result<Vec<Motion>, StoreError>;
}

#[async_trait]
pub trait MotionWriter: Send + Sync {
    /// Overwrite an existing motion row
    async fn save_motion(&self, motion: &Motion) -> Result<(), StoreError>;
}

/// Member roster collaborator
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn member(&self, id: MemberId) -> Result<Option<Member>, StoreError>;

    /// Active-member count and summed active weight of the tenant
    async fn eligible_roster(&self, tenant: TenantId) -> Result<Roster, StoreError>;
}

#[async_trait]
pub trait BallotReader: Send + Sync {
    async fn ballots_for_motion(&self, motion: MotionId) -> Result<Vec<Ballot>, StoreError>;

    async fn ballot_count(&self, motion: MotionId) -> Result<u64, StoreError> {
        Ok(self.ballots_for_motion(motion).await?.len() as u64)
    }
}

/// Outcome of an insert-or-update on `(motion, member)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BallotWrite {
    Inserted,
    Updated,
}

impl BallotWrite {
    pub fn replaced(&self) -> bool {
        matches!(self, BallotWrite::Updated)
    }
}

#[async_trait]
pub trait BallotWriter: Send + Sync {
    /// Insert, or replace the ballot already cast by the same member
    async fn upsert_ballot(&self, ballot: Ballot) -> Result<BallotWrite, StoreError>;
}

/// Read-only access to policy records
#[async_trait]
pub trait PolicyReader: Send + Sync {
    async fn quorum_policy(&self, id: QuorumPolicyId) -> Result<Option<QuorumPolicy>, StoreError>;

    async fn vote_policy(&self, id: VotePolicyId) -> Result<Option<VotePolicy>, StoreError>;
}
