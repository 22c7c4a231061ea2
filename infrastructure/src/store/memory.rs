//! In-memory store implementing every persistence port
//!
//! All state lives behind one `RwLock`, so each port call is atomic with
//! respect to the others. In particular the proxy cap check and the
//! delegation write happen under the same write guard.

use super::snapshot::{AttendanceRecord, SNAPSHOT_VERSION, StoreSnapshot};
use assembly_application::{
    Attendance, BallotReader, BallotWrite, BallotWriter, MeetingReader, MeetingWriter,
    MemberDirectory, MotionReader, MotionWriter, PolicyReader, ProxyStore, ProxyStoreError,
    StoreError,
};
use assembly_domain::{
    Ballot, DelegationBook, Meeting, MeetingId, Member, MemberId, Motion, MotionId, PresenceMode,
    ProxyDelegation, QuorumPolicy, QuorumPolicyId, Roster, TenantId, VotePolicy, VotePolicyId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Debug, Default)]
struct StoreState {
    meetings: BTreeMap<MeetingId, Meeting>,
    motions: BTreeMap<MotionId, Motion>,
    members: BTreeMap<MemberId, Member>,
    ballots: BTreeMap<(MotionId, MemberId), Ballot>,
    quorum_policies: BTreeMap<QuorumPolicyId, QuorumPolicy>,
    vote_policies: BTreeMap<VotePolicyId, VotePolicy>,
    attendance: BTreeMap<(MeetingId, MemberId), PresenceMode>,
    /// Full history, revoked rows included
    delegations: Vec<ProxyDelegation>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot that already passed validation.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let state = StoreState {
            meetings: snapshot.meetings.into_iter().map(|m| (m.id, m)).collect(),
            motions: snapshot.motions.into_iter().map(|m| (m.id, m)).collect(),
            members: snapshot.members.into_iter().map(|m| (m.id, m)).collect(),
            ballots: snapshot
                .ballots
                .into_iter()
                .map(|b| ((b.motion, b.member), b))
                .collect(),
            quorum_policies: snapshot
                .quorum_policies
                .into_iter()
                .map(|p| (p.id, p))
                .collect(),
            vote_policies: snapshot
                .vote_policies
                .into_iter()
                .map(|p| (p.id, p))
                .collect(),
            attendance: snapshot
                .attendance
                .into_iter()
                .map(|r| ((r.meeting, r.member), r.mode))
                .collect(),
            delegations: snapshot.delegations,
        };
        Self {
            state: RwLock::new(state),
        }
    }

    pub fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        let s = self.read()?;
        Ok(StoreSnapshot {
            version: SNAPSHOT_VERSION,
            meetings: s.meetings.values().cloned().collect(),
            motions: s.motions.values().cloned().collect(),
            members: s.members.values().cloned().collect(),
            ballots: s.ballots.values().cloned().collect(),
            quorum_policies: s.quorum_policies.values().cloned().collect(),
            vote_policies: s.vote_policies.values().cloned().collect(),
            attendance: s
                .attendance
                .iter()
                .map(|(&(meeting, member), &mode)| AttendanceRecord {
                    meeting,
                    member,
                    mode,
                })
                .collect(),
            delegations: s.delegations.clone(),
        })
    }

    pub fn insert_meeting(&self, meeting: Meeting) -> Result<(), StoreError> {
        self.write()?.meetings.insert(meeting.id, meeting);
        Ok(())
    }

    pub fn insert_motion(&self, motion: Motion) -> Result<(), StoreError> {
        let mut s = self.write()?;
        if !s.meetings.contains_key(&motion.meeting) {
            return Err(StoreError::Missing {
                kind: "meeting",
                id: motion.meeting.get(),
            });
        }
        s.motions.insert(motion.id, motion);
        Ok(())
    }

    pub fn insert_member(&self, member: Member) -> Result<(), StoreError> {
        self.write()?.members.insert(member.id, member);
        Ok(())
    }

    pub fn insert_quorum_policy(&self, policy: QuorumPolicy) -> Result<(), StoreError> {
        self.write()?.quorum_policies.insert(policy.id, policy);
        Ok(())
    }

    pub fn insert_vote_policy(&self, policy: VotePolicy) -> Result<(), StoreError> {
        self.write()?.vote_policies.insert(policy.id, policy);
        Ok(())
    }

    /// Record how `member` attends `meeting`; `None` marks them absent.
    pub fn set_attendance(
        &self,
        meeting: MeetingId,
        member: MemberId,
        mode: Option<PresenceMode>,
    ) -> Result<(), StoreError> {
        let mut s = self.write()?;
        match mode {
            Some(mode) => s.attendance.insert((meeting, member), mode),
            None => s.attendance.remove(&(meeting, member)),
        };
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl MeetingReader for InMemoryStore {
    async fn meeting(&self, id: MeetingId) -> Result<Option<Meeting>, StoreError> {
        Ok(self.read()?.meetings.get(&id).cloned())
    }
}

#[async_trait]
impl MeetingWriter for InMemoryStore {
    async fn save_meeting(&self, meeting: &Meeting) -> Result<(), StoreError> {
        let mut s = self.write()?;
        match s.meetings.get_mut(&meeting.id) {
            Some(slot) => {
                *slot = meeting.clone();
                Ok(())
            }
            None => Err(StoreError::Missing {
                kind: "meeting",
                id: meeting.id.get(),
            }),
        }
    }
}

#[async_trait]
impl MotionReader for InMemoryStore {
    async fn motion(&self, id: MotionId) -> Result<Option<Motion>, StoreError> {
        Ok(self.read()?.motions.get(&id).cloned())
    }

    async fn motions_for_meeting(&self, meeting: MeetingId) -> Result<Vec<Motion>, StoreError> {
        Ok(self
            .read()?
            .motions
            .values()
            .filter(|m| m.meeting == meeting)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MotionWriter for InMemoryStore {
    async fn save_motion(&self, motion: &Motion) -> Result<(), StoreError> {
        let mut s = self.write()?;
        match s.motions.get_mut(&motion.id) {
            Some(slot) => {
                *slot = motion.clone();
                Ok(())
            }
            None => Err(StoreError::Missing {
                kind: "motion",
                id: motion.id.get(),
            }),
        }
    }
}

#[async_trait]
impl MemberDirectory for InMemoryStore {
    async fn member(&self, id: MemberId) -> Result<Option<Member>, StoreError> {
        Ok(self.read()?.members.get(&id).cloned())
    }

    async fn eligible_roster(&self, tenant: TenantId) -> Result<Roster, StoreError> {
        Ok(Roster::of_tenant(tenant, self.read()?.members.values()))
    }
}

#[async_trait]
impl BallotReader for InMemoryStore {
    async fn ballots_for_motion(&self, motion: MotionId) -> Result<Vec<Ballot>, StoreError> {
        Ok(self
            .read()?
            .ballots
            .range((motion, MemberId(0))..=(motion, MemberId(u64::MAX)))
            .map(|(_, b)| b.clone())
            .collect())
    }

    async fn ballot_count(&self, motion: MotionId) -> Result<u64, StoreError> {
        Ok(self
            .read()?
            .ballots
            .range((motion, MemberId(0))..=(motion, MemberId(u64::MAX)))
            .count() as u64)
    }
}

#[async_trait]
impl BallotWriter for InMemoryStore {
    async fn upsert_ballot(&self, ballot: Ballot) -> Result<BallotWrite, StoreError> {
        let mut s = self.write()?;
        if !s.motions.contains_key(&ballot.motion) {
            return Err(StoreError::Missing {
                kind: "motion",
                id: ballot.motion.get(),
            });
        }
        let key = (ballot.motion, ballot.member);
        let write = match s.ballots.insert(key, ballot) {
            Some(_) => BallotWrite::Updated,
            None => BallotWrite::Inserted,
        };
        debug!(motion = %key.0, member = %key.1, ?write, "Ballot stored");
        Ok(write)
    }
}

#[async_trait]
impl PolicyReader for InMemoryStore {
    async fn quorum_policy(&self, id: QuorumPolicyId) -> Result<Option<QuorumPolicy>, StoreError> {
        Ok(self.read()?.quorum_policies.get(&id).cloned())
    }

    async fn vote_policy(&self, id: VotePolicyId) -> Result<Option<VotePolicy>, StoreError> {
        Ok(self.read()?.vote_policies.get(&id).cloned())
    }
}

#[async_trait]
impl Attendance for InMemoryStore {
    async fn presence(
        &self,
        meeting: MeetingId,
        member: MemberId,
    ) -> Result<Option<PresenceMode>, StoreError> {
        Ok(self.read()?.attendance.get(&(meeting, member)).copied())
    }

    async fn attendees(
        &self,
        meeting: MeetingId,
    ) -> Result<Vec<(MemberId, PresenceMode)>, StoreError> {
        Ok(self
            .read()?
            .attendance
            .range((meeting, MemberId(0))..=(meeting, MemberId(u64::MAX)))
            .map(|(&(_, member), &mode)| (member, mode))
            .collect())
    }
}

#[async_trait]
impl ProxyStore for InMemoryStore {
    async fn admit(
        &self,
        delegation: ProxyDelegation,
        cap: Option<u32>,
    ) -> Result<Option<MemberId>, ProxyStoreError> {
        let mut s = self.write()?;
        let mut book = DelegationBook::new(delegation.meeting, s.delegations.iter());
        let replaced = book.admit(delegation.giver, delegation.receiver, cap)?;
        for row in s.delegations.iter_mut() {
            if row.meeting == delegation.meeting && row.giver == delegation.giver {
                row.revoke(delegation.created_at);
            }
        }
        s.delegations.push(delegation);
        Ok(replaced)
    }

    async fn revoke(
        &self,
        meeting: MeetingId,
        giver: MemberId,
        at: DateTime<Utc>,
    ) -> Result<Option<ProxyDelegation>, StoreError> {
        let mut s = self.write()?;
        Ok(s.delegations
            .iter_mut()
            .find(|d| d.meeting == meeting && d.giver == giver && d.is_active())
            .map(|d| {
                d.revoke(at);
                d.clone()
            }))
    }

    async fn active_delegation(
        &self,
        meeting: MeetingId,
        giver: MemberId,
    ) -> Result<Option<ProxyDelegation>, StoreError> {
        Ok(self
            .read()?
            .delegations
            .iter()
            .find(|d| d.meeting == meeting && d.giver == giver && d.is_active())
            .cloned())
    }

    async fn delegations(&self, meeting: MeetingId) -> Result<Vec<ProxyDelegation>, StoreError> {
        Ok(self
            .read()?
            .delegations
            .iter()
            .filter(|d| d.meeting == meeting)
            .cloned()
            .collect())
    }
}
