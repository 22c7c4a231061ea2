//! Hand-written port mocks shared by the use case tests

use crate::ports::EnginePorts;
use crate::ports::attendance::Attendance;
use crate::ports::clock::FixedClock;
use crate::ports::event_sink::CollectingEventSink;
use crate::ports::proxy_store::{ProxyStore, ProxyStoreError};
use crate::ports::store::{
    BallotReader, BallotWrite, BallotWriter, MeetingReader, MeetingWriter, MemberDirectory,
    MotionReader, MotionWriter, PolicyReader, StoreError,
};
use assembly_domain::{
    Ballot, DelegationBook, Meeting, MeetingId, MeetingStatus, Member, MemberId, Motion, MotionId,
    PresenceMode, ProxyDelegation, QuorumPolicy, QuorumPolicyId, Roster, TenantId, VotePolicy,
    VotePolicyId,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct MockState {
    pub meetings: HashMap<MeetingId, Meeting>,
    pub motions: HashMap<MotionId, Motion>,
    pub members: HashMap<MemberId, Member>,
    pub ballots: Vec<Ballot>,
    pub quorum_policies: HashMap<QuorumPolicyId, QuorumPolicy>,
    pub vote_policies: HashMap<VotePolicyId, VotePolicy>,
    pub attendance: HashMap<(MeetingId, MemberId), PresenceMode>,
    pub delegations: Vec<ProxyDelegation>,
}

#[derive(Default)]
pub struct MockStore {
    pub state: Mutex<MockState>,
}

impl MockStore {
    pub fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }
}

#[async_trait]
impl MeetingReader for MockStore {
    async fn meeting(&self, id: MeetingId) -> Result<Option<Meeting>, StoreError> {
        Ok(self.with(|s| s.meetings.get(&id).cloned()))
    }
}

#[async_trait]
impl MeetingWriter for MockStore {
    async fn save_meeting(&self, meeting: &Meeting) -> Result<(), StoreError> {
        self.with(|s| s.meetings.insert(meeting.id, meeting.clone()));
        Ok(())
    }
}

#[async_trait]
impl MotionReader for MockStore {
    async fn motion(&self, id: MotionId) -> Result<Option<Motion>, StoreError> {
        Ok(self.with(|s| s.motions.get(&id).cloned()))
    }

    async fn motions_for_meeting(&self, meeting: MeetingId) -> Result<Vec<Motion>, StoreError> {
        Ok(self.with(|s| {
            s.motions
                .values()
                .filter(|m| m.meeting == meeting)
                .cloned()
                .collect()
        }))
    }
}

#[async_trait]
impl MotionWriter for MockStore {
    async fn save_motion(&self, motion: &Motion) -> Result<(), StoreError> {
        self.with(|s| s.motions.insert(motion.id, motion.clone()));
        Ok(())
    }
}

#[async_trait]
impl MemberDirectory for MockStore {
    async fn member(&self, id: MemberId) -> Result<Option<Member>, StoreError> {
        Ok(self.with(|s| s.members.get(&id).cloned()))
    }

    async fn eligible_roster(&self, tenant: TenantId) -> Result<Roster, StoreError> {
        Ok(self.with(|s| Roster::of_tenant(tenant, s.members.values())))
    }
}

#[async_trait]
impl BallotReader for MockStore {
    async fn ballots_for_motion(&self, motion: MotionId) -> Result<Vec<Ballot>, StoreError> {
        Ok(self.with(|s| {
            s.ballots
                .iter()
                .filter(|b| b.motion == motion)
                .cloned()
                .collect()
        }))
    }
}

#[async_trait]
impl BallotWriter for MockStore {
    async fn upsert_ballot(&self, ballot: Ballot) -> Result<BallotWrite, StoreError> {
        Ok(self.with(|s| {
            match s
                .ballots
                .iter_mut()
                .find(|b| b.motion == ballot.motion && b.member == ballot.member)
            {
                Some(existing) => {
                    *existing = ballot;
                    BallotWrite::Updated
                }
                None => {
                    s.ballots.push(ballot);
                    BallotWrite::Inserted
                }
            }
        }))
    }
}

#[async_trait]
impl PolicyReader for MockStore {
    async fn quorum_policy(&self, id: QuorumPolicyId) -> Result<Option<QuorumPolicy>, StoreError> {
        Ok(self.with(|s| s.quorum_policies.get(&id).cloned()))
    }

    async fn vote_policy(&self, id: VotePolicyId) -> Result<Option<VotePolicy>, StoreError> {
        Ok(self.with(|s| s.vote_policies.get(&id).cloned()))
    }
}

#[async_trait]
impl Attendance for MockStore {
    async fn presence(
        &self,
        meeting: MeetingId,
        member: MemberId,
    ) -> Result<Option<PresenceMode>, StoreError> {
        Ok(self.with(|s| s.attendance.get(&(meeting, member)).copied()))
    }

    async fn attendees(
        &self,
        meeting: MeetingId,
    ) -> Result<Vec<(MemberId, PresenceMode)>, StoreError> {
        Ok(self.with(|s| {
            let mut rows: Vec<_> = s
                .attendance
                .iter()
                .filter(|((m, _), _)| *m == meeting)
                .map(|((_, member), mode)| (*member, *mode))
                .collect();
            rows.sort_by_key(|(member, _)| *member);
            rows
        }))
    }
}

#[async_trait]
impl ProxyStore for MockStore {
    async fn admit(
        &self,
        delegation: ProxyDelegation,
        cap: Option<u32>,
    ) -> Result<Option<MemberId>, ProxyStoreError> {
        self.with(|s| {
            let mut book = DelegationBook::new(delegation.meeting, s.delegations.iter());
            let replaced = book.admit(delegation.giver, delegation.receiver, cap)?;
            for row in s.delegations.iter_mut() {
                if row.meeting == delegation.meeting && row.giver == delegation.giver {
                    row.revoke(delegation.created_at);
                }
            }
            s.delegations.push(delegation);
            Ok(replaced)
        })
    }

    async fn revoke(
        &self,
        meeting: MeetingId,
        giver: MemberId,
        at: DateTime<Utc>,
    ) -> Result<Option<ProxyDelegation>, StoreError> {
        Ok(self.with(|s| {
            s.delegations
                .iter_mut()
                .find(|d| d.meeting == meeting && d.giver == giver && d.is_active())
                .map(|d| {
                    d.revoke(at);
                    d.clone()
                })
        }))
    }

    async fn active_delegation(
        &self,
        meeting: MeetingId,
        giver: MemberId,
    ) -> Result<Option<ProxyDelegation>, StoreError> {
        Ok(self.with(|s| {
            s.delegations
                .iter()
                .find(|d| d.meeting == meeting && d.giver == giver && d.is_active())
                .cloned()
        }))
    }

    async fn delegations(&self, meeting: MeetingId) -> Result<Vec<ProxyDelegation>, StoreError> {
        Ok(self.with(|s| {
            s.delegations
                .iter()
                .filter(|d| d.meeting == meeting)
                .cloned()
                .collect()
        }))
    }
}

pub const TENANT: TenantId = TenantId(1);
pub const MEETING: MeetingId = MeetingId(1);
pub const MOTION: MotionId = MotionId(1);

pub fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
}

/// Live meeting with members 1..=n (weight 1.0) and one open motion
pub struct Fixture {
    pub store: Arc<MockStore>,
    pub events: Arc<CollectingEventSink>,
    pub ports: EnginePorts,
}

impl Fixture {
    pub fn new(members: u64) -> Self {
        let store = Arc::new(MockStore::default());
        let events = Arc::new(CollectingEventSink::new());
        store.with(|s| {
            s.meetings.insert(
                MEETING,
                Meeting::new(MEETING, TENANT, "Annual general meeting")
                    .with_status(MeetingStatus::Live),
            );
            let mut motion = Motion::new(MOTION, MEETING, "Approve the accounts");
            motion.opened_at = Some(at());
            s.motions.insert(MOTION, motion);
            for id in 1..=members {
                s.members.insert(
                    MemberId(id),
                    Member::new(MemberId(id), TENANT, format!("Member {}", id)),
                );
            }
        });
        let ports = EnginePorts::from_store(store.clone(), events.clone(), Arc::new(FixedClock(at())));
        Self {
            store,
            events,
            ports,
        }
    }

    pub fn present(&self, members: impl IntoIterator<Item = u64>, mode: PresenceMode) {
        self.store.with(|s| {
            for id in members {
                s.attendance.insert((MEETING, MemberId(id)), mode);
            }
        });
    }

    pub fn update_meeting(&self, f: impl FnOnce(&mut Meeting)) {
        self.store.with(|s| {
            if let Some(meeting) = s.meetings.get_mut(&MEETING) {
                f(meeting);
            }
        });
    }

    pub fn update_motion(&self, id: MotionId, f: impl FnOnce(&mut Motion)) {
        self.store.with(|s| {
            if let Some(motion) = s.motions.get_mut(&id) {
                f(motion);
            }
        });
    }

    pub fn add_motion(&self, motion: Motion) {
        self.store.with(|s| s.motions.insert(motion.id, motion));
    }

    pub fn add_member(&self, member: Member) {
        self.store.with(|s| s.members.insert(member.id, member));
    }

    pub fn add_quorum_policy(&self, policy: QuorumPolicy) {
        self.store.with(|s| s.quorum_policies.insert(policy.id, policy));
    }

    pub fn add_vote_policy(&self, policy: VotePolicy) {
        self.store.with(|s| s.vote_policies.insert(policy.id, policy));
    }

    pub fn add_delegation(&self, giver: u64, receiver: u64) {
        self.store.with(|s| {
            s.delegations.push(ProxyDelegation::new(
                MEETING,
                MemberId(giver),
                MemberId(receiver),
                at(),
            ))
        });
    }

    pub fn add_ballot(&self, ballot: Ballot) {
        self.store.with(|s| s.ballots.push(ballot));
    }

    pub fn ballots(&self) -> Vec<Ballot> {
        self.store.with(|s| s.ballots.clone())
    }

    pub fn motion(&self, id: MotionId) -> Motion {
        self.store.with(|s| s.motions.get(&id).cloned().unwrap())
    }

    pub fn meeting(&self) -> Meeting {
        self.store.with(|s| s.meetings.get(&MEETING).cloned().unwrap())
    }
}
