//! Compute motion result use case
//!
//! Gathers ballots, roster, policies and attendance for a motion and runs
//! the pure evaluation in [`assembly_domain::MotionResult::evaluate`].
//! Nothing is written: this also serves live dashboards on open motions,
//! where the result is flagged provisional.

use crate::ports::EnginePorts;
use crate::ports::attendance::Attendance;
use crate::ports::store::{
    BallotReader, MeetingReader, MemberDirectory, MotionReader, PolicyReader, StoreError,
};
use assembly_domain::{
    DomainError, MajorityBase, Meeting, MeetingId, Motion, MotionId, MotionResult, MotionState,
    ResultInputs, TallyAggregator,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResultError {
    #[error("{0} not found")]
    MotionNotFound(MotionId),

    #[error("{0} not found")]
    MeetingNotFound(MeetingId),

    #[error("{motion} is inconsistent: {source}")]
    InvalidMotion {
        motion: MotionId,
        source: DomainError,
    },

    #[error("{motion} is {state}; only closed motions are consolidated")]
    MotionNotClosed { motion: MotionId, state: MotionState },

    #[error("{0} is validated; official results are frozen")]
    MeetingValidated(MeetingId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResultError {
    pub fn code(&self) -> &'static str {
        match self {
            ResultError::MotionNotFound(_) => "motion_not_found",
            ResultError::MeetingNotFound(_) => "meeting_not_found",
            ResultError::InvalidMotion { .. } => "invalid_motion",
            ResultError::MotionNotClosed { .. } => "motion_not_closed",
            ResultError::MeetingValidated(_) => "meeting_validated",
            ResultError::Store(_) => "store_error",
        }
    }
}

pub struct ComputeResultUseCase {
    meetings: Arc<dyn MeetingReader>,
    motions: Arc<dyn MotionReader>,
    members: Arc<dyn MemberDirectory>,
    ballots: Arc<dyn BallotReader>,
    policies: Arc<dyn PolicyReader>,
    attendance: Arc<dyn Attendance>,
}

impl ComputeResultUseCase {
    pub fn new(ports: &EnginePorts) -> Self {
        Self {
            meetings: ports.meetings.clone(),
            motions: ports.motions.clone(),
            members: ports.members.clone(),
            ballots: ports.ballots.clone(),
            policies: ports.policies.clone(),
            attendance: ports.attendance.clone(),
        }
    }

    pub async fn execute(&self, motion: MotionId) -> Result<MotionResult, ResultError> {
        let motion = self.load_motion(motion).await?;
        let meeting = self.load_meeting(motion.meeting).await?;
        self.evaluate(&motion, &meeting).await
    }

    pub(crate) async fn load_motion(&self, id: MotionId) -> Result<Motion, ResultError> {
        self.motions
            .motion(id)
            .await?
            .ok_or(ResultError::MotionNotFound(id))
    }

    pub(crate) async fn load_meeting(&self, id: MeetingId) -> Result<Meeting, ResultError> {
        self.meetings
            .meeting(id)
            .await?
            .ok_or(ResultError::MeetingNotFound(id))
    }

    pub(crate) async fn evaluate(
        &self,
        motion: &Motion,
        meeting: &Meeting,
    ) -> Result<MotionResult, ResultError> {
        motion.validate().map_err(|source| ResultError::InvalidMotion {
            motion: motion.id,
            source,
        })?;

        let ballots = self.ballots.ballots_for_motion(motion.id).await?;
        let electronic = TallyAggregator::aggregate(&ballots);
        let eligible = self.members.eligible_roster(meeting.tenant).await?;

        if let Some(tally) = &motion.manual_tally
            && !tally.is_consistent()
        {
            warn!(
                motion = %motion.id,
                total = tally.total,
                "Manual tally is inconsistent, using electronic ballots"
            );
        }

        let quorum_policy = match motion.effective_quorum_policy(meeting) {
            Some(id) => {
                let policy = self.policies.quorum_policy(id).await?;
                if policy.is_none() {
                    warn!(motion = %motion.id, policy = id.get(), "Quorum policy not found, not applied");
                }
                policy
            }
            None => None,
        };
        let vote_policy = match motion.effective_vote_policy(meeting) {
            Some(id) => {
                let policy = self.policies.vote_policy(id).await?;
                if policy.is_none() {
                    warn!(motion = %motion.id, policy = id.get(), "Vote policy not found, not applied");
                }
                policy
            }
            None => None,
        };

        let present_weight = match &vote_policy {
            Some(policy) if policy.base == MajorityBase::Present => {
                Some(self.present_weight(meeting).await?)
            }
            _ => None,
        };

        let result = MotionResult::evaluate(ResultInputs {
            motion: motion.id,
            manual: motion.manual_tally.as_ref(),
            electronic,
            eligible,
            convocation: meeting.convocation,
            quorum_policy: quorum_policy.as_ref(),
            vote_policy: vote_policy.as_ref(),
            present_weight,
            provisional: !motion.is_closed(),
        });
        debug!(
            motion = %motion.id,
            source = %result.source,
            decision = %result.decision,
            provisional = result.provisional,
            "Motion result computed"
        );
        Ok(result)
    }

    /// Summed weight of active members attending in any mode
    async fn present_weight(&self, meeting: &Meeting) -> Result<f64, StoreError> {
        let mut total = 0.0;
        for (id, _) in self.attendance.attendees(meeting.id).await? {
            if let Some(member) = self.members.member(id).await?
                && member.tenant == meeting.tenant
                && member.active
            {
                total += member.voting_weight();
            }
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{Fixture, MOTION, at};
    use assembly_domain::{
        Ballot, Decision, ManualTally, MemberId, PresenceMode, QuorumBasis, QuorumPolicy,
        QuorumPolicyId, ResultSource, Verdict, VoteChoice, VotePolicy, VotePolicyId,
    };

    fn cast(fx: &Fixture, member: u64, choice: VoteChoice) {
        fx.add_ballot(Ballot::direct(
            MOTION,
            MemberId(member),
            choice,
            1.0,
            PresenceMode::Present,
            at(),
        ));
    }

    fn with_policies(fx: &Fixture) {
        fx.add_quorum_policy(QuorumPolicy::single(
            QuorumPolicyId(1),
            QuorumBasis::EligibleMembers,
            0.5,
        ));
        fx.add_vote_policy(VotePolicy::simple(VotePolicyId(1)));
        fx.update_meeting(|m| {
            m.quorum_policy = Some(QuorumPolicyId(1));
            m.vote_policy = Some(VotePolicyId(1));
        });
    }

    #[tokio::test]
    async fn test_scenario_a_no_quorum() {
        let fx = Fixture::new(10);
        with_policies(&fx);
        for id in 1..=3 {
            cast(&fx, id, VoteChoice::For);
        }
        cast(&fx, 4, VoteChoice::Against);

        let result = ComputeResultUseCase::new(&fx.ports).execute(MOTION).await.unwrap();
        assert_eq!(result.quorum.verdict, Verdict::NotMet);
        assert!((result.quorum.ratio().unwrap() - 0.4).abs() < 1e-12);
        assert_eq!(result.decision, Decision::NoQuorum);
        assert!(result.provisional);
    }

    #[tokio::test]
    async fn test_scenario_b_adopted() {
        let fx = Fixture::new(10);
        with_policies(&fx);
        for id in 1..=4 {
            cast(&fx, id, VoteChoice::For);
        }
        cast(&fx, 5, VoteChoice::Against);
        cast(&fx, 6, VoteChoice::Against);

        let result = ComputeResultUseCase::new(&fx.ports).execute(MOTION).await.unwrap();
        assert_eq!(result.quorum.verdict, Verdict::Met);
        assert!((result.majority.ratio.unwrap() - 4.0 / 6.0).abs() < 1e-12);
        assert_eq!(result.decision, Decision::Adopted);
    }

    #[tokio::test]
    async fn test_scenario_c_manual_tally_wins() {
        let fx = Fixture::new(10);
        with_policies(&fx);
        for id in 1..=6 {
            cast(&fx, id, VoteChoice::For);
        }
        fx.update_motion(MOTION, |m| m.manual_tally = Some(ManualTally::new(50, 20, 20, 10)));

        let result = ComputeResultUseCase::new(&fx.ports).execute(MOTION).await.unwrap();
        assert_eq!(result.source, ResultSource::Manual);
        assert_eq!(result.tally.expressed.members, 50);
        assert_eq!(result.tally.for_votes.weight, 20.0);
        assert_eq!(result.decision, Decision::Rejected);
    }

    #[tokio::test]
    async fn test_motion_policy_overrides_meeting_policy() {
        let fx = Fixture::new(10);
        with_policies(&fx);
        fx.add_vote_policy(VotePolicy::new(VotePolicyId(2), MajorityBase::Expressed, 0.75));
        fx.update_motion(MOTION, |m| m.vote_policy = Some(VotePolicyId(2)));
        for id in 1..=4 {
            cast(&fx, id, VoteChoice::For);
        }
        cast(&fx, 5, VoteChoice::Against);
        cast(&fx, 6, VoteChoice::Against);

        let result = ComputeResultUseCase::new(&fx.ports).execute(MOTION).await.unwrap();
        assert_eq!(result.majority.threshold, Some(0.75));
        assert_eq!(result.decision, Decision::Rejected);
    }

    #[tokio::test]
    async fn test_missing_policy_records_are_not_applied() {
        let fx = Fixture::new(4);
        fx.update_meeting(|m| {
            m.quorum_policy = Some(QuorumPolicyId(7));
            m.vote_policy = Some(VotePolicyId(7));
        });
        cast(&fx, 1, VoteChoice::For);

        let result = ComputeResultUseCase::new(&fx.ports).execute(MOTION).await.unwrap();
        assert!(!result.quorum.applied());
        assert_eq!(result.decision, Decision::NoPolicy);
    }

    #[tokio::test]
    async fn test_present_base_uses_attendance_weight() {
        let fx = Fixture::new(10);
        fx.add_vote_policy(VotePolicy::new(VotePolicyId(3), MajorityBase::Present, 0.5));
        fx.update_meeting(|m| m.vote_policy = Some(VotePolicyId(3)));
        fx.present(1..=8, PresenceMode::Present);
        for id in 1..=3 {
            cast(&fx, id, VoteChoice::For);
        }
        cast(&fx, 4, VoteChoice::Against);

        let result = ComputeResultUseCase::new(&fx.ports).execute(MOTION).await.unwrap();
        // 3 of 8 present, although 3 of 4 expressed
        assert_eq!(result.majority.base_total, Some(8.0));
        assert_eq!(result.decision, Decision::Rejected);
    }

    #[tokio::test]
    async fn test_closed_without_opened_is_rejected() {
        let fx = Fixture::new(1);
        fx.update_motion(MOTION, |m| {
            m.opened_at = None;
            m.closed_at = Some(at());
        });
        let err = ComputeResultUseCase::new(&fx.ports)
            .execute(MOTION)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_motion");
    }

    #[tokio::test]
    async fn test_unknown_motion() {
        let fx = Fixture::new(1);
        let err = ComputeResultUseCase::new(&fx.ports)
            .execute(MotionId(99))
            .await
            .unwrap_err();
        assert_eq!(err, ResultError::MotionNotFound(MotionId(99)));
    }
}
