//! Meeting readiness use case
//!
//! Decides whether a meeting may be validated from persisted official
//! results and simple structural counts. [`ReadinessTracker`] remembers the
//! last report per meeting so callers can notify on appearing or resolved
//! blockers.

use crate::ports::EnginePorts;
use crate::ports::clock::Clock;
use crate::ports::event_sink::EventSink;
use crate::ports::store::{BallotReader, MeetingReader, MotionReader, StoreError};
use assembly_domain::{
    DomainEvent, MeetingId, MotionState, ReadinessDiff, ReadinessFacts, ReadinessReport,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReadinessError {
    #[error("{0} not found")]
    MeetingNotFound(MeetingId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ReadinessError {
    pub fn code(&self) -> &'static str {
        match self {
            ReadinessError::MeetingNotFound(_) => "meeting_not_found",
            ReadinessError::Store(_) => "store_error",
        }
    }
}

pub struct EvaluateReadinessUseCase {
    meetings: Arc<dyn MeetingReader>,
    motions: Arc<dyn MotionReader>,
    ballots: Arc<dyn BallotReader>,
}

impl EvaluateReadinessUseCase {
    pub fn new(ports: &EnginePorts) -> Self {
        Self {
            meetings: ports.meetings.clone(),
            motions: ports.motions.clone(),
            ballots: ports.ballots.clone(),
        }
    }

    pub async fn execute(&self, meeting: MeetingId) -> Result<ReadinessReport, ReadinessError> {
        let record = self
            .meetings
            .meeting(meeting)
            .await?
            .ok_or(ReadinessError::MeetingNotFound(meeting))?;

        let mut facts = ReadinessFacts {
            has_president: record.has_president(),
            ..ReadinessFacts::default()
        };
        for motion in self.motions.motions_for_meeting(meeting).await? {
            match motion.state() {
                MotionState::NotStarted => {}
                MotionState::Open => facts.open_motions += 1,
                MotionState::Closed => {
                    let exploitable = motion.consistent_manual_tally().is_some()
                        || self.ballots.ballot_count(motion.id).await? > 0;
                    if !exploitable {
                        facts.closed_without_exploitable_result += 1;
                    }
                    if motion.official.is_none() {
                        facts.closed_without_official += 1;
                    }
                }
            }
        }

        let report = ReadinessReport::from_facts(meeting, facts);
        debug!(
            meeting = %meeting,
            can_validate = report.can_validate,
            violations = ?report.codes(),
            "Readiness evaluated"
        );
        Ok(report)
    }
}

/// Readiness with transition detection
pub struct ReadinessTracker {
    evaluator: Arc<EvaluateReadinessUseCase>,
    events: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    last: Mutex<HashMap<MeetingId, ReadinessReport>>,
}

impl ReadinessTracker {
    pub fn new(ports: &EnginePorts, evaluator: Arc<EvaluateReadinessUseCase>) -> Self {
        Self {
            evaluator,
            events: ports.events.clone(),
            clock: ports.clock.clone(),
            last: Mutex::new(HashMap::new()),
        }
    }

    /// Evaluate and diff against the previous observation of the meeting.
    ///
    /// Publishes `ReadinessChanged` when the set of blockers changed.
    pub async fn observe(
        &self,
        meeting: MeetingId,
    ) -> Result<(ReadinessReport, ReadinessDiff), ReadinessError> {
        let report = self.evaluator.execute(meeting).await?;

        let mut last = self.last.lock().await;
        let diff = report.diff(last.get(&meeting));
        if !diff.is_empty() {
            self.events.publish(&DomainEvent::ReadinessChanged {
                meeting,
                can_validate: report.can_validate,
                appeared: diff.appeared.iter().map(|c| c.to_string()).collect(),
                resolved: diff.resolved.iter().map(|c| c.to_string()).collect(),
                at: self.clock.now(),
            });
            info!(
                meeting = %meeting,
                appeared = ?diff.appeared,
                resolved = ?diff.resolved,
                "Readiness changed"
            );
        }
        last.insert(meeting, report.clone());
        Ok((report, diff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{Fixture, MEETING, MOTION, at};
    use assembly_domain::{
        Ballot, Decision, ManualTally, MemberId, Motion, MotionId, OfficialResult, PresenceMode,
        ResultSource, VoteChoice,
    };

    fn official() -> OfficialResult {
        OfficialResult {
            source: ResultSource::Evote,
            for_weight: 1.0,
            against_weight: 0.0,
            abstain_weight: 0.0,
            total_weight: 1.0,
            decision: Decision::Adopted,
            reason: "test".to_string(),
            decided_at: at(),
        }
    }

    fn close(fx: &Fixture, id: MotionId) {
        fx.update_motion(id, |m| m.closed_at = Some(at()));
    }

    #[tokio::test]
    async fn test_open_motion_and_missing_president() {
        let fx = Fixture::new(2);
        let report = EvaluateReadinessUseCase::new(&fx.ports)
            .execute(MEETING)
            .await
            .unwrap();
        assert!(!report.can_validate);
        assert_eq!(report.codes(), vec!["open_motions", "missing_president"]);
    }

    #[tokio::test]
    async fn test_closed_motion_without_result() {
        let fx = Fixture::new(2);
        fx.update_meeting(|m| m.president = Some("Chair".to_string()));
        close(&fx, MOTION);

        let report = EvaluateReadinessUseCase::new(&fx.ports)
            .execute(MEETING)
            .await
            .unwrap();
        assert_eq!(
            report.codes(),
            vec!["bad_closed_results", "consolidation_missing"]
        );
    }

    #[tokio::test]
    async fn test_ready_meeting() {
        let fx = Fixture::new(2);
        fx.update_meeting(|m| m.president = Some("Chair".to_string()));
        close(&fx, MOTION);
        fx.add_ballot(Ballot::direct(
            MOTION,
            MemberId(1),
            VoteChoice::For,
            1.0,
            PresenceMode::Present,
            at(),
        ));
        fx.update_motion(MOTION, |m| m.official = Some(official()));

        let mut manual = Motion::new(MotionId(2), MEETING, "Hand count");
        manual.opened_at = Some(at());
        manual.closed_at = Some(at());
        manual.manual_tally = Some(ManualTally::new(3, 2, 1, 0));
        manual.official = Some(official());
        fx.add_motion(manual);
        fx.add_motion(Motion::new(MotionId(3), MEETING, "Never opened"));

        let report = EvaluateReadinessUseCase::new(&fx.ports)
            .execute(MEETING)
            .await
            .unwrap();
        assert!(report.can_validate, "{:?}", report.codes());
    }

    #[tokio::test]
    async fn test_inconsistent_manual_tally_is_not_exploitable() {
        let fx = Fixture::new(2);
        fx.update_meeting(|m| m.president = Some("Chair".to_string()));
        close(&fx, MOTION);
        fx.update_motion(MOTION, |m| {
            m.manual_tally = Some(ManualTally::new(3, 1, 1, 0));
            m.official = Some(official());
        });

        let report = EvaluateReadinessUseCase::new(&fx.ports)
            .execute(MEETING)
            .await
            .unwrap();
        assert_eq!(report.codes(), vec!["bad_closed_results"]);
    }

    #[tokio::test]
    async fn test_tracker_reports_transitions() {
        let fx = Fixture::new(2);
        let evaluator = Arc::new(EvaluateReadinessUseCase::new(&fx.ports));
        let tracker = ReadinessTracker::new(&fx.ports, evaluator);

        let (_, diff) = tracker.observe(MEETING).await.unwrap();
        assert_eq!(diff.appeared, vec!["open_motions", "missing_president"]);

        let (_, diff) = tracker.observe(MEETING).await.unwrap();
        assert!(diff.is_empty());

        fx.update_meeting(|m| m.president = Some("Chair".to_string()));
        let (report, diff) = tracker.observe(MEETING).await.unwrap();
        assert_eq!(diff.resolved, vec!["missing_president"]);
        assert!(diff.appeared.is_empty());
        assert!(!report.can_validate);

        assert_eq!(
            fx.events.event_types(),
            vec!["readiness_changed", "readiness_changed"]
        );
    }

    #[tokio::test]
    async fn test_unknown_meeting() {
        let fx = Fixture::new(0);
        let err = EvaluateReadinessUseCase::new(&fx.ports)
            .execute(MeetingId(9))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "meeting_not_found");
    }
}
