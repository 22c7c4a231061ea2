//! Meeting lifecycle use case
//!
//! Linear status transitions. Validation is gated on readiness and freezes
//! the meeting.

use super::motion_lifecycle::LifecycleError;
use super::readiness::EvaluateReadinessUseCase;
use crate::ports::EnginePorts;
use crate::ports::clock::Clock;
use crate::ports::event_sink::EventSink;
use crate::ports::store::{MeetingReader, MeetingWriter};
use assembly_domain::{DomainEvent, Meeting, MeetingId, MeetingStatus};
use std::sync::Arc;
use tracing::info;

pub struct MeetingLifecycleUseCase {
    meetings: Arc<dyn MeetingReader>,
    meeting_writer: Arc<dyn MeetingWriter>,
    readiness: Arc<EvaluateReadinessUseCase>,
    events: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
}

impl MeetingLifecycleUseCase {
    pub fn new(ports: &EnginePorts, readiness: Arc<EvaluateReadinessUseCase>) -> Self {
        Self {
            meetings: ports.meetings.clone(),
            meeting_writer: ports.meeting_writer.clone(),
            readiness,
            events: ports.events.clone(),
            clock: ports.clock.clone(),
        }
    }

    /// Move the meeting to `target`, the status right after the current one.
    pub async fn advance(
        &self,
        meeting: MeetingId,
        target: MeetingStatus,
    ) -> Result<Meeting, LifecycleError> {
        let mut record = self.load(meeting).await?;

        if target == MeetingStatus::Validated {
            let report = self.readiness.execute(meeting).await?;
            if !report.can_validate {
                return Err(LifecycleError::NotReady {
                    meeting,
                    violations: report.codes(),
                });
            }
        }

        let now = self.clock.now();
        let from = record.advance_to(target, now)?;
        self.meeting_writer.save_meeting(&record).await?;

        self.events.publish(&DomainEvent::MeetingStatusChanged {
            meeting,
            from,
            to: record.status,
            at: now,
        });
        info!(meeting = %meeting, from = %from, to = %record.status, "Meeting status changed");
        Ok(record)
    }

    /// Record the chair, required before validation.
    pub async fn record_president(
        &self,
        meeting: MeetingId,
        name: &str,
    ) -> Result<Meeting, LifecycleError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LifecycleError::EmptyPresident);
        }
        let mut record = self.load(meeting).await?;
        if record.is_validated() {
            return Err(LifecycleError::MeetingValidated(meeting));
        }
        record.president = Some(name.to_string());
        self.meeting_writer.save_meeting(&record).await?;
        info!(meeting = %meeting, "President recorded");
        Ok(record)
    }

    async fn load(&self, id: MeetingId) -> Result<Meeting, LifecycleError> {
        self.meetings
            .meeting(id)
            .await?
            .ok_or(LifecycleError::MeetingNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{Fixture, MEETING, MOTION, at};
    use assembly_domain::{Decision, OfficialResult, ResultSource, TransitionError};

    fn lifecycle(fx: &Fixture) -> MeetingLifecycleUseCase {
        MeetingLifecycleUseCase::new(
            &fx.ports,
            Arc::new(EvaluateReadinessUseCase::new(&fx.ports)),
        )
    }

    fn settle(fx: &Fixture) {
        fx.update_motion(MOTION, |m| {
            m.closed_at = Some(at());
            m.manual_tally = Some(assembly_domain::ManualTally::new(2, 2, 0, 0));
            m.official = Some(OfficialResult {
                source: ResultSource::Manual,
                for_weight: 2.0,
                against_weight: 0.0,
                abstain_weight: 0.0,
                total_weight: 2.0,
                decision: Decision::Adopted,
                reason: "test".to_string(),
                decided_at: at(),
            });
        });
    }

    #[tokio::test]
    async fn test_linear_advance() {
        let fx = Fixture::new(1);
        let meeting = lifecycle(&fx)
            .advance(MEETING, MeetingStatus::Closed)
            .await
            .unwrap();
        assert_eq!(meeting.status, MeetingStatus::Closed);
        assert_eq!(fx.meeting().status, MeetingStatus::Closed);
        assert_eq!(fx.events.event_types(), vec!["meeting_status_changed"]);
    }

    #[tokio::test]
    async fn test_skipping_rejected() {
        let fx = Fixture::new(1);
        let err = lifecycle(&fx)
            .advance(MEETING, MeetingStatus::Archived)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::Transition(TransitionError::NotLinear {
                from: MeetingStatus::Live,
                to: MeetingStatus::Archived
            })
        );
        assert_eq!(err.code(), "invalid_transition");
    }

    #[tokio::test]
    async fn test_validation_requires_readiness() {
        let fx = Fixture::new(1);
        let uc = lifecycle(&fx);
        uc.advance(MEETING, MeetingStatus::Closed).await.unwrap();

        let err = uc
            .advance(MEETING, MeetingStatus::Validated)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::NotReady {
                meeting: MEETING,
                violations: vec!["open_motions", "missing_president"],
            }
        );

        settle(&fx);
        uc.record_president(MEETING, "  Ada Lovelace ").await.unwrap();
        let meeting = uc.advance(MEETING, MeetingStatus::Validated).await.unwrap();
        assert_eq!(meeting.validated_at, Some(at()));
        assert_eq!(meeting.president.as_deref(), Some("Ada Lovelace"));
        assert!(fx.meeting().is_validated());
    }

    #[tokio::test]
    async fn test_president_rules() {
        let fx = Fixture::new(1);
        let uc = lifecycle(&fx);
        assert_eq!(
            uc.record_president(MEETING, "   ").await.unwrap_err(),
            LifecycleError::EmptyPresident
        );

        fx.update_meeting(|m| m.validated_at = Some(at()));
        let err = uc.record_president(MEETING, "Chair").await.unwrap_err();
        assert_eq!(err.code(), "meeting_validated");
    }
}
