//! Official result consolidation use case
//!
//! Persists one official result per closed motion, overwriting any earlier
//! one. Re-running on unchanged inputs keeps the previous `decided_at`, so
//! the persisted record is identical.

use super::compute_result::{ComputeResultUseCase, ResultError};
use super::motion_locks::MotionLocks;
use crate::config::ConsolidationConfig;
use crate::ports::EnginePorts;
use crate::ports::clock::Clock;
use crate::ports::event_sink::EventSink;
use crate::ports::store::{MotionReader, MotionWriter};
use assembly_domain::{
    DomainEvent, MeetingId, MotionId, MotionResult, OfficialResult, closed_order,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidateOutput {
    pub result: MotionResult,
    pub official: OfficialResult,
    /// False when the persisted outcome was already identical
    pub changed: bool,
}

/// Outcome of a meeting-wide run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeetingConsolidation {
    /// Closed motions whose official result was written
    pub consolidated: usize,
    /// Closed motions that could not be consolidated
    pub failed: Vec<(MotionId, String)>,
    /// Motions skipped because they are not closed
    pub skipped: usize,
}

pub struct ConsolidateUseCase {
    compute: Arc<ComputeResultUseCase>,
    motions: Arc<dyn MotionReader>,
    motion_writer: Arc<dyn MotionWriter>,
    events: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    locks: MotionLocks,
    config: ConsolidationConfig,
}

impl ConsolidateUseCase {
    pub fn new(
        ports: &EnginePorts,
        compute: Arc<ComputeResultUseCase>,
        locks: MotionLocks,
        config: ConsolidationConfig,
    ) -> Self {
        Self {
            compute,
            motions: ports.motions.clone(),
            motion_writer: ports.motion_writer.clone(),
            events: ports.events.clone(),
            clock: ports.clock.clone(),
            locks,
            config,
        }
    }

    pub async fn consolidate_motion(&self, motion: MotionId) -> Result<ConsolidateOutput, ResultError> {
        let _guard = if self.config.lock_motion {
            Some(self.locks.lock(motion).await)
        } else {
            None
        };

        let mut motion = self.compute.load_motion(motion).await?;
        let meeting = self.compute.load_meeting(motion.meeting).await?;
        if meeting.is_validated() {
            return Err(ResultError::MeetingValidated(meeting.id));
        }
        if !motion.is_closed() {
            return Err(ResultError::MotionNotClosed {
                motion: motion.id,
                state: motion.state(),
            });
        }

        let result = self.compute.evaluate(&motion, &meeting).await?;
        let now = self.clock.now();
        let mut official = result.to_official(now);
        let changed = match &motion.official {
            Some(previous) if previous.same_outcome(&official) => {
                official.decided_at = previous.decided_at;
                false
            }
            _ => true,
        };

        motion.official = Some(official.clone());
        self.motion_writer.save_motion(&motion).await?;

        self.events.publish(&DomainEvent::MotionConsolidated {
            meeting: meeting.id,
            motion: motion.id,
            source: official.source,
            decision: official.decision,
            changed,
            at: now,
        });
        info!(
            motion = %motion.id,
            source = %official.source,
            decision = %official.decision,
            changed,
            "Motion consolidated"
        );

        Ok(ConsolidateOutput {
            result,
            official,
            changed,
        })
    }

    /// Consolidate every closed motion of the meeting, in close order.
    ///
    /// Motions are independent: one failure is logged and the run goes on.
    pub async fn consolidate_meeting(
        &self,
        meeting: MeetingId,
    ) -> Result<MeetingConsolidation, ResultError> {
        let record = self.compute.load_meeting(meeting).await?;
        if record.is_validated() {
            return Err(ResultError::MeetingValidated(meeting));
        }

        let mut motions = self.motions.motions_for_meeting(meeting).await?;
        motions.sort_by(closed_order);

        let mut outcome = MeetingConsolidation::default();
        for motion in motions {
            if !motion.is_closed() {
                outcome.skipped += 1;
                continue;
            }
            match self.consolidate_motion(motion.id).await {
                Ok(_) => outcome.consolidated += 1,
                Err(err) => {
                    warn!(motion = %motion.id, error = %err, "Consolidation failed, skipping");
                    outcome.failed.push((motion.id, err.to_string()));
                }
            }
        }

        self.events.publish(&DomainEvent::MeetingConsolidated {
            meeting,
            consolidated: outcome.consolidated,
            failed: outcome.failed.len(),
            at: self.clock.now(),
        });
        info!(
            meeting = %meeting,
            consolidated = outcome.consolidated,
            failed = outcome.failed.len(),
            skipped = outcome.skipped,
            "Meeting consolidated"
        );
        Ok(outcome)
    }
}
