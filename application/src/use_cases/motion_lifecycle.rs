//! Motion lifecycle use case
//!
//! Opening and closing motions, and recording the secretary's hand count.
//! Closing consolidates the motion when `consolidation.auto_on_close` is set.

use super::consolidate::{ConsolidateOutput, ConsolidateUseCase};
use super::motion_locks::MotionLocks;
use super::readiness::ReadinessError;
use crate::ports::EnginePorts;
use crate::ports::clock::Clock;
use crate::ports::event_sink::EventSink;
use crate::ports::store::{MeetingReader, MotionReader, MotionWriter, StoreError};
use assembly_domain::{
    DomainError, DomainEvent, ManualTally, Meeting, MeetingId, MeetingStatus, Motion, MotionId,
    TransitionError,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors of the motion and meeting lifecycle use cases
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifecycleError {
    #[error("{0} not found")]
    MotionNotFound(MotionId),

    #[error("{0} not found")]
    MeetingNotFound(MeetingId),

    #[error("{0} is validated; no further changes are accepted")]
    MeetingValidated(MeetingId),

    #[error("{meeting} is {status}; motions can only be opened while it is live")]
    MeetingNotLive {
        meeting: MeetingId,
        status: MeetingStatus,
    },

    #[error("{motion}: {source}")]
    Motion {
        motion: MotionId,
        source: DomainError,
    },

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("{meeting} cannot be validated yet: {}", .violations.join(", "))]
    NotReady {
        meeting: MeetingId,
        violations: Vec<&'static str>,
    },

    #[error("President name must not be empty")]
    EmptyPresident,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LifecycleError {
    pub fn code(&self) -> &'static str {
        match self {
            LifecycleError::MotionNotFound(_) => "motion_not_found",
            LifecycleError::MeetingNotFound(_) => "meeting_not_found",
            LifecycleError::MeetingValidated(_) => "meeting_validated",
            LifecycleError::MeetingNotLive { .. } => "meeting_not_live",
            LifecycleError::Motion { source, .. } => match source {
                DomainError::MotionAlreadyOpened => "motion_already_opened",
                DomainError::MotionNotOpen => "motion_not_open",
                _ => "invalid_motion",
            },
            LifecycleError::Transition(_) => "invalid_transition",
            LifecycleError::NotReady { .. } => "not_ready",
            LifecycleError::EmptyPresident => "empty_president",
            LifecycleError::Store(_) => "store_error",
        }
    }
}

impl From<ReadinessError> for LifecycleError {
    fn from(err: ReadinessError) -> Self {
        match err {
            ReadinessError::MeetingNotFound(id) => LifecycleError::MeetingNotFound(id),
            ReadinessError::Store(err) => LifecycleError::Store(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseOutput {
    pub motion: Motion,
    /// Present when the motion was consolidated on close
    pub consolidation: Option<ConsolidateOutput>,
}

pub struct MotionLifecycleUseCase {
    meetings: Arc<dyn MeetingReader>,
    motions: Arc<dyn MotionReader>,
    motion_writer: Arc<dyn MotionWriter>,
    events: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    locks: MotionLocks,
    consolidator: Arc<ConsolidateUseCase>,
    auto_consolidate: bool,
}

impl MotionLifecycleUseCase {
    pub fn new(
        ports: &EnginePorts,
        locks: MotionLocks,
        consolidator: Arc<ConsolidateUseCase>,
        auto_consolidate: bool,
    ) -> Self {
        Self {
            meetings: ports.meetings.clone(),
            motions: ports.motions.clone(),
            motion_writer: ports.motion_writer.clone(),
            events: ports.events.clone(),
            clock: ports.clock.clone(),
            locks,
            consolidator,
            auto_consolidate,
        }
    }

    pub async fn open(&self, motion: MotionId) -> Result<Motion, LifecycleError> {
        let _guard = self.locks.lock(motion).await;
        let (mut motion, meeting) = self.load(motion).await?;
        if !meeting.is_live() {
            return Err(LifecycleError::MeetingNotLive {
                meeting: meeting.id,
                status: meeting.status,
            });
        }

        let now = self.clock.now();
        motion.open(now).map_err(|source| LifecycleError::Motion {
            motion: motion.id,
            source,
        })?;
        self.motion_writer.save_motion(&motion).await?;

        self.events.publish(&DomainEvent::MotionOpened {
            meeting: meeting.id,
            motion: motion.id,
            at: now,
        });
        info!(motion = %motion.id, meeting = %meeting.id, "Motion opened");
        Ok(motion)
    }

    pub async fn close(&self, motion: MotionId) -> Result<CloseOutput, LifecycleError> {
        let motion = {
            let _guard = self.locks.lock(motion).await;
            let (mut motion, meeting) = self.load(motion).await?;
            let now = self.clock.now();
            motion.close(now).map_err(|source| LifecycleError::Motion {
                motion: motion.id,
                source,
            })?;
            self.motion_writer.save_motion(&motion).await?;

            self.events.publish(&DomainEvent::MotionClosed {
                meeting: meeting.id,
                motion: motion.id,
                at: now,
            });
            info!(motion = %motion.id, meeting = %meeting.id, "Motion closed");
            motion
        };

        if !self.auto_consolidate {
            return Ok(CloseOutput {
                motion,
                consolidation: None,
            });
        }

        // The close is committed; a failed consolidation can be re-run.
        match self.consolidator.consolidate_motion(motion.id).await {
            Ok(output) => {
                let mut motion = motion;
                motion.official = Some(output.official.clone());
                Ok(CloseOutput {
                    motion,
                    consolidation: Some(output),
                })
            }
            Err(err) => {
                warn!(motion = %motion.id, error = %err, "Consolidation on close failed");
                Ok(CloseOutput {
                    motion,
                    consolidation: None,
                })
            }
        }
    }

    /// Store the hand count; returns whether it is consistent.
    ///
    /// An inconsistent tally is kept but ignored by consolidation. On a
    /// closed motion the official result is dropped and, with
    /// `auto_on_close`, recomputed from the new figures.
    pub async fn record_manual_tally(
        &self,
        motion: MotionId,
        tally: ManualTally,
    ) -> Result<bool, LifecycleError> {
        let (consistent, reconsolidate) = {
            let _guard = self.locks.lock(motion).await;
            let (mut motion, meeting) = self.load(motion).await?;

            let consistent = tally.is_consistent();
            if !consistent {
                warn!(
                    motion = %motion.id,
                    total = tally.total,
                    for_votes = tally.for_votes,
                    against = tally.against,
                    abstain = tally.abstain,
                    "Manual tally does not add up, electronic ballots stay authoritative"
                );
            }
            motion.manual_tally = Some(tally);
            let stale = Self::invalidate_official(&mut motion);
            self.motion_writer.save_motion(&motion).await?;

            self.events.publish(&DomainEvent::ManualTallyRecorded {
                meeting: meeting.id,
                motion: motion.id,
                consistent,
                at: self.clock.now(),
            });
            (consistent, stale)
        };

        if reconsolidate {
            self.reconsolidate(motion).await;
        }
        Ok(consistent)
    }

    /// Remove the hand count; returns whether one was set.
    pub async fn clear_manual_tally(&self, motion: MotionId) -> Result<bool, LifecycleError> {
        let (had, reconsolidate) = {
            let _guard = self.locks.lock(motion).await;
            let (mut motion, _) = self.load(motion).await?;
            let had = motion.manual_tally.take().is_some();
            let mut stale = false;
            if had {
                stale = Self::invalidate_official(&mut motion);
                self.motion_writer.save_motion(&motion).await?;
                info!(motion = %motion.id, "Manual tally cleared");
            }
            (had, stale)
        };

        if reconsolidate {
            self.reconsolidate(motion).await;
        }
        Ok(had)
    }

    /// Drop the official result of a closed motion whose inputs changed.
    /// Returns whether the motion needs consolidating again.
    fn invalidate_official(motion: &mut Motion) -> bool {
        if !motion.is_closed() {
            return false;
        }
        if motion.official.take().is_some() {
            info!(motion = %motion.id, "Official result invalidated by manual tally change");
        }
        true
    }

    /// Without auto consolidation, or on failure, the motion is left
    /// unconsolidated and readiness reports it.
    async fn reconsolidate(&self, motion: MotionId) {
        if !self.auto_consolidate {
            return;
        }
        if let Err(err) = self.consolidator.consolidate_motion(motion).await {
            warn!(motion = %motion, error = %err, "Consolidation after manual tally change failed");
        }
    }

    /// Motion and its non-validated meeting
    async fn load(&self, id: MotionId) -> Result<(Motion, Meeting), LifecycleError> {
        let motion = self
            .motions
            .motion(id)
            .await?
            .ok_or(LifecycleError::MotionNotFound(id))?;
        let meeting = self
            .meetings
            .meeting(motion.meeting)
            .await?
            .ok_or(LifecycleError::MeetingNotFound(motion.meeting))?;
        if meeting.is_validated() {
            return Err(LifecycleError::MeetingValidated(meeting.id));
        }
        Ok((motion, meeting))
    }
}
