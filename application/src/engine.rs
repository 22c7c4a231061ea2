//! Engine wiring
//!
//! Builds every use case over one set of ports, sharing the per-motion
//! locks so ballots, closing and consolidation of a motion serialise.

use crate::config::EngineConfig;
use crate::ports::EnginePorts;
use crate::use_cases::cast_ballot::CastBallotUseCase;
use crate::use_cases::compute_result::ComputeResultUseCase;
use crate::use_cases::consolidate::ConsolidateUseCase;
use crate::use_cases::meeting_lifecycle::MeetingLifecycleUseCase;
use crate::use_cases::motion_lifecycle::MotionLifecycleUseCase;
use crate::use_cases::motion_locks::MotionLocks;
use crate::use_cases::proxy_registry::ProxyRegistryUseCase;
use crate::use_cases::readiness::{EvaluateReadinessUseCase, ReadinessTracker};
use std::sync::Arc;

pub struct Engine {
    pub ballots: CastBallotUseCase,
    pub proxies: ProxyRegistryUseCase,
    pub results: Arc<ComputeResultUseCase>,
    pub consolidation: Arc<ConsolidateUseCase>,
    pub readiness: Arc<EvaluateReadinessUseCase>,
    pub tracker: ReadinessTracker,
    pub motions: MotionLifecycleUseCase,
    pub meetings: MeetingLifecycleUseCase,
}

impl Engine {
    pub fn new(ports: &EnginePorts, config: &EngineConfig) -> Self {
        let locks = MotionLocks::new();
        let results = Arc::new(ComputeResultUseCase::new(ports));
        let consolidation = Arc::new(ConsolidateUseCase::new(
            ports,
            results.clone(),
            locks.clone(),
            config.consolidation.clone(),
        ));
        let readiness = Arc::new(EvaluateReadinessUseCase::new(ports));

        Self {
            ballots: CastBallotUseCase::new(ports, locks.clone()),
            proxies: ProxyRegistryUseCase::new(ports, config.proxy.clone()),
            tracker: ReadinessTracker::new(ports, readiness.clone()),
            motions: MotionLifecycleUseCase::new(
                ports,
                locks,
                consolidation.clone(),
                config.consolidation.auto_on_close,
            ),
            meetings: MeetingLifecycleUseCase::new(ports, readiness.clone()),
            results,
            consolidation,
            readiness,
        }
    }
}
