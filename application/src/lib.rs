//! Application layer for assembly-vote
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod engine;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ConsolidationConfig, EngineConfig, ProxyConfig};
pub use engine::Engine;
pub use ports::{
    EnginePorts,
    attendance::Attendance,
    clock::{Clock, FixedClock},
    event_sink::{CollectingEventSink, EventSink, NoEventSink},
    proxy_store::{ProxyStore, ProxyStoreError},
    store::{
        BallotReader, BallotWrite, BallotWriter, MeetingReader, MeetingWriter, MemberDirectory,
        MotionReader, MotionWriter, PolicyReader, StoreError,
    },
};
pub use use_cases::cast_ballot::{
    CastBallotError, CastBallotInput, CastBallotOutput, CastBallotUseCase,
};
pub use use_cases::compute_result::{ComputeResultUseCase, ResultError};
pub use use_cases::consolidate::{ConsolidateOutput, ConsolidateUseCase, MeetingConsolidation};
pub use use_cases::meeting_lifecycle::MeetingLifecycleUseCase;
pub use use_cases::motion_lifecycle::{CloseOutput, LifecycleError, MotionLifecycleUseCase};
pub use use_cases::motion_locks::MotionLocks;
pub use use_cases::proxy_registry::{DelegateOutput, ProxyError, ProxyRegistryUseCase};
pub use use_cases::readiness::{EvaluateReadinessUseCase, ReadinessError, ReadinessTracker};
