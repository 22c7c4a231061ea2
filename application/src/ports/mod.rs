//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod attendance;
pub mod clock;
pub mod event_sink;
pub mod proxy_store;
pub mod store;

use std::sync::Arc;

use attendance::Attendance;
use clock::Clock;
use event_sink::EventSink;
use proxy_store::ProxyStore;
use store::{
    BallotReader, BallotWriter, MeetingReader, MeetingWriter, MemberDirectory, MotionReader,
    MotionWriter, PolicyReader,
};

/// Adapters wired by the caller
///
/// Use cases pick the ports they depend on from this bundle.
#[derive(Clone)]
pub struct EnginePorts {
    pub meetings: Arc<dyn MeetingReader>,
    pub meeting_writer: Arc<dyn MeetingWriter>,
    pub motions: Arc<dyn MotionReader>,
    pub motion_writer: Arc<dyn MotionWriter>,
    pub members: Arc<dyn MemberDirectory>,
    pub ballots: Arc<dyn BallotReader>,
    pub ballot_writer: Arc<dyn BallotWriter>,
    pub policies: Arc<dyn PolicyReader>,
    pub attendance: Arc<dyn Attendance>,
    pub proxies: Arc<dyn ProxyStore>,
    pub events: Arc<dyn EventSink>,
    pub clock: Arc<dyn Clock>,
}

impl EnginePorts {
    /// Wire every store port to one adapter.
    pub fn from_store<S>(store: Arc<S>, events: Arc<dyn EventSink>, clock: Arc<dyn Clock>) -> Self
    where
        S: MeetingReader
            + MeetingWriter
            + MotionReader
            + MotionWriter
            + MemberDirectory
            + BallotReader
            + BallotWriter
            + PolicyReader
            + Attendance
            + ProxyStore
            + 'static,
    {
        Self {
            meetings: store.clone(),
            meeting_writer: store.clone(),
            motions: store.clone(),
            motion_writer: store.clone(),
            members: store.clone(),
            ballots: store.clone(),
            ballot_writer: store.clone(),
            policies: store.clone(),
            attendance: store.clone(),
            proxies: store,
            events,
            clock,
        }
    }
}
