//! Ballot tallies

pub mod aggregator;

pub use aggregator::{ChoiceTally, MotionTally, Participation, PresenceBreakdown, TallyAggregator};
