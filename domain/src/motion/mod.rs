//! Motions and their manual tallies

pub mod entities;
pub mod manual_tally;

pub use entities::{Motion, MotionState, closed_order};
pub use manual_tally::ManualTally;
