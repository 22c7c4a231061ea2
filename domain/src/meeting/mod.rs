//! Meetings: the assembly a motion belongs to

pub mod entities;

pub use entities::{Convocation, Meeting, MeetingStatus, TransitionError};
