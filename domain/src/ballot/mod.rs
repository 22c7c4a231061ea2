//! Ballots, vote choices and presence modes

pub mod choice;
pub mod entities;

pub use choice::{PresenceMode, VoteChoice};
pub use entities::Ballot;
