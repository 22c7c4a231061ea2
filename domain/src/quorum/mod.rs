//! Quorum domain
//!
//! Quorum is the minimum participation (head count or weight) required for
//! the vote on a motion to be valid.
//!
//! # Policy shapes
//!
//! ```text
//! ┌──────────┬──────────────────────────────────────────────────────┐
//! │ single   │ ratio(primary basis) >= threshold                    │
//! │ evolving │ as single; 2nd convocation uses the alternate bar    │
//! │ double   │ primary AND secondary; missing secondary => not met  │
//! └──────────┴──────────────────────────────────────────────────────┘
//! ```
//!
//! The numerator is the expressed participation restricted to the presence
//! modes the policy counts (in-room always, remote and proxy optionally).

pub mod resolver;

pub use resolver::{ConditionCheck, QuorumContext, QuorumOutcome, QuorumResolver};
