//! Domain layer for assembly-vote
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Ballots and proxies
//!
//! A member casts one [`Ballot`] per motion, in person, remotely, or through
//! a proxy holder authorized by a [`ProxyDelegation`]. Ballot weights are
//! frozen at cast time.
//!
//! ## Quorum and majority
//!
//! - **Quorum**: minimum participation for the vote to be valid
//!   ([`QuorumResolver`])
//! - **Majority**: share of `for` votes over a configurable base
//!   ([`MajorityResolver`])
//!
//! Both return a tri-state [`Verdict`]: a missing policy is "not applied",
//! never "met".
//!
//! ## Official results
//!
//! [`MotionResult::evaluate`] composes source selection (manual tally vs
//! electronic ballots), quorum, majority, and the final [`Decision`].

pub mod ballot;
pub mod core;
pub mod event;
pub mod majority;
pub mod meeting;
pub mod member;
pub mod motion;
pub mod policy;
pub mod proxy;
pub mod quorum;
pub mod readiness;
pub mod result;
pub mod tally;

// Re-export commonly used types
pub use ballot::{Ballot, PresenceMode, VoteChoice};
pub use core::{
    error::DomainError,
    ids::{AgendaItemId, MeetingId, MemberId, MotionId, QuorumPolicyId, TenantId, VotePolicyId},
    verdict::Verdict,
};
pub use event::DomainEvent;
pub use majority::{MajorityContext, MajorityOutcome, MajorityResolver};
pub use meeting::{Convocation, Meeting, MeetingStatus, TransitionError};
pub use member::{Member, Roster};
pub use motion::{ManualTally, Motion, MotionState, closed_order};
pub use policy::{MajorityBase, QuorumBasis, QuorumCondition, QuorumMode, QuorumPolicy, VotePolicy};
pub use proxy::{DelegationBook, DelegationViolation, ProxyDelegation};
pub use quorum::{ConditionCheck, QuorumContext, QuorumOutcome, QuorumResolver};
pub use readiness::{ReadinessDiff, ReadinessFacts, ReadinessReport, ReadinessViolation};
pub use result::{Decision, MotionResult, OfficialResult, ResultInputs, ResultSource};
pub use tally::{ChoiceTally, MotionTally, Participation, PresenceBreakdown, TallyAggregator};
