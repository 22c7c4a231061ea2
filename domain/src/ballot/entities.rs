//! Ballot entity

use super::choice::{PresenceMode, VoteChoice};
use crate::core::error::DomainError;
use crate::core::ids::{MemberId, MotionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One member's vote on one motion
///
/// At most one ballot exists per `(motion, member)`; casting again replaces
/// the choice in place. `member` is always the member whose voting power the
/// ballot carries: for a proxy ballot that is the delegating member, and
/// `proxy_voter` names the delegate who actually cast it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ballot {
    pub motion: MotionId,
    pub member: MemberId,
    pub choice: VoteChoice,
    /// Frozen at cast time
    pub weight: f64,
    pub proxy: bool,
    #[serde(default)]
    pub proxy_voter: Option<MemberId>,
    /// Mode under which the ballot was cast, frozen at cast time
    pub presence: PresenceMode,
    pub cast_at: DateTime<Utc>,
}

impl Ballot {
    /// Ballot cast by the member in person or remotely.
    pub fn direct(
        motion: MotionId,
        member: MemberId,
        choice: VoteChoice,
        weight: f64,
        presence: PresenceMode,
        cast_at: DateTime<Utc>,
    ) -> Self {
        let presence = if presence.is_direct() {
            presence
        } else {
            PresenceMode::Present
        };
        Self {
            motion,
            member,
            choice,
            weight,
            proxy: false,
            proxy_voter: None,
            presence,
            cast_at,
        }
    }

    /// Ballot cast by `proxy_voter` on behalf of `member`.
    pub fn by_proxy(
        motion: MotionId,
        member: MemberId,
        proxy_voter: MemberId,
        choice: VoteChoice,
        weight: f64,
        cast_at: DateTime<Utc>,
    ) -> Self {
        Self {
            motion,
            member,
            choice,
            weight,
            proxy: true,
            proxy_voter: Some(proxy_voter),
            presence: PresenceMode::Proxy,
            cast_at,
        }
    }

    /// Check that the proxy flag and the proxy voter agree.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.proxy != self.proxy_voter.is_some() {
            return Err(DomainError::ProxyVoterMissing);
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(DomainError::InvalidWeight(self.weight));
        }
        Ok(())
    }
}
