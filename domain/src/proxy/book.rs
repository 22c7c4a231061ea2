//! Delegation rules over a snapshot of active delegations
//!
//! A [`DelegationBook`] is built from the active delegations of one meeting
//! and decides whether a new delegation may be admitted. Stores build it and
//! apply the write under the same lock or transaction, so two concurrent
//! requests cannot jointly exceed the per-receiver cap.
//!
//! Rules:
//! - a member cannot delegate to themselves;
//! - no two-hop chains: the receiver must not be delegating, and the giver
//!   must not be holding delegations;
//! - a receiver holds at most `cap` active delegations;
//! - delegating again replaces the giver's previous delegation.

use super::delegation::ProxyDelegation;
use crate::core::ids::{MeetingId, MemberId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Why a delegation was refused
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum DelegationViolation {
    #[error("A member cannot delegate their vote to themselves")]
    SelfDelegation,

    #[error("{receiver} has delegated their own vote and cannot hold proxies")]
    ReceiverDelegates { receiver: MemberId },

    #[error("{giver} holds proxies from other members and cannot delegate")]
    GiverHoldsProxies { giver: MemberId },

    #[error("{receiver} already holds {held} proxies (limit {cap})")]
    CapReached {
        receiver: MemberId,
        held: u32,
        cap: u32,
    },
}

impl DelegationViolation {
    /// Stable code for callers
    pub fn code(&self) -> &'static str {
        match self {
            DelegationViolation::SelfDelegation => "self_delegation",
            DelegationViolation::ReceiverDelegates { .. }
            | DelegationViolation::GiverHoldsProxies { .. } => "proxy_chain",
            DelegationViolation::CapReached { .. } => "proxy_cap_reached",
        }
    }
}

/// Active delegations of one meeting, indexed both ways
#[derive(Debug, Clone)]
pub struct DelegationBook {
    meeting: MeetingId,
    /// giver → receiver
    forward: HashMap<MemberId, MemberId>,
    /// receiver → givers
    reverse: HashMap<MemberId, HashSet<MemberId>>,
}

impl DelegationBook {
    /// Index the active delegations of `meeting`; other rows are skipped.
    pub fn new<'a>(
        meeting: MeetingId,
        delegations: impl IntoIterator<Item = &'a ProxyDelegation>,
    ) -> Self {
        let mut book = Self {
            meeting,
            forward: HashMap::new(),
            reverse: HashMap::new(),
        };
        for d in delegations {
            if d.meeting == meeting && d.is_active() {
                book.insert(d.giver, d.receiver);
            }
        }
        book
    }

    pub fn meeting(&self) -> MeetingId {
        self.meeting
    }

    fn insert(&mut self, giver: MemberId, receiver: MemberId) {
        self.remove(giver);
        self.forward.insert(giver, receiver);
        self.reverse.entry(receiver).or_default().insert(giver);
    }

    fn remove(&mut self, giver: MemberId) {
        if let Some(old) = self.forward.remove(&giver)
            && let Some(set) = self.reverse.get_mut(&old)
        {
            set.remove(&giver);
            if set.is_empty() {
                self.reverse.remove(&old);
            }
        }
    }

    /// Current receiver of `giver`'s delegation
    pub fn receiver_of(&self, giver: MemberId) -> Option<MemberId> {
        self.forward.get(&giver).copied()
    }

    pub fn authorizes(&self, giver: MemberId, receiver: MemberId) -> bool {
        self.receiver_of(giver) == Some(receiver)
    }

    pub fn is_giver(&self, member: MemberId) -> bool {
        self.forward.contains_key(&member)
    }

    /// Number of active delegations pointing at `receiver`
    pub fn held_by(&self, receiver: MemberId) -> u32 {
        self.reverse
            .get(&receiver)
            .map(|set| set.len() as u32)
            .unwrap_or(0)
    }

    /// Check every rule for `giver → receiver`.
    ///
    /// The giver's existing delegation is being replaced, so it does not
    /// count against the cap.
    pub fn check(
        &self,
        giver: MemberId,
        receiver: MemberId,
        cap: Option<u32>,
    ) -> Result<(), DelegationViolation> {
        if giver == receiver {
            return Err(DelegationViolation::SelfDelegation);
        }
        if self.is_giver(receiver) {
            return Err(DelegationViolation::ReceiverDelegates { receiver });
        }
        if self.held_by(giver) > 0 {
            return Err(DelegationViolation::GiverHoldsProxies { giver });
        }
        if let Some(cap) = cap {
            let mut held = self.held_by(receiver);
            if self.authorizes(giver, receiver) {
                held = held.saturating_sub(1);
            }
            if held >= cap {
                return Err(DelegationViolation::CapReached { receiver, held, cap });
            }
        }
        Ok(())
    }

    /// Check and record `giver → receiver`, replacing any prior delegation.
    ///
    /// Returns the receiver that was replaced, if any.
    pub fn admit(
        &mut self,
        giver: MemberId,
        receiver: MemberId,
        cap: Option<u32>,
    ) -> Result<Option<MemberId>, DelegationViolation> {
        self.check(giver, receiver, cap)?;
        let previous = self.receiver_of(giver);
        self.insert(giver, receiver);
        Ok(previous)
    }

    pub fn revoke(&mut self, giver: MemberId) -> Option<MemberId> {
        let previous = self.receiver_of(giver);
        self.remove(giver);
        previous
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}
