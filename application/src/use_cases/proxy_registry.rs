//! Proxy delegation registry use case
//!
//! Owns "who may vote for whom" within a meeting. The rules themselves live
//! in [`assembly_domain::DelegationBook`]; the store applies them atomically
//! through [`ProxyStore::admit`].

use crate::config::ProxyConfig;
use crate::ports::EnginePorts;
use crate::ports::clock::Clock;
use crate::ports::event_sink::EventSink;
use crate::ports::proxy_store::{ProxyStore, ProxyStoreError};
use crate::ports::store::{MeetingReader, MemberDirectory, StoreError};
use assembly_domain::{
    DelegationViolation, DomainEvent, Meeting, MeetingId, MemberId, ProxyDelegation,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProxyError {
    #[error("{0} not found")]
    MeetingNotFound(MeetingId),

    #[error("{0} is validated; delegations are frozen")]
    MeetingValidated(MeetingId),

    #[error("{0} not found")]
    MemberNotFound(MemberId),

    #[error("{0} does not belong to the meeting's organisation")]
    ForeignTenant(MemberId),

    #[error(transparent)]
    Rejected(#[from] DelegationViolation),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProxyError {
    pub fn code(&self) -> &'static str {
        match self {
            ProxyError::MeetingNotFound(_) => "meeting_not_found",
            ProxyError::MeetingValidated(_) => "meeting_validated",
            ProxyError::MemberNotFound(_) => "member_not_found",
            ProxyError::ForeignTenant(_) => "foreign_tenant",
            ProxyError::Rejected(violation) => violation.code(),
            ProxyError::Store(_) => "store_error",
        }
    }
}

impl From<ProxyStoreError> for ProxyError {
    fn from(err: ProxyStoreError) -> Self {
        match err {
            ProxyStoreError::Rejected(violation) => ProxyError::Rejected(violation),
            ProxyStoreError::Store(err) => ProxyError::Store(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelegateOutput {
    pub delegation: ProxyDelegation,
    /// Receiver of the delegation this one replaced
    pub replaced: Option<MemberId>,
}

pub struct ProxyRegistryUseCase {
    meetings: Arc<dyn MeetingReader>,
    members: Arc<dyn MemberDirectory>,
    proxies: Arc<dyn ProxyStore>,
    events: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    config: ProxyConfig,
}

impl ProxyRegistryUseCase {
    pub fn new(ports: &EnginePorts, config: ProxyConfig) -> Self {
        Self {
            meetings: ports.meetings.clone(),
            members: ports.members.clone(),
            proxies: ports.proxies.clone(),
            events: ports.events.clone(),
            clock: ports.clock.clone(),
            config,
        }
    }

    /// Let `receiver` vote on behalf of `giver`, replacing any earlier
    /// delegation of the giver.
    pub async fn delegate(
        &self,
        meeting: MeetingId,
        giver: MemberId,
        receiver: MemberId,
    ) -> Result<DelegateOutput, ProxyError> {
        let meeting = self.open_meeting(meeting).await?;
        self.check_member(&meeting, giver).await?;
        self.check_member(&meeting, receiver).await?;

        let now = self.clock.now();
        let delegation = ProxyDelegation::new(meeting.id, giver, receiver, now);
        let replaced = self
            .proxies
            .admit(delegation.clone(), self.config.max_per_receiver)
            .await
            .map_err(|err| {
                if let ProxyStoreError::Rejected(violation) = &err {
                    warn!(
                        meeting = %meeting.id,
                        giver = %giver,
                        receiver = %receiver,
                        code = violation.code(),
                        "Delegation refused"
                    );
                }
                ProxyError::from(err)
            })?;

        self.events.publish(&DomainEvent::ProxyDelegated {
            meeting: meeting.id,
            giver,
            receiver,
            replaced_receiver: replaced,
            at: now,
        });
        info!(meeting = %meeting.id, giver = %giver, receiver = %receiver, "Proxy delegated");

        Ok(DelegateOutput {
            delegation,
            replaced,
        })
    }

    /// Revoke the giver's active delegation. Returns false when there was none.
    pub async fn revoke(&self, meeting: MeetingId, giver: MemberId) -> Result<bool, ProxyError> {
        let meeting = self.open_meeting(meeting).await?;
        let now = self.clock.now();
        let revoked = self.proxies.revoke(meeting.id, giver, now).await?;
        if revoked.is_some() {
            self.events.publish(&DomainEvent::ProxyRevoked {
                meeting: meeting.id,
                giver,
                at: now,
            });
            info!(meeting = %meeting.id, giver = %giver, "Proxy revoked");
        }
        Ok(revoked.is_some())
    }

    pub async fn has_active_proxy(
        &self,
        meeting: MeetingId,
        giver: MemberId,
        receiver: MemberId,
    ) -> Result<bool, StoreError> {
        Ok(self
            .proxies
            .active_delegation(meeting, giver)
            .await?
            .is_some_and(|d| d.authorizes(meeting, giver, receiver)))
    }

    /// Audit trail of the meeting, revoked delegations included
    pub async fn delegations(&self, meeting: MeetingId) -> Result<Vec<ProxyDelegation>, StoreError> {
        let mut rows = self.proxies.delegations(meeting).await?;
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.giver.cmp(&b.giver)));
        Ok(rows)
    }

    async fn open_meeting(&self, id: MeetingId) -> Result<Meeting, ProxyError> {
        let meeting = self
            .meetings
            .meeting(id)
            .await?
            .ok_or(ProxyError::MeetingNotFound(id))?;
        if meeting.is_validated() {
            return Err(ProxyError::MeetingValidated(id));
        }
        Ok(meeting)
    }

    async fn check_member(&self, meeting: &Meeting, id: MemberId) -> Result<(), ProxyError> {
        let member = self
            .members
            .member(id)
            .await?
            .ok_or(ProxyError::MemberNotFound(id))?;
        if member.tenant != meeting.tenant {
            return Err(ProxyError::ForeignTenant(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{Fixture, MEETING, at};

    fn registry(fx: &Fixture, cap: Option<u32>) -> ProxyRegistryUseCase {
        ProxyRegistryUseCase::new(
            &fx.ports,
            ProxyConfig {
                max_per_receiver: cap,
            },
        )
    }

    fn m(id: u64) -> MemberId {
        MemberId(id)
    }

    #[tokio::test]
    async fn test_delegate_and_query() {
        let fx = Fixture::new(3);
        let reg = registry(&fx, None);

        let output = reg.delegate(MEETING, m(1), m(2)).await.unwrap();
        assert_eq!(output.replaced, None);
        assert!(reg.has_active_proxy(MEETING, m(1), m(2)).await.unwrap());
        assert!(!reg.has_active_proxy(MEETING, m(1), m(3)).await.unwrap());
        assert_eq!(fx.events.event_types(), vec!["proxy_delegated"]);
    }

    #[tokio::test]
    async fn test_second_delegation_replaces_first() {
        let fx = Fixture::new(3);
        let reg = registry(&fx, None);

        reg.delegate(MEETING, m(1), m(2)).await.unwrap();
        let output = reg.delegate(MEETING, m(1), m(3)).await.unwrap();
        assert_eq!(output.replaced, Some(m(2)));

        let rows = reg.delegations(MEETING).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.iter().filter(|d| d.is_active()).count(), 1);
        assert!(reg.has_active_proxy(MEETING, m(1), m(3)).await.unwrap());
        assert!(!reg.has_active_proxy(MEETING, m(1), m(2)).await.unwrap());
    }

    #[tokio::test]
    async fn test_chain_rejected() {
        let fx = Fixture::new(3);
        let reg = registry(&fx, None);

        reg.delegate(MEETING, m(1), m(2)).await.unwrap();
        let err = reg.delegate(MEETING, m(2), m(3)).await.unwrap_err();
        assert_eq!(err.code(), "proxy_chain");

        let err = reg.delegate(MEETING, m(3), m(1)).await.unwrap_err();
        assert_eq!(
            err,
            ProxyError::Rejected(DelegationViolation::ReceiverDelegates { receiver: m(1) })
        );
    }

    #[tokio::test]
    async fn test_self_delegation_rejected() {
        let fx = Fixture::new(1);
        let err = registry(&fx, None)
            .delegate(MEETING, m(1), m(1))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "self_delegation");
        assert!(fx.events.events().is_empty());
    }

    #[tokio::test]
    async fn test_cap_enforced() {
        let fx = Fixture::new(4);
        let reg = registry(&fx, Some(2));

        reg.delegate(MEETING, m(1), m(4)).await.unwrap();
        reg.delegate(MEETING, m(2), m(4)).await.unwrap();
        let err = reg.delegate(MEETING, m(3), m(4)).await.unwrap_err();
        assert_eq!(err.code(), "proxy_cap_reached");

        // re-delegating to the same receiver does not count twice
        reg.delegate(MEETING, m(1), m(4)).await.unwrap();
    }

    #[tokio::test]
    async fn test_revoke() {
        let fx = Fixture::new(2);
        let reg = registry(&fx, None);

        reg.delegate(MEETING, m(1), m(2)).await.unwrap();
        assert!(reg.revoke(MEETING, m(1)).await.unwrap());
        assert!(!reg.revoke(MEETING, m(1)).await.unwrap());
        assert!(!reg.has_active_proxy(MEETING, m(1), m(2)).await.unwrap());

        let rows = reg.delegations(MEETING).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].revoked_at.is_some());
        assert_eq!(
            fx.events.event_types(),
            vec!["proxy_delegated", "proxy_revoked"]
        );
    }

    #[tokio::test]
    async fn test_validated_meeting_frozen() {
        let fx = Fixture::new(2);
        fx.update_meeting(|meeting| meeting.validated_at = Some(at()));
        let err = registry(&fx, None)
            .delegate(MEETING, m(1), m(2))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "meeting_validated");
    }

    #[tokio::test]
    async fn test_unknown_member() {
        let fx = Fixture::new(1);
        let err = registry(&fx, None)
            .delegate(MEETING, m(1), m(9))
            .await
            .unwrap_err();
        assert_eq!(err, ProxyError::MemberNotFound(m(9)));
    }
}
