//! Proxy delegation store port

use super::store::StoreError;
use async_trait::async_trait;
use assembly_domain::{DelegationViolation, MeetingId, MemberId, ProxyDelegation};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyStoreError {
    #[error(transparent)]
    Rejected(#[from] DelegationViolation),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Persistence of delegations
///
/// `admit` must check the delegation rules (see
/// [`assembly_domain::DelegationBook`]) and write the row in one atomic
/// step: two concurrent calls must not jointly exceed the cap.
#[async_trait]
pub trait ProxyStore: Send + Sync {
    /// Check and record `delegation`, revoking the giver's previous one.
    ///
    /// Returns the receiver whose delegation was replaced, if any.
    async fn admit(
        &self,
        delegation: ProxyDelegation,
        cap: Option<u32>,
    ) -> Result<Option<MemberId>, ProxyStoreError>;

    /// Revoke the giver's active delegation; returns the revoked row.
    async fn revoke(
        &self,
        meeting: MeetingId,
        giver: MemberId,
        at: DateTime<Utc>,
    ) -> Result<Option<ProxyDelegation>, StoreError>;

    async fn active_delegation(
        &self,
        meeting: MeetingId,
        giver: MemberId,
    ) -> Result<Option<ProxyDelegation>, StoreError>;

    /// All rows of the meeting, revoked ones included
    async fn delegations(&self, meeting: MeetingId) -> Result<Vec<ProxyDelegation>, StoreError>;
}
