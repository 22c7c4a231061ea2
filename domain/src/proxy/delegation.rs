//! Proxy delegation record

use crate::core::ids::{MeetingId, MemberId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authorization for `receiver` to vote on behalf of `giver` in one meeting
///
/// Revocation stamps `revoked_at` instead of deleting the row, so the
/// delegation history of a meeting stays auditable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyDelegation {
    pub meeting: MeetingId,
    pub giver: MemberId,
    pub receiver: MemberId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub revoked_at: Option<DateTime<Utc>>,
}

impl ProxyDelegation {
    pub fn new(
        meeting: MeetingId,
        giver: MemberId,
        receiver: MemberId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            meeting,
            giver,
            receiver,
            created_at,
            revoked_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none()
    }

    pub fn revoke(&mut self, at: DateTime<Utc>) {
        if self.revoked_at.is_none() {
            self.revoked_at = Some(at.max(self.created_at));
        }
    }

    /// Active and pointing `giver` at `receiver` in `meeting`
    pub fn authorizes(&self, meeting: MeetingId, giver: MemberId, receiver: MemberId) -> bool {
        self.is_active() && self.meeting == meeting && self.giver == giver && self.receiver == receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_revoke_keeps_row() {
        let now = Utc::now();
        let mut d = ProxyDelegation::new(MeetingId::new(1), MemberId::new(1), MemberId::new(2), now);
        assert!(d.is_active());
        d.revoke(now + Duration::seconds(5));
        assert!(!d.is_active());

        let first = d.revoked_at;
        d.revoke(now + Duration::seconds(50));
        assert_eq!(d.revoked_at, first);
    }

    #[test]
    fn test_authorizes() {
        let d = ProxyDelegation::new(MeetingId::new(1), MemberId::new(1), MemberId::new(2), Utc::now());
        assert!(d.authorizes(MeetingId::new(1), MemberId::new(1), MemberId::new(2)));
        assert!(!d.authorizes(MeetingId::new(2), MemberId::new(1), MemberId::new(2)));
        assert!(!d.authorizes(MeetingId::new(1), MemberId::new(2), MemberId::new(1)));
    }
}
