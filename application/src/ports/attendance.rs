//! Attendance collaborator port

use super::store::StoreError;
use async_trait::async_trait;
use assembly_domain::{MeetingId, MemberId, PresenceMode};

/// Who attends a meeting, and how
///
/// Attendance is recorded outside the engine; the engine only reads it.
#[async_trait]
pub trait Attendance: Send + Sync {
    /// Recorded presence of the member, `None` when absent
    async fn presence(
        &self,
        meeting: MeetingId,
        member: MemberId,
    ) -> Result<Option<PresenceMode>, StoreError>;

    async fn attendees(&self, meeting: MeetingId)
    -> Result<Vec<(MemberId, PresenceMode)>, StoreError>;

    /// Present in the room or remotely
    async fn is_present_direct(
        &self,
        meeting: MeetingId,
        member: MemberId,
    ) -> Result<bool, StoreError> {
        Ok(self
            .presence(meeting, member)
            .await?
            .is_some_and(|mode| mode.is_direct()))
    }

    /// Present in any mode, proxy representation included
    async fn is_present(&self, meeting: MeetingId, member: MemberId) -> Result<bool, StoreError> {
        Ok(self.presence(meeting, member).await?.is_some())
    }
}
