//! Strongly-typed identifiers
//!
//! Every record is addressed by a newtype over `u64` so a motion id can never
//! be passed where a member id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }
    };
}

define_id!(
    /// Organisation owning members and meetings
    TenantId,
    "tenant"
);
define_id!(
    /// A convened assembly
    MeetingId,
    "meeting"
);
define_id!(
    /// A question put to the vote within a meeting
    MotionId,
    "motion"
);
define_id!(
    /// A person entitled to vote within a tenant
    MemberId,
    "member"
);
define_id!(AgendaItemId, "agenda");
define_id!(QuorumPolicyId, "quorum-policy");
define_id!(VotePolicyId, "vote-policy");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_label() {
        assert_eq!(MotionId::new(12).to_string(), "motion#12");
        assert_eq!(MemberId::from(3).to_string(), "member#3");
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&MeetingId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: MeetingId = serde_json::from_str("7").unwrap();
        assert_eq!(back.get(), 7);
    }
}
