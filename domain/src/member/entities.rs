//! Members and the eligible roster

use crate::core::error::DomainError;
use crate::core::ids::{MemberId, TenantId};
use serde::{Deserialize, Serialize};

fn default_weight() -> f64 {
    1.0
}

fn default_active() -> bool {
    true
}

/// A person entitled to vote within a tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub tenant: TenantId,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Voting power (non-negative)
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl Member {
    pub fn new(id: MemberId, tenant: TenantId, name: impl Into<String>) -> Self {
        Self {
            id,
            tenant,
            name: name.into(),
            active: true,
            weight: default_weight(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Result<Self, DomainError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(DomainError::InvalidWeight(weight));
        }
        self.weight = weight;
        Ok(self)
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Weight frozen onto a ballot; malformed stored weights count as zero.
    pub fn voting_weight(&self) -> f64 {
        if self.weight.is_finite() && self.weight > 0.0 {
            self.weight
        } else {
            0.0
        }
    }
}

/// Active-member head count and summed weight of a tenant
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Roster {
    pub members: u64,
    pub weight: f64,
}

impl Roster {
    pub fn new(members: u64, weight: f64) -> Self {
        Self { members, weight }
    }

    /// Count only the active members of `tenant`.
    pub fn of_tenant<'a>(tenant: TenantId, members: impl IntoIterator<Item = &'a Member>) -> Self {
        members
            .into_iter()
            .filter(|m| m.tenant == tenant && m.active)
            .fold(Roster::default(), |acc, m| Roster {
                members: acc.members + 1,
                weight: acc.weight + m.voting_weight(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weight_is_one() {
        let m = Member::new(MemberId::new(1), TenantId::new(1), "Ada");
        assert_eq!(m.weight, 1.0);
        assert!(m.active);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let m = Member::new(MemberId::new(1), TenantId::new(1), "Ada");
        assert_eq!(
            m.with_weight(-1.0).unwrap_err(),
            DomainError::InvalidWeight(-1.0)
        );
    }

    #[test]
    fn test_roster_counts_active_members_of_tenant() {
        let members = vec![
            Member::new(MemberId::new(1), TenantId::new(1), "a")
                .with_weight(2.0)
                .unwrap(),
            Member::new(MemberId::new(2), TenantId::new(1), "b"),
            Member::new(MemberId::new(3), TenantId::new(1), "c").inactive(),
            Member::new(MemberId::new(4), TenantId::new(2), "d"),
        ];
        let roster = Roster::of_tenant(TenantId::new(1), &members);
        assert_eq!(roster.members, 2);
        assert_eq!(roster.weight, 3.0);
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let m: Member = serde_json::from_str(r#"{"id":1,"tenant":1,"name":"x"}"#).unwrap();
        assert!(m.active);
        assert_eq!(m.weight, 1.0);
    }
}
