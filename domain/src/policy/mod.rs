//! Quorum and vote policies
//!
//! Policies are read-only records here. A motion-level policy overrides the
//! meeting-level default (see [`crate::motion::Motion::effective_quorum_policy`]).

pub mod quorum_policy;
pub mod vote_policy;

pub use quorum_policy::{QuorumBasis, QuorumCondition, QuorumMode, QuorumPolicy};
pub use vote_policy::{MajorityBase, VotePolicy};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::{QuorumPolicyId, VotePolicyId};

    #[test]
    fn test_thresholds_are_clamped() {
        let q = QuorumPolicy::single(QuorumPolicyId::new(1), QuorumBasis::EligibleMembers, 1.4);
        assert_eq!(q.primary.threshold, 1.0);
        let v = VotePolicy::new(VotePolicyId::new(1), MajorityBase::Expressed, -0.1);
        assert_eq!(v.threshold, 0.0);
    }

    #[test]
    fn test_quorum_policy_from_json_defaults() {
        let q: QuorumPolicy = serde_json::from_str(
            r#"{"id":1,"primary":{"basis":"eligible_weight","threshold":0.25}}"#,
        )
        .unwrap();
        assert_eq!(q.mode, QuorumMode::Single);
        assert_eq!(q.primary.basis, QuorumBasis::EligibleWeight);
        assert!(q.include_proxy);
        assert!(q.include_remote);
        assert!(q.secondary.is_none());
    }

    #[test]
    fn test_vote_policy_from_json_defaults() {
        let v: VotePolicy = serde_json::from_str(r#"{"id":2,"threshold":0.66}"#).unwrap();
        assert_eq!(v.base, MajorityBase::Expressed);
        assert!(v.abstention_as_against);
    }

    #[test]
    fn test_evolving_constructor() {
        let q = QuorumPolicy::evolving(QuorumPolicyId::new(1), QuorumBasis::EligibleMembers, 0.5, 0.25);
        assert_eq!(q.mode, QuorumMode::Evolving);
        assert_eq!(q.second_convocation_threshold, Some(0.25));
    }
}
