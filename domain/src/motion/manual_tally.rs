//! Hand-counted tallies entered by the secretary

use serde::{Deserialize, Serialize};

/// A manual count of a show-of-hands or paper vote
///
/// Manual entry records figures only, never voter identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManualTally {
    pub total: u64,
    #[serde(rename = "for")]
    pub for_votes: u64,
    pub against: u64,
    pub abstain: u64,
}

impl ManualTally {
    pub fn new(total: u64, for_votes: u64, against: u64, abstain: u64) -> Self {
        Self {
            total,
            for_votes,
            against,
            abstain,
        }
    }

    /// `for + against + abstain == total` and `total > 0`
    pub fn is_consistent(&self) -> bool {
        let sum = self
            .for_votes
            .checked_add(self.against)
            .and_then(|s| s.checked_add(self.abstain));
        self.total > 0 && sum == Some(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistent_tally() {
        assert!(ManualTally::new(50, 20, 20, 10).is_consistent());
    }

    #[test]
    fn test_sum_mismatch_is_inconsistent() {
        assert!(!ManualTally::new(50, 20, 20, 5).is_consistent());
    }

    #[test]
    fn test_zero_total_is_inconsistent() {
        assert!(!ManualTally::new(0, 0, 0, 0).is_consistent());
    }

    #[test]
    fn test_overflow_is_inconsistent() {
        assert!(!ManualTally::new(u64::MAX, u64::MAX, 1, 0).is_consistent());
    }

    #[test]
    fn test_serde_uses_for_key() {
        let tally: ManualTally =
            serde_json::from_str(r#"{"total":3,"for":2,"against":1,"abstain":0}"#).unwrap();
        assert_eq!(tally.for_votes, 2);
    }
}
