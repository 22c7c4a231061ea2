//! Motion result evaluation
//!
//! Pure composition of source selection, quorum, majority and decision.
//! The application layer gathers the inputs from the stores and persists
//! the [`OfficialResult`] this produces.

use super::official::{Decision, OfficialResult, ResultSource};
use crate::core::ids::MotionId;
use crate::core::verdict::Verdict;
use crate::majority::{MajorityContext, MajorityOutcome, MajorityResolver};
use crate::meeting::Convocation;
use crate::member::Roster;
use crate::motion::ManualTally;
use crate::policy::{QuorumPolicy, VotePolicy};
use crate::quorum::{QuorumContext, QuorumOutcome, QuorumResolver};
use crate::tally::MotionTally;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything needed to evaluate one motion
#[derive(Debug, Clone)]
pub struct ResultInputs<'a> {
    pub motion: MotionId,
    /// Only consistent manual tallies take precedence
    pub manual: Option<&'a ManualTally>,
    pub electronic: MotionTally,
    pub eligible: Roster,
    pub convocation: Convocation,
    pub quorum_policy: Option<&'a QuorumPolicy>,
    pub vote_policy: Option<&'a VotePolicy>,
    pub present_weight: Option<f64>,
    /// Motion still open: the result is a live preview
    pub provisional: bool,
}

/// Manual figures win when consistent; otherwise the electronic tally.
pub fn select_source(manual: Option<&ManualTally>, electronic: MotionTally) -> (ResultSource, MotionTally) {
    match manual.filter(|t| t.is_consistent()) {
        Some(tally) => (ResultSource::Manual, MotionTally::from_manual(tally)),
        None => (ResultSource::Evote, electronic),
    }
}

/// Derive the single decision status, with its reason.
pub fn decide(
    tally: &MotionTally,
    quorum: &QuorumOutcome,
    majority: &MajorityOutcome,
) -> (Decision, String) {
    if !tally.has_expressed() {
        return (
            Decision::NoVotes,
            "No ballot was expressed on this motion.".to_string(),
        );
    }
    if quorum.verdict == Verdict::NotMet {
        return (Decision::NoQuorum, quorum.justification.clone());
    }
    match majority.adopted() {
        Some(adopted) => {
            let decision = if adopted {
                Decision::Adopted
            } else {
                Decision::Rejected
            };
            let reason = if quorum.applied() {
                format!("{} {}", quorum.justification, majority.justification)
            } else {
                majority.justification.clone()
            };
            (decision, reason)
        }
        None => (
            Decision::NoPolicy,
            "No vote policy applies; the motion cannot be decided.".to_string(),
        ),
    }
}

/// Tallies, verdicts and decision of one motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionResult {
    pub motion: MotionId,
    pub source: ResultSource,
    pub tally: MotionTally,
    pub eligible: Roster,
    pub quorum: QuorumOutcome,
    pub majority: MajorityOutcome,
    pub decision: Decision,
    pub reason: String,
    pub provisional: bool,
}

impl MotionResult {
    pub fn evaluate(inputs: ResultInputs<'_>) -> Self {
        let (source, tally) = select_source(inputs.manual, inputs.electronic);

        let quorum = QuorumResolver::resolve(
            inputs.quorum_policy,
            &QuorumContext {
                participation: tally.by_presence,
                eligible: inputs.eligible,
                convocation: inputs.convocation,
            },
        );

        let majority = MajorityResolver::resolve(
            inputs.vote_policy,
            &MajorityContext {
                for_weight: tally.for_votes.weight,
                against_weight: tally.against.weight,
                abstain_weight: tally.abstain.weight,
                expressed_weight: tally.expressed.weight,
                eligible_weight: inputs.eligible.weight,
                present_weight: inputs.present_weight,
            },
            quorum.verdict,
        );

        let (decision, reason) = decide(&tally, &quorum, &majority);

        Self {
            motion: inputs.motion,
            source,
            tally,
            eligible: inputs.eligible,
            quorum,
            majority,
            decision,
            reason,
            provisional: inputs.provisional,
        }
    }

    /// The record persisted on the motion
    pub fn to_official(&self, decided_at: DateTime<Utc>) -> OfficialResult {
        OfficialResult {
            source: self.source,
            for_weight: self.tally.for_votes.weight,
            against_weight: self.tally.against.weight,
            abstain_weight: self.tally.abstain.weight,
            total_weight: self.tally.expressed.weight,
            decision: self.decision,
            reason: self.reason.clone(),
            decided_at,
        }
    }
}
