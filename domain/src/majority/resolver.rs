//! Majority resolution

use crate::core::numeric::{self, clamp_threshold, floor_weight, reaches};
use crate::core::verdict::Verdict;
use crate::policy::{MajorityBase, VotePolicy};
use serde::{Deserialize, Serialize};

/// Weights majority resolution reads
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MajorityContext {
    pub for_weight: f64,
    pub against_weight: f64,
    pub abstain_weight: f64,
    /// for + against + abstain
    pub expressed_weight: f64,
    pub eligible_weight: f64,
    /// Attendance-derived weight, when the attendance roster is known
    pub present_weight: Option<f64>,
}

/// Result of majority resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MajorityOutcome {
    pub verdict: Verdict,
    #[serde(default)]
    pub ratio: Option<f64>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub base: Option<MajorityBase>,
    /// Denominator actually used
    #[serde(default)]
    pub base_total: Option<f64>,
    #[serde(default)]
    pub abstention_as_against: Option<bool>,
    /// The ratio passed but quorum failed
    #[serde(default)]
    pub blocked_by_quorum: bool,
    pub justification: String,
}

impl MajorityOutcome {
    pub fn not_applied() -> Self {
        Self {
            verdict: Verdict::Unapplied,
            ratio: None,
            threshold: None,
            base: None,
            base_total: None,
            abstention_as_against: None,
            blocked_by_quorum: false,
            justification: "No vote policy applies.".to_string(),
        }
    }

    pub fn applied(&self) -> bool {
        self.verdict.is_applied()
    }

    /// `Some(true)` when adopted, `None` when no policy applies
    pub fn adopted(&self) -> Option<bool> {
        self.verdict.met()
    }
}

/// Evaluates vote policies
pub struct MajorityResolver;

impl MajorityResolver {
    /// Denominator for `policy`, with a note describing how it was obtained
    fn base_total(policy: &VotePolicy, ctx: &MajorityContext) -> (f64, &'static str) {
        match policy.base {
            MajorityBase::Expressed if policy.abstention_as_against => {
                (ctx.expressed_weight, "expressed weight, abstentions included")
            }
            MajorityBase::Expressed => (
                (ctx.expressed_weight - ctx.abstain_weight).max(0.0),
                "expressed weight, abstentions excluded",
            ),
            MajorityBase::Eligible => (ctx.eligible_weight, "eligible weight"),
            MajorityBase::Present => match ctx.present_weight {
                Some(present) if present > 0.0 => (present, "present weight"),
                _ => (
                    ctx.expressed_weight,
                    "present weight unknown, expressed weight used",
                ),
            },
        }
    }

    /// Resolve `policy` against the tallies, honouring the quorum verdict.
    pub fn resolve(
        policy: Option<&VotePolicy>,
        ctx: &MajorityContext,
        quorum: Verdict,
    ) -> MajorityOutcome {
        let Some(policy) = policy else {
            return MajorityOutcome::not_applied();
        };

        let threshold = clamp_threshold(policy.threshold);
        let (base_total, base_note) = Self::base_total(policy, ctx);
        let ratio = ctx.for_weight / floor_weight(base_total);

        let vacuous = base_total <= 0.0 || ctx.expressed_weight <= 0.0;
        let passes = !vacuous && reaches(ratio, threshold);
        let blocked_by_quorum = passes && quorum.blocks();
        let adopted = passes && !quorum.blocks();

        let mut justification = format!(
            "Majority ({} base): {} for / {} ({}) = {} {} {}",
            policy.base,
            numeric::weight(ctx.for_weight),
            numeric::weight(base_total),
            base_note,
            numeric::percent(ratio),
            if reaches(ratio, threshold) { ">=" } else { "<" },
            numeric::percent(threshold),
        );
        if vacuous {
            justification.push_str("; nothing expressed, cannot be adopted");
        }
        if quorum.blocks() {
            justification.push_str("; quorum not met, cannot be adopted");
        }
        justification.push_str(if adopted { ". Adopted." } else { ". Rejected." });

        MajorityOutcome {
            verdict: Verdict::from_met(adopted),
            ratio: Some(ratio),
            threshold: Some(threshold),
            base: Some(policy.base),
            base_total: Some(base_total),
            abstention_as_against: Some(policy.abstention_as_against),
            blocked_by_quorum,
            justification,
        }
    }
}
