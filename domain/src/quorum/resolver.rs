//! Quorum resolution
//!
//! Evaluates a [`QuorumPolicy`] against the expressed participation of a
//! motion and the eligible roster of its tenant.

use crate::core::numeric::{self, clamp_threshold, floor_count, floor_weight, reaches};
use crate::core::verdict::Verdict;
use crate::meeting::Convocation;
use crate::member::Roster;
use crate::policy::{QuorumBasis, QuorumCondition, QuorumMode, QuorumPolicy};
use crate::tally::{Participation, PresenceBreakdown};
use serde::{Deserialize, Serialize};

/// Everything quorum resolution reads
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuorumContext {
    pub participation: PresenceBreakdown,
    pub eligible: Roster,
    pub convocation: Convocation,
}

/// One evaluated denominator/threshold pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionCheck {
    pub basis: QuorumBasis,
    pub numerator: f64,
    /// Raw denominator, before flooring
    pub denominator: f64,
    pub ratio: f64,
    pub threshold: f64,
    pub met: bool,
}

impl ConditionCheck {
    fn evaluate(basis: QuorumBasis, threshold: f64, counted: Participation, eligible: Roster) -> Self {
        let threshold = clamp_threshold(threshold);
        let (numerator, denominator, floored) = match basis {
            QuorumBasis::EligibleMembers => (
                counted.members as f64,
                eligible.members as f64,
                floor_count(eligible.members),
            ),
            QuorumBasis::EligibleWeight => (
                counted.weight,
                eligible.weight,
                floor_weight(eligible.weight),
            ),
        };
        let ratio = numerator / floored;
        Self {
            basis,
            numerator,
            denominator,
            ratio,
            threshold,
            met: reaches(ratio, threshold),
        }
    }

    fn describe(&self) -> String {
        let unit = match self.basis {
            QuorumBasis::EligibleMembers => "eligible members",
            QuorumBasis::EligibleWeight => "eligible weight",
        };
        format!(
            "{} of {} {} = {} {} {} ({})",
            numeric::weight(self.numerator),
            numeric::weight(self.denominator),
            unit,
            numeric::percent(self.ratio),
            if self.met { ">=" } else { "<" },
            numeric::percent(self.threshold),
            if self.met { "met" } else { "not met" },
        )
    }
}

/// Result of quorum resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuorumOutcome {
    pub verdict: Verdict,
    #[serde(default)]
    pub mode: Option<QuorumMode>,
    #[serde(default)]
    pub primary: Option<ConditionCheck>,
    #[serde(default)]
    pub secondary: Option<ConditionCheck>,
    /// Double mode declared without its second condition
    #[serde(default)]
    pub misconfigured: bool,
    /// Presence modes counted in the numerator
    #[serde(default)]
    pub counted_modes: Vec<String>,
    /// Human-readable summary, rendered verbatim in reports
    pub justification: String,
}

impl QuorumOutcome {
    pub fn not_applied() -> Self {
        Self {
            verdict: Verdict::Unapplied,
            mode: None,
            primary: None,
            secondary: None,
            misconfigured: false,
            counted_modes: Vec::new(),
            justification: "No quorum policy applies; quorum does not constrain this motion."
                .to_string(),
        }
    }

    pub fn applied(&self) -> bool {
        self.verdict.is_applied()
    }

    pub fn met(&self) -> Option<bool> {
        self.verdict.met()
    }

    pub fn ratio(&self) -> Option<f64> {
        self.primary.map(|c| c.ratio)
    }

    pub fn threshold(&self) -> Option<f64> {
        self.primary.map(|c| c.threshold)
    }

    pub fn basis(&self) -> Option<QuorumBasis> {
        self.primary.map(|c| c.basis)
    }
}

/// Evaluates quorum policies
pub struct QuorumResolver;

impl QuorumResolver {
    /// Threshold in force for the primary condition
    pub fn effective_threshold(policy: &QuorumPolicy, convocation: Convocation) -> f64 {
        match (policy.mode, convocation, policy.second_convocation_threshold) {
            (QuorumMode::Evolving, Convocation::Second, Some(alternate)) => alternate,
            _ => policy.primary.threshold,
        }
    }

    pub fn resolve(policy: Option<&QuorumPolicy>, ctx: &QuorumContext) -> QuorumOutcome {
        let Some(policy) = policy else {
            return QuorumOutcome::not_applied();
        };

        let counted = ctx
            .participation
            .counted(policy.include_remote, policy.include_proxy);
        let mut counted_modes = vec!["present".to_string()];
        if policy.include_remote {
            counted_modes.push("remote".to_string());
        }
        if policy.include_proxy {
            counted_modes.push("proxy".to_string());
        }

        let primary = ConditionCheck::evaluate(
            policy.primary.basis,
            Self::effective_threshold(policy, ctx.convocation),
            counted,
            ctx.eligible,
        );

        let (secondary, misconfigured) = match (policy.mode, policy.secondary) {
            (QuorumMode::Double, Some(QuorumCondition { basis, threshold })) => (
                Some(ConditionCheck::evaluate(basis, threshold, counted, ctx.eligible)),
                false,
            ),
            (QuorumMode::Double, None) => (None, true),
            _ => (None, false),
        };

        let met = !misconfigured && primary.met && secondary.is_none_or(|s| s.met);

        let mut justification = format!(
            "Quorum ({}{}): {}",
            policy.mode,
            if policy.mode == QuorumMode::Evolving {
                format!(", convocation {}", ctx.convocation.number())
            } else {
                String::new()
            },
            primary.describe()
        );
        if let Some(second) = &secondary {
            justification.push_str(&format!("; and {}", second.describe()));
        }
        if misconfigured {
            justification.push_str(
                "; double quorum declared without a second condition, policy is unsatisfiable",
            );
        }
        justification.push_str(&format!(
            ". Counted: {}. Quorum {}.",
            counted_modes.join(", "),
            if met { "met" } else { "not met" }
        ));

        QuorumOutcome {
            verdict: Verdict::from_met(met),
            mode: Some(policy.mode),
            primary: Some(primary),
            secondary,
            misconfigured,
            counted_modes,
            justification,
        }
    }
}
