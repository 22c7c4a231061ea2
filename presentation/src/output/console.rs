//! Console output formatter for engine results

use assembly_application::{
    CastBallotOutput, CloseOutput, ConsolidateOutput, DelegateOutput, MeetingConsolidation,
};
use assembly_domain::{
    ChoiceTally, Decision, Meeting, MotionResult, MotionTally, OfficialResult, ProxyDelegation,
    ReadinessDiff, ReadinessReport, Verdict,
};
use colored::{ColoredString, Colorize};
use serde::Serialize;

/// Formats engine results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the live or final result of a motion
    pub fn motion_result(result: &MotionResult) -> String {
        let mut output = String::new();

        let title = if result.provisional {
            format!("{} (provisional)", result.motion)
        } else {
            result.motion.to_string()
        };
        output.push_str(&Self::header(&title));
        output.push('\n');

        output.push_str(&format!(
            "{} {}   {} {}\n",
            "Decision:".cyan().bold(),
            Self::decision(result.decision),
            "Source:".cyan().bold(),
            result.source
        ));
        output.push_str(&format!("{}\n", result.reason.dimmed()));

        output.push_str(&Self::section_header("Tally"));
        output.push_str(&Self::tally(&result.tally));
        output.push_str(&format!(
            "  eligible   {:>5} members  {:>10.2} weight\n",
            result.eligible.members, result.eligible.weight
        ));

        output.push_str(&Self::section_header("Quorum"));
        output.push_str(&format!(
            "  {} {}\n",
            Self::verdict(result.quorum.verdict),
            result.quorum.justification
        ));

        output.push_str(&Self::section_header("Majority"));
        output.push_str(&format!(
            "  {} {}\n",
            Self::verdict(result.majority.verdict),
            result.majority.justification
        ));

        output.push_str(&Self::footer());
        output
    }

    pub fn official(result: &OfficialResult) -> String {
        format!(
            "{} {} ({} source)\n  for {:.2} / against {:.2} / abstain {:.2} / total {:.2}\n  {}\n  decided at {}\n",
            "Official:".cyan().bold(),
            Self::decision(result.decision),
            result.source,
            result.for_weight,
            result.against_weight,
            result.abstain_weight,
            result.total_weight,
            result.reason,
            result.decided_at.to_rfc3339()
        )
    }

    pub fn consolidation(output: &ConsolidateOutput) -> String {
        let mut text = Self::motion_result(&output.result);
        text.push_str(&Self::official(&output.official));
        if !output.changed {
            text.push_str(&format!("{}\n", "Unchanged since last consolidation".dimmed()));
        }
        text
    }

    pub fn meeting_consolidation(summary: &MeetingConsolidation) -> String {
        let mut output = format!(
            "{} {} consolidated, {} skipped, {} failed\n",
            "Meeting consolidation:".cyan().bold(),
            summary.consolidated.to_string().green(),
            summary.skipped,
            if summary.failed.is_empty() {
                "0".normal()
            } else {
                summary.failed.len().to_string().red()
            }
        );
        for (motion, reason) in &summary.failed {
            output.push_str(&format!("  {} {}: {}\n", "x".red(), motion, reason));
        }
        output
    }

    pub fn ballot(output: &CastBallotOutput) -> String {
        let ballot = &output.ballot;
        let verb = if output.write.replaced() {
            "replaced"
        } else {
            "recorded"
        };
        let mut text = format!(
            "{} Ballot {} for {} on {}: {} (weight {:.2}, {})",
            "✓".green(),
            verb,
            ballot.member,
            ballot.motion,
            ballot.choice.to_string().bold(),
            ballot.weight,
            ballot.presence
        );
        if let Some(voter) = ballot.proxy_voter {
            text.push_str(&format!(", cast by {}", voter));
        }
        text.push('\n');
        text
    }

    pub fn delegation(output: &DelegateOutput) -> String {
        let d = &output.delegation;
        let mut text = format!(
            "{} {} delegates to {} in {}\n",
            "✓".green(),
            d.giver,
            d.receiver,
            d.meeting
        );
        if let Some(previous) = output.replaced {
            text.push_str(&format!("  replaces the delegation to {}\n", previous));
        }
        text
    }

    pub fn delegations(rows: &[ProxyDelegation]) -> String {
        if rows.is_empty() {
            return format!("{}\n", "No delegations".dimmed());
        }
        let mut output = Self::section_header("Delegations");
        for d in rows {
            let status = match d.revoked_at {
                None => "active".green(),
                Some(at) => format!("revoked {}", at.to_rfc3339()).dimmed(),
            };
            output.push_str(&format!(
                "  {} → {}  [{}]  since {}\n",
                d.giver,
                d.receiver,
                status,
                d.created_at.to_rfc3339()
            ));
        }
        output
    }

    pub fn readiness(report: &ReadinessReport, diff: &ReadinessDiff) -> String {
        let mut output = if report.can_validate {
            format!("{} {} can be validated\n", "✓".green(), report.meeting)
        } else {
            format!("{} {} cannot be validated\n", "x".red(), report.meeting)
        };
        for violation in &report.violations {
            output.push_str(&format!(
                "  {} {}\n",
                format!("[{}]", violation.code()).yellow(),
                violation.message()
            ));
        }
        for code in &diff.appeared {
            output.push_str(&format!("  {} {}\n", "new:".yellow(), code));
        }
        for code in &diff.resolved {
            output.push_str(&format!("  {} {}\n", "resolved:".green(), code));
        }
        output
    }

    pub fn close(output: &CloseOutput) -> String {
        let mut text = format!(
            "{} {} closed\n",
            "✓".green(),
            output.motion.id
        );
        if let Some(consolidation) = &output.consolidation {
            text.push_str(&Self::official(&consolidation.official));
        }
        text
    }

    pub fn meeting(meeting: &Meeting) -> String {
        format!(
            "{} {} \"{}\" is {}{}\n",
            "Meeting:".cyan().bold(),
            meeting.id,
            meeting.title,
            meeting.status.to_string().bold(),
            meeting
                .president
                .as_deref()
                .map(|p| format!(", presided by {}", p))
                .unwrap_or_default()
        )
    }

    /// Format any result as pretty JSON
    pub fn json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn tally(tally: &MotionTally) -> String {
        let row = |label: &str, t: ChoiceTally| {
            format!(
                "  {:<10} {:>5} ballots  {:>10.2} weight\n",
                label, t.count, t.weight
            )
        };
        let mut output = String::new();
        output.push_str(&row("for", tally.for_votes));
        output.push_str(&row("against", tally.against));
        output.push_str(&row("abstain", tally.abstain));
        output.push_str(&row("no opinion", tally.no_opinion));
        output.push_str(&format!(
            "  {:<10} {:>5} members  {:>10.2} weight\n",
            "expressed", tally.expressed.members, tally.expressed.weight
        ));
        output
    }

    fn decision(decision: Decision) -> ColoredString {
        let label = decision.as_str().to_uppercase();
        match decision {
            Decision::Adopted => label.green().bold(),
            Decision::Rejected => label.red().bold(),
            Decision::NoQuorum | Decision::NoVotes | Decision::NoPolicy => label.yellow().bold(),
        }
    }

    fn verdict(verdict: Verdict) -> ColoredString {
        match verdict {
            Verdict::Met => "[met]".green(),
            Verdict::NotMet => "[not met]".red(),
            Verdict::Unapplied => "[not applied]".dimmed(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assembly_domain::{MeetingId, MemberId, ReadinessFacts};
    use chrono::{TimeZone, Utc};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_readiness_lists_violation_codes() {
        plain();
        let report = ReadinessReport::from_facts(
            MeetingId(1),
            ReadinessFacts {
                open_motions: 2,
                ..ReadinessFacts::default()
            },
        );
        let diff = report.diff(None);
        let text = ConsoleFormatter::readiness(&report, &diff);

        assert!(text.contains("meeting#1 cannot be validated"));
        assert!(text.contains("[open_motions] 2 motion(s) are still open"));
        assert!(text.contains("[missing_president]"));
        assert!(text.contains("new: open_motions"));
    }

    #[test]
    fn test_delegations_mark_revoked_rows() {
        plain();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        let active = ProxyDelegation::new(MeetingId(1), MemberId(1), MemberId(2), at);
        let mut revoked = ProxyDelegation::new(MeetingId(1), MemberId(3), MemberId(2), at);
        revoked.revoke(at);

        let text = ConsoleFormatter::delegations(&[active, revoked]);
        assert!(text.contains("member#1 → member#2  [active]"));
        assert!(text.contains("member#3 → member#2  [revoked"));
    }

    #[test]
    fn test_empty_delegations() {
        plain();
        assert_eq!(ConsoleFormatter::delegations(&[]), "No delegations\n");
    }

    #[test]
    fn test_json_uses_serde_names() {
        let report = ReadinessReport::from_facts(MeetingId(4), ReadinessFacts::default());
        let json = ConsoleFormatter::json(&report);
        assert!(json.contains("\"can_validate\": false"));
        assert!(json.contains("\"code\": \"missing_president\""));
    }
}
