//! Console output formatter for decisions and simulation reports

use crate::simulate::SimulationReport;
use boardroom_domain::{
    AgentMessage, Channel, ConfigIssue, Decision, DecisionStatus, Escalation, MessageBody,
    Severity, VoteAction,
};
use colored::Colorize;
use serde_json::json;

/// Formats governance results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a complete simulation report
    pub fn format(report: &SimulationReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Boardroom Simulation"));
        output.push('\n');
        output.push_str(&format!(
            "{} {:?}\n",
            "Scenario:".cyan().bold(),
            report.scenario
        ));

        output.push_str(&Self::section_header("Message Flow"));
        for (channel, message) in &report.transcript {
            output.push_str(&Self::transcript_line(channel, message));
            output.push('\n');
        }

        output.push_str(&Self::section_header("Outcome"));
        output.push_str(&Self::format_decision(&report.decision));

        if let Some(escalation) = &report.escalation {
            output.push_str(&Self::section_header("Escalation"));
            output.push_str(&Self::format_escalation(escalation));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(report: &SimulationReport) -> String {
        let transcript: Vec<_> = report
            .transcript
            .iter()
            .map(|(channel, message)| json!({ "channel": channel.name(), "message": message }))
            .collect();
        let value = json!({
            "scenario": format!("{:?}", report.scenario).to_lowercase(),
            "decision": report.decision,
            "escalation": report.escalation,
            "transcript": transcript,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format one decision's state
    pub fn format_decision(decision: &Decision) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} {} ({})\n",
            "Decision:".cyan().bold(),
            decision.title,
            decision.id.as_str().dimmed()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Status:".cyan().bold(),
            Self::status(decision.status)
        ));
        output.push_str(&format!(
            "{} CEO={} DAO={}\n",
            "HEAD votes:".cyan().bold(),
            decision.ceo_vote.map_or("-".to_string(), |v| v.to_string()),
            decision.dao_vote.map_or("-".to_string(), |v| v.to_string()),
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Veto rounds:".cyan().bold(),
            decision.veto_round
        ));
        if !decision.c_level_votes.is_empty() {
            output.push_str(&format!("{}\n", "Advisory opinions:".cyan().bold()));
            for (role, opinion) in &decision.c_level_votes {
                output.push_str(&format!("  * {}: {}\n", role, opinion));
            }
        }
        output
    }

    pub fn format_escalation(escalation: &Escalation) -> String {
        let channels: Vec<_> = escalation.channels_notified.iter().map(|c| c.to_string()).collect();
        format!(
            "{} {}\n{} {}\n{} {}\n",
            "Id:".yellow().bold(),
            escalation.id,
            "Reason:".yellow().bold(),
            escalation.reason,
            "Notified:".yellow().bold(),
            channels.join(", ")
        )
    }

    /// Format configuration validation issues
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        issues
            .iter()
            .map(|issue| match issue.severity {
                Severity::Error => format!("{} {}", "error:".red().bold(), issue.message),
                Severity::Warning => format!("{} {}", "warning:".yellow().bold(), issue.message),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn transcript_line(channel: &Channel, message: &AgentMessage) -> String {
        let detail = match message.body() {
            Ok(MessageBody::Decision(p)) => format!("proposes \"{}\"", p.title),
            Ok(MessageBody::Vote(v)) => match &v.reasoning {
                Some(reasoning) => format!("{} ({})", v.vote, reasoning),
                None => v.vote,
            },
            Ok(MessageBody::VoteRequest(r)) => match r.action {
                VoteAction::CastVote => format!("cast vote, round {}", r.round),
                VoteAction::ProvideAnalysis => format!("advise, round {}", r.round),
            },
            Ok(MessageBody::DecisionResolved(r)) => {
                format!("{} after {} rounds", r.result, r.veto_round)
            }
            Ok(other) => other.kind().as_str().to_string(),
            Err(_) => message.message_type.clone(),
        };
        format!(
            "  {:<14} {:>12} -> {:<12} {}",
            format!("[{}]", channel.name()).dimmed(),
            message.from.as_str().bold(),
            String::from(message.to.clone()),
            detail
        )
    }

    fn status(status: DecisionStatus) -> String {
        match status {
            DecisionStatus::Approved => status.as_str().green().bold().to_string(),
            DecisionStatus::Vetoed => status.as_str().red().bold().to_string(),
            DecisionStatus::Escalated => status.as_str().yellow().bold().to_string(),
            DecisionStatus::Pending => status.as_str().to_string(),
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
    use boardroom_domain::{AgentId, DecisionTier, VoteValue};
    use chrono::{Duration, Utc};

    fn decision() -> Decision {
        let mut decision = Decision::propose(
            "Open Lisbon office",
            "",
            AgentId::new("cmo"),
            DecisionTier::Major,
            Utc::now(),
            Duration::hours(24),
        );
        decision.ceo_vote = Some(VoteValue::Approve);
        decision
    }

    #[test]
    fn test_format_decision_lists_votes() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_decision(&decision());
        assert!(text.contains("Open Lisbon office"));
        assert!(text.contains("CEO=approve DAO=-"));
        assert!(text.contains("Status: pending"));
    }

    #[test]
    fn test_format_issues_marks_severity() {
        colored::control::set_override(false);
        let issues = vec![
            ConfigIssue::warning(
                boardroom_domain::ConfigIssueCode::ZeroChannelCapacity,
                "bus.channel_capacity = 0, using 1",
            ),
        ];
        let text = ConsoleFormatter::format_issues(&issues);
        assert_eq!(text, "warning: bus.channel_capacity = 0, using 1");
    }
}
