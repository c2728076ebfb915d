//! Auto-match outcome and audit log formatting

use crate::audit::AuditEntry;
use crate::services::{AutoMatchOutcome, AutoMatchStatus, SelectionState};

use super::CurrencyFormat;

/// Describe the auto-match pass in one or two lines
pub fn format_auto_match_status(
    status: &AutoMatchStatus,
    state: &SelectionState,
    fmt: &CurrencyFormat,
) -> String {
    let report = match status {
        AutoMatchStatus::Pending => return "Auto-match: still searching...\n".to_string(),
        AutoMatchStatus::Cancelled => return "Auto-match: cancelled\n".to_string(),
        AutoMatchStatus::Complete(report) => report,
    };

    match &report.outcome {
        AutoMatchOutcome::Matched(ids) => {
            let names: Vec<String> = ids
                .iter()
                .filter_map(|id| state.item(id).ok())
                .map(|item| format!("{} ({})", item.paid_to(), fmt.format(item.amount())))
                .collect();
            let suffix = if report.applied {
                ""
            } else {
                "\n  not applied: selection had already changed"
            };
            format!("Auto-match: found {}{}\n", names.join(" + "), suffix)
        }
        AutoMatchOutcome::NoMatchFound => "Auto-match: no exact match\n".to_string(),
        AutoMatchOutcome::SearchBudgetExceeded { explored } => format!(
            "Auto-match: gave up after {} combinations; try a larger --budget\n",
            explored
        ),
        AutoMatchOutcome::Cancelled => "Auto-match: cancelled\n".to_string(),
    }
}

/// Format audit entries, one per line
pub fn format_audit_entries(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "No session events recorded.\n".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&entry.format_human_readable());
        output.push('\n');
    }
    output
}
