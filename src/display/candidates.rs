//! Candidate list formatting
//!
//! Each row carries a marker column:
//! `*` selected, blank selectable, `x` would oversell the remaining amount.

use crate::models::MatchItem;
use crate::services::SelectionState;

use super::{truncate, CurrencyFormat};

fn marker(state: &SelectionState, item: &MatchItem) -> char {
    match state.is_selected(item.id()) {
        Ok(true) => '*',
        _ if item.amount() <= state.remaining() => ' ',
        _ => 'x',
    }
}

/// Format a single candidate row
pub fn format_candidate_row(state: &SelectionState, item: &MatchItem, fmt: &CurrencyFormat) -> String {
    format!(
        "[{}] {:>6} {:24} {:10} {:>14}  {}",
        marker(state, item),
        truncate(item.id().as_str(), 6).trim_end(),
        truncate(item.paid_to(), 24),
        truncate(item.transaction_date(), 10),
        fmt.format(item.amount()),
        item.doc_type()
    )
    .trim_end()
    .to_string()
}

/// Format the full candidate list followed by the selection summary
pub fn format_candidate_list(state: &SelectionState, fmt: &CurrencyFormat) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:3} {:>6} {:24} {:10} {:>14}  {}\n",
        "", "Id", "Paid To", "Date", "Amount", "Type"
    ));
    output.push_str(&"-".repeat(76));
    output.push('\n');

    for item in state.candidates() {
        output.push_str(&format_candidate_row(state, item, fmt));
        output.push('\n');
    }

    output.push_str(&"-".repeat(76));
    output.push('\n');
    output.push_str(&format_selection_summary(state, fmt));
    output
}

/// Target, selected total and remaining, one per line
pub fn format_selection_summary(state: &SelectionState, fmt: &CurrencyFormat) -> String {
    let status = if state.is_matched() { "  (matched)" } else { "" };
    format!(
        "Target:    {:>14}\nSelected:  {:>14}  ({} items)\nRemaining: {:>14}{}\n",
        fmt.format(state.target()),
        fmt.format(state.selected_total()),
        state.selected_count(),
        fmt.format(state.remaining()),
        status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    fn state() -> SelectionState {
        SelectionState::initialize(
            Money::from_minor(30000),
            vec![
                MatchItem::new("1", "City Limousines", "30 Aug", Money::from_minor(24900), "Sales Invoice"),
                MatchItem::new("2", "Cube Land", "22 Sep", Money::from_minor(49500), "Sales Invoice"),
                MatchItem::new("3", "PowerDirect", "11 Sep", Money::from_minor(5000), ""),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_row_markers() {
        let fmt = CurrencyFormat::default();
        let (state, _) = state().toggle(&"1".into(), true).unwrap();

        let row = format_candidate_row(&state, &state.candidates()[0], &fmt);
        assert!(row.starts_with("[*]"));
        assert!(row.contains("City Limousines"));
        assert!(row.contains("$249.00"));

        let row = format_candidate_row(&state, &state.candidates()[1], &fmt);
        assert!(row.starts_with("[x]"));

        let row = format_candidate_row(&state, &state.candidates()[2], &fmt);
        assert!(row.starts_with("[ ]"));
    }

    #[test]
    fn test_candidate_list_summary() {
        let fmt = CurrencyFormat::default();
        let output = format_candidate_list(&state(), &fmt);
        assert!(output.contains("Paid To"));
        assert!(output.contains("Cube Land"));
        assert!(output.contains("Remaining:"));
        assert!(output.contains("$300.00"));
        assert!(!output.contains("(matched)"));
    }

    #[test]
    fn test_matched_summary() {
        let fmt = CurrencyFormat::default();
        let state = SelectionState::initialize(
            Money::from_minor(5000),
            vec![MatchItem::new("a", "A", "", Money::from_minor(5000), "")],
        )
        .unwrap();
        let (state, _) = state.toggle(&"a".into(), true).unwrap();
        let summary = format_selection_summary(&state, &fmt);
        assert!(summary.contains("(1 items)"));
        assert!(summary.contains("(matched)"));
    }
}
