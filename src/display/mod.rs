//! Display formatting for terminal output
//!
//! Renders candidate lists, the remaining amount and auto-match outcomes
//! using the currency settings the user configured.

pub mod candidates;
pub mod outcome;

pub use candidates::{format_candidate_list, format_candidate_row, format_selection_summary};
pub use outcome::{format_audit_entries, format_auto_match_status};

use crate::config::Settings;
use crate::models::money::DEFAULT_SCALE;
use crate::models::Money;

/// How amounts are printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub scale: u32,
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>, scale: u32) -> Self {
        Self {
            symbol: symbol.into(),
            scale,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.currency_symbol.clone(), settings.minor_unit_scale)
    }

    pub fn format(&self, amount: Money) -> String {
        amount.format_scaled(&self.symbol, self.scale)
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new("$", DEFAULT_SCALE)
    }
}

/// Pad or cut a string to exactly `max_len` characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
