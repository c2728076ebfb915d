//! One-shot auto-match command

use std::io::Write;

use crate::config::{BankrecPaths, Settings};
use crate::display::{format_auto_match_status, format_candidate_list, CurrencyFormat};
use crate::error::MatchResult;

use super::{open_session, MatchArgs};

/// Run the auto-match pass and print the outcome and the resulting selection
pub fn handle_auto_command<W: Write>(
    args: &MatchArgs,
    settings: &Settings,
    paths: &BankrecPaths,
    out: &mut W,
) -> MatchResult<()> {
    let fmt = CurrencyFormat::from_settings(settings);
    let mut session = open_session(args, settings, paths, false)?;
    let status = session.query_auto_match_result();

    write!(out, "{}", format_auto_match_status(&status, session.state(), &fmt))?;
    writeln!(out)?;
    write!(out, "{}", format_candidate_list(session.state(), &fmt))?;

    if let Some(err) = session.take_audit_error() {
        writeln!(out, "Warning: {}", err)?;
    }
    Ok(())
}
