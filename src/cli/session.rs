//! Interactive matching session
//!
//! Reads one command per line and prints the effect on the selection. The
//! loop works on any `BufRead`/`Write` pair so it can be driven from tests.

use std::io::{BufRead, Write};

use crate::config::{BankrecPaths, Settings};
use crate::display::{
    format_auto_match_status, format_candidate_list, format_selection_summary, CurrencyFormat,
};
use crate::error::MatchResult;
use crate::models::ItemId;
use crate::services::{AutoMatchStatus, Session};

use super::{open_session, MatchArgs};

const HELP: &str = "\
Commands:
  list              Show candidates and the running totals
  select <id>       Add an item to the selection
  deselect <id>     Remove an item from the selection
  can <id>          Check whether an item could be selected
  remaining         Show the remaining amount
  auto              Show the auto-match result
  auto wait         Wait for the auto-match search to finish
  auto cancel       Stop the auto-match search
  help              Show this help
  quit              Leave the session
";

/// One line of session input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    List,
    Select(ItemId),
    Deselect(ItemId),
    CanSelect(ItemId),
    Remaining,
    AutoStatus,
    AutoWait,
    AutoCancel,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parse a command line; `Ok(None)` for blank input
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(None);
        };
        let argument = words.next();

        let item = |name: &str| {
            argument
                .map(ItemId::from)
                .ok_or_else(|| format!("Usage: {} <id>", name))
        };

        let parsed = match command.to_lowercase().as_str() {
            "list" | "ls" => Self::List,
            "select" | "s" => Self::Select(item("select")?),
            "deselect" | "d" => Self::Deselect(item("deselect")?),
            "can" => Self::CanSelect(item("can")?),
            "remaining" | "r" => Self::Remaining,
            "auto" => match argument {
                None => Self::AutoStatus,
                Some("wait") => Self::AutoWait,
                Some("cancel") => Self::AutoCancel,
                Some(other) => return Err(format!("Unknown auto option: '{}'", other)),
            },
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("Unknown command: '{}'. Type 'help'.", other)),
        };
        Ok(Some(parsed))
    }
}

/// Drive a session from line input until `quit` or end of input
pub fn run_session<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
    fmt: &CurrencyFormat,
) -> MatchResult<()> {
    let mut announced = false;

    write!(out, "{}", format_candidate_list(session.state(), fmt))?;
    announce_auto_match(session, out, fmt, &mut announced)?;

    for line in input.lines() {
        let line = line?;
        let command = match SessionCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{}", message)?;
                continue;
            }
        };

        match command {
            SessionCommand::List => {
                write!(out, "{}", format_candidate_list(session.state(), fmt))?;
            }
            SessionCommand::Select(id) => toggle(session, &id, true, out, fmt)?,
            SessionCommand::Deselect(id) => toggle(session, &id, false, out, fmt)?,
            SessionCommand::CanSelect(id) => match session.query_can_select(&id) {
                Ok(true) => writeln!(out, "Yes")?,
                Ok(false) => writeln!(
                    out,
                    "No: exceeds remaining {}",
                    fmt.format(session.query_remaining())
                )?,
                Err(err) => writeln!(out, "Error: {}", err)?,
            },
            SessionCommand::Remaining => {
                write!(out, "{}", format_selection_summary(session.state(), fmt))?;
            }
            SessionCommand::AutoStatus => {
                let status = session.query_auto_match_result();
                write!(out, "{}", format_auto_match_status(&status, session.state(), fmt))?;
                announced = status != AutoMatchStatus::Pending;
            }
            SessionCommand::AutoWait => {
                let status = session.wait_for_auto_match();
                write!(out, "{}", format_auto_match_status(&status, session.state(), fmt))?;
                announced = true;
            }
            SessionCommand::AutoCancel => {
                session.cancel_auto_match();
                let status = session.query_auto_match_result();
                write!(out, "{}", format_auto_match_status(&status, session.state(), fmt))?;
                announced = true;
            }
            SessionCommand::Help => write!(out, "{}", HELP)?,
            SessionCommand::Quit => break,
        }

        announce_auto_match(session, out, fmt, &mut announced)?;
        if let Some(err) = session.take_audit_error() {
            writeln!(out, "Warning: {}", err)?;
        }
    }

    Ok(())
}

fn toggle<W: Write>(
    session: &mut Session,
    id: &ItemId,
    select: bool,
    out: &mut W,
    fmt: &CurrencyFormat,
) -> MatchResult<()> {
    match session.toggle_item(id, select) {
        Ok(result) if result.changed => {
            writeln!(out, "Remaining: {}", fmt.format(result.new_remaining))?;
        }
        Ok(result) => {
            writeln!(out, "No change. Remaining: {}", fmt.format(result.new_remaining))?;
        }
        Err(err) => writeln!(out, "Error: {}", err)?,
    }
    Ok(())
}

/// Print the auto-match outcome the first time it is available
fn announce_auto_match<W: Write>(
    session: &mut Session,
    out: &mut W,
    fmt: &CurrencyFormat,
    announced: &mut bool,
) -> MatchResult<()> {
    if *announced {
        return Ok(());
    }
    let status = session.query_auto_match_result();
    if status == AutoMatchStatus::Pending {
        return Ok(());
    }
    *announced = true;
    write!(out, "{}", format_auto_match_status(&status, session.state(), fmt))?;
    if matches!(status, AutoMatchStatus::Complete(ref report) if report.applied) {
        write!(out, "{}", format_selection_summary(session.state(), fmt))?;
    }
    Ok(())
}

/// Open a session and run it against stdin
pub fn handle_session_command(
    args: &MatchArgs,
    settings: &Settings,
    paths: &BankrecPaths,
) -> MatchResult<()> {
    let fmt = CurrencyFormat::from_settings(settings);
    let mut session = open_session(args, settings, paths, true)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_session(&mut session, stdin.lock(), &mut out, &fmt)
}
