//! Audit log command

use std::io::Write;

use crate::audit::AuditLogger;
use crate::config::BankrecPaths;
use crate::display::format_audit_entries;
use crate::error::MatchResult;

/// Print the most recent session events
pub fn handle_log_command<W: Write>(
    paths: &BankrecPaths,
    count: usize,
    out: &mut W,
) -> MatchResult<()> {
    let logger = AuditLogger::new(paths.audit_log());
    let entries = logger.read_recent(count)?;
    write!(out, "{}", format_audit_entries(&entries))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditEntry, SessionEvent};
    use crate::models::SessionId;
    use tempfile::TempDir;

    #[test]
    fn test_log_empty_and_recent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BankrecPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut out = Vec::new();
        handle_log_command(&paths, 10, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("No session events"));

        let logger = AuditLogger::new(paths.audit_log());
        let id = SessionId::new();
        logger.log(&AuditEntry::new(id, SessionEvent::Started)).unwrap();
        logger.log(&AuditEntry::new(id, SessionEvent::AutoMatchUnmatched)).unwrap();

        let mut out = Vec::new();
        handle_log_command(&paths, 1, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("AUTO-MATCH-NONE"));
        assert!(!text.contains("STARTED"));
    }
}
