//! Session audit log
//!
//! Records what happened during each matching session (selections,
//! rejections, auto-match results) in an append-only JSONL file.
//!
//! # Example
//!
//! ```rust,ignore
//! use bankrec_match::audit::{AuditEntry, AuditLogger, SessionEvent};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let entry = AuditEntry::new(session_id, SessionEvent::Selected)
//!     .with_item(&item_id)
//!     .with_remaining(before, after);
//! logger.log(&entry)?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, SessionEvent};
pub use logger::AuditLogger;
