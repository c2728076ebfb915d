//! Audit entry data structures
//!
//! Defines the session events that are recorded and the entry format itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ItemId, Money, SessionId};

/// Things that can happen during a matching session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    /// Session created for a target
    Started,
    /// An item was added to the selection
    Selected,
    /// An item was removed from the selection
    Deselected,
    /// A toggle was refused; state unchanged
    Rejected,
    /// An auto-match result was applied
    AutoMatched,
    /// An auto-match result arrived after the user had started selecting
    AutoMatchDiscarded,
    /// The auto-match pass found nothing or ran out of budget
    AutoMatchUnmatched,
}

impl std::fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEvent::Started => write!(f, "STARTED"),
            SessionEvent::Selected => write!(f, "SELECTED"),
            SessionEvent::Deselected => write!(f, "DESELECTED"),
            SessionEvent::Rejected => write!(f, "REJECTED"),
            SessionEvent::AutoMatched => write!(f, "AUTO-MATCHED"),
            SessionEvent::AutoMatchDiscarded => write!(f, "AUTO-MATCH-DISCARDED"),
            SessionEvent::AutoMatchUnmatched => write!(f, "AUTO-MATCH-NONE"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the event occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub session_id: SessionId,

    pub event: SessionEvent,

    /// Items involved, in catalog order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_before: Option<Money>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_after: Option<Money>,

    /// Free-form detail, e.g. the rejection reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AuditEntry {
    /// Create a bare entry for an event
    pub fn new(session_id: SessionId, event: SessionEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            session_id,
            event,
            items: Vec::new(),
            remaining_before: None,
            remaining_after: None,
            detail: None,
        }
    }

    pub fn with_item(mut self, id: &ItemId) -> Self {
        self.items.push(id.clone());
        self
    }

    pub fn with_items(mut self, ids: &[ItemId]) -> Self {
        self.items.extend(ids.iter().cloned());
        self
    }

    /// Record the remaining amount around the event
    pub fn with_remaining(mut self, before: Money, after: Money) -> Self {
        self.remaining_before = Some(before);
        self.remaining_after = Some(after);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.session_id,
            self.event
        );

        if !self.items.is_empty() {
            let ids: Vec<&str> = self.items.iter().map(|id| id.as_str()).collect();
            output.push_str(&format!(" [{}]", ids.join(", ")));
        }

        if let (Some(before), Some(after)) = (self.remaining_before, self.remaining_after) {
            output.push_str(&format!(" remaining {} -> {}", before, after));
        }

        if let Some(detail) = &self.detail {
            output.push_str(&format!("\n  {}", detail));
        }

        output
    }
}
