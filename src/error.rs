//! Error types for bankrec-match
//!
//! Construction-time errors (`InvalidAmount`, `EmptyCatalog`) abort session
//! creation. Per-call errors (`UnknownItem`, `Overselection`) leave the
//! selection untouched and can be retried with a different item.

use thiserror::Error;

use crate::models::Money;

/// The main error type for matching operations
#[derive(Error, Debug)]
pub enum MatchError {
    /// Malformed or out-of-precision monetary input
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// No candidates to match against
    #[error("Catalog is empty: nothing to match against")]
    EmptyCatalog,

    /// An operation referenced an item outside the session
    #[error("Item not found in session: {0}")]
    UnknownItem(String),

    /// Selecting the item would drive the remaining amount below zero
    #[error("Cannot select '{item}': amount {amount} exceeds remaining {remaining}")]
    Overselection {
        item: String,
        amount: Money,
        remaining: Money,
    },

    /// The catalog supplied the same id twice
    #[error("Duplicate item id in catalog: {0}")]
    DuplicateItem(String),

    /// Catalog loading errors
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Audit log storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl MatchError {
    /// Create an "unknown item" error
    pub fn unknown_item(identifier: impl Into<String>) -> Self {
        Self::UnknownItem(identifier.into())
    }

    /// Check if this is an "unknown item" error
    pub fn is_unknown_item(&self) -> bool {
        matches!(self, Self::UnknownItem(_))
    }

    /// Check if this is an overselection rejection
    pub fn is_overselection(&self) -> bool {
        matches!(self, Self::Overselection { .. })
    }

    /// Per-call errors after which the session stays usable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnknownItem(_) | Self::Overselection { .. })
    }
}

impl From<std::io::Error> for MatchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for MatchError {
    fn from(err: csv::Error) -> Self {
        Self::Catalog(err.to_string())
    }
}

/// Result type alias for matching operations
pub type MatchResult<T> = Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MatchError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_unknown_item_error() {
        let err = MatchError::unknown_item("42");
        assert_eq!(err.to_string(), "Item not found in session: 42");
        assert!(err.is_unknown_item());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_overselection_error() {
        let err = MatchError::Overselection {
            item: "SMART Agency".into(),
            amount: Money::from_minor(25000),
            remaining: Money::from_minor(500),
        };
        assert_eq!(
            err.to_string(),
            "Cannot select 'SMART Agency': amount $250.00 exceeds remaining $5.00"
        );
        assert!(err.is_overselection());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_construction_errors_not_recoverable() {
        assert!(!MatchError::EmptyCatalog.is_recoverable());
        assert!(!MatchError::InvalidAmount("abc".into()).is_recoverable());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MatchError = io_err.into();
        assert!(matches!(err, MatchError::Io(_)));
    }
}
