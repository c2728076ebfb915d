//! Candidate catalogs
//!
//! A catalog supplies the ordered list of unreconciled transactions a
//! session matches against. The session treats it as read-only; catalogs
//! must keep their order stable and must not repeat an id.

mod csv;
mod json;
mod sample;

pub use self::csv::{ColumnMapping, CsvCatalog};
pub use self::json::JsonCatalog;
pub use self::sample::SampleCatalog;

use std::collections::HashSet;

use crate::error::{MatchError, MatchResult};
use crate::models::MatchItem;

/// Source of candidate items for a matching session
pub trait TransactionCatalog {
    /// Load all candidates in catalog order
    fn load(&self) -> MatchResult<Vec<MatchItem>>;

    /// Load and check the catalog contract
    fn load_validated(&self) -> MatchResult<Vec<MatchItem>> {
        let items = self.load()?;
        validate_candidates(&items)?;
        Ok(items)
    }
}

/// Check that no id appears twice
pub fn validate_candidates(items: &[MatchItem]) -> MatchResult<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id()) {
            return Err(MatchError::DuplicateItem(item.id().to_string()));
        }
    }
    Ok(())
}

/// Prefix an amount error with the record it came from
fn at_record(record: usize, err: MatchError) -> MatchError {
    match err {
        MatchError::InvalidAmount(msg) => {
            MatchError::InvalidAmount(format!("record {}: {}", record, msg))
        }
        other => other,
    }
}
