//! Built-in demo catalog of open sales invoices

use crate::error::MatchResult;
use crate::models::money::DEFAULT_SCALE;
use crate::models::{MatchItem, Money};

use super::{at_record, TransactionCatalog};

const SAMPLE_INVOICES: &[(&str, &str, &str, &str)] = &[
    ("1", "City Limousines", "30 Aug", "249.00"),
    ("2", "Ridgeway University", "12 Sep", "618.50"),
    ("3", "Cube Land", "22 Sep", "495.00"),
    ("4", "Bayside Club", "23 Sep", "234.00"),
    ("5", "SMART Agency", "12 Sep", "250.00"),
    ("6", "PowerDirect", "11 Sep", "108.60"),
    ("7", "PC Complete", "17 Sep", "216.99"),
    ("8", "Truxton Properties", "17 Sep", "181.25"),
    ("9", "MCO Cleaning Services", "17 Sep", "170.50"),
    ("10", "Gateway Motors", "18 Sep", "411.35"),
];

/// Fixed list of ten sales invoices, used when no catalog file is given
#[derive(Debug, Clone, Copy)]
pub struct SampleCatalog {
    scale: u32,
}

impl SampleCatalog {
    pub fn new() -> Self {
        Self {
            scale: DEFAULT_SCALE,
        }
    }

    /// Number of fractional digits amounts are read at
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for SampleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionCatalog for SampleCatalog {
    fn load(&self) -> MatchResult<Vec<MatchItem>> {
        SAMPLE_INVOICES
            .iter()
            .enumerate()
            .map(|(idx, &(id, paid_to, date, amount))| {
                let amount =
                    Money::parse_with_scale(amount, self.scale).map_err(|e| at_record(idx + 1, e))?;
                Ok(MatchItem::new(id, paid_to, date, amount, "Sales Invoice"))
            })
            .collect()
    }
}
