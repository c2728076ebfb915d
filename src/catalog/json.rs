//! JSON catalog files
//!
//! A catalog file is a JSON array of records:
//!
//! ```json
//! [
//!   { "id": "1", "paid_to": "City Limousines", "transaction_date": "30 Aug",
//!     "amount": "249.00", "doc_type": "Sales Invoice" }
//! ]
//! ```
//!
//! `amount` may be a decimal string or a number. Records without an `id`
//! get a generated one.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{MatchError, MatchResult};
use crate::models::money::{RawAmount, DEFAULT_SCALE};
use crate::models::{ItemId, MatchItem};

use super::{at_record, TransactionCatalog};

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(alias = "payee")]
    paid_to: String,
    #[serde(default, alias = "date")]
    transaction_date: String,
    amount: RawAmount,
    #[serde(default)]
    doc_type: String,
}

/// Catalog backed by a JSON file
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
    scale: u32,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            scale: DEFAULT_SCALE,
        }
    }

    /// Number of fractional digits amounts are read at
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse records from any reader
    pub fn parse_from_reader<R: Read>(reader: R, scale: u32) -> MatchResult<Vec<MatchItem>> {
        let records: Vec<CatalogRecord> = serde_json::from_reader(reader)
            .map_err(|e| MatchError::Catalog(format!("Failed to parse catalog: {}", e)))?;

        records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| {
                let amount = record
                    .amount
                    .to_money(scale)
                    .map_err(|e| at_record(idx + 1, e))?;
                let id = match record.id {
                    Some(id) if !id.trim().is_empty() => ItemId::from(id.trim()),
                    _ => ItemId::generate(),
                };
                Ok(MatchItem::new(
                    id,
                    record.paid_to,
                    record.transaction_date,
                    amount,
                    record.doc_type,
                ))
            })
            .collect()
    }
}

impl TransactionCatalog for JsonCatalog {
    fn load(&self) -> MatchResult<Vec<MatchItem>> {
        if !self.path.exists() {
            return Err(MatchError::Catalog(format!(
                "File not found: {}",
                self.path.display()
            )));
        }

        let file = File::open(&self.path).map_err(|e| {
            MatchError::Catalog(format!("Failed to open {}: {}", self.path.display(), e))
        })?;

        Self::parse_from_reader(BufReader::new(file), self.scale)
    }
}
