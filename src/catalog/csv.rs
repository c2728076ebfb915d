//! CSV catalog files
//!
//! Column positions are configurable through [`ColumnMapping`]. When the
//! file has a header row the mapping can be detected from the column names.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use ::csv::{ReaderBuilder, StringRecord};

use crate::error::{MatchError, MatchResult};
use crate::models::money::DEFAULT_SCALE;
use crate::models::{ItemId, MatchItem, Money};

use super::{at_record, TransactionCatalog};

/// Column mapping configuration for CSV catalogs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Index of the id column; ids are generated when absent
    pub id_column: Option<usize>,
    /// Index of the payee/customer column
    pub paid_to_column: usize,
    /// Index of the transaction date column
    pub date_column: Option<usize>,
    /// Index of the amount column
    pub amount_column: usize,
    /// Index of the document type column
    pub doc_type_column: Option<usize>,
    /// Whether the first row is a header
    pub has_header: bool,
    /// Delimiter character
    pub delimiter: char,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            id_column: Some(0),
            paid_to_column: 1,
            date_column: Some(2),
            amount_column: 3,
            doc_type_column: Some(4),
            has_header: true,
            delimiter: ',',
        }
    }
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bank-style export with payee, date and amount and no ids
    pub fn without_ids() -> Self {
        Self {
            id_column: None,
            paid_to_column: 0,
            date_column: Some(1),
            amount_column: 2,
            doc_type_column: None,
            has_header: true,
            delimiter: ',',
        }
    }

    /// Set whether first row is header
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Set the delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Detect column positions from a header record
    ///
    /// Returns `None` when no amount or payee column can be found.
    pub fn detect_from_headers(headers: &StringRecord) -> Option<Self> {
        let mut id_column = None;
        let mut paid_to_column = None;
        let mut date_column = None;
        let mut amount_column = None;
        let mut doc_type_column = None;

        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase();

            if h == "id" || h.ends_with(" id") || h.ends_with("_id") {
                id_column.get_or_insert(idx);
            } else if h.contains("date") {
                date_column.get_or_insert(idx);
            } else if h.contains("amount") || h.contains("total") {
                amount_column.get_or_insert(idx);
            } else if h.contains("type") {
                doc_type_column.get_or_insert(idx);
            } else if h.contains("paid")
                || h.contains("payee")
                || h.contains("customer")
                || h.contains("name")
            {
                paid_to_column.get_or_insert(idx);
            }
        }

        Some(Self {
            id_column,
            paid_to_column: paid_to_column?,
            date_column,
            amount_column: amount_column?,
            doc_type_column,
            has_header: true,
            delimiter: ',',
        })
    }
}

/// Catalog backed by a CSV file
#[derive(Debug, Clone)]
pub struct CsvCatalog {
    path: PathBuf,
    mapping: Option<ColumnMapping>,
    scale: u32,
}

impl CsvCatalog {
    /// Catalog whose column mapping is detected from the header row
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mapping: None,
            scale: DEFAULT_SCALE,
        }
    }

    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.mapping = Some(mapping);
        self
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
    pub fn parse_from_reader<R: Read>(
        reader: R,
        mapping: Option<&ColumnMapping>,
        scale: u32,
    ) -> MatchResult<Vec<MatchItem>> {
        let delimiter = mapping.map(|m| m.delimiter).unwrap_or(',');
        let has_header = mapping.map(|m| m.has_header).unwrap_or(true);
        let delimiter = u8::try_from(delimiter)
            .map_err(|_| MatchError::Catalog(format!("Unsupported delimiter: {:?}", delimiter)))?;

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(has_header)
            .flexible(true)
            .from_reader(reader);

        let mapping = match mapping {
            Some(mapping) => mapping.clone(),
            None => {
                let headers = reader.headers()?;
                ColumnMapping::detect_from_headers(headers).ok_or_else(|| {
                    MatchError::Catalog(
                        "Could not detect payee and amount columns from header".into(),
                    )
                })?
            }
        };

        let mut items = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            let item = parse_record(&record, &mapping, scale).map_err(|e| at_record(idx + 1, e))?;
            items.push(item);
        }
        Ok(items)
    }
}

fn parse_record(
    record: &StringRecord,
    mapping: &ColumnMapping,
    scale: u32,
) -> MatchResult<MatchItem> {
    let field = |col: Option<usize>| {
        col.and_then(|c| record.get(c))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let amount_str = record
        .get(mapping.amount_column)
        .ok_or_else(|| MatchError::InvalidAmount("missing amount column".into()))?;
    let amount = Money::parse_with_scale(amount_str.trim(), scale)?;

    let id = match field(mapping.id_column) {
        id if id.is_empty() => ItemId::generate(),
        id => ItemId::new(id),
    };

    Ok(MatchItem::new(
        id,
        field(Some(mapping.paid_to_column)),
        field(mapping.date_column),
        amount,
        field(mapping.doc_type_column),
    ))
}

impl TransactionCatalog for CsvCatalog {
    fn load(&self) -> MatchResult<Vec<MatchItem>> {
        let file = File::open(&self.path).map_err(|e| {
            MatchError::Catalog(format!("Failed to open {}: {}", self.path.display(), e))
        })?;
        Self::parse_from_reader(file, self.mapping.as_ref(), self.scale)
    }
}
