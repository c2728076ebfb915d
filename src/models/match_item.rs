//! Candidate record offered for matching against a bank statement line

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::ids::ItemId;
use super::money::{self, Money};

/// An unreconciled transaction eligible for matching
///
/// Immutable once created. Identity is the `id` alone: two items with the
/// same payee, date and amount but different ids are distinct entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchItem {
    id: ItemId,
    paid_to: String,
    transaction_date: String,
    #[serde(with = "money::decimal")]
    amount: Money,
    #[serde(default)]
    doc_type: String,
}

impl MatchItem {
    pub fn new(
        id: impl Into<ItemId>,
        paid_to: impl Into<String>,
        transaction_date: impl Into<String>,
        amount: Money,
        doc_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            paid_to: paid_to.into(),
            transaction_date: transaction_date.into(),
            amount,
            doc_type: doc_type.into(),
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Payee or customer the transaction was made to
    pub fn paid_to(&self) -> &str {
        &self.paid_to
    }

    pub fn transaction_date(&self) -> &str {
        &self.transaction_date
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    /// Document type, e.g. "Sales Invoice"
    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }
}

impl PartialEq for MatchItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MatchItem {}

impl Hash for MatchItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, minor: i64) -> MatchItem {
        MatchItem::new(id, "City Limousines", "30 Aug", Money::from_minor(minor), "Sales Invoice")
    }

    #[test]
    fn test_identity_is_by_id() {
        let a = item("1", 24900);
        let b = item("2", 24900);
        let a_again = MatchItem::new("1", "Someone Else", "1 Jan", Money::zero(), "Bill");

        assert_ne!(a, b);
        assert_eq!(a, a_again);
    }

    #[test]
    fn test_accessors() {
        let i = item("1", 24900);
        assert_eq!(i.id().as_str(), "1");
        assert_eq!(i.paid_to(), "City Limousines");
        assert_eq!(i.transaction_date(), "30 Aug");
        assert_eq!(i.amount(), Money::from_minor(24900));
        assert_eq!(i.doc_type(), "Sales Invoice");
    }

    #[test]
    fn test_deserialize_catalog_record() {
        let json = r#"{
            "id": "7",
            "paid_to": "PC Complete",
            "transaction_date": "17 Sep",
            "amount": 216.99,
            "doc_type": "Sales Invoice"
        }"#;
        let i: MatchItem = serde_json::from_str(json).unwrap();
        assert_eq!(i.amount().minor_units(), 21699);
        assert_eq!(i.id(), &ItemId::new("7"));
    }

    #[test]
    fn test_deserialize_rejects_imprecise_amount() {
        let json = r#"{"id": "1", "paid_to": "X", "transaction_date": "", "amount": "1.234"}"#;
        assert!(serde_json::from_str::<MatchItem>(json).is_err());
    }
}
