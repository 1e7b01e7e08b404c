// Congressional Trade Disclosures
// Periodic transaction reports filed by House and Senate members

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::tags::SectorTag;

/// Statutory window between a transaction and its required disclosure.
pub const DISCLOSURE_DEADLINE_DAYS: i64 = 45;

/// Disclosures filed within this many days are considered time-sensitive.
pub const QUICK_DISCLOSURE_DAYS: i64 = 7;

/// Band high at or above this (USD) marks a large trade.
pub const LARGE_TRADE_THRESHOLD: i64 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    #[serde(alias = "House")]
    House,
    #[serde(alias = "Senate")]
    Senate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    #[serde(alias = "D", alias = "Democrat", alias = "democratic")]
    Democrat,
    #[serde(alias = "R", alias = "Republican")]
    Republican,
    #[serde(alias = "I", alias = "Independent")]
    Independent,
    Other,
}

impl Party {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Party::Democrat => "D",
            Party::Republican => "R",
            Party::Independent => "I",
            Party::Other => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[serde(alias = "purchase", alias = "Purchase")]
    Buy,
    #[serde(alias = "sale", alias = "Sale", alias = "sale_full", alias = "sale_partial")]
    Sell,
}

impl TransactionType {
    /// +1 for purchases, -1 for sales
    pub fn direction(&self) -> f64 {
        match self {
            TransactionType::Buy => 1.0,
            TransactionType::Sell => -1.0,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Buy => f.write_str("buy"),
            TransactionType::Sell => f.write_str("sell"),
        }
    }
}

/// Disclosed dollar band. Filings report ranges, never exact amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AmountRange {
    pub low: Decimal,
    pub high: Decimal,
}

impl AmountRange {
    pub fn new(low: Decimal, high: Decimal) -> Self {
        Self { low, high }
    }

    /// Smallest reportable band ($1,001 - $15,000)
    pub fn minimum_band() -> Self {
        Self::new(Decimal::from(1_001), Decimal::from(15_000))
    }

    /// Parse a disclosure band such as "$1,001 - $15,000" or "Over $50,000,000".
    /// Unparseable text falls back to the minimum band. An open band too large
    /// to double is read as exactly its lower bound.
    pub fn parse(text: &str) -> Self {
        let cleaned = text.replace(['$', ','], "").to_ascii_lowercase();
        let cleaned = cleaned.trim();

        if let Some(rest) = cleaned.strip_prefix("over") {
            if let Ok(low) = Decimal::from_str(rest.trim()) {
                return Self::new(low, low.checked_mul(Decimal::from(2)).unwrap_or(low));
            }
        }

        if let Some((low, high)) = cleaned.split_once('-') {
            if let (Ok(low), Ok(high)) = (Decimal::from_str(low.trim()), Decimal::from_str(high.trim())) {
                if low <= high {
                    return Self::new(low, high);
                }
            }
        }

        if let Ok(exact) = Decimal::from_str(cleaned) {
            return Self::new(exact, exact);
        }

        Self::minimum_band()
    }

    /// Estimated trade size
    pub fn midpoint(&self) -> Decimal {
        let two = Decimal::from(2);
        match self.low.checked_add(self.high) {
            Some(sum) => sum / two,
            None => self.low / two + self.high / two,
        }
    }
}

impl<'de> Deserialize<'de> for AmountRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Band(String),
            Bounds { low: Decimal, high: Decimal },
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Band(text) => AmountRange::parse(&text),
            Repr::Bounds { low, high } => AmountRange::new(low, high),
        })
    }
}

/// Congressional stock trade disclosure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CongressionalTrade {
    pub legislator: String,
    pub chamber: Chamber,
    pub party: Party,
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub asset_description: String,
    #[serde(default)]
    pub sector_tags: BTreeSet<SectorTag>,
    pub transaction: TransactionType,
    pub amount: AmountRange,
    pub transaction_date: NaiveDate,
    pub disclosure_date: NaiveDate,
}

impl CongressionalTrade {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.legislator.trim().is_empty() {
            return Err(ValidationError::EmptyLegislator);
        }
        if self.disclosure_date < self.transaction_date {
            return Err(ValidationError::DisclosureBeforeTransaction {
                transacted: self.transaction_date.to_string(),
                disclosed: self.disclosure_date.to_string(),
            });
        }
        if self.amount.low > self.amount.high {
            return Err(ValidationError::InvertedAmountRange {
                low: self.amount.low.to_string(),
                high: self.amount.high.to_string(),
            });
        }
        Ok(())
    }

    /// Days between transaction and disclosure
    pub fn disclosure_lag_days(&self) -> i64 {
        (self.disclosure_date - self.transaction_date).num_days()
    }

    /// Last day the filing was legally due
    pub fn disclosure_deadline(&self) -> NaiveDate {
        self.transaction_date + Duration::days(DISCLOSURE_DEADLINE_DAYS)
    }

    /// Large amount or unusually quick disclosure
    pub fn is_unusual(&self) -> bool {
        self.amount.high >= Decimal::from(LARGE_TRADE_THRESHOLD)
            || self.disclosure_lag_days() <= QUICK_DISCLOSURE_DAYS
    }

    /// Re-derive `sector_tags` from the asset description when the provider sent none.
    pub fn ensure_tags(&mut self) {
        if self.sector_tags.is_empty() {
            self.sector_tags =
                SectorTag::classify(&format!("{} {}", self.asset_description, self.ticker));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(transacted: NaiveDate, disclosed: NaiveDate, amount: &str) -> CongressionalTrade {
        CongressionalTrade {
            legislator: "Jane Doe".to_string(),
            chamber: Chamber::Senate,
            party: Party::Independent,
            ticker: "LMT".to_string(),
            asset_description: "Lockheed Martin Corp".to_string(),
            sector_tags: BTreeSet::new(),
            transaction: TransactionType::Buy,
            amount: AmountRange::parse(amount),
            transaction_date: transacted,
            disclosure_date: disclosed,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_standard_band() {
        let range = AmountRange::parse("$15,001 - $50,000");
        assert_eq!(range.low, Decimal::from(15_001));
        assert_eq!(range.high, Decimal::from(50_000));
    }

    #[test]
    fn test_parse_open_ended_band() {
        let range = AmountRange::parse("Over $50,000,000");
        assert_eq!(range.low, Decimal::from(50_000_000));
        assert_eq!(range.high, Decimal::from(100_000_000));
    }

    #[test]
    fn test_parse_garbage_falls_back_to_minimum() {
        assert_eq!(AmountRange::parse("spouse/dependent"), AmountRange::minimum_band());
    }

    #[test]
    fn test_midpoint() {
        let range = AmountRange::parse("$100,001 - $250,000");
        assert_eq!(range.midpoint(), Decimal::new(1750005, 1));
    }

    #[test]
    fn test_huge_bands_do_not_overflow() {
        let huge = Decimal::from_str("50000000000000000000000000000").unwrap();

        let open = AmountRange::parse("Over $50,000,000,000,000,000,000,000,000,000");
        assert_eq!(open.low, huge);
        assert_eq!(open.high, huge);
        assert_eq!(open.midpoint(), huge);

        assert_eq!(AmountRange::new(huge, huge).midpoint(), huge);

        let bounds: AmountRange = serde_json::from_str(r#"{"low": 5e28, "high": 5e28}"#).unwrap();
        assert!(bounds.midpoint() > Decimal::ZERO);

        let widest = AmountRange::new(Decimal::ZERO, Decimal::MAX);
        assert!(widest.midpoint() > Decimal::ZERO);
    }

    #[test]
    fn test_amount_deserializes_from_band_or_bounds() {
        let band: AmountRange = serde_json::from_str("\"$1,001 - $15,000\"").unwrap();
        assert_eq!(band, AmountRange::minimum_band());

        let bounds: AmountRange = serde_json::from_str(r#"{"low": 50001, "high": 100000}"#).unwrap();
        assert_eq!(bounds.high, Decimal::from(100_000));
    }

    #[test]
    fn test_disclosure_timing() {
        let t = trade(date(2026, 3, 1), date(2026, 3, 5), "$1,001 - $15,000");
        assert_eq!(t.disclosure_lag_days(), 4);
        assert_eq!(t.disclosure_deadline(), date(2026, 4, 15));
        assert!(t.is_unusual(), "four-day disclosure is quick");
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_large_late_trade_is_unusual() {
        let t = trade(date(2026, 1, 1), date(2026, 2, 10), "$250,001 - $500,000");
        assert!(t.is_unusual());

        let small = trade(date(2026, 1, 1), date(2026, 2, 10), "$1,001 - $15,000");
        assert!(!small.is_unusual());
    }

    #[test]
    fn test_validate_rejects_disclosure_before_transaction() {
        let t = trade(date(2026, 3, 10), date(2026, 3, 1), "$1,001 - $15,000");
        assert!(matches!(
            t.validate(),
            Err(ValidationError::DisclosureBeforeTransaction { .. })
        ));
    }

    #[test]
    fn test_trade_deserializes_provider_aliases() {
        let json = r#"{
            "legislator": "John Roe",
            "chamber": "House",
            "party": "R",
            "ticker": "XOM",
            "asset_description": "Exxon Mobil Corporation",
            "transaction": "purchase",
            "amount": "$50,001 - $100,000",
            "transaction_date": "2026-05-01",
            "disclosure_date": "2026-05-20"
        }"#;
        let mut t: CongressionalTrade = serde_json::from_str(json).unwrap();
        t.ensure_tags();
        assert_eq!(t.chamber, Chamber::House);
        assert_eq!(t.party, Party::Republican);
        assert_eq!(t.transaction, TransactionType::Buy);
        assert!(t.sector_tags.contains(&SectorTag::Energy));
    }
}
