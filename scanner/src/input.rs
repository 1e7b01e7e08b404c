//! Snapshot loading. Provider files are JSON arrays; records that fail to
//! parse or validate are skipped with a warning instead of failing the scan.

use anyhow::{Context, Result};
use common::{CongressionalTrade, Market};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

pub fn load_markets(path: &Path) -> Result<Vec<Market>> {
    let records = read_records::<Market>(path)?;
    let markets = prepare_markets(records);
    info!("Loaded {} markets from {}", markets.len(), path.display());
    Ok(markets)
}

pub fn load_trades(path: &Path) -> Result<Vec<CongressionalTrade>> {
    let records = read_records::<CongressionalTrade>(path)?;
    let trades = prepare_trades(records);
    info!("Loaded {} congressional trades from {}", trades.len(), path.display());
    Ok(trades)
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_records(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parse a JSON array record by record, dropping the ones that don't fit `T`.
pub fn parse_records<T: DeserializeOwned>(content: &str) -> Result<Vec<T>> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(content).context("expected a JSON array")?;

    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect())
}

/// Drop invalid and duplicate markets, and fill in missing sector tags.
pub fn prepare_markets(records: Vec<Market>) -> Vec<Market> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|market| match market.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!(market_id = %market.id, error = %e, "Skipping invalid market");
                false
            }
        })
        .filter(|market| {
            let fresh = seen.insert(market.id.clone());
            if !fresh {
                warn!(market_id = %market.id, "Skipping duplicate market");
            }
            fresh
        })
        .map(|mut market| {
            market.ensure_tags();
            market
        })
        .collect()
}

pub fn prepare_trades(records: Vec<CongressionalTrade>) -> Vec<CongressionalTrade> {
    records
        .into_iter()
        .filter(|trade| match trade.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!(legislator = %trade.legislator, error = %e, "Skipping invalid disclosure");
                false
            }
        })
        .map(|mut trade| {
            trade.ensure_tags();
            trade
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::SectorTag;

    #[test]
    fn test_skips_malformed_and_invalid_markets() {
        let content = r#"[
            {"id": "fed-cut", "question": "Will the Fed cut rates?", "yes_price": 0.3, "no_price": 0.7},
            {"id": "broken", "question": "Missing prices"},
            {"id": "bad-sum", "question": "Prices disagree", "yes_price": 0.9, "no_price": 0.9},
            {"id": "fed-cut", "question": "Duplicate", "yes_price": 0.3, "no_price": 0.7}
        ]"#;
        let records: Vec<Market> = parse_records(content).unwrap();
        assert_eq!(records.len(), 3);

        let markets = prepare_markets(records);
        assert_eq!(markets.len(), 1);
        assert_eq!(markets[0].id, "fed-cut");
        assert!(markets[0].tags.contains(&SectorTag::MonetaryPolicy));
    }

    #[test]
    fn test_skips_invalid_trades() {
        let content = r#"[
            {"legislator": "Sam Ortiz", "chamber": "senate", "party": "D", "ticker": "XOM",
             "asset_description": "Exxon Mobil", "transaction": "sale",
             "amount": "$15,001 - $50,000",
             "transaction_date": "2026-04-01", "disclosure_date": "2026-04-20"},
            {"legislator": "Sam Ortiz", "chamber": "senate", "party": "D", "ticker": "XOM",
             "transaction": "sale", "amount": "$15,001 - $50,000",
             "transaction_date": "2026-04-20", "disclosure_date": "2026-04-01"}
        ]"#;
        let trades = prepare_trades(parse_records(content).unwrap());
        assert_eq!(trades.len(), 1);
        assert!(trades[0].sector_tags.contains(&SectorTag::Energy));
    }

    #[test]
    fn test_rejects_non_array() {
        assert!(parse_records::<Market>(r#"{"id": "x"}"#).is_err());
    }
}
