// Congressional Correlation Signal
// Net direction of recent legislator trades in sectors related to the market

use super::{ExtractionContext, RawSignal, SignalExtractor, SignalKind};
use crate::config::SignalParams;

#[derive(Debug, Clone)]
pub struct CongressionalCorrelationExtractor {
    saturation_scale: f64,
}

impl CongressionalCorrelationExtractor {
    pub fn new(params: &SignalParams) -> Self {
        Self {
            saturation_scale: params.saturation_scale,
        }
    }

    /// Net buy/sell direction scaled by how much evidence there is.
    /// Returns 0 when nothing matched.
    pub fn score(&self, signed_weights: impl IntoIterator<Item = f64>) -> f64 {
        let (net, total) = signed_weights
            .into_iter()
            .fold((0.0, 0.0), |(net, total), w| (net + w, total + w.abs()));
        if total <= 0.0 {
            return 0.0;
        }
        let saturation = 1.0 - (-total / self.saturation_scale).exp();
        (net / total) * saturation
    }
}

impl Default for CongressionalCorrelationExtractor {
    fn default() -> Self {
        Self::new(&SignalParams::default())
    }
}

impl SignalExtractor for CongressionalCorrelationExtractor {
    fn kind(&self) -> SignalKind {
        SignalKind::CongressionalCorrelation
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> RawSignal {
        if ctx.matches.is_empty() {
            return RawSignal::new(
                self.kind(),
                0.0,
                "No related congressional trades in the lookback window",
            );
        }

        let score = self.score(ctx.matches.iter().map(|m| m.signed_weight()));
        let buys = ctx
            .matches
            .iter()
            .filter(|m| m.signed_weight() > 0.0)
            .count();
        let sells = ctx.matches.len() - buys;

        let top = &ctx.matches[0];
        let tags = top
            .shared_tags
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let rationale = format!(
            "{} buy / {} sell disclosures; strongest: {} ({}) {} {} {} days before resolution [{}]",
            buys,
            sells,
            top.trade.legislator,
            top.trade.party.abbreviation(),
            top.trade.transaction,
            if top.trade.ticker.is_empty() {
                top.trade.asset_description.as_str()
            } else {
                top.trade.ticker.as_str()
            },
            top.days_before_anchor,
            tags
        );

        RawSignal::new(self.kind(), score, rationale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::CongressMatcher;
    use crate::signals::SignalStrength;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use common::{AmountRange, Chamber, CongressionalTrade, Market, Party, SectorTag, TransactionType};

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn market() -> Market {
        let mut market = Market::new("chips", "Will the chip export ban pass?", 0.45);
        market.tags = [SectorTag::Technology, SectorTag::TradePolicy].into_iter().collect();
        market.resolves_at = Some(as_of() + Duration::days(20));
        market
    }

    fn trade(days_before_resolution: i64, transaction: TransactionType) -> CongressionalTrade {
        let transacted = (as_of() + Duration::days(20)).date_naive()
            - Duration::days(days_before_resolution);
        CongressionalTrade {
            legislator: "Alex Kim".to_string(),
            chamber: Chamber::House,
            party: Party::Democrat,
            ticker: "NVDA".to_string(),
            asset_description: "NVIDIA Corporation".to_string(),
            sector_tags: [SectorTag::Technology].into_iter().collect(),
            transaction,
            amount: AmountRange::parse("$100,001 - $250,000"),
            transaction_date: transacted,
            disclosure_date: transacted.min(as_of().date_naive()),
        }
    }

    fn score_for(trades: &[CongressionalTrade]) -> (f64, String) {
        let market = market();
        let matches = CongressMatcher::default().find_matches(&market, trades, as_of());
        let ctx = ExtractionContext {
            market: &market,
            matches: &matches,
            as_of: as_of(),
        };
        let raw = CongressionalCorrelationExtractor::default().extract(&ctx);
        match raw.strength {
            SignalStrength::Directional(score) => (score, raw.rationale),
            other => panic!("unexpected strength {:?}", other),
        }
    }

    #[test]
    fn test_no_matches_is_zero() {
        let (score, rationale) = score_for(&[]);
        assert_eq!(score, 0.0);
        assert!(rationale.starts_with("No related"));
    }

    #[test]
    fn test_trade_outside_lookback_is_ignored() {
        let (score, _) = score_for(&[trade(50, TransactionType::Buy)]);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_recent_buy_is_positive() {
        let (score, rationale) = score_for(&[trade(25, TransactionType::Buy)]);
        assert!(score > 0.0);
        assert!(rationale.contains("Alex Kim (D) buy NVDA 25 days"));
    }

    #[test]
    fn test_sales_are_negative() {
        let (score, _) = score_for(&[trade(25, TransactionType::Sell)]);
        assert!(score < 0.0);
    }

    #[test]
    fn test_opposing_trades_offset() {
        let (mixed, _) = score_for(&[
            trade(25, TransactionType::Buy),
            trade(25, TransactionType::Sell),
        ]);
        assert!(mixed.abs() < 1e-12);
    }

    #[test]
    fn test_more_evidence_saturates_higher() {
        let extractor = CongressionalCorrelationExtractor::default();
        let one = extractor.score([0.5]);
        let three = extractor.score([0.5, 0.5, 0.5]);
        assert!(three > one);
        assert!(three < 1.0);
    }
}
