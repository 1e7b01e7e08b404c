// Recommendation Pipeline
// Scores every market in a batch, filters, ranks and builds recommendations

use chrono::{DateTime, Utc};
use common::{CongressionalTrade, Market, Position};
use portfolio_risk::{PositionSizer, SizingResult};
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::ensemble::{CombinedScore, SignalEnsemble};
use crate::error::ScanError;
use crate::signals::{SignalKind, SignalReading};
use crate::validators::{CompositeValidator, RecommendationValidator};

/// A market after scoring and sizing, before filtering
#[derive(Debug, Clone)]
pub struct ScoredMarket<'a> {
    pub market: &'a Market,
    pub score: CombinedScore,
    pub position: Option<Position>,
    /// `None` when there is no position or the price pair is unusable
    pub sizing: Option<SizingResult>,
}

impl ScoredMarket<'_> {
    pub fn expected_edge(&self) -> f64 {
        self.sizing.map_or(0.0, |s| s.expected_edge)
    }
}

/// Actionable, ranked trade suggestion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub market_id: String,
    pub question: String,
    pub position: Position,
    pub confidence: f64,
    /// Combined ensemble score in [-1, 1]
    pub combined_score: f64,
    /// Current price of the recommended side
    pub current_price: f64,
    /// Probability points
    pub expected_edge: f64,
    pub kelly_fraction: f64,
    pub suggested_fraction: f64,
    pub primary_signal: Option<SignalKind>,
    pub rationale: Vec<String>,
    pub trade_url: String,
    pub resolves_at: Option<DateTime<Utc>>,
}

impl Recommendation {
    /// Dollar stake for a given bankroll
    pub fn stake(&self, bankroll: f64) -> f64 {
        if bankroll.is_finite() && bankroll > 0.0 {
            bankroll * self.suggested_fraction
        } else {
            0.0
        }
    }
}

/// Recommendation pipeline
pub struct RecommendationPipeline {
    config: EngineConfig,
    ensemble: SignalEnsemble,
    sizer: PositionSizer,
}

impl Default for RecommendationPipeline {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

impl RecommendationPipeline {
    /// Create a pipeline from a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self, ScanError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        info!(
            weights = ?config.weights,
            confidence_gain = config.confidence_gain,
            "Initialized recommendation pipeline"
        );
        Self {
            ensemble: SignalEnsemble::new(&config),
            sizer: PositionSizer::new(config.sizing.clone()),
            config,
        }
    }

    /// Resolved readings for one market
    pub fn extract_signals(
        &self,
        market: &Market,
        trades: &[CongressionalTrade],
        as_of: DateTime<Utc>,
    ) -> [SignalReading; 5] {
        self.ensemble.extract_signals(market, trades, as_of)
    }

    /// Score and size one market
    pub fn evaluate<'a>(
        &self,
        market: &'a Market,
        trades: &[CongressionalTrade],
        as_of: DateTime<Utc>,
    ) -> ScoredMarket<'a> {
        let score = self.ensemble.score_market(market, trades, as_of);
        let position = score.position();
        let sizing = position
            .and_then(|p| market.price_for(p))
            .map(|price| self.sizer.size(score.confidence, price));

        debug!(
            market_id = %market.id,
            combined = score.value,
            confidence = score.confidence,
            position = ?position,
            "Scored market"
        );

        ScoredMarket {
            market,
            score,
            position,
            sizing,
        }
    }

    /// Ranked recommendations for a batch of markets.
    ///
    /// Markets are scored in parallel; the result depends only on the inputs.
    pub fn build_recommendations(
        &self,
        markets: &[Market],
        trades: &[CongressionalTrade],
        min_confidence: f64,
        max_results: usize,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<Recommendation>, ScanError> {
        if !min_confidence.is_finite() || !(0.0..=1.0).contains(&min_confidence) {
            return Err(ScanError::InvalidMinConfidence(min_confidence));
        }
        if max_results == 0 {
            return Err(ScanError::InvalidMaxResults);
        }

        let validator = CompositeValidator::standard(min_confidence);

        let mut candidates: Vec<ScoredMarket<'_>> = markets
            .par_iter()
            .map(|market| self.evaluate(market, trades, as_of))
            .filter(|candidate| validator.validate(candidate))
            .collect();

        let passed = candidates.len();
        candidates.sort_by(rank_order);
        candidates.truncate(max_results);

        let recommendations: Vec<Recommendation> = candidates
            .iter()
            .filter_map(|candidate| self.recommend(candidate))
            .collect();

        info!(
            markets = markets.len(),
            trades = trades.len(),
            passed,
            returned = recommendations.len(),
            "Built recommendations"
        );

        Ok(recommendations)
    }

    fn recommend(&self, candidate: &ScoredMarket<'_>) -> Option<Recommendation> {
        let position = candidate.position?;
        let sizing = candidate.sizing?;
        let market = candidate.market;
        let top = candidate
            .score
            .top_contributors(self.config.rationale_depth);

        Some(Recommendation {
            market_id: market.id.clone(),
            question: market.question.clone(),
            position,
            confidence: candidate.score.confidence,
            combined_score: candidate.score.value,
            current_price: sizing.side_price,
            expected_edge: sizing.expected_edge,
            kelly_fraction: sizing.kelly_fraction,
            suggested_fraction: sizing.suggested_fraction,
            primary_signal: top.first().map(|r| r.kind),
            rationale: top.iter().map(|r| format_rationale(r)).collect(),
            trade_url: self.trade_link(&market.id),
            resolves_at: market.resolves_at,
        })
    }

    pub fn trade_link(&self, market_id: &str) -> String {
        self.config.trade_link_template.replace("{id}", market_id)
    }
}

/// Confidence desc, then expected edge desc, then market id asc
pub fn rank_order(a: &ScoredMarket<'_>, b: &ScoredMarket<'_>) -> Ordering {
    b.score
        .confidence
        .total_cmp(&a.score.confidence)
        .then_with(|| b.expected_edge().total_cmp(&a.expected_edge()))
        .then_with(|| a.market.id.cmp(&b.market.id))
}

fn format_rationale(reading: &SignalReading) -> String {
    format!(
        "[{} {:+.3}] {}",
        reading.kind.label(),
        reading.contribution(),
        reading.rationale
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
    }

    fn pressured(id: &str, buy: f64, sell: f64) -> Market {
        let mut market = Market::new(id, format!("Question {}", id), 0.5);
        market.buy_volume = buy;
        market.sell_volume = sell;
        market
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let pipeline = RecommendationPipeline::default();
        for bad in [-0.1, 1.5, f64::NAN] {
            assert!(matches!(
                pipeline.build_recommendations(&[], &[], bad, 10, as_of()),
                Err(ScanError::InvalidMinConfidence(_))
            ));
        }
        assert_eq!(
            pipeline.build_recommendations(&[], &[], 0.5, 0, as_of()),
            Err(ScanError::InvalidMaxResults)
        );
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.weights.volume_spike = 0.9;
        assert!(matches!(
            RecommendationPipeline::new(config),
            Err(ScanError::WeightsNotNormalized { .. })
        ));
    }

    #[test]
    fn test_empty_batch() {
        let pipeline = RecommendationPipeline::default();
        let recs = pipeline.build_recommendations(&[], &[], 0.0, 5, as_of()).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn test_ranks_by_confidence_then_id() {
        let pipeline = RecommendationPipeline::default();
        let markets = vec![
            pressured("b", 900.0, 100.0),
            pressured("c", 600.0, 400.0),
            pressured("a", 900.0, 100.0),
        ];
        let recs = pipeline
            .build_recommendations(&markets, &[], 0.0, 10, as_of())
            .unwrap();
        let ids: Vec<&str> = recs.iter().map(|r| r.market_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_truncates_to_max_results() {
        let pipeline = RecommendationPipeline::default();
        let markets: Vec<Market> = (0..6)
            .map(|i| pressured(&format!("m{}", i), 700.0 + i as f64 * 10.0, 300.0))
            .collect();
        let recs = pipeline
            .build_recommendations(&markets, &[], 0.0, 2, as_of())
            .unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].market_id, "m5");
        assert_eq!(recs[1].market_id, "m4");
    }

    #[test]
    fn test_recommendation_fields() {
        let pipeline = RecommendationPipeline::default();
        let markets = vec![pressured("fed-cut", 100.0, 900.0)];
        let recs = pipeline
            .build_recommendations(&markets, &[], 0.0, 1, as_of())
            .unwrap();

        let rec = &recs[0];
        assert_eq!(rec.position, Position::BuyNo);
        assert_eq!(rec.primary_signal, Some(SignalKind::OrderImbalance));
        assert_eq!(rec.trade_url, "https://polymarket.com/event/fed-cut");
        assert_eq!(rec.rationale.len(), 1);
        assert!(rec.rationale[0].starts_with("[Order imbalance -0.240] Sell pressure"));
        assert!(rec.suggested_fraction > 0.0);
        assert!(rec.suggested_fraction <= 0.05);
        assert!((rec.stake(1_000.0) - rec.suggested_fraction * 1_000.0).abs() < 1e-9);
        assert_eq!(rec.stake(-1.0), 0.0);
        assert_eq!(rec.stake(f64::NAN), 0.0);
    }

    #[test]
    fn test_rationale_depth_limits_lines() {
        let config = EngineConfig {
            rationale_depth: 1,
            ..Default::default()
        };
        let pipeline = RecommendationPipeline::new(config).unwrap();
        let mut market = pressured("m1", 700.0, 300.0);
        market.yes_price = 0.72;
        market.no_price = 0.28;
        market.volume_24h = 40_000.0;
        market.avg_volume = 10_000.0;

        let recs = pipeline
            .build_recommendations(&[market], &[], 0.0, 1, as_of())
            .unwrap();
        assert_eq!(recs[0].rationale.len(), 1);
        assert_eq!(recs[0].primary_signal, Some(SignalKind::VolumeSpike));
    }
}
