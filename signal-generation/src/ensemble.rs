// Signal Ensemble
// Runs the five extractors, resolves borrowed directions and combines the weighted readings

use chrono::{DateTime, Utc};
use common::{CongressionalTrade, Market, Position};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::correlation::CongressMatcher;
use crate::error::ScanError;
use crate::signals::{
    CongressionalCorrelationExtractor, DirectionSource, ExtractionContext, OrderImbalanceExtractor,
    Polarity, PriceMomentumExtractor, RawSignal, SignalExtractor, SignalKind, SignalReading,
    SignalStrength, TimingPatternExtractor, VolumeSpikeExtractor,
};

/// Default ensemble weights in basis points
const DEFAULT_WEIGHTS_BPS: [(SignalKind, u32); 5] = [
    (SignalKind::OrderImbalance, 3_000),
    (SignalKind::VolumeSpike, 2_000),
    (SignalKind::CongressionalCorrelation, 2_500),
    (SignalKind::PriceMomentum, 1_500),
    (SignalKind::TimingPattern, 1_000),
];

const fn total_bps(table: &[(SignalKind, u32)]) -> u32 {
    let mut total = 0;
    let mut i = 0;
    while i < table.len() {
        total += table[i].1;
        i += 1;
    }
    total
}

const _: () = assert!(total_bps(&DEFAULT_WEIGHTS_BPS) == 10_000);

fn default_weight(kind: SignalKind) -> f64 {
    DEFAULT_WEIGHTS_BPS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, bps)| f64::from(*bps) / 10_000.0)
        .unwrap_or(0.0)
}

/// Weight per signal kind. Must sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleWeights {
    #[serde(default = "default_order_imbalance")]
    pub order_imbalance: f64,
    #[serde(default = "default_congressional_correlation")]
    pub congressional_correlation: f64,
    #[serde(default = "default_volume_spike")]
    pub volume_spike: f64,
    #[serde(default = "default_price_momentum")]
    pub price_momentum: f64,
    #[serde(default = "default_timing_pattern")]
    pub timing_pattern: f64,
}

fn default_order_imbalance() -> f64 {
    default_weight(SignalKind::OrderImbalance)
}

fn default_congressional_correlation() -> f64 {
    default_weight(SignalKind::CongressionalCorrelation)
}

fn default_volume_spike() -> f64 {
    default_weight(SignalKind::VolumeSpike)
}

fn default_price_momentum() -> f64 {
    default_weight(SignalKind::PriceMomentum)
}

fn default_timing_pattern() -> f64 {
    default_weight(SignalKind::TimingPattern)
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self {
            order_imbalance: default_order_imbalance(),
            congressional_correlation: default_congressional_correlation(),
            volume_spike: default_volume_spike(),
            price_momentum: default_price_momentum(),
            timing_pattern: default_timing_pattern(),
        }
    }
}

impl EnsembleWeights {
    pub fn weight(&self, kind: SignalKind) -> f64 {
        match kind {
            SignalKind::OrderImbalance => self.order_imbalance,
            SignalKind::VolumeSpike => self.volume_spike,
            SignalKind::CongressionalCorrelation => self.congressional_correlation,
            SignalKind::PriceMomentum => self.price_momentum,
            SignalKind::TimingPattern => self.timing_pattern,
        }
    }

    pub fn total(&self) -> f64 {
        SignalKind::ALL.iter().map(|k| self.weight(*k)).sum()
    }

    pub fn validate(&self) -> Result<(), ScanError> {
        for kind in SignalKind::ALL {
            let value = self.weight(kind);
            if !value.is_finite() || value < 0.0 {
                return Err(ScanError::InvalidWeight { kind, value });
            }
        }

        let sum = self.total();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(ScanError::WeightsNotNormalized { sum });
        }

        Ok(())
    }
}

/// Ensemble verdict for one market
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedScore {
    /// Weighted sum of scores in [-1, 1]; positive favors YES
    pub value: f64,
    /// Monotonic, saturating map of |value| into [0, 1]
    pub confidence: f64,
    /// One reading per kind, in extraction order
    pub readings: [SignalReading; 5],
}

impl CombinedScore {
    /// `None` on an exact tie
    pub fn position(&self) -> Option<Position> {
        Position::from_score(self.value)
    }

    pub fn reading(&self, kind: SignalKind) -> &SignalReading {
        &self.readings[kind.index()]
    }

    /// Readings with a nonzero contribution, largest |contribution| first.
    /// Equal contributions keep extraction order.
    pub fn top_contributors(&self, n: usize) -> Vec<&SignalReading> {
        let mut ranked: Vec<&SignalReading> = self
            .readings
            .iter()
            .filter(|r| r.contribution() != 0.0)
            .collect();
        ranked.sort_by(|a, b| b.contribution().abs().total_cmp(&a.contribution().abs()));
        ranked.truncate(n);
        ranked
    }
}

pub struct SignalEnsemble {
    extractors: [Box<dyn SignalExtractor>; 5],
    matcher: CongressMatcher,
    weights: EnsembleWeights,
    confidence_gain: f64,
}

impl SignalEnsemble {
    pub fn new(config: &EngineConfig) -> Self {
        let params = &config.signals;
        Self {
            extractors: [
                Box::new(OrderImbalanceExtractor::new()),
                Box::new(VolumeSpikeExtractor::new(params)),
                Box::new(CongressionalCorrelationExtractor::new(params)),
                Box::new(PriceMomentumExtractor::new()),
                Box::new(TimingPatternExtractor::new(params)),
            ],
            matcher: CongressMatcher::new(params),
            weights: config.weights.clone(),
            confidence_gain: config.confidence_gain,
        }
    }

    /// One resolved reading per signal kind, in `SignalKind::ALL` order.
    pub fn extract_signals(
        &self,
        market: &Market,
        trades: &[CongressionalTrade],
        as_of: DateTime<Utc>,
    ) -> [SignalReading; 5] {
        let matches = self.matcher.find_matches(market, trades, as_of);
        let ctx = ExtractionContext {
            market,
            matches: &matches,
            as_of,
        };

        let raws: [RawSignal; 5] = std::array::from_fn(|i| self.extractors[i].extract(&ctx));
        self.resolve(raws)
    }

    /// Attach weights and settle borrowed directions. Only directional
    /// readings can lend a sign.
    fn resolve(&self, raws: [RawSignal; 5]) -> [SignalReading; 5] {
        let directional: [Option<f64>; 5] = std::array::from_fn(|i| match raws[i].strength {
            SignalStrength::Directional(score) => Some(score),
            SignalStrength::Borrowed { .. } => None,
        });

        let mut dominant: Option<(SignalKind, f64)> = None;
        for kind in SignalKind::ALL {
            let Some(score) = directional[kind.index()] else {
                continue;
            };
            let contribution = score * self.weights.weight(kind);
            if contribution == 0.0 {
                continue;
            }
            match dominant {
                Some((_, best)) if best.abs() >= contribution.abs() => {}
                _ => dominant = Some((kind, contribution)),
            }
        }

        raws.map(|raw| {
            let weight = self.weights.weight(raw.kind);
            let (score, polarity) = match raw.strength {
                SignalStrength::Directional(score) => (score, Polarity::Directional),
                SignalStrength::Borrowed { strength, from } => {
                    let lender = match from {
                        DirectionSource::Signal(kind) => directional[kind.index()]
                            .filter(|score| *score != 0.0)
                            .map(|score| (kind, score)),
                        DirectionSource::Dominant => dominant,
                    };
                    match lender {
                        Some((kind, value)) => {
                            let sign = if value > 0.0 { 1.0 } else { -1.0 };
                            (
                                strength * sign,
                                Polarity::Borrowed { from: Some(kind) },
                            )
                        }
                        None => (0.0, Polarity::Borrowed { from: None }),
                    }
                }
            };

            SignalReading {
                kind: raw.kind,
                score,
                weight,
                rationale: raw.rationale,
                polarity,
            }
        })
    }

    /// Weighted sum and confidence of already-resolved readings
    pub fn combine(&self, readings: [SignalReading; 5]) -> CombinedScore {
        let sum: f64 = readings.iter().map(SignalReading::contribution).sum();
        let value = if sum.is_finite() {
            sum.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let confidence = (self.confidence_gain * value.abs()).tanh().clamp(0.0, 1.0);

        CombinedScore {
            value,
            confidence,
            readings,
        }
    }

    pub fn score_market(
        &self,
        market: &Market,
        trades: &[CongressionalTrade],
        as_of: DateTime<Utc>,
    ) -> CombinedScore {
        self.combine(self.extract_signals(market, trades, as_of))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
    }

    fn ensemble() -> SignalEnsemble {
        SignalEnsemble::new(&EngineConfig::default())
    }

    fn market(buy: f64, sell: f64, volume_24h: f64, avg: f64, yes: f64) -> Market {
        let mut market = Market::new("m1", "Will it happen?", yes);
        market.buy_volume = buy;
        market.sell_volume = sell;
        market.volume_24h = volume_24h;
        market.avg_volume = avg;
        market
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = EnsembleWeights::default();
        assert!((weights.total() - 1.0).abs() < 1e-12);
        assert_eq!(weights.order_imbalance, 0.30);
        assert_eq!(weights.timing_pattern, 0.10);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_weights() {
        let weights = EnsembleWeights {
            order_imbalance: 0.5,
            ..Default::default()
        };
        assert!(matches!(
            weights.validate(),
            Err(ScanError::WeightsNotNormalized { .. })
        ));

        let weights = EnsembleWeights {
            order_imbalance: 0.45,
            price_momentum: -0.15,
            timing_pattern: 0.25,
            ..Default::default()
        };
        assert!(matches!(
            weights.validate(),
            Err(ScanError::InvalidWeight {
                kind: SignalKind::PriceMomentum,
                ..
            })
        ));
    }

    #[test]
    fn test_buy_pressure_example() {
        let market = market(700.0, 300.0, 40_000.0, 10_000.0, 0.72);
        let score = ensemble().score_market(&market, &[], as_of());

        let expected = 0.4 * 0.30 + 1.0 * 0.20 + 0.44 * 0.15;
        assert!((score.value - expected).abs() < 1e-9);
        assert!(score.confidence > 0.5);
        assert_eq!(score.position(), Some(Position::BuyYes));
        assert_eq!(
            score.reading(SignalKind::VolumeSpike).polarity,
            Polarity::Borrowed {
                from: Some(SignalKind::PriceMomentum)
            }
        );
    }

    #[test]
    fn test_volume_spike_follows_price_side() {
        let market = market(0.0, 0.0, 40_000.0, 10_000.0, 0.2);
        let score = ensemble().score_market(&market, &[], as_of());
        assert_eq!(score.reading(SignalKind::VolumeSpike).score, -1.0);
        assert_eq!(score.position(), Some(Position::BuyNo));
    }

    #[test]
    fn test_volume_spike_without_price_direction_is_zero() {
        let market = market(0.0, 0.0, 40_000.0, 10_000.0, 0.5);
        let score = ensemble().score_market(&market, &[], as_of());
        let spike = score.reading(SignalKind::VolumeSpike);
        assert_eq!(spike.score, 0.0);
        assert_eq!(spike.polarity, Polarity::Borrowed { from: None });
        assert_eq!(score.position(), None);
        assert_eq!(score.confidence, 0.0);
    }

    #[test]
    fn test_timing_borrows_dominant_direction() {
        let mut market = market(100.0, 900.0, 80_000.0, 80_000.0, 0.6);
        market.resolves_at = Some(as_of() + Duration::days(1));
        let score = ensemble().score_market(&market, &[], as_of());

        let timing = score.reading(SignalKind::TimingPattern);
        assert!((timing.score + 6.0 / 7.0).abs() < 1e-9);
        assert_eq!(
            timing.polarity,
            Polarity::Borrowed {
                from: Some(SignalKind::OrderImbalance)
            }
        );
    }

    #[test]
    fn test_zero_volume_market_is_neutral() {
        let market = market(0.0, 0.0, 0.0, 0.0, 0.5);
        let readings = ensemble().extract_signals(&market, &[], as_of());
        assert_eq!(readings[SignalKind::OrderImbalance.index()].score, 0.0);
        assert_eq!(readings[SignalKind::VolumeSpike.index()].score, 0.0);
        for (reading, kind) in readings.iter().zip(SignalKind::ALL) {
            assert_eq!(reading.kind, kind);
        }
    }

    #[test]
    fn test_top_contributors_order() {
        let market = market(700.0, 300.0, 40_000.0, 10_000.0, 0.72);
        let score = ensemble().score_market(&market, &[], as_of());
        let top: Vec<SignalKind> = score.top_contributors(3).iter().map(|r| r.kind).collect();
        assert_eq!(
            top,
            vec![
                SignalKind::VolumeSpike,
                SignalKind::OrderImbalance,
                SignalKind::PriceMomentum
            ]
        );
    }

    #[test]
    fn test_confidence_is_monotonic() {
        let ensemble = ensemble();
        let weak = ensemble.score_market(&market(550.0, 450.0, 0.0, 0.0, 0.5), &[], as_of());
        let strong = ensemble.score_market(&market(900.0, 100.0, 0.0, 0.0, 0.5), &[], as_of());
        assert!(strong.confidence > weak.confidence);
        assert!(strong.confidence <= 1.0);
    }
}
