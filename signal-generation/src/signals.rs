use chrono::{DateTime, Utc};
use common::Market;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::correlation::TradeMatch;

pub mod congressional;
pub mod order_imbalance;
pub mod price_momentum;
pub mod timing;
pub mod volume_spike;

pub use congressional::CongressionalCorrelationExtractor;
pub use order_imbalance::OrderImbalanceExtractor;
pub use price_momentum::PriceMomentumExtractor;
pub use timing::TimingPatternExtractor;
pub use volume_spike::VolumeSpikeExtractor;

/// The five informedness signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    OrderImbalance,
    VolumeSpike,
    CongressionalCorrelation,
    PriceMomentum,
    TimingPattern,
}

impl SignalKind {
    /// Extraction order; also the tie-break order for rationale ranking
    pub const ALL: [SignalKind; 5] = [
        SignalKind::OrderImbalance,
        SignalKind::VolumeSpike,
        SignalKind::CongressionalCorrelation,
        SignalKind::PriceMomentum,
        SignalKind::TimingPattern,
    ];

    pub fn index(&self) -> usize {
        match self {
            SignalKind::OrderImbalance => 0,
            SignalKind::VolumeSpike => 1,
            SignalKind::CongressionalCorrelation => 2,
            SignalKind::PriceMomentum => 3,
            SignalKind::TimingPattern => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::OrderImbalance => "order_imbalance",
            SignalKind::VolumeSpike => "volume_spike",
            SignalKind::CongressionalCorrelation => "congressional_correlation",
            SignalKind::PriceMomentum => "price_momentum",
            SignalKind::TimingPattern => "timing_pattern",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignalKind::OrderImbalance => "Order imbalance",
            SignalKind::VolumeSpike => "Volume spike",
            SignalKind::CongressionalCorrelation => "Congressional correlation",
            SignalKind::PriceMomentum => "Price momentum",
            SignalKind::TimingPattern => "Timing pattern",
        }
    }

    /// Where a magnitude-only signal takes its sign from. `None` for signals
    /// that carry their own direction.
    pub fn direction_source(&self) -> Option<DirectionSource> {
        match self {
            SignalKind::VolumeSpike => Some(DirectionSource::Signal(SignalKind::PriceMomentum)),
            SignalKind::TimingPattern => Some(DirectionSource::Dominant),
            _ => None,
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sibling a magnitude-only signal borrows its direction from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionSource {
    /// A specific directional sibling
    Signal(SignalKind),
    /// Whichever directional sibling has the largest weighted contribution
    Dominant,
}

/// Raw extractor output, before direction borrowing is resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalStrength {
    /// Signed score in [-1, 1]; positive favors YES
    Directional(f64),
    /// Strength in [-1, 1] applied along a borrowed direction. Negative
    /// strength is evidence against the borrowed side.
    Borrowed { strength: f64, from: DirectionSource },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawSignal {
    pub kind: SignalKind,
    pub strength: SignalStrength,
    pub rationale: String,
}

impl RawSignal {
    /// Non-finite values become 0; everything is clamped into [-1, 1].
    pub fn new(kind: SignalKind, value: f64, rationale: impl Into<String>) -> Self {
        let value = sanitize(value);
        let strength = match kind.direction_source() {
            Some(from) => SignalStrength::Borrowed { strength: value, from },
            None => SignalStrength::Directional(value),
        };
        Self {
            kind,
            strength,
            rationale: rationale.into(),
        }
    }

    /// Neutral reading for malformed or missing fields
    pub fn insufficient(kind: SignalKind, reason: &str) -> Self {
        Self::new(kind, 0.0, format!("Insufficient data: {}", reason))
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// How the sign of a reading was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Polarity {
    Directional,
    /// `from` is `None` when no sibling had a direction to lend
    Borrowed { from: Option<SignalKind> },
}

/// Resolved, weighted signal for one market
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalReading {
    pub kind: SignalKind,
    /// Score in [-1, 1]; sign is direction (positive = YES), magnitude is strength
    pub score: f64,
    pub weight: f64,
    pub rationale: String,
    pub polarity: Polarity,
}

impl SignalReading {
    /// Weighted contribution to the combined score
    pub fn contribution(&self) -> f64 {
        self.score * self.weight
    }
}

/// Everything an extractor may look at for one market
#[derive(Debug, Clone, Copy)]
pub struct ExtractionContext<'a> {
    pub market: &'a Market,
    /// Congressional trades matched to this market, strongest first
    pub matches: &'a [TradeMatch<'a>],
    /// Reference instant for all time-based computations
    pub as_of: DateTime<Utc>,
}

/// Signal extractor trait. Extractors never fail: bad input yields a
/// neutral reading with an explanatory rationale.
pub trait SignalExtractor: Send + Sync {
    fn kind(&self) -> SignalKind;
    fn extract(&self, ctx: &ExtractionContext<'_>) -> RawSignal;
}

/// True for finite, non-negative quantities
pub(crate) fn is_quantity(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_order_matches_index() {
        for (i, kind) in SignalKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_raw_signal_clamps_and_sanitizes() {
        let raw = RawSignal::new(SignalKind::OrderImbalance, 3.0, "x");
        assert_eq!(raw.strength, SignalStrength::Directional(1.0));

        let raw = RawSignal::new(SignalKind::PriceMomentum, f64::NAN, "x");
        assert_eq!(raw.strength, SignalStrength::Directional(0.0));
    }

    #[test]
    fn test_magnitude_kinds_are_borrowed() {
        let raw = RawSignal::new(SignalKind::VolumeSpike, 0.5, "x");
        assert_eq!(
            raw.strength,
            SignalStrength::Borrowed {
                strength: 0.5,
                from: DirectionSource::Signal(SignalKind::PriceMomentum)
            }
        );

        let raw = RawSignal::insufficient(SignalKind::TimingPattern, "no dates");
        assert!(matches!(
            raw.strength,
            SignalStrength::Borrowed { strength, from: DirectionSource::Dominant } if strength == 0.0
        ));
        assert!(raw.rationale.starts_with("Insufficient data"));
    }
}
