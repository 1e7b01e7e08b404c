// Kelly Criterion Position Sizing
// Converts ensemble confidence and a binary-outcome price into a capped stake fraction

use serde::Serialize;
use tracing::debug;

use crate::config::SizingConfig;

/// Sizing outcome for one side of one market
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizingResult {
    /// Price paid for the chosen side
    pub side_price: f64,
    /// Believed fair probability minus `side_price`
    pub expected_edge: f64,
    /// Full (undamped) Kelly fraction; may be negative
    pub kelly_fraction: f64,
    /// Damped, capped fraction of bankroll to stake
    pub suggested_fraction: f64,
}

impl SizingResult {
    fn flat(side_price: f64) -> Self {
        Self {
            side_price,
            expected_edge: 0.0,
            kelly_fraction: 0.0,
            suggested_fraction: 0.0,
        }
    }

    /// Zero size means no recommendation.
    pub fn is_actionable(&self) -> bool {
        self.suggested_fraction > 0.0
    }
}

/// Fractional-Kelly sizer for binary markets paying 1 on the winning side
#[derive(Debug, Clone, Default)]
pub struct PositionSizer {
    config: SizingConfig,
}

impl PositionSizer {
    pub fn new(config: SizingConfig) -> Self {
        Self { config }
    }

    /// Edge credited to the ensemble, shrunk when the market already leans
    /// toward the recommended side.
    ///
    /// The shrink is quadratic in the remaining room. A linear shrink of
    /// 2(1 - q) would cancel the Kelly denominator and leave the stake flat
    /// in price.
    pub fn expected_edge(&self, confidence: f64, side_price: f64) -> f64 {
        if !confidence.is_finite() || !side_price.is_finite() {
            return 0.0;
        }
        let lean = (side_price - 0.5).max(0.0) * 2.0;
        let room = (1.0 - lean).clamp(0.0, 1.0);
        confidence.clamp(0.0, 1.0) * self.config.max_edge * room * room
    }

    /// Full Kelly for buying at `price` with payout 1.
    ///
    /// With b = (1 - q) / q and p = q + edge, f* = (b*p - (1 - p)) / b
    /// reduces to edge / (1 - q).
    pub fn kelly_fraction(edge: f64, price: f64) -> f64 {
        if !edge.is_finite() || !price.is_finite() || price <= 0.0 || price >= 1.0 {
            return 0.0;
        }
        edge / (1.0 - price)
    }

    /// Size a position on the side priced at `side_price`.
    pub fn size(&self, confidence: f64, side_price: f64) -> SizingResult {
        if !side_price.is_finite() || side_price <= 0.0 || side_price >= 1.0 {
            debug!(side_price, "Degenerate side price, sizing flat");
            return SizingResult::flat(side_price);
        }

        let expected_edge = self.expected_edge(confidence, side_price);
        let kelly_fraction = Self::kelly_fraction(expected_edge, side_price);

        let suggested_fraction = if kelly_fraction > 0.0 {
            (kelly_fraction * self.config.kelly_multiplier)
                .clamp(0.0, self.config.max_bankroll_fraction)
        } else {
            0.0
        };

        SizingResult {
            side_price,
            expected_edge,
            kelly_fraction,
            suggested_fraction,
        }
    }
}
