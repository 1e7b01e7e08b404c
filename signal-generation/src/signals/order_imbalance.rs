// Order Imbalance Signal
// Signed buy/sell pressure on the YES book, the most robust informedness predictor

use super::{is_quantity, ExtractionContext, RawSignal, SignalExtractor, SignalKind};

/// Emits (buy - sell) / (buy + sell) untransformed.
#[derive(Debug, Clone, Default)]
pub struct OrderImbalanceExtractor;

impl OrderImbalanceExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Imbalance in [-1, 1]; 0 for an empty book
    pub fn imbalance(buy_volume: f64, sell_volume: f64) -> f64 {
        let total = buy_volume + sell_volume;
        if total <= 0.0 {
            return 0.0;
        }
        (buy_volume - sell_volume) / total
    }
}

impl SignalExtractor for OrderImbalanceExtractor {
    fn kind(&self) -> SignalKind {
        SignalKind::OrderImbalance
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> RawSignal {
        let market = ctx.market;
        let (buy, sell) = (market.buy_volume, market.sell_volume);

        if !is_quantity(buy) || !is_quantity(sell) {
            return RawSignal::insufficient(self.kind(), "order book volumes missing or negative");
        }

        if buy + sell == 0.0 {
            return RawSignal::new(self.kind(), 0.0, "Empty order book");
        }

        let imbalance = Self::imbalance(buy, sell);
        let rationale = if imbalance > 0.0 {
            format!(
                "Buy pressure: {:.1}% order imbalance ({:.0} bid vs {:.0} ask)",
                imbalance * 100.0,
                buy,
                sell
            )
        } else if imbalance < 0.0 {
            format!(
                "Sell pressure: {:.1}% order imbalance ({:.0} bid vs {:.0} ask)",
                imbalance.abs() * 100.0,
                buy,
                sell
            )
        } else {
            format!("Balanced order book ({:.0} each side)", buy)
        };

        RawSignal::new(self.kind(), imbalance, rationale)
    }
}
