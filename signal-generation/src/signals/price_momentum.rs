// Price Momentum Signal
// Conviction near price extremes, signed toward the side the market favors

use super::{ExtractionContext, RawSignal, SignalExtractor, SignalKind};

#[derive(Debug, Clone, Default)]
pub struct PriceMomentumExtractor;

impl PriceMomentumExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 2 * (p - 0.5): 0 at even odds, saturating at +/-1 toward 1 or 0
    pub fn momentum(yes_probability: f64) -> f64 {
        ((yes_probability - 0.5) * 2.0).clamp(-1.0, 1.0)
    }
}

impl SignalExtractor for PriceMomentumExtractor {
    fn kind(&self) -> SignalKind {
        SignalKind::PriceMomentum
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> RawSignal {
        let Some(yes) = ctx.market.yes_probability() else {
            return RawSignal::insufficient(self.kind(), "price pair missing or inconsistent");
        };

        let score = Self::momentum(yes);
        let rationale = if score > 0.0 {
            format!("Conviction toward YES: priced at {:.0}%", yes * 100.0)
        } else if score < 0.0 {
            format!("Conviction toward NO: YES priced at {:.0}%", yes * 100.0)
        } else {
            "Even odds: no price conviction".to_string()
        };

        RawSignal::new(self.kind(), score, rationale)
    }
}
