// Volume Spike Signal
// 24h volume against its trailing average; direction comes from the price position

use super::{is_quantity, ExtractionContext, RawSignal, SignalExtractor, SignalKind};
use crate::config::SignalParams;

#[derive(Debug, Clone)]
pub struct VolumeSpikeExtractor {
    scale_factor: f64,
    volume_epsilon: f64,
}

impl VolumeSpikeExtractor {
    pub fn new(params: &SignalParams) -> Self {
        Self {
            scale_factor: params.spike_scale_factor,
            volume_epsilon: params.volume_epsilon,
        }
    }

    /// (ratio - 1) / scale, clamped to [-1, 1]
    pub fn spike_strength(&self, volume_24h: f64, avg_volume: f64) -> f64 {
        let ratio = volume_24h / avg_volume.max(self.volume_epsilon);
        ((ratio - 1.0) / self.scale_factor).clamp(-1.0, 1.0)
    }
}

impl Default for VolumeSpikeExtractor {
    fn default() -> Self {
        Self::new(&SignalParams::default())
    }
}

impl SignalExtractor for VolumeSpikeExtractor {
    fn kind(&self) -> SignalKind {
        SignalKind::VolumeSpike
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> RawSignal {
        let market = ctx.market;
        let (volume_24h, avg_volume) = (market.volume_24h, market.avg_volume);

        if !is_quantity(volume_24h) || !is_quantity(avg_volume) {
            return RawSignal::insufficient(self.kind(), "volume fields missing or negative");
        }
        if volume_24h == 0.0 {
            return RawSignal::insufficient(self.kind(), "no trading in the last 24h");
        }

        let ratio = volume_24h / avg_volume.max(self.volume_epsilon);
        let strength = self.spike_strength(volume_24h, avg_volume);
        let rationale = if strength > 0.0 {
            format!(
                "Volume spike: {:.1}x trailing average (${:.0} in 24h)",
                ratio, volume_24h
            )
        } else {
            format!(
                "Quiet trading: {:.1}x trailing average (${:.0} in 24h)",
                ratio, volume_24h
            )
        };

        RawSignal::new(self.kind(), strength, rationale)
    }
}
