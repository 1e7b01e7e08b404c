// Timing Pattern Signal
// Trading activity shortly before a known information-release date

use chrono::{DateTime, Utc};

use super::{ExtractionContext, RawSignal, SignalExtractor, SignalKind};
use crate::config::SignalParams;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A known future date on which information becomes public
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseWindow {
    pub at: DateTime<Utc>,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct TimingPatternExtractor {
    horizon_days: f64,
    high_volume_threshold: f64,
    low_volume_factor: f64,
}

impl TimingPatternExtractor {
    pub fn new(params: &SignalParams) -> Self {
        Self {
            horizon_days: params.timing_horizon_days,
            high_volume_threshold: params.high_volume_threshold,
            low_volume_factor: params.low_volume_timing_factor,
        }
    }

    /// Known future instants at which the market's outcome becomes public.
    ///
    /// Matched congressional trades never add a window: the matcher only
    /// returns filings already public at `as_of`.
    pub fn release_windows(ctx: &ExtractionContext<'_>) -> Vec<ReleaseWindow> {
        ctx.market
            .resolves_at
            .map(|at| ReleaseWindow {
                at,
                label: "market resolution".to_string(),
            })
            .into_iter()
            .collect()
    }

    /// 1 at the release instant, falling linearly to 0 at the horizon
    pub fn proximity(&self, days_until: f64) -> f64 {
        if days_until <= 0.0 || days_until > self.horizon_days {
            return 0.0;
        }
        1.0 - days_until / self.horizon_days
    }
}

impl Default for TimingPatternExtractor {
    fn default() -> Self {
        Self::new(&SignalParams::default())
    }
}

impl SignalExtractor for TimingPatternExtractor {
    fn kind(&self) -> SignalKind {
        SignalKind::TimingPattern
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> RawSignal {
        let windows = Self::release_windows(ctx);
        if windows.is_empty() {
            return RawSignal::insufficient(self.kind(), "no known release dates");
        }

        let nearest = windows
            .iter()
            .map(|w| {
                let days_until = (w.at - ctx.as_of).num_seconds() as f64 / SECONDS_PER_DAY;
                (w, days_until)
            })
            .filter(|(_, days)| *days > 0.0 && *days <= self.horizon_days)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let Some((window, days_until)) = nearest else {
            return RawSignal::new(
                self.kind(),
                0.0,
                format!(
                    "No release window within {:.0} days",
                    self.horizon_days
                ),
            );
        };

        let volume = ctx.market.volume_24h;
        let heavy = volume.is_finite() && volume >= self.high_volume_threshold;
        let factor = if heavy { 1.0 } else { self.low_volume_factor };
        let strength = self.proximity(days_until) * factor;

        let rationale = format!(
            "{} trading {:.1} days before {}",
            if heavy { "Heavy" } else { "Light" },
            days_until,
            window.label
        );

        RawSignal::new(self.kind(), strength, rationale)
    }
}
