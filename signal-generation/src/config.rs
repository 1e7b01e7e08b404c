//! Engine configuration: ensemble weights, extractor tuning, sizing and output.

use portfolio_risk::SizingConfig;
use serde::{Deserialize, Serialize};

use crate::ensemble::EnsembleWeights;
use crate::error::ScanError;

/// Full engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Gain of the tanh mapping from |combined score| to confidence
    #[serde(default = "default_confidence_gain")]
    pub confidence_gain: f64,

    /// Number of top-contributing signals quoted in each rationale
    #[serde(default = "default_rationale_depth")]
    pub rationale_depth: usize,

    /// Trade link; `{id}` is replaced by the market identifier
    #[serde(default = "default_trade_link_template")]
    pub trade_link_template: String,

    #[serde(default)]
    pub weights: EnsembleWeights,

    #[serde(default)]
    pub signals: SignalParams,

    #[serde(default)]
    pub sizing: SizingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_gain: default_confidence_gain(),
            rationale_depth: default_rationale_depth(),
            trade_link_template: default_trade_link_template(),
            weights: EnsembleWeights::default(),
            signals: SignalParams::default(),
            sizing: SizingConfig::default(),
        }
    }
}

fn default_confidence_gain() -> f64 {
    2.0
}

fn default_rationale_depth() -> usize {
    3
}

fn default_trade_link_template() -> String {
    "https://polymarket.com/event/{id}".to_string()
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ScanError> {
        self.weights.validate()?;
        self.signals.validate()?;
        self.sizing.validate()?;
        check_positive("confidence_gain", self.confidence_gain)?;

        if self.rationale_depth == 0 {
            return Err(ScanError::InvalidParameter {
                name: "rationale_depth",
                value: 0.0,
                expected: "at least 1",
            });
        }

        if !self.trade_link_template.contains("{id}") {
            return Err(ScanError::InvalidTradeLinkTemplate(
                self.trade_link_template.clone(),
            ));
        }

        Ok(())
    }
}

/// Extractor tuning constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalParams {
    /// Volume ratio excess that saturates the spike signal (3.0: a 4x spike reads 1.0)
    #[serde(default = "default_spike_scale_factor")]
    pub spike_scale_factor: f64,

    /// Floor for the trailing average volume (USD)
    #[serde(default = "default_volume_epsilon")]
    pub volume_epsilon: f64,

    /// Days before the anchor date within which disclosures are relevant
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,

    /// Trade midpoint (USD) at which the size weight reaches one half
    #[serde(default = "default_amount_half_saturation")]
    pub amount_half_saturation: f64,

    /// Total match weight at which the congressional signal reaches ~63% strength
    #[serde(default = "default_saturation_scale")]
    pub saturation_scale: f64,

    /// Weight multiplier for large or quickly disclosed trades
    #[serde(default = "default_unusual_trade_boost")]
    pub unusual_trade_boost: f64,

    /// Trades whose band midpoint is below this (USD) are ignored
    #[serde(default = "default_min_trade_amount")]
    pub min_trade_amount: f64,

    /// Information-release windows further out than this are ignored (days)
    #[serde(default = "default_timing_horizon_days")]
    pub timing_horizon_days: f64,

    /// 24h volume (USD) that counts as heavy trading near a release window
    #[serde(default = "default_high_volume_threshold")]
    pub high_volume_threshold: f64,

    /// Timing strength multiplier when volume is below `high_volume_threshold`
    #[serde(default = "default_low_volume_timing_factor")]
    pub low_volume_timing_factor: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            spike_scale_factor: default_spike_scale_factor(),
            volume_epsilon: default_volume_epsilon(),
            lookback_days: default_lookback_days(),
            amount_half_saturation: default_amount_half_saturation(),
            saturation_scale: default_saturation_scale(),
            unusual_trade_boost: default_unusual_trade_boost(),
            min_trade_amount: default_min_trade_amount(),
            timing_horizon_days: default_timing_horizon_days(),
            high_volume_threshold: default_high_volume_threshold(),
            low_volume_timing_factor: default_low_volume_timing_factor(),
        }
    }
}

fn default_spike_scale_factor() -> f64 {
    3.0
}

fn default_volume_epsilon() -> f64 {
    1.0
}

fn default_lookback_days() -> i64 {
    45
}

fn default_amount_half_saturation() -> f64 {
    50_000.0
}

fn default_saturation_scale() -> f64 {
    1.0
}

fn default_unusual_trade_boost() -> f64 {
    1.5
}

fn default_min_trade_amount() -> f64 {
    1_000.0
}

fn default_timing_horizon_days() -> f64 {
    7.0
}

fn default_high_volume_threshold() -> f64 {
    50_000.0
}

fn default_low_volume_timing_factor() -> f64 {
    0.6
}

impl SignalParams {
    pub fn validate(&self) -> Result<(), ScanError> {
        check_positive("spike_scale_factor", self.spike_scale_factor)?;
        check_positive("volume_epsilon", self.volume_epsilon)?;
        check_positive("amount_half_saturation", self.amount_half_saturation)?;
        check_positive("saturation_scale", self.saturation_scale)?;
        check_positive("timing_horizon_days", self.timing_horizon_days)?;

        if self.lookback_days < 1 {
            return Err(ScanError::InvalidParameter {
                name: "lookback_days",
                value: self.lookback_days as f64,
                expected: "at least 1",
            });
        }

        if !self.unusual_trade_boost.is_finite() || self.unusual_trade_boost < 1.0 {
            return Err(ScanError::InvalidParameter {
                name: "unusual_trade_boost",
                value: self.unusual_trade_boost,
                expected: "finite and >= 1",
            });
        }

        for (name, value) in [
            ("min_trade_amount", self.min_trade_amount),
            ("high_volume_threshold", self.high_volume_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScanError::InvalidParameter {
                    name,
                    value,
                    expected: "finite and >= 0",
                });
            }
        }

        let factor = self.low_volume_timing_factor;
        if !(factor.is_finite() && (0.0..=1.0).contains(&factor)) {
            return Err(ScanError::InvalidParameter {
                name: "low_volume_timing_factor",
                value: factor,
                expected: "in [0, 1]",
            });
        }

        Ok(())
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ScanError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ScanError::InvalidParameter {
            name,
            value,
            expected: "finite and > 0",
        })
    }
}

/// Load and validate configuration from a TOML file
pub fn load_config(path: &str) -> anyhow::Result<EngineConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: EngineConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Save configuration to a TOML file
pub fn save_config(config: &EngineConfig, path: &str) -> anyhow::Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Write a commented configuration template with the default values
pub fn create_config_template(path: &str) -> anyhow::Result<()> {
    let template = "# Informed-Money Scanner Configuration
# Every value below is the built-in default; delete a line to keep it.

# Gain of the tanh curve mapping |combined score| to confidence
confidence_gain = 2.0

# Number of top-contributing signals quoted per recommendation
rationale_depth = 3

# Trade link; {id} is replaced by the market identifier
trade_link_template = \"https://polymarket.com/event/{id}\"

# Ensemble weights. Must sum to exactly 1.0.
[weights]
order_imbalance = 0.30
congressional_correlation = 0.25
volume_spike = 0.20
price_momentum = 0.15
timing_pattern = 0.10

[signals]
# Volume ratio excess that saturates the spike signal (4x average reads 1.0)
spike_scale_factor = 3.0

# Floor for trailing average volume (USD)
volume_epsilon = 1.0

# Disclosure lookback before market resolution (days)
lookback_days = 45

# Trade midpoint at which size weight reaches one half (USD)
amount_half_saturation = 50000.0

# Total match weight at which the congressional signal reaches ~63%
saturation_scale = 1.0

# Weight multiplier for large or quickly disclosed trades
unusual_trade_boost = 1.5

# Ignore trades whose band midpoint is below this (USD)
min_trade_amount = 1000.0

# Ignore resolution windows further out than this (days)
timing_horizon_days = 7.0

# 24h volume counted as heavy trading near a release window (USD)
high_volume_threshold = 50000.0

# Timing strength multiplier on light volume
low_volume_timing_factor = 0.6

[sizing]
# Largest mispricing credited at full confidence (0.10 = 10 points)
max_edge = 0.10

# Fraction of full Kelly to stake (0.5 = half-Kelly)
kelly_multiplier = 0.5

# Hard cap on suggested bankroll fraction
max_bankroll_fraction = 0.05
";

    std::fs::write(path, template)?;
    Ok(())
}
