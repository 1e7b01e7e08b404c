//! Position sizing configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SizingConfigError {
    #[error("sizing parameter {name} = {value} is outside {expected}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
}

/// Sizing parameters. All three are empirical tuning choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingConfig {
    /// Largest mispricing the ensemble is credited with at full confidence
    /// (probability points, 0.10 = 10pp)
    #[serde(default = "default_max_edge")]
    pub max_edge: f64,

    /// Fraction of full Kelly to stake (0.5 = half-Kelly)
    #[serde(default = "default_kelly_multiplier")]
    pub kelly_multiplier: f64,

    /// Hard cap on the suggested bankroll fraction
    #[serde(default = "default_max_bankroll_fraction")]
    pub max_bankroll_fraction: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            max_edge: default_max_edge(),
            kelly_multiplier: default_kelly_multiplier(),
            max_bankroll_fraction: default_max_bankroll_fraction(),
        }
    }
}

fn default_max_edge() -> f64 {
    0.10
}

fn default_kelly_multiplier() -> f64 {
    0.5
}

fn default_max_bankroll_fraction() -> f64 {
    0.05
}

impl SizingConfig {
    pub fn validate(&self) -> Result<(), SizingConfigError> {
        check_unit("max_edge", self.max_edge)?;
        check_unit("kelly_multiplier", self.kelly_multiplier)?;
        check_unit("max_bankroll_fraction", self.max_bankroll_fraction)?;
        Ok(())
    }
}

/// Must be finite and in (0, 1].
fn check_unit(name: &'static str, value: f64) -> Result<(), SizingConfigError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(SizingConfigError::InvalidParameter {
            name,
            value,
            expected: "(0, 1]",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SizingConfig::default();
        assert_eq!(config.kelly_multiplier, 0.5);
        assert_eq!(config.max_bankroll_fraction, 0.05);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = SizingConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: SizingConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: SizingConfig = toml::from_str("max_edge = 0.08").unwrap();
        assert_eq!(config.max_edge, 0.08);
        assert_eq!(config.kelly_multiplier, 0.5);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let config = SizingConfig {
            max_bankroll_fraction: 1.5,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(SizingConfigError::InvalidParameter {
                name: "max_bankroll_fraction",
                value: 1.5,
                expected: "(0, 1]",
            })
        );
    }
}
