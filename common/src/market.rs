// Market Records
// Parsed prediction-market snapshot as delivered by a market data provider

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::ValidationError;
use crate::tags::SectorTag;

/// Prices are clamped into `[PRICE_EPSILON, 1 - PRICE_EPSILON]` so odds never degenerate.
pub const PRICE_EPSILON: f64 = 0.001;

/// Maximum allowed deviation of `yes_price + no_price` from 1.
pub const PRICE_SUM_TOLERANCE: f64 = 0.02;

/// Side of a binary market to take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    BuyYes,
    BuyNo,
}

impl Position {
    pub fn from_score(score: f64) -> Option<Position> {
        if score > 0.0 {
            Some(Position::BuyYes)
        } else if score < 0.0 {
            Some(Position::BuyNo)
        } else {
            None
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::BuyYes => f.write_str("BUY YES"),
            Position::BuyNo => f.write_str("BUY NO"),
        }
    }
}

/// Prediction market snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: BTreeSet<SectorTag>,
    pub yes_price: f64,
    pub no_price: f64,
    /// Volume traded over the last 24 hours (USD)
    #[serde(default)]
    pub volume_24h: f64,
    /// Trailing average daily volume (USD)
    #[serde(default)]
    pub avg_volume: f64,
    /// Resting buy-side size on the YES book
    #[serde(default)]
    pub buy_volume: f64,
    /// Resting sell-side size on the YES book
    #[serde(default)]
    pub sell_volume: f64,
    #[serde(default)]
    pub liquidity: f64,
    #[serde(default)]
    pub resolves_at: Option<DateTime<Utc>>,
}

impl Market {
    /// Market with a consistent price pair and no activity.
    pub fn new(id: impl Into<String>, question: impl Into<String>, yes_price: f64) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            category: String::new(),
            tags: BTreeSet::new(),
            yes_price,
            no_price: 1.0 - yes_price,
            volume_24h: 0.0,
            avg_volume: 0.0,
            buy_volume: 0.0,
            sell_volume: 0.0,
            liquidity: 0.0,
            resolves_at: None,
        }
    }

    /// Provider-side validation. The engine itself never calls this; it
    /// degrades malformed fields to neutral signals instead.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyMarketId);
        }

        for (field, value) in [("yes_price", self.yes_price), ("no_price", self.no_price)] {
            if !is_probability(value) {
                return Err(ValidationError::PriceOutOfRange { field, value });
            }
        }

        let sum = self.yes_price + self.no_price;
        if (sum - 1.0).abs() > PRICE_SUM_TOLERANCE {
            return Err(ValidationError::PriceSumMismatch {
                sum,
                tolerance: PRICE_SUM_TOLERANCE,
            });
        }

        for (field, value) in [
            ("volume_24h", self.volume_24h),
            ("avg_volume", self.avg_volume),
            ("buy_volume", self.buy_volume),
            ("sell_volume", self.sell_volume),
            ("liquidity", self.liquidity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::NegativeQuantity { field, value });
            }
        }

        Ok(())
    }

    pub fn clamped_yes_price(&self) -> f64 {
        clamp_probability(self.yes_price)
    }

    pub fn clamped_no_price(&self) -> f64 {
        clamp_probability(self.no_price)
    }

    /// Clamped YES probability, or `None` when the price pair is unusable.
    pub fn yes_probability(&self) -> Option<f64> {
        self.prices_usable().then(|| self.clamped_yes_price())
    }

    /// Clamped price of the given side, or `None` when the price pair is unusable.
    pub fn price_for(&self, position: Position) -> Option<f64> {
        if !self.prices_usable() {
            return None;
        }
        Some(match position {
            Position::BuyYes => self.clamped_yes_price(),
            Position::BuyNo => self.clamped_no_price(),
        })
    }

    /// Re-derive `tags` from question and category when the provider sent none.
    pub fn ensure_tags(&mut self) {
        if self.tags.is_empty() {
            self.tags = SectorTag::classify(&format!("{} {}", self.question, self.category));
        }
    }

    fn prices_usable(&self) -> bool {
        is_probability(self.yes_price)
            && is_probability(self.no_price)
            && (self.yes_price + self.no_price - 1.0).abs() <= PRICE_SUM_TOLERANCE
    }
}

fn is_probability(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

pub fn clamp_probability(value: f64) -> f64 {
    value.clamp(PRICE_EPSILON, 1.0 - PRICE_EPSILON)
}
