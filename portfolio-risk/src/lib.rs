//! Position sizing for ensemble recommendations.
//!
//! Turns a combined confidence and the price of the chosen side into an
//! expected edge and a damped, capped Kelly stake fraction.

mod config;
mod sizing;

pub use config::{SizingConfig, SizingConfigError};
pub use sizing::{PositionSizer, SizingResult};
