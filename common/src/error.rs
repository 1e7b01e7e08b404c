//! Validation errors raised by data providers before records reach the engine.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("market id is empty")]
    EmptyMarketId,

    #[error("{field} = {value} is not a probability in [0, 1]")]
    PriceOutOfRange { field: &'static str, value: f64 },

    #[error("yes + no price = {sum:.4}, expected 1 within {tolerance}")]
    PriceSumMismatch { sum: f64, tolerance: f64 },

    #[error("{field} = {value} must be finite and non-negative")]
    NegativeQuantity { field: &'static str, value: f64 },

    #[error("disclosure date {disclosed} precedes transaction date {transacted}")]
    DisclosureBeforeTransaction { transacted: String, disclosed: String },

    #[error("amount range low {low} exceeds high {high}")]
    InvertedAmountRange { low: String, high: String },

    #[error("legislator name is empty")]
    EmptyLegislator,

    #[error("unknown sector tag: {0}")]
    UnknownTag(String),
}
