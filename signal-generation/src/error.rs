//! Caller-misuse errors. Data problems never surface here; they degrade to
//! neutral signals instead.

use portfolio_risk::SizingConfigError;
use thiserror::Error;

use crate::signals::SignalKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("min_confidence must be finite and within [0, 1], got {0}")]
    InvalidMinConfidence(f64),

    #[error("max_results must be at least 1")]
    InvalidMaxResults,

    #[error("ensemble weights sum to {sum}, expected 1.0")]
    WeightsNotNormalized { sum: f64 },

    #[error("weight for {kind} is {value}; weights must be finite and non-negative")]
    InvalidWeight { kind: SignalKind, value: f64 },

    #[error("parameter {name} = {value} must be {expected}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("trade link template {0:?} has no {{id}} placeholder")]
    InvalidTradeLinkTemplate(String),

    #[error(transparent)]
    Sizing(#[from] SizingConfigError),
}
