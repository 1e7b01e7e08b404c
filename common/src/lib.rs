//! Shared domain records for the informed-money scanner.
//!
//! Market snapshots and congressional disclosures arrive here already parsed
//! by their providers; everything downstream treats them as read-only.

mod congress;
mod error;
mod market;
mod tags;

pub use congress::{
    AmountRange, Chamber, CongressionalTrade, Party, TransactionType, DISCLOSURE_DEADLINE_DAYS,
    LARGE_TRADE_THRESHOLD, QUICK_DISCLOSURE_DAYS,
};
pub use error::ValidationError;
pub use market::{clamp_probability, Market, Position, PRICE_EPSILON, PRICE_SUM_TOLERANCE};
pub use tags::SectorTag;
