// Congressional Correlation Matcher
// Links disclosed congressional trades to markets through shared sector tags

use chrono::{DateTime, NaiveDate, Utc};
use common::{CongressionalTrade, Market, SectorTag};
use rust_decimal::prelude::ToPrimitive;
use std::collections::BTreeSet;
use tracing::debug;

use crate::config::SignalParams;

/// A congressional trade found relevant to one market
#[derive(Debug, Clone, PartialEq)]
pub struct TradeMatch<'a> {
    pub trade: &'a CongressionalTrade,
    /// Tags shared by the market and the trade (never empty)
    pub shared_tags: BTreeSet<SectorTag>,
    /// Days between the transaction and the market's anchor date
    pub days_before_anchor: i64,
    /// Combined recency x size (x unusual boost) weight, > 0
    pub weight: f64,
}

impl TradeMatch<'_> {
    /// +w for purchases, -w for sales
    pub fn signed_weight(&self) -> f64 {
        self.trade.transaction.direction() * self.weight
    }
}

/// Set-intersection matcher over the fixed tag vocabulary
#[derive(Debug, Clone)]
pub struct CongressMatcher {
    lookback_days: i64,
    amount_half_saturation: f64,
    unusual_trade_boost: f64,
    min_trade_amount: f64,
}

impl Default for CongressMatcher {
    fn default() -> Self {
        Self::new(&SignalParams::default())
    }
}

impl CongressMatcher {
    pub fn new(params: &SignalParams) -> Self {
        Self {
            lookback_days: params.lookback_days,
            amount_half_saturation: params.amount_half_saturation,
            unusual_trade_boost: params.unusual_trade_boost,
            min_trade_amount: params.min_trade_amount,
        }
    }

    /// The lookback window ends at the market's resolution date, or at the
    /// scan date for markets without one.
    pub fn anchor_date(market: &Market, as_of: DateTime<Utc>) -> NaiveDate {
        market.resolves_at.unwrap_or(as_of).date_naive()
    }

    /// 1 at the anchor date, falling linearly to 0 at the edge of the window
    pub fn recency_weight(&self, days_before_anchor: i64) -> f64 {
        if days_before_anchor < 0 || days_before_anchor > self.lookback_days {
            return 0.0;
        }
        1.0 - days_before_anchor as f64 / self.lookback_days as f64
    }

    /// Saturating size weight in [0, 1)
    pub fn size_weight(&self, midpoint: f64) -> f64 {
        if !midpoint.is_finite() || midpoint <= 0.0 {
            return 0.0;
        }
        midpoint / (midpoint + self.amount_half_saturation)
    }

    /// Trades relevant to `market`, strongest first. Ties fall back to the
    /// most recent transaction, then legislator name, for a stable order.
    ///
    /// Trades disclosed after `as_of` are ignored: they were not public at scan time.
    pub fn find_matches<'a>(
        &self,
        market: &Market,
        trades: &'a [CongressionalTrade],
        as_of: DateTime<Utc>,
    ) -> Vec<TradeMatch<'a>> {
        let anchor = Self::anchor_date(market, as_of);
        let today = as_of.date_naive();

        let mut matches: Vec<TradeMatch<'a>> = trades
            .iter()
            .filter(|trade| trade.disclosure_date <= today)
            .filter_map(|trade| {
                let shared_tags: BTreeSet<SectorTag> = market
                    .tags
                    .intersection(&trade.sector_tags)
                    .copied()
                    .collect();
                if shared_tags.is_empty() {
                    return None;
                }

                let days_before_anchor = (anchor - trade.transaction_date).num_days();
                let recency = self.recency_weight(days_before_anchor);

                let midpoint = trade.amount.midpoint().to_f64().unwrap_or(0.0);
                if midpoint < self.min_trade_amount {
                    return None;
                }

                let boost = if trade.is_unusual() {
                    self.unusual_trade_boost
                } else {
                    1.0
                };
                let weight = recency * self.size_weight(midpoint) * boost;
                if weight <= 0.0 {
                    return None;
                }

                Some(TradeMatch {
                    trade,
                    shared_tags,
                    days_before_anchor,
                    weight,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| b.trade.transaction_date.cmp(&a.trade.transaction_date))
                .then_with(|| a.trade.legislator.cmp(&b.trade.legislator))
        });

        if !matches.is_empty() {
            debug!(
                market_id = %market.id,
                matches = matches.len(),
                "Matched congressional trades"
            );
        }

        matches
    }
}
