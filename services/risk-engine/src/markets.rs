//! Market state fed by external collaborators.
//!
//! The oracle relay delivers the current spot and, after each expiry, the
//! settled price; the volatility relay delivers per-key implied
//! volatility and per-direction disabled flags. The engine only consumes
//! these values; validating and authorizing the feeds happens upstream.

use std::collections::BTreeMap;

use types::market::{MarketPoint, OptionKey};
use types::numeric::Fixed;

/// Spot, settlement, and volatility state for one pool's markets.
#[derive(Debug, Clone, Default)]
pub struct MarketBoard {
    spot: Fixed,
    settlements: BTreeMap<i64, Fixed>,
    points: BTreeMap<OptionKey, MarketPoint>,
}

impl MarketBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_spot(&mut self, spot: Fixed) {
        self.spot = spot;
    }

    pub fn spot(&self) -> Fixed {
        self.spot
    }

    /// Record the settled price for an expiry.
    pub fn settle(&mut self, expiry: i64, price: Fixed) {
        self.settlements.insert(expiry, price);
    }

    pub fn settlement(&self, expiry: i64) -> Option<Fixed> {
        self.settlements.get(&expiry).copied()
    }

    /// Set the implied volatility for a key, preserving disabled flags.
    pub fn set_volatility(&mut self, key: OptionKey, volatility: Fixed) {
        self.points.entry(key).or_default().volatility = volatility;
    }

    /// Set the per-direction disabled flags for a key.
    pub fn set_disabled(&mut self, key: OptionKey, buy_disabled: bool, sell_disabled: bool) {
        let point = self.points.entry(key).or_default();
        point.buy_disabled = buy_disabled;
        point.sell_disabled = sell_disabled;
    }

    pub fn point(&self, key: &OptionKey) -> Option<MarketPoint> {
        self.points.get(key).copied()
    }
}
