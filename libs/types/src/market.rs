//! Option market key and per-market quote state.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::numeric::Fixed;

/// Key identifying one listed option: expiry timestamp (unix seconds),
/// strike, and side.
///
/// Ordering is `(expiry, strike, is_call)` so ledger scans enumerate
/// expiries and strikes in chronological/ascending order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct OptionKey {
    pub expiry: i64,
    pub strike: Fixed,
    pub is_call: bool,
}

impl OptionKey {
    pub fn call(expiry: i64, strike: Fixed) -> Self {
        Self {
            expiry,
            strike,
            is_call: true,
        }
    }

    pub fn put(expiry: i64, strike: Fixed) -> Self {
        Self {
            expiry,
            strike,
            is_call: false,
        }
    }

    /// The same strike and expiry on the other side.
    pub fn sibling(self) -> Self {
        Self {
            is_call: !self.is_call,
            ..self
        }
    }
}

impl fmt::Display for OptionKey {
    /// Conventional instrument symbol: `28FEB26-1100-C`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = DateTime::from_timestamp(self.expiry, 0)
            .map(|dt| dt.format("%d%b%y").to_string().to_uppercase())
            .unwrap_or_else(|| self.expiry.to_string());
        let side = if self.is_call { 'C' } else { 'P' };
        write!(f, "{date}-{}-{side}", self.strike)
    }
}

/// Quoted state for one option key: implied volatility plus per-direction
/// disabled flags, delivered by the external volatility relay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketPoint {
    pub volatility: Fixed,
    pub buy_disabled: bool,
    pub sell_disabled: bool,
}

impl MarketPoint {
    pub fn quoted(volatility: Fixed) -> Self {
        Self {
            volatility,
            buy_disabled: false,
            sell_disabled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(s: &str) -> Fixed {
        s.parse().unwrap()
    }

    #[test]
    fn test_key_ordering_expiry_first() {
        let early = OptionKey::call(1_000, fx("2000"));
        let late = OptionKey::call(2_000, fx("1000"));
        assert!(early < late);
    }

    #[test]
    fn test_key_ordering_strike_within_expiry() {
        let low = OptionKey::put(1_000, fx("900"));
        let high = OptionKey::put(1_000, fx("1100"));
        assert!(low < high);
    }

    #[test]
    fn test_sibling_flips_side() {
        let call = OptionKey::call(1_000, fx("1100"));
        assert_eq!(call.sibling(), OptionKey::put(1_000, fx("1100")));
        assert_eq!(call.sibling().sibling(), call);
    }

    #[test]
    fn test_display_symbol() {
        // 2026-02-28 00:00:00 UTC
        let key = OptionKey::call(1_772_236_800, fx("1100"));
        assert_eq!(key.to_string(), "28FEB26-1100-C");
        assert_eq!(key.sibling().to_string(), "28FEB26-1100-P");
    }

    #[test]
    fn test_serde_round_trip() {
        let key = OptionKey::put(1_772_236_800, fx("950.5"));
        let json = serde_json::to_string(&key).unwrap();
        let back: OptionKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
