//! Per-account cash balance, open positions, and enumeration index.

use std::collections::{BTreeMap, BTreeSet};

use types::market::OptionKey;
use types::numeric::Fixed;

use crate::position::Position;

/// One account's slice of the ledger: a cash balance, the open positions
/// keyed by market, and an index of (expiry → strikes) kept in lockstep
/// for enumeration. Index entries appear on the first nonzero write to a
/// key and disappear when both sides of a strike return to zero.
#[derive(Debug, Clone, Default)]
pub struct AccountLedger {
    pub balance: Fixed,
    positions: BTreeMap<OptionKey, Position>,
    index: BTreeMap<i64, BTreeSet<Fixed>>,
}

impl AccountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Projection of the position at `key`; flat if never touched.
    pub fn position(&self, key: &OptionKey) -> Position {
        self.positions.get(key).copied().unwrap_or(Position::FLAT)
    }

    /// All open positions in key order.
    pub fn open_positions(&self) -> impl Iterator<Item = (&OptionKey, &Position)> {
        self.positions.iter()
    }

    pub fn open_position_count(&self) -> usize {
        self.positions.len()
    }

    /// Distinct expiries with at least one open strike, ascending.
    pub fn expiries(&self) -> Vec<i64> {
        self.index.keys().copied().collect()
    }

    /// Distinct open strikes under `expiry`, ascending.
    pub fn strikes(&self, expiry: i64) -> Vec<Fixed> {
        self.index
            .get(&expiry)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// `true` if any open position is net short.
    pub fn has_short_exposure(&self) -> bool {
        self.positions.values().any(|p| p.size.is_negative())
    }

    /// Write the position at `key`, maintaining the enumeration index.
    /// A flat position is removed; its strike leaves the index once the
    /// sibling side is flat too.
    pub(crate) fn set_position(&mut self, key: OptionKey, position: Position) {
        if position.is_flat() {
            self.positions.remove(&key);
            if self.position(&key.sibling()).is_flat() {
                if let Some(strikes) = self.index.get_mut(&key.expiry) {
                    strikes.remove(&key.strike);
                    if strikes.is_empty() {
                        self.index.remove(&key.expiry);
                    }
                }
            }
        } else {
            self.positions.insert(key, position);
            self.index
                .entry(key.expiry)
                .or_default()
                .insert(key.strike);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(s: &str) -> Fixed {
        s.parse().unwrap()
    }

    fn open(account: &mut AccountLedger, key: OptionKey, size: &str) {
        account.set_position(
            key,
            Position {
                size: fx(size),
                notional: fx("-1"),
            },
        );
    }

    #[test]
    fn test_untouched_key_projects_flat() {
        let account = AccountLedger::new();
        let key = OptionKey::call(1_000, fx("1100"));
        assert!(account.position(&key).is_flat());
        assert!(account.expiries().is_empty());
    }

    #[test]
    fn test_index_tracks_expiries_and_strikes() {
        let mut account = AccountLedger::new();
        open(&mut account, OptionKey::call(2_000, fx("1100")), "1");
        open(&mut account, OptionKey::put(1_000, fx("900")), "1");
        open(&mut account, OptionKey::call(1_000, fx("950")), "1");

        assert_eq!(account.expiries(), vec![1_000, 2_000]);
        assert_eq!(account.strikes(1_000), vec![fx("900"), fx("950")]);
        assert_eq!(account.strikes(2_000), vec![fx("1100")]);
    }

    #[test]
    fn test_strike_survives_while_sibling_open() {
        let mut account = AccountLedger::new();
        let call = OptionKey::call(1_000, fx("1100"));
        open(&mut account, call, "1");
        open(&mut account, call.sibling(), "-2");

        account.set_position(call, Position::FLAT);
        // The put still holds the strike in the index.
        assert_eq!(account.strikes(1_000), vec![fx("1100")]);

        account.set_position(call.sibling(), Position::FLAT);
        assert!(account.expiries().is_empty());
        assert_eq!(account.open_position_count(), 0);
    }

    #[test]
    fn test_expiry_removed_with_last_strike() {
        let mut account = AccountLedger::new();
        let key = OptionKey::put(1_000, fx("900"));
        open(&mut account, key, "-1");
        assert_eq!(account.expiries(), vec![1_000]);

        account.set_position(key, Position::FLAT);
        assert!(account.expiries().is_empty());
        assert!(account.strikes(1_000).is_empty());
    }

    #[test]
    fn test_short_exposure_detection() {
        let mut account = AccountLedger::new();
        assert!(!account.has_short_exposure());
        open(&mut account, OptionKey::call(1_000, fx("1100")), "1");
        assert!(!account.has_short_exposure());
        open(&mut account, OptionKey::put(1_000, fx("900")), "-1");
        assert!(account.has_short_exposure());
    }
}
