//! The shared position ledger: exclusive owner of all balances and
//! position state.
//!
//! Every mutation validates fully before it writes, so a failed operation
//! leaves the ledger untouched. Accounts materialize lazily on first
//! write; reads of unknown accounts project zeros.

use std::collections::HashMap;

use types::errors::LedgerError;
use types::ids::AccountId;
use types::market::OptionKey;
use types::numeric::Fixed;

use crate::account::AccountLedger;
use crate::position::{self, Position, TradeOutcome};

/// Result of one `update_position` leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionUpdate {
    pub outcome: TradeOutcome,
    /// Realized PnL credited to the account's cash balance (zero when the
    /// leg only extended the position).
    pub realized: Fixed,
}

/// Arena of all account ledgers, keyed by identity.
#[derive(Debug, Clone, Default)]
pub struct PositionLedger {
    accounts: HashMap<AccountId, AccountLedger>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn account_mut(&mut self, id: AccountId) -> &mut AccountLedger {
        self.accounts.entry(id).or_default()
    }

    // ── Read projections ──

    pub fn balance_of(&self, id: AccountId) -> Fixed {
        self.accounts.get(&id).map(|a| a.balance).unwrap_or_default()
    }

    pub fn position_of(&self, id: AccountId, key: &OptionKey) -> Position {
        self.accounts
            .get(&id)
            .map(|a| a.position(key))
            .unwrap_or(Position::FLAT)
    }

    pub fn position_size_of(&self, id: AccountId, key: &OptionKey) -> Fixed {
        self.position_of(id, key).size
    }

    pub fn list_of_expiries(&self, id: AccountId) -> Vec<i64> {
        self.accounts
            .get(&id)
            .map(|a| a.expiries())
            .unwrap_or_default()
    }

    pub fn list_of_strikes(&self, id: AccountId, expiry: i64) -> Vec<Fixed> {
        self.accounts
            .get(&id)
            .map(|a| a.strikes(expiry))
            .unwrap_or_default()
    }

    /// All open positions of `id` in key order.
    pub fn positions_of(&self, id: AccountId) -> Vec<(OptionKey, Position)> {
        self.accounts
            .get(&id)
            .map(|a| a.open_positions().map(|(k, p)| (*k, *p)).collect())
            .unwrap_or_default()
    }

    /// `true` if the account carries any net-short leg.
    pub fn has_short_exposure(&self, id: AccountId) -> bool {
        self.accounts
            .get(&id)
            .map(|a| a.has_short_exposure())
            .unwrap_or(false)
    }

    // ── Settlement-asset primitives ──

    /// Credit external cash into the account.
    pub fn deposit(&mut self, id: AccountId, amount: Fixed) -> Result<(), LedgerError> {
        let balance = self.balance_of(id).add(amount)?;
        self.account_mut(id).balance = balance;
        Ok(())
    }

    /// Debit cash out of the account; fails without touching state if the
    /// balance does not cover the amount.
    pub fn withdraw(&mut self, id: AccountId, amount: Fixed) -> Result<(), LedgerError> {
        let balance = self.balance_of(id);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance);
        }
        self.account_mut(id).balance = balance.sub(amount)?;
        Ok(())
    }

    /// Move the full (possibly negative) signed amount between accounts.
    pub fn transfer_balance(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Fixed,
    ) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(from).sub(amount)?;
        let to_balance = self.balance_of(to).add(amount)?;
        self.account_mut(from).balance = from_balance;
        self.account_mut(to).balance = to_balance;
        Ok(())
    }

    // ── Position mutation ──

    /// Apply one trade/liquidation leg.
    ///
    /// `fee` is credited/debited to the cash balance unconditionally;
    /// opposing legs additionally realize weighted-average-cost PnL into
    /// cash. The whole leg is computed before any state is written.
    pub fn update_position(
        &mut self,
        id: AccountId,
        key: OptionKey,
        size_delta: Fixed,
        notional_delta: Fixed,
        fee: Fixed,
    ) -> Result<PositionUpdate, LedgerError> {
        let existing = self.position_of(id, &key);
        let applied = position::apply(existing, size_delta, notional_delta)?;
        let balance = self
            .balance_of(id)
            .add(fee)?
            .add(applied.realized)?;

        let account = self.account_mut(id);
        account.balance = balance;
        account.set_position(key, applied.position);
        Ok(PositionUpdate {
            outcome: applied.outcome,
            realized: applied.realized,
        })
    }

    /// Force the position at `key` to zero size and zero notional without
    /// weighted-cost realization, returning what was removed. The caller
    /// is responsible for moving the economic value elsewhere first.
    pub fn clear_position(&mut self, id: AccountId, key: OptionKey) -> Position {
        let existing = self.position_of(id, &key);
        if !existing.is_flat() {
            self.account_mut(id).set_position(key, Position::FLAT);
        }
        existing
    }
}
