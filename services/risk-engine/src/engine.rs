//! Margin engine — orchestrator.
//!
//! Ties together the position ledger, the option pricer, and external
//! market state. Every entry point takes the logical time `now`, validates
//! the whole operation against a staged copy of the ledger, and commits
//! only on success, so a failed request leaves no partial state behind.

use ledger::{PositionLedger, TradeOutcome};
use pricing::{OptionPricer, PremiumParams};
use serde::{Deserialize, Serialize};
use types::config::RiskConfig;
use types::errors::{PricingError, RiskError};
use types::ids::AccountId;
use types::market::OptionKey;
use types::numeric::Fixed;

use crate::events::{self, RiskEvent, RiskEventType};
use crate::exposure::{self, AccountInfo};
use crate::liquidation;
use crate::markets::MarketBoard;

/// Result of a trade executed against the pool counterparty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub account: AccountId,
    pub key: OptionKey,
    pub size: Fixed,
    /// Signed gross premium: positive cash paid by the account.
    pub premium: Fixed,
    /// Fee cash delta (non-positive).
    pub fee: Fixed,
    pub unit_price: Fixed,
    pub outcome: TradeOutcome,
    /// PnL realized by any closed portion.
    pub realized: Fixed,
}

/// Result of a partial liquidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationReceipt {
    pub target: AccountId,
    pub liquidator: AccountId,
    pub key: OptionKey,
    /// Closed size (magnitude).
    pub size: Fixed,
    /// Premium attributed to the closed slice (magnitude).
    pub premium: Fixed,
    /// Fee cash delta charged to the target (non-positive).
    pub fee: Fixed,
    /// Cash reward paid to the liquidator.
    pub reward: Fixed,
    /// Cash realized by the target on the closed slice.
    pub target_realized: Fixed,
}

/// Result of a full clear to the insurance account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearReceipt {
    pub target: AccountId,
    pub positions_moved: usize,
    pub balance_moved: Fixed,
}

/// The margin engine: risk snapshots plus the liquidation and clear flows.
#[derive(Debug, Clone)]
pub struct MarginEngine {
    ledger: PositionLedger,
    pricer: OptionPricer,
    board: MarketBoard,
    config: RiskConfig,
    pool: AccountId,
    insurance: AccountId,
    stakeholder: AccountId,
}

impl MarginEngine {
    pub fn new(
        pricer: OptionPricer,
        config: RiskConfig,
        pool: AccountId,
        insurance: AccountId,
        stakeholder: AccountId,
    ) -> Self {
        Self {
            ledger: PositionLedger::new(),
            pricer,
            board: MarketBoard::new(),
            config,
            pool,
            insurance,
            stakeholder,
        }
    }

    // ── State access ──

    pub fn ledger(&self) -> &PositionLedger {
        &self.ledger
    }

    /// Mutable ledger access for the settlement-asset collaborator
    /// (deposits and withdrawals).
    pub fn ledger_mut(&mut self) -> &mut PositionLedger {
        &mut self.ledger
    }

    pub fn board(&self) -> &MarketBoard {
        &self.board
    }

    /// Mutable market state access for the oracle/volatility relays.
    pub fn board_mut(&mut self) -> &mut MarketBoard {
        &mut self.board
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: RiskConfig) {
        self.config = config;
    }

    pub fn pool_account(&self) -> AccountId {
        self.pool
    }

    pub fn insurance_account(&self) -> AccountId {
        self.insurance
    }

    pub fn stakeholder_account(&self) -> AccountId {
        self.stakeholder
    }

    // ── Risk snapshot ──

    /// Recompute the account's risk snapshot at logical time `now`,
    /// refreshing the pricer's per-expiry cache first.
    pub fn get_account_info(
        &mut self,
        account: AccountId,
        now: i64,
    ) -> Result<AccountInfo, RiskError> {
        self.refresh_account_expiries(account, now)?;
        exposure::account_info(
            &self.ledger,
            &self.pricer,
            &self.board,
            &self.config,
            account,
            now,
        )
    }

    /// Classify the account's health and return the implied events.
    pub fn evaluate_account(
        &mut self,
        account: AccountId,
        now: i64,
    ) -> Result<Vec<RiskEvent>, RiskError> {
        let info = self.get_account_info(account, now)?;
        let level = liquidation::health_level(info.health_factor, &self.config);
        Ok(events::events_for_health(
            account,
            level,
            info.health_factor,
            info.equity,
            now,
        ))
    }

    // ── Trading ──

    /// Execute a trade between `account` and the pool counterparty at the
    /// utilization-skewed premium, enforcing the account's post-trade
    /// margin.
    pub fn trade(
        &mut self,
        account: AccountId,
        key: OptionKey,
        size: Fixed,
        now: i64,
    ) -> Result<TradeReceipt, RiskError> {
        if size.is_zero() {
            return Err(RiskError::ZeroPosition);
        }
        if now >= key.expiry {
            return Err(RiskError::InvalidTime);
        }
        let point = self
            .board
            .point(&key)
            .ok_or(PricingError::ZeroImpliedVolatility)
            .map_err(RiskError::from)?;
        if (size.is_positive() && point.buy_disabled)
            || (size.is_negative() && point.sell_disabled)
        {
            return Err(PricingError::TradeDisabled.into());
        }

        let price = self.quoted_price(&key, now)?;
        let pool_info = self.get_account_info(self.pool, now)?;
        let quote = self.pricer.get_premium(&PremiumParams {
            size,
            price,
            fee_rate: self.config.fee_rate,
            price_ratio: self.config.price_ratio,
            price_ratio2: self.config.price_ratio2,
            price_ratio_utilization: self.config.price_ratio_utilization,
            min_premium: self.config.min_premium,
            available: pool_info.available,
            equity: pool_info.equity,
        })?;

        // Stage both legs and the fee split, then check margin, then commit.
        let mut staged = self.ledger.clone();
        let update =
            staged.update_position(account, key, size, -quote.premium, quote.fee)?;
        staged.update_position(self.pool, key, -size, quote.premium, Fixed::ZERO)?;
        self.split_retained_fee(&mut staged, quote.fee)?;

        self.refresh_account_expiries(account, now)?;
        let info = exposure::account_info(
            &staged,
            &self.pricer,
            &self.board,
            &self.config,
            account,
            now,
        )?;
        if info.available.is_negative() {
            return Err(RiskError::InsufficientEquity);
        }

        self.ledger = staged;
        Ok(TradeReceipt {
            account,
            key,
            size,
            premium: quote.premium,
            fee: quote.fee,
            unit_price: quote.unit_price,
            outcome: update.outcome,
            realized: update.realized,
        })
    }

    // ── Liquidation ──

    /// Partially liquidate `target`'s position at `key` into `liquidator`.
    pub fn liquidate(
        &mut self,
        liquidator: AccountId,
        target: AccountId,
        key: OptionKey,
        requested_size: Fixed,
        now: i64,
    ) -> Result<(LiquidationReceipt, RiskEvent), RiskError> {
        if now >= key.expiry {
            return Err(RiskError::InvalidTime);
        }
        let position = self.ledger.position_of(target, &key);
        if position.is_flat() || !requested_size.is_positive() {
            return Err(RiskError::ZeroPosition);
        }

        let target_info = self.get_account_info(target, now)?;
        if target_info.health_factor >= self.config.liquidate_rate {
            return Err(RiskError::CannotLiquidate);
        }
        if position.size.is_positive() && self.ledger.has_short_exposure(target) {
            return Err(RiskError::SellPositionFirst);
        }

        let price = self.quoted_price(&key, now)?;
        if !price.is_positive() {
            return Err(PricingError::ZeroPrice.into());
        }
        let size_magnitude = position.size.abs();
        let gross = size_magnitude.mul(price)?;
        let fee = -gross.mul(self.config.fee_rate)?;

        let resize = liquidation::liquidatable_size(
            size_magnitude,
            target_info.deficit(),
            self.config.liquidation_reward,
            gross,
            fee,
        )?
        .min(requested_size)
        .min(size_magnitude);

        let premium_slice = gross.mul_div(resize, size_magnitude)?;
        let fee_slice = fee.mul_div(resize, size_magnitude)?;
        let reward = self.config.liquidation_reward.mul(premium_slice)?;

        // The closed slice executes as an internal trade: the target
        // closes toward zero, the liquidator takes the same exposure on.
        let long = position.size.is_positive();
        let closing_delta = if long { -resize } else { resize };
        let target_notional_delta = if long { premium_slice } else { -premium_slice };

        let mut staged = self.ledger.clone();
        let target_update = staged.update_position(
            target,
            key,
            closing_delta,
            target_notional_delta,
            fee_slice.sub(reward)?,
        )?;
        staged.update_position(
            liquidator,
            key,
            -closing_delta,
            -target_notional_delta,
            reward,
        )?;
        self.split_retained_fee(&mut staged, fee_slice)?;

        self.refresh_account_expiries(liquidator, now)?;
        let liquidator_info = exposure::account_info(
            &staged,
            &self.pricer,
            &self.board,
            &self.config,
            liquidator,
            now,
        )?;
        if liquidator_info.available.is_negative() {
            return Err(RiskError::InsufficientEquity);
        }

        self.ledger = staged;
        let receipt = LiquidationReceipt {
            target,
            liquidator,
            key,
            size: resize,
            premium: premium_slice,
            fee: fee_slice,
            reward,
            target_realized: target_update.realized,
        };
        let event = RiskEvent::new(
            target,
            RiskEventType::LiquidationExecuted {
                liquidator,
                key,
                size: resize,
                premium: premium_slice,
                reward,
            },
            target_info.health_factor,
            target_info.equity,
            now,
        );
        Ok((receipt, event))
    }

    /// Wipe `target` entirely into the insurance account: every position
    /// moves at its current notional with no weighted-cost realization,
    /// then the whole cash balance follows.
    pub fn clear(
        &mut self,
        target: AccountId,
        now: i64,
    ) -> Result<(ClearReceipt, RiskEvent), RiskError> {
        let info = self.get_account_info(target, now)?;
        if info.health_factor >= self.config.clear_rate {
            return Err(RiskError::CannotClear);
        }
        let balance = self.ledger.balance_of(target);
        if balance.is_negative() {
            let absorbed = self.ledger.balance_of(self.insurance).add(balance)?;
            if absorbed.is_negative() {
                return Err(RiskError::InvalidAccount);
            }
        }

        let positions = self.ledger.positions_of(target);
        let mut staged = self.ledger.clone();
        for (key, position) in &positions {
            staged.clear_position(target, *key);
            staged.update_position(
                self.insurance,
                *key,
                position.size,
                position.notional,
                Fixed::ZERO,
            )?;
        }
        staged.transfer_balance(target, self.insurance, balance)?;

        self.ledger = staged;
        let receipt = ClearReceipt {
            target,
            positions_moved: positions.len(),
            balance_moved: balance,
        };
        let event = RiskEvent::new(
            target,
            RiskEventType::AccountCleared {
                positions_moved: positions.len(),
                balance_moved: balance,
            },
            info.health_factor,
            info.equity,
            now,
        );
        Ok((receipt, event))
    }

    // ── Internals ──

    /// Refresh the pricer's `√t`/discount cache for every unexpired
    /// expiry the account holds.
    fn refresh_account_expiries(&mut self, account: AccountId, now: i64) -> Result<(), RiskError> {
        for expiry in self.ledger.list_of_expiries(account) {
            if expiry > now {
                self.pricer.update_lookup(
                    expiry,
                    OptionPricer::year_fraction(expiry, now),
                    self.config.risk_free_rate,
                )?;
            }
        }
        Ok(())
    }

    /// Fair value per contract at the quoted volatility, refreshing the
    /// expiry cache for `key` first.
    fn quoted_price(&mut self, key: &OptionKey, now: i64) -> Result<Fixed, RiskError> {
        let volatility = self
            .board
            .point(key)
            .map(|p| p.volatility)
            .unwrap_or(Fixed::ZERO);
        if !volatility.is_positive() {
            return Err(PricingError::ZeroImpliedVolatility.into());
        }
        let time_to_expiry = OptionPricer::year_fraction(key.expiry, now);
        self.pricer
            .update_lookup(key.expiry, time_to_expiry, self.config.risk_free_rate)?;
        Ok(self.pricer.get_price(
            key.is_call,
            key.expiry,
            time_to_expiry,
            volatility,
            self.board.spot(),
            key.strike,
            self.config.risk_free_rate,
        )?)
    }

    /// Split a retained (negative) fee delta between the insurance and
    /// stakeholder accounts by `insurance_proportion`.
    fn split_retained_fee(
        &self,
        staged: &mut PositionLedger,
        fee: Fixed,
    ) -> Result<(), RiskError> {
        let retained = fee.abs();
        if retained.is_zero() {
            return Ok(());
        }
        let insurance_share = retained.mul(self.config.insurance_proportion)?;
        staged.deposit(self.insurance, insurance_share)?;
        staged.deposit(self.stakeholder, retained.sub(insurance_share)?)?;
        Ok(())
    }
}
