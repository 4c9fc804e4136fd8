//! Account risk snapshot: margin, equity, and health factor.
//!
//! Everything here is recomputed on demand from the ledger plus current
//! market state; nothing is stored. Marks use Black-Scholes value before
//! settlement and intrinsic value after.

use ledger::PositionLedger;
use pricing::OptionPricer;
use serde::{Deserialize, Serialize};
use types::config::RiskConfig;
use types::errors::{PricingError, RiskError};
use types::ids::AccountId;
use types::market::OptionKey;
use types::numeric::Fixed;

use crate::markets::MarketBoard;

/// Derived account risk snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Margin required to keep the account's short exposure open.
    pub initial_margin: Fixed,
    /// Cash balance plus the summed notional of all open positions.
    pub margin_balance: Fixed,
    /// Margin balance plus the mark value of all open positions.
    pub equity: Fixed,
    /// Equity less the estimated cost of closing everything now.
    pub equity_with_fee: Fixed,
    /// Unrealized PnL: Σ (notional + mark value).
    pub upnl: Fixed,
    /// Equity over at-risk value; saturates to `Fixed::MAX` when the
    /// account carries no at-risk value.
    pub health_factor: Fixed,
    /// Fee-adjusted margin headroom: `equity_with_fee − initial_margin`.
    pub available: Fixed,
}

impl AccountInfo {
    /// Magnitude of the margin shortfall; zero while `available ≥ 0`.
    pub fn deficit(&self) -> Fixed {
        (-self.available).max(Fixed::ZERO)
    }
}

/// Mark price per contract for one leg: Black-Scholes before settlement,
/// intrinsic after. Settled markets fall back to spot if the settlement
/// price has not been relayed yet.
pub fn unit_mark(
    pricer: &OptionPricer,
    board: &MarketBoard,
    config: &RiskConfig,
    key: &OptionKey,
    now: i64,
) -> Result<Fixed, RiskError> {
    if key.expiry <= now {
        let underlying = board.settlement(key.expiry).unwrap_or_else(|| board.spot());
        return Ok(pricing::black_scholes::intrinsic(
            key.is_call,
            underlying,
            key.strike,
        )?);
    }
    let volatility = board
        .point(key)
        .map(|p| p.volatility)
        .unwrap_or(Fixed::ZERO);
    if !volatility.is_positive() {
        return Err(PricingError::ZeroImpliedVolatility.into());
    }
    let time_to_expiry = OptionPricer::year_fraction(key.expiry, now);
    Ok(pricer.get_price(
        key.is_call,
        key.expiry,
        time_to_expiry,
        volatility,
        board.spot(),
        key.strike,
        config.risk_free_rate,
    )?)
}

/// Fold the full risk snapshot for `account` at logical time `now`.
///
/// Per net-short leg, initial margin is
/// `max(0, risk · initial_margin_risk_rate − |leg value|)` with `risk`
/// equal to `|size| · spot` before settlement and `|size| · intrinsic`
/// after. The health denominator is the at-risk value
/// `initial_margin + Σ|leg value|`.
pub fn account_info(
    ledger: &PositionLedger,
    pricer: &OptionPricer,
    board: &MarketBoard,
    config: &RiskConfig,
    account: AccountId,
    now: i64,
) -> Result<AccountInfo, RiskError> {
    let mut margin_balance = ledger.balance_of(account);
    let mut initial_margin = Fixed::ZERO;
    let mut mark_total = Fixed::ZERO;
    let mut gross_value = Fixed::ZERO;
    let mut upnl = Fixed::ZERO;
    let mut fee_estimate = Fixed::ZERO;

    for (key, position) in ledger.positions_of(account) {
        let unit = unit_mark(pricer, board, config, &key, now)?;
        let leg_value = position.size.mul(unit)?;
        let leg_magnitude = leg_value.abs();

        margin_balance = margin_balance.add(position.notional)?;
        mark_total = mark_total.add(leg_value)?;
        gross_value = gross_value.add(leg_magnitude)?;
        upnl = upnl.add(position.notional.add(leg_value)?)?;
        fee_estimate = fee_estimate.add(leg_magnitude.mul(config.fee_rate)?)?;

        if position.size.is_negative() {
            let unit_risk = if key.expiry <= now { unit } else { board.spot() };
            let risk = position.size.abs().mul(unit_risk)?;
            let leg_margin = risk
                .mul(config.initial_margin_risk_rate)?
                .sub(leg_magnitude)?
                .max(Fixed::ZERO);
            initial_margin = initial_margin.add(leg_margin)?;
        }
    }

    let equity = margin_balance.add(mark_total)?;
    let equity_with_fee = equity.sub(fee_estimate)?;
    let available = equity_with_fee.sub(initial_margin)?;
    let at_risk = initial_margin.add(gross_value)?;
    let health_factor = if at_risk.is_zero() {
        Fixed::MAX
    } else {
        equity.div(at_risk)?
    };

    Ok(AccountInfo {
        initial_margin,
        margin_balance,
        equity,
        equity_with_fee,
        upnl,
        health_factor,
        available,
    })
}
