//! Execution premium with the utilization skew.
//!
//! The skew worsens the execution price as available liquidity shrinks
//! relative to equity: linear up to the utilization knee, steeper beyond
//! it. Buys execute above fair value, sells below; the per-contract price
//! is floored at the configured minimum premium.

use serde::{Deserialize, Serialize};
use types::errors::PricingError;
use types::numeric::Fixed;

/// Inputs to one premium quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumParams {
    /// Signed trade size: positive buys, negative sells.
    pub size: Fixed,
    /// Fair (Black-Scholes) value per contract.
    pub price: Fixed,
    /// Fee charged on the gross premium.
    pub fee_rate: Fixed,
    /// Markup reached at the utilization knee.
    pub price_ratio: Fixed,
    /// Additional markup slope past the knee.
    pub price_ratio2: Fixed,
    /// Utilization level of the knee, strictly inside (0, 1).
    pub price_ratio_utilization: Fixed,
    /// Floor on the per-contract execution price.
    pub min_premium: Fixed,
    /// Counterparty liquidity still available.
    pub available: Fixed,
    /// Counterparty equity backing that liquidity.
    pub equity: Fixed,
}

/// One quoted premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Premium {
    /// Signed gross premium: positive cash paid by a buyer, negative cash
    /// received by a seller.
    pub premium: Fixed,
    /// Fee as a (non-positive) cash delta for the trader.
    pub fee: Fixed,
    /// Skewed, clamped per-contract execution price.
    pub unit_price: Fixed,
}

/// Quote the premium for `params.size` contracts at the skewed price.
pub fn get_premium(params: &PremiumParams) -> Result<Premium, PricingError> {
    if !params.available.is_positive() {
        return Err(PricingError::AvailableNotPositive);
    }
    if params.available > params.equity {
        return Err(PricingError::InsufficientEquity);
    }

    let markup = utilization_markup(params)?;
    let buying = params.size.is_positive();
    let skewed = if buying {
        params.price.mul(Fixed::ONE.add(markup)?)?
    } else {
        params.price.mul(Fixed::ONE.sub(markup)?)?
    };
    if !skewed.is_positive() {
        return Err(PricingError::ZeroPrice);
    }
    let unit_price = skewed.max(params.min_premium);

    let premium = params.size.mul(unit_price)?;
    let fee = -premium.abs().mul(params.fee_rate)?;
    Ok(Premium {
        premium,
        fee,
        unit_price,
    })
}

/// Two-segment linear markup in utilization
/// `u = (equity − available) / equity`.
fn utilization_markup(params: &PremiumParams) -> Result<Fixed, PricingError> {
    let u = params
        .equity
        .sub(params.available)?
        .div(params.equity)?;
    if u.is_zero() {
        return Ok(Fixed::ZERO);
    }
    let knee = params.price_ratio_utilization;
    let markup = if u <= knee {
        params.price_ratio.mul(u)?.div(knee)?
    } else {
        let past_knee = params
            .price_ratio2
            .mul(u.sub(knee)?)?
            .div(Fixed::ONE.sub(knee)?)?;
        params.price_ratio.add(past_knee)?
    };
    Ok(markup)
}
