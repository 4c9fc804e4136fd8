//! Error taxonomy for the risk and pricing core.
//!
//! Every operation either succeeds with its documented result or fails
//! atomically with exactly one of these kinds; nothing is retried
//! internally and no partial state is ever committed. The enums layer the
//! same way the crates do: math failures flow into ledger/pricing
//! failures, which flow into the engine-level [`RiskError`].

use thiserror::Error;

/// Fixed-point and transcendental-math failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("lookup table is frozen")]
    Frozen,

    #[error("lookup table key/value lengths differ")]
    LengthMismatch,

    #[error("lookup table keys must be strictly ascending")]
    UnsortedKeys,

    #[error("lookup table has not been frozen yet")]
    TableOpen,

    #[error("intermediate value exceeds the 18-decimal mantissa range")]
    Overflow,

    #[error("division by zero")]
    DivisionByZero,

    #[error("exponent input above the representable ceiling")]
    ExponentTooLarge,

    #[error("input outside the function domain")]
    OutOfDomain,
}

/// Cash and position ledger failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    #[error("withdrawal exceeds the account's cash balance")]
    InsufficientBalance,

    #[error("math error: {0}")]
    Math(#[from] MathError),
}

/// Pricing and premium failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingError {
    #[error("resulting execution price is zero or negative")]
    ZeroPrice,

    #[error("implied volatility is zero")]
    ZeroImpliedVolatility,

    #[error("available liquidity is not positive")]
    AvailableNotPositive,

    #[error("available liquidity exceeds equity")]
    InsufficientEquity,

    #[error("trading is disabled in this direction")]
    TradeDisabled,

    #[error("expiry lookup was never populated for this expiry")]
    ExpiryNotPrepared,

    #[error("math error: {0}")]
    Math(#[from] MathError),
}

/// Margin engine failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskError {
    #[error("past the market's usable liquidation window")]
    InvalidTime,

    #[error("no position at the requested market key")]
    ZeroPosition,

    #[error("health factor is above the liquidation threshold")]
    CannotLiquidate,

    #[error("long position cannot be liquidated while short exposure remains")]
    SellPositionFirst,

    #[error("health factor is above the clear threshold")]
    CannotClear,

    #[error("account cannot absorb the transfer")]
    InvalidAccount,

    #[error("insufficient equity to carry the resulting exposure")]
    InsufficientEquity,

    #[error("pricing error: {0}")]
    Pricing(#[from] PricingError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("math error: {0}")]
    Math(#[from] MathError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math_error_display() {
        assert_eq!(MathError::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            MathError::ExponentTooLarge.to_string(),
            "exponent input above the representable ceiling"
        );
    }

    #[test]
    fn test_risk_error_from_math_error() {
        let err: RiskError = MathError::Overflow.into();
        assert!(matches!(err, RiskError::Math(MathError::Overflow)));
    }

    #[test]
    fn test_pricing_error_wraps_math() {
        let err: PricingError = MathError::DivisionByZero.into();
        assert!(err.to_string().contains("division by zero"));
    }

    #[test]
    fn test_risk_error_from_pricing_error() {
        let err: RiskError = PricingError::ZeroImpliedVolatility.into();
        assert!(matches!(
            err,
            RiskError::Pricing(PricingError::ZeroImpliedVolatility)
        ));
    }
}
