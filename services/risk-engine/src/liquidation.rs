//! Liquidation sizing and health classification.

use types::config::RiskConfig;
use types::errors::MathError;
use types::numeric::Fixed;

/// Account health relative to the configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthLevel {
    /// At or above the liquidation threshold.
    Healthy,
    /// Below the liquidation threshold: partial liquidation is open.
    Liquidatable,
    /// Below the clear threshold: a full clear is open too.
    Clearable,
}

/// Classify a health factor against the configured thresholds.
pub fn health_level(health_factor: Fixed, config: &RiskConfig) -> HealthLevel {
    if health_factor < config.clear_rate {
        HealthLevel::Clearable
    } else if health_factor < config.liquidate_rate {
        HealthLevel::Liquidatable
    } else {
        HealthLevel::Healthy
    }
}

/// Maximal safely liquidatable size:
///
/// `resize = size · (deficit + reward · gross) / (gross + fee)`
///
/// where `gross` is the premium for closing the whole position, `fee` its
/// (negative) fee cash delta, and `deficit` the magnitude of the target's
/// negative available margin. The final division rounds away from zero so
/// the liquidated slice always covers the shortfall; callers cap the
/// result at the requested and remaining size.
pub fn liquidatable_size(
    position_size: Fixed,
    deficit: Fixed,
    reward_rate: Fixed,
    gross_premium: Fixed,
    fee: Fixed,
) -> Result<Fixed, MathError> {
    let numerator = deficit.add(reward_rate.mul(gross_premium)?)?;
    let proceeds = gross_premium.add(fee)?;
    if !proceeds.is_positive() {
        return Err(MathError::DivisionByZero);
    }
    position_size.mul(numerator)?.div_up(proceeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(s: &str) -> Fixed {
        s.parse().unwrap()
    }

    #[test]
    fn test_reference_sizing_digits() {
        // Reference trace: position 6.000000000000000001 at gross premium
        // 720.278795636963590998, fee −9.542787956369635909, deficit
        // 158.656794908544846654, reward 10%.
        let resize = liquidatable_size(
            fx("6.000000000000000001"),
            fx("158.656794908544846654"),
            fx("0.1"),
            fx("720.278795636963590998"),
            fx("-9.542787956369635909"),
        )
        .unwrap();
        assert_eq!(resize.raw(), 1_947_429_188_722_724_584);
    }

    #[test]
    fn test_zero_deficit_still_sizes_reward() {
        // With no shortfall the formula still carves out the slice whose
        // premium funds the liquidator's reward.
        let resize =
            liquidatable_size(fx("10"), Fixed::ZERO, fx("0.1"), fx("100"), fx("-1")).unwrap();
        // 10 · (0.1·100) / 99 = 1.0101…, rounded up at the last digit.
        assert_eq!(resize.raw(), 1_010_101_010_101_010_102);
    }

    #[test]
    fn test_fee_exceeding_premium_rejected() {
        let err = liquidatable_size(fx("10"), fx("5"), fx("0.1"), fx("100"), fx("-100"));
        assert_eq!(err, Err(MathError::DivisionByZero));
    }

    #[test]
    fn test_health_levels() {
        let config = RiskConfig::default(); // liquidate 1.0, clear 0.2
        assert_eq!(health_level(fx("1.5"), &config), HealthLevel::Healthy);
        assert_eq!(health_level(fx("1"), &config), HealthLevel::Healthy);
        assert_eq!(health_level(fx("0.99"), &config), HealthLevel::Liquidatable);
        assert_eq!(health_level(fx("0.2"), &config), HealthLevel::Liquidatable);
        assert_eq!(health_level(fx("0.19"), &config), HealthLevel::Clearable);
        assert_eq!(health_level(fx("-3"), &config), HealthLevel::Clearable);
    }

    proptest::proptest! {
        #[test]
        fn prop_resize_scales_with_deficit(
            deficit_lo in 0i64..=500i64,
            bump in 1i64..=500i64,
        ) {
            // A deeper shortfall never shrinks the liquidatable slice.
            let lo = liquidatable_size(
                fx("10"), Fixed::from_int(deficit_lo), fx("0.1"), fx("1000"), fx("-5"),
            ).unwrap();
            let hi = liquidatable_size(
                fx("10"), Fixed::from_int(deficit_lo + bump), fx("0.1"), fx("1000"), fx("-5"),
            ).unwrap();
            proptest::prop_assert!(hi > lo);
        }
    }
}
