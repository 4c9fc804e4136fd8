//! Black-Scholes valuation in fixed point.
//!
//! `d₁ = (ln(S/K) + (r + σ²/2)·t) / (σ·√t)`, `d₂ = d₁ − σ·√t`; the call
//! value is `S·N(d₁) − K·e^(−rt)·N(d₂)` and the put value mirrors it.
//! Deep out-of-the-money results that round below zero saturate to zero.

use fixed_math::normal::norm_cdf;
use fixed_math::transcendental::Transcendentals;
use types::errors::MathError;
use types::numeric::Fixed;

use crate::expiry::ExpiryEntry;

/// Exercise value at a known underlying price.
pub fn intrinsic(is_call: bool, underlying: Fixed, strike: Fixed) -> Result<Fixed, MathError> {
    let payoff = if is_call {
        underlying.sub(strike)?
    } else {
        strike.sub(underlying)?
    };
    Ok(payoff.max(Fixed::ZERO))
}

/// Black-Scholes value of one option.
///
/// An expired entry (`sqrt_t == 0`) collapses to intrinsic value.
#[allow(clippy::too_many_arguments)]
pub fn value(
    math: &Transcendentals,
    entry: ExpiryEntry,
    is_call: bool,
    time_to_expiry: Fixed,
    volatility: Fixed,
    spot: Fixed,
    strike: Fixed,
    rate: Fixed,
) -> Result<Fixed, MathError> {
    if entry.is_expired() {
        return intrinsic(is_call, spot, strike);
    }

    let log_moneyness = math.ln(spot.div(strike)?)?;
    let half_var = Fixed::from_raw(volatility.mul(volatility)?.raw() / 2);
    let drift = rate.add(half_var)?.mul(time_to_expiry)?;
    let vol_sqrt_t = volatility.mul(entry.sqrt_t)?;
    let d1 = log_moneyness.add(drift)?.div(vol_sqrt_t)?;
    let d2 = d1.sub(vol_sqrt_t)?;

    let discounted_strike = strike.mul(entry.discount)?;
    let value = if is_call {
        spot.mul(norm_cdf(d1)?)?
            .sub(discounted_strike.mul(norm_cdf(d2)?)?)?
    } else {
        discounted_strike
            .mul(norm_cdf(-d2)?)?
            .sub(spot.mul(norm_cdf(-d1)?)?)?
    };
    Ok(value.max(Fixed::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::ExpiryLookup;

    fn fx(s: &str) -> Fixed {
        s.parse().unwrap()
    }

    fn math() -> Transcendentals {
        Transcendentals::with_default_table()
    }

    /// One week to expiry at a 6% rate.
    fn week_entry() -> (Fixed, ExpiryEntry) {
        let t = Fixed::from_raw(19_178_082_191_780_821);
        let mut lookup = ExpiryLookup::new();
        let entry = lookup.update(0, t, fx("0.06")).unwrap();
        (t, entry)
    }

    #[test]
    fn test_intrinsic_values() {
        assert_eq!(intrinsic(true, fx("1200"), fx("1100")).unwrap(), fx("100"));
        assert_eq!(intrinsic(true, fx("1000"), fx("1100")).unwrap(), Fixed::ZERO);
        assert_eq!(intrinsic(false, fx("1000"), fx("1100")).unwrap(), fx("100"));
        assert_eq!(intrinsic(false, fx("1200"), fx("1100")).unwrap(), Fixed::ZERO);
    }

    #[test]
    fn test_week_call_reference() {
        // Reference digits: 12.760791851843752114. The CDF approximation
        // and table interpolation keep this implementation within 1e-3;
        // the exact digits below lock determinism of this pipeline.
        let (t, entry) = week_entry();
        let call = value(
            &math(), entry, true, t, fx("0.8"), fx("1000"), fx("1100"), fx("0.06"),
        )
        .unwrap();
        assert_eq!(call.raw(), 12_761_169_809_386_663_608);
        assert!((call.raw() - 12_760_791_851_843_752_114i128).abs() < 1_000_000_000_000_000);
    }

    #[test]
    fn test_week_put_reference() {
        // Reference digits: 111.495766389637349514.
        let (t, entry) = week_entry();
        let put = value(
            &math(), entry, false, t, fx("0.8"), fx("1000"), fx("1100"), fx("0.06"),
        )
        .unwrap();
        assert_eq!(put.raw(), 111_496_144_347_180_255_507);
        assert!((put.raw() - 111_495_766_389_637_349_514i128).abs() < 1_000_000_000_000_000);
    }

    #[test]
    fn test_put_call_parity() {
        // C − P = S − K·e^(−rt), up to one truncation unit per term.
        let (t, entry) = week_entry();
        let m = math();
        let call = value(&m, entry, true, t, fx("0.8"), fx("1000"), fx("1100"), fx("0.06")).unwrap();
        let put = value(&m, entry, false, t, fx("0.8"), fx("1000"), fx("1100"), fx("0.06")).unwrap();
        let lhs = call.sub(put).unwrap();
        let rhs = fx("1000").sub(fx("1100").mul(entry.discount).unwrap()).unwrap();
        assert!((lhs.raw() - rhs.raw()).abs() <= 2, "parity violated: {lhs} vs {rhs}");
    }

    #[test]
    fn test_expired_entry_prices_intrinsic() {
        let entry = ExpiryEntry {
            sqrt_t: Fixed::ZERO,
            discount: Fixed::ONE,
        };
        let call = value(
            &math(), entry, true, Fixed::ZERO, fx("0.8"), fx("1200"), fx("1100"), fx("0.06"),
        )
        .unwrap();
        assert_eq!(call, fx("100"));
    }

    #[test]
    fn test_deep_otm_saturates_at_zero() {
        let (t, entry) = week_entry();
        let call = value(
            &math(), entry, true, t, fx("0.2"), fx("100"), fx("10000"), fx("0.06"),
        )
        .unwrap();
        assert_eq!(call, Fixed::ZERO);
    }

    #[test]
    fn test_deep_itm_call_approaches_forward_intrinsic() {
        let (t, entry) = week_entry();
        let call = value(
            &math(), entry, true, t, fx("0.2"), fx("10000"), fx("100"), fx("0.06"),
        )
        .unwrap();
        // N(d₁) = N(d₂) = 1 here, so C = S − K·discount exactly.
        let expected = fx("10000").sub(fx("100").mul(entry.discount).unwrap()).unwrap();
        assert_eq!(call, expected);
    }

    proptest::proptest! {
        #[test]
        fn prop_call_value_bounded_by_spot(
            spot in 50i64..=5_000i64,
            strike in 50i64..=5_000i64,
            vol_pct in 5i64..=150i64,
        ) {
            let (t, entry) = week_entry();
            let call = value(
                &math(), entry, true, t,
                Fixed::from_int(vol_pct).div(Fixed::from_int(100)).unwrap(),
                Fixed::from_int(spot), Fixed::from_int(strike), fx("0.06"),
            ).unwrap();
            proptest::prop_assert!(call >= Fixed::ZERO);
            proptest::prop_assert!(call <= Fixed::from_int(spot));
        }

        #[test]
        fn prop_call_monotone_in_spot(
            spot in 100i64..=2_000i64,
            bump in 1i64..=100i64,
        ) {
            let (t, entry) = week_entry();
            let m = math();
            let lo = value(&m, entry, true, t, fx("0.8"), Fixed::from_int(spot), fx("1000"), fx("0.06")).unwrap();
            let hi = value(&m, entry, true, t, fx("0.8"), Fixed::from_int(spot + bump), fx("1000"), fx("0.06")).unwrap();
            proptest::prop_assert!(hi >= lo);
        }
    }
}
