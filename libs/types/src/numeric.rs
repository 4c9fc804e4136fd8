//! Signed fixed-point decimal arithmetic with 18 fractional digits.
//!
//! [`Fixed`] stores a value as an `i128` mantissa scaled by `10^18`:
//! `Fixed { raw: 1_500_000_000_000_000_000 }` represents `1.5`. Every
//! operation truncates toward zero at the 18th fractional digit; the only
//! exception is [`Fixed::div_up`], which rounds away from zero and exists
//! for the liquidation sizing formula.
//!
//! `mul` and `div` widen through 256 bits so intermediate products never
//! wrap. An intermediate that does not fit back into the `i128` mantissa
//! fails with [`MathError::Overflow`]; dividing by zero fails with
//! [`MathError::DivisionByZero`].

use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::errors::MathError;

/// Fixed-point decimal: `value = raw / 10^18`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fixed(i128);

impl Fixed {
    /// Mantissa units per whole unit (`10^18`).
    pub const SCALE: i128 = 1_000_000_000_000_000_000;
    /// Number of fractional decimal digits.
    pub const DECIMALS: u32 = 18;

    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(Self::SCALE);
    /// Largest representable value; used as the saturated health factor.
    pub const MAX: Fixed = Fixed(i128::MAX);
    pub const MIN: Fixed = Fixed(i128::MIN);

    /// Construct from a raw `10^18`-scaled mantissa.
    #[inline]
    pub const fn from_raw(raw: i128) -> Self {
        Self(raw)
    }

    /// Raw `10^18`-scaled mantissa.
    #[inline]
    pub const fn raw(self) -> i128 {
        self.0
    }

    /// Lift a plain integer count (e.g. a number of contracts) into fixed
    /// point. `i64` inputs cannot overflow the mantissa.
    #[inline]
    pub const fn from_int(n: i64) -> Self {
        Self(n as i128 * Self::SCALE)
    }

    /// Truncate toward zero to a plain integer count.
    #[inline]
    pub const fn trunc(self) -> i128 {
        self.0 / Self::SCALE
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Sign of the value: -1, 0, or 1.
    #[inline]
    pub const fn signum(self) -> i128 {
        self.0.signum()
    }

    /// Absolute value, saturating at [`Fixed::MAX`] for the (unreachable
    /// in practice) `i128::MIN` mantissa.
    #[inline]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        if self <= other {
            self
        } else {
            other
        }
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        if self >= other {
            self
        } else {
            other
        }
    }

    /// Checked addition.
    #[inline]
    pub fn add(self, rhs: Self) -> Result<Self, MathError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(MathError::Overflow)
    }

    /// Checked subtraction.
    #[inline]
    pub fn sub(self, rhs: Self) -> Result<Self, MathError> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or(MathError::Overflow)
    }

    /// Fixed-point multiplication: `(self · rhs) / 10^18`, truncating
    /// toward zero. The double-width product is taken at 256 bits.
    #[inline]
    pub fn mul(self, rhs: Self) -> Result<Self, MathError> {
        wide_mul_div(self.0, rhs.0, Self::SCALE, Rounding::TowardZero).map(Self)
    }

    /// Fixed-point division: `(self · 10^18) / rhs`, truncating toward zero.
    #[inline]
    pub fn div(self, rhs: Self) -> Result<Self, MathError> {
        wide_mul_div(self.0, Self::SCALE, rhs.0, Rounding::TowardZero).map(Self)
    }

    /// Fixed-point division rounding away from zero when a remainder
    /// exists. Liquidation sizing rounds in the protocol's favor so the
    /// closed slice is never one mantissa unit too small.
    #[inline]
    pub fn div_up(self, rhs: Self) -> Result<Self, MathError> {
        wide_mul_div(self.0, Self::SCALE, rhs.0, Rounding::AwayFromZero).map(Self)
    }

    /// Raw `(self · num) / den` without a `10^18` rescale, truncating
    /// toward zero. Used for pro-rata splits of notional, where the scale
    /// of `num` and `den` cancels.
    #[inline]
    pub fn mul_div(self, num: Self, den: Self) -> Result<Self, MathError> {
        wide_mul_div(self.0, num.0, den.0, Rounding::TowardZero).map(Self)
    }

    /// Lossy conversion for diagnostics and display only; never feed the
    /// result back into venue arithmetic.
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Rounding {
    TowardZero,
    AwayFromZero,
}

/// `(a · b) / d` with a 256-bit intermediate product.
fn wide_mul_div(a: i128, b: i128, d: i128, rounding: Rounding) -> Result<i128, MathError> {
    if d == 0 {
        return Err(MathError::DivisionByZero);
    }
    let negative = ((a < 0) != (b < 0)) != (d < 0);
    let prod = U256::from(a.unsigned_abs()) * U256::from(b.unsigned_abs());
    let den = U256::from(d.unsigned_abs());
    let mut q = prod / den;
    if rounding == Rounding::AwayFromZero && prod % den != U256::ZERO {
        q += U256::from(1u8);
    }
    let q: u128 = q.try_into().map_err(|_| MathError::Overflow)?;
    if negative {
        if q > i128::MAX as u128 + 1 {
            Err(MathError::Overflow)
        } else if q == i128::MAX as u128 + 1 {
            Ok(i128::MIN)
        } else {
            Ok(-(q as i128))
        }
    } else if q > i128::MAX as u128 {
        Err(MathError::Overflow)
    } else {
        Ok(q as i128)
    }
}

impl Neg for Fixed {
    type Output = Fixed;

    #[inline]
    fn neg(self) -> Fixed {
        Fixed(self.0.saturating_neg())
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({})", self)
    }
}

impl fmt::Display for Fixed {
    /// Renders the exact decimal value, trimming trailing fractional zeros:
    /// `1.5`, `-0.000000000000000001`, `42`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mag = self.0.unsigned_abs();
        let whole = mag / Fixed::SCALE as u128;
        let frac = mag % Fixed::SCALE as u128;
        if self.0 < 0 {
            write!(f, "-")?;
        }
        if frac == 0 {
            write!(f, "{whole}")
        } else {
            let digits = format!("{frac:018}");
            write!(f, "{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}

/// Error parsing a decimal string into [`Fixed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid fixed-point literal: {0}")]
pub struct ParseFixedError(String);

impl FromStr for Fixed {
    type Err = ParseFixedError;

    /// Parses `[-]digits[.digits]`. Fractional digits beyond the 18th are
    /// truncated toward zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseFixedError(s.to_string());
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if body.is_empty() {
            return Err(bad());
        }
        let (whole_s, frac_s) = match body.split_once('.') {
            Some((w, fr)) => (w, fr),
            None => (body, ""),
        };
        if whole_s.is_empty() && frac_s.is_empty() {
            return Err(bad());
        }
        let whole: u128 = if whole_s.is_empty() {
            0
        } else {
            whole_s.parse().map_err(|_| bad())?
        };
        let mut frac: u128 = 0;
        let mut kept = 0u32;
        for (i, c) in frac_s.chars().enumerate() {
            let digit = c.to_digit(10).ok_or_else(bad)? as u128;
            if i < Fixed::DECIMALS as usize {
                frac = frac * 10 + digit;
                kept += 1;
            }
        }
        frac *= 10u128.pow(Fixed::DECIMALS - kept);
        let mag = whole
            .checked_mul(Fixed::SCALE as u128)
            .and_then(|m| m.checked_add(frac))
            .ok_or_else(bad)?;
        if mag > i128::MAX as u128 {
            return Err(bad());
        }
        let raw = mag as i128;
        Ok(Fixed(if negative { -raw } else { raw }))
    }
}

impl Serialize for Fixed {
    /// Serializes through the exact decimal string form so JSON consumers
    /// never see a lossy float.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Fixed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
