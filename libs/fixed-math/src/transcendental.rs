//! `ln`, `exp`, and `sqrt` over 18-decimal fixed point.
//!
//! `ln` decomposes its argument into `2^k · m` with `m` in `[1, 2)` and
//! interpolates `ln(m)` from a frozen sample table, so its accuracy is the
//! table's accuracy. `exp` and `sqrt` are closed-form and table-free.

use alloy_primitives::U256;
use types::errors::MathError;
use types::numeric::Fixed;

use crate::lookup::LookupTable;
use crate::tables;

/// `ln(2)` scaled by `10^18`, truncated toward zero. Range reduction for
/// both `ln` and `exp` is exact in multiples of this constant, which is
/// what makes `exp(ln 2) = 2` hold bit-for-bit.
pub const LN_2: Fixed = Fixed::from_raw(693_147_180_559_945_309);

/// Inputs above this fail with [`MathError::ExponentTooLarge`]: beyond it
/// the result carries no usable 18-decimal precision.
pub const EXP_INPUT_CEILING: Fixed = Fixed::from_raw(100 * Fixed::SCALE);

const EXP_SERIES_TERMS: i128 = 32;
const SQRT_MAX_ROUNDS: usize = 255;

/// Table-backed transcendental context: owns the natural-log sample table.
///
/// The table must be populated ([`Transcendentals::set_ln`]) and then
/// frozen ([`Transcendentals::freeze_ln`]) before `ln` serves reads.
#[derive(Debug, Clone)]
pub struct Transcendentals {
    ln_table: LookupTable,
}

impl Transcendentals {
    /// An empty, open context. `ln` fails with `TableOpen` until the
    /// populate-then-freeze protocol completes.
    pub fn new() -> Self {
        Self {
            ln_table: LookupTable::new(),
        }
    }

    /// A context populated and frozen with the bundled sample set.
    pub fn with_default_table() -> Self {
        let mut ctx = Self::new();
        let (keys, values) = tables::default_ln_samples();
        ctx.set_ln(&keys, &values)
            .expect("bundled samples are well-formed");
        ctx.freeze_ln();
        ctx
    }

    /// Populate the `ln(m)` samples for `m` in `[1, 2]`.
    pub fn set_ln(&mut self, keys: &[Fixed], values: &[Fixed]) -> Result<(), MathError> {
        self.ln_table.set(keys, values)
    }

    /// Freeze the `ln` table; one-way.
    pub fn freeze_ln(&mut self) {
        self.ln_table.freeze();
    }

    pub fn ln_frozen(&self) -> bool {
        self.ln_table.is_frozen()
    }

    /// Natural logarithm for `x > 0`.
    ///
    /// `x = 2^k · m` with `m` in `[1, 2)`, then
    /// `ln(x) = k·ln2 + interp(ln(m))`.
    pub fn ln(&self, x: Fixed) -> Result<Fixed, MathError> {
        if !x.is_positive() {
            return Err(MathError::OutOfDomain);
        }
        let mut m = x.raw();
        let mut k: i128 = 0;
        while m >= 2 * Fixed::SCALE {
            m /= 2;
            k += 1;
        }
        while m < Fixed::SCALE {
            m *= 2;
            k -= 1;
        }
        let frac = self.ln_table.interpolate(Fixed::from_raw(m))?;
        // |k| < 128, so k·ln2 stays far inside the mantissa range.
        Fixed::from_raw(k * LN_2.raw()).add(frac)
    }
}

impl Default for Transcendentals {
    fn default() -> Self {
        Self::new()
    }
}

/// Square root for `x ≥ 0`, exact to the last mantissa digit:
/// `floor(sqrt(x·10^18))` over the widened mantissa via Newton-Raphson,
/// seeded from the bit length and iterated to a fixed round cap.
pub fn sqrt(x: Fixed) -> Result<Fixed, MathError> {
    if x.is_negative() {
        return Err(MathError::OutOfDomain);
    }
    if x.is_zero() {
        return Ok(Fixed::ZERO);
    }
    let s = U256::from(x.raw() as u128) * U256::from(Fixed::SCALE as u128);
    // Seed at 2^ceil(bits/2) ≥ √s, so the iteration decreases monotonically.
    let mut y = U256::from(1u8) << ((s.bit_len() + 1) / 2);
    for _ in 0..SQRT_MAX_ROUNDS {
        let z = (y + s / y) >> 1;
        if z >= y {
            break;
        }
        y = z;
    }
    while y * y > s {
        y -= U256::from(1u8);
    }
    let raw: u128 = y.try_into().map_err(|_| MathError::Overflow)?;
    Ok(Fixed::from_raw(raw as i128))
}

/// Exponential.
///
/// Range-reduces to `x = n·ln2 + r` with `r` in `[0, ln2)`, evaluates
/// `e^r` by series, and rescales by `2^n`. Inputs above
/// [`EXP_INPUT_CEILING`] fail with `ExponentTooLarge`; results past the
/// mantissa range fail with `Overflow`; very negative inputs saturate to
/// zero.
pub fn exp(x: Fixed) -> Result<Fixed, MathError> {
    if x > EXP_INPUT_CEILING {
        return Err(MathError::ExponentTooLarge);
    }
    let n = x.raw().div_euclid(LN_2.raw());
    let r = x.raw().rem_euclid(LN_2.raw());

    // e^r = Σ r^i / i!, terms strictly shrinking for r < ln2.
    let mut term = Fixed::SCALE;
    let mut acc = Fixed::SCALE;
    for i in 1..EXP_SERIES_TERMS {
        term = term * r / Fixed::SCALE / i;
        if term == 0 {
            break;
        }
        acc += term;
    }

    if n >= 0 {
        if n >= 127 || acc > i128::MAX >> n {
            return Err(MathError::Overflow);
        }
        Ok(Fixed::from_raw(acc << n))
    } else {
        let shift = -n;
        if shift >= 127 {
            return Ok(Fixed::ZERO);
        }
        Ok(Fixed::from_raw(acc >> shift))
    }
}
