//! Frozen sample tables with linear interpolation.

use types::errors::MathError;
use types::numeric::Fixed;

/// Mutability state of a [`LookupTable`]. The transition is one-way:
/// once frozen, a table never reopens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    Open,
    Frozen,
}

/// An ordered set of `(key, value)` sample pairs.
///
/// Tables are populated while `Open` and must be frozen before reads.
/// Writes after freezing fail with [`MathError::Frozen`]; reads before
/// freezing fail with [`MathError::TableOpen`].
#[derive(Debug, Clone)]
pub struct LookupTable {
    keys: Vec<Fixed>,
    values: Vec<Fixed>,
    state: TableState,
}

impl LookupTable {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            state: TableState::Open,
        }
    }

    /// Replace the sample set. Requires equal-length, strictly ascending
    /// keys and at least two samples.
    pub fn set(&mut self, keys: &[Fixed], values: &[Fixed]) -> Result<(), MathError> {
        if self.state == TableState::Frozen {
            return Err(MathError::Frozen);
        }
        if keys.len() != values.len() || keys.len() < 2 {
            return Err(MathError::LengthMismatch);
        }
        if keys.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MathError::UnsortedKeys);
        }
        self.keys = keys.to_vec();
        self.values = values.to_vec();
        Ok(())
    }

    /// Freeze the table. Idempotent; freezing an empty table is allowed
    /// but such a table can never serve reads.
    pub fn freeze(&mut self) {
        self.state = TableState::Frozen;
    }

    pub fn state(&self) -> TableState {
        self.state
    }

    pub fn is_frozen(&self) -> bool {
        self.state == TableState::Frozen
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Linearly interpolate the tabulated function at `x`.
    ///
    /// Inputs outside the sampled key range clamp to the boundary values;
    /// callers perform range reduction so this only trims rounding spill.
    pub fn interpolate(&self, x: Fixed) -> Result<Fixed, MathError> {
        if !self.is_frozen() || self.keys.len() < 2 {
            return Err(MathError::TableOpen);
        }
        let first = self.keys[0];
        let last = *self.keys.last().expect("non-empty by check above");
        if x <= first {
            return Ok(self.values[0]);
        }
        if x >= last {
            return Ok(*self.values.last().expect("non-empty by check above"));
        }
        // Bracketing pair: keys[i] <= x < keys[i + 1].
        let i = self.keys.partition_point(|k| *k <= x) - 1;
        let (k0, k1) = (self.keys[i], self.keys[i + 1]);
        let (v0, v1) = (self.values[i], self.values[i + 1]);
        let run = k1.sub(k0)?;
        let rise = v1.sub(v0)?;
        v0.add(x.sub(k0)?.mul_div(rise, run)?)
    }
}

impl Default for LookupTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(s: &str) -> Fixed {
        s.parse().unwrap()
    }

    fn sample_table() -> LookupTable {
        let mut t = LookupTable::new();
        t.set(
            &[fx("1"), fx("2"), fx("3")],
            &[fx("10"), fx("20"), fx("40")],
        )
        .unwrap();
        t.freeze();
        t
    }

    #[test]
    fn test_set_requires_equal_lengths() {
        let mut t = LookupTable::new();
        let err = t.set(&[fx("1"), fx("2")], &[fx("10")]);
        assert_eq!(err, Err(MathError::LengthMismatch));
    }

    #[test]
    fn test_set_requires_two_samples() {
        let mut t = LookupTable::new();
        let err = t.set(&[fx("1")], &[fx("10")]);
        assert_eq!(err, Err(MathError::LengthMismatch));
    }

    #[test]
    fn test_set_requires_ascending_keys() {
        let mut t = LookupTable::new();
        let err = t.set(&[fx("2"), fx("1")], &[fx("10"), fx("20")]);
        assert_eq!(err, Err(MathError::UnsortedKeys));
        let err = t.set(&[fx("1"), fx("1")], &[fx("10"), fx("20")]);
        assert_eq!(err, Err(MathError::UnsortedKeys));
    }

    #[test]
    fn test_freeze_is_one_way() {
        let mut t = sample_table();
        assert!(t.is_frozen());
        let err = t.set(&[fx("1"), fx("2")], &[fx("1"), fx("2")]);
        assert_eq!(err, Err(MathError::Frozen));
    }

    #[test]
    fn test_read_before_freeze_rejected() {
        let mut t = LookupTable::new();
        t.set(&[fx("1"), fx("2")], &[fx("10"), fx("20")]).unwrap();
        assert_eq!(t.interpolate(fx("1.5")), Err(MathError::TableOpen));
    }

    #[test]
    fn test_interpolates_midpoint() {
        let t = sample_table();
        assert_eq!(t.interpolate(fx("1.5")).unwrap(), fx("15"));
        assert_eq!(t.interpolate(fx("2.25")).unwrap(), fx("25"));
    }

    #[test]
    fn test_exact_keys_return_exact_values() {
        let t = sample_table();
        assert_eq!(t.interpolate(fx("1")).unwrap(), fx("10"));
        assert_eq!(t.interpolate(fx("2")).unwrap(), fx("20"));
        assert_eq!(t.interpolate(fx("3")).unwrap(), fx("40"));
    }

    #[test]
    fn test_out_of_range_clamps() {
        let t = sample_table();
        assert_eq!(t.interpolate(fx("0.5")).unwrap(), fx("10"));
        assert_eq!(t.interpolate(fx("99")).unwrap(), fx("40"));
    }

    #[test]
    fn test_interpolation_truncates_toward_zero() {
        let mut t = LookupTable::new();
        // Rise of 1 raw unit over a run of 3: the midpoint interpolant is
        // fractional and truncates away.
        t.set(
            &[Fixed::from_raw(0), Fixed::from_raw(3)],
            &[Fixed::from_raw(0), Fixed::from_raw(1)],
        )
        .unwrap();
        t.freeze();
        assert_eq!(t.interpolate(Fixed::from_raw(2)).unwrap().raw(), 0);
    }
}
