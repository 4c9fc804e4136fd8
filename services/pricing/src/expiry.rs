//! Per-expiry pricing lookup: `√t` and the discount factor.
//!
//! Black-Scholes evaluation needs `sqrt(timeToExpiry)` and
//! `exp(-r · timeToExpiry)` for every priced expiry. Both are cached here
//! by an explicit `update` call so a pricing pass performs no repeated
//! root/exponential work; an expired entry collapses to `√t = 0` and a
//! discount factor of one.

use std::collections::BTreeMap;

use fixed_math::transcendental;
use serde::{Deserialize, Serialize};
use types::errors::MathError;
use types::numeric::Fixed;

/// Cached terms for one expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryEntry {
    /// `sqrt(timeToExpiry)`; zero once expired.
    pub sqrt_t: Fixed,
    /// `exp(-rate · timeToExpiry)`; one once expired.
    pub discount: Fixed,
}

impl ExpiryEntry {
    pub fn is_expired(&self) -> bool {
        self.sqrt_t.is_zero()
    }
}

/// Expiry → cached terms.
#[derive(Debug, Clone, Default)]
pub struct ExpiryLookup {
    entries: BTreeMap<i64, ExpiryEntry>,
}

impl ExpiryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)compute the cached terms for `expiry` from the current time to
    /// expiry in years. Must run once per expiry before pricing uses it.
    pub fn update(
        &mut self,
        expiry: i64,
        time_to_expiry: Fixed,
        rate: Fixed,
    ) -> Result<ExpiryEntry, MathError> {
        let entry = if time_to_expiry.is_positive() {
            ExpiryEntry {
                sqrt_t: transcendental::sqrt(time_to_expiry)?,
                discount: transcendental::exp(-rate.mul(time_to_expiry)?)?,
            }
        } else {
            ExpiryEntry {
                sqrt_t: Fixed::ZERO,
                discount: Fixed::ONE,
            }
        };
        self.entries.insert(expiry, entry);
        Ok(entry)
    }

    pub fn get(&self, expiry: i64) -> Option<ExpiryEntry> {
        self.entries.get(&expiry).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
