//! The option pricer: transcendental context + per-expiry lookup.

use fixed_math::transcendental::Transcendentals;
use types::errors::PricingError;
use types::numeric::Fixed;

use crate::black_scholes;
use crate::expiry::{ExpiryEntry, ExpiryLookup};
use crate::premium::{self, Premium, PremiumParams};

/// Seconds in the venue's pricing year (365 days).
pub const SECONDS_PER_YEAR: i64 = 31_536_000;

/// Fair-value and premium quoting over a frozen transcendental context.
///
/// [`OptionPricer::update_lookup`] must run once per expiry (and again
/// whenever the clock or rate moves) before that expiry can be priced;
/// pricing an unprepared expiry fails with
/// [`PricingError::ExpiryNotPrepared`].
#[derive(Debug, Clone)]
pub struct OptionPricer {
    math: Transcendentals,
    lookup: ExpiryLookup,
}

impl OptionPricer {
    /// Build over an already-populated transcendental context.
    pub fn new(math: Transcendentals) -> Self {
        Self {
            math,
            lookup: ExpiryLookup::new(),
        }
    }

    /// Build with the bundled ln samples, populated and frozen.
    pub fn with_default_table() -> Self {
        Self::new(Transcendentals::with_default_table())
    }

    pub fn math(&self) -> &Transcendentals {
        &self.math
    }

    /// Time to expiry as a year fraction, truncated toward zero; zero at
    /// or past expiry.
    pub fn year_fraction(expiry: i64, now: i64) -> Fixed {
        let seconds = (expiry - now).max(0);
        Fixed::from_raw(seconds as i128 * Fixed::SCALE / SECONDS_PER_YEAR as i128)
    }

    /// Cache `√t` and the discount factor for `expiry`.
    pub fn update_lookup(
        &mut self,
        expiry: i64,
        time_to_expiry: Fixed,
        rate: Fixed,
    ) -> Result<ExpiryEntry, PricingError> {
        Ok(self.lookup.update(expiry, time_to_expiry, rate)?)
    }

    pub fn entry(&self, expiry: i64) -> Option<ExpiryEntry> {
        self.lookup.get(expiry)
    }

    /// Black-Scholes value of one option at the cached expiry terms.
    #[allow(clippy::too_many_arguments)]
    pub fn get_price(
        &self,
        is_call: bool,
        expiry: i64,
        time_to_expiry: Fixed,
        volatility: Fixed,
        spot: Fixed,
        strike: Fixed,
        rate: Fixed,
    ) -> Result<Fixed, PricingError> {
        if !volatility.is_positive() {
            return Err(PricingError::ZeroImpliedVolatility);
        }
        let entry = self
            .lookup
            .get(expiry)
            .ok_or(PricingError::ExpiryNotPrepared)?;
        Ok(black_scholes::value(
            &self.math,
            entry,
            is_call,
            time_to_expiry,
            volatility,
            spot,
            strike,
            rate,
        )?)
    }

    /// Premium quote at the utilization-skewed execution price.
    pub fn get_premium(&self, params: &PremiumParams) -> Result<Premium, PricingError> {
        premium::get_premium(params)
    }
}
