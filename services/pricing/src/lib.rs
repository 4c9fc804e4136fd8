//! Option Pricing Service
//!
//! Black-Scholes fair value, per-expiry `√t`/discount caching, and the
//! utilization-skewed execution premium. Built entirely on the venue's
//! fixed-point transcendental layer; no floating point touches a price.

pub mod black_scholes;
pub mod expiry;
pub mod premium;
pub mod pricer;

pub use expiry::{ExpiryEntry, ExpiryLookup};
pub use premium::{Premium, PremiumParams};
pub use pricer::{OptionPricer, SECONDS_PER_YEAR};
