//! Table-driven transcendental math over 18-decimal fixed point
//!
//! Provides the deterministic `ln`, `exp`, `sqrt`, and normal-CDF
//! approximations the option pricer is built on. `ln` interpolates a
//! frozen lookup table after power-of-two range reduction; `exp` combines
//! a power-of-two multiplier with a short series; `sqrt` is Newton
//! iteration on the widened mantissa. No floating point anywhere.

pub mod lookup;
pub mod normal;
pub mod tables;
pub mod transcendental;

pub use lookup::{LookupTable, TableState};
pub use normal::norm_cdf;
pub use transcendental::{exp, sqrt, Transcendentals, EXP_INPUT_CEILING, LN_2};
