//! Position Ledger Service
//!
//! Exclusive owner of account cash balances and option positions.
//! Implements weighted-average-cost accounting with realized-PnL
//! extraction across partial closes, flips, and full closes, plus the
//! settlement-asset primitives and the enumeration projections consumed
//! by the margin engine.

pub mod account;
pub mod ledger;
pub mod position;

pub use account::AccountLedger;
pub use ledger::{PositionLedger, PositionUpdate};
pub use position::{Position, TradeOutcome};
