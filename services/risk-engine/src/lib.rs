//! Margin Engine Service
//!
//! Account risk snapshots (initial margin, equity, health factor), the
//! partial-liquidation decision and sizing flow, and the full clear flow,
//! built on the position ledger and the option pricer. All state
//! transitions are synchronous read-modify-write against the shared
//! ledger; failures commit nothing.

pub mod engine;
pub mod events;
pub mod exposure;
pub mod liquidation;
pub mod markets;

pub use engine::{ClearReceipt, LiquidationReceipt, MarginEngine, TradeReceipt};
pub use events::{RiskEvent, RiskEventType};
pub use exposure::AccountInfo;
pub use liquidation::HealthLevel;
pub use markets::MarketBoard;
