//! Risk event definitions.
//!
//! Serializable events emitted by the margin engine for monitoring and
//! settlement pipelines: health threshold crossings, executed
//! liquidations, and account clears.

use serde::{Deserialize, Serialize};
use types::ids::AccountId;
use types::market::OptionKey;
use types::numeric::Fixed;
use uuid::Uuid;

use crate::liquidation::HealthLevel;

/// Risk event emitted by the margin engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEvent {
    pub event_id: Uuid,
    pub account: AccountId,
    pub event_type: RiskEventType,
    pub health_factor: Fixed,
    pub equity: Fixed,
    pub timestamp: i64,
}

/// Risk event type classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskEventType {
    /// Health factor dropped below the liquidation threshold.
    LiquidationEligible,
    /// Health factor dropped below the clear threshold.
    ClearEligible,
    /// A partial liquidation executed against the account.
    LiquidationExecuted {
        liquidator: AccountId,
        key: OptionKey,
        size: Fixed,
        premium: Fixed,
        reward: Fixed,
    },
    /// The account was wiped to the insurance fund.
    AccountCleared {
        positions_moved: usize,
        balance_moved: Fixed,
    },
}

impl RiskEvent {
    /// Create a risk event from current account state.
    pub fn new(
        account: AccountId,
        event_type: RiskEventType,
        health_factor: Fixed,
        equity: Fixed,
        timestamp: i64,
    ) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            account,
            event_type,
            health_factor,
            equity,
            timestamp,
        }
    }
}

/// Events implied by an account's current health level.
pub fn events_for_health(
    account: AccountId,
    health: HealthLevel,
    health_factor: Fixed,
    equity: Fixed,
    timestamp: i64,
) -> Vec<RiskEvent> {
    match health {
        HealthLevel::Healthy => Vec::new(),
        HealthLevel::Liquidatable => vec![RiskEvent::new(
            account,
            RiskEventType::LiquidationEligible,
            health_factor,
            equity,
            timestamp,
        )],
        HealthLevel::Clearable => vec![RiskEvent::new(
            account,
            RiskEventType::ClearEligible,
            health_factor,
            equity,
            timestamp,
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(s: &str) -> Fixed {
        s.parse().unwrap()
    }

    #[test]
    fn test_no_events_for_healthy() {
        let events = events_for_health(
            AccountId::new(),
            HealthLevel::Healthy,
            fx("3"),
            fx("10000"),
            1_700_000_000,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_liquidation_eligible_event() {
        let events = events_for_health(
            AccountId::new(),
            HealthLevel::Liquidatable,
            fx("0.8"),
            fx("900"),
            1_700_000_000,
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, RiskEventType::LiquidationEligible);
        assert_eq!(events[0].health_factor, fx("0.8"));
    }

    #[test]
    fn test_clear_eligible_event() {
        let events = events_for_health(
            AccountId::new(),
            HealthLevel::Clearable,
            fx("0.1"),
            fx("-50"),
            1_700_000_000,
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, RiskEventType::ClearEligible);
    }

    #[test]
    fn test_event_ids_unique() {
        let account = AccountId::new();
        let e1 = RiskEvent::new(account, RiskEventType::LiquidationEligible, fx("0.5"), fx("1"), 0);
        let e2 = RiskEvent::new(account, RiskEventType::LiquidationEligible, fx("0.5"), fx("1"), 0);
        assert_ne!(e1.event_id, e2.event_id);
    }

    #[test]
    fn test_event_serializes() {
        let event = RiskEvent::new(
            AccountId::new(),
            RiskEventType::AccountCleared {
                positions_moved: 3,
                balance_moved: fx("120.5"),
            },
            fx("0.1"),
            fx("-4"),
            1_700_000_000,
        );
        let json = serde_json::to_string(&event).unwrap();
        let back: RiskEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
