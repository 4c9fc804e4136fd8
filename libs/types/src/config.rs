//! Externally supplied rate and threshold configuration.

use serde::{Deserialize, Serialize};

use crate::numeric::Fixed;

/// Risk, fee, and premium-skew parameters for one pool.
///
/// These values arrive from the venue's governance layer; the core only
/// consumes them. All rates are plain fixed-point fractions (`0.1` = 10%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Rate applied to short-exposure risk when computing initial margin.
    pub initial_margin_risk_rate: Fixed,
    /// Fee charged on traded premium.
    pub fee_rate: Fixed,
    /// Health-factor threshold below which partial liquidation opens.
    pub liquidate_rate: Fixed,
    /// Health-factor threshold below which a full clear opens
    /// (stricter than `liquidate_rate`).
    pub clear_rate: Fixed,
    /// Fraction of the liquidated slice's premium paid to the liquidator.
    pub liquidation_reward: Fixed,
    /// Share of retained fees routed to the insurance account; the
    /// remainder goes to the stakeholder account.
    pub insurance_proportion: Fixed,
    /// Floor on the per-contract execution price.
    pub min_premium: Fixed,
    /// Premium markup at the utilization knee.
    pub price_ratio: Fixed,
    /// Additional markup slope past the knee.
    pub price_ratio2: Fixed,
    /// Utilization level at which the skew slope steepens.
    pub price_ratio_utilization: Fixed,
    /// Continuously compounded risk-free rate for discounting.
    pub risk_free_rate: Fixed,
}

impl Default for RiskConfig {
    fn default() -> Self {
        fn fx(s: &str) -> Fixed {
            s.parse().expect("static config literal")
        }
        Self {
            initial_margin_risk_rate: fx("0.1"),
            fee_rate: fx("0.005"),
            liquidate_rate: fx("1"),
            clear_rate: fx("0.2"),
            liquidation_reward: fx("0.1"),
            insurance_proportion: fx("0.5"),
            min_premium: fx("0.01"),
            price_ratio: fx("0.1"),
            price_ratio2: fx("0.5"),
            price_ratio_utilization: fx("0.7"),
            risk_free_rate: fx("0.06"),
        }
    }
}

impl RiskConfig {
    /// `true` when every threshold is internally consistent: the clear
    /// threshold must sit below the liquidation threshold, proportions in
    /// [0, 1], and the skew knee strictly inside (0, 1).
    pub fn is_coherent(&self) -> bool {
        self.clear_rate <= self.liquidate_rate
            && !self.insurance_proportion.is_negative()
            && self.insurance_proportion <= Fixed::ONE
            && !self.liquidation_reward.is_negative()
            && self.liquidation_reward <= Fixed::ONE
            && self.price_ratio_utilization.is_positive()
            && self.price_ratio_utilization < Fixed::ONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_coherent() {
        assert!(RiskConfig::default().is_coherent());
    }

    #[test]
    fn test_incoherent_thresholds_detected() {
        let cfg = RiskConfig {
            clear_rate: "2".parse().unwrap(),
            liquidate_rate: "1".parse().unwrap(),
            ..RiskConfig::default()
        };
        assert!(!cfg.is_coherent());
    }

    #[test]
    fn test_serde_round_trip() {
        let cfg = RiskConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: RiskConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
