//! Engine configuration.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{constants, AgeGroup};

/// Tunable limits for accrual and settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Daily claim limit for adult accounts, in points.
    pub daily_claim_limit: Decimal,
    /// Daily claim limit for child accounts.
    pub child_daily_claim_limit: Decimal,
    /// Daily claim limit for teen accounts.
    pub teen_daily_claim_limit: Decimal,
    /// Maximum wallet switches per account.
    pub max_wallet_switches: u32,
    /// How long a SUBMITTED claim may wait before reconciliation
    /// queries the rail, in seconds.
    pub reconcile_after_secs: i64,
}

impl RewardConfig {
    /// The daily cap applicable to an account's age group.
    #[must_use]
    pub fn daily_limit_for(&self, age_group: AgeGroup) -> Decimal {
        match age_group {
            AgeGroup::Child => self.child_daily_claim_limit,
            AgeGroup::Teen => self.teen_daily_claim_limit,
            AgeGroup::Adult => self.daily_claim_limit,
        }
    }

    /// Reconciliation eligibility window as a `Duration`.
    #[must_use]
    pub fn reconcile_after(&self) -> Duration {
        Duration::seconds(self.reconcile_after_secs)
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            daily_claim_limit: Decimal::new(constants::DEFAULT_DAILY_CLAIM_LIMIT, 0),
            child_daily_claim_limit: Decimal::new(constants::CHILD_DAILY_CLAIM_LIMIT, 0),
            teen_daily_claim_limit: Decimal::new(constants::TEEN_DAILY_CLAIM_LIMIT, 0),
            max_wallet_switches: constants::MAX_WALLET_SWITCHES,
            reconcile_after_secs: constants::DEFAULT_RECONCILE_AFTER_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits() {
        let cfg = RewardConfig::default();
        assert_eq!(
            cfg.daily_limit_for(AgeGroup::Adult),
            Decimal::new(100_000, 0)
        );
        assert_eq!(cfg.max_wallet_switches, 3);
        assert!(cfg.reconcile_after() > Duration::zero());
    }

    #[test]
    fn younger_groups_get_lower_caps() {
        let cfg = RewardConfig::default();
        assert!(cfg.daily_limit_for(AgeGroup::Child) < cfg.daily_limit_for(AgeGroup::Teen));
        assert!(cfg.daily_limit_for(AgeGroup::Teen) < cfg.daily_limit_for(AgeGroup::Adult));
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = RewardConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: RewardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.daily_claim_limit, back.daily_claim_limit);
        assert_eq!(cfg.max_wallet_switches, back.max_wallet_switches);
    }
}
