//! Daily cap enforcer — rolling daily withdrawal quota.
//!
//! The quota state (`daily_claimed` / `daily_claimed_date`) lives on the
//! account row and is consumed by the ledger debit itself, so cap and
//! balance move under the same account access. This module is the pure
//! policy over that state: how much is left today, and whether a
//! request fits.

use chrono::NaiveDate;
use rewardrail_types::{RewardAccount, RewardConfig, RewardrailError, Result};
use rust_decimal::Decimal;

/// Computes the remaining daily withdrawal quota for an account.
pub struct DailyCapPolicy {
    config: RewardConfig,
}

impl DailyCapPolicy {
    /// Create a policy from engine configuration.
    #[must_use]
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    /// Remaining quota for the given UTC day.
    ///
    /// A stale quota date means the quota has reset: the full limit is
    /// available. Accounts that do not exist yet get the default
    /// (adult) limit — there is nothing to claim anyway.
    #[must_use]
    pub fn remaining(&self, account: Option<&RewardAccount>, today: NaiveDate) -> Decimal {
        let Some(account) = account else {
            return self.config.daily_claim_limit;
        };
        let limit = self.config.daily_limit_for(account.age_group);
        let used = account.daily_claimed_on(today);
        std::cmp::max(Decimal::ZERO, limit - used)
    }

    /// Gate a withdrawal request against the remaining quota.
    ///
    /// # Errors
    /// Returns `DailyLimitExceeded` if `requested > remaining`.
    pub fn check(
        &self,
        account: Option<&RewardAccount>,
        requested: Decimal,
        today: NaiveDate,
    ) -> Result<()> {
        let remaining = self.remaining(account, today);
        if requested > remaining {
            return Err(RewardrailError::DailyLimitExceeded {
                requested,
                remaining,
            });
        }
        Ok(())
    }

    /// The configuration this policy was built from.
    #[must_use]
    pub fn config(&self) -> &RewardConfig {
        &self.config
    }
}
