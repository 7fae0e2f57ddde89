//! Trust tiers — risk classification gating settlement rate limits.
//!
//! The tier is a pure function of account age and confirmed-claim count.
//! Higher tiers widen the hourly request ceiling and shrink the cooldown
//! toward zero. Tiers never touch balances — they are advisory rate
//! limiting, not accounting.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::constants;

/// Risk tier ladder. Ordering is meaningful: `New < Regular < Trusted < Veteran`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum TrustTier {
    /// New or unproven account. Strictest ceiling, longest cooldown.
    New,
    /// At least a week old with one confirmed claim.
    Regular,
    /// A month old with a track record of confirmed claims.
    Trusted,
    /// Long-standing account with many confirmed claims. No cooldown.
    Veteran,
}

impl TrustTier {
    /// Classify from account age and lifetime confirmed-claim count.
    #[must_use]
    pub fn classify(account_age_days: i64, successful_claims: u64) -> Self {
        if account_age_days >= constants::VETERAN_MIN_ACCOUNT_AGE_DAYS
            && successful_claims >= constants::VETERAN_MIN_CONFIRMED_CLAIMS
        {
            Self::Veteran
        } else if account_age_days >= constants::TRUSTED_MIN_ACCOUNT_AGE_DAYS
            && successful_claims >= constants::TRUSTED_MIN_CONFIRMED_CLAIMS
        {
            Self::Trusted
        } else if account_age_days >= constants::REGULAR_MIN_ACCOUNT_AGE_DAYS
            && successful_claims >= constants::REGULAR_MIN_CONFIRMED_CLAIMS
        {
            Self::Regular
        } else {
            Self::New
        }
    }

    /// Maximum claim requests per trailing hour for this tier.
    #[must_use]
    pub fn hourly_request_ceiling(&self) -> usize {
        match self {
            Self::New => constants::NEW_HOURLY_CEILING,
            Self::Regular => constants::REGULAR_HOURLY_CEILING,
            Self::Trusted => constants::TRUSTED_HOURLY_CEILING,
            Self::Veteran => constants::VETERAN_HOURLY_CEILING,
        }
    }

    /// Required gap between confirmed claims for this tier.
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        let secs = match self {
            Self::New => constants::NEW_COOLDOWN_SECS,
            Self::Regular => constants::REGULAR_COOLDOWN_SECS,
            Self::Trusted => constants::TRUSTED_COOLDOWN_SECS,
            Self::Veteran => constants::VETERAN_COOLDOWN_SECS,
        };
        Duration::seconds(secs)
    }
}

impl std::fmt::Display for TrustTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "NEW"),
            Self::Regular => write!(f, "REGULAR"),
            Self::Trusted => write!(f, "TRUSTED"),
            Self::Veteran => write!(f, "VETERAN"),
        }
    }
}

/// Snapshot returned by the trust engine's `evaluate`. Derived, not a
/// source of truth — recomputed on demand from recorded history.
/// Not serialized: `chrono::Duration` carries no serde impls and the
/// snapshot never leaves the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustSnapshot {
    pub tier: TrustTier,
    pub hourly_request_ceiling: usize,
    /// Time left until the next claim is allowed. Zero when no cooldown
    /// applies.
    pub cooldown_remaining: Duration,
    pub account_age_days: i64,
    pub successful_claims: u64,
    /// Claim requests recorded in the trailing hour.
    pub requests_last_hour: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_new_account_is_new_tier() {
        assert_eq!(TrustTier::classify(0, 0), TrustTier::New);
    }

    #[test]
    fn age_alone_is_not_enough() {
        // A year-old account with zero confirmed claims stays NEW.
        assert_eq!(TrustTier::classify(365, 0), TrustTier::New);
    }

    #[test]
    fn claims_alone_are_not_enough() {
        // Many confirmed claims on a day-old account stays NEW.
        assert_eq!(TrustTier::classify(1, 50), TrustTier::New);
    }

    #[test]
    fn tier_ladder_thresholds() {
        assert_eq!(TrustTier::classify(7, 1), TrustTier::Regular);
        assert_eq!(TrustTier::classify(30, 5), TrustTier::Trusted);
        assert_eq!(TrustTier::classify(90, 20), TrustTier::Veteran);
    }

    #[test]
    fn ceilings_widen_with_tier() {
        assert!(
            TrustTier::New.hourly_request_ceiling()
                < TrustTier::Regular.hourly_request_ceiling()
        );
        assert!(
            TrustTier::Regular.hourly_request_ceiling()
                < TrustTier::Trusted.hourly_request_ceiling()
        );
        assert!(
            TrustTier::Trusted.hourly_request_ceiling()
                < TrustTier::Veteran.hourly_request_ceiling()
        );
    }

    #[test]
    fn cooldowns_shrink_with_tier() {
        assert!(TrustTier::New.cooldown() > TrustTier::Regular.cooldown());
        assert!(TrustTier::Regular.cooldown() > TrustTier::Trusted.cooldown());
        assert_eq!(TrustTier::Veteran.cooldown(), Duration::zero());
    }

    #[test]
    fn tier_ordering() {
        assert!(TrustTier::New < TrustTier::Regular);
        assert!(TrustTier::Trusted < TrustTier::Veteran);
    }
}
