//! Accrual events — the append-only audit trail of earned rewards.
//!
//! Events are created by activity producers (gameplay tracker, upload
//! approval flow, referral tracker, daily-login checker) and are never
//! mutated or deleted. One-time bonuses carry a `dedupe_key` so replays
//! are idempotent no-ops rather than double grants.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccrualId, UserId};

/// The in-app activity that earned the reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardSource {
    /// Finished a game session.
    GameCompletion,
    /// An uploaded game passed review.
    GameUpload,
    /// A referred user signed up and qualified.
    ReferralBonus,
    /// Daily login streak reward.
    DailyLogin,
    /// One-time signup bonus.
    WelcomeBonus,
    /// Manual grant from the admin panel.
    AdminGrant,
}

impl std::fmt::Display for RewardSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GameCompletion => write!(f, "game_completion"),
            Self::GameUpload => write!(f, "game_upload"),
            Self::ReferralBonus => write!(f, "referral_bonus"),
            Self::DailyLogin => write!(f, "daily_login"),
            Self::WelcomeBonus => write!(f, "welcome_bonus"),
            Self::AdminGrant => write!(f, "admin_grant"),
        }
    }
}

/// One immutable reward-earning record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrualEvent {
    pub id: AccrualId,
    pub user_id: UserId,
    pub source: RewardSource,
    /// Always positive — validated at accrual time.
    pub amount: Decimal,
    /// Present for one-time bonuses; `(user_id, dedupe_key)` is unique.
    pub dedupe_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Result of an accrual call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccrualOutcome {
    /// The event was recorded and the balance credited.
    Granted(AccrualId),
    /// An event with the same `(user_id, dedupe_key)` already exists.
    /// Nothing was recorded or credited.
    AlreadyGranted,
}

impl AccrualOutcome {
    /// Whether this call actually credited the balance.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }
}
