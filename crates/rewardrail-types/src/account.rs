//! Per-user reward account aggregate.
//!
//! One `RewardAccount` exists per user, created lazily at first accrual
//! and never destroyed. The conservation invariant holds at all times:
//!
//! ```text
//! total_earned == claimed + pending
//! ```
//!
//! The daily quota fields live on the same aggregate as the balances so
//! that one `&mut` access moves balance, lifetime totals, and quota
//! together — partial application is structurally impossible.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Age bracket of the account holder. Modulates the daily claim cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AgeGroup {
    /// Under 13. Strictest daily cap.
    Child,
    /// 13–17.
    Teen,
    /// 18 and over. Full daily cap.
    #[default]
    Adult,
}

/// The per-user balance aggregate — the only contended resource in the
/// engine. Mutated exclusively by the ledger store, inside a single
/// accrual or settlement mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardAccount {
    pub user_id: UserId,
    /// Unclaimed balance. Increased by accrual, decreased by settlement.
    pub pending: Decimal,
    /// Lifetime settled total. Decreased only by a refund reversal.
    pub claimed: Decimal,
    /// Lifetime accrued total. Never decreases.
    pub total_earned: Decimal,
    /// Points claimed on `daily_claimed_date`.
    pub daily_claimed: Decimal,
    /// The UTC day `daily_claimed` refers to. A stale date means the
    /// quota has implicitly reset.
    pub daily_claimed_date: Option<NaiveDate>,
    /// When the last debit was applied.
    pub last_claim_at: Option<DateTime<Utc>>,
    /// Account creation time (first accrual).
    pub created_at: DateTime<Utc>,
    pub age_group: AgeGroup,
}

impl RewardAccount {
    /// Fresh zero-balance account.
    #[must_use]
    pub fn new(user_id: UserId, age_group: AgeGroup, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            pending: Decimal::ZERO,
            claimed: Decimal::ZERO,
            total_earned: Decimal::ZERO,
            daily_claimed: Decimal::ZERO,
            daily_claimed_date: None,
            last_claim_at: None,
            created_at: now,
            age_group,
        }
    }

    /// Whether the conservation invariant holds for this account.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        self.total_earned == self.claimed + self.pending
    }

    /// Points claimed on the given UTC day. Zero if the quota date is stale.
    #[must_use]
    pub fn daily_claimed_on(&self, day: NaiveDate) -> Decimal {
        if self.daily_claimed_date == Some(day) {
            self.daily_claimed
        } else {
            Decimal::ZERO
        }
    }

    /// Read-only snapshot of the three balance aggregates.
    #[must_use]
    pub fn balance_view(&self) -> BalanceView {
        BalanceView {
            pending: self.pending,
            claimed: self.claimed,
            total_earned: self.total_earned,
        }
    }
}

/// Read-only balance snapshot returned to callers (UI, collaborators).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BalanceView {
    pub pending: Decimal,
    pub claimed: Decimal,
    pub total_earned: Decimal,
}

impl BalanceView {
    /// Whether this view has no balance at all.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.pending.is_zero() && self.claimed.is_zero() && self.total_earned.is_zero()
    }
}
