//! The ledger store — balances, accrual events, and the debit path.
//!
//! All mutations are atomic: either the full operation succeeds or the
//! account is unchanged. The daily quota fields live on the account row,
//! so the debit consumes quota and balance under the same access.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use rewardrail_types::{
    AccrualEvent, AccrualId, AccrualOutcome, AgeGroup, BalanceView, RewardAccount,
    RewardSource, RewardrailError, Result, UserId,
};
use rust_decimal::Decimal;

/// Single source of truth for reward balances.
///
/// Producers call [`LedgerStore::accrue`]; only the settlement service
/// calls [`LedgerStore::debit`] and [`LedgerStore::reverse_debit`].
pub struct LedgerStore {
    /// Per-user balance aggregates. Created lazily at first accrual.
    accounts: HashMap<UserId, RewardAccount>,
    /// Append-only accrual audit trail. Never mutated or deleted.
    events: Vec<AccrualEvent>,
    /// One-time-bonus replay index over `(user_id, dedupe_key)`.
    dedupe: HashSet<(UserId, String)>,
}

impl LedgerStore {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            events: Vec::new(),
            dedupe: HashSet::new(),
        }
    }

    /// Create the account for a user up front with an explicit age group.
    ///
    /// Accrual creates accounts lazily with [`AgeGroup::default`]; the
    /// onboarding flow calls this instead when the age bracket is known.
    /// No-op if the account already exists.
    pub fn open_account(&mut self, user_id: UserId, age_group: AgeGroup, now: DateTime<Utc>) {
        self.accounts
            .entry(user_id)
            .or_insert_with(|| RewardAccount::new(user_id, age_group, now));
    }

    /// Record a reward-earning action and credit the balance.
    ///
    /// If `dedupe_key` is supplied and an event with the same
    /// `(user_id, dedupe_key)` already exists, nothing is recorded and
    /// the call reports [`AccrualOutcome::AlreadyGranted`].
    ///
    /// # Errors
    /// Returns `InvalidAmount` if `amount <= 0`.
    pub fn accrue(
        &mut self,
        user_id: UserId,
        source: RewardSource,
        amount: Decimal,
        dedupe_key: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AccrualOutcome> {
        if amount <= Decimal::ZERO {
            return Err(RewardrailError::InvalidAmount { amount });
        }

        if let Some(key) = dedupe_key {
            if self.dedupe.contains(&(user_id, key.to_string())) {
                tracing::debug!(%user_id, %source, dedupe_key = key, "accrual replay ignored");
                return Ok(AccrualOutcome::AlreadyGranted);
            }
        }

        let account = self
            .accounts
            .entry(user_id)
            .or_insert_with(|| RewardAccount::new(user_id, AgeGroup::default(), now));
        account.pending += amount;
        account.total_earned += amount;

        let event = AccrualEvent {
            id: AccrualId::new(),
            user_id,
            source,
            amount,
            dedupe_key: dedupe_key.map(ToString::to_string),
            created_at: now,
        };
        let id = event.id;
        if let Some(key) = dedupe_key {
            self.dedupe.insert((user_id, key.to_string()));
        }
        self.events.push(event);

        tracing::debug!(%user_id, %source, %amount, "accrued");
        Ok(AccrualOutcome::Granted(id))
    }

    /// Balance snapshot for a user. Zero view for unknown users.
    #[must_use]
    pub fn balance(&self, user_id: UserId) -> BalanceView {
        self.accounts
            .get(&user_id)
            .map(RewardAccount::balance_view)
            .unwrap_or_default()
    }

    /// Debit the pending balance for a settlement.
    ///
    /// Decrements `pending`, increments `claimed`, consumes the daily
    /// quota for `now`'s UTC day, and stamps `last_claim_at` — all under
    /// one account access. `total_earned` is untouched (the points were
    /// counted at accrual time). Returns the quota day consumed, which
    /// the claim carries so a refund can roll the right day back.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if `amount > pending`.
    pub fn debit(
        &mut self,
        user_id: UserId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<NaiveDate> {
        let account =
            self.accounts
                .get_mut(&user_id)
                .ok_or(RewardrailError::InsufficientBalance {
                    needed: amount,
                    available: Decimal::ZERO,
                })?;

        if account.pending < amount {
            return Err(RewardrailError::InsufficientBalance {
                needed: amount,
                available: account.pending,
            });
        }

        let today = now.date_naive();
        account.pending -= amount;
        account.claimed += amount;
        if account.daily_claimed_date == Some(today) {
            account.daily_claimed += amount;
        } else {
            account.daily_claimed = amount;
            account.daily_claimed_date = Some(today);
        }
        account.last_claim_at = Some(now);

        tracing::debug!(%user_id, %amount, %today, "debited");
        Ok(today)
    }

    /// Reverse a prior debit (refund compensation).
    ///
    /// Restores `pending` and rolls back `claimed`. The daily quota is
    /// rolled back only when the account's quota date still matches
    /// `debit_date` — after a day boundary the old quota has already
    /// reset and there is nothing to return. This is a reversal, not new
    /// income: `total_earned` is untouched.
    ///
    /// # Errors
    /// Returns `BalanceUnderflow` if the reversal exceeds what was claimed.
    pub fn reverse_debit(
        &mut self,
        user_id: UserId,
        amount: Decimal,
        debit_date: NaiveDate,
    ) -> Result<()> {
        let account = self
            .accounts
            .get_mut(&user_id)
            .ok_or(RewardrailError::BalanceUnderflow)?;

        if account.claimed < amount {
            return Err(RewardrailError::BalanceUnderflow);
        }
        if account.daily_claimed_date == Some(debit_date) && account.daily_claimed < amount {
            return Err(RewardrailError::BalanceUnderflow);
        }

        account.pending += amount;
        account.claimed -= amount;
        if account.daily_claimed_date == Some(debit_date) {
            account.daily_claimed -= amount;
        }

        tracing::debug!(%user_id, %amount, %debit_date, "debit reversed");
        Ok(())
    }

    /// Look up an account.
    #[must_use]
    pub fn account(&self, user_id: UserId) -> Option<&RewardAccount> {
        self.accounts.get(&user_id)
    }

    /// Iterate over all accounts (conservation checks, reporting).
    pub fn accounts(&self) -> impl Iterator<Item = &RewardAccount> {
        self.accounts.values()
    }

    /// Accrual events for one user, in insertion order.
    pub fn events_for(&self, user_id: UserId) -> impl Iterator<Item = &AccrualEvent> {
        self.events.iter().filter(move |e| e.user_id == user_id)
    }

    /// Total number of accrual events recorded.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Sum of all accrued amounts since genesis.
    #[must_use]
    pub fn total_accrued(&self) -> Decimal {
        self.events.iter().map(|e| e.amount).sum()
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}
