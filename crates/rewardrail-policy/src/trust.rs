//! Trust score engine — advisory rate limiting for settlement.
//!
//! Converts raw claim history (account age, confirmed claims, request
//! frequency) into a [`TrustTier`] and enforces the tier's cooldown and
//! hourly request ceiling. The cooldown is measured from the ledger's
//! `last_claim_at` stamp — set at debit time — so a claim that is still
//! in flight, or was later refunded, holds the gate just like a
//! confirmed one.
//!
//! ## Design Principles
//!
//! - **Fail-closed**: unknown users get the strictest (NEW) tier
//! - **Advisory only**: never touches `pending` or any balance field
//! - **Deterministic**: `evaluate` is a pure function of recorded
//!   history and the caller-supplied inputs

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};
use rewardrail_types::{constants, RewardrailError, Result, TrustSnapshot, TrustTier, UserId};

/// Per-user claim history tracked by the engine.
#[derive(Debug, Clone)]
struct ClaimHistory {
    created_at: DateTime<Utc>,
    confirmed_claims: u64,
    /// Claim-request timestamps inside the sliding window (front = oldest).
    recent_requests: VecDeque<DateTime<Utc>>,
}

impl ClaimHistory {
    fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            confirmed_claims: 0,
            recent_requests: VecDeque::new(),
        }
    }

    fn requests_since(&self, cutoff: DateTime<Utc>) -> usize {
        self.recent_requests.iter().filter(|t| **t > cutoff).count()
    }
}

/// Computes trust tiers and enforces the per-tier rate limits.
pub struct TrustEngine {
    histories: HashMap<UserId, ClaimHistory>,
    /// Sliding window over which requests are counted.
    window: Duration,
}

impl TrustEngine {
    /// Create a new engine with the default one-hour request window.
    #[must_use]
    pub fn new() -> Self {
        Self {
            histories: HashMap::new(),
            window: Duration::seconds(constants::TRUST_REQUEST_WINDOW_SECS),
        }
    }

    /// Register an account's creation time. Idempotent; later calls for
    /// the same user are ignored. Unregistered users are treated as
    /// created at their first recorded request.
    pub fn register_account(&mut self, user_id: UserId, created_at: DateTime<Utc>) {
        self.histories
            .entry(user_id)
            .or_insert_with(|| ClaimHistory::new(created_at));
    }

    /// Record one claim request attempt (counted against the hourly
    /// ceiling) and prune entries that fell out of the window.
    pub fn record_request(&mut self, user_id: UserId, now: DateTime<Utc>) {
        let window = self.window;
        let history = self
            .histories
            .entry(user_id)
            .or_insert_with(|| ClaimHistory::new(now));
        history.recent_requests.push_back(now);
        let cutoff = now - window;
        while history
            .recent_requests
            .front()
            .is_some_and(|t| *t <= cutoff)
        {
            history.recent_requests.pop_front();
        }
    }

    /// Record a confirmed settlement. Raises the user's track record.
    pub fn record_confirmed(&mut self, user_id: UserId, now: DateTime<Utc>) {
        let history = self
            .histories
            .entry(user_id)
            .or_insert_with(|| ClaimHistory::new(now));
        history.confirmed_claims += 1;
        tracing::debug!(%user_id, confirmed = history.confirmed_claims, "claim confirmed");
    }

    /// Compute the trust snapshot for a user.
    ///
    /// `last_claim_at` is the ledger's debit-time stamp for the user's
    /// most recent claim; the cooldown clock runs from it. The outcome
    /// of that claim is irrelevant — an in-flight or refunded debit
    /// holds the gate like a confirmed one.
    #[must_use]
    pub fn evaluate(
        &self,
        user_id: UserId,
        last_claim_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> TrustSnapshot {
        let (account_age_days, successful_claims, requests_last_hour) =
            match self.histories.get(&user_id) {
                Some(history) => (
                    (now - history.created_at).num_days(),
                    history.confirmed_claims,
                    history.requests_since(now - self.window),
                ),
                None => (0, 0, 0),
            };
        let tier = TrustTier::classify(account_age_days, successful_claims);

        let cooldown_remaining = match last_claim_at {
            Some(last) => {
                let elapsed = now - last;
                std::cmp::max(Duration::zero(), tier.cooldown() - elapsed)
            }
            None => Duration::zero(),
        };

        TrustSnapshot {
            tier,
            hourly_request_ceiling: tier.hourly_request_ceiling(),
            cooldown_remaining,
            account_age_days,
            successful_claims,
            requests_last_hour,
        }
    }

    /// Enforce the cooldown and hourly ceiling for a new claim request.
    ///
    /// # Errors
    /// - `CooldownActive` if the tier cooldown since `last_claim_at`
    ///   (the last debit) has not elapsed
    /// - `RateLimited` if the trailing-hour request count has reached
    ///   the tier's ceiling
    pub fn check(
        &self,
        user_id: UserId,
        last_claim_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let snapshot = self.evaluate(user_id, last_claim_at, now);

        if snapshot.cooldown_remaining > Duration::zero() {
            return Err(RewardrailError::CooldownActive {
                remaining_secs: snapshot.cooldown_remaining.num_seconds(),
            });
        }

        if snapshot.requests_last_hour >= snapshot.hourly_request_ceiling {
            return Err(RewardrailError::RateLimited {
                count: snapshot.requests_last_hour,
                ceiling: snapshot.hourly_request_ceiling,
            });
        }

        Ok(())
    }
}

impl Default for TrustEngine {
    fn default() -> Self {
        Self::new()
    }
}
