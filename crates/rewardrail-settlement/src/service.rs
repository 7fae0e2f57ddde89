//! The claim settlement orchestrator.
//!
//! Owns the claim store and drives each withdrawal through the gates,
//! the ledger debit, the rail dispatch, and the terminal transition.
//! Collaborators (ledger, registry, trust engine, rail) are passed in
//! per call; the service holds no balance state of its own.
//!
//! The ordering rule that everything else hangs off:
//! **debit-then-dispatch**. The ledger debit and the PENDING → SUBMITTED
//! transition happen before the rail is touched, so a crash mid-flight
//! always leaves a durable SUBMITTED claim for reconciliation — never a
//! transfer without a matching debit.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rewardrail_ledger::LedgerStore;
use rewardrail_policy::{DailyCapPolicy, TrustEngine, WalletRegistry};
use rewardrail_types::{
    ClaimId, ClaimRequest, ClaimStatus, RailTxRef, RewardConfig, RewardrailError, Result,
    UserId, WalletAddress,
};
use rust_decimal::Decimal;

use crate::rail::{DispatchOutcome, TransferRail};

/// Orchestrates withdrawal claims end-to-end.
pub struct SettlementService {
    /// All claims by id. Retained forever; terminal claims are immutable.
    claims: HashMap<ClaimId, ClaimRequest>,
    /// Per-user claim index, insertion-ordered.
    by_user: HashMap<UserId, Vec<ClaimId>>,
    /// Daily quota policy (shares the engine config).
    daily_cap: DailyCapPolicy,
}

impl SettlementService {
    /// Create a service from engine configuration.
    #[must_use]
    pub fn new(config: RewardConfig) -> Self {
        Self {
            claims: HashMap::new(),
            by_user: HashMap::new(),
            daily_cap: DailyCapPolicy::new(config),
        }
    }

    /// Submit a withdrawal claim.
    ///
    /// Gate order is cheap-to-expensive; gates are independent and all
    /// must pass. A replay of the same `(user, idempotency_key)` returns
    /// the existing claim id without creating a second row or debiting
    /// twice — callers inspect the claim's status afterwards.
    ///
    /// `Ok` means a claim row exists, not that the transfer is in
    /// flight: if the rail rejects at dispatch the claim is refunded in
    /// place and its id is still returned. Callers read the claim's
    /// status before reporting success.
    ///
    /// # Errors
    /// - `InvalidAmount` for non-positive amounts
    /// - `DailyLimitExceeded`, `CooldownActive`, `RateLimited`,
    ///   `WalletMismatch` from the gates (no side effect)
    /// - `InsufficientBalance` if the debit fails (the claim is recorded
    ///   as FAILED, with no ledger effect)
    #[allow(clippy::too_many_arguments)]
    pub fn submit_claim(
        &mut self,
        ledger: &mut LedgerStore,
        wallets: &WalletRegistry,
        trust: &mut TrustEngine,
        rail: &mut dyn TransferRail,
        user_id: UserId,
        requested_amount: Decimal,
        destination: &WalletAddress,
        idempotency_key: &str,
        now: DateTime<Utc>,
    ) -> Result<ClaimId> {
        // 1. Amount validation.
        if requested_amount <= Decimal::ZERO {
            return Err(RewardrailError::InvalidAmount {
                amount: requested_amount,
            });
        }

        // 2. Idempotent replay: the same logical request lands on the
        //    same claim, whatever state it reached.
        let claim_id = ClaimId::deterministic(user_id, idempotency_key);
        if self.claims.contains_key(&claim_id) {
            tracing::info!(%user_id, %claim_id, "claim replay, returning existing claim");
            return Ok(claim_id);
        }

        // 3. Daily cap gate.
        self.daily_cap
            .check(ledger.account(user_id), requested_amount, now.date_naive())?;

        // 4. Trust gate (cooldown, then hourly ceiling). The cooldown
        //    clock runs from the ledger's last debit stamp, whatever
        //    that claim's outcome was.
        let last_claim_at = ledger.account(user_id).and_then(|a| a.last_claim_at);
        trust.check(user_id, last_claim_at, now)?;

        // 5. Wallet gate: claims settle only to the active linked wallet.
        let linked = wallets.active_link(user_id);
        if linked.is_none_or(|link| link.address != *destination) {
            return Err(RewardrailError::WalletMismatch {
                destination: destination.clone(),
            });
        }

        // All gates passed; only now does the attempt count against the
        // hourly ceiling, so rejected spam cannot starve a user out of
        // their own ceiling.
        trust.record_request(user_id, now);

        // 6. Create the claim, then debit and transition to SUBMITTED.
        //    The debit moves balance + daily quota + last-claim stamp in
        //    one account access.
        let mut claim = ClaimRequest::new(
            user_id,
            requested_amount,
            destination.clone(),
            idempotency_key,
            now,
        );
        debug_assert_eq!(claim.id, claim_id);

        match ledger.debit(user_id, requested_amount, now) {
            Ok(debit_date) => claim.mark_submitted(debit_date)?,
            Err(err) => {
                // No ledger effect occurred; keep the claim as an audit
                // row and surface the rejection.
                claim.mark_failed(now)?;
                self.insert(claim);
                return Err(err);
            }
        }
        self.insert(claim);
        tracing::info!(%user_id, %claim_id, %requested_amount, "claim submitted");

        // 7. Dispatch outside the debit. The rail's verdict can arrive
        //    now, later, or never.
        match rail.dispatch(claim_id, destination, requested_amount) {
            DispatchOutcome::Dispatched(tx_ref) => {
                if let Some(claim) = self.claims.get_mut(&claim_id) {
                    claim.external_tx_ref = Some(tx_ref);
                }
            }
            DispatchOutcome::Rejected { reason } => {
                tracing::warn!(%claim_id, reason, "rail rejected dispatch, refunding");
                self.refund(ledger, claim_id, now)?;
            }
            DispatchOutcome::Unknown => {
                tracing::warn!(%claim_id, "rail verdict unknown, leaving for reconciliation");
            }
        }

        Ok(claim_id)
    }

    /// Record a rail confirmation: SUBMITTED → CONFIRMED. Feeds the
    /// trust engine's track record.
    ///
    /// # Errors
    /// - `ClaimNotFound` for an unknown id
    /// - `DoubleSettlementPrevented` if the claim is already terminal
    pub fn confirm(
        &mut self,
        trust: &mut TrustEngine,
        claim_id: ClaimId,
        tx_ref: RailTxRef,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let claim = self
            .claims
            .get_mut(&claim_id)
            .ok_or(RewardrailError::ClaimNotFound(claim_id))?;
        claim.mark_confirmed(tx_ref, now)?;
        trust.record_confirmed(claim.user_id, now);
        tracing::info!(%claim_id, user_id = %claim.user_id, "claim confirmed");
        Ok(())
    }

    /// Reverse a dispatched-but-failed claim: SUBMITTED → REFUNDED plus
    /// the compensating ledger reversal. The reversal restores `pending`
    /// and rolls back `claimed` and the debit day's quota; it is not new
    /// income, so `total_earned` is untouched.
    ///
    /// # Errors
    /// - `ClaimNotFound` for an unknown id
    /// - `DoubleSettlementPrevented` if the claim is already terminal
    /// - `InvalidClaimTransition` if the claim was never debited
    pub fn refund(
        &mut self,
        ledger: &mut LedgerStore,
        claim_id: ClaimId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let claim = self
            .claims
            .get_mut(&claim_id)
            .ok_or(RewardrailError::ClaimNotFound(claim_id))?;

        // Validate the transition before touching the ledger, so a
        // terminal claim trips the integrity alarm with no side effect.
        if !claim.status.can_transition_to(ClaimStatus::Refunded) {
            if claim.status.is_terminal() {
                return Err(RewardrailError::DoubleSettlementPrevented(claim_id));
            }
            return Err(RewardrailError::InvalidClaimTransition {
                claim_id,
                from: claim.status,
                to: ClaimStatus::Refunded,
            });
        }
        let debit_date = claim.debit_date.ok_or_else(|| {
            RewardrailError::Internal(format!("submitted claim {claim_id} has no debit date"))
        })?;

        ledger.reverse_debit(claim.user_id, claim.requested_amount, debit_date)?;
        claim.mark_refunded(now)?;
        tracing::warn!(%claim_id, user_id = %claim.user_id, "claim refunded");
        Ok(())
    }

    /// Look up a claim (UI status polling).
    #[must_use]
    pub fn claim(&self, claim_id: ClaimId) -> Option<&ClaimRequest> {
        self.claims.get(&claim_id)
    }

    /// All claims for a user, oldest first.
    #[must_use]
    pub fn claims_for(&self, user_id: UserId) -> Vec<&ClaimRequest> {
        self.by_user
            .get(&user_id)
            .map(|ids| ids.iter().filter_map(|id| self.claims.get(id)).collect())
            .unwrap_or_default()
    }

    /// Claims currently awaiting a rail verdict.
    pub fn submitted_claims(&self) -> impl Iterator<Item = &ClaimRequest> {
        self.claims
            .values()
            .filter(|c| c.status == ClaimStatus::Submitted)
    }

    /// Total number of claims recorded.
    #[must_use]
    pub fn claim_count(&self) -> usize {
        self.claims.len()
    }

    /// The daily cap policy (shared with the withdrawal UI's
    /// remaining-quota display).
    #[must_use]
    pub fn daily_cap(&self) -> &DailyCapPolicy {
        &self.daily_cap
    }

    fn insert(&mut self, claim: ClaimRequest) {
        self.by_user.entry(claim.user_id).or_default().push(claim.id);
        self.claims.insert(claim.id, claim);
    }
}
