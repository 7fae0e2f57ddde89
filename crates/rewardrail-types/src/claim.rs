//! # ClaimRequest — the idempotency anchor for settlement
//!
//! One `ClaimRequest` exists per withdrawal attempt. Exactly one claim
//! transitions to CONFIRMED per intended debit.
//!
//! ## State Machine
//!
//! ```text
//!   ┌─────────┐  debit+dispatch  ┌───────────┐  rail confirmed  ┌───────────┐
//!   │ PENDING ├─────────────────▶│ SUBMITTED ├─────────────────▶│ CONFIRMED │
//!   └────┬────┘                  └─────┬─────┘                  └───────────┘
//!        │ validation failed           │ rail rejected / reconciled failed
//!        ▼                             ▼
//!   ┌────────┐                   ┌──────────┐
//!   │ FAILED │                   │ REFUNDED │
//!   └────────┘                   └──────────┘
//! ```
//!
//! ## Safety Properties
//!
//! - **Debit-then-dispatch**: the ledger debit commits with the
//!   PENDING → SUBMITTED transition; a crash after the debit leaves a
//!   durable SUBMITTED row to reconcile against.
//! - **Single-settlement**: CONFIRMED, FAILED, and REFUNDED are terminal;
//!   any further transition attempt is a double-settlement alert.
//! - **FAILED has no ledger effect**; REFUNDED means the debit was
//!   reversed in full.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ClaimId, RewardrailError, Result, UserId, WalletAddress};

/// The lifecycle state of a claim request.
///
/// Transitions are **monotonic** (never go backwards):
/// - `Pending → Submitted` (gates passed, ledger debited)
/// - `Pending → Failed` (rejected before any debit)
/// - `Submitted → Confirmed` (rail transfer observed successful)
/// - `Submitted → Refunded` (rail rejected or reconciliation gave up;
///   debit reversed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// Created, not yet validated or debited.
    Pending,
    /// Debit applied, transfer dispatched. Awaiting the rail's verdict.
    Submitted,
    /// Transfer succeeded. The debit stands. **Irreversible.**
    Confirmed,
    /// Rejected before any debit. No ledger effect.
    Failed,
    /// Transfer did not complete after dispatch. Debit reversed.
    Refunded,
}

impl ClaimStatus {
    /// Can this claim transition to the given target state?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Submitted | Self::Failed)
                | (Self::Submitted, Self::Confirmed | Self::Refunded)
        )
    }

    /// Whether this state is terminal (the claim is immutable).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed | Self::Refunded)
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Submitted => write!(f, "SUBMITTED"),
            Self::Confirmed => write!(f, "CONFIRMED"),
            Self::Failed => write!(f, "FAILED"),
            Self::Refunded => write!(f, "REFUNDED"),
        }
    }
}

/// Opaque reference to a transfer on the external rail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RailTxRef(pub String);

impl std::fmt::Display for RailTxRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tx:{}", self.0)
    }
}

/// One withdrawal attempt. Retained forever as audit trail; immutable
/// once terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub id: ClaimId,
    pub user_id: UserId,
    pub requested_amount: Decimal,
    pub destination: WalletAddress,
    pub status: ClaimStatus,
    /// Set once a transfer is actually dispatched.
    pub external_tx_ref: Option<RailTxRef>,
    /// Client-supplied key; retries of the same logical request reuse
    /// this claim instead of creating a second one.
    pub idempotency_key: String,
    /// The UTC day whose quota the debit consumed. Carried so a refund
    /// can roll the right day back.
    pub debit_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl ClaimRequest {
    /// Create a claim in PENDING state.
    #[must_use]
    pub fn new(
        user_id: UserId,
        requested_amount: Decimal,
        destination: WalletAddress,
        idempotency_key: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let idempotency_key = idempotency_key.into();
        Self {
            id: ClaimId::deterministic(user_id, &idempotency_key),
            user_id,
            requested_amount,
            destination,
            status: ClaimStatus::Pending,
            external_tx_ref: None,
            idempotency_key,
            debit_date: None,
            created_at: now,
            resolved_at: None,
        }
    }

    fn transition(&mut self, target: ClaimStatus) -> Result<()> {
        if self.status.can_transition_to(target) {
            self.status = target;
            return Ok(());
        }
        if self.status.is_terminal() {
            return Err(RewardrailError::DoubleSettlementPrevented(self.id));
        }
        Err(RewardrailError::InvalidClaimTransition {
            claim_id: self.id,
            from: self.status,
            to: target,
        })
    }

    /// PENDING → SUBMITTED. Records the quota day the debit consumed.
    pub fn mark_submitted(&mut self, debit_date: NaiveDate) -> Result<()> {
        self.transition(ClaimStatus::Submitted)?;
        self.debit_date = Some(debit_date);
        Ok(())
    }

    /// SUBMITTED → CONFIRMED. Records the external transfer reference.
    pub fn mark_confirmed(&mut self, tx_ref: RailTxRef, now: DateTime<Utc>) -> Result<()> {
        self.transition(ClaimStatus::Confirmed)?;
        self.external_tx_ref = Some(tx_ref);
        self.resolved_at = Some(now);
        Ok(())
    }

    /// PENDING → FAILED. No ledger effect occurred.
    pub fn mark_failed(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition(ClaimStatus::Failed)?;
        self.resolved_at = Some(now);
        Ok(())
    }

    /// SUBMITTED → REFUNDED. The caller is responsible for reversing
    /// the debit in the same operation.
    pub fn mark_refunded(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition(ClaimStatus::Refunded)?;
        self.resolved_at = Some(now);
        Ok(())
    }
}

/// Dummy claim for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl ClaimRequest {
    /// Create a dummy PENDING claim for unit tests.
    pub fn dummy(user_id: UserId, amount: Decimal) -> Self {
        let key = format!("test-{}", rand::random::<u64>());
        Self::new(
            user_id,
            amount,
            WalletAddress::dummy(),
            key,
            Utc::now(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_claim() -> ClaimRequest {
        ClaimRequest::dummy(UserId::new(), Decimal::new(500, 0))
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    #[test]
    fn state_transitions_valid() {
        assert!(ClaimStatus::Pending.can_transition_to(ClaimStatus::Submitted));
        assert!(ClaimStatus::Pending.can_transition_to(ClaimStatus::Failed));
        assert!(ClaimStatus::Submitted.can_transition_to(ClaimStatus::Confirmed));
        assert!(ClaimStatus::Submitted.can_transition_to(ClaimStatus::Refunded));
    }

    #[test]
    fn state_transitions_invalid() {
        assert!(!ClaimStatus::Pending.can_transition_to(ClaimStatus::Confirmed));
        assert!(!ClaimStatus::Pending.can_transition_to(ClaimStatus::Refunded));
        assert!(!ClaimStatus::Submitted.can_transition_to(ClaimStatus::Failed));
        assert!(!ClaimStatus::Confirmed.can_transition_to(ClaimStatus::Refunded));
        assert!(!ClaimStatus::Refunded.can_transition_to(ClaimStatus::Submitted));
        assert!(!ClaimStatus::Failed.can_transition_to(ClaimStatus::Submitted));
    }

    #[test]
    fn terminal_states() {
        assert!(!ClaimStatus::Pending.is_terminal());
        assert!(!ClaimStatus::Submitted.is_terminal());
        assert!(ClaimStatus::Confirmed.is_terminal());
        assert!(ClaimStatus::Failed.is_terminal());
        assert!(ClaimStatus::Refunded.is_terminal());
    }

    #[test]
    fn happy_path_pending_submitted_confirmed() {
        let mut claim = make_claim();
        claim.mark_submitted(today()).unwrap();
        assert_eq!(claim.status, ClaimStatus::Submitted);
        assert_eq!(claim.debit_date, Some(today()));

        claim
            .mark_confirmed(RailTxRef("0xdeadbeef".into()), Utc::now())
            .unwrap();
        assert_eq!(claim.status, ClaimStatus::Confirmed);
        assert!(claim.external_tx_ref.is_some());
        assert!(claim.resolved_at.is_some());
    }

    #[test]
    fn double_confirm_is_double_settlement() {
        let mut claim = make_claim();
        claim.mark_submitted(today()).unwrap();
        claim
            .mark_confirmed(RailTxRef("0x1".into()), Utc::now())
            .unwrap();

        let err = claim
            .mark_confirmed(RailTxRef("0x2".into()), Utc::now())
            .unwrap_err();
        assert!(matches!(
            err,
            RewardrailError::DoubleSettlementPrevented(id) if id == claim.id
        ));
    }

    #[test]
    fn confirmed_cannot_be_refunded() {
        let mut claim = make_claim();
        claim.mark_submitted(today()).unwrap();
        claim
            .mark_confirmed(RailTxRef("0x1".into()), Utc::now())
            .unwrap();
        let err = claim.mark_refunded(Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            RewardrailError::DoubleSettlementPrevented(_)
        ));
    }

    #[test]
    fn pending_cannot_be_confirmed_directly() {
        let mut claim = make_claim();
        let err = claim
            .mark_confirmed(RailTxRef("0x1".into()), Utc::now())
            .unwrap_err();
        assert!(matches!(
            err,
            RewardrailError::InvalidClaimTransition { .. }
        ));
    }

    #[test]
    fn failed_before_debit() {
        let mut claim = make_claim();
        claim.mark_failed(Utc::now()).unwrap();
        assert_eq!(claim.status, ClaimStatus::Failed);
        assert!(claim.debit_date.is_none(), "no debit ever happened");
    }

    #[test]
    fn retried_request_same_claim_id() {
        let user = UserId::new();
        let a = ClaimRequest::new(
            user,
            Decimal::ONE,
            WalletAddress::dummy(),
            "req-1",
            Utc::now(),
        );
        let b = ClaimRequest::new(
            user,
            Decimal::ONE,
            WalletAddress::dummy(),
            "req-1",
            Utc::now(),
        );
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn serde_roundtrip() {
        let claim = make_claim();
        let json = serde_json::to_string(&claim).unwrap();
        let back: ClaimRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(claim.id, back.id);
        assert_eq!(claim.status, back.status);
        assert_eq!(claim.requested_amount, back.requested_amount);
    }
}
