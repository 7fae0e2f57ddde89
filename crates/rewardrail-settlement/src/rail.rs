//! The transfer rail seam — the opaque on-chain/payment boundary.
//!
//! The rail is the only collaborator that can succeed, fail, or time
//! out independently of local state. The engine therefore never trusts
//! a dispatch to resolve: `dispatch` may come back `Unknown`, and
//! `status` exists so reconciliation can ask again later. Address
//! formats and transfer fees are the rail's problem, not ours.

use rewardrail_types::{ClaimId, RailTxRef, WalletAddress};
use rust_decimal::Decimal;

/// Outcome of dispatching a transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The rail accepted the transfer. Confirmation arrives later
    /// (callback or reconciliation).
    Dispatched(RailTxRef),
    /// The rail definitively rejected the transfer. Nothing was sent.
    Rejected { reason: String },
    /// The rail's answer was lost (timeout, connection drop). The
    /// transfer may or may not be in flight — only reconciliation can
    /// tell.
    Unknown,
}

/// The rail's answer to a reconciliation query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RailStatus {
    /// The transfer completed on the rail.
    Confirmed(RailTxRef),
    /// The transfer definitively did not complete.
    Failed { reason: String },
    /// Still in flight. Ask again later.
    Pending,
}

/// Outbound transfer transport.
///
/// Implementations must be idempotent per `claim_id`: dispatching the
/// same claim twice must not produce a second transfer. The engine
/// never calls `dispatch` twice for one claim, but a crashed-and-
/// restarted process might — the claim id is the dedupe handle.
pub trait TransferRail {
    /// Dispatch a transfer of `amount` points to `destination`.
    fn dispatch(
        &mut self,
        claim_id: ClaimId,
        destination: &WalletAddress,
        amount: Decimal,
    ) -> DispatchOutcome;

    /// Query the fate of a previously dispatched transfer.
    fn status(&mut self, claim_id: ClaimId) -> RailStatus;
}

// ---------------------------------------------------------------------------
// ScriptedRail — deterministic test double
// ---------------------------------------------------------------------------

/// What a [`ScriptedRail`] should do with the next dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptedOutcome {
    /// Accept and immediately report `Confirmed` on status queries.
    #[default]
    Accept,
    /// Definitively reject at dispatch time.
    Reject,
    /// Return `Unknown` from dispatch and `Pending` from status until
    /// the script is changed.
    Lose,
}

/// Scripted in-memory rail for tests and local development. Not a real
/// transport — every outcome is decided by the script, and every
/// dispatch is recorded so tests can assert at-most-once behavior.
#[derive(Default)]
pub struct ScriptedRail {
    outcome: ScriptedOutcome,
    overrides: std::collections::HashMap<ClaimId, RailStatus>,
    dispatched: Vec<(ClaimId, WalletAddress, Decimal)>,
}

impl ScriptedRail {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the behavior applied to subsequent dispatches.
    pub fn script(&mut self, outcome: ScriptedOutcome) {
        self.outcome = outcome;
    }

    /// Pin the status answer for one claim (reconciliation tests).
    pub fn set_status(&mut self, claim_id: ClaimId, status: RailStatus) {
        self.overrides.insert(claim_id, status);
    }

    /// All dispatches seen, in order.
    #[must_use]
    pub fn dispatches(&self) -> &[(ClaimId, WalletAddress, Decimal)] {
        &self.dispatched
    }

    /// Number of times a given claim was dispatched.
    #[must_use]
    pub fn dispatch_count(&self, claim_id: ClaimId) -> usize {
        self.dispatched.iter().filter(|(id, _, _)| *id == claim_id).count()
    }

    fn tx_ref(claim_id: ClaimId) -> RailTxRef {
        RailTxRef(format!("scripted-{}", claim_id.0))
    }
}

impl TransferRail for ScriptedRail {
    fn dispatch(
        &mut self,
        claim_id: ClaimId,
        destination: &WalletAddress,
        amount: Decimal,
    ) -> DispatchOutcome {
        self.dispatched.push((claim_id, destination.clone(), amount));
        match self.outcome {
            ScriptedOutcome::Accept => {
                let tx_ref = Self::tx_ref(claim_id);
                self.overrides
                    .insert(claim_id, RailStatus::Confirmed(tx_ref.clone()));
                DispatchOutcome::Dispatched(tx_ref)
            }
            ScriptedOutcome::Reject => DispatchOutcome::Rejected {
                reason: "scripted rejection".to_string(),
            },
            ScriptedOutcome::Lose => DispatchOutcome::Unknown,
        }
    }

    fn status(&mut self, claim_id: ClaimId) -> RailStatus {
        self.overrides
            .get(&claim_id)
            .cloned()
            .unwrap_or(RailStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn accept_script_dispatches_and_confirms() {
        let mut rail = ScriptedRail::new();
        let claim = ClaimId::new();
        let dest = WalletAddress::dummy();

        let outcome = rail.dispatch(claim, &dest, dec(100));
        let DispatchOutcome::Dispatched(tx_ref) = outcome else {
            panic!("expected Dispatched, got {outcome:?}");
        };
        assert_eq!(rail.status(claim), RailStatus::Confirmed(tx_ref));
        assert_eq!(rail.dispatch_count(claim), 1);
    }

    #[test]
    fn reject_script() {
        let mut rail = ScriptedRail::new();
        rail.script(ScriptedOutcome::Reject);
        let outcome = rail.dispatch(ClaimId::new(), &WalletAddress::dummy(), dec(1));
        assert!(matches!(outcome, DispatchOutcome::Rejected { .. }));
    }

    #[test]
    fn lost_dispatch_stays_pending_until_scripted() {
        let mut rail = ScriptedRail::new();
        rail.script(ScriptedOutcome::Lose);
        let claim = ClaimId::new();

        let outcome = rail.dispatch(claim, &WalletAddress::dummy(), dec(5));
        assert_eq!(outcome, DispatchOutcome::Unknown);
        assert_eq!(rail.status(claim), RailStatus::Pending);

        rail.set_status(
            claim,
            RailStatus::Failed {
                reason: "dropped".into(),
            },
        );
        assert!(matches!(rail.status(claim), RailStatus::Failed { .. }));
    }

    #[test]
    fn unknown_claim_status_is_pending() {
        let mut rail = ScriptedRail::new();
        assert_eq!(rail.status(ClaimId::new()), RailStatus::Pending);
    }
}
