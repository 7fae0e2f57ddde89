//! Reconciliation sweep for claims stuck in SUBMITTED.
//!
//! A dispatch whose verdict was lost (crash, timeout, dropped callback)
//! leaves a SUBMITTED claim behind. The sweep queries the rail for each
//! claim older than the grace window and drives it to its terminal
//! state: confirmed on the rail means CONFIRMED here, failed on the
//! rail means reverse the debit and REFUND. A claim the rail still
//! calls pending is left alone for the next sweep.

use chrono::{DateTime, Duration, Utc};
use rewardrail_ledger::LedgerStore;
use rewardrail_policy::TrustEngine;
use rewardrail_types::{ClaimId, RewardConfig};

use crate::rail::{RailStatus, TransferRail};
use crate::service::SettlementService;

/// Tally of one reconciliation sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    /// SUBMITTED claims older than the grace window that were queried.
    pub examined: usize,
    pub confirmed: usize,
    pub refunded: usize,
    /// Queried but still pending on the rail.
    pub still_pending: usize,
}

/// Periodic sweep that resolves aged SUBMITTED claims against the rail.
pub struct Reconciler {
    /// How long a claim may sit in SUBMITTED before it is queried.
    grace: Duration,
}

impl Reconciler {
    /// Create a reconciler from engine configuration.
    #[must_use]
    pub fn new(config: &RewardConfig) -> Self {
        Self {
            grace: config.reconcile_after(),
        }
    }

    /// Run one sweep. Errors on individual claims are logged and do not
    /// stop the sweep; a claim that fails to resolve stays SUBMITTED
    /// for the next run.
    pub fn run(
        &self,
        service: &mut SettlementService,
        ledger: &mut LedgerStore,
        trust: &mut TrustEngine,
        rail: &mut dyn TransferRail,
        now: DateTime<Utc>,
    ) -> ReconcileReport {
        let cutoff = now - self.grace;
        let aged: Vec<ClaimId> = service
            .submitted_claims()
            .filter(|claim| claim.created_at <= cutoff)
            .map(|claim| claim.id)
            .collect();

        let mut report = ReconcileReport {
            examined: aged.len(),
            ..ReconcileReport::default()
        };

        for claim_id in aged {
            match rail.status(claim_id) {
                RailStatus::Confirmed(tx_ref) => {
                    match service.confirm(trust, claim_id, tx_ref, now) {
                        Ok(()) => report.confirmed += 1,
                        Err(err) => {
                            tracing::error!(%claim_id, %err, "reconcile: confirm failed");
                        }
                    }
                }
                RailStatus::Failed { reason } => {
                    tracing::warn!(%claim_id, reason, "reconcile: rail reports failure");
                    match service.refund(ledger, claim_id, now) {
                        Ok(()) => report.refunded += 1,
                        Err(err) => {
                            tracing::error!(%claim_id, %err, "reconcile: refund failed");
                        }
                    }
                }
                RailStatus::Pending => report.still_pending += 1,
            }
        }

        if report.examined > 0 {
            tracing::info!(
                examined = report.examined,
                confirmed = report.confirmed,
                refunded = report.refunded,
                still_pending = report.still_pending,
                "reconciliation sweep complete"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use rewardrail_policy::WalletRegistry;
    use rewardrail_types::{
        AgeGroup, ClaimStatus, RewardSource, UserId, WalletAddress,
    };
    use rust_decimal::Decimal;

    use crate::rail::{ScriptedOutcome, ScriptedRail};

    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    struct Harness {
        ledger: LedgerStore,
        wallets: WalletRegistry,
        trust: TrustEngine,
        rail: ScriptedRail,
        service: SettlementService,
        user: UserId,
        wallet: WalletAddress,
    }

    fn harness(pending: i64) -> Harness {
        let now = Utc::now();
        let user = UserId::new();
        let wallet = WalletAddress::dummy();

        let mut ledger = LedgerStore::new();
        ledger.open_account(user, AgeGroup::Adult, now);
        ledger
            .accrue(user, RewardSource::GameCompletion, dec(pending), None, now)
            .unwrap();

        let mut wallets = WalletRegistry::new();
        wallets.link_wallet(user, wallet.clone(), now).unwrap();

        let mut trust = TrustEngine::new();
        trust.register_account(user, now);

        Harness {
            ledger,
            wallets,
            trust,
            rail: ScriptedRail::new(),
            service: SettlementService::new(RewardConfig::default()),
            user,
            wallet,
        }
    }

    /// Submit a claim whose dispatch verdict is lost.
    fn lost_claim(h: &mut Harness, amount: i64, key: &str, now: DateTime<Utc>) -> ClaimId {
        h.rail.script(ScriptedOutcome::Lose);
        h.service
            .submit_claim(
                &mut h.ledger,
                &h.wallets,
                &mut h.trust,
                &mut h.rail,
                h.user,
                dec(amount),
                &h.wallet.clone(),
                key,
                now,
            )
            .unwrap()
    }

    #[test]
    fn young_claims_are_not_queried() {
        let mut h = harness(10_000);
        let now = Utc::now();
        lost_claim(&mut h, 1000, "req-1", now);

        let reconciler = Reconciler::new(&RewardConfig::default());
        let report = reconciler.run(
            &mut h.service,
            &mut h.ledger,
            &mut h.trust,
            &mut h.rail,
            now + Duration::seconds(10),
        );
        assert_eq!(report.examined, 0);
    }

    #[test]
    fn lost_then_confirmed_on_rail_resolves_to_confirmed() {
        let mut h = harness(10_000);
        let now = Utc::now();
        let claim_id = lost_claim(&mut h, 1000, "req-1", now);

        // The transfer did land on the rail; only the verdict was lost.
        h.rail.set_status(
            claim_id,
            RailStatus::Confirmed(rewardrail_types::RailTxRef("0xabc".into())),
        );

        let reconciler = Reconciler::new(&RewardConfig::default());
        let report = reconciler.run(
            &mut h.service,
            &mut h.ledger,
            &mut h.trust,
            &mut h.rail,
            now + Duration::minutes(10),
        );
        assert_eq!(report.examined, 1);
        assert_eq!(report.confirmed, 1);

        let claim = h.service.claim(claim_id).unwrap();
        assert_eq!(claim.status, ClaimStatus::Confirmed);
        assert_eq!(h.ledger.balance(h.user).claimed, dec(1000));
        // Track record credited too.
        let snap = h.trust.evaluate(h.user, None, now + Duration::minutes(10));
        assert_eq!(snap.successful_claims, 1);
    }

    #[test]
    fn lost_then_failed_on_rail_refunds_in_full() {
        let mut h = harness(10_000);
        let now = Utc::now();
        let claim_id = lost_claim(&mut h, 1000, "req-1", now);
        h.rail.set_status(
            claim_id,
            RailStatus::Failed {
                reason: "insufficient gas".into(),
            },
        );

        let reconciler = Reconciler::new(&RewardConfig::default());
        let report = reconciler.run(
            &mut h.service,
            &mut h.ledger,
            &mut h.trust,
            &mut h.rail,
            now + Duration::minutes(10),
        );
        assert_eq!(report.refunded, 1);

        let claim = h.service.claim(claim_id).unwrap();
        assert_eq!(claim.status, ClaimStatus::Refunded);
        let bal = h.ledger.balance(h.user);
        assert_eq!(bal.pending, dec(10_000));
        assert_eq!(bal.claimed, Decimal::ZERO);
        assert_eq!(
            h.ledger.account(h.user).unwrap().daily_claimed,
            Decimal::ZERO
        );
    }

    #[test]
    fn still_pending_claims_survive_for_the_next_sweep() {
        let mut h = harness(10_000);
        let now = Utc::now();
        let claim_id = lost_claim(&mut h, 1000, "req-1", now);

        let reconciler = Reconciler::new(&RewardConfig::default());
        let later = now + Duration::minutes(10);
        let report = reconciler.run(
            &mut h.service,
            &mut h.ledger,
            &mut h.trust,
            &mut h.rail,
            later,
        );
        assert_eq!(report.examined, 1);
        assert_eq!(report.still_pending, 1);
        assert_eq!(
            h.service.claim(claim_id).unwrap().status,
            ClaimStatus::Submitted
        );

        // Next sweep, the rail has a verdict.
        h.rail.set_status(
            claim_id,
            RailStatus::Confirmed(rewardrail_types::RailTxRef("0xabc".into())),
        );
        let report = reconciler.run(
            &mut h.service,
            &mut h.ledger,
            &mut h.trust,
            &mut h.rail,
            later + Duration::minutes(10),
        );
        assert_eq!(report.confirmed, 1);
    }

    #[test]
    fn sweep_is_idempotent() {
        let mut h = harness(10_000);
        let now = Utc::now();
        let claim_id = lost_claim(&mut h, 1000, "req-1", now);
        h.rail.set_status(
            claim_id,
            RailStatus::Confirmed(rewardrail_types::RailTxRef("0xabc".into())),
        );

        let reconciler = Reconciler::new(&RewardConfig::default());
        let later = now + Duration::minutes(10);
        reconciler.run(&mut h.service, &mut h.ledger, &mut h.trust, &mut h.rail, later);
        let second = reconciler.run(
            &mut h.service,
            &mut h.ledger,
            &mut h.trust,
            &mut h.rail,
            later + Duration::minutes(10),
        );

        // The claim is terminal now; the second sweep sees nothing.
        assert_eq!(second.examined, 0);
        assert_eq!(h.ledger.balance(h.user).claimed, dec(1000));
    }
}
