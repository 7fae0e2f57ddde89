//! Conservation invariant checker.
//!
//! Mathematical invariants enforced over the ledger:
//! ```text
//! ∀ account: total_earned == claimed + pending
//! Σ total_earned == Σ accrual event amounts
//! ```
//!
//! If either ever breaks, something has gone catastrophically wrong —
//! the violation is surfaced as a fatal integrity alert, never handled.

use rewardrail_types::{RewardAccount, RewardrailError, Result};
use rust_decimal::Decimal;

use crate::LedgerStore;

/// Verify the per-account conservation invariant.
///
/// # Errors
/// Returns [`RewardrailError::ConservationViolation`] if
/// `total_earned != claimed + pending`.
pub fn verify_account(account: &RewardAccount) -> Result<()> {
    if !account.is_conserved() {
        return Err(RewardrailError::ConservationViolation {
            reason: format!(
                "account {}: total_earned {} != claimed {} + pending {}",
                account.user_id, account.total_earned, account.claimed, account.pending,
            ),
        });
    }
    Ok(())
}

/// Verify every account plus the global accrual-sum invariant.
///
/// # Errors
/// Returns [`RewardrailError::ConservationViolation`] naming the first
/// violation found.
pub fn verify_ledger(ledger: &LedgerStore) -> Result<()> {
    let mut earned_sum = Decimal::ZERO;
    for account in ledger.accounts() {
        verify_account(account)?;
        earned_sum += account.total_earned;
    }

    let accrued = ledger.total_accrued();
    if earned_sum != accrued {
        return Err(RewardrailError::ConservationViolation {
            reason: format!(
                "global: sum of total_earned {earned_sum} != sum of accruals {accrued}"
            ),
        });
    }
    Ok(())
}
