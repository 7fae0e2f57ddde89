//! Error types for the RewardRail engine.
//!
//! All errors use the `RR_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Accrual / validation errors
//! - 2xx: Balance / ledger errors
//! - 3xx: Claim / settlement errors
//! - 4xx: Wallet link errors
//! - 5xx: Policy gate errors (daily cap, rate limit, cooldown)
//! - 9xx: General / internal errors
//!
//! Every 1xx–5xx error is rejected before any ledger debit, so the caller
//! may safely retry once the condition clears. 3xx integrity errors
//! (`DoubleSettlementPrevented`) must never be reachable through normal
//! flow.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{ClaimId, ClaimStatus, WalletAddress};

/// Central error enum for all RewardRail operations.
#[derive(Debug, Error)]
pub enum RewardrailError {
    // =================================================================
    // Accrual / Validation Errors (1xx)
    // =================================================================
    /// The amount is zero or negative.
    #[error("RR_ERR_100: Invalid amount: {amount} (must be positive)")]
    InvalidAmount { amount: Decimal },

    // =================================================================
    // Balance / Ledger Errors (2xx)
    // =================================================================
    /// Not enough pending balance to debit.
    #[error("RR_ERR_200: Insufficient pending balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    /// A reversal would drive a ledger field negative.
    #[error("RR_ERR_201: Balance underflow")]
    BalanceUnderflow,

    /// Conservation invariant violated — critical integrity alert.
    #[error("RR_ERR_202: Conservation invariant violation: {reason}")]
    ConservationViolation { reason: String },

    // =================================================================
    // Claim / Settlement Errors (3xx)
    // =================================================================
    /// The requested claim was not found.
    #[error("RR_ERR_300: Claim not found: {0}")]
    ClaimNotFound(ClaimId),

    /// A claim state transition that the state machine forbids.
    #[error("RR_ERR_301: Invalid claim transition: {claim_id} from {from} to {to}")]
    InvalidClaimTransition {
        claim_id: ClaimId,
        from: ClaimStatus,
        to: ClaimStatus,
    },

    /// A second debit/settlement was attempted against a terminal claim.
    /// Must never be reachable through normal flow.
    #[error("RR_ERR_302: Double settlement prevented for claim {0}")]
    DoubleSettlementPrevented(ClaimId),

    // =================================================================
    // Wallet Link Errors (4xx)
    // =================================================================
    /// The wallet address is malformed.
    #[error("RR_ERR_400: Invalid wallet address: {reason}")]
    InvalidWalletAddress { reason: String },

    /// The claim destination is not the user's active linked wallet.
    #[error("RR_ERR_401: Wallet mismatch: {destination} is not the linked wallet")]
    WalletMismatch { destination: WalletAddress },

    /// The wallet address is the active link of a different user.
    #[error("RR_ERR_402: Wallet {0} is already linked to another account")]
    WalletAlreadyLinkedElsewhere(WalletAddress),

    /// The account has exhausted its wallet switch allowance.
    #[error("RR_ERR_403: Wallet switch limit exceeded: {switches} of {max} used")]
    SwitchLimitExceeded { switches: u32, max: u32 },

    // =================================================================
    // Policy Gate Errors (5xx)
    // =================================================================
    /// The request would exceed the user's remaining daily quota.
    #[error("RR_ERR_500: Daily limit exceeded: requested {requested}, remaining {remaining}")]
    DailyLimitExceeded {
        requested: Decimal,
        remaining: Decimal,
    },

    /// Hourly claim-request ceiling reached for the user's trust tier.
    #[error("RR_ERR_501: Rate limited: {count} requests in the last hour (ceiling {ceiling})")]
    RateLimited { count: usize, ceiling: usize },

    /// The per-tier cooldown since the last claim debit has not elapsed.
    #[error("RR_ERR_502: Cooldown active: {remaining_secs}s remaining")]
    CooldownActive { remaining_secs: i64 },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("RR_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, RewardrailError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = RewardrailError::ClaimNotFound(ClaimId::new());
        let msg = format!("{err}");
        assert!(msg.starts_with("RR_ERR_300"), "Got: {msg}");
    }

    #[test]
    fn insufficient_balance_display() {
        let err = RewardrailError::InsufficientBalance {
            needed: Decimal::new(100, 0),
            available: Decimal::new(50, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("RR_ERR_200"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn daily_limit_display() {
        let err = RewardrailError::DailyLimitExceeded {
            requested: Decimal::new(60, 0),
            remaining: Decimal::new(40, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("RR_ERR_500"));
        assert!(msg.contains("60"));
        assert!(msg.contains("40"));
    }

    #[test]
    fn all_errors_have_rr_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(RewardrailError::InvalidAmount {
                amount: Decimal::ZERO,
            }),
            Box::new(RewardrailError::BalanceUnderflow),
            Box::new(RewardrailError::DoubleSettlementPrevented(ClaimId::new())),
            Box::new(RewardrailError::SwitchLimitExceeded { switches: 3, max: 3 }),
            Box::new(RewardrailError::CooldownActive { remaining_secs: 60 }),
            Box::new(RewardrailError::Internal("test".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("RR_ERR_"),
                "Error missing RR_ERR_ prefix: {msg}"
            );
        }
    }
}
