//! # rewardrail-types
//!
//! Shared types, errors, and configuration for the **RewardRail** reward
//! accrual and claim settlement engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`UserId`], [`AccrualId`], [`ClaimId`]
//! - **Account model**: [`RewardAccount`], [`BalanceView`], [`AgeGroup`]
//! - **Accrual model**: [`AccrualEvent`], [`RewardSource`], [`AccrualOutcome`]
//! - **Claim model**: [`ClaimRequest`], [`ClaimStatus`], [`RailTxRef`]
//! - **Wallet model**: [`WalletAddress`], [`WalletLink`]
//! - **Trust model**: [`TrustTier`], [`TrustSnapshot`]
//! - **Configuration**: [`RewardConfig`]
//! - **Errors**: [`RewardrailError`] with `RR_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod account;
pub mod accrual;
pub mod claim;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod trust;
pub mod wallet;

// Re-export all primary types at crate root for ergonomic imports:
//   use rewardrail_types::{RewardAccount, ClaimRequest, WalletAddress, ...};

pub use account::*;
pub use accrual::*;
pub use claim::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use trust::*;
pub use wallet::*;

// Constants are accessed via `rewardrail_types::constants::FOO`
// (not re-exported to avoid name collisions).
