//! # rewardrail-policy
//!
//! **Policy Plane**: the pre-debit gates consulted by claim settlement.
//!
//! ## Architecture
//!
//! 1. **TrustEngine**: converts claim history into a trust tier with an
//!    hourly request ceiling and a settlement cooldown
//! 2. **WalletRegistry**: one-wallet-per-account with bounded switches
//!    and a global active-address uniqueness index
//! 3. **DailyCapPolicy**: rolling daily withdrawal quota, modulated by
//!    the account's age group
//!
//! ## Gate Flow
//!
//! ```text
//! SubmitClaim → DailyCapPolicy.check() → TrustEngine.check()
//!             → WalletRegistry.active_link() == destination → debit
//! ```
//!
//! All gates are independent and fail-closed: every claim path goes
//! through all of them before any ledger effect.

pub mod daily_cap;
pub mod trust;
pub mod wallet_registry;

pub use daily_cap::DailyCapPolicy;
pub use trust::TrustEngine;
pub use wallet_registry::WalletRegistry;
