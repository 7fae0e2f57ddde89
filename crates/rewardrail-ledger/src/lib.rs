//! # rewardrail-ledger
//!
//! **Ledger Store**: the single source of truth for reward balances.
//!
//! ## Architecture
//!
//! 1. **LedgerStore**: append-only accrual events plus derived per-user
//!    aggregates (pending / claimed / total earned / daily quota)
//! 2. **Conservation**: the invariant checker — for every account,
//!    `total_earned == claimed + pending`, and globally the sum of
//!    lifetime earnings equals the sum of recorded accrual events
//!
//! ## Mutation Flow
//!
//! ```text
//! producers → LedgerStore.accrue()          (pending += x, total += x)
//! settlement → LedgerStore.debit()          (pending -= x, claimed += x, quota += x)
//! settlement → LedgerStore.reverse_debit()  (refund compensation)
//! ```
//!
//! Every mutation to one account happens inside a single `&mut` access,
//! so balance, lifetime totals, and daily quota move together atomically.

pub mod conservation;
pub mod store;

pub use conservation::{verify_account, verify_ledger};
pub use store::LedgerStore;
