//! # rewardrail-settlement
//!
//! **Claim Settlement Service**: orchestrates a withdrawal end-to-end
//! with at-most-once settlement semantics against an opaque transfer
//! rail.
//!
//! ## Architecture
//!
//! A [`SettlementService`] receives a withdrawal request and:
//! 1. Validates the amount and replays idempotency-key duplicates onto
//!    the existing claim
//! 2. Consults the daily cap, trust engine, and wallet registry (all
//!    independent gates, all must pass, no side effect on rejection)
//! 3. Debits the ledger and transitions the claim PENDING → SUBMITTED
//!    in one step — **debit-then-dispatch**, never the reverse
//! 4. Dispatches the transfer on the [`TransferRail`] after the local
//!    state is settled
//! 5. Resolves SUBMITTED claims to CONFIRMED or REFUNDED via rail
//!    callbacks or the periodic [`Reconciler`]
//!
//! ## Claim Flow
//!
//! ```text
//! SubmitClaim → gates → debit + SUBMITTED → rail.dispatch()
//!     → Dispatched: await confirm() / Reconciler
//!     → Rejected:   reverse debit + REFUNDED
//!     → Unknown:    Reconciler resolves later
//! ```

pub mod rail;
pub mod reconcile;
pub mod service;

pub use rail::{DispatchOutcome, RailStatus, ScriptedOutcome, ScriptedRail, TransferRail};
pub use reconcile::{ReconcileReport, Reconciler};
pub use service::SettlementService;
