//! # Gatepass
//!
//! Admission core for ticketed events. Guests hold a finite number of
//! entry passes and carry a scannable credential; staff at the gates scan
//! credentials and the ledger atomically admits or rejects each scan based
//! on event status, the scanning actor's scope, and the guest's remaining
//! balance.
//!
//! ## Architecture
//!
//! The admission rules live in pure code ([`ledger::eligibility`] and the
//! reducer in [`ledger::reducer`]); the [`ledger::AccessLedger`] shell
//! owns per-guest serialization units and executes the effects the reducer
//! describes. The HTTP layer in [`api`] and [`server`] is a thin skin over
//! the ledger.

pub mod api;
pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod ledger;
pub mod projections;
pub mod server;
pub mod types;
