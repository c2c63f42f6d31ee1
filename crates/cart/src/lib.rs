//! Cart domain module.
//!
//! This crate contains the in-memory cart: quantity merging, patching and the
//! derived totals, implemented purely as deterministic logic (no IO, no async).
//!
//! Access is single-writer: every mutation takes `&mut self`. Hosts that share
//! one cart between several screens wrap the `OrderService` in a lock.

pub mod order;
pub mod store;

pub use order::{CartObserver, OrderService};
pub use store::{CartStore, CartTotals};
