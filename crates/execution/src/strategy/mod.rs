//! Rebalance state machine.
//!
//! Repositions the single active range:
//! - Band calculation at the live tick
//! - Remove, swap to equal value, re-mint
//! - Read-only previews through the quoter

mod rebalance;

pub use rebalance::*;
