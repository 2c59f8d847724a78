//! Vault lifecycle records.
//!
//! Every committed operation leaves a typed event behind:
//! - Deposits and withdrawals
//! - Effective and skipped repositions
//! - Protocol fee collections

mod events;
mod log;

pub use events::*;
pub use log::*;
