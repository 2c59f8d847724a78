//! Vault engine: share accounting, rebalancing and protocol fees.
//!
//! This crate drives a single concentrated-liquidity position:
//! - Share issuance and redemption against deployed liquidity
//! - Upkeep-gated repositioning around the live price
//! - Two-phase minting with a caller-checked payment callback
//! - Protocol fee retention and collection
//! - Atomic operations with rollback of every collaborator effect
//! - Lifecycle event log

/// Prelude module for convenient imports.
pub mod prelude;

/// Vault configuration.
pub mod config;
/// Error taxonomy.
pub mod error;
/// External collaborator interfaces.
pub mod host;
/// Lifecycle events.
pub mod lifecycle;
/// Protocol fee skimming and collection.
pub mod protocol_fee;
/// Share balances and allowances.
pub mod shares;
/// Vault state.
pub mod state;
/// Rebalance state machine.
pub mod strategy;
/// The vault aggregate and its capabilities.
pub mod vault;
