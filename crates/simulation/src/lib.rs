//! Deterministic environment for driving a vault.
//!
//! This crate provides:
//! - An in-memory pool, token ledger, router and quoter implementing the host traits
//! - Price path generators
//! - A keeper loop polling the vault's upkeep surface along a price path

/// Prelude module for convenient imports.
pub mod prelude;

/// Simulation errors.
pub mod error;
/// In-memory host.
pub mod host;
/// Keeper loop.
pub mod keeper;
/// Price path generators.
pub mod price_path;
