//! Domain model and pure math for the single-range liquidity vault.
//!
//! Everything in this crate is side-effect free:
//! - Q96/Q128 fixed-point helpers and tick math
//! - Liquidity <-> token amount conversions
//! - Symmetric tick band calculation
//! - Fee growth accounting for a range
//! - Swap sizing for the 50/50 rebalance

/// Error types shared by the math modules.
pub mod error;
/// Fee growth and uncollected fee estimation.
pub mod fees;
/// Fixed-point, tick and liquidity math.
pub mod math;
/// Data exposed by the pool collaborator.
pub mod pool;
/// Prelude module for convenient imports.
pub mod prelude;
/// Swap sizing before minting.
pub mod swap_sizer;
/// Tick ranges and the centered band calculator.
pub mod tick_range;
/// Tokens and addresses.
pub mod token;
/// Human-facing value objects.
pub mod value_objects;

pub use primitive_types::U256;
