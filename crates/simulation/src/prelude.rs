//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use clmm_vault_simulation::prelude::*;
//! ```

pub use crate::error::SimulationError;
pub use crate::host::{PoolSetup, SimulatedHost, SwapResult};
pub use crate::keeper::{
    KeeperConfig, KeeperReport, KeeperSimulation, KeeperSummary, StepAction, StepSnapshot,
};
pub use crate::price_path::{DeterministicPricePath, GeometricBrownianMotion, PricePathGenerator};
