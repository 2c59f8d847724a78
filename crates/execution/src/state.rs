//! The vault's owned mutable state.

use crate::shares::ShareBalances;
use clmm_vault_domain::fees::TokenPairAmounts;
use clmm_vault_domain::pool::MintObligation;
use clmm_vault_domain::tick_range::TickRange;
use serde::{Deserialize, Serialize};

/// Phase of the rebalance state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RebalancePhase {
    /// The position matches the desired band or is waiting for a trigger.
    #[default]
    Idle,
    /// Transient: old liquidity removed, new liquidity not yet minted.
    Repositioning,
}

/// Everything the vault owns apart from tokens held by the host and its event log.
///
/// Mutated only inside [`crate::vault::Vault::transact`], which restores it on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultState {
    /// The single active range.
    pub range: TickRange,
    pub shares: ShareBalances,
    /// Protocol cut retained from withdrawals and not yet collected.
    pub protocol_accrual: TokenPairAmounts,
    pub last_rebalance_time: u64,
    pub phase: RebalancePhase,
    /// Obligation handed out by the pool and awaiting payment.
    pub pending_obligation: Option<MintObligation>,
}

impl VaultState {
    pub fn new(range: TickRange, now: u64) -> Self {
        Self {
            range,
            shares: ShareBalances::new(),
            protocol_accrual: TokenPairAmounts::zero(),
            last_rebalance_time: now,
            phase: RebalancePhase::Idle,
            pending_obligation: None,
        }
    }
}
