use crate::fees::TokenPairAmounts;
use crate::tick_range::TickRange;
use crate::token::Address;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Live price state of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot0 {
    /// Current sqrt price as Q64.96.
    pub sqrt_price_x96: U256,
    /// Current tick.
    pub tick: i32,
}

/// Static parameters of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolParams {
    /// Tick spacing; usable ticks are multiples of it.
    pub tick_spacing: i32,
    /// Swap fee in hundredths of a bip (3000 = 0.3%).
    pub fee_pips: u32,
}

/// Identifies a position inside the pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionKey {
    pub owner: Address,
    pub range: TickRange,
}

impl PositionKey {
    pub fn new(owner: Address, range: TickRange) -> Self {
        Self { owner, range }
    }
}

/// Pool-side record of a position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInfo {
    pub liquidity: u128,
    pub fee_growth_inside0_last_x128: U256,
    pub fee_growth_inside1_last_x128: U256,
    /// Fees and burned principal credited but not yet collected.
    pub tokens_owed0: U256,
    pub tokens_owed1: U256,
}

impl PositionInfo {
    pub fn tokens_owed(&self) -> TokenPairAmounts {
        TokenPairAmounts::new(self.tokens_owed0, self.tokens_owed1)
    }

    pub fn fee_growth_inside_last(&self) -> TokenPairAmounts {
        TokenPairAmounts::new(
            self.fee_growth_inside0_last_x128,
            self.fee_growth_inside1_last_x128,
        )
    }
}

/// Pool-side record of an initialized tick boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInfo {
    pub liquidity_gross: u128,
    pub liquidity_net: i128,
    pub fee_growth_outside0_x128: U256,
    pub fee_growth_outside1_x128: U256,
    pub initialized: bool,
}

/// Payment the pool expects during the first phase of a mint.
///
/// The pool hands this to the minter, which must transfer `amount0`/`amount1`
/// to `pool` before the pool credits `liquidity` to the position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintObligation {
    pub id: u64,
    pub pool: Address,
    pub owner: Address,
    pub range: TickRange,
    pub liquidity: u128,
    pub amount0: U256,
    pub amount1: U256,
}

impl MintObligation {
    pub fn amounts(&self) -> TokenPairAmounts {
        TokenPairAmounts::new(self.amount0, self.amount1)
    }
}
