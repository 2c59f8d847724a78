//! Interfaces of the external collaborators the vault drives.
//!
//! The pool is a black box: the vault only reads its state and issues
//! mint/burn/collect requests. Minting is two-phase: [`Pool::request_mint`]
//! returns a [`MintObligation`], the vault settles it through
//! [`crate::vault::PoolCallbackSink`], then [`Pool::complete_mint`] verifies the
//! payment and credits the liquidity.

use clmm_vault_domain::U256;
use clmm_vault_domain::error::MathError;
use clmm_vault_domain::fees::{FeeGrowthSnapshot, TokenPairAmounts};
use clmm_vault_domain::pool::{MintObligation, PoolParams, PositionInfo, PositionKey, Slot0, TickInfo};
use clmm_vault_domain::tick_range::TickRange;
use clmm_vault_domain::token::{Address, TokenPair};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reported by collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("insufficient {token} balance for {owner}: have {available}, need {required}")]
    InsufficientBalance {
        token: Address,
        owner: Address,
        available: U256,
        required: U256,
    },

    #[error("unknown position {owner} {range}")]
    UnknownPosition { owner: Address, range: TickRange },

    #[error("position holds {available} liquidity, {requested} requested")]
    InsufficientLiquidity { available: u128, requested: u128 },

    #[error("mint obligation {id} was not paid in full")]
    ObligationUnpaid { id: u64 },

    #[error("unknown mint obligation {id}")]
    UnknownObligation { id: u64 },

    #[error("swap deadline {deadline} passed at {now}")]
    DeadlinePassed { deadline: u64, now: u64 },

    #[error("pool has no liquidity to trade against")]
    NoLiquidity,

    #[error("pool math failed: {0}")]
    Math(#[from] MathError),

    #[error("{0}")]
    Rejected(String),
}

/// The concentrated-liquidity pool.
pub trait Pool {
    fn pool_address(&self) -> Address;

    fn tokens(&self) -> TokenPair;

    fn params(&self) -> PoolParams;

    fn slot0(&self) -> Slot0;

    fn fee_growth_global(&self) -> TokenPairAmounts;

    fn ticks(&self, tick: i32) -> TickInfo;

    fn positions(&self, key: &PositionKey) -> PositionInfo;

    /// First phase of a mint: quotes the owed amounts and records the obligation.
    fn request_mint(
        &mut self,
        owner: &Address,
        range: TickRange,
        liquidity: u128,
    ) -> Result<MintObligation, HostError>;

    /// Second phase of a mint: checks the obligation was paid and credits the
    /// liquidity. Returns the liquidity credited.
    fn complete_mint(&mut self, obligation: &MintObligation) -> Result<u128, HostError>;

    /// Removes liquidity from `owner`'s position; the amounts become owed to it.
    fn burn(
        &mut self,
        owner: &Address,
        range: TickRange,
        liquidity: u128,
    ) -> Result<TokenPairAmounts, HostError>;

    /// Transfers up to `max` of the owed amounts to `recipient`.
    fn collect(
        &mut self,
        owner: &Address,
        recipient: &Address,
        range: TickRange,
        max: TokenPairAmounts,
    ) -> Result<TokenPairAmounts, HostError>;

    /// Fee growth counters relevant to `range`, read in one go.
    fn fee_growth_snapshot(&self, range: &TickRange) -> FeeGrowthSnapshot {
        let lower = self.ticks(range.lower);
        let upper = self.ticks(range.upper);
        FeeGrowthSnapshot {
            current_tick: self.slot0().tick,
            global: self.fee_growth_global(),
            lower_outside: TokenPairAmounts::new(
                lower.fee_growth_outside0_x128,
                lower.fee_growth_outside1_x128,
            ),
            upper_outside: TokenPairAmounts::new(
                upper.fee_growth_outside0_x128,
                upper.fee_growth_outside1_x128,
            ),
        }
    }
}

/// Parameters of a single-hop exact-input swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactInputSingleParams {
    pub token_in: Address,
    pub token_out: Address,
    pub fee: u32,
    pub recipient: Address,
    pub deadline: u64,
    pub amount_in: U256,
    pub amount_out_minimum: U256,
    /// Zero means no limit.
    pub sqrt_price_limit_x96: U256,
}

/// The swap-execution venue.
pub trait SwapVenue {
    /// Pulls `amount_in` from `payer` and sends the output to the recipient.
    fn exact_input_single(
        &mut self,
        payer: &Address,
        params: ExactInputSingleParams,
    ) -> Result<U256, HostError>;
}

/// Off-settlement-path quotes.
pub trait Quoter {
    fn quote_exact_input_single(
        &self,
        token_in: &Address,
        token_out: &Address,
        fee: u32,
        amount_in: U256,
    ) -> Result<U256, HostError>;
}

/// The token transfer primitive.
pub trait TokenLedger {
    fn balance_of(&self, token: &Address, owner: &Address) -> U256;

    fn transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<(), HostError>;
}

/// Wall clock in seconds.
pub trait Clock {
    fn now(&self) -> u64;
}

/// Restorable snapshots of collaborator state, used to make operations atomic.
pub trait Checkpoint {
    type Snapshot;

    fn checkpoint(&self) -> Self::Snapshot;

    fn rollback(&mut self, snapshot: Self::Snapshot);
}

/// Everything a vault needs from its environment.
pub trait Host: Pool + SwapVenue + Quoter + TokenLedger + Clock + Checkpoint {}

impl<T> Host for T where T: Pool + SwapVenue + Quoter + TokenLedger + Clock + Checkpoint {}
