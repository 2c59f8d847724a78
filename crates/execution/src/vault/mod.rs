//! The vault aggregate.
//!
//! One [`Vault`] owns the [`VaultState`] and drives a [`Host`]. Its public
//! surface is split into capabilities:
//! - [`ShareLedger`]: deposits, withdrawals, conversions and share transfers
//! - [`TriggerSource`]: the automation check/perform pair
//! - [`PoolCallbackSink`]: the payment phase of a two-phase mint
//!
//! Every mutating entry point runs inside [`Vault::transact`].

mod callback;
mod ledger;
mod upkeep;

pub use callback::PoolCallbackSink;
pub use ledger::ShareLedger;
pub use upkeep::{TriggerSource, UpkeepCheck, decode_perform_data, encode_perform_data};

use crate::config::VaultConfig;
use crate::error::VaultError;
use crate::host::Host;
use crate::lifecycle::{EventData, EventLog, VaultEvent};
use crate::state::VaultState;
use clmm_vault_domain::U256;
use clmm_vault_domain::fees::{PositionFeeState, TokenPairAmounts, accrued_fees};
use clmm_vault_domain::math::Rounding;
use clmm_vault_domain::math::liquidity_math::get_amounts_for_liquidity;
use clmm_vault_domain::pool::{PositionInfo, PositionKey};
use clmm_vault_domain::tick_range::{TickRange, centered_range};
use clmm_vault_domain::token::{Address, TokenPair};
use tracing::{debug, info, warn};

/// A single-range liquidity vault.
#[derive(Debug)]
pub struct Vault<H: Host> {
    pub(crate) address: Address,
    pub(crate) config: VaultConfig,
    pub(crate) pool: Address,
    pub(crate) tokens: TokenPair,
    pub(crate) tick_spacing: i32,
    pub(crate) fee_pips: u32,
    pub(crate) host: H,
    pub(crate) state: VaultState,
    pub(crate) events: EventLog,
}

impl<H: Host> Vault<H> {
    /// Creates a vault centered on the pool's current price.
    ///
    /// # Errors
    /// `InvalidConfig` when the configuration is malformed, or when the band would
    /// collapse or exclude its own center tick for the pool's tick spacing.
    pub fn new(address: Address, config: VaultConfig, host: H) -> Result<Self, VaultError> {
        config.validate()?;

        let params = host.params();
        if params.tick_spacing <= 0 {
            return Err(VaultError::InvalidConfig(format!(
                "tick spacing must be positive, got {}",
                params.tick_spacing
            )));
        }

        let slot0 = host.slot0();
        for tick in [0, slot0.tick] {
            let band = centered_range(tick, params.tick_spacing, config.rebalance_width_bps)
                .map_err(|e| {
                    VaultError::InvalidConfig(format!(
                        "width {} is too narrow for tick spacing {}: {e}",
                        config.rebalance_width_bps, params.tick_spacing
                    ))
                })?;
            // snapping toward zero can leave the tick outside a band narrower than one spacing
            if !band.contains(tick) {
                return Err(VaultError::InvalidConfig(format!(
                    "width {} with tick spacing {} gives band {band} that excludes tick {tick}",
                    config.rebalance_width_bps, params.tick_spacing
                )));
            }
        }
        let range = centered_range(slot0.tick, params.tick_spacing, config.rebalance_width_bps)?;

        let now = host.now();
        let pool = host.pool_address();
        let tokens = host.tokens();

        info!(
            vault = %address,
            pool = %pool,
            range = %range,
            tick = slot0.tick,
            width = config.rebalance_width_bps,
            "Vault initialized"
        );

        Ok(Self {
            address,
            config,
            pool,
            tokens,
            tick_spacing: params.tick_spacing,
            fee_pips: params.fee_pips,
            host,
            state: VaultState::new(range, now),
            events: EventLog::new(),
        })
    }

    /// Runs `op` atomically: on error the host, the vault state and the event
    /// log are restored to what they were before the call.
    pub fn transact<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, VaultError>,
    ) -> Result<T, VaultError> {
        let host_snapshot = self.host.checkpoint();
        let state_snapshot = self.state.clone();
        let events_len = self.events.len();

        match op(self) {
            Ok(value) => Ok(value),
            Err(e) => {
                self.host.rollback(host_snapshot);
                self.state = state_snapshot;
                self.events.truncate(events_len);
                warn!(vault = %self.address, kind = ?e.kind(), error = %e, "Operation rolled back");
                Err(e)
            }
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn pool_address(&self) -> &Address {
        &self.pool
    }

    pub fn tokens(&self) -> &TokenPair {
        &self.tokens
    }

    pub fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    pub fn state(&self) -> &VaultState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the environment, for drivers moving prices or time
    /// between operations.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The active range.
    pub fn position_range(&self) -> TickRange {
        self.state.range
    }

    pub fn position_key(&self) -> PositionKey {
        PositionKey::new(self.address.clone(), self.state.range)
    }

    pub fn position_info(&self) -> PositionInfo {
        self.host.positions(&self.position_key())
    }

    /// Liquidity deployed in the pool position.
    pub fn position_liquidity(&self) -> u128 {
        self.position_info().liquidity
    }

    /// Token amounts backing the position at the live price, rounded down.
    pub fn position_amounts(&self) -> Result<TokenPairAmounts, VaultError> {
        let (sqrt_lower, sqrt_upper) = self.state.range.sqrt_ratios()?;
        let (amount0, amount1) = get_amounts_for_liquidity(
            self.host.slot0().sqrt_price_x96,
            sqrt_lower,
            sqrt_upper,
            self.position_liquidity(),
            Rounding::Down,
        )?;
        Ok(TokenPairAmounts::new(amount0, amount1))
    }

    /// Uncollected fees of the position: the growth-based estimate since the
    /// last pool update plus amounts the pool already owes.
    pub fn pending_fees(&self) -> Result<TokenPairAmounts, VaultError> {
        let info = self.position_info();
        let snapshot = self.host.fee_growth_snapshot(&self.state.range);
        let estimate = accrued_fees(
            &self.state.range,
            &snapshot,
            &PositionFeeState {
                liquidity: info.liquidity,
                fee_growth_inside_last: info.fee_growth_inside_last(),
            },
        )?;
        Ok(estimate.checked_add(&info.tokens_owed())?)
    }

    pub fn protocol_accrual(&self) -> TokenPairAmounts {
        self.state.protocol_accrual
    }

    pub fn last_rebalance_time(&self) -> u64 {
        self.state.last_rebalance_time
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Token balances held by the vault itself, including the protocol accrual.
    pub fn idle_balances(&self) -> TokenPairAmounts {
        TokenPairAmounts::new(
            self.host
                .balance_of(&self.tokens.token0.address, &self.address),
            self.host
                .balance_of(&self.tokens.token1.address, &self.address),
        )
    }

    /// Idle balances that belong to shareholders.
    pub(crate) fn available_balances(&self) -> Result<TokenPairAmounts, VaultError> {
        Ok(self
            .idle_balances()
            .checked_sub(&self.state.protocol_accrual)?)
    }

    pub(crate) fn record(&mut self, data: EventData) {
        let event = VaultEvent::new(self.host.now(), data);
        self.events.record(event);
    }

    /// Mints `liquidity` at the active range, paying from the vault's balances
    /// through the two-phase mint. Returns the liquidity credited and the
    /// amounts paid.
    pub(crate) fn mint_liquidity(
        &mut self,
        liquidity: u128,
    ) -> Result<(u128, TokenPairAmounts), VaultError> {
        let obligation = self
            .host
            .request_mint(&self.address, self.state.range, liquidity)?;
        self.state.pending_obligation = Some(obligation.clone());

        // the pool calls back for payment before crediting anything
        self.settle_obligation(&obligation.pool, &obligation)?;

        let minted = self.host.complete_mint(&obligation)?;
        if minted == 0 {
            return Err(VaultError::ZeroLiquidityMinted {
                requested: liquidity,
            });
        }

        debug!(
            range = %self.state.range,
            liquidity = minted,
            amount0 = %obligation.amount0,
            amount1 = %obligation.amount1,
            "Liquidity minted"
        );
        Ok((minted, obligation.amounts()))
    }

    /// Burns `liquidity` from the position; the amounts become owed by the pool.
    pub(crate) fn burn_liquidity(&mut self, liquidity: u128) -> Result<TokenPairAmounts, VaultError> {
        if liquidity == 0 {
            return Ok(TokenPairAmounts::zero());
        }
        let burned = self
            .host
            .burn(&self.address, self.state.range, liquidity)?;
        debug!(
            range = %self.state.range,
            liquidity,
            amount0 = %burned.amount0,
            amount1 = %burned.amount1,
            "Liquidity burned"
        );
        Ok(burned)
    }

    /// Collects up to `max` of what the pool owes the position into the vault.
    pub(crate) fn collect_owed(
        &mut self,
        max: TokenPairAmounts,
    ) -> Result<TokenPairAmounts, VaultError> {
        let collected =
            self.host
                .collect(&self.address, &self.address, self.state.range, max)?;
        debug!(
            range = %self.state.range,
            collected0 = %collected.amount0,
            collected1 = %collected.amount1,
            "Owed tokens collected"
        );
        Ok(collected)
    }

    /// Burns the whole position and collects everything owed, fees included.
    pub(crate) fn remove_all_liquidity(&mut self) -> Result<TokenPairAmounts, VaultError> {
        let liquidity = self.position_liquidity();
        self.burn_liquidity(liquidity)?;
        self.collect_owed(TokenPairAmounts::new(U256::MAX, U256::MAX))
    }

    /// Sends vault-held tokens to `to`.
    pub(crate) fn pay(&mut self, to: &Address, amounts: &TokenPairAmounts) -> Result<(), VaultError> {
        let token0 = self.tokens.token0.address.clone();
        let token1 = self.tokens.token1.address.clone();
        if !amounts.amount0.is_zero() {
            self.host
                .transfer(&token0, &self.address, to, amounts.amount0)?;
        }
        if !amounts.amount1.is_zero() {
            self.host
                .transfer(&token1, &self.address, to, amounts.amount1)?;
        }
        Ok(())
    }

    /// Pulls tokens from `from` into the vault.
    pub(crate) fn pull(
        &mut self,
        from: &Address,
        amounts: &TokenPairAmounts,
    ) -> Result<(), VaultError> {
        let token0 = self.tokens.token0.address.clone();
        let token1 = self.tokens.token1.address.clone();
        if !amounts.amount0.is_zero() {
            self.host
                .transfer(&token0, from, &self.address, amounts.amount0)?;
        }
        if !amounts.amount1.is_zero() {
            self.host
                .transfer(&token1, from, &self.address, amounts.amount1)?;
        }
        Ok(())
    }
}
