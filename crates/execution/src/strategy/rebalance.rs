//! Rebalancing execution logic.
//!
//! A reposition removes the whole position, swaps the freed balances to equal
//! value, re-reads the price and mints at the newly centered band. It runs
//! inside the caller's transaction, so a failure at any step leaves nothing behind.

use crate::error::VaultError;
use crate::host::{ExactInputSingleParams, Host};
use crate::lifecycle::{EventData, RebalanceData, RebalanceReason};
use crate::state::RebalancePhase;
use crate::vault::{ShareLedger, Vault};
use clmm_vault_domain::U256;
use clmm_vault_domain::fees::TokenPairAmounts;
use clmm_vault_domain::math::liquidity_math::get_liquidity_for_amounts;
use clmm_vault_domain::swap_sizer::{SwapDirection, SwapPlan, size_rebalance_swap};
use clmm_vault_domain::tick_range::{TickRange, centered_range};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Outcome of a rebalance request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RebalanceOutcome {
    /// The computed band equals the active one; nothing moved.
    Unchanged { range: TickRange, tick: i32 },
    /// The position moved.
    Repositioned(RepositionReport),
}

impl RebalanceOutcome {
    pub fn is_repositioned(&self) -> bool {
        matches!(self, Self::Repositioned(_))
    }

    pub fn range(&self) -> TickRange {
        match self {
            Self::Unchanged { range, .. } => *range,
            Self::Repositioned(report) => report.new_range,
        }
    }
}

/// Record of an effective reposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositionReport {
    pub old_range: TickRange,
    pub new_range: TickRange,
    pub tick: i32,
    pub old_liquidity: u128,
    pub new_liquidity: u128,
    /// Everything collected from the old position, fees included.
    pub collected: TokenPairAmounts,
    pub swap: Option<SwapExecution>,
    /// Amounts paid into the new position.
    pub amounts: TokenPairAmounts,
}

/// A swap performed to reach equal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapExecution {
    pub direction: SwapDirection,
    pub amount_in: U256,
    pub amount_out: U256,
}

impl SwapExecution {
    /// Balances after applying this swap to `before`.
    pub fn balances_after(&self, before: &TokenPairAmounts) -> Result<TokenPairAmounts, VaultError> {
        let (sold, bought) = match self.direction {
            SwapDirection::ZeroForOne => (
                TokenPairAmounts::new(self.amount_in, U256::zero()),
                TokenPairAmounts::new(U256::zero(), self.amount_out),
            ),
            SwapDirection::OneForZero => (
                TokenPairAmounts::new(U256::zero(), self.amount_in),
                TokenPairAmounts::new(self.amount_out, U256::zero()),
            ),
        };
        Ok(before.checked_sub(&sold)?.checked_add(&bought)?)
    }
}

/// Read-only view of what a rebalance would do right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalancePreview {
    pub current_range: TickRange,
    pub proposed_range: TickRange,
    pub tick: i32,
    pub band_changed: bool,
    /// Balances the reposition would work with: position, fees and idle tokens.
    pub amounts: TokenPairAmounts,
    pub swap: Option<SwapPlan>,
    /// Quoted output of `swap`, zero when no swap is needed.
    pub quoted_out: U256,
}

impl<H: Host> Vault<H> {
    /// Re-centers the position on the live tick when the band moved, without
    /// the upkeep gates. Used before deposits and after withdrawals.
    pub(crate) fn rebalance_to_current_price(
        &mut self,
        reason: RebalanceReason,
    ) -> Result<RebalanceOutcome, VaultError> {
        if self.state.phase == RebalancePhase::Repositioning {
            return Err(VaultError::RepositionInProgress);
        }

        let tick = self.host.slot0().tick;
        let new_range = centered_range(tick, self.tick_spacing, self.config.rebalance_width_bps)?;

        if new_range == self.state.range {
            debug!(range = %new_range, tick, ?reason, "Band unchanged, skipping reposition");
            self.record(EventData::RebalanceSkipped {
                range: new_range,
                tick,
                reason,
            });
            return Ok(RebalanceOutcome::Unchanged {
                range: new_range,
                tick,
            });
        }

        self.state.phase = RebalancePhase::Repositioning;
        let report = self.reposition(new_range, tick)?;
        self.state.phase = RebalancePhase::Idle;
        self.state.last_rebalance_time = self.host.now();

        info!(
            old_range = %report.old_range,
            new_range = %report.new_range,
            tick,
            old_liquidity = report.old_liquidity,
            new_liquidity = report.new_liquidity,
            amount0 = %report.amounts.amount0,
            amount1 = %report.amounts.amount1,
            ?reason,
            "Position repositioned"
        );
        self.record(EventData::Rebalance(RebalanceData {
            old_range: report.old_range,
            new_range: report.new_range,
            tick,
            old_liquidity: report.old_liquidity,
            new_liquidity: report.new_liquidity,
            amounts: report.amounts,
            swapped_in: report.swap.map(|s| s.amount_in).unwrap_or_default(),
            zero_for_one: report
                .swap
                .is_some_and(|s| s.direction == SwapDirection::ZeroForOne),
            reason,
        }));

        Ok(RebalanceOutcome::Repositioned(report))
    }

    /// Remove, swap, re-add.
    fn reposition(&mut self, new_range: TickRange, tick: i32) -> Result<RepositionReport, VaultError> {
        let old_range = self.state.range;
        let old_liquidity = self.position_liquidity();

        let collected = self.remove_all_liquidity()?;
        self.state.range = new_range;

        // without shareholders the freed tokens stay idle for the protocol sweep
        if self.total_supply().is_zero() {
            return Ok(RepositionReport {
                old_range,
                new_range,
                tick,
                old_liquidity,
                new_liquidity: 0,
                collected,
                swap: None,
                amounts: TokenPairAmounts::zero(),
            });
        }

        let available = self.available_balances()?;
        let swap = self.swap_to_ratio(&available)?;

        let available = self.available_balances()?;
        let (sqrt_lower, sqrt_upper) = new_range.sqrt_ratios()?;
        let liquidity = get_liquidity_for_amounts(
            self.host.slot0().sqrt_price_x96,
            sqrt_lower,
            sqrt_upper,
            available.amount0,
            available.amount1,
        )?;

        let (new_liquidity, amounts) = if liquidity > 0 {
            self.mint_liquidity(liquidity)?
        } else {
            (0, TokenPairAmounts::zero())
        };

        Ok(RepositionReport {
            old_range,
            new_range,
            tick,
            old_liquidity,
            new_liquidity,
            collected,
            swap,
            amounts,
        })
    }

    /// Swaps part of `balances` so both sides hold equal value at the live price.
    /// The vault pays the input and receives the output.
    pub(crate) fn swap_to_ratio(
        &mut self,
        balances: &TokenPairAmounts,
    ) -> Result<Option<SwapExecution>, VaultError> {
        let sqrt_price = self.host.slot0().sqrt_price_x96;
        let Some(plan) = size_rebalance_swap(balances.amount0, balances.amount1, sqrt_price)? else {
            return Ok(None);
        };

        let (token_in, token_out) = match plan.direction {
            SwapDirection::ZeroForOne => (&self.tokens.token0, &self.tokens.token1),
            SwapDirection::OneForZero => (&self.tokens.token1, &self.tokens.token0),
        };
        let params = ExactInputSingleParams {
            token_in: token_in.address.clone(),
            token_out: token_out.address.clone(),
            fee: self.fee_pips,
            recipient: self.address.clone(),
            deadline: self.host.now(),
            amount_in: plan.amount_in,
            amount_out_minimum: U256::zero(),
            sqrt_price_limit_x96: U256::zero(),
        };

        let amount_out = self.host.exact_input_single(&self.address, params)?;
        debug!(
            direction = ?plan.direction,
            amount_in = %plan.amount_in,
            amount_out = %amount_out,
            "Ratio swap executed"
        );

        Ok(Some(SwapExecution {
            direction: plan.direction,
            amount_in: plan.amount_in,
            amount_out,
        }))
    }

    /// What a rebalance at the live price would do, using the quoter. Read-only.
    pub fn preview_rebalance(&self) -> Result<RebalancePreview, VaultError> {
        let slot0 = self.host.slot0();
        let proposed_range =
            centered_range(slot0.tick, self.tick_spacing, self.config.rebalance_width_bps)?;

        let amounts = self
            .position_amounts()?
            .checked_add(&self.pending_fees()?)?
            .checked_add(&self.available_balances()?)?;

        let swap = size_rebalance_swap(amounts.amount0, amounts.amount1, slot0.sqrt_price_x96)?;
        let quoted_out = match &swap {
            Some(plan) => {
                let (token_in, token_out) = match plan.direction {
                    SwapDirection::ZeroForOne => (&self.tokens.token0, &self.tokens.token1),
                    SwapDirection::OneForZero => (&self.tokens.token1, &self.tokens.token0),
                };
                self.host.quote_exact_input_single(
                    &token_in.address,
                    &token_out.address,
                    self.fee_pips,
                    plan.amount_in,
                )?
            }
            None => U256::zero(),
        };

        Ok(RebalancePreview {
            current_range: self.state.range,
            proposed_range,
            tick: slot0.tick,
            band_changed: proposed_range != self.state.range,
            amounts,
            swap,
            quoted_out,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: u64, b: u64) -> TokenPairAmounts {
        TokenPairAmounts::new(U256::from(a), U256::from(b))
    }

    #[test]
    fn test_balances_after_swap() {
        let swap = SwapExecution {
            direction: SwapDirection::ZeroForOne,
            amount_in: U256::from(500u64),
            amount_out: U256::from(497u64),
        };
        assert_eq!(swap.balances_after(&pair(1000, 0)).unwrap(), pair(500, 497));

        let swap = SwapExecution {
            direction: SwapDirection::OneForZero,
            amount_in: U256::from(10u64),
            amount_out: U256::from(9u64),
        };
        assert_eq!(swap.balances_after(&pair(1, 20)).unwrap(), pair(10, 10));
        assert!(swap.balances_after(&pair(0, 5)).is_err());
    }

    #[test]
    fn test_outcome_range() {
        let range = TickRange::new(-60, 60).unwrap();
        let outcome = RebalanceOutcome::Unchanged { range, tick: 0 };
        assert!(!outcome.is_repositioned());
        assert_eq!(outcome.range(), range);
    }
}
