//! Keeper loop: walks a price path, lets fees accrue, and polls the vault's
//! upkeep surface the way an external automation service would.

use crate::error::SimulationError;
use crate::host::SimulatedHost;
use clmm_vault_domain::U256;
use clmm_vault_domain::fees::TokenPairAmounts;
use clmm_vault_domain::math::price_tick::price_to_tick;
use clmm_vault_domain::math::tick_math::{MAX_TICK, MIN_TICK};
use clmm_vault_domain::tick_range::TickRange;
use clmm_vault_domain::value_objects::Price;
use clmm_vault_execution::error::{ErrorKind, VaultError};
use clmm_vault_execution::host::{Clock, Pool};
use clmm_vault_execution::lifecycle::EventSummary;
use clmm_vault_execution::vault::{ShareLedger, TriggerSource, Vault};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Keeper loop parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeeperConfig {
    /// Clock advance per path step, seconds.
    pub step_secs: u64,
    /// Swap fees credited to the active liquidity each step.
    pub fees_per_step: TokenPairAmounts,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            step_secs: 3600,
            fees_per_step: TokenPairAmounts::new(
                U256::from(1_000_000_000_000u64),
                U256::from(1_000_000_000_000u64),
            ),
        }
    }
}

/// What the keeper did at one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepAction {
    /// Upkeep was not needed.
    Idle,
    /// Upkeep ran and moved the position.
    Rebalanced { new_range: TickRange },
    /// Upkeep ran but the vault refused it.
    Rejected { kind: ErrorKind, reason: String },
}

/// State observed after one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSnapshot {
    pub step: usize,
    pub timestamp: u64,
    pub price: Price,
    pub tick: i32,
    pub range: TickRange,
    pub in_range: bool,
    pub position_liquidity: u128,
    pub pending_fees: TokenPairAmounts,
    pub action: StepAction,
}

/// Aggregate outcome of a keeper run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeeperSummary {
    pub steps: usize,
    pub rebalances: u32,
    pub rejected_upkeeps: u32,
    pub steps_in_range: usize,
    /// Fraction of steps ending in range.
    pub time_in_range: Decimal,
    pub final_tick: i32,
    pub final_range: TickRange,
    pub total_supply: U256,
    pub total_liquidity: u128,
    pub protocol_accrual: TokenPairAmounts,
    pub events: EventSummary,
}

/// Full record of a keeper run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeeperReport {
    pub snapshots: Vec<StepSnapshot>,
    pub summary: KeeperSummary,
}

/// Drives a vault over a simulated pool.
pub struct KeeperSimulation {
    vault: Vault<SimulatedHost>,
    config: KeeperConfig,
}

impl KeeperSimulation {
    pub fn new(vault: Vault<SimulatedHost>, config: KeeperConfig) -> Self {
        Self { vault, config }
    }

    pub fn vault(&self) -> &Vault<SimulatedHost> {
        &self.vault
    }

    /// Runs one step per price after the first, which is taken as the
    /// starting point.
    pub fn run(&mut self, path: &[Price]) -> Result<KeeperReport, SimulationError> {
        if self.config.step_secs == 0 {
            return Err(SimulationError::InvalidParameter(
                "step_secs must be positive".to_string(),
            ));
        }

        let mut snapshots = Vec::with_capacity(path.len().saturating_sub(1));
        for (step, price) in path.iter().enumerate().skip(1) {
            snapshots.push(self.step(step, *price)?);
        }

        let summary = self.summarize(&snapshots);
        info!(
            steps = summary.steps,
            rebalances = summary.rebalances,
            rejected = summary.rejected_upkeeps,
            time_in_range = %summary.time_in_range,
            "Keeper run complete"
        );
        Ok(KeeperReport { snapshots, summary })
    }

    fn step(&mut self, step: usize, price: Price) -> Result<StepSnapshot, SimulationError> {
        let tick = price_to_tick(price.value)?.clamp(MIN_TICK + 1, MAX_TICK - 1);

        let host = self.vault.host_mut();
        host.move_to_tick(tick)?;
        let fees = self.config.fees_per_step;
        if host.active_liquidity() > 0 && !fees.is_zero() {
            host.donate_fees(fees.amount0, fees.amount1)?;
        }
        host.advance(self.config.step_secs);

        let check = self.vault.check_upkeep();
        let action = if check.upkeep_needed {
            match self.vault.perform_upkeep(&check.perform_data) {
                Ok(outcome) => StepAction::Rebalanced {
                    new_range: outcome.range(),
                },
                Err(e) => Self::rejection(e)?,
            }
        } else {
            StepAction::Idle
        };

        let slot0 = self.vault.host().slot0();
        let range = self.vault.position_range();
        let snapshot = StepSnapshot {
            step,
            timestamp: self.vault.host().now(),
            price,
            tick: slot0.tick,
            range,
            in_range: range.contains(slot0.tick),
            position_liquidity: self.vault.position_liquidity(),
            pending_fees: self.vault.pending_fees()?,
            action,
        };
        debug!(
            step,
            tick = snapshot.tick,
            range = %snapshot.range,
            in_range = snapshot.in_range,
            "Keeper step"
        );
        Ok(snapshot)
    }

    /// Refusals a live keeper would log and retry; anything else aborts the run.
    fn rejection(error: VaultError) -> Result<StepAction, SimulationError> {
        match error.kind() {
            ErrorKind::PreconditionNotMet | ErrorKind::Staleness => {
                warn!(error = %error, "Upkeep rejected");
                Ok(StepAction::Rejected {
                    kind: error.kind(),
                    reason: error.to_string(),
                })
            }
            _ => Err(error.into()),
        }
    }

    fn summarize(&self, snapshots: &[StepSnapshot]) -> KeeperSummary {
        let mut rebalances = 0;
        let mut rejected_upkeeps = 0;
        for snapshot in snapshots {
            match snapshot.action {
                StepAction::Rebalanced { .. } => rebalances += 1,
                StepAction::Rejected { .. } => rejected_upkeeps += 1,
                StepAction::Idle => {}
            }
        }
        let steps_in_range = snapshots.iter().filter(|s| s.in_range).count();
        let time_in_range = if snapshots.is_empty() {
            Decimal::ZERO
        } else {
            Decimal::from(steps_in_range) / Decimal::from(snapshots.len())
        };

        KeeperSummary {
            steps: snapshots.len(),
            rebalances,
            rejected_upkeeps,
            steps_in_range,
            time_in_range,
            final_tick: self.vault.host().slot0().tick,
            final_range: self.vault.position_range(),
            total_supply: self.vault.total_supply(),
            total_liquidity: self.vault.total_liquidity_assets(),
            protocol_accrual: self.vault.protocol_accrual(),
            events: self.vault.events().summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::PoolSetup;
    use crate::price_path::{DeterministicPricePath, PricePathGenerator};
    use clmm_vault_domain::token::Address;
    use clmm_vault_execution::config::VaultConfig;

    fn keeper() -> KeeperSimulation {
        let mut host = SimulatedHost::new(PoolSetup::default()).unwrap();
        let alice = Address::new("alice");
        host.fund(&Address::new("token0"), &alice, U256::from(10u128.pow(15)));
        host.fund(&Address::new("token1"), &alice, U256::from(10u128.pow(15)));

        let mut vault = Vault::new(Address::new("vault"), VaultConfig::default(), host).unwrap();
        vault
            .deposit(&alice, 1_000_000_000_000, &alice)
            .unwrap();
        KeeperSimulation::new(vault, KeeperConfig::default())
    }

    #[test]
    fn test_quiet_path_never_rebalances() {
        let mut keeper = keeper();
        let path = DeterministicPricePath::from_ticks(&[0, 10, -10, 30, 0])
            .unwrap()
            .generate(4)
            .unwrap();
        let report = keeper.run(&path).unwrap();

        assert_eq!(report.snapshots.len(), 4);
        assert_eq!(report.summary.rebalances, 0);
        assert_eq!(report.summary.steps_in_range, 4);
        assert!(report.snapshots.iter().all(|s| s.action == StepAction::Idle));
        // in-range liquidity earned a share of the donated fees
        assert!(!report.snapshots[3].pending_fees.is_zero());
    }

    #[test]
    fn test_range_exit_triggers_one_rebalance() {
        let mut keeper = keeper();
        let path = DeterministicPricePath::from_ticks(&[0, 2000, 2010, 2020])
            .unwrap()
            .generate(3)
            .unwrap();
        let report = keeper.run(&path).unwrap();

        // the first step lands exactly on the interval boundary, which is not past it
        assert_eq!(report.snapshots[0].action, StepAction::Idle);
        assert!(!report.snapshots[0].in_range);
        assert!(matches!(
            report.snapshots[1].action,
            StepAction::Rebalanced { .. }
        ));
        assert!(report.snapshots[1].in_range);
        assert!(report.snapshots[1].position_liquidity > 0);
        assert_eq!(report.snapshots[2].action, StepAction::Idle);
        assert_eq!(report.summary.rebalances, 1);
        assert_eq!(report.summary.events.rebalances, 1);
        assert_eq!(keeper.vault().position_range(), report.summary.final_range);
    }

    #[test]
    fn test_zero_step_is_rejected() {
        let mut keeper = keeper();
        keeper.config.step_secs = 0;
        assert!(matches!(
            keeper.run(&[]),
            Err(SimulationError::InvalidParameter(_))
        ));
    }
}
