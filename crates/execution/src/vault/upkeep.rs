//! Automation trigger surface.

use super::Vault;
use crate::error::VaultError;
use crate::host::Host;
use crate::lifecycle::RebalanceReason;
use crate::strategy::RebalanceOutcome;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Result of the read-only actionability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpkeepCheck {
    pub upkeep_needed: bool,
    /// Opaque payload to hand back to `perform_upkeep`: the tick observed now.
    pub perform_data: Vec<u8>,
}

/// Encodes an observed tick as a 4-byte big-endian payload.
pub fn encode_perform_data(tick: i32) -> Vec<u8> {
    tick.to_be_bytes().to_vec()
}

pub fn decode_perform_data(data: &[u8]) -> Result<i32, VaultError> {
    let bytes: [u8; 4] = data.try_into().map_err(|_| {
        VaultError::InvalidArgument(format!(
            "perform data must be 4 bytes, got {}",
            data.len()
        ))
    })?;
    Ok(i32::from_be_bytes(bytes))
}

/// The check/perform pair polled by an external keeper.
pub trait TriggerSource {
    /// Whether a rebalance is actionable now. Never mutates anything.
    fn check_upkeep(&self) -> UpkeepCheck;

    /// Re-validates staleness, interval and need, then rebalances.
    fn perform_upkeep(&mut self, perform_data: &[u8]) -> Result<RebalanceOutcome, VaultError>;
}

impl<H: Host> TriggerSource for Vault<H> {
    fn check_upkeep(&self) -> UpkeepCheck {
        let tick = self.host.slot0().tick;
        let upkeep_needed = self.interval_elapsed(self.host.now()) && !self.state.range.contains(tick);
        UpkeepCheck {
            upkeep_needed,
            perform_data: encode_perform_data(tick),
        }
    }

    fn perform_upkeep(&mut self, perform_data: &[u8]) -> Result<RebalanceOutcome, VaultError> {
        self.transact(|vault| {
            let observed = decode_perform_data(perform_data)?;
            let live = vault.host.slot0().tick;

            let deviation = observed.abs_diff(live);
            if deviation > vault.config.max_tick_deviation {
                warn!(observed, live, deviation, "Stale upkeep payload rejected");
                return Err(VaultError::StaleTick {
                    observed,
                    live,
                    max_deviation: vault.config.max_tick_deviation,
                });
            }

            let now = vault.host.now();
            if !vault.interval_elapsed(now) {
                return Err(VaultError::IntervalNotElapsed {
                    now,
                    not_before: vault.next_rebalance_time(),
                });
            }

            if vault.state.range.contains(live) {
                return Err(VaultError::TickInRange {
                    tick: live,
                    range: vault.state.range,
                });
            }

            debug!(observed, live, range = %vault.state.range, "Upkeep accepted");
            vault.rebalance_to_current_price(RebalanceReason::RangeExit)
        })
    }
}

impl<H: Host> Vault<H> {
    /// Earliest time after which an upkeep rebalance may run (exclusive).
    pub fn next_rebalance_time(&self) -> u64 {
        self.state
            .last_rebalance_time
            .saturating_add(self.config.min_rebalance_interval_secs)
    }

    fn interval_elapsed(&self, now: u64) -> bool {
        now > self.next_rebalance_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_perform_data_round_trip() {
        for tick in [0, -1, 887_272, -887_272, 2000] {
            assert_eq!(decode_perform_data(&encode_perform_data(tick)).unwrap(), tick);
        }
    }

    #[test]
    fn test_malformed_perform_data() {
        let err = decode_perform_data(&[1, 2, 3]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(decode_perform_data(&[]).is_err());
    }
}
