//! Vault configuration.

use crate::error::VaultError;
use clmm_vault_domain::tick_range::{HALF_WIDTH_SCALE, validate_half_width};
use clmm_vault_domain::token::Address;
use clmm_vault_domain::value_objects::{BPS_SCALE, Percentage};
use serde::{Deserialize, Serialize};

/// Construction-time parameters. Immutable once the vault exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Half width of the band in thousandths of the sqrt price (50 = 5%).
    pub rebalance_width_bps: u32,
    /// Minimum seconds between upkeep-triggered rebalances.
    pub min_rebalance_interval_secs: u64,
    /// Maximum distance between the observed and the live tick at execution.
    pub max_tick_deviation: u32,
    /// Protocol cut of withdrawal proceeds in basis points.
    pub protocol_fee_bps: u32,
    /// Fixed destination of protocol fee collection.
    pub protocol_address: Address,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            rebalance_width_bps: 50,
            min_rebalance_interval_secs: 3600,
            max_tick_deviation: 60,
            protocol_fee_bps: 50,
            protocol_address: Address::new("protocol"),
        }
    }
}

impl VaultConfig {
    /// Checks the pool-independent constraints.
    pub fn validate(&self) -> Result<(), VaultError> {
        validate_half_width(self.rebalance_width_bps).map_err(|_| {
            VaultError::InvalidConfig(format!(
                "rebalance_width_bps must be in (0, {HALF_WIDTH_SCALE}), got {}",
                self.rebalance_width_bps
            ))
        })?;
        if self.protocol_fee_bps >= BPS_SCALE {
            return Err(VaultError::InvalidConfig(format!(
                "protocol_fee_bps must be below {BPS_SCALE}, got {}",
                self.protocol_fee_bps
            )));
        }
        if self.protocol_address.as_str().is_empty() {
            return Err(VaultError::InvalidConfig(
                "protocol_address must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn protocol_fee(&self) -> Result<Percentage, VaultError> {
        Percentage::from_bps(self.protocol_fee_bps)
            .map_err(|e| VaultError::InvalidConfig(e.to_string()))
    }

    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, VaultError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| VaultError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
