//! Payment phase of the two-phase mint.

use super::Vault;
use crate::error::VaultError;
use crate::host::Host;
use clmm_vault_domain::pool::MintObligation;
use clmm_vault_domain::token::Address;
use tracing::{debug, warn};

/// Receiver of the pool's payment demand during a mint.
pub trait PoolCallbackSink {
    /// Pays `obligation` to the pool. Only the vault's pool may call this, and
    /// only for the obligation it just handed out.
    fn settle_mint_obligation(
        &mut self,
        caller: &Address,
        obligation: &MintObligation,
    ) -> Result<(), VaultError>;
}

impl<H: Host> PoolCallbackSink for Vault<H> {
    fn settle_mint_obligation(
        &mut self,
        caller: &Address,
        obligation: &MintObligation,
    ) -> Result<(), VaultError> {
        self.transact(|vault| vault.settle_obligation(caller, obligation))
    }
}

impl<H: Host> Vault<H> {
    pub(crate) fn settle_obligation(
        &mut self,
        caller: &Address,
        obligation: &MintObligation,
    ) -> Result<(), VaultError> {
        if *caller != self.pool {
            warn!(caller = %caller, pool = %self.pool, "Rejected mint callback from foreign caller");
            return Err(VaultError::Unauthorized {
                caller: caller.clone(),
                expected: self.pool.clone(),
                action: "mint callback",
            });
        }

        match self.state.pending_obligation.take() {
            Some(pending) if pending == *obligation => {}
            other => {
                self.state.pending_obligation = other;
                return Err(VaultError::UnexpectedCallback);
            }
        }

        let pool = self.pool.clone();
        self.pay(&pool, &obligation.amounts())?;

        debug!(
            obligation = obligation.id,
            amount0 = %obligation.amount0,
            amount1 = %obligation.amount1,
            "Mint obligation settled"
        );
        Ok(())
    }
}
