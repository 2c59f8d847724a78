//! Protocol cut of withdrawal proceeds.

use crate::error::VaultError;
use crate::host::Host;
use crate::lifecycle::{EventData, ProtocolFeeData};
use crate::vault::{ShareLedger, Vault};
use clmm_vault_domain::error::MathError;
use clmm_vault_domain::fees::TokenPairAmounts;
use clmm_vault_domain::value_objects::Percentage;
use tracing::info;

/// Splits withdrawal proceeds into `(payout, protocol_cut)`; the cut rounds down.
pub fn skim(
    proceeds: &TokenPairAmounts,
    fee: Percentage,
) -> Result<(TokenPairAmounts, TokenPairAmounts), MathError> {
    let cut = TokenPairAmounts::new(fee.of(proceeds.amount0)?, fee.of(proceeds.amount1)?);
    let payout = proceeds.checked_sub(&cut)?;
    Ok((payout, cut))
}

impl<H: Host> Vault<H> {
    /// Pays the protocol accrual to the configured protocol address.
    ///
    /// When no shares are outstanding the position has no claimant: it is torn
    /// down first and both token balances are swept in full.
    ///
    /// Any caller may trigger this. Funds only ever move to the fixed
    /// `protocol_address`, but there is no access control on the call itself.
    pub fn collect_protocol_fees(&mut self) -> Result<TokenPairAmounts, VaultError> {
        self.transact(|vault| {
            let recipient = vault.config.protocol_address.clone();
            let position_closed = vault.total_supply().is_zero();

            let amounts = if position_closed {
                vault.remove_all_liquidity()?;
                vault.idle_balances()
            } else {
                vault.state.protocol_accrual
            };

            vault.pay(&recipient, &amounts)?;
            vault.state.protocol_accrual = TokenPairAmounts::zero();

            info!(
                recipient = %recipient,
                amount0 = %amounts.amount0,
                amount1 = %amounts.amount1,
                position_closed,
                "Protocol fees collected"
            );
            vault.record(EventData::ProtocolFees(ProtocolFeeData {
                recipient,
                amounts,
                position_closed,
            }));
            Ok(amounts)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clmm_vault_domain::U256;

    #[test]
    fn test_skim_half_percent() {
        let proceeds = TokenPairAmounts::new(U256::from(1_000_000u64), U256::from(399u64));
        let (payout, cut) = skim(&proceeds, Percentage::from_bps(50).unwrap()).unwrap();
        assert_eq!(cut, TokenPairAmounts::new(U256::from(5_000u64), U256::from(1u64)));
        assert_eq!(payout, TokenPairAmounts::new(U256::from(995_000u64), U256::from(398u64)));
        assert_eq!(payout.checked_add(&cut).unwrap(), proceeds);
    }

    #[test]
    fn test_skim_zero_fee() {
        let proceeds = TokenPairAmounts::new(U256::from(7u64), U256::from(9u64));
        let (payout, cut) = skim(&proceeds, Percentage::zero()).unwrap();
        assert_eq!(payout, proceeds);
        assert!(cut.is_zero());
    }
}
