//! Fungible share ledger.

use crate::error::VaultError;
use clmm_vault_domain::U256;
use clmm_vault_domain::token::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Share balances and allowances. The sum of balances always equals `total_supply`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareBalances {
    balances: HashMap<Address, U256>,
    allowances: HashMap<Address, HashMap<Address, U256>>,
    total_supply: U256,
}

impl ShareBalances {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn balance_of(&self, owner: &Address) -> U256 {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn mint(&mut self, to: &Address, shares: U256) -> Result<(), VaultError> {
        self.total_supply = self
            .total_supply
            .checked_add(shares)
            .ok_or(clmm_vault_domain::error::MathError::Overflow)?;
        let balance = self.balances.entry(to.clone()).or_default();
        *balance += shares;
        if balance.is_zero() {
            self.balances.remove(to);
        }
        Ok(())
    }

    pub fn burn(&mut self, from: &Address, shares: U256) -> Result<(), VaultError> {
        let available = self.balance_of(from);
        if available < shares {
            return Err(VaultError::InsufficientShares {
                owner: from.clone(),
                available,
                required: shares,
            });
        }
        self.set_balance(from, available - shares);
        self.total_supply -= shares;
        Ok(())
    }

    pub fn transfer(&mut self, from: &Address, to: &Address, shares: U256) -> Result<(), VaultError> {
        let available = self.balance_of(from);
        if available < shares {
            return Err(VaultError::InsufficientShares {
                owner: from.clone(),
                available,
                required: shares,
            });
        }
        self.set_balance(from, available - shares);
        let received = self.balance_of(to) + shares;
        self.set_balance(to, received);
        Ok(())
    }

    pub fn approve(&mut self, owner: &Address, spender: &Address, shares: U256) {
        let spenders = self.allowances.entry(owner.clone()).or_default();
        if shares.is_zero() {
            spenders.remove(spender);
        } else {
            spenders.insert(spender.clone(), shares);
        }
        if spenders.is_empty() {
            self.allowances.remove(owner);
        }
    }

    /// Consumes exactly `shares` of `spender`'s allowance over `owner`.
    /// An unlimited (`U256::MAX`) allowance is not consumed.
    pub fn spend_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        shares: U256,
    ) -> Result<(), VaultError> {
        let allowed = self.allowance(owner, spender);
        if allowed == U256::MAX {
            return Ok(());
        }
        if allowed < shares {
            return Err(VaultError::InsufficientAllowance {
                owner: owner.clone(),
                spender: spender.clone(),
                allowed,
                required: shares,
            });
        }
        self.approve(owner, spender, allowed - shares);
        Ok(())
    }

    fn set_balance(&mut self, owner: &Address, balance: U256) {
        if balance.is_zero() {
            self.balances.remove(owner);
        } else {
            self.balances.insert(owner.clone(), balance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    #[test]
    fn test_mint_burn_keeps_supply_in_sync() {
        let alice = Address::new("alice");
        let bob = Address::new("bob");
        let mut ledger = ShareBalances::new();

        ledger.mint(&alice, u(1000)).unwrap();
        ledger.mint(&bob, u(500)).unwrap();
        ledger.burn(&alice, u(400)).unwrap();

        assert_eq!(ledger.balance_of(&alice), u(600));
        assert_eq!(ledger.total_supply(), u(1100));
        assert_eq!(ledger.balance_of(&bob), u(500));

        ledger.burn(&bob, u(500)).unwrap();
        assert_eq!(ledger.balance_of(&bob), U256::zero());
        assert_eq!(ledger.total_supply(), u(600));

        let err = ledger.burn(&alice, u(601)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_transfer() {
        let alice = Address::new("alice");
        let bob = Address::new("bob");
        let mut ledger = ShareBalances::new();
        ledger.mint(&alice, u(100)).unwrap();

        ledger.transfer(&alice, &bob, u(30)).unwrap();
        assert_eq!(ledger.balance_of(&alice), u(70));
        assert_eq!(ledger.balance_of(&bob), u(30));
        assert_eq!(ledger.total_supply(), u(100));
        assert!(ledger.transfer(&bob, &alice, u(31)).is_err());
    }

    #[test]
    fn test_allowance_is_spent_exactly() {
        let alice = Address::new("alice");
        let bob = Address::new("bob");
        let mut ledger = ShareBalances::new();

        ledger.approve(&alice, &bob, u(50));
        ledger.spend_allowance(&alice, &bob, u(20)).unwrap();
        assert_eq!(ledger.allowance(&alice, &bob), u(30));

        let err = ledger.spend_allowance(&alice, &bob, u(31)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);

        ledger.spend_allowance(&alice, &bob, u(30)).unwrap();
        assert_eq!(ledger.allowance(&alice, &bob), U256::zero());
    }

    #[test]
    fn test_unlimited_allowance() {
        let alice = Address::new("alice");
        let bob = Address::new("bob");
        let mut ledger = ShareBalances::new();
        ledger.approve(&alice, &bob, U256::MAX);
        ledger.spend_allowance(&alice, &bob, u(1_000_000)).unwrap();
        assert_eq!(ledger.allowance(&alice, &bob), U256::MAX);
    }
}
