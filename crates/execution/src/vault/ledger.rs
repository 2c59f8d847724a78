//! Share accounting: deposits, withdrawals and conversions.
//!
//! Share value tracks deployed pool liquidity only. Idle balances and
//! uncollected fees are not counted until a reposition folds them in.

use super::Vault;
use crate::error::VaultError;
use crate::host::Host;
use crate::lifecycle::{DepositData, EventData, RebalanceReason, WithdrawData};
use crate::protocol_fee::skim;
use clmm_vault_domain::U256;
use clmm_vault_domain::error::MathError;
use clmm_vault_domain::fees::TokenPairAmounts;
use clmm_vault_domain::math::Rounding;
use clmm_vault_domain::math::full_math::{mul_div_rounding, to_u128};
use clmm_vault_domain::math::liquidity_math::{get_amounts_for_liquidity, get_liquidity_for_amounts};
use clmm_vault_domain::token::Address;
use tracing::info;

/// Shares owed for `liquidity` given the current supply and deployed liquidity.
/// An empty vault converts 1:1.
pub fn shares_for_liquidity(
    liquidity: U256,
    total_supply: U256,
    total_assets: U256,
    rounding: Rounding,
) -> Result<U256, MathError> {
    if total_supply.is_zero() {
        return Ok(liquidity);
    }
    if total_assets.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    mul_div_rounding(liquidity, total_supply, total_assets, rounding)
}

/// Liquidity represented by `shares`. An empty vault converts 1:1.
pub fn liquidity_for_shares(
    shares: U256,
    total_supply: U256,
    total_assets: U256,
    rounding: Rounding,
) -> Result<U256, MathError> {
    if total_supply.is_zero() {
        return Ok(shares);
    }
    mul_div_rounding(shares, total_assets, total_supply, rounding)
}

/// The fungible-ownership surface of the vault.
pub trait ShareLedger {
    fn total_supply(&self) -> U256;

    fn balance_of(&self, owner: &Address) -> U256;

    fn allowance(&self, owner: &Address, spender: &Address) -> U256;

    /// Liquidity currently deployed in the pool position.
    fn total_liquidity_assets(&self) -> u128;

    /// `floor(liquidity * supply / assets)`, or `liquidity` when no shares exist.
    fn convert_to_shares(&self, liquidity: u128) -> Result<U256, VaultError>;

    /// `floor(shares * assets / supply)`, or `shares` when no shares exist.
    fn convert_to_assets(&self, shares: U256) -> Result<u128, VaultError>;

    fn preview_deposit(&self, liquidity: u128) -> Result<U256, VaultError>;

    /// Shares burned by [`ShareLedger::withdraw`], rounded up.
    fn preview_withdraw(&self, liquidity: u128) -> Result<U256, VaultError>;

    fn preview_redeem(&self, shares: U256) -> Result<u128, VaultError>;

    fn max_withdraw(&self, owner: &Address) -> Result<u128, VaultError>;

    fn max_redeem(&self, owner: &Address) -> U256;

    /// Adds `liquidity` paid for by `caller` and issues shares to `receiver`.
    fn deposit(
        &mut self,
        caller: &Address,
        liquidity: u128,
        receiver: &Address,
    ) -> Result<U256, VaultError>;

    /// Deposits a single pool token, swapping to the position's ratio first.
    fn deposit_token(
        &mut self,
        caller: &Address,
        token: &Address,
        amount: U256,
        receiver: &Address,
    ) -> Result<U256, VaultError>;

    /// Removes `liquidity` on behalf of `owner`; returns the shares burned.
    fn withdraw(
        &mut self,
        caller: &Address,
        liquidity: u128,
        receiver: &Address,
        owner: &Address,
    ) -> Result<U256, VaultError>;

    /// Burns `shares` of `owner`; returns the liquidity removed.
    fn redeem(
        &mut self,
        caller: &Address,
        shares: U256,
        receiver: &Address,
        owner: &Address,
    ) -> Result<u128, VaultError>;

    fn transfer(&mut self, caller: &Address, to: &Address, shares: U256) -> Result<(), VaultError>;

    fn approve(
        &mut self,
        caller: &Address,
        spender: &Address,
        shares: U256,
    ) -> Result<(), VaultError>;

    fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        shares: U256,
    ) -> Result<(), VaultError>;
}

impl<H: Host> ShareLedger for Vault<H> {
    fn total_supply(&self) -> U256 {
        self.state.shares.total_supply()
    }

    fn balance_of(&self, owner: &Address) -> U256 {
        self.state.shares.balance_of(owner)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.state.shares.allowance(owner, spender)
    }

    fn total_liquidity_assets(&self) -> u128 {
        self.position_liquidity()
    }

    fn convert_to_shares(&self, liquidity: u128) -> Result<U256, VaultError> {
        Ok(shares_for_liquidity(
            U256::from(liquidity),
            self.total_supply(),
            U256::from(self.total_liquidity_assets()),
            Rounding::Down,
        )?)
    }

    fn convert_to_assets(&self, shares: U256) -> Result<u128, VaultError> {
        let liquidity = liquidity_for_shares(
            shares,
            self.total_supply(),
            U256::from(self.total_liquidity_assets()),
            Rounding::Down,
        )?;
        Ok(to_u128(liquidity)?)
    }

    fn preview_deposit(&self, liquidity: u128) -> Result<U256, VaultError> {
        self.convert_to_shares(liquidity)
    }

    fn preview_withdraw(&self, liquidity: u128) -> Result<U256, VaultError> {
        Ok(shares_for_liquidity(
            U256::from(liquidity),
            self.total_supply(),
            U256::from(self.total_liquidity_assets()),
            Rounding::Up,
        )?)
    }

    fn preview_redeem(&self, shares: U256) -> Result<u128, VaultError> {
        self.convert_to_assets(shares)
    }

    fn max_withdraw(&self, owner: &Address) -> Result<u128, VaultError> {
        self.convert_to_assets(self.balance_of(owner))
    }

    fn max_redeem(&self, owner: &Address) -> U256 {
        self.balance_of(owner)
    }

    fn deposit(
        &mut self,
        caller: &Address,
        liquidity: u128,
        receiver: &Address,
    ) -> Result<U256, VaultError> {
        self.transact(|vault| {
            if liquidity == 0 {
                return Err(VaultError::invalid("deposit liquidity must be non-zero"));
            }
            // priced against the pre-deposit state
            let shares = vault.convert_to_shares(liquidity)?;
            if shares.is_zero() {
                return Err(VaultError::invalid("deposit too small to mint a share"));
            }

            vault.rebalance_to_current_price(RebalanceReason::Deposit)?;

            let (sqrt_lower, sqrt_upper) = vault.state.range.sqrt_ratios()?;
            let (amount0, amount1) = get_amounts_for_liquidity(
                vault.host.slot0().sqrt_price_x96,
                sqrt_lower,
                sqrt_upper,
                liquidity,
                Rounding::Up,
            )?;
            let pulled = TokenPairAmounts::new(amount0, amount1);
            vault.pull(caller, &pulled)?;

            let (minted, paid) = vault.mint_liquidity(liquidity)?;
            let dust = TokenPairAmounts::new(
                pulled.amount0.saturating_sub(paid.amount0),
                pulled.amount1.saturating_sub(paid.amount1),
            );
            vault.pay(caller, &dust)?;

            vault.state.shares.mint(receiver, shares)?;

            info!(
                caller = %caller,
                receiver = %receiver,
                liquidity = minted,
                shares = %shares,
                amount0 = %paid.amount0,
                amount1 = %paid.amount1,
                "Deposit"
            );
            vault.record(EventData::Deposit(DepositData {
                caller: caller.clone(),
                receiver: receiver.clone(),
                liquidity: minted,
                shares,
                amounts: paid,
            }));
            Ok(shares)
        })
    }

    fn deposit_token(
        &mut self,
        caller: &Address,
        token: &Address,
        amount: U256,
        receiver: &Address,
    ) -> Result<U256, VaultError> {
        self.transact(|vault| {
            let index = vault
                .tokens
                .index_of(token)
                .ok_or_else(|| VaultError::UnsupportedToken(token.clone()))?;
            if amount.is_zero() {
                return Err(VaultError::invalid("deposit amount must be non-zero"));
            }

            vault.rebalance_to_current_price(RebalanceReason::Deposit)?;

            let total_supply = vault.total_supply();
            let total_assets = U256::from(vault.total_liquidity_assets());

            let deposited = if index == 0 {
                TokenPairAmounts::new(amount, U256::zero())
            } else {
                TokenPairAmounts::new(U256::zero(), amount)
            };
            vault.pull(caller, &deposited)?;

            let amounts = match vault.swap_to_ratio(&deposited)? {
                Some(swap) => swap.balances_after(&deposited)?,
                None => deposited,
            };

            let (sqrt_lower, sqrt_upper) = vault.state.range.sqrt_ratios()?;
            let liquidity = get_liquidity_for_amounts(
                vault.host.slot0().sqrt_price_x96,
                sqrt_lower,
                sqrt_upper,
                amounts.amount0,
                amounts.amount1,
            )?;
            if liquidity == 0 {
                return Err(VaultError::invalid("deposit too small to add liquidity"));
            }

            let (minted, paid) = vault.mint_liquidity(liquidity)?;
            let shares = shares_for_liquidity(
                U256::from(minted),
                total_supply,
                total_assets,
                Rounding::Down,
            )?;
            if shares.is_zero() {
                return Err(VaultError::invalid("deposit too small to mint a share"));
            }
            vault.state.shares.mint(receiver, shares)?;

            info!(
                caller = %caller,
                receiver = %receiver,
                token = %token,
                amount = %amount,
                liquidity = minted,
                shares = %shares,
                "Token deposit"
            );
            vault.record(EventData::Deposit(DepositData {
                caller: caller.clone(),
                receiver: receiver.clone(),
                liquidity: minted,
                shares,
                amounts: paid,
            }));
            Ok(shares)
        })
    }

    fn withdraw(
        &mut self,
        caller: &Address,
        liquidity: u128,
        receiver: &Address,
        owner: &Address,
    ) -> Result<U256, VaultError> {
        self.transact(|vault| {
            if liquidity == 0 {
                return Err(VaultError::invalid("withdraw liquidity must be non-zero"));
            }
            let shares = vault.preview_withdraw(liquidity)?;
            vault.exit(caller, receiver, owner, shares, liquidity)?;
            Ok(shares)
        })
    }

    fn redeem(
        &mut self,
        caller: &Address,
        shares: U256,
        receiver: &Address,
        owner: &Address,
    ) -> Result<u128, VaultError> {
        self.transact(|vault| {
            if shares.is_zero() {
                return Err(VaultError::invalid("redeemed shares must be non-zero"));
            }
            let liquidity = vault.preview_redeem(shares)?;
            if liquidity == 0 {
                return Err(VaultError::invalid("shares redeem for zero liquidity"));
            }
            vault.exit(caller, receiver, owner, shares, liquidity)?;
            Ok(liquidity)
        })
    }

    fn transfer(&mut self, caller: &Address, to: &Address, shares: U256) -> Result<(), VaultError> {
        self.transact(|vault| vault.state.shares.transfer(caller, to, shares))
    }

    fn approve(
        &mut self,
        caller: &Address,
        spender: &Address,
        shares: U256,
    ) -> Result<(), VaultError> {
        self.state.shares.approve(caller, spender, shares);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        shares: U256,
    ) -> Result<(), VaultError> {
        self.transact(|vault| {
            vault.state.shares.spend_allowance(from, caller, shares)?;
            vault.state.shares.transfer(from, to, shares)
        })
    }
}

impl<H: Host> Vault<H> {
    /// Burns `shares` of `owner`, removes `liquidity` plus the matching share of
    /// uncollected fees, retains the protocol cut and pays `receiver`.
    fn exit(
        &mut self,
        caller: &Address,
        receiver: &Address,
        owner: &Address,
        shares: U256,
        liquidity: u128,
    ) -> Result<(), VaultError> {
        if caller != owner {
            self.state.shares.spend_allowance(owner, caller, shares)?;
        }

        let total_before = self.state.shares.total_supply();
        let pending = self.pending_fees()?;
        self.state.shares.burn(owner, shares)?;
        let fee_share = pending.scale(shares, total_before)?;

        let burned = self.burn_liquidity(liquidity)?;
        let collected = self.collect_owed(burned.checked_add(&fee_share)?)?;

        let (payout, cut) = skim(&collected, self.config.protocol_fee()?)?;
        self.state.protocol_accrual = self.state.protocol_accrual.checked_add(&cut)?;
        self.pay(receiver, &payout)?;

        info!(
            caller = %caller,
            owner = %owner,
            receiver = %receiver,
            liquidity,
            shares = %shares,
            paid0 = %payout.amount0,
            paid1 = %payout.amount1,
            "Withdrawal"
        );
        self.record(EventData::Withdraw(WithdrawData {
            caller: caller.clone(),
            receiver: receiver.clone(),
            owner: owner.clone(),
            liquidity,
            shares,
            paid: payout,
            protocol_cut: cut,
        }));

        self.rebalance_to_current_price(RebalanceReason::Withdrawal)?;
        Ok(())
    }
}
