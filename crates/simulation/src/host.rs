//! In-memory pool, token ledger, swap venue and clock.
//!
//! The pool follows range-order semantics: initialized ticks carry fee growth
//! outside counters that flip when crossed, positions accrue owed fees when
//! touched, and swaps walk from tick to tick with constant liquidity between them.
//! A full-range background position provides depth at every price.

use clmm_vault_domain::U256;
use clmm_vault_domain::error::MathError;
use clmm_vault_domain::fees::{TokenPairAmounts, fee_growth_inside_pair};
use clmm_vault_domain::math::Rounding;
use clmm_vault_domain::math::full_math::{Q128, mul_div};
use clmm_vault_domain::math::liquidity_math::get_amounts_for_liquidity;
use clmm_vault_domain::math::swap_math::compute_swap_step;
use clmm_vault_domain::math::tick_math::{
    MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, get_sqrt_ratio_at_tick,
    get_tick_at_sqrt_ratio, max_usable_tick, min_usable_tick,
};
use clmm_vault_domain::pool::{
    MintObligation, PoolParams, PositionInfo, PositionKey, Slot0, TickInfo,
};
use clmm_vault_domain::tick_range::TickRange;
use clmm_vault_domain::token::{Address, Token, TokenPair};
use clmm_vault_execution::host::{
    Checkpoint, Clock, ExactInputSingleParams, HostError, Pool, Quoter, SwapVenue, TokenLedger,
};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

/// Account used to move the price and to quote.
const TRADER: &str = "trader";
/// Owner of the background full-range position.
const BACKGROUND_LP: &str = "background-lp";

/// Parameters of a simulated pool.
#[derive(Debug, Clone)]
pub struct PoolSetup {
    pub pool: Address,
    pub tokens: TokenPair,
    pub tick_spacing: i32,
    /// Swap fee in hundredths of a bip.
    pub fee_pips: u32,
    pub initial_tick: i32,
    /// Liquidity of the full-range background position.
    pub background_liquidity: u128,
    /// Clock start, seconds.
    pub start_time: u64,
}

impl Default for PoolSetup {
    fn default() -> Self {
        Self {
            pool: Address::new("pool"),
            tokens: TokenPair::new(
                Token::new("token0", "TK0", 18),
                Token::new("token1", "TK1", 18),
            ),
            tick_spacing: 60,
            fee_pips: 3000,
            initial_tick: 0,
            background_liquidity: 1_000_000_000_000_000_000,
            start_time: 1_700_000_000,
        }
    }
}

impl PoolSetup {
    /// Sets the tick spacing.
    #[must_use]
    pub fn with_tick_spacing(mut self, tick_spacing: i32) -> Self {
        self.tick_spacing = tick_spacing;
        self
    }

    /// Sets the swap fee.
    #[must_use]
    pub fn with_fee_pips(mut self, fee_pips: u32) -> Self {
        self.fee_pips = fee_pips;
        self
    }

    /// Sets the starting tick.
    #[must_use]
    pub fn with_initial_tick(mut self, tick: i32) -> Self {
        self.initial_tick = tick;
        self
    }

    /// Sets the background liquidity; zero leaves the vault alone in the pool.
    #[must_use]
    pub fn with_background_liquidity(mut self, liquidity: u128) -> Self {
        self.background_liquidity = liquidity;
        self
    }

    /// Sets the clock start.
    #[must_use]
    pub fn with_start_time(mut self, start_time: u64) -> Self {
        self.start_time = start_time;
        self
    }
}

#[derive(Debug, Clone)]
struct PendingMint {
    obligation: MintObligation,
    balances_before: TokenPairAmounts,
}

/// Outcome of a simulated swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapResult {
    /// Input consumed, fee included.
    pub amount_in: U256,
    pub amount_out: U256,
    /// Ticks crossed on the way.
    pub ticks_crossed: u32,
}

/// Deterministic in-memory implementation of every vault collaborator.
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    pool: Address,
    tokens: TokenPair,
    params: PoolParams,
    sqrt_price_x96: U256,
    tick: i32,
    /// Liquidity active at the current price.
    liquidity: u128,
    fee_growth_global: TokenPairAmounts,
    ticks: BTreeMap<i32, TickInfo>,
    positions: HashMap<PositionKey, PositionInfo>,
    balances: HashMap<(Address, Address), U256>,
    pending_mints: HashMap<u64, PendingMint>,
    next_obligation_id: u64,
    now: u64,
    mint_credit_disabled: bool,
}

impl SimulatedHost {
    /// Creates a pool at `setup.initial_tick` and seeds the background position.
    pub fn new(setup: PoolSetup) -> Result<Self, HostError> {
        if setup.tick_spacing <= 0 {
            return Err(MathError::InvalidTickSpacing(setup.tick_spacing).into());
        }
        let sqrt_price_x96 = get_sqrt_ratio_at_tick(setup.initial_tick)?;

        let mut host = Self {
            pool: setup.pool,
            tokens: setup.tokens,
            params: PoolParams {
                tick_spacing: setup.tick_spacing,
                fee_pips: setup.fee_pips,
            },
            sqrt_price_x96,
            tick: setup.initial_tick,
            liquidity: 0,
            fee_growth_global: TokenPairAmounts::zero(),
            ticks: BTreeMap::new(),
            positions: HashMap::new(),
            balances: HashMap::new(),
            pending_mints: HashMap::new(),
            next_obligation_id: 1,
            now: setup.start_time,
            mint_credit_disabled: false,
        };

        if setup.background_liquidity > 0 {
            let range = TickRange::new(
                min_usable_tick(setup.tick_spacing)?,
                max_usable_tick(setup.tick_spacing)?,
            )?;
            host.mint_direct(&Address::new(BACKGROUND_LP), range, setup.background_liquidity)?;
        }

        debug!(
            pool = %host.pool,
            tick = host.tick,
            background_liquidity = setup.background_liquidity,
            "Simulated pool created"
        );
        Ok(host)
    }

    /// Mints tokens out of thin air.
    pub fn fund(&mut self, token: &Address, owner: &Address, amount: U256) {
        let balance = self
            .balances
            .entry((token.clone(), owner.clone()))
            .or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Moves the clock forward.
    pub fn advance(&mut self, secs: u64) {
        self.now = self.now.saturating_add(secs);
    }

    /// Active liquidity at the current price.
    pub fn active_liquidity(&self) -> u128 {
        self.liquidity
    }

    /// Makes `complete_mint` accept payment but credit nothing, to exercise
    /// the shortfall path of callers.
    pub fn disable_mint_credit(&mut self, disabled: bool) {
        self.mint_credit_disabled = disabled;
    }

    /// Moves the price to `tick` by trading against the pool, accruing swap
    /// fees to in-range positions on the way.
    pub fn move_to_tick(&mut self, tick: i32) -> Result<SwapResult, HostError> {
        let target = get_sqrt_ratio_at_tick(tick.clamp(MIN_TICK + 1, MAX_TICK - 1))?;
        if target == self.sqrt_price_x96 {
            return Ok(SwapResult {
                amount_in: U256::zero(),
                amount_out: U256::zero(),
                ticks_crossed: 0,
            });
        }
        let zero_for_one = target < self.sqrt_price_x96;
        let trader = Address::new(TRADER);
        let budget = U256::from(u128::MAX);
        let token_in = if zero_for_one {
            self.tokens.token0.address.clone()
        } else {
            self.tokens.token1.address.clone()
        };
        self.fund(&token_in, &trader, budget);
        let result = self.swap(&trader, &trader, zero_for_one, budget, target)?;
        debug!(tick = self.tick, crossed = result.ticks_crossed, "Price moved");
        Ok(result)
    }

    /// Credits swap fees to the liquidity active at the current price, as if
    /// trading volume had paid them.
    pub fn donate_fees(&mut self, amount0: U256, amount1: U256) -> Result<(), HostError> {
        if self.liquidity == 0 {
            return Err(HostError::NoLiquidity);
        }
        let pool = self.pool.clone();
        let (token0, token1) = (
            self.tokens.token0.address.clone(),
            self.tokens.token1.address.clone(),
        );
        self.fund(&token0, &pool, amount0);
        self.fund(&token1, &pool, amount1);
        self.fee_growth_global.amount0 = self
            .fee_growth_global
            .amount0
            .overflowing_add(mul_div(amount0, Q128, U256::from(self.liquidity))?)
            .0;
        self.fee_growth_global.amount1 = self
            .fee_growth_global
            .amount1
            .overflowing_add(mul_div(amount1, Q128, U256::from(self.liquidity))?)
            .0;
        trace!(amount0 = %amount0, amount1 = %amount1, "Fees donated");
        Ok(())
    }

    /// Exact-input swap of `amount_in` up to `sqrt_price_limit_x96`.
    pub fn swap(
        &mut self,
        payer: &Address,
        recipient: &Address,
        zero_for_one: bool,
        amount_in: U256,
        sqrt_price_limit_x96: U256,
    ) -> Result<SwapResult, HostError> {
        let limit = if sqrt_price_limit_x96.is_zero() {
            if zero_for_one {
                MIN_SQRT_RATIO + U256::one()
            } else {
                MAX_SQRT_RATIO - U256::one()
            }
        } else {
            sqrt_price_limit_x96
        };
        if (zero_for_one && limit > self.sqrt_price_x96)
            || (!zero_for_one && limit < self.sqrt_price_x96)
        {
            return Err(HostError::Rejected("price limit on the wrong side".to_string()));
        }

        let mut remaining = amount_in;
        let mut amount_out = U256::zero();
        let mut ticks_crossed = 0;

        while !remaining.is_zero() && self.sqrt_price_x96 != limit {
            let next_tick = if zero_for_one {
                self.ticks.range(..=self.tick).next_back().map(|(t, _)| *t)
            } else {
                self.ticks.range(self.tick + 1..).next().map(|(t, _)| *t)
            };
            let bound_tick = next_tick.unwrap_or(if zero_for_one { MIN_TICK } else { MAX_TICK });
            let sqrt_next = get_sqrt_ratio_at_tick(bound_tick)?;
            let target = if zero_for_one {
                sqrt_next.max(limit)
            } else {
                sqrt_next.min(limit)
            };

            let step = compute_swap_step(
                self.sqrt_price_x96,
                target,
                self.liquidity,
                remaining,
                self.params.fee_pips,
            )?;
            remaining = remaining.saturating_sub(step.amount_in + step.fee_amount);
            amount_out += step.amount_out;

            if self.liquidity > 0 {
                let growth = mul_div(step.fee_amount, Q128, U256::from(self.liquidity))?;
                if zero_for_one {
                    self.fee_growth_global.amount0 =
                        self.fee_growth_global.amount0.overflowing_add(growth).0;
                } else {
                    self.fee_growth_global.amount1 =
                        self.fee_growth_global.amount1.overflowing_add(growth).0;
                }
            }

            self.sqrt_price_x96 = step.sqrt_price_next_x96;
            match next_tick {
                Some(tick) if self.sqrt_price_x96 == sqrt_next => {
                    self.cross_tick(tick, zero_for_one);
                    ticks_crossed += 1;
                    self.tick = if zero_for_one { tick - 1 } else { tick };
                }
                _ => {
                    self.tick = get_tick_at_sqrt_ratio(self.sqrt_price_x96)?;
                }
            }
        }

        let consumed = amount_in - remaining;
        let (token_in, token_out) = if zero_for_one {
            (self.tokens.token0.address.clone(), self.tokens.token1.address.clone())
        } else {
            (self.tokens.token1.address.clone(), self.tokens.token0.address.clone())
        };
        let pool = self.pool.clone();
        self.move_tokens(&token_in, payer, &pool, consumed)?;
        self.move_tokens(&token_out, &pool, recipient, amount_out)?;

        Ok(SwapResult {
            amount_in: consumed,
            amount_out,
            ticks_crossed,
        })
    }

    fn cross_tick(&mut self, tick: i32, zero_for_one: bool) {
        let global = self.fee_growth_global;
        if let Some(info) = self.ticks.get_mut(&tick) {
            info.fee_growth_outside0_x128 = global
                .amount0
                .overflowing_sub(info.fee_growth_outside0_x128)
                .0;
            info.fee_growth_outside1_x128 = global
                .amount1
                .overflowing_sub(info.fee_growth_outside1_x128)
                .0;
            // moving down the net liquidity is removed, moving up it is added
            let net = if zero_for_one {
                -info.liquidity_net
            } else {
                info.liquidity_net
            };
            self.liquidity = self.liquidity.saturating_add_signed(net);
        }
    }

    fn update_tick(&mut self, tick: i32, delta: i128, upper: bool) {
        let current_tick = self.tick;
        let global = self.fee_growth_global;
        let info = self.ticks.entry(tick).or_default();
        if !info.initialized && delta > 0 {
            // growth below the tick is assumed to have happened below it
            if tick <= current_tick {
                info.fee_growth_outside0_x128 = global.amount0;
                info.fee_growth_outside1_x128 = global.amount1;
            }
            info.initialized = true;
        }
        info.liquidity_gross = info.liquidity_gross.saturating_add_signed(delta);
        info.liquidity_net = if upper {
            info.liquidity_net - delta
        } else {
            info.liquidity_net + delta
        };
    }

    fn clear_empty_ticks(&mut self, range: &TickRange) {
        for tick in [range.lower, range.upper] {
            if self
                .ticks
                .get(&tick)
                .is_some_and(|info| info.liquidity_gross == 0)
            {
                self.ticks.remove(&tick);
            }
        }
    }

    /// Applies a liquidity change to a position: ticks first, then owed fees.
    fn modify_position(&mut self, key: &PositionKey, delta: i128) -> Result<(), HostError> {
        let range = key.range;
        if delta != 0 {
            self.update_tick(range.lower, delta, false);
            self.update_tick(range.upper, delta, true);
            if range.contains(self.tick) {
                self.liquidity = self.liquidity.saturating_add_signed(delta);
            }
        }

        let inside = fee_growth_inside_pair(&range, &self.fee_growth_snapshot(&range));
        let position = self.positions.entry(key.clone()).or_default();
        if position.liquidity > 0 {
            let liquidity = U256::from(position.liquidity);
            let owed0 = mul_div(
                liquidity,
                inside
                    .amount0
                    .overflowing_sub(position.fee_growth_inside0_last_x128)
                    .0,
                Q128,
            )?;
            let owed1 = mul_div(
                liquidity,
                inside
                    .amount1
                    .overflowing_sub(position.fee_growth_inside1_last_x128)
                    .0,
                Q128,
            )?;
            position.tokens_owed0 = position.tokens_owed0.saturating_add(owed0);
            position.tokens_owed1 = position.tokens_owed1.saturating_add(owed1);
        }
        position.fee_growth_inside0_last_x128 = inside.amount0;
        position.fee_growth_inside1_last_x128 = inside.amount1;
        position.liquidity = position.liquidity.saturating_add_signed(delta);

        if delta < 0 {
            self.clear_empty_ticks(&range);
        }
        Ok(())
    }

    /// Mints without the payment round trip, for seeding the pool.
    fn mint_direct(
        &mut self,
        owner: &Address,
        range: TickRange,
        liquidity: u128,
    ) -> Result<(), HostError> {
        let amounts = self.amounts_for(range, liquidity, Rounding::Up)?;
        let (token0, token1) = (
            self.tokens.token0.address.clone(),
            self.tokens.token1.address.clone(),
        );
        let pool = self.pool.clone();
        self.fund(&token0, owner, amounts.amount0);
        self.fund(&token1, owner, amounts.amount1);
        self.move_tokens(&token0, owner, &pool, amounts.amount0)?;
        self.move_tokens(&token1, owner, &pool, amounts.amount1)?;
        self.modify_position(&PositionKey::new(owner.clone(), range), liquidity_delta(liquidity)?)
    }

    fn amounts_for(
        &self,
        range: TickRange,
        liquidity: u128,
        rounding: Rounding,
    ) -> Result<TokenPairAmounts, HostError> {
        let (sqrt_lower, sqrt_upper) = range.sqrt_ratios()?;
        let (amount0, amount1) = get_amounts_for_liquidity(
            self.sqrt_price_x96,
            sqrt_lower,
            sqrt_upper,
            liquidity,
            rounding,
        )?;
        Ok(TokenPairAmounts::new(amount0, amount1))
    }

    fn pool_balances(&self) -> TokenPairAmounts {
        TokenPairAmounts::new(
            self.balance_of(&self.tokens.token0.address, &self.pool),
            self.balance_of(&self.tokens.token1.address, &self.pool),
        )
    }

    fn move_tokens(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<(), HostError> {
        if amount.is_zero() || from == to {
            return Ok(());
        }
        let available = self.balance_of(token, from);
        if available < amount {
            return Err(HostError::InsufficientBalance {
                token: token.clone(),
                owner: from.clone(),
                available,
                required: amount,
            });
        }
        self.balances
            .insert((token.clone(), from.clone()), available - amount);
        let received = self.balance_of(token, to).saturating_add(amount);
        self.balances.insert((token.clone(), to.clone()), received);
        Ok(())
    }
}

fn liquidity_delta(liquidity: u128) -> Result<i128, HostError> {
    i128::try_from(liquidity).map_err(|_| MathError::Overflow.into())
}

impl Pool for SimulatedHost {
    fn pool_address(&self) -> Address {
        self.pool.clone()
    }

    fn tokens(&self) -> TokenPair {
        self.tokens.clone()
    }

    fn params(&self) -> PoolParams {
        self.params
    }

    fn slot0(&self) -> Slot0 {
        Slot0 {
            sqrt_price_x96: self.sqrt_price_x96,
            tick: self.tick,
        }
    }

    fn fee_growth_global(&self) -> TokenPairAmounts {
        self.fee_growth_global
    }

    fn ticks(&self, tick: i32) -> TickInfo {
        self.ticks.get(&tick).copied().unwrap_or_default()
    }

    fn positions(&self, key: &PositionKey) -> PositionInfo {
        self.positions.get(key).copied().unwrap_or_default()
    }

    fn request_mint(
        &mut self,
        owner: &Address,
        range: TickRange,
        liquidity: u128,
    ) -> Result<MintObligation, HostError> {
        if liquidity == 0 {
            return Err(HostError::Rejected("mint of zero liquidity".to_string()));
        }
        range.ensure_spacing(self.params.tick_spacing)?;

        let amounts = self.amounts_for(range, liquidity, Rounding::Up)?;
        let obligation = MintObligation {
            id: self.next_obligation_id,
            pool: self.pool.clone(),
            owner: owner.clone(),
            range,
            liquidity,
            amount0: amounts.amount0,
            amount1: amounts.amount1,
        };
        self.next_obligation_id += 1;
        self.pending_mints.insert(
            obligation.id,
            PendingMint {
                obligation: obligation.clone(),
                balances_before: self.pool_balances(),
            },
        );
        Ok(obligation)
    }

    fn complete_mint(&mut self, obligation: &MintObligation) -> Result<u128, HostError> {
        let pending = self
            .pending_mints
            .remove(&obligation.id)
            .ok_or(HostError::UnknownObligation { id: obligation.id })?;
        if pending.obligation != *obligation {
            return Err(HostError::Rejected(format!(
                "obligation {} does not match the request",
                obligation.id
            )));
        }

        let required = pending
            .balances_before
            .checked_add(&obligation.amounts())?;
        let balances = self.pool_balances();
        if balances.amount0 < required.amount0 || balances.amount1 < required.amount1 {
            return Err(HostError::ObligationUnpaid { id: obligation.id });
        }

        if self.mint_credit_disabled {
            return Ok(0);
        }

        let key = PositionKey::new(obligation.owner.clone(), obligation.range);
        self.modify_position(&key, liquidity_delta(obligation.liquidity)?)?;
        Ok(obligation.liquidity)
    }

    fn burn(
        &mut self,
        owner: &Address,
        range: TickRange,
        liquidity: u128,
    ) -> Result<TokenPairAmounts, HostError> {
        let key = PositionKey::new(owner.clone(), range);
        let available = self
            .positions
            .get(&key)
            .map(|p| p.liquidity)
            .ok_or_else(|| HostError::UnknownPosition {
                owner: owner.clone(),
                range,
            })?;
        if available < liquidity {
            return Err(HostError::InsufficientLiquidity {
                available,
                requested: liquidity,
            });
        }

        let amounts = self.amounts_for(range, liquidity, Rounding::Down)?;
        self.modify_position(&key, -liquidity_delta(liquidity)?)?;
        if let Some(position) = self.positions.get_mut(&key) {
            position.tokens_owed0 = position.tokens_owed0.saturating_add(amounts.amount0);
            position.tokens_owed1 = position.tokens_owed1.saturating_add(amounts.amount1);
        }
        Ok(amounts)
    }

    fn collect(
        &mut self,
        owner: &Address,
        recipient: &Address,
        range: TickRange,
        max: TokenPairAmounts,
    ) -> Result<TokenPairAmounts, HostError> {
        let key = PositionKey::new(owner.clone(), range);
        let Some(position) = self.positions.get_mut(&key) else {
            return Ok(TokenPairAmounts::zero());
        };
        let collected = TokenPairAmounts::new(
            position.tokens_owed0.min(max.amount0),
            position.tokens_owed1.min(max.amount1),
        );
        position.tokens_owed0 -= collected.amount0;
        position.tokens_owed1 -= collected.amount1;

        let pool = self.pool.clone();
        let (token0, token1) = (
            self.tokens.token0.address.clone(),
            self.tokens.token1.address.clone(),
        );
        self.move_tokens(&token0, &pool, recipient, collected.amount0)?;
        self.move_tokens(&token1, &pool, recipient, collected.amount1)?;
        Ok(collected)
    }
}

impl SwapVenue for SimulatedHost {
    fn exact_input_single(
        &mut self,
        payer: &Address,
        params: ExactInputSingleParams,
    ) -> Result<U256, HostError> {
        if params.deadline < self.now {
            return Err(HostError::DeadlinePassed {
                deadline: params.deadline,
                now: self.now,
            });
        }
        if params.fee != self.params.fee_pips {
            return Err(HostError::Rejected(format!("no pool for fee {}", params.fee)));
        }
        let zero_for_one = if params.token_in == self.tokens.token0.address
            && params.token_out == self.tokens.token1.address
        {
            true
        } else if params.token_in == self.tokens.token1.address
            && params.token_out == self.tokens.token0.address
        {
            false
        } else {
            return Err(HostError::Rejected(format!(
                "no pool for {} -> {}",
                params.token_in, params.token_out
            )));
        };

        let available = self.balance_of(&params.token_in, payer);
        if available < params.amount_in {
            return Err(HostError::InsufficientBalance {
                token: params.token_in.clone(),
                owner: payer.clone(),
                available,
                required: params.amount_in,
            });
        }

        let result = self.swap(
            payer,
            &params.recipient,
            zero_for_one,
            params.amount_in,
            params.sqrt_price_limit_x96,
        )?;
        if result.amount_out < params.amount_out_minimum {
            return Err(HostError::Rejected(format!(
                "output {} below minimum {}",
                result.amount_out, params.amount_out_minimum
            )));
        }
        Ok(result.amount_out)
    }
}

impl Quoter for SimulatedHost {
    fn quote_exact_input_single(
        &self,
        token_in: &Address,
        token_out: &Address,
        fee: u32,
        amount_in: U256,
    ) -> Result<U256, HostError> {
        let mut scratch = self.clone();
        let quoter = Address::new(TRADER);
        scratch.fund(token_in, &quoter, amount_in);
        let deadline = scratch.now;
        scratch.exact_input_single(
            &quoter,
            ExactInputSingleParams {
                token_in: token_in.clone(),
                token_out: token_out.clone(),
                fee,
                recipient: quoter.clone(),
                deadline,
                amount_in,
                amount_out_minimum: U256::zero(),
                sqrt_price_limit_x96: U256::zero(),
            },
        )
    }
}

impl TokenLedger for SimulatedHost {
    fn balance_of(&self, token: &Address, owner: &Address) -> U256 {
        self.balances
            .get(&(token.clone(), owner.clone()))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<(), HostError> {
        self.move_tokens(token, from, to, amount)
    }
}

impl Clock for SimulatedHost {
    fn now(&self) -> u64 {
        self.now
    }
}

impl Checkpoint for SimulatedHost {
    type Snapshot = Box<SimulatedHost>;

    fn checkpoint(&self) -> Self::Snapshot {
        Box::new(self.clone())
    }

    fn rollback(&mut self, snapshot: Self::Snapshot) {
        *self = *snapshot;
    }
}
