//! Single-step exact-input swap math used by pool implementations.

use super::full_math::{Q96, div_rounding_up, mul_div, mul_div_rounding_up};
use super::liquidity_math::{get_amount0_delta, get_amount1_delta};
use super::Rounding;
use crate::error::MathError;
use primitive_types::U256;

/// Fee denominator: fees are expressed in hundredths of a bip.
pub const FEE_PIPS_SCALE: u32 = 1_000_000;

/// Result of swapping within one initialized-tick interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStep {
    /// Sqrt price after the step.
    pub sqrt_price_next_x96: U256,
    /// Input consumed, fee excluded.
    pub amount_in: U256,
    /// Output produced.
    pub amount_out: U256,
    /// Fee taken from the input.
    pub fee_amount: U256,
}

/// Next sqrt price after adding `amount_in` of the input token, rounding against the swapper.
///
/// token0 in: `sqrtP' = L * sqrtP / (L + amount * sqrtP)`, rounded up.
/// token1 in: `sqrtP' = sqrtP + amount / L`, rounded down.
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256, MathError> {
    if sqrt_price_x96.is_zero() || liquidity == 0 {
        return Err(MathError::DivisionByZero);
    }
    if amount_in.is_zero() {
        return Ok(sqrt_price_x96);
    }

    let numerator1 = U256::from(liquidity) << 96;
    if zero_for_one {
        let product = mul_div(amount_in, sqrt_price_x96, U256::one())?;
        let denominator = numerator1.checked_add(product).ok_or(MathError::Overflow)?;
        mul_div_rounding_up(numerator1, sqrt_price_x96, denominator)
    } else {
        let quotient = mul_div(amount_in, Q96, U256::from(liquidity))?;
        sqrt_price_x96
            .checked_add(quotient)
            .ok_or(MathError::Overflow)
    }
}

/// Swaps up to `amount_remaining` (fee included) from `sqrt_price_current_x96`
/// toward `sqrt_price_target_x96` with constant `liquidity`.
pub fn compute_swap_step(
    sqrt_price_current_x96: U256,
    sqrt_price_target_x96: U256,
    liquidity: u128,
    amount_remaining: U256,
    fee_pips: u32,
) -> Result<SwapStep, MathError> {
    if fee_pips >= FEE_PIPS_SCALE {
        return Err(MathError::Conversion("fee must be below 100%"));
    }
    let zero_for_one = sqrt_price_current_x96 >= sqrt_price_target_x96;
    let scale = U256::from(FEE_PIPS_SCALE);
    let fee = U256::from(fee_pips);

    let amount_remaining_less_fee = mul_div(amount_remaining, scale - fee, scale)?;

    let to_target = if zero_for_one {
        get_amount0_delta(sqrt_price_target_x96, sqrt_price_current_x96, liquidity, Rounding::Up)?
    } else {
        get_amount1_delta(sqrt_price_current_x96, sqrt_price_target_x96, liquidity, Rounding::Up)?
    };

    let sqrt_price_next_x96 = if amount_remaining_less_fee >= to_target {
        sqrt_price_target_x96
    } else {
        get_next_sqrt_price_from_input(
            sqrt_price_current_x96,
            liquidity,
            amount_remaining_less_fee,
            zero_for_one,
        )?
    };
    let reached_target = sqrt_price_next_x96 == sqrt_price_target_x96;

    let (amount_in, amount_out) = if zero_for_one {
        let amount_in = if reached_target {
            to_target
        } else {
            get_amount0_delta(sqrt_price_next_x96, sqrt_price_current_x96, liquidity, Rounding::Up)?
        };
        let amount_out = get_amount1_delta(
            sqrt_price_next_x96,
            sqrt_price_current_x96,
            liquidity,
            Rounding::Down,
        )?;
        (amount_in, amount_out)
    } else {
        let amount_in = if reached_target {
            to_target
        } else {
            get_amount1_delta(sqrt_price_current_x96, sqrt_price_next_x96, liquidity, Rounding::Up)?
        };
        let amount_out = get_amount0_delta(
            sqrt_price_current_x96,
            sqrt_price_next_x96,
            liquidity,
            Rounding::Down,
        )?;
        (amount_in, amount_out)
    };

    let fee_amount = if reached_target {
        div_rounding_up(amount_in.checked_mul(fee).ok_or(MathError::Overflow)?, scale - fee)?
    } else {
        // the remainder is the fee when the step stops short of the target
        amount_remaining.saturating_sub(amount_in)
    };

    Ok(SwapStep {
        sqrt_price_next_x96,
        amount_in,
        amount_out,
        fee_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tick_math::get_sqrt_ratio_at_tick;

    const LIQUIDITY: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_next_price_moves_with_input() {
        let up = get_next_sqrt_price_from_input(Q96, LIQUIDITY, U256::from(1_000_000u64), false)
            .unwrap();
        assert!(up > Q96);
        let down = get_next_sqrt_price_from_input(Q96, LIQUIDITY, U256::from(1_000_000u64), true)
            .unwrap();
        assert!(down < Q96);
        assert_eq!(
            get_next_sqrt_price_from_input(Q96, LIQUIDITY, U256::zero(), true).unwrap(),
            Q96
        );
    }

    #[test]
    fn test_step_stops_short_of_far_target() {
        let target = get_sqrt_ratio_at_tick(-10_000).unwrap();
        let remaining = U256::from(1_000_000_000u64);
        let step = compute_swap_step(Q96, target, LIQUIDITY, remaining, 3000).unwrap();

        assert!(step.sqrt_price_next_x96 < Q96);
        assert!(step.sqrt_price_next_x96 > target);
        assert_eq!(step.amount_in + step.fee_amount, remaining);
        // near parity output is close to input minus fee
        assert!(step.amount_out < step.amount_in);
        assert!(step.amount_out > step.amount_in * U256::from(99u8) / U256::from(100u8));
    }

    #[test]
    fn test_step_reaches_near_target() {
        let target = get_sqrt_ratio_at_tick(1).unwrap();
        let remaining = U256::from(10u64).pow(U256::from(20u8));
        let step = compute_swap_step(Q96, target, LIQUIDITY, remaining, 3000).unwrap();

        assert_eq!(step.sqrt_price_next_x96, target);
        assert!(step.amount_in + step.fee_amount <= remaining);
        assert!(!step.amount_out.is_zero());
    }

    #[test]
    fn test_rejects_full_fee() {
        assert!(compute_swap_step(Q96, Q96, LIQUIDITY, U256::one(), FEE_PIPS_SCALE).is_err());
    }
}
