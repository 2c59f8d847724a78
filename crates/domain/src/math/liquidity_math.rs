//! Conversions between liquidity units and token amounts for a range.
//!
//! With `sa < sb` the range's sqrt price bounds and `sp` the current sqrt price:
//! - below the range the position is all token0
//! - above the range the position is all token1
//! - inside, token0 covers `[sp, sb]` and token1 covers `[sa, sp]`

use super::full_math::{
    Q96, Rounding, div_rounding_up, mul_div, mul_div_rounding, mul_div_rounding_up, to_u128,
};
use crate::error::MathError;
use primitive_types::U256;

fn ordered(a: U256, b: U256) -> (U256, U256) {
    if a > b { (b, a) } else { (a, b) }
}

/// Amount of token0 spanned by `liquidity` between two sqrt prices.
/// delta_x = L * (sb - sa) / (sa * sb)
pub fn get_amount0_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    rounding: Rounding,
) -> Result<U256, MathError> {
    let (lower, upper) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if lower.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let numerator1 = U256::from(liquidity) << 96;
    let numerator2 = upper - lower;

    match rounding {
        Rounding::Up => div_rounding_up(mul_div_rounding_up(numerator1, numerator2, upper)?, lower),
        Rounding::Down => Ok(mul_div(numerator1, numerator2, upper)? / lower),
    }
}

/// Amount of token1 spanned by `liquidity` between two sqrt prices.
/// delta_y = L * (sb - sa)
pub fn get_amount1_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    rounding: Rounding,
) -> Result<U256, MathError> {
    let (lower, upper) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    mul_div_rounding(U256::from(liquidity), upper - lower, Q96, rounding)
}

/// Token amounts backing `liquidity` in `[sqrt_ratio_a, sqrt_ratio_b]` at `sqrt_price_x96`.
pub fn get_amounts_for_liquidity(
    sqrt_price_x96: U256,
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    rounding: Rounding,
) -> Result<(U256, U256), MathError> {
    let (lower, upper) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_price_x96 <= lower {
        let amount0 = get_amount0_delta(lower, upper, liquidity, rounding)?;
        Ok((amount0, U256::zero()))
    } else if sqrt_price_x96 < upper {
        let amount0 = get_amount0_delta(sqrt_price_x96, upper, liquidity, rounding)?;
        let amount1 = get_amount1_delta(lower, sqrt_price_x96, liquidity, rounding)?;
        Ok((amount0, amount1))
    } else {
        let amount1 = get_amount1_delta(lower, upper, liquidity, rounding)?;
        Ok((U256::zero(), amount1))
    }
}

/// Liquidity supported by `amount0` over `[sa, sb]`.
/// L = amount0 * sa * sb / (sb - sa)
pub fn get_liquidity_for_amount0(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount0: U256,
) -> Result<u128, MathError> {
    let (lower, upper) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    let intermediate = mul_div(lower, upper, Q96)?;
    to_u128(mul_div(amount0, intermediate, upper - lower)?)
}

/// Liquidity supported by `amount1` over `[sa, sb]`.
/// L = amount1 / (sb - sa)
pub fn get_liquidity_for_amount1(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount1: U256,
) -> Result<u128, MathError> {
    let (lower, upper) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    to_u128(mul_div(amount1, Q96, upper - lower)?)
}

/// Maximum liquidity that `amount0` and `amount1` can fund at the current price.
///
/// Amounts returned by [`get_amounts_for_liquidity`] with `Rounding::Up` for the
/// result never exceed the inputs.
pub fn get_liquidity_for_amounts(
    sqrt_price_x96: U256,
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount0: U256,
    amount1: U256,
) -> Result<u128, MathError> {
    let (lower, upper) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if lower == upper {
        return Err(MathError::DivisionByZero);
    }

    if sqrt_price_x96 <= lower {
        get_liquidity_for_amount0(lower, upper, amount0)
    } else if sqrt_price_x96 < upper {
        let liquidity0 = get_liquidity_for_amount0(sqrt_price_x96, upper, amount0)?;
        let liquidity1 = get_liquidity_for_amount1(lower, sqrt_price_x96, amount1)?;
        Ok(liquidity0.min(liquidity1))
    } else {
        get_liquidity_for_amount1(lower, upper, amount1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tick_math::get_sqrt_ratio_at_tick;

    #[test]
    fn test_amount_deltas_simple_range() {
        // sqrt prices 1 and 2: delta_y = L * (2 - 1), delta_x = L * (1 - 1/2)
        let sa = Q96;
        let sb = Q96 * U256::from(2u8);
        let dy = get_amount1_delta(sa, sb, 1000, Rounding::Down).unwrap();
        assert_eq!(dy, U256::from(1000u64));
        let dx = get_amount0_delta(sa, sb, 1000, Rounding::Down).unwrap();
        assert_eq!(dx, U256::from(500u64));
    }

    #[test]
    fn test_get_liquidity_from_single_amounts() {
        let sa = Q96;
        let sb = Q96 * U256::from(2u8);
        assert_eq!(get_liquidity_for_amount0(sa, sb, U256::from(500u64)).unwrap(), 1000);
        assert_eq!(get_liquidity_for_amount1(sa, sb, U256::from(1000u64)).unwrap(), 1000);
    }

    #[test]
    fn test_amounts_for_liquidity_by_price_position() {
        let sa = get_sqrt_ratio_at_tick(-600).unwrap();
        let sb = get_sqrt_ratio_at_tick(600).unwrap();
        let liquidity = 1_000_000_000u128;

        let below = get_sqrt_ratio_at_tick(-1200).unwrap();
        let (a0, a1) = get_amounts_for_liquidity(below, sa, sb, liquidity, Rounding::Down).unwrap();
        assert!(a0 > U256::zero());
        assert!(a1.is_zero());

        let above = get_sqrt_ratio_at_tick(1200).unwrap();
        let (a0, a1) = get_amounts_for_liquidity(above, sa, sb, liquidity, Rounding::Down).unwrap();
        assert!(a0.is_zero());
        assert!(a1 > U256::zero());

        let (a0, a1) = get_amounts_for_liquidity(Q96, sa, sb, liquidity, Rounding::Down).unwrap();
        assert!(a0 > U256::zero());
        assert!(a1 > U256::zero());
    }

    #[test]
    fn test_rounding_up_never_below_rounding_down() {
        let sa = get_sqrt_ratio_at_tick(-1020).unwrap();
        let sb = get_sqrt_ratio_at_tick(960).unwrap();
        let down = get_amounts_for_liquidity(Q96, sa, sb, 12_345, Rounding::Down).unwrap();
        let up = get_amounts_for_liquidity(Q96, sa, sb, 12_345, Rounding::Up).unwrap();
        assert!(up.0 >= down.0 && up.0 - down.0 <= U256::one());
        assert!(up.1 >= down.1 && up.1 - down.1 <= U256::one());
    }

    #[test]
    fn test_liquidity_for_amounts_is_fundable() {
        let sa = get_sqrt_ratio_at_tick(-1020).unwrap();
        let sb = get_sqrt_ratio_at_tick(960).unwrap();
        let amount0 = U256::from(987_654_321u64);
        let amount1 = U256::from(1_234_567_890u64);

        let liquidity = get_liquidity_for_amounts(Q96, sa, sb, amount0, amount1).unwrap();
        assert!(liquidity > 0);

        let (need0, need1) =
            get_amounts_for_liquidity(Q96, sa, sb, liquidity, Rounding::Up).unwrap();
        assert!(need0 <= amount0);
        assert!(need1 <= amount1);
    }
}
