//! Sizes the one-sided swap that brings two balances to equal value.

use crate::error::MathError;
use crate::math::full_math::{Q96, mul_div};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Which token is sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Sell token0 for token1.
    ZeroForOne,
    /// Sell token1 for token0.
    OneForZero,
}

/// A swap the vault should perform before minting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapPlan {
    /// Exact input amount, in units of the sold token.
    pub amount_in: U256,
    /// Direction of the swap.
    pub direction: SwapDirection,
}

/// Value of `amount0` in token1 units at `sqrt_price_x96` (`amount0 * sqrtP^2 / 2^192`).
pub fn value_in_token1(amount0: U256, sqrt_price_x96: U256) -> Result<U256, MathError> {
    mul_div(mul_div(amount0, sqrt_price_x96, Q96)?, sqrt_price_x96, Q96)
}

/// Returns the swap that equalizes the value of both balances, or `None` when
/// they are already balanced to the unit.
///
/// With `value0 = amount0 * price` and `value1 = amount1`, the heavier side sells
/// half the value difference: `(value0 - value1) / (2 * price)` of token0, or
/// `(value1 - value0) / 2` of token1.
pub fn size_rebalance_swap(
    amount0: U256,
    amount1: U256,
    sqrt_price_x96: U256,
) -> Result<Option<SwapPlan>, MathError> {
    if sqrt_price_x96.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let value0 = value_in_token1(amount0, sqrt_price_x96)?;

    let plan = if value0 > amount1 {
        let excess = value0 - amount1;
        // excess / price = excess * 2^192 / sqrtP^2
        let excess_in_token0 = mul_div(mul_div(excess, Q96, sqrt_price_x96)?, Q96, sqrt_price_x96)?;
        SwapPlan {
            amount_in: excess_in_token0 / 2,
            direction: SwapDirection::ZeroForOne,
        }
    } else {
        SwapPlan {
            amount_in: (amount1 - value0) / 2,
            direction: SwapDirection::OneForZero,
        }
    };

    Ok((!plan.amount_in.is_zero()).then_some(plan))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    #[test]
    fn test_sells_half_of_token0_at_parity() {
        let plan = size_rebalance_swap(u(1000), U256::zero(), Q96).unwrap().unwrap();
        assert_eq!(plan.direction, SwapDirection::ZeroForOne);
        assert_eq!(plan.amount_in, u(500));
    }

    #[test]
    fn test_sells_half_of_token1_at_parity() {
        let plan = size_rebalance_swap(U256::zero(), u(1000), Q96).unwrap().unwrap();
        assert_eq!(plan.direction, SwapDirection::OneForZero);
        assert_eq!(plan.amount_in, u(500));
    }

    #[test]
    fn test_accounts_for_price() {
        // price 4: 100 token0 is worth 400 token1; selling 50 leaves 50/200
        let sqrt_price = Q96 * u(2);
        let plan = size_rebalance_swap(u(100), U256::zero(), sqrt_price)
            .unwrap()
            .unwrap();
        assert_eq!(plan.direction, SwapDirection::ZeroForOne);
        assert_eq!(plan.amount_in, u(50));

        // 100 token0 (400) vs 1000 token1: sell (1000 - 400) / 2 token1
        let plan = size_rebalance_swap(u(100), u(1000), sqrt_price).unwrap().unwrap();
        assert_eq!(plan.direction, SwapDirection::OneForZero);
        assert_eq!(plan.amount_in, u(300));
    }

    #[test]
    fn test_balanced_needs_no_swap() {
        assert_eq!(size_rebalance_swap(u(1000), u(1000), Q96).unwrap(), None);
        assert_eq!(size_rebalance_swap(u(1000), u(1001), Q96).unwrap(), None);
        assert_eq!(size_rebalance_swap(U256::zero(), U256::zero(), Q96).unwrap(), None);
    }

    #[test]
    fn test_zero_price_rejected() {
        assert!(size_rebalance_swap(u(1), u(1), U256::zero()).is_err());
    }
}
