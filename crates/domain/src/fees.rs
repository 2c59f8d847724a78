//! Uncollected fee estimation from fee growth counters.
//!
//! Fee growth counters are Q128.128 per unit of liquidity and are modular:
//! differences are always taken with wrapping subtraction.

use crate::error::MathError;
use crate::math::full_math::{Q128, mul_div, wrapping_sub};
use crate::tick_range::TickRange;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// A pair of per-token values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPairAmounts {
    /// Token0 side.
    pub amount0: U256,
    /// Token1 side.
    pub amount1: U256,
}

impl TokenPairAmounts {
    /// Creates a new pair.
    #[must_use]
    pub fn new(amount0: U256, amount1: U256) -> Self {
        Self { amount0, amount1 }
    }

    /// Both sides zero.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Whether both sides are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount0.is_zero() && self.amount1.is_zero()
    }

    /// Checked component-wise addition.
    pub fn checked_add(&self, other: &Self) -> Result<Self, MathError> {
        Ok(Self {
            amount0: self
                .amount0
                .checked_add(other.amount0)
                .ok_or(MathError::Overflow)?,
            amount1: self
                .amount1
                .checked_add(other.amount1)
                .ok_or(MathError::Overflow)?,
        })
    }

    /// Checked component-wise subtraction.
    pub fn checked_sub(&self, other: &Self) -> Result<Self, MathError> {
        Ok(Self {
            amount0: self
                .amount0
                .checked_sub(other.amount0)
                .ok_or(MathError::Underflow)?,
            amount1: self
                .amount1
                .checked_sub(other.amount1)
                .ok_or(MathError::Underflow)?,
        })
    }

    /// Scales both sides by `numerator / denominator`, rounding down.
    pub fn scale(&self, numerator: U256, denominator: U256) -> Result<Self, MathError> {
        Ok(Self {
            amount0: mul_div(self.amount0, numerator, denominator)?,
            amount1: mul_div(self.amount1, numerator, denominator)?,
        })
    }
}

/// Fee growth counters read from the pool for one range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeGrowthSnapshot {
    /// Current pool tick.
    pub current_tick: i32,
    /// Global fee growth per unit of liquidity, token0 and token1.
    pub global: TokenPairAmounts,
    /// Fee growth outside the lower boundary tick.
    pub lower_outside: TokenPairAmounts,
    /// Fee growth outside the upper boundary tick.
    pub upper_outside: TokenPairAmounts,
}

/// Stored state of the position: liquidity and the last recorded inside growth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionFeeState {
    /// Liquidity held by the position.
    pub liquidity: u128,
    /// Fee growth inside the range at the last update.
    pub fee_growth_inside_last: TokenPairAmounts,
}

/// Fee growth inside `range` for one token.
///
/// Below the lower tick the outside value is the growth *above* it, so the
/// growth below is `global - outside`; the upper boundary mirrors this.
#[must_use]
pub fn fee_growth_inside(
    range: &TickRange,
    current_tick: i32,
    global: U256,
    lower_outside: U256,
    upper_outside: U256,
) -> U256 {
    let below = if current_tick >= range.lower {
        lower_outside
    } else {
        wrapping_sub(global, lower_outside)
    };
    let above = if current_tick < range.upper {
        upper_outside
    } else {
        wrapping_sub(global, upper_outside)
    };
    wrapping_sub(wrapping_sub(global, below), above)
}

/// Fee growth inside `range` for both tokens.
#[must_use]
pub fn fee_growth_inside_pair(range: &TickRange, snapshot: &FeeGrowthSnapshot) -> TokenPairAmounts {
    TokenPairAmounts {
        amount0: fee_growth_inside(
            range,
            snapshot.current_tick,
            snapshot.global.amount0,
            snapshot.lower_outside.amount0,
            snapshot.upper_outside.amount0,
        ),
        amount1: fee_growth_inside(
            range,
            snapshot.current_tick,
            snapshot.global.amount1,
            snapshot.lower_outside.amount1,
            snapshot.upper_outside.amount1,
        ),
    }
}

/// Fees earned since the position's last update: `L * (inside - inside_last) >> 128`.
///
/// Floors, so it under-reports by at most one unit per token. Use it for
/// display and pro-rata estimates only, never for exact settlement.
pub fn accrued_fees(
    range: &TickRange,
    snapshot: &FeeGrowthSnapshot,
    position: &PositionFeeState,
) -> Result<TokenPairAmounts, MathError> {
    let inside = fee_growth_inside_pair(range, snapshot);
    let liquidity = U256::from(position.liquidity);
    Ok(TokenPairAmounts {
        amount0: mul_div(
            liquidity,
            wrapping_sub(inside.amount0, position.fee_growth_inside_last.amount0),
            Q128,
        )?,
        amount1: mul_div(
            liquidity,
            wrapping_sub(inside.amount1, position.fee_growth_inside_last.amount1),
            Q128,
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: u64, b: u64) -> TokenPairAmounts {
        TokenPairAmounts::new(U256::from(a), U256::from(b))
    }

    fn range() -> TickRange {
        TickRange::new(-600, 600).unwrap()
    }

    #[test]
    fn test_inside_growth_in_range() {
        // in range: inside = global - below - above
        let inside = fee_growth_inside(&range(), 0, U256::from(100u64), U256::from(10u64), U256::from(15u64));
        assert_eq!(inside, U256::from(75u64));
    }

    #[test]
    fn test_inside_growth_below_range() {
        // below the lower tick the lower outside value is the growth above it
        let inside = fee_growth_inside(&range(), -1000, U256::from(100u64), U256::from(40u64), U256::from(15u64));
        // below = 100 - 40 = 60, above = 15 -> 25
        assert_eq!(inside, U256::from(25u64));
    }

    #[test]
    fn test_inside_growth_above_range() {
        let inside = fee_growth_inside(&range(), 600, U256::from(100u64), U256::from(10u64), U256::from(30u64));
        // below = 10, above = 100 - 30 = 70 -> 20
        assert_eq!(inside, U256::from(20u64));
    }

    #[test]
    fn test_inside_growth_wraps() {
        // outside values initialised after the global counter wrapped
        let inside = fee_growth_inside(&range(), 0, U256::from(5u64), U256::from(10u64), U256::zero());
        assert_eq!(inside, U256::MAX - U256::from(4u64));
    }

    #[test]
    fn test_accrued_fees_floor() {
        let snapshot = FeeGrowthSnapshot {
            current_tick: 0,
            // 1.5 units of token0 and 3 units of token1 per unit of liquidity
            global: TokenPairAmounts::new(Q128 + (Q128 >> 1), Q128 * U256::from(3u8)),
            lower_outside: TokenPairAmounts::zero(),
            upper_outside: TokenPairAmounts::zero(),
        };
        let position = PositionFeeState {
            liquidity: 3,
            fee_growth_inside_last: TokenPairAmounts::zero(),
        };
        let fees = accrued_fees(&range(), &snapshot, &position).unwrap();
        // 3 * 1.5 = 4.5 floors to 4
        assert_eq!(fees, pair(4, 9));
    }

    #[test]
    fn test_accrued_fees_since_last_update() {
        let snapshot = FeeGrowthSnapshot {
            current_tick: 0,
            global: TokenPairAmounts::new(Q128 * U256::from(10u8), Q128 * U256::from(10u8)),
            ..Default::default()
        };
        let position = PositionFeeState {
            liquidity: 2,
            fee_growth_inside_last: TokenPairAmounts::new(Q128 * U256::from(7u8), Q128 * U256::from(10u8)),
        };
        let fees = accrued_fees(&range(), &snapshot, &position).unwrap();
        assert_eq!(fees, pair(6, 0));
    }

    #[test]
    fn test_pair_scale_and_checked_ops() {
        let fees = pair(1000, 501);
        assert_eq!(fees.scale(U256::from(1u8), U256::from(2u8)).unwrap(), pair(500, 250));
        assert_eq!(fees.checked_add(&pair(1, 1)).unwrap(), pair(1001, 502));
        assert!(pair(1, 0).checked_sub(&pair(2, 0)).is_err());
    }
}
