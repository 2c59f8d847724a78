//! Prelude module for convenient imports.

pub use crate::U256;
pub use crate::error::MathError;
pub use crate::fees::{
    FeeGrowthSnapshot, PositionFeeState, TokenPairAmounts, accrued_fees, fee_growth_inside,
    fee_growth_inside_pair,
};
pub use crate::math::full_math::{mul_div, mul_div_rounding_up, to_u128, wrapping_sub};
pub use crate::math::liquidity_math::{
    get_amount0_delta, get_amount1_delta, get_amounts_for_liquidity, get_liquidity_for_amounts,
};
pub use crate::math::tick_math::{
    MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, get_sqrt_ratio_at_tick,
    get_tick_at_sqrt_ratio,
};
pub use crate::math::{Q96, Q128, Rounding};
pub use crate::pool::{MintObligation, PoolParams, PositionInfo, PositionKey, Slot0, TickInfo};
pub use crate::swap_sizer::{SwapDirection, SwapPlan, size_rebalance_swap};
pub use crate::tick_range::{HALF_WIDTH_SCALE, TickRange, centered_range};
pub use crate::token::{Address, Token, TokenPair};
pub use crate::value_objects::{Percentage, Price};
