/// Wide multiply-divide helpers and fixed-point constants.
pub mod full_math;
/// Liquidity <-> token amount conversions.
pub mod liquidity_math;
/// Decimal price <-> tick conversions for display.
pub mod price_tick;
/// Single-step swap math.
pub mod swap_math;
/// Tick <-> sqrt price conversions.
pub mod tick_math;

pub use full_math::{Q96, Q128, Rounding};
