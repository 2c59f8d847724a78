use crate::error::MathError;
use primitive_types::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Returns the price corresponding to a given tick.
/// P = 1.0001 ^ tick
pub fn tick_to_price(tick: i32) -> Result<Decimal, MathError> {
    let base = 1.0001f64;
    let price_f64 = base.powi(tick);
    Decimal::from_f64(price_f64).ok_or(MathError::Conversion("price does not fit a decimal"))
}

/// Returns the tick corresponding to a given price, rounded to the nearest tick.
/// tick = log_1.0001(P)
pub fn price_to_tick(price: Decimal) -> Result<i32, MathError> {
    if price <= Decimal::ZERO {
        return Err(MathError::Conversion("price must be positive"));
    }
    let price_f64 = price
        .to_f64()
        .ok_or(MathError::Conversion("price does not fit an f64"))?;
    let tick = price_f64.log(1.0001f64);
    Ok(tick.round() as i32)
}

/// Converts a Q64.96 sqrt price to a decimal price (token1 per token0).
pub fn sqrt_price_x96_to_price(sqrt_price_x96: U256) -> Result<Decimal, MathError> {
    if sqrt_price_x96.is_zero() {
        return Err(MathError::Conversion("sqrt price must be positive"));
    }
    // keep 32 fractional bits, plenty for display
    let scaled = sqrt_price_x96 >> 64;
    if scaled > U256::from(u128::MAX) {
        return Err(MathError::Overflow);
    }
    let sqrt = scaled.as_u128() as f64 / (1u64 << 32) as f64;
    Decimal::from_f64(sqrt * sqrt).ok_or(MathError::Conversion("price does not fit a decimal"))
}

/// Converts a decimal price to a Q64.96 sqrt price.
pub fn price_to_sqrt_price_x96(price: Decimal) -> Result<U256, MathError> {
    if price <= Decimal::ZERO {
        return Err(MathError::Conversion("price must be positive"));
    }
    let sqrt = price
        .to_f64()
        .ok_or(MathError::Conversion("price does not fit an f64"))?
        .sqrt();
    // 2^48 fixed point keeps the f64 mantissa, the remaining 2^48 shift is exact
    let scaled = (sqrt * (1u64 << 48) as f64).round();
    if !scaled.is_finite() || scaled >= u128::MAX as f64 {
        return Err(MathError::Overflow);
    }
    let value = U256::from(scaled as u128) << 48;
    if value.is_zero() {
        return Err(MathError::Conversion("price too small for Q64.96"));
    }
    Ok(value)
}
