//! Multiply-divide with 512-bit intermediates.
//!
//! Scale factors used across the crate:
//! - sqrt prices are Q64.96 (`value / 2^96`)
//! - fee growth counters are Q128.128 (`value / 2^128`)

use crate::error::MathError;
use primitive_types::{U256, U512};

/// 2^96, the sqrt-price scale.
pub const Q96: U256 = U256([0, 1 << 32, 0, 0]);

/// 2^128, the fee-growth scale.
pub const Q128: U256 = U256([0, 0, 1, 0]);

/// Rounding mode for the final division step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Floor. Used for everything paid out of the pool.
    Down,
    /// Ceiling. Used for everything paid into the pool.
    Up,
}

/// Computes `floor(a * b / denominator)` without intermediate overflow.
///
/// # Errors
/// `DivisionByZero` if `denominator` is zero, `Overflow` if the result does not fit in 256 bits.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let quotient = a.full_mul(b) / U512::from(denominator);
    U256::try_from(quotient).map_err(|_| MathError::Overflow)
}

/// Computes `ceil(a * b / denominator)` without intermediate overflow.
///
/// # Errors
/// Same as [`mul_div`].
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let (quotient, remainder) = a.full_mul(b).div_mod(U512::from(denominator));
    let quotient = if remainder.is_zero() {
        quotient
    } else {
        quotient + U512::one()
    };
    U256::try_from(quotient).map_err(|_| MathError::Overflow)
}

/// Computes `a * b / denominator` with the requested rounding.
pub fn mul_div_rounding(
    a: U256,
    b: U256,
    denominator: U256,
    rounding: Rounding,
) -> Result<U256, MathError> {
    match rounding {
        Rounding::Down => mul_div(a, b, denominator),
        Rounding::Up => mul_div_rounding_up(a, b, denominator),
    }
}

/// Computes `ceil(a / b)`.
pub fn div_rounding_up(a: U256, b: U256) -> Result<U256, MathError> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let (quotient, remainder) = a.div_mod(b);
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        quotient.checked_add(U256::one()).ok_or(MathError::Overflow)
    }
}

/// Subtraction on modular accumulators such as fee growth counters.
///
/// Fee growth values only ever increase and are allowed to wrap, so their
/// differences are taken modulo 2^256.
#[must_use]
pub fn wrapping_sub(a: U256, b: U256) -> U256 {
    a.overflowing_sub(b).0
}

/// Narrows a `U256` to `u128`.
pub fn to_u128(value: U256) -> Result<u128, MathError> {
    if value > U256::from(u128::MAX) {
        return Err(MathError::Overflow);
    }
    Ok(value.as_u128())
}
