use crate::error::MathError;
use crate::math::full_math::mul_div;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Basis points in one whole.
pub const BPS_SCALE: u32 = 10_000;

/// A fraction expressed in basis points, at most 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Percentage(u32);

impl Percentage {
    pub fn from_bps(bps: u32) -> Result<Self, MathError> {
        if bps > BPS_SCALE {
            return Err(MathError::Conversion("basis points above 10000"));
        }
        Ok(Self(bps))
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn to_bps(&self) -> u32 {
        self.0
    }

    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(BPS_SCALE)
    }

    /// `amount * bps / 10000`, rounded down.
    pub fn of(&self, amount: U256) -> Result<U256, MathError> {
        mul_div(amount, U256::from(self.0), U256::from(BPS_SCALE))
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", (self.as_decimal() * Decimal::ONE_HUNDRED).normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_bps_bounds() {
        assert!(Percentage::from_bps(10_000).is_ok());
        assert!(Percentage::from_bps(10_001).is_err());
        assert_eq!(Percentage::from_bps(50).unwrap().as_decimal(), dec!(0.005));
    }

    #[test]
    fn test_of_rounds_down() {
        let fee = Percentage::from_bps(50).unwrap();
        assert_eq!(fee.of(U256::from(1_000_000u64)).unwrap(), U256::from(5_000u64));
        assert_eq!(fee.of(U256::from(199u64)).unwrap(), U256::zero());
        assert_eq!(Percentage::zero().of(U256::MAX).unwrap(), U256::zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(Percentage::from_bps(50).unwrap().to_string(), "0.5%");
    }
}
