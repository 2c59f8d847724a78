use crate::error::MathError;
use crate::math::price_tick::{sqrt_price_x96_to_price, tick_to_price};
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token1 per token0, for display. Never used in accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price {
    pub value: Decimal,
}

impl Price {
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    pub fn from_tick(tick: i32) -> Result<Self, MathError> {
        tick_to_price(tick).map(Self::new)
    }

    pub fn from_sqrt_price_x96(sqrt_price_x96: U256) -> Result<Self, MathError> {
        sqrt_price_x96_to_price(sqrt_price_x96).map(Self::new)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.round_dp(8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::full_math::Q96;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_at_parity() {
        assert_eq!(Price::from_sqrt_price_x96(Q96).unwrap().value, dec!(1));
        assert_eq!(Price::from_tick(0).unwrap().value, dec!(1));
    }
}
