//! Small value types used for configuration and display.

/// Basis-point fractions.
pub mod percentage;
/// Decimal prices for display.
pub mod price;

pub use percentage::{BPS_SCALE, Percentage};
pub use price::Price;
