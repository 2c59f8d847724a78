use thiserror::Error;

/// Errors raised by the pure math in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// A checked operation overflowed its target width.
    #[error("arithmetic overflow")]
    Overflow,
    /// A checked subtraction went below zero.
    #[error("arithmetic underflow")]
    Underflow,
    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,
    /// Tick outside of `[MIN_TICK, MAX_TICK]`.
    #[error("tick {0} out of bounds")]
    TickOutOfBounds(i32),
    /// Sqrt price outside of `[MIN_SQRT_RATIO, MAX_SQRT_RATIO)`.
    #[error("sqrt price {0} out of bounds")]
    SqrtPriceOutOfBounds(String),
    /// A tick range that is empty, inverted or off the tick grid.
    #[error("invalid range [{lower}, {upper}]: {reason}")]
    InvalidRange {
        /// Lower tick.
        lower: i32,
        /// Upper tick.
        upper: i32,
        /// Why the range was rejected.
        reason: &'static str,
    },
    /// Tick spacing must be positive.
    #[error("invalid tick spacing {0}")]
    InvalidTickSpacing(i32),
    /// Conversion to or from a floating point/decimal value failed.
    #[error("conversion failed: {0}")]
    Conversion(&'static str),
}
