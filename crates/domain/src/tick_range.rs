//! The vault's active range and the centered band calculator.

use crate::error::MathError;
use crate::math::full_math::mul_div;
use crate::math::tick_math::{
    MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, get_sqrt_ratio_at_tick,
    get_tick_at_sqrt_ratio, max_usable_tick, min_usable_tick,
};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Denominator of the configured half width (`half_width / 1000` of sqrt price).
pub const HALF_WIDTH_SCALE: u32 = 1000;

/// A `[lower, upper)` tick range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickRange {
    /// Lower tick, inclusive.
    pub lower: i32,
    /// Upper tick, exclusive.
    pub upper: i32,
}

impl TickRange {
    /// Creates a range, rejecting empty or inverted bounds.
    pub fn new(lower: i32, upper: i32) -> Result<Self, MathError> {
        if lower >= upper {
            return Err(MathError::InvalidRange {
                lower,
                upper,
                reason: "lower must be below upper",
            });
        }
        if lower < MIN_TICK || upper > MAX_TICK {
            return Err(MathError::InvalidRange {
                lower,
                upper,
                reason: "outside global tick bounds",
            });
        }
        Ok(Self { lower, upper })
    }

    /// Whether `tick` is inside the range (the position earns fees there).
    #[must_use]
    pub fn contains(&self, tick: i32) -> bool {
        tick >= self.lower && tick < self.upper
    }

    /// Checks that both bounds sit on the tick grid.
    pub fn ensure_spacing(&self, tick_spacing: i32) -> Result<(), MathError> {
        if tick_spacing <= 0 {
            return Err(MathError::InvalidTickSpacing(tick_spacing));
        }
        if self.lower % tick_spacing != 0 || self.upper % tick_spacing != 0 {
            return Err(MathError::InvalidRange {
                lower: self.lower,
                upper: self.upper,
                reason: "bounds are not multiples of the tick spacing",
            });
        }
        Ok(())
    }

    /// Sqrt prices at both bounds.
    pub fn sqrt_ratios(&self) -> Result<(U256, U256), MathError> {
        Ok((
            get_sqrt_ratio_at_tick(self.lower)?,
            get_sqrt_ratio_at_tick(self.upper)?,
        ))
    }

    /// Width in ticks.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.upper - self.lower
    }
}

impl fmt::Display for TickRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Checks the configured half width, `0 < half_width < 1000`.
pub fn validate_half_width(half_width: u32) -> Result<(), MathError> {
    if half_width == 0 || half_width >= HALF_WIDTH_SCALE {
        return Err(MathError::InvalidRange {
            lower: 0,
            upper: 0,
            reason: "half width must be in (0, 1000)",
        });
    }
    Ok(())
}

/// Unsnapped boundary ticks: `sqrt(P) -/+ half_width * sqrt(P) / 1000`.
pub fn raw_band(current_tick: i32, half_width: u32) -> Result<(i32, i32), MathError> {
    validate_half_width(half_width)?;

    let sqrt_price = get_sqrt_ratio_at_tick(current_tick)?;
    let delta = mul_div(
        U256::from(half_width),
        sqrt_price,
        U256::from(HALF_WIDTH_SCALE),
    )?;

    // half_width < 1000 so delta < sqrt_price
    let lower_sqrt = (sqrt_price - delta).max(MIN_SQRT_RATIO);
    let upper_sqrt = sqrt_price
        .checked_add(delta)
        .ok_or(MathError::Overflow)?
        .min(MAX_SQRT_RATIO - U256::one());

    Ok((
        get_tick_at_sqrt_ratio(lower_sqrt)?,
        get_tick_at_sqrt_ratio(upper_sqrt)?,
    ))
}

/// Symmetric band in sqrt-price around `current_tick`, snapped to the tick grid.
///
/// Each boundary is truncated toward zero to a multiple of `tick_spacing` and then
/// clamped to the usable global bounds. Pure: same inputs, same band.
///
/// When the band reaches less than one spacing past `current_tick` on a side, the
/// snapped band may exclude `current_tick`; callers that need it inside check
/// [`TickRange::contains`].
///
/// # Errors
/// `InvalidRange` when the snapped band collapses, which happens when the tick
/// spacing is wider than the computed band.
pub fn centered_range(
    current_tick: i32,
    tick_spacing: i32,
    half_width: u32,
) -> Result<TickRange, MathError> {
    let min_tick = min_usable_tick(tick_spacing)?;
    let max_tick = max_usable_tick(tick_spacing)?;
    let (raw_lower, raw_upper) = raw_band(current_tick, half_width)?;

    let lower = (raw_lower / tick_spacing * tick_spacing).clamp(min_tick, max_tick);
    let upper = (raw_upper / tick_spacing * tick_spacing).clamp(min_tick, max_tick);

    TickRange::new(lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_rejects_inverted() {
        assert!(TickRange::new(10, 10).is_err());
        assert!(TickRange::new(10, -10).is_err());
        assert!(TickRange::new(MIN_TICK - 1, 0).is_err());
        assert!(TickRange::new(-60, 60).is_ok());
    }

    #[test]
    fn test_contains_is_half_open() {
        let range = TickRange::new(-60, 60).unwrap();
        assert!(range.contains(-60));
        assert!(range.contains(59));
        assert!(!range.contains(60));
        assert!(!range.contains(-61));
    }

    #[test]
    fn test_five_percent_band_at_tick_zero() {
        // sqrt price 0.95 -> tick -1026 -> -1020; 1.05 -> tick 975 -> 960
        let range = centered_range(0, 60, 50).unwrap();
        assert_eq!(range, TickRange { lower: -1020, upper: 960 });
        assert!(range.lower < 0 && range.upper > 0);
        range.ensure_spacing(60).unwrap();
    }

    #[test]
    fn test_band_properties_across_ticks() {
        let mut checked = 0;
        for &width in &[10, 50, 300, 999] {
            for &spacing in &[1, 10, 60, 200] {
                for &tick in &[-400_000, -12_345, -61, 0, 59, 12_345, 400_000] {
                    let (raw_lower, raw_upper) = raw_band(tick, width).unwrap();
                    // only bands reaching at least one spacing on each side can hold the tick
                    if raw_upper - tick < spacing || tick - raw_lower < spacing {
                        continue;
                    }
                    let range = centered_range(tick, spacing, width).unwrap();

                    assert!(range.lower < range.upper);
                    assert!(range.lower >= MIN_TICK && range.upper <= MAX_TICK);
                    range.ensure_spacing(spacing).unwrap();
                    assert!(range.contains(tick));
                    // snapping moves each bound by less than one spacing
                    assert!((range.lower - raw_lower).abs() < spacing);
                    assert!((range.upper - raw_upper).abs() < spacing);
                    checked += 1;
                }
            }
        }
        // 1% bands are ~200 ticks wide on the upper side, so only 10 x 200 drops out
        assert_eq!(checked, 4 * 4 * 7 - 7);
    }

    #[test]
    fn test_narrow_band_can_exclude_its_tick() {
        // 0.3% of sqrt price is ~60 ticks each way: -61 snaps to -60, 59 snaps to 0
        assert_eq!(raw_band(0, 3).unwrap(), (-61, 59));
        let range = centered_range(0, 60, 3).unwrap();
        assert_eq!(range, TickRange { lower: -60, upper: 0 });
        assert!(!range.contains(0));

        // with one more spacing of room the tick is inside again
        let range = centered_range(0, 10, 3).unwrap();
        assert_eq!(range, TickRange { lower: -60, upper: 50 });
        assert!(range.contains(0));
    }

    #[test]
    fn test_band_clamps_at_global_bounds() {
        let range = centered_range(MAX_TICK - 10, 60, 500).unwrap();
        assert_eq!(range.upper, max_usable_tick(60).unwrap());
        let range = centered_range(MIN_TICK + 10, 60, 500).unwrap();
        assert_eq!(range.lower, min_usable_tick(60).unwrap());
    }

    #[test]
    fn test_band_collapses_when_spacing_too_wide() {
        // 0.1% half width is ~20 ticks, far below a 200 spacing
        assert!(centered_range(0, 200, 1).is_err());
    }

    #[test]
    fn test_half_width_bounds() {
        assert!(validate_half_width(0).is_err());
        assert!(validate_half_width(1000).is_err());
        assert!(validate_half_width(999).is_ok());
    }

    #[test]
    fn test_centered_range_is_idempotent() {
        assert_eq!(
            centered_range(4321, 10, 75).unwrap(),
            centered_range(4321, 10, 75).unwrap()
        );
    }
}
