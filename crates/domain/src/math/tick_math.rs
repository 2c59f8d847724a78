//! Tick <-> sqrt price conversions on the 1.0001 price grid.
//!
//! `sqrt_price_x96 = sqrt(1.0001^tick) * 2^96`, bit-exact with the pool's own
//! tick math so that boundaries computed here land on the same ticks the pool uses.

use super::full_math::Q128;
use crate::error::MathError;
use primitive_types::U256;

/// Minimum tick supported by the pool.
pub const MIN_TICK: i32 = -887_272;
/// Maximum tick supported by the pool.
pub const MAX_TICK: i32 = 887_272;

/// Sqrt price at `MIN_TICK` (4295128739).
pub const MIN_SQRT_RATIO: U256 = U256([4_295_128_739, 0, 0, 0]);
/// Sqrt price at `MAX_TICK` (1461446703485210103287273052203988822378723970342).
pub const MAX_SQRT_RATIO: U256 = U256([0x5d95_1d52_6398_8d26, 0xefd1_fc6a_5064_8849, 0xfffd_8963, 0]);

/// `sqrt(1.0001^-(2^i))` in Q128.128 for each bit of the absolute tick.
const TICK_FACTORS: [(u32, u128); 19] = [
    (0x2, 0xfff9_7272_373d_4132_59a4_6990_580e_213a),
    (0x4, 0xfff2_e50f_5f65_6932_ef12_357c_f3c7_fdcc),
    (0x8, 0xffe5_caca_7e10_e4e6_1c36_24ea_a094_1cd0),
    (0x10, 0xffcb_9843_d60f_6159_c9db_5883_5c92_6644),
    (0x20, 0xff97_3b41_fa98_c081_472e_6896_dfb2_54c0),
    (0x40, 0xff2e_a164_66c9_6a38_43ec_78b3_26b5_2861),
    (0x80, 0xfe5d_ee04_6a99_a2a8_11c4_61f1_969c_3053),
    (0x100, 0xfcbe_86c7_900a_88ae_dcff_c83b_479a_a3a4),
    (0x200, 0xf987_a725_3ac4_1317_6f2b_074c_f781_5e54),
    (0x400, 0xf339_2b08_22b7_0005_940c_7a39_8e4b_70f3),
    (0x800, 0xe715_9475_a2c2_9b74_43b2_9c7f_a6e8_89d9),
    (0x1000, 0xd097_f3bd_fd20_22b8_845a_d8f7_92aa_5825),
    (0x2000, 0xa9f7_4646_2d87_0fdf_8a65_dc1f_90e0_61e5),
    (0x4000, 0x70d8_69a1_56d2_a1b8_90bb_3df6_2baf_32f7),
    (0x8000, 0x31be_135f_97d0_8fd9_8123_1505_542f_cfa6),
    (0x10000, 0x09aa_508b_5b7a_84e1_c677_de54_f3e9_9bc9),
    (0x20000, 0x005d_6af8_dedb_8119_6699_c329_225e_e604),
    (0x40000, 0x0000_2216_e584_f5fa_1ea9_2604_1bed_fe98),
    (0x80000, 0x0000_0000_048a_1703_91f7_dc42_444e_8fa2),
];

const SQRT_FACTOR_ONE: u128 = 0xfffc_b933_bd6f_ad37_aa2d_162d_1a59_4001;

/// Returns `sqrt(1.0001^tick) * 2^96`, rounded up.
///
/// # Errors
/// `TickOutOfBounds` when `|tick| > MAX_TICK`.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256, MathError> {
    let abs_tick = tick.unsigned_abs();
    if abs_tick > MAX_TICK.unsigned_abs() {
        return Err(MathError::TickOutOfBounds(tick));
    }

    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::from(SQRT_FACTOR_ONE)
    } else {
        Q128
    };
    for (bit, factor) in TICK_FACTORS {
        if abs_tick & bit != 0 {
            // ratio <= 2^128 and factor < 2^128, the product fits in 256 bits
            ratio = (ratio * U256::from(factor)) >> 128;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.96, rounding up so the result is never below the true value
    let low_mask = U256::from(u32::MAX);
    let round = if (ratio & low_mask).is_zero() {
        U256::zero()
    } else {
        U256::one()
    };
    Ok((ratio >> 32) + round)
}

/// Returns the greatest tick whose sqrt price is `<= sqrt_price_x96`.
///
/// # Errors
/// `SqrtPriceOutOfBounds` unless `MIN_SQRT_RATIO <= sqrt_price_x96 < MAX_SQRT_RATIO`.
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U256) -> Result<i32, MathError> {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        return Err(MathError::SqrtPriceOutOfBounds(sqrt_price_x96.to_string()));
    }

    let mut low = MIN_TICK;
    let mut high = MAX_TICK;
    while low < high {
        // upper midpoint so the loop always makes progress
        let mid = low + (high - low + 1) / 2;
        if get_sqrt_ratio_at_tick(mid)? <= sqrt_price_x96 {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    Ok(low)
}

/// Lowest tick that is a multiple of `tick_spacing` and within bounds.
pub fn min_usable_tick(tick_spacing: i32) -> Result<i32, MathError> {
    if tick_spacing <= 0 {
        return Err(MathError::InvalidTickSpacing(tick_spacing));
    }
    Ok(MIN_TICK / tick_spacing * tick_spacing)
}

/// Highest tick that is a multiple of `tick_spacing` and within bounds.
pub fn max_usable_tick(tick_spacing: i32) -> Result<i32, MathError> {
    if tick_spacing <= 0 {
        return Err(MathError::InvalidTickSpacing(tick_spacing));
    }
    Ok(MAX_TICK / tick_spacing * tick_spacing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::full_math::Q96;

    #[test]
    fn test_sqrt_ratio_at_tick_zero_is_q96() {
        assert_eq!(get_sqrt_ratio_at_tick(0).unwrap(), Q96);
    }

    #[test]
    fn test_sqrt_ratio_at_bounds() {
        assert_eq!(get_sqrt_ratio_at_tick(MIN_TICK).unwrap(), MIN_SQRT_RATIO);
        assert_eq!(get_sqrt_ratio_at_tick(MAX_TICK).unwrap(), MAX_SQRT_RATIO);
        assert!(get_sqrt_ratio_at_tick(MAX_TICK + 1).is_err());
        assert!(get_sqrt_ratio_at_tick(MIN_TICK - 1).is_err());
    }

    #[test]
    fn test_sqrt_ratio_is_monotonic() {
        let ticks = [-50_000, -1_000, -1, 0, 1, 1_000, 50_000];
        let ratios: Vec<U256> = ticks
            .iter()
            .map(|t| get_sqrt_ratio_at_tick(*t).unwrap())
            .collect();
        assert!(ratios.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_tick_at_sqrt_ratio_inverts() {
        for tick in [-887_000, -20_000, -61, -1, 0, 1, 59, 20_000, 887_000] {
            let ratio = get_sqrt_ratio_at_tick(tick).unwrap();
            assert_eq!(get_tick_at_sqrt_ratio(ratio).unwrap(), tick);
            // one unit below the boundary belongs to the previous tick
            assert_eq!(get_tick_at_sqrt_ratio(ratio - U256::one()).unwrap(), tick - 1);
        }
    }

    #[test]
    fn test_tick_at_sqrt_ratio_bounds() {
        assert_eq!(get_tick_at_sqrt_ratio(MIN_SQRT_RATIO).unwrap(), MIN_TICK);
        assert!(get_tick_at_sqrt_ratio(MIN_SQRT_RATIO - U256::one()).is_err());
        assert!(get_tick_at_sqrt_ratio(MAX_SQRT_RATIO).is_err());
        assert_eq!(
            get_tick_at_sqrt_ratio(MAX_SQRT_RATIO - U256::one()).unwrap(),
            MAX_TICK - 1
        );
    }

    #[test]
    fn test_usable_ticks() {
        assert_eq!(min_usable_tick(60).unwrap(), -887_220);
        assert_eq!(max_usable_tick(60).unwrap(), 887_220);
        assert!(min_usable_tick(0).is_err());
    }
}
