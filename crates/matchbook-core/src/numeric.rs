//! Fixed-precision numeric policy.
//!
//! Prices carry at most [`PRICE_DP`] fractional digits, volumes at most
//! [`VOLUME_DP`]. Every volume mutation inside the engine goes through
//! [`round_volume`] immediately so partial fills cannot accumulate
//! sub-precision residue.

use rust_decimal::{Decimal, RoundingStrategy};

/// Maximum fractional digits for prices.
pub const PRICE_DP: u32 = 2;

/// Maximum fractional digits for volumes.
pub const VOLUME_DP: u32 = 8;

/// Round a volume to [`VOLUME_DP`] fractional digits, midpoint away
/// from zero.
pub fn round_volume(volume: Decimal) -> Decimal {
    volume.round_dp_with_strategy(VOLUME_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `true` when `value` has at most `max_dp` fractional digits.
///
/// Trailing zeros don't count: `59000.00` fits a 0-digit limit.
pub fn fits_scale(value: Decimal, max_dp: u32) -> bool {
    value.normalize().scale() <= max_dp
}
