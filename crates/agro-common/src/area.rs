//! Area invariants for farms and their cultivations
//!
//! Areas are hectares held as [`Decimal`] so that sums such as
//! `0.1 + 0.2` compare exactly against a total of `0.3`.

use rust_decimal::Decimal;

/// Maximum number of fractional digits accepted for an area.
pub const MAX_AREA_SCALE: u32 = 2;

/// A farm is consistent when cultivable plus preserved area does not
/// exceed its total area.
///
/// An overflowing sum is treated as inconsistent.
pub fn farm_area_is_consistent(total: Decimal, cultivable: Decimal, preserved: Decimal) -> bool {
    cultivable
        .checked_add(preserved)
        .is_some_and(|used| used <= total)
}

/// A new cultivation fits when the farm's already-cultivated area plus
/// the new area does not exceed its cultivable area.
///
/// The boundary is inclusive.
pub fn cultivation_fits(cultivable: Decimal, already_cultivated: Decimal, new_area: Decimal) -> bool {
    already_cultivated
        .checked_add(new_area)
        .is_some_and(|used| used <= cultivable)
}

/// True when `value` carries no more than two significant fractional digits.
///
/// Trailing zeros do not count: `1.500` is accepted.
pub fn has_at_most_two_decimals(value: &Decimal) -> bool {
    value.normalize().scale() <= MAX_AREA_SCALE
}
