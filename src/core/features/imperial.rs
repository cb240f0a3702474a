//! Feet-and-inches display for the length category.

use crate::core::catalog;
use crate::shared::error::AppResult;
use crate::shared::format::to_fixed;
use crate::shared::types::{Category, ImperialBreakdown};

/// Meters to inches. Kept separate from the catalog's IN factor.
const INCHES_PER_METER: f64 = 39.3701;
const INCHES_PER_FOOT: f64 = 12.0;

/// Break a length (given in `from_unit`) into whole feet plus inches.
///
/// `1 M` -> `3'3.4"`, 3.281 ft, 39.37 in. The inch remainder keeps the sign of
/// the input, so negative lengths render as e.g. `-4'-3.4"`. An infinite
/// length has no remainder and renders as `Infinity'NaN"`.
pub fn imperial_breakdown(from_unit: &str, input_value: f64) -> AppResult<ImperialBreakdown> {
    let factor = catalog::coefficient(Category::Length, from_unit)?;
    let value_in_meters = input_value / factor;

    let total_inches = value_in_meters * INCHES_PER_METER;
    let feet = (total_inches / INCHES_PER_FOOT).floor();
    let remaining_inches = total_inches % INCHES_PER_FOOT;

    Ok(ImperialBreakdown {
        total_feet: total_inches / INCHES_PER_FOOT,
        total_inches,
        combined: format!("{}'{}\"", to_fixed(feet, 0), to_fixed(remaining_inches, 1)),
    })
}
