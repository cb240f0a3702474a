//! Built-in unit catalog
//!
//! One ordered unit table per [`Category`]. The first two entries of each table
//! are the default from/to pair shown when the category is activated.

use std::collections::HashSet;

use crate::core::features::currency::RateTable;
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{Category, Unit};

// Currency (base: TWD)
const CURRENCY_UNITS: &[Unit] = &[
    Unit { id: "TWD", display_name: "台幣 (TWD)", coefficient: 1.0 },
    Unit { id: "USD", display_name: "美金 (USD)", coefficient: 0.033 },
    Unit { id: "JPY", display_name: "日幣 (JPY)", coefficient: 4.8 },
    Unit { id: "CNY", display_name: "人民幣 (CNY)", coefficient: 0.23 },
    Unit { id: "EUR", display_name: "歐元 (EUR)", coefficient: 0.031 },
    Unit { id: "KRW", display_name: "韓元 (KRW)", coefficient: 45.0 },
    Unit { id: "HKD", display_name: "港幣 (HKD)", coefficient: 0.26 },
];

// Weight (base: kilograms)
const WEIGHT_UNITS: &[Unit] = &[
    Unit { id: "KG", display_name: "公斤 (KG)", coefficient: 1.0 },
    Unit { id: "LB", display_name: "磅 (LB)", coefficient: 2.20462 },
];

// Length (base: meters)
const LENGTH_UNITS: &[Unit] = &[
    Unit { id: "M", display_name: "公尺 (M)", coefficient: 1.0 },
    Unit { id: "CM", display_name: "公分 (CM)", coefficient: 100.0 },
    Unit { id: "FT", display_name: "英尺 (FT)", coefficient: 3.28084 },
    Unit { id: "IN", display_name: "英寸 (IN)", coefficient: 39.3701 },
];

pub fn units_for(category: Category) -> &'static [Unit] {
    match category {
        Category::Currency => CURRENCY_UNITS,
        Category::Weight => WEIGHT_UNITS,
        Category::Length => LENGTH_UNITS,
    }
}

/// First two units of the category.
pub fn default_from_to(category: Category) -> (&'static Unit, &'static Unit) {
    let units = units_for(category);
    (&units[0], &units[1])
}

pub fn unit(category: Category, unit_id: &str) -> AppResult<&'static Unit> {
    units_for(category)
        .iter()
        .find(|u| u.id == unit_id)
        .ok_or_else(|| AppError::unknown_unit(category, unit_id))
}

pub fn coefficient(category: Category, unit_id: &str) -> AppResult<f64> {
    unit(category, unit_id).map(|u| u.coefficient)
}

/// Default currency rates, used whenever live rates are unavailable.
pub fn fallback_rates() -> RateTable {
    RateTable::fallback(
        CURRENCY_UNITS
            .iter()
            .map(|u| (u.id.to_string(), u.coefficient))
            .collect(),
    )
}

/// Checked once at startup: at least two units per category, unique ids,
/// finite positive coefficients.
pub fn validate_catalog() -> AppResult<()> {
    for category in Category::ALL {
        let units = units_for(category);
        if units.len() < 2 {
            return Err(AppError::System(format!(
                "Category {} needs at least two units, has {}",
                category.key(),
                units.len()
            )));
        }

        let mut seen = HashSet::new();
        for u in units {
            if !seen.insert(u.id) {
                return Err(AppError::System(format!(
                    "Duplicate unit id {} in category {}",
                    u.id,
                    category.key()
                )));
            }
            if !u.coefficient.is_finite() || u.coefficient <= 0.0 {
                return Err(AppError::System(format!(
                    "Unit {} has invalid coefficient {}",
                    u.id, u.coefficient
                )));
            }
        }
    }
    Ok(())
}
