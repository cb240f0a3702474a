use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;
use crate::shared::format::to_fixed;

// ============================================================================
// Display strings
// ============================================================================

/// Shown as the last-update label when live rates could not be fetched.
pub const OFFLINE_RATES_LABEL: &str = "使用預設匯率 (離線)";
/// Stands in for the result while a rate refresh is in flight.
pub const LOADING_PLACEHOLDER: &str = "...";
pub const SYNC_IN_PROGRESS_LABEL: &str = "匯率更新中...";
pub const LAST_UPDATED_PREFIX: &str = "最後更新";
pub const NEVER_UPDATED_LABEL: &str = "未更新";

// ============================================================================
// Category / Unit
// ============================================================================

/// Measurement domains. Closed set, never created at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Currency,
    Weight,
    Length,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Currency, Category::Weight, Category::Length];

    /// Tab label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Category::Currency => "幣值",
            Category::Weight => "重量",
            Category::Length => "長度",
        }
    }

    /// ASCII key accepted by the terminal front end.
    pub fn key(self) -> &'static str {
        match self {
            Category::Currency => "currency",
            Category::Weight => "weight",
            Category::Length => "length",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(token) || c.label() == token)
            .ok_or_else(|| AppError::Validation(format!("Unknown category: {}", token)))
    }
}

/// A unit inside one category.
///
/// `coefficient` is "units per base unit": the exchange rate against TWD for
/// currencies, the scale factor against KG / M for weight and length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Unit {
    pub id: &'static str,
    pub display_name: &'static str,
    pub coefficient: f64,
}

// ============================================================================
// Imperial breakdown
// ============================================================================

/// Feet-and-inches rendering of a length value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImperialBreakdown {
    /// Continuous feet value (`total_inches / 12`).
    pub total_feet: f64,
    pub total_inches: f64,
    /// Composite `{feet}'{inches}"` notation, e.g. `3'3.4"`.
    pub combined: String,
}

impl ImperialBreakdown {
    pub fn total_feet_label(&self) -> String {
        to_fixed(self.total_feet, 3)
    }

    pub fn total_inches_label(&self) -> String {
        to_fixed(self.total_inches, 2)
    }
}

// ============================================================================
// Session view
// ============================================================================

/// Everything a front end needs to draw the current conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionView {
    pub category: Category,
    pub input: String,
    pub from_unit: &'static str,
    pub to_unit: &'static str,
    pub to_unit_name: &'static str,
    /// `None` while a rate refresh is in flight.
    pub result: Option<f64>,
    /// Rounded result, or the loading placeholder.
    pub formatted_result: String,
    /// Currency only.
    pub sync_label: Option<String>,
    /// Length only.
    pub imperial: Option<ImperialBreakdown>,
}
