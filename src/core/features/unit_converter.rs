use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::catalog;
use crate::core::features::currency::RateTable;
use crate::shared::error::AppResult;
use crate::shared::format::to_rounded;
use crate::shared::types::Category;

// ============================================================================
// Conversion Engine
// ============================================================================

/// One pending conversion as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub category: Category,
    pub from_unit: String,
    pub to_unit: String,
    /// Raw text from the input box.
    pub input_value: String,
}

impl ConversionRequest {
    pub fn convert(&self, rates: Option<&RateTable>) -> AppResult<f64> {
        convert(
            self.category,
            &self.from_unit,
            &self.to_unit,
            &self.input_value,
            rates,
        )
    }
}

/// `(value / from) * to`, with coefficients taken from `rates` for currencies
/// and from the catalog for weight and length.
///
/// Unparseable input converts as `0`. Currency codes missing from `rates`
/// (or no table at all) use `1`. Weight/length ids must exist in the catalog.
pub fn convert(
    category: Category,
    from_unit: &str,
    to_unit: &str,
    input_value: &str,
    rates: Option<&RateTable>,
) -> AppResult<f64> {
    let value = parse_input_value(input_value);
    let (from_coefficient, to_coefficient) = resolve_coefficients(category, from_unit, to_unit, rates)?;

    // Same unit, no conversion needed
    if from_unit == to_unit {
        return Ok(value);
    }

    let result = (value / from_coefficient) * to_coefficient;
    tracing::trace!(
        category = category.key(),
        "[convert] {} {} -> {} {} (from: {}, to: {})",
        value, from_unit, result, to_unit, from_coefficient, to_coefficient
    );
    Ok(result)
}

fn resolve_coefficients(
    category: Category,
    from_unit: &str,
    to_unit: &str,
    rates: Option<&RateTable>,
) -> AppResult<(f64, f64)> {
    match category {
        Category::Currency => {
            let lookup = |code: &str| rates.map_or(1.0, |table| table.coefficient(code));
            Ok((lookup(from_unit), lookup(to_unit)))
        }
        Category::Weight | Category::Length => Ok((
            catalog::coefficient(category, from_unit)?,
            catalog::coefficient(category, to_unit)?,
        )),
    }
}

// Longest numeric prefix, after leading whitespace: "12abc" -> 12, "1e3x" -> 1000
static RE_NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("Failed to compile numeric prefix pattern")
});

/// Lenient number parsing for the input box. Never fails; anything without a
/// numeric prefix (and NaN) becomes `0`.
pub fn parse_input_value(raw: &str) -> f64 {
    let parsed = RE_NUMERIC_PREFIX
        .find(raw.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0);

    if parsed.is_nan() || parsed == 0.0 {
        0.0
    } else {
        parsed
    }
}

// ============================================================================
// Formatting
// ============================================================================

// Helper to add thousands separators to a run of digits
fn add_thousands_separators(s: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, ch) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*ch);
    }
    result.chars().rev().collect()
}

/// Thousands separators, at most `max_fraction_digits` decimals, trailing
/// zeros stripped. 1234567.891234 (4) -> "1,234,567.8912", 12.500 -> "12.5".
pub fn format_number(value: f64, max_fraction_digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() { "∞".to_string() } else { "-∞".to_string() };
    }

    let fixed = to_rounded(value.abs(), max_fraction_digits);
    let (integer_part, fraction_part) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, fraction.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut formatted = String::new();
    // Values that round to zero print as "0", not "-0"
    if value.is_sign_negative() && (integer_part != "0" || !fraction_part.is_empty()) {
        formatted.push('-');
    }
    formatted.push_str(&add_thousands_separators(integer_part));
    if !fraction_part.is_empty() {
        formatted.push('.');
        formatted.push_str(fraction_part);
    }
    formatted
}
