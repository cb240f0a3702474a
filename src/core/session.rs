//! Converter session
//!
//! Holds what the user has picked (category, units, raw input) and turns it
//! into a [`ConversionView`]. Rate state stays inside the shared
//! [`RateSynchronizer`]; the session only reads it.

use std::sync::Arc;

use crate::core::catalog;
use crate::core::features::currency::{RateSynchronizer, RateTable};
use crate::core::features::imperial::imperial_breakdown;
use crate::core::features::unit_converter::{format_number, parse_input_value, ConversionRequest};
use crate::shared::error::AppResult;
use crate::shared::settings::UserPreferences;
use crate::shared::types::{
    Category, ConversionView, Unit, LAST_UPDATED_PREFIX, LOADING_PLACEHOLDER, NEVER_UPDATED_LABEL,
    SYNC_IN_PROGRESS_LABEL,
};

const INITIAL_INPUT: &str = "1";

pub struct ConverterSession {
    category: Category,
    input: String,
    from_unit: &'static Unit,
    to_unit: &'static Unit,
    max_fraction_digits: usize,
    rates: Arc<RateSynchronizer>,
}

impl ConverterSession {
    pub fn new(rates: Arc<RateSynchronizer>, preferences: &UserPreferences) -> Self {
        let category = preferences.default_category;
        let (from_unit, to_unit) = catalog::default_from_to(category);
        Self {
            category,
            input: INITIAL_INPUT.to_string(),
            from_unit,
            to_unit,
            max_fraction_digits: preferences.max_fraction_digits,
            rates,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn from_unit(&self) -> &'static Unit {
        self.from_unit
    }

    pub fn to_unit(&self) -> &'static Unit {
        self.to_unit
    }

    pub fn synchronizer(&self) -> &Arc<RateSynchronizer> {
        &self.rates
    }

    /// Switch category and reset the units to its default pair.
    ///
    /// Returns `true` when the caller should start a rate refresh.
    pub fn select_category(&mut self, category: Category) -> bool {
        let (from_unit, to_unit) = catalog::default_from_to(category);
        self.category = category;
        self.from_unit = from_unit;
        self.to_unit = to_unit;
        self.needs_rates()
    }

    /// Currency is active but no rates were ever loaded (and none are loading).
    pub fn needs_rates(&self) -> bool {
        self.category == Category::Currency && !self.rates.has_rates() && !self.rates.is_fetching()
    }

    pub fn set_value(&mut self, raw: impl Into<String>) {
        self.input = raw.into();
    }

    pub fn set_from_unit(&mut self, unit_id: &str) -> AppResult<()> {
        self.from_unit = catalog::unit(self.category, unit_id)?;
        Ok(())
    }

    pub fn set_to_unit(&mut self, unit_id: &str) -> AppResult<()> {
        self.to_unit = catalog::unit(self.category, unit_id)?;
        Ok(())
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from_unit, &mut self.to_unit);
    }

    pub async fn request_refresh(&self) -> RateTable {
        self.rates.refresh().await
    }

    pub fn request(&self) -> ConversionRequest {
        ConversionRequest {
            category: self.category,
            from_unit: self.from_unit.id.to_string(),
            to_unit: self.to_unit.id.to_string(),
            input_value: self.input.clone(),
        }
    }

    pub fn view(&self) -> AppResult<ConversionView> {
        let sync = self.rates.snapshot();

        let result = if sync.is_fetching() {
            None
        } else {
            Some(self.request().convert(sync.current_rates())?)
        };
        let formatted_result = match result {
            Some(value) => format_number(value, self.max_fraction_digits),
            None => LOADING_PLACEHOLDER.to_string(),
        };

        let sync_label = (self.category == Category::Currency).then(|| {
            if sync.is_fetching() {
                SYNC_IN_PROGRESS_LABEL.to_string()
            } else {
                format!(
                    "{}: {}",
                    LAST_UPDATED_PREFIX,
                    sync.last_update_label().unwrap_or(NEVER_UPDATED_LABEL)
                )
            }
        });

        let imperial = match self.category {
            Category::Length => Some(imperial_breakdown(self.from_unit.id, parse_input_value(&self.input))?),
            _ => None,
        };

        Ok(ConversionView {
            category: self.category,
            input: self.input.clone(),
            from_unit: self.from_unit.id,
            to_unit: self.to_unit.id,
            to_unit_name: self.to_unit.display_name,
            result,
            formatted_result,
            sync_label,
            imperial,
        })
    }
}
