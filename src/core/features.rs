//! Conversion features.

pub mod currency;
pub mod imperial;
pub mod unit_converter;

pub use currency::{RateSynchronizer, RateTable};
pub use imperial::imperial_breakdown;
pub use unit_converter::{convert, format_number, parse_input_value, ConversionRequest};
