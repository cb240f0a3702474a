//! Currency rates
//!
//! Live rates are pulled from an exchange-rate endpoint through [`RateSynchronizer`].
//! Any failure is absorbed by falling back to the catalog's built-in rates.

pub mod service;
pub mod types;

pub use service::{HttpRateSource, RateSource, RateSynchronizer};
pub use types::{RateProvenance, RateTable, RatesApiResponse, SyncState};
