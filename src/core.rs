//! Conversion core
//!
//! - `catalog`: built-in units per category
//! - `features`: conversion engine, currency rate sync, imperial display
//! - `session`: pending conversion state driven by a front end

pub mod catalog;
pub mod features;
pub mod session;
