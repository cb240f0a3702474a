//! Terminal front end
//!
//! - `commands`: parses input lines and applies them to a session
//! - `render`: turns session views into text
//!
//! Holds no conversion logic of its own.

pub mod commands;
pub mod render;
