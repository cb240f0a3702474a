pub mod error;
pub mod format;
pub mod settings;
pub mod types;

pub use error::{AppError, AppResult};
