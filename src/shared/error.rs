use thiserror::Error;
use serde::Serialize;

use crate::shared::types::Category;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "detail")]
pub enum AppError {
    /// A unit id that the catalog does not list for the category.
    /// Only reachable through a miswired front end.
    #[error("Unknown unit '{unit}' in category {category:?}")]
    UnknownUnit { category: Category, unit: String },

    #[error("Network Error: {0}")]
    Network(String),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("I/O Error: {0}")]
    Io(String),

    #[error("System Error: {0}")]
    System(String),
}

impl AppError {
    pub fn unknown_unit(category: Category, unit: impl Into<String>) -> Self {
        AppError::UnknownUnit {
            category,
            unit: unit.into(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("Serialization error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
