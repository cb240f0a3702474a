use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::shared::error::{AppError, AppResult};
use crate::shared::types::Category;

pub const DEFAULT_RATES_URL: &str = "https://open.er-api.com/v6/latest/TWD";
pub const RATES_URL_ENV: &str = "UNIT_CONVERTER_RATES_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub currency: CurrencySettings,
    pub preferences: UserPreferences,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencySettings {
    pub api_url: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub default_category: Category,
    pub max_fraction_digits: usize,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_RATES_URL.to_string(),
            user_agent: "unit-converter/currency".to_string(),
        }
    }
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            default_category: Category::Currency,
            max_fraction_digits: 4,
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            currency: CurrencySettings::default(),
            preferences: UserPreferences::default(),
        }
    }
}

impl AppSettings {
    pub fn get_settings_path() -> AppResult<PathBuf> {
        ProjectDirs::from("com", "antigravity", "unit-converter")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| AppError::System("Failed to determine config directory".to_string()))
    }

    /// Settings from the user's config dir, then environment overrides.
    pub async fn load() -> AppResult<Self> {
        let path = Self::get_settings_path()?;
        let mut settings = Self::load_from(&path).await?;
        settings.apply_rates_url_override(std::env::var(RATES_URL_ENV).ok());
        Ok(settings)
    }

    /// A missing file yields the defaults; nothing is written back.
    pub async fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Self = serde_json::from_str(&content)
            .map_err(|e| AppError::Validation(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    fn apply_rates_url_override(&mut self, value: Option<String>) {
        if let Some(url) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            tracing::debug!(%url, "rates endpoint overridden from {}", RATES_URL_ENV);
            self.currency.api_url = url;
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.currency.api_url.trim().is_empty() {
            return Err(AppError::Validation("currency.api_url must not be empty".to_string()));
        }
        Ok(())
    }
}
