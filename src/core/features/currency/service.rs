use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::core::catalog;
use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::CurrencySettings;
use crate::shared::types::{Category, OFFLINE_RATES_LABEL};

use super::types::{RateTable, RatesApiResponse, SyncState};

/// Where live currency rates come from.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self) -> AppResult<HashMap<String, f64>>;
}

/// open.er-api style endpoint over HTTP.
pub struct HttpRateSource {
    http: Client,
    url: String,
}

impl HttpRateSource {
    pub fn new(url: impl Into<String>, user_agent: &str) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn from_settings(settings: &CurrencySettings) -> AppResult<Self> {
        Self::new(settings.api_url.clone(), &settings.user_agent)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_rates(&self) -> AppResult<HashMap<String, f64>> {
        debug!(url = %self.url, "[Currency] Fetching rates");
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AppError::Network(format!(
                "Failed to fetch rates: {}",
                resp.status()
            )));
        }

        let json: RatesApiResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid response: {}", e)))?;

        if json.result != "success" {
            return Err(AppError::Network(format!(
                "API reported failure: {}",
                json.error_type.as_deref().unwrap_or(&json.result)
            )));
        }

        json.rates
            .ok_or_else(|| AppError::Validation("Response has no rates mapping".into()))
    }
}

/// Owns the process-wide [`SyncState`].
///
/// Share it behind an `Arc`. `refresh` is the only writer; concurrent
/// refreshes are not coalesced and the last one to finish wins.
pub struct RateSynchronizer {
    source: Box<dyn RateSource>,
    state: RwLock<SyncState>,
}

impl RateSynchronizer {
    pub fn new(source: impl RateSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            state: RwLock::new(SyncState::default()),
        }
    }

    pub fn from_settings(settings: &CurrencySettings) -> AppResult<Self> {
        Ok(Self::new(HttpRateSource::from_settings(settings)?))
    }

    /// Fetch live rates once, falling back to the catalog defaults on any
    /// failure. Never fails.
    pub async fn refresh(&self) -> RateTable {
        let _fetching = FetchGuard::begin(&self.state);

        let (table, label) = match self.source.fetch_rates().await {
            Ok(rates) => {
                let table = RateTable::live(rates);
                let missing = table.missing_codes(
                    catalog::units_for(Category::Currency).iter().map(|u| u.id),
                );
                if !missing.is_empty() {
                    warn!(?missing, "[Currency] Live rates lack catalog currencies; treating them as 1");
                }
                info!(entries = table.len(), "[Currency] Live rates refreshed");
                (table, Local::now().format("%H:%M:%S").to_string())
            }
            Err(e) => {
                warn!(error = %e, "[Currency] Failed to fetch rates, using fallback");
                (catalog::fallback_rates(), OFFLINE_RATES_LABEL.to_string())
            }
        };

        {
            let mut state = write_state(&self.state);
            state.current_rates = Some(table.clone());
            state.last_update_label = Some(label);
        }

        table
    }

    /// Run [`refresh`](Self::refresh) on the runtime. `is_fetching` is already
    /// raised when this returns, before the task is first polled.
    pub fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<RateTable> {
        write_state(&self.state).is_fetching = true;
        let sync = Arc::clone(self);
        tokio::spawn(async move { sync.refresh().await })
    }

    pub fn snapshot(&self) -> SyncState {
        read_state(&self.state).clone()
    }

    pub fn is_fetching(&self) -> bool {
        read_state(&self.state).is_fetching
    }

    pub fn current_rates(&self) -> Option<RateTable> {
        read_state(&self.state).current_rates.clone()
    }

    pub fn has_rates(&self) -> bool {
        read_state(&self.state).current_rates.is_some()
    }
}

/// Holds `is_fetching` up for the lifetime of one refresh.
struct FetchGuard<'a> {
    state: &'a RwLock<SyncState>,
}

impl<'a> FetchGuard<'a> {
    fn begin(state: &'a RwLock<SyncState>) -> Self {
        write_state(state).is_fetching = true;
        Self { state }
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        write_state(self.state).is_fetching = false;
    }
}

fn read_state(lock: &RwLock<SyncState>) -> RwLockReadGuard<'_, SyncState> {
    lock.read().unwrap_or_else(|poisoned| {
        warn!("[Currency] Sync state lock poisoned, recovering");
        poisoned.into_inner()
    })
}

fn write_state(lock: &RwLock<SyncState>) -> RwLockWriteGuard<'_, SyncState> {
    lock.write().unwrap_or_else(|poisoned| {
        warn!("[Currency] Sync state lock poisoned, recovering");
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::currency::RateProvenance;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    struct StaticSource(HashMap<String, f64>);

    #[async_trait]
    impl RateSource for StaticSource {
        async fn fetch_rates(&self) -> AppResult<HashMap<String, f64>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl RateSource for FailingSource {
        async fn fetch_rates(&self) -> AppResult<HashMap<String, f64>> {
            Err(AppError::Network("connection refused".into()))
        }
    }

    struct GatedSource {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl RateSource for GatedSource {
        async fn fetch_rates(&self) -> AppResult<HashMap<String, f64>> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(HashMap::from([("TWD".to_string(), 1.0)]))
        }
    }

    /// Succeeds until `fail` is flipped.
    struct ToggleSource {
        fail: Arc<AtomicBool>,
    }

    #[async_trait]
    impl RateSource for ToggleSource {
        async fn fetch_rates(&self) -> AppResult<HashMap<String, f64>> {
            if self.fail.load(Ordering::SeqCst) {
                Err(AppError::Network("timed out".into()))
            } else {
                Ok(HashMap::from([("TWD".to_string(), 1.0), ("USD".to_string(), 0.0312)]))
            }
        }
    }

    #[test]
    fn test_initial_state_is_empty() {
        let sync = RateSynchronizer::new(FailingSource);
        let state = sync.snapshot();
        assert!(!state.is_fetching());
        assert!(state.last_update_label().is_none());
        assert!(state.current_rates().is_none());
        assert!(!sync.has_rates());
    }

    #[tokio::test]
    async fn test_refresh_adopts_live_rates() {
        let sync = RateSynchronizer::new(StaticSource(HashMap::from([
            ("TWD".to_string(), 1.0),
            ("USD".to_string(), 0.0315),
        ])));

        let table = sync.refresh().await;
        assert_eq!(table.provenance(), RateProvenance::Live);
        assert_eq!(table.get("USD"), Some(0.0315));

        let state = sync.snapshot();
        assert!(!state.is_fetching());
        assert_eq!(state.current_rates(), Some(&table));
        let label = state.last_update_label().unwrap();
        assert_ne!(label, OFFLINE_RATES_LABEL);
        assert_eq!(label.len(), "12:34:56".len());
    }

    #[tokio::test]
    async fn test_refresh_failure_uses_catalog_defaults() {
        let sync = RateSynchronizer::new(FailingSource);

        let table = sync.refresh().await;
        assert_eq!(table, catalog::fallback_rates());

        let state = sync.snapshot();
        assert!(!state.is_fetching());
        assert_eq!(state.last_update_label(), Some(OFFLINE_RATES_LABEL));
        assert_eq!(state.current_rates(), Some(&table));
    }

    #[tokio::test]
    async fn test_is_fetching_visible_while_in_flight() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let sync = Arc::new(RateSynchronizer::new(GatedSource {
            started: started.clone(),
            release: release.clone(),
        }));

        let task = tokio::spawn({
            let sync = sync.clone();
            async move { sync.refresh().await }
        });

        started.notified().await;
        assert!(sync.is_fetching());
        assert!(!sync.has_rates());

        release.notify_one();
        let table = task.await.unwrap();
        assert!(table.is_live());
        assert!(!sync.is_fetching());
    }

    #[tokio::test]
    async fn test_spawn_refresh_marks_fetching_up_front() {
        let sync = Arc::new(RateSynchronizer::new(StaticSource(HashMap::from([(
            "TWD".to_string(),
            1.0,
        )]))));

        let task = sync.spawn_refresh();
        assert!(sync.is_fetching());

        assert!(task.await.unwrap().is_live());
        assert!(!sync.is_fetching());
        assert!(sync.has_rates());
    }

    #[tokio::test]
    async fn test_later_refresh_overwrites_earlier() {
        let fail = Arc::new(AtomicBool::new(false));
        let sync = RateSynchronizer::new(ToggleSource { fail: fail.clone() });

        assert!(sync.refresh().await.is_live());

        fail.store(true, Ordering::SeqCst);
        let table = sync.refresh().await;
        assert!(!table.is_live());
        assert_eq!(sync.current_rates(), Some(catalog::fallback_rates()));
        assert_eq!(sync.snapshot().last_update_label(), Some(OFFLINE_RATES_LABEL));
    }
}
