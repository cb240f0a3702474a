pub mod api;
pub mod core;
pub mod shared;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::sync::mpsc;

use crate::api::commands::{self, Command, Outcome};
use crate::api::render;
use crate::core::catalog;
use crate::core::features::currency::RateSynchronizer;
use crate::core::session::ConverterSession;
use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::AppSettings;

/// Log filter variable, read the same way as `EnvFilter::from_default_env`.
pub const LOG_ENV: &str = tracing_subscriber::EnvFilter::DEFAULT_ENV;
const DEFAULT_LOG_FILTER: &str = "warn";

/// Interactive terminal converter. Reads commands from stdin until EOF or `quit`.
pub async fn run() -> AppResult<()> {
    init_tracing()?;
    catalog::validate_catalog()?;

    let settings = AppSettings::load().await.unwrap_or_else(|e| {
        tracing::warn!("Failed to load settings: {}", e);
        AppSettings::default()
    });
    tracing::debug!(url = %settings.currency.api_url, "rates endpoint");

    let sync = Arc::new(RateSynchronizer::from_settings(&settings.currency)?);
    let mut session = ConverterSession::new(sync, &settings.preferences);

    let (refreshed_tx, mut refreshed_rx) = mpsc::unbounded_channel::<()>();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    emit(&mut stdout, "Unit Converter\n").await?;
    emit(&mut stdout, &render::render_help()).await?;

    if session.needs_rates() {
        spawn_refresh(session.synchronizer(), &refreshed_tx);
    }
    emit_view(&mut stdout, &session).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };

                match line.parse::<Command>().and_then(|command| commands::apply(&mut session, command)) {
                    Ok(Outcome::Quit) => break,
                    Ok(Outcome::Help) => emit(&mut stdout, &render::render_help()).await?,
                    Ok(Outcome::ListUnits) => {
                        let units = render::render_units(
                            session.category(),
                            session.from_unit().id,
                            session.to_unit().id,
                        );
                        emit(&mut stdout, &units).await?;
                    }
                    Ok(Outcome::RefreshRequested) => {
                        spawn_refresh(session.synchronizer(), &refreshed_tx);
                        emit_view(&mut stdout, &session).await?;
                    }
                    Ok(Outcome::Render) => emit_view(&mut stdout, &session).await?,
                    Err(e) => emit(&mut stdout, &format!("! {}\n", e)).await?,
                }
            }
            Some(()) = refreshed_rx.recv() => emit_view(&mut stdout, &session).await?,
        }
    }

    Ok(())
}

/// Refresh in the background; the loop re-renders once it lands.
fn spawn_refresh(sync: &Arc<RateSynchronizer>, refreshed: &mpsc::UnboundedSender<()>) {
    let refresh = sync.spawn_refresh();
    let refreshed = refreshed.clone();
    tokio::spawn(async move {
        match refresh.await {
            Ok(table) => tracing::debug!(provenance = ?table.provenance(), "[run] refresh finished"),
            Err(e) => tracing::warn!("[run] refresh task failed: {}", e),
        }
        let _ = refreshed.send(());
    });
}

async fn emit_view(out: &mut Stdout, session: &ConverterSession) -> AppResult<()> {
    match session.view() {
        Ok(view) => emit(out, &render::render_view(&view)).await,
        Err(e) => emit(out, &format!("! {}\n", e)).await,
    }
}

async fn emit(out: &mut Stdout, text: &str) -> AppResult<()> {
    out.write_all(text.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

/// Logs go to stderr so they never interleave with the converter display.
fn init_tracing() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(LOG_ENV).ok().as_deref()))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::System(format!("failed to initialize tracing subscriber: {}", e)))
}

/// Directives from the log variable, or `warn` when unset or unparseable.
fn log_filter(directives: Option<&str>) -> tracing_subscriber::EnvFilter {
    directives
        .and_then(|d| tracing_subscriber::EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER))
}
