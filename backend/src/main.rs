use std::sync::Arc;

use anyhow::Context;
use backend::{
    alerts::{
        AlertService, AlertStore, KeyValueStore, LogNotifier, SqlxKeyValueStore,
        poller::run_alert_poller,
    },
    chart::ChartService,
    config::AppConfig,
    db::Db,
    feed::{HttpPriceFetcher, PriceFetcher},
    logger::init_tracing,
    metrics::counters::Counters,
    price_cache::{PriceCacheStore, poller::run_price_cache_poller},
};
use corelib::{ChartRange, Currency};

/// Connects the database, creates the key-value table and wraps it in the
/// alert store.
async fn init_store(cfg: &AppConfig) -> anyhow::Result<Arc<AlertStore>> {
    let db = Db::connect(&cfg.database_url)
        .await
        .with_context(|| format!("connect {}", cfg.database_url))?;
    db.migrate().await?;

    let kv: Arc<dyn KeyValueStore> = Arc::new(SqlxKeyValueStore::new(db.pool.clone()));
    Ok(Arc::new(AlertStore::new(kv)))
}

/// Logs a one-off chart load so a misconfigured chart endpoint shows up at
/// startup rather than on first use.
async fn check_chart_endpoint(fetcher: Arc<dyn PriceFetcher>, cfg: AppConfig) {
    let charts = ChartService::new(fetcher, cfg.fetch_timeout, cfg.chart_smoothing_span);
    match charts.load(ChartRange::Day, Currency::BASE).await {
        Ok(series) => tracing::info!(
            points = series.points.len(),
            source_len = series.source_len,
            change_pct = ?series.change_percent(),
            "chart endpoint reachable"
        ),
        Err(e) => tracing::warn!(error = %e, "chart endpoint check failed"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let is_production = std::env::var("APP_ENV").unwrap_or_default() == "production";
    init_tracing(is_production);

    tracing::info!("Starting price alert backend...");

    let cfg = AppConfig::from_env();
    let counters = Counters::default();

    let store = init_store(&cfg).await?;
    tracing::info!(alerts = store.load().await.len(), "alert store ready");

    let fetcher: Arc<dyn PriceFetcher> =
        Arc::new(HttpPriceFetcher::new(cfg.feed_endpoints(), cfg.fetch_timeout)?);

    let alert_service = Arc::new(AlertService::new(
        fetcher.clone(),
        store,
        Arc::new(LogNotifier),
        cfg.alert_cooldown,
        cfg.fetch_timeout,
        counters.clone(),
    ));

    let cache = PriceCacheStore::new();

    tokio::spawn(run_alert_poller(alert_service, cfg.alert_poll_interval));
    tokio::spawn(run_price_cache_poller(
        fetcher.clone(),
        cache,
        cfg.price_cache_interval,
        cfg.fetch_timeout,
        counters.clone(),
    ));
    tokio::spawn(check_chart_endpoint(fetcher, cfg.clone()));

    tokio::signal::ctrl_c().await?;
    tracing::info!(counters = ?counters.snapshot(), "Shutdown signal received");

    Ok(())
}
