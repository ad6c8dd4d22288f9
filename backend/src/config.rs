use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::feed::client::FeedEndpoints;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Database connection string for the key-value alert blob.
    pub database_url: String,

    // =========================
    // Feed configuration
    // =========================
    /// Asset id understood by the snapshot provider. Defaults to `bitcoin`.
    pub asset_id: String,

    /// Numeric asset id understood by the chart provider. Defaults to `1`,
    /// the same asset (Bitcoin) on the chart provider.
    pub chart_asset_id: String,

    pub snapshot_url: String,
    pub chart_url: String,

    /// Upper bound for a single fetch, applied both to the HTTP client and
    /// around each tick's fetch.
    pub fetch_timeout: Duration,

    // =========================
    // Alert configuration
    // =========================
    /// Minimum time between two notifications of the same alert.
    pub alert_cooldown: Duration,

    /// Period of the alert evaluation tick.
    pub alert_poll_interval: Duration,

    // =========================
    // Display configuration
    // =========================
    /// Period of the display-only price cache refresh.
    pub price_cache_interval: Duration,

    /// EMA span applied before downsampling charts. `None` disables smoothing;
    /// a configured 0 is treated as disabled as well.
    pub chart_smoothing_span: Option<usize>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://price_alerts.db?mode=rwc".to_string());

        let smoothing: usize = env_or("CHART_SMOOTHING_SPAN", 0);

        Self {
            database_url,

            asset_id: env_string("FEED_ASSET_ID", "bitcoin"),
            chart_asset_id: env_string("FEED_CHART_ASSET_ID", "1"),
            snapshot_url: env_string(
                "SNAPSHOT_URL",
                "https://api.coingecko.com/api/v3/simple/price",
            ),
            chart_url: env_string(
                "CHART_URL",
                "https://api.coinmarketcap.com/data-api/v3/cryptocurrency/detail/chart",
            ),
            fetch_timeout: Duration::from_millis(env_or("FETCH_TIMEOUT_MS", 10_000)),

            // 1 hour suppression after a trigger
            alert_cooldown: Duration::from_millis(env_or("ALERT_COOLDOWN_MS", 3_600_000)),
            alert_poll_interval: Duration::from_secs(env_or("ALERT_POLL_INTERVAL_SECS", 900)),

            price_cache_interval: Duration::from_secs(env_or("PRICE_CACHE_INTERVAL_SECS", 1_800)),
            chart_smoothing_span: (smoothing > 0).then_some(smoothing),
        }
    }

    pub fn feed_endpoints(&self) -> FeedEndpoints {
        FeedEndpoints {
            snapshot_url: self.snapshot_url.clone(),
            chart_url: self.chart_url.clone(),
            asset_id: self.asset_id.clone(),
            chart_asset_id: self.chart_asset_id.clone(),
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parses `key` from the environment, falling back to `default` when unset or
/// unparseable.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, ?default, "invalid config value; using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_parses_and_falls_back() {
        // Keys are unique to this test so parallel tests do not interfere.
        unsafe {
            std::env::set_var("PRICE_ALERTS_TEST_NUM", " 42 ");
            std::env::set_var("PRICE_ALERTS_TEST_BAD", "forty-two");
        }

        assert_eq!(env_or("PRICE_ALERTS_TEST_NUM", 7u64), 42);
        assert_eq!(env_or("PRICE_ALERTS_TEST_BAD", 7u64), 7);
        assert_eq!(env_or("PRICE_ALERTS_TEST_UNSET", 7u64), 7);
    }

    #[test]
    fn default_periods() {
        let cfg = AppConfig::from_env();
        if std::env::var("ALERT_COOLDOWN_MS").is_err() {
            assert_eq!(cfg.alert_cooldown, Duration::from_secs(3_600));
        }
        if std::env::var("ALERT_POLL_INTERVAL_SECS").is_err() {
            assert_eq!(cfg.alert_poll_interval, Duration::from_secs(15 * 60));
        }
        if std::env::var("PRICE_CACHE_INTERVAL_SECS").is_err() {
            assert_eq!(cfg.price_cache_interval, Duration::from_secs(30 * 60));
        }
        assert_eq!(cfg.feed_endpoints().asset_id, cfg.asset_id);
    }
}
