//! Display price cache poller.
//!
//! Periodically refreshes the `PriceCacheStore`; failures keep the previous
//! snapshot and are retried on the next period.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use crate::feed::PriceFetcher;
use crate::metrics::counters::{Counters, bump};
use crate::price_cache::PriceCacheStore;
use crate::time::now_ms;

pub async fn run_price_cache_poller(
    fetcher: Arc<dyn PriceFetcher>,
    cache: PriceCacheStore,
    every: Duration,
    fetch_timeout: Duration,
    counters: Counters,
) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        asset = %fetcher.asset_id(),
        every_secs = every.as_secs(),
        "price cache poller started"
    );

    loop {
        ticker.tick().await;

        match cache.refresh(fetcher.as_ref(), fetch_timeout, now_ms()).await {
            Ok(n) => {
                bump(&counters.cache_refreshes, 1);
                info!(currencies = n, "display prices refreshed");
            }
            Err(e) => {
                bump(&counters.fetch_failures, 1);
                warn!(error = %e, "display price refresh failed; keeping previous snapshot");
            }
        }
    }
}
