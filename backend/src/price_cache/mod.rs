pub mod poller;

use std::sync::Arc;
use std::time::Duration;

use corelib::{Currency, CurrencySnapshot, PriceSnapshot};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::feed::{FeedError, PriceFetcher, normalize_snapshot, with_timeout};

/// Latest normalized prices, for display only.
#[derive(Clone, Debug, PartialEq)]
pub struct CachedPrices {
    pub snapshot: PriceSnapshot,
    pub refreshed_at_ms: i64,
}

/// In-memory store of the latest display snapshot.
/// Last write wins; nothing here feeds alert evaluation.
#[derive(Clone, Default)]
pub struct PriceCacheStore {
    inner: Arc<RwLock<Option<CachedPrices>>>,
}

impl PriceCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, snapshot: PriceSnapshot, refreshed_at_ms: i64) {
        let mut g = self.inner.write().await;
        *g = Some(CachedPrices {
            snapshot,
            refreshed_at_ms,
        });
    }

    pub async fn snapshot(&self) -> Option<CachedPrices> {
        self.inner.read().await.clone()
    }

    pub async fn get(&self, currency: Currency) -> Option<CurrencySnapshot> {
        let g = self.inner.read().await;
        g.as_ref().and_then(|c| c.snapshot.get(currency).cloned())
    }

    /// Milliseconds since the last successful refresh.
    pub async fn age_ms(&self, now_ms: i64) -> Option<i64> {
        let g = self.inner.read().await;
        g.as_ref().map(|c| now_ms.saturating_sub(c.refreshed_at_ms))
    }

    /// Fetches, normalizes and stores a fresh snapshot. On failure the
    /// previous snapshot is kept. Returns the number of currencies cached.
    #[instrument(skip(self, fetcher), fields(asset = %fetcher.asset_id()))]
    pub async fn refresh(
        &self,
        fetcher: &dyn PriceFetcher,
        timeout: Duration,
        now_ms: i64,
    ) -> Result<usize, FeedError> {
        let raw = with_timeout(timeout, fetcher.fetch_snapshot()).await?;
        let snapshot = normalize_snapshot(&raw, fetcher.asset_id(), now_ms)?;
        let n = snapshot.len();

        self.set(snapshot, now_ms).await;
        debug!(currencies = n, "price cache refreshed");
        Ok(n)
    }
}
