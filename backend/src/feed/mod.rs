//! Upstream price feed: transport, wire types and normalization.

pub mod client;
pub mod errors;
pub mod normalizer;
pub mod types;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use corelib::{ChartRange, Currency};

pub use client::HttpPriceFetcher;
pub use errors::FeedError;
pub use normalizer::{normalize_series, normalize_snapshot};
pub use types::{RawChartPayload, RawChartPoint, RawPriceSnapshot};

/// Source of raw price data. Payloads stay opaque until normalized.
#[async_trait]
pub trait PriceFetcher: Send + Sync {
    /// Asset id the snapshot payload is keyed by.
    fn asset_id(&self) -> &str;

    async fn fetch_snapshot(&self) -> Result<RawPriceSnapshot, FeedError>;

    /// Historical series for `range`, quoted in `currency`. The range also
    /// carries the sampling interval hint sent to the provider.
    async fn fetch_series(
        &self,
        range: ChartRange,
        currency: Currency,
    ) -> Result<RawChartPayload, FeedError>;
}

/// Bounds a fetch so a hung upstream cannot stall a tick.
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, FeedError>
where
    F: Future<Output = Result<T, FeedError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => Err(FeedError::Timeout(limit)),
    }
}
