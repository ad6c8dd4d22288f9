use std::time::Duration;

use async_trait::async_trait;
use corelib::{ChartRange, Currency};
use reqwest::Client;
use tracing::{debug, instrument};

use super::errors::FeedError;
use super::types::{RawChartPayload, RawPriceSnapshot};
use super::PriceFetcher;

/// Endpoints and identifiers for [`HttpPriceFetcher`].
#[derive(Clone, Debug)]
pub struct FeedEndpoints {
    /// Simple-price endpoint (multi-currency snapshot).
    pub snapshot_url: String,
    /// Historical chart endpoint.
    pub chart_url: String,
    /// Asset id used by the snapshot provider (e.g. `bitcoin`).
    pub asset_id: String,
    /// Numeric asset id used by the chart provider.
    pub chart_asset_id: String,
}

/// reqwest-backed fetcher. Every request is bounded by `timeout`.
#[derive(Clone)]
pub struct HttpPriceFetcher {
    http: Client,
    endpoints: FeedEndpoints,
    timeout: Duration,
}

impl HttpPriceFetcher {
    pub fn new(endpoints: FeedEndpoints, timeout: Duration) -> Result<Self, FeedError> {
        let http = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            endpoints,
            timeout,
        })
    }

    async fn get_bytes(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<u8>, FeedError> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(e))?
            .error_for_status()?;

        let body = resp.bytes().await.map_err(|e| self.classify(e))?;
        Ok(body.to_vec())
    }

    fn classify(&self, e: reqwest::Error) -> FeedError {
        if e.is_timeout() {
            FeedError::Timeout(self.timeout)
        } else {
            FeedError::Http(e)
        }
    }
}

#[async_trait]
impl PriceFetcher for HttpPriceFetcher {
    fn asset_id(&self) -> &str {
        &self.endpoints.asset_id
    }

    #[instrument(skip(self), fields(asset = %self.endpoints.asset_id), level = "debug")]
    async fn fetch_snapshot(&self) -> Result<RawPriceSnapshot, FeedError> {
        let vs_currencies = Currency::ALL
            .iter()
            .map(|c| c.code())
            .collect::<Vec<_>>()
            .join(",");

        let query = [
            ("ids", self.endpoints.asset_id.clone()),
            ("vs_currencies", vs_currencies),
            ("include_24hr_change", "true".to_string()),
            ("include_last_updated_at", "true".to_string()),
        ];

        let body = self.get_bytes(&self.endpoints.snapshot_url, &query).await?;
        let raw = RawPriceSnapshot::from_json(&body)?;

        debug!(assets = raw.assets.len(), "price snapshot fetched");
        Ok(raw)
    }

    #[instrument(skip(self), fields(range = %range, currency = %currency), level = "debug")]
    async fn fetch_series(
        &self,
        range: ChartRange,
        currency: Currency,
    ) -> Result<RawChartPayload, FeedError> {
        let query = [
            ("id", self.endpoints.chart_asset_id.clone()),
            ("range", range.as_str().to_string()),
            ("interval", range.interval_hint().to_string()),
            ("convertId", currency.chart_id().to_string()),
        ];

        let body = self.get_bytes(&self.endpoints.chart_url, &query).await?;
        let raw = RawChartPayload::from_json(&body)?;

        debug!(points = raw.points.len(), "chart series fetched");
        Ok(raw)
    }
}
