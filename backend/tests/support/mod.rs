#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use backend::alerts::{AlertNotifier, TriggeredAlert};
use backend::feed::{FeedError, PriceFetcher, RawChartPayload, RawPriceSnapshot};
use corelib::{ChartRange, Currency};

pub const ASSET: &str = "bitcoin";

/// Scriptable fetcher. Responses are swapped between ticks by tests.
#[derive(Clone, Default)]
pub struct MockFetcher {
    pub snapshot: Arc<Mutex<Option<Value>>>,
    pub series: Arc<Mutex<Option<Value>>>,
    pub delay: Arc<Mutex<Option<Duration>>>,
    pub fail: Arc<Mutex<bool>>,
    pub snapshot_calls: Arc<AtomicUsize>,
    pub series_requests: Arc<Mutex<Vec<(ChartRange, Currency)>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_prices(&self, prices: Value) {
        *self.snapshot.lock().await = Some(json!({ ASSET: prices }));
    }

    pub async fn set_raw_snapshot(&self, raw: Value) {
        *self.snapshot.lock().await = Some(raw);
    }

    pub async fn set_series(&self, raw: Value) {
        *self.series.lock().await = Some(raw);
    }

    pub async fn set_delay(&self, d: Duration) {
        *self.delay.lock().await = Some(d);
    }

    pub async fn set_failing(&self, fail: bool) {
        *self.fail.lock().await = fail;
    }

    async fn maybe_wait(&self) -> Result<(), FeedError> {
        if let Some(d) = *self.delay.lock().await {
            tokio::time::sleep(d).await;
        }
        if *self.fail.lock().await {
            return Err(FeedError::Parse("mock upstream failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PriceFetcher for MockFetcher {
    fn asset_id(&self) -> &str {
        ASSET
    }

    async fn fetch_snapshot(&self) -> Result<RawPriceSnapshot, FeedError> {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_wait().await?;

        let v = self.snapshot.lock().await.clone().unwrap_or_else(|| json!({}));
        Ok(serde_json::from_value(v)?)
    }

    async fn fetch_series(
        &self,
        range: ChartRange,
        currency: Currency,
    ) -> Result<RawChartPayload, FeedError> {
        self.series_requests.lock().await.push((range, currency));
        self.maybe_wait().await?;

        let v = self.series.lock().await.clone().unwrap_or_else(|| json!([]));
        RawChartPayload::from_value(v)
    }
}

/// Notifier that records every batch it receives.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub batches: Arc<Mutex<Vec<Vec<TriggeredAlert>>>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn all(&self) -> Vec<TriggeredAlert> {
        self.batches.lock().await.iter().flatten().cloned().collect()
    }
}

#[async_trait]
impl AlertNotifier for RecordingNotifier {
    async fn notify(&self, triggered: &[TriggeredAlert]) -> anyhow::Result<()> {
        self.batches.lock().await.push(triggered.to_vec());
        if self.fail {
            return Err(anyhow!("push service unavailable"));
        }
        Ok(())
    }
}
