//! Chart-ready price series.
//!
//! Data flow: Fetcher → normalize_series → (optional EMA) → LTTB downsample.

use std::sync::Arc;
use std::time::Duration;

use corelib::{ChartRange, Currency, PriceDataPoint};
use engine::series::{downsample, nearest_by_index, nearest_by_timestamp, smooth};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::feed::{FeedError, PriceFetcher, normalize_series, with_timeout};

/// A downsampled series ready for display, with cursor lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub range: ChartRange,
    pub currency: Currency,
    pub points: Vec<PriceDataPoint>,
    /// Number of samples before downsampling.
    pub source_len: usize,
}

impl ChartSeries {
    pub fn first(&self) -> Option<&PriceDataPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PriceDataPoint> {
        self.points.last()
    }

    pub fn nearest_by_timestamp(&self, timestamp_ms: i64) -> Option<&PriceDataPoint> {
        nearest_by_timestamp(&self.points, timestamp_ms)
    }

    pub fn nearest_by_index(&self, position: f64) -> Option<&PriceDataPoint> {
        nearest_by_index(&self.points, position)
    }

    /// Percent change from the first to the last displayed price.
    pub fn change_percent(&self) -> Option<f64> {
        let first = self.first()?.price;
        let last = self.last()?.price;
        if first == 0.0 {
            return None;
        }
        Some((last - first) / first * 100.0)
    }
}

pub struct ChartService {
    fetcher: Arc<dyn PriceFetcher>,
    fetch_timeout: Duration,
    smoothing_span: Option<usize>,
}

impl ChartService {
    pub fn new(
        fetcher: Arc<dyn PriceFetcher>,
        fetch_timeout: Duration,
        smoothing_span: Option<usize>,
    ) -> Self {
        Self {
            fetcher,
            fetch_timeout,
            smoothing_span,
        }
    }

    #[instrument(skip(self), fields(range = %range, currency = %currency))]
    pub async fn load(
        &self,
        range: ChartRange,
        currency: Currency,
    ) -> Result<ChartSeries, FeedError> {
        let raw = with_timeout(
            self.fetch_timeout,
            self.fetcher.fetch_series(range, currency),
        )
        .await?;
        let series = normalize_series(&raw)?;
        Ok(build_series(range, currency, series, self.smoothing_span))
    }
}

/// Smooths (when configured) and downsamples to the range's point budget.
pub fn build_series(
    range: ChartRange,
    currency: Currency,
    series: Vec<PriceDataPoint>,
    smoothing_span: Option<usize>,
) -> ChartSeries {
    let source_len = series.len();

    let series = match smoothing_span {
        Some(span) => smooth(&series, span),
        None => series,
    };

    let points = downsample(&series, range.target_points());

    debug!(source_len, kept = points.len(), "chart series prepared");

    ChartSeries {
        range,
        currency,
        points,
        source_len,
    }
}
