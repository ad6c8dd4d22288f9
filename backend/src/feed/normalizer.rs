//! Turns raw provider payloads into typed snapshots and series.

use corelib::{Currency, CurrencySnapshot, PriceDataPoint, PriceSnapshot};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use super::errors::FeedError;
use super::types::{RawChartPayload, RawPriceSnapshot};

const LAST_UPDATED_FIELD: &str = "last_updated_at";

/// Builds a per-currency snapshot for `asset_id`.
///
/// Currencies that are missing, null or non-finite in the payload are left
/// out. Conversion rates are `price / price(base)`; without a usable base
/// price every rate falls back to 1.0 so a partial snapshot stays usable.
pub fn normalize_snapshot(
    raw: &RawPriceSnapshot,
    asset_id: &str,
    fetched_at_ms: i64,
) -> Result<PriceSnapshot, FeedError> {
    let entry = raw
        .asset(asset_id)
        .ok_or_else(|| FeedError::NoData(format!("asset '{asset_id}' missing from snapshot")))?;

    let observed_at_ms = number(entry, LAST_UPDATED_FIELD)
        .map(|secs| (secs * 1_000.0) as i64)
        .unwrap_or(fetched_at_ms);

    let prices: HashMap<Currency, Option<f64>> = Currency::ALL
        .iter()
        .map(|c| (*c, number(entry, c.code())))
        .collect();

    let base_price = prices
        .get(&Currency::BASE)
        .copied()
        .flatten()
        .filter(|p| *p != 0.0);

    let snapshot: PriceSnapshot = prices
        .iter()
        .filter_map(|(currency, price)| {
            let price = (*price)?;
            let change_24h = number(entry, &format!("{}_24h_change", currency.code()));
            let conversion_rate_from_base = match base_price {
                Some(base) if !currency.is_base() => price / base,
                _ => 1.0,
            };
            Some((
                *currency,
                CurrencySnapshot {
                    price,
                    change_24h,
                    conversion_rate_from_base,
                    observed_at_ms,
                },
            ))
        })
        .collect();

    debug!(
        asset = asset_id,
        currencies = snapshot.len(),
        base_available = base_price.is_some(),
        "snapshot normalized"
    );

    Ok(snapshot)
}

/// Extracts `(timestamp, price)` samples sorted ascending by timestamp.
///
/// Tuples with an unparseable timestamp or no finite price are dropped; an
/// empty result is `NoData`.
pub fn normalize_series(raw: &RawChartPayload) -> Result<Vec<PriceDataPoint>, FeedError> {
    let mut points: Vec<PriceDataPoint> = raw
        .points
        .iter()
        .filter_map(|p| {
            let secs: i64 = p.timestamp_secs.trim().parse().ok()?;
            let price = p.price().filter(|v| v.is_finite())?;
            Some(PriceDataPoint::new(secs.checked_mul(1_000)?, price))
        })
        .collect();

    let dropped = raw.points.len() - points.len();
    if dropped > 0 {
        debug!(dropped, kept = points.len(), "dropped malformed chart tuples");
    }

    if points.is_empty() {
        return Err(FeedError::NoData("chart payload has no usable points".into()));
    }

    points.sort_by_key(|p| p.timestamp_ms);
    Ok(points)
}

fn number(entry: &HashMap<String, Value>, field: &str) -> Option<f64> {
    entry
        .get(field)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
}
