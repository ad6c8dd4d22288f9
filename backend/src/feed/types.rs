use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::FeedError;

/// Simple-price payload keyed by asset id:
///
/// `{ "bitcoin": { "usd": 150.0, "usd_24h_change": -1.2, "eur": null, "last_updated_at": 1700000000 } }`
///
/// Field values are kept as raw JSON so one odd field never fails the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPriceSnapshot {
    pub assets: HashMap<String, Option<HashMap<String, Value>>>,
}

impl RawPriceSnapshot {
    pub fn from_json(bytes: &[u8]) -> Result<Self, FeedError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Asset entry, `None` when absent or explicitly null.
    pub fn asset(&self, asset_id: &str) -> Option<&HashMap<String, Value>> {
        self.assets.get(asset_id).and_then(Option::as_ref)
    }
}

/// One chart tuple: timestamp in epoch seconds (as sent, a string) and the
/// `[price, volume, market_cap]` values.
#[derive(Debug, Clone, PartialEq)]
pub struct RawChartPoint {
    pub timestamp_secs: String,
    pub values: Vec<Option<f64>>,
}

impl RawChartPoint {
    pub fn new(timestamp_secs: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            timestamp_secs: timestamp_secs.into(),
            values,
        }
    }

    pub fn price(&self) -> Option<f64> {
        self.values.first().copied().flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawChartPayload {
    pub points: Vec<RawChartPoint>,
}

impl RawChartPayload {
    /// Accepts the provider's keyed form
    /// `{ "data": { "points": { "<secs>": { "v": [price, volume, cap] } } } }`
    /// as well as a bare tuple array `[["<secs>", [price, volume, cap]], ...]`.
    ///
    /// Individual malformed tuples are kept with missing values and dropped
    /// later by normalization; only an unrecognizable envelope is an error.
    pub fn from_json(bytes: &[u8]) -> Result<Self, FeedError> {
        let root: Value = serde_json::from_slice(bytes)?;
        Self::from_value(root)
    }

    pub fn from_value(root: Value) -> Result<Self, FeedError> {
        if let Some(points) = root.pointer("/data/points").and_then(Value::as_object) {
            let points = points
                .iter()
                .map(|(ts, entry)| {
                    let values = entry.get("v").or(Some(entry)).map(numbers).unwrap_or_default();
                    RawChartPoint::new(ts.clone(), values)
                })
                .collect();
            return Ok(Self { points });
        }

        if let Some(tuples) = root.as_array() {
            let points = tuples
                .iter()
                .map(|tuple| {
                    let ts = match tuple.get(0) {
                        Some(Value::String(s)) => s.clone(),
                        Some(Value::Number(n)) => n.to_string(),
                        _ => String::new(),
                    };
                    let values = tuple.get(1).map(numbers).unwrap_or_default();
                    RawChartPoint::new(ts, values)
                })
                .collect();
            return Ok(Self { points });
        }

        Err(FeedError::Parse(
            "chart payload is neither data.points nor a tuple array".into(),
        ))
    }
}

fn numbers(v: &Value) -> Vec<Option<f64>> {
    v.as_array()
        .map(|arr| arr.iter().map(Value::as_f64).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_null_asset_reads_as_absent() {
        let raw: RawPriceSnapshot = serde_json::from_value(json!({
            "bitcoin": null,
            "ethereum": { "usd": 2.0 }
        }))
        .unwrap();

        assert!(raw.asset("bitcoin").is_none());
        assert!(raw.asset("litecoin").is_none());
        assert_eq!(raw.asset("ethereum").unwrap()["usd"], json!(2.0));
    }

    #[test]
    fn snapshot_rejects_non_object_root() {
        assert!(matches!(
            RawPriceSnapshot::from_json(b"[1,2,3]"),
            Err(FeedError::Parse(_))
        ));
    }

    #[test]
    fn chart_keyed_form() {
        let payload = RawChartPayload::from_value(json!({
            "data": { "points": {
                "1700000060": { "v": [101.5, 10.0, 1000.0] },
                "1700000000": { "v": [100.0, 9.0, 900.0] },
                "bogus": { "v": ["x"] }
            }}
        }))
        .unwrap();

        assert_eq!(payload.points.len(), 3);
        let p = payload
            .points
            .iter()
            .find(|p| p.timestamp_secs == "1700000060")
            .unwrap();
        assert_eq!(p.price(), Some(101.5));
        let bogus = payload.points.iter().find(|p| p.timestamp_secs == "bogus").unwrap();
        assert_eq!(bogus.price(), None);
    }

    #[test]
    fn chart_tuple_form() {
        let payload = RawChartPayload::from_value(json!([
            ["1700000000", [100.0, 1.0, 2.0]],
            [1700000060, [null, 1.0, 2.0]],
            "garbage"
        ]))
        .unwrap();

        assert_eq!(payload.points.len(), 3);
        assert_eq!(payload.points[0].price(), Some(100.0));
        assert_eq!(payload.points[1].timestamp_secs, "1700000060");
        assert_eq!(payload.points[1].price(), None);
        assert_eq!(payload.points[2].timestamp_secs, "");
    }

    #[test]
    fn chart_unknown_envelope_is_parse_error() {
        assert!(matches!(
            RawChartPayload::from_value(json!({ "status": "ok" })),
            Err(FeedError::Parse(_))
        ));
        assert!(matches!(
            RawChartPayload::from_json(b"{not json"),
            Err(FeedError::Parse(_))
        ));
    }
}
