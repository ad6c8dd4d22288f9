use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::currency::Currency;

/// A single chart sample. Series are ordered by `timestamp_ms` (non-decreasing,
/// duplicates allowed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceDataPoint {
    /// Milliseconds since epoch
    pub timestamp_ms: i64,
    pub price: f64,
}

impl PriceDataPoint {
    pub fn new(timestamp_ms: i64, price: f64) -> Self {
        Self {
            timestamp_ms,
            price,
        }
    }
}

/// Normalized price reading for one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySnapshot {
    pub price: f64,
    /// 24h change in percent, when the feed provides it.
    pub change_24h: Option<f64>,
    /// `price / price(base)`; always 1.0 for the base currency.
    pub conversion_rate_from_base: f64,
    pub observed_at_ms: i64,
}

/// Point-in-time prices across the currencies the feed returned.
///
/// Currencies missing from the feed are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    entries: HashMap<Currency, CurrencySnapshot>,
}

impl PriceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, currency: Currency, snapshot: CurrencySnapshot) {
        self.entries.insert(currency, snapshot);
    }

    pub fn get(&self, currency: Currency) -> Option<&CurrencySnapshot> {
        self.entries.get(&currency)
    }

    /// Lookup by feed code; unknown codes resolve to `None`.
    pub fn get_by_code(&self, code: &str) -> Option<&CurrencySnapshot> {
        Currency::from_code(code).and_then(|c| self.get(c))
    }

    pub fn price(&self, currency: Currency) -> Option<f64> {
        self.get(currency).map(|s| s.price)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Currency, &CurrencySnapshot)> {
        self.entries.iter()
    }
}

impl FromIterator<(Currency, CurrencySnapshot)> for PriceSnapshot {
    fn from_iter<I: IntoIterator<Item = (Currency, CurrencySnapshot)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
