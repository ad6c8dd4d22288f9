use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Minimal counters for operational visibility.
#[derive(Clone, Default)]
pub struct Counters {
    pub alert_ticks: Arc<AtomicU64>,
    pub fetch_failures: Arc<AtomicU64>,
    pub persist_failures: Arc<AtomicU64>,
    pub notify_failures: Arc<AtomicU64>,

    pub alerts_triggered: Arc<AtomicU64>,

    // skip reasons
    pub alerts_skip_disabled: Arc<AtomicU64>,
    pub alerts_skip_cooling: Arc<AtomicU64>,
    pub alerts_skip_no_price: Arc<AtomicU64>,

    pub cache_refreshes: Arc<AtomicU64>,
}

/// Point-in-time copy of [`Counters`], for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountersSnapshot {
    pub alert_ticks: u64,
    pub fetch_failures: u64,
    pub persist_failures: u64,
    pub notify_failures: u64,
    pub alerts_triggered: u64,
    pub alerts_skip_disabled: u64,
    pub alerts_skip_cooling: u64,
    pub alerts_skip_no_price: u64,
    pub cache_refreshes: u64,
}

pub fn bump(counter: &AtomicU64, by: u64) {
    counter.fetch_add(by, Ordering::Relaxed);
}

impl Counters {
    pub fn snapshot(&self) -> CountersSnapshot {
        let get = |c: &Arc<AtomicU64>| c.load(Ordering::Relaxed);
        CountersSnapshot {
            alert_ticks: get(&self.alert_ticks),
            fetch_failures: get(&self.fetch_failures),
            persist_failures: get(&self.persist_failures),
            notify_failures: get(&self.notify_failures),
            alerts_triggered: get(&self.alerts_triggered),
            alerts_skip_disabled: get(&self.alerts_skip_disabled),
            alerts_skip_cooling: get(&self.alerts_skip_cooling),
            alerts_skip_no_price: get(&self.alerts_skip_no_price),
            cache_refreshes: get(&self.cache_refreshes),
        }
    }
}
