//! Periodic driver for alert ticks.
//!
//! Ticks run one after another on a single task; a slow tick delays the next
//! one instead of overlapping it.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use crate::alerts::service::AlertService;
use crate::time::now_ms;

pub async fn run_alert_poller(service: Arc<AlertService>, every: Duration) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(every_secs = every.as_secs(), "alert poller started");

    loop {
        ticker.tick().await;

        // Failures are already logged and counted by the tick; retry policy is
        // simply "next period".
        if let Err(e) = service.run_tick(now_ms()).await {
            error!(error = %e, "alert tick failed");
        }
    }
}
