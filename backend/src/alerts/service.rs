//! One alert evaluation tick.
//!
//! Flow:
//! 1) Fetch the raw snapshot (bounded by the fetch timeout).
//! 2) Normalize it into per-currency prices.
//! 3) Under the store's writer lock: load alerts, evaluate, save if changed.
//! 4) Hand the triggered subset to the notifier.
//!
//! Nothing is committed before the fetch succeeds, so abandoning a tick while
//! it waits on the network leaves stored alerts untouched. Notifier failures
//! are logged and counted; they never roll back persisted trigger stamps.

use std::sync::Arc;
use std::time::Duration;

use corelib::{Currency, PriceSnapshot};
use engine::{AlertEvaluator, AlertOutcome, Evaluation};
use tracing::{Instrument, debug, info, warn};

use crate::alerts::notifier::{AlertNotifier, TriggeredAlert};
use crate::alerts::store::AlertStore;
use crate::error::AppError;
use crate::feed::{PriceFetcher, normalize_snapshot, with_timeout};
use crate::logger::{TraceId, annotate_span, root_span, warn_if_slow};
use crate::metrics::counters::{Counters, bump};

/// Summary of a completed tick.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub evaluated: usize,
    pub triggered: Vec<TriggeredAlert>,
    pub snapshot: PriceSnapshot,
}

pub struct AlertService {
    fetcher: Arc<dyn PriceFetcher>,
    store: Arc<AlertStore>,
    notifier: Arc<dyn AlertNotifier>,
    evaluator: AlertEvaluator,
    fetch_timeout: Duration,
    counters: Counters,
}

impl AlertService {
    pub fn new(
        fetcher: Arc<dyn PriceFetcher>,
        store: Arc<AlertStore>,
        notifier: Arc<dyn AlertNotifier>,
        cooldown: Duration,
        fetch_timeout: Duration,
        counters: Counters,
    ) -> Self {
        Self {
            fetcher,
            store,
            notifier,
            evaluator: AlertEvaluator::new(cooldown),
            fetch_timeout,
            counters,
        }
    }

    pub async fn run_tick(&self, now_ms: i64) -> Result<TickReport, AppError> {
        let trace_id = TraceId::generate();
        self.tick(now_ms)
            .instrument(root_span("alert_tick", &trace_id))
            .await
    }

    async fn tick(&self, now_ms: i64) -> Result<TickReport, AppError> {
        bump(&self.counters.alert_ticks, 1);
        let asset = self.fetcher.asset_id().to_string();
        annotate_span(&asset, None);
        debug!("starting alert tick");

        let raw = warn_if_slow(
            "fetch_snapshot",
            Duration::from_secs(3),
            with_timeout(self.fetch_timeout, self.fetcher.fetch_snapshot()),
        )
        .await
        .inspect_err(|e| {
            bump(&self.counters.fetch_failures, 1);
            warn!(error = %e, "snapshot fetch failed; skipping tick");
        })?;

        let snapshot = normalize_snapshot(&raw, &asset, now_ms).inspect_err(|e| {
            bump(&self.counters.fetch_failures, 1);
            warn!(error = %e, "snapshot unusable; skipping tick");
        })?;

        let evaluator = self.evaluator;
        let eval = self
            .store
            .modify(|alerts| {
                let eval = evaluator.evaluate(alerts, &snapshot, now_ms);
                alerts.clone_from(&eval.updated);
                eval
            })
            .await
            .inspect_err(|e| {
                bump(&self.counters.persist_failures, 1);
                warn!(error = %e, "failed to persist evaluated alerts");
            })?;

        annotate_span(&asset, Some(eval.updated.len()));
        self.record(&eval);

        let triggered = attach_prices(&eval, &snapshot);

        if !triggered.is_empty() {
            if let Err(e) = self.notifier.notify(&triggered).await {
                bump(&self.counters.notify_failures, 1);
                warn!(error = %e, count = triggered.len(), "alert notification failed");
            }
        }

        info!(
            evaluated = eval.updated.len(),
            triggered = triggered.len(),
            cooling = eval.count(AlertOutcome::Cooling),
            "alert tick complete"
        );

        Ok(TickReport {
            evaluated: eval.updated.len(),
            triggered,
            snapshot,
        })
    }

    fn record(&self, eval: &Evaluation) {
        let c = &self.counters;
        bump(&c.alerts_triggered, eval.count(AlertOutcome::Triggered) as u64);
        bump(&c.alerts_skip_disabled, eval.count(AlertOutcome::Disabled) as u64);
        bump(&c.alerts_skip_cooling, eval.count(AlertOutcome::Cooling) as u64);
        bump(&c.alerts_skip_no_price, eval.count(AlertOutcome::NoPrice) as u64);
    }
}

fn attach_prices(eval: &Evaluation, snapshot: &PriceSnapshot) -> Vec<TriggeredAlert> {
    eval.triggered
        .iter()
        .filter_map(|alert| {
            let currency = Currency::from_code(&alert.currency_code)?;
            let entry = snapshot.get(currency)?;
            Some(TriggeredAlert {
                alert: alert.clone(),
                currency,
                price: entry.price,
                observed_at_ms: entry.observed_at_ms,
            })
        })
        .collect()
}
