use anyhow::Result;
use async_trait::async_trait;
use corelib::{Currency, PriceAlert};
use serde::Serialize;
use tracing::info;

/// An alert that fired, with the price that fired it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggeredAlert {
    /// Already stamped with the trigger time.
    pub alert: PriceAlert,
    pub currency: Currency,
    pub price: f64,
    pub observed_at_ms: i64,
}

/// Downstream presentation of fired alerts. Owned by the host; the tick only
/// hands the triggered subset over after it has been persisted.
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn notify(&self, triggered: &[TriggeredAlert]) -> Result<()>;
}

/// Notifier that only emits structured log lines.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl AlertNotifier for LogNotifier {
    async fn notify(&self, triggered: &[TriggeredAlert]) -> Result<()> {
        for t in triggered {
            info!(
                alert_id = %t.alert.id,
                condition = ?t.alert.condition,
                target = t.alert.target_price,
                price = t.price,
                currency = %t.currency,
                symbol = t.currency.symbol(),
                "price alert fired"
            );
        }
        Ok(())
    }
}
