use std::sync::Arc;
use std::time::Duration;

use corelib::{AlertValidationError, PriceAlert};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::alerts::repository::KeyValueStore;
use crate::logger::warn_if_slow;

/// Key the alert list is stored under.
pub const ALERTS_KEY: &str = "price_alerts";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read alerts: {0:#}")]
    Read(anyhow::Error),

    #[error("stored alerts are not a list: {0}")]
    Corrupt(String),

    #[error("failed to write alerts: {0:#}")]
    Write(anyhow::Error),

    #[error("failed to encode alerts: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("alert id already exists: {0}")]
    DuplicateId(String),

    #[error("invalid alert: {0}")]
    Invalid(#[from] AlertValidationError),
}

/// Decoded view of the stored blob.
#[derive(Debug, Default)]
struct StoredAlerts {
    alerts: Vec<PriceAlert>,
    /// Entries that did not decode or validate. Written back untouched.
    retained: Vec<Value>,
}

/// Owns the persisted alert list.
///
/// [`AlertStore::load`] degrades to an empty list. Every write goes through
/// [`AlertStore::modify`], which holds a single writer lock so an evaluation
/// tick and a user edit can never interleave, and which refuses to write
/// unless the current blob was read successfully.
pub struct AlertStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    writer: Mutex<()>,
}

impl AlertStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(kv, ALERTS_KEY)
    }

    pub fn with_key(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
            writer: Mutex::new(()),
        }
    }

    /// Loads every stored alert. Missing, unreadable or corrupt data yields an
    /// empty list; individual invalid entries are skipped.
    #[instrument(skip(self), target = "store", fields(key = %self.key))]
    pub async fn load(&self) -> Vec<PriceAlert> {
        match self.read().await {
            Ok(stored) => stored.alerts,
            Err(StoreError::Corrupt(e)) => {
                warn!(error = %e, "stored alerts are corrupt; treating as no alerts");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "alert read failed; treating as no alerts");
                Vec::new()
            }
        }
    }

    /// Replaces the stored list with `alerts`. Entries this version cannot
    /// decode are kept.
    #[instrument(
        skip(self, alerts),
        target = "store",
        fields(key = %self.key, count = alerts.len())
    )]
    pub async fn save(&self, alerts: &[PriceAlert]) -> Result<(), StoreError> {
        self.modify(|list| *list = alerts.to_vec()).await
    }

    /// Single-writer read-modify-write. `f` edits the loaded list in place;
    /// the list is written back only if it changed.
    ///
    /// A failed read or a blob that is not a list aborts before `f` runs, so a
    /// transient error can never overwrite stored alerts.
    pub async fn modify<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Vec<PriceAlert>) -> R,
    {
        let _guard = self.writer.lock().await;

        let stored = self.read().await?;
        let mut alerts = stored.alerts.clone();
        let out = f(&mut alerts);

        if alerts != stored.alerts {
            self.write(&alerts, &stored.retained).await?;
        }

        Ok(out)
    }

    /// Adds a user-created alert. Ids must be unique.
    pub async fn add(&self, alert: PriceAlert) -> Result<(), StoreError> {
        alert.validate()?;
        let id = alert.id.clone();

        self.modify(move |alerts| {
            if alerts.iter().any(|a| a.id == alert.id) {
                return Err(StoreError::DuplicateId(alert.id));
            }
            alerts.push(alert);
            Ok(())
        })
        .await??;

        info!(alert_id = %id, "alert added");
        Ok(())
    }

    /// Deletes by id. Returns whether an alert was removed.
    pub async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        self.modify(|alerts| {
            let before = alerts.len();
            alerts.retain(|a| a.id != id);
            alerts.len() != before
        })
        .await
    }

    /// Sets the enabled flag. Returns whether the id was found.
    pub async fn set_enabled(&self, id: &str, enabled: bool) -> Result<bool, StoreError> {
        self.modify(|alerts| match alerts.iter_mut().find(|a| a.id == id) {
            Some(a) => {
                a.is_enabled = enabled;
                true
            }
            None => false,
        })
        .await
    }

    /// Flips the enabled flag, returning the new value if the id was found.
    pub async fn toggle(&self, id: &str) -> Result<Option<bool>, StoreError> {
        self.modify(|alerts| {
            alerts.iter_mut().find(|a| a.id == id).map(|a| {
                a.is_enabled = !a.is_enabled;
                a.is_enabled
            })
        })
        .await
    }

    async fn read(&self) -> Result<StoredAlerts, StoreError> {
        let raw = warn_if_slow("kv_get_alerts", Duration::from_millis(100), async {
            self.kv.get(&self.key).await
        })
        .await
        .map_err(StoreError::Read)?;

        match raw {
            Some(blob) => decode_alerts(&blob),
            None => {
                debug!("no alerts stored yet");
                Ok(StoredAlerts::default())
            }
        }
    }

    async fn write(&self, alerts: &[PriceAlert], retained: &[Value]) -> Result<(), StoreError> {
        let mut entries = alerts
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        entries.extend_from_slice(retained);
        let blob = serde_json::to_string(&entries)?;

        warn_if_slow("kv_put_alerts", Duration::from_millis(100), async {
            self.kv.put(&self.key, &blob).await
        })
        .await
        .map_err(StoreError::Write)?;

        debug!(count = alerts.len(), retained = retained.len(), "alerts persisted");
        Ok(())
    }
}

fn decode_alerts(blob: &str) -> Result<StoredAlerts, StoreError> {
    let entries: Vec<Value> =
        serde_json::from_str(blob).map_err(|e| StoreError::Corrupt(e.to_string()))?;

    let mut stored = StoredAlerts {
        alerts: Vec::with_capacity(entries.len()),
        retained: Vec::new(),
    };
    for entry in entries {
        match serde_json::from_value::<PriceAlert>(entry.clone()) {
            Ok(alert) => match alert.validate() {
                Ok(()) => stored.alerts.push(alert),
                Err(e) => {
                    warn!(alert_id = %alert.id, error = %e, "skipping invalid stored alert");
                    stored.retained.push(entry);
                }
            },
            Err(e) => {
                warn!(error = %e, "skipping malformed stored alert");
                stored.retained.push(entry);
            }
        }
    }
    Ok(stored)
}
