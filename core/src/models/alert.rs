use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction of a price threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
    Above,
    Below,
}

impl AlertCondition {
    /// Both directions fire on exact equality.
    pub fn is_met(self, current_price: f64, target_price: f64) -> bool {
        match self {
            AlertCondition::Above => current_price >= target_price,
            AlertCondition::Below => current_price <= target_price,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlertValidationError {
    #[error("alert id must not be empty")]
    EmptyId,

    #[error("target price must be a positive finite number, got {0}")]
    NonPositiveTarget(f64),
}

/// A user-defined price threshold.
///
/// `id` never changes after creation; enable/disable and deletion match on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAlert {
    pub id: String,
    pub condition: AlertCondition,
    pub target_price: f64,
    pub currency_code: String,
    pub is_enabled: bool,
    #[serde(rename = "createdAt")]
    pub created_at_ms: i64,
    #[serde(rename = "lastTriggeredAt", default)]
    pub last_triggered_at_ms: Option<i64>,
}

impl PriceAlert {
    /// Creates an enabled, never-triggered alert.
    pub fn new(
        id: impl Into<String>,
        condition: AlertCondition,
        target_price: f64,
        currency_code: impl Into<String>,
        created_at_ms: i64,
    ) -> Result<Self, AlertValidationError> {
        let alert = Self {
            id: id.into(),
            condition,
            target_price,
            currency_code: currency_code.into().to_ascii_lowercase(),
            is_enabled: true,
            created_at_ms,
            last_triggered_at_ms: None,
        };
        alert.validate()?;
        Ok(alert)
    }

    pub fn validate(&self) -> Result<(), AlertValidationError> {
        if self.id.trim().is_empty() {
            return Err(AlertValidationError::EmptyId);
        }
        if !(self.target_price.is_finite() && self.target_price > 0.0) {
            return Err(AlertValidationError::NonPositiveTarget(self.target_price));
        }
        Ok(())
    }

    /// Copy stamped as triggered at `now_ms`. The stamp never moves backwards.
    pub fn triggered_at(&self, now_ms: i64) -> Self {
        let stamp = match self.last_triggered_at_ms {
            Some(prev) => prev.max(now_ms),
            None => now_ms,
        };
        Self {
            last_triggered_at_ms: Some(stamp),
            ..self.clone()
        }
    }
}
