use std::time::Duration;

use corelib::{PriceAlert, PriceSnapshot};
use serde::Serialize;
use tracing::debug;

use super::state::{cooldown_ms, in_cooldown};

/// Minimum time between two notifications of the same alert.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60 * 60);

/// Why an alert did or did not fire on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertOutcome {
    /// User switched the alert off.
    Disabled,
    /// Fired recently; suppressed until the cooldown elapses.
    Cooling,
    /// The snapshot has no price for the alert's currency (feed gap or
    /// unknown currency code). Skipped for this tick only.
    NoPrice,
    /// Armed, price on the wrong side of the threshold.
    NotMet,
    Triggered,
}

/// Result of one evaluation tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Alerts that fired, already stamped with `last_triggered_at_ms = now`.
    pub triggered: Vec<PriceAlert>,
    /// Every input alert, in input order, with fired ones stamped.
    pub updated: Vec<PriceAlert>,
    /// Per-alert outcome, parallel to `updated`.
    pub outcomes: Vec<AlertOutcome>,
}

impl Evaluation {
    pub fn count(&self, outcome: AlertOutcome) -> usize {
        self.outcomes.iter().filter(|o| **o == outcome).count()
    }
}

/// Applies threshold and cooldown rules to a list of alerts.
#[derive(Debug, Clone, Copy)]
pub struct AlertEvaluator {
    cooldown: Duration,
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl AlertEvaluator {
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Evaluates `alerts` against `snapshot` at `now_ms`.
    ///
    /// Per alert, in order:
    ///   1. disabled -> unchanged
    ///   2. within cooldown of the last trigger -> unchanged
    ///   3. no snapshot price for its currency -> unchanged
    ///   4. condition met (inclusive on equality) -> stamped and reported
    ///   5. otherwise -> unchanged
    pub fn evaluate(
        &self,
        alerts: &[PriceAlert],
        snapshot: &PriceSnapshot,
        now_ms: i64,
    ) -> Evaluation {
        let cooldown_ms = cooldown_ms(self.cooldown);

        let mut eval = Evaluation {
            triggered: Vec::new(),
            updated: Vec::with_capacity(alerts.len()),
            outcomes: Vec::with_capacity(alerts.len()),
        };

        for alert in alerts {
            let outcome = check_alert(alert, snapshot, now_ms, cooldown_ms);

            if outcome == AlertOutcome::Triggered {
                let fired = alert.triggered_at(now_ms);
                debug!(
                    alert_id = %fired.id,
                    condition = ?fired.condition,
                    target = fired.target_price,
                    currency = %fired.currency_code,
                    "alert triggered"
                );
                eval.triggered.push(fired.clone());
                eval.updated.push(fired);
            } else {
                eval.updated.push(alert.clone());
            }

            eval.outcomes.push(outcome);
        }

        eval
    }
}

/// Free-function form of [`AlertEvaluator::evaluate`], returning
/// `(triggered, updated)`.
pub fn evaluate(
    alerts: &[PriceAlert],
    snapshot: &PriceSnapshot,
    now_ms: i64,
    cooldown: Duration,
) -> (Vec<PriceAlert>, Vec<PriceAlert>) {
    let eval = AlertEvaluator::new(cooldown).evaluate(alerts, snapshot, now_ms);
    (eval.triggered, eval.updated)
}

fn check_alert(
    alert: &PriceAlert,
    snapshot: &PriceSnapshot,
    now_ms: i64,
    cooldown_ms: i64,
) -> AlertOutcome {
    if !alert.is_enabled {
        return AlertOutcome::Disabled;
    }

    if in_cooldown(alert, now_ms, cooldown_ms) {
        return AlertOutcome::Cooling;
    }

    let Some(current) = snapshot.get_by_code(&alert.currency_code) else {
        return AlertOutcome::NoPrice;
    };

    if alert.condition.is_met(current.price, alert.target_price) {
        AlertOutcome::Triggered
    } else {
        AlertOutcome::NotMet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::{AlertCondition, Currency, CurrencySnapshot};

    const T: i64 = 1_700_000_000_000;

    fn snapshot(prices: &[(Currency, f64)]) -> PriceSnapshot {
        prices
            .iter()
            .map(|(c, p)| {
                (
                    *c,
                    CurrencySnapshot {
                        price: *p,
                        change_24h: None,
                        conversion_rate_from_base: 1.0,
                        observed_at_ms: T,
                    },
                )
            })
            .collect()
    }

    fn usd(price: f64) -> PriceSnapshot {
        snapshot(&[(Currency::Usd, price)])
    }

    fn alert(id: &str, condition: AlertCondition, target: f64) -> PriceAlert {
        PriceAlert::new(id, condition, target, "usd", T - 10).unwrap()
    }

    fn fires(a: &PriceAlert, price: f64) -> bool {
        let eval = AlertEvaluator::default().evaluate(std::slice::from_ref(a), &usd(price), T);
        !eval.triggered.is_empty()
    }

    #[test]
    fn above_is_inclusive() {
        let a = alert("a", AlertCondition::Above, 100.0);
        assert!(fires(&a, 100.0));
        assert!(fires(&a, 150.0));
        assert!(!fires(&a, 99.99));
    }

    #[test]
    fn below_is_inclusive() {
        let a = alert("b", AlertCondition::Below, 100.0);
        assert!(fires(&a, 100.0));
        assert!(fires(&a, 50.0));
        assert!(!fires(&a, 100.01));
    }

    #[test]
    fn disabled_alerts_never_fire() {
        let mut a = alert("a", AlertCondition::Above, 1.0);
        a.is_enabled = false;

        let eval = AlertEvaluator::default().evaluate(&[a.clone()], &usd(1_000_000.0), T);
        assert!(eval.triggered.is_empty());
        assert_eq!(eval.updated, vec![a]);
        assert_eq!(eval.outcomes, vec![AlertOutcome::Disabled]);
    }

    #[test]
    fn cooldown_boundary_rearms_exactly_at_window_end() {
        let ev = AlertEvaluator::new(Duration::from_millis(3_600_000));
        let a = alert("a", AlertCondition::Above, 100.0);

        let first = ev.evaluate(&[a], &usd(150.0), T);
        assert_eq!(first.triggered.len(), 1);
        assert_eq!(first.updated[0].last_triggered_at_ms, Some(T));

        let early = ev.evaluate(&first.updated, &usd(150.0), T + 3_600_000 - 1);
        assert!(early.triggered.is_empty());
        assert_eq!(early.outcomes, vec![AlertOutcome::Cooling]);
        assert_eq!(early.updated, first.updated);

        let rearmed = ev.evaluate(&first.updated, &usd(150.0), T + 3_600_000);
        assert_eq!(rearmed.triggered.len(), 1);
        assert_eq!(
            rearmed.updated[0].last_triggered_at_ms,
            Some(T + 3_600_000)
        );
    }

    #[test]
    fn cooldown_is_configurable() {
        let ev = AlertEvaluator::new(Duration::from_secs(60));
        let a = alert("a", AlertCondition::Above, 100.0).triggered_at(T);

        assert!(ev.evaluate(&[a.clone()], &usd(200.0), T + 59_999).triggered.is_empty());
        assert_eq!(ev.evaluate(&[a], &usd(200.0), T + 60_000).triggered.len(), 1);
    }

    #[test]
    fn missing_currency_is_skipped_not_failed() {
        let mut a = alert("a", AlertCondition::Above, 1.0);
        a.currency_code = "eur".into();
        let mut unknown = alert("b", AlertCondition::Above, 1.0);
        unknown.currency_code = "xyz".into();

        let eval = AlertEvaluator::default().evaluate(&[a.clone(), unknown.clone()], &usd(5.0), T);
        assert!(eval.triggered.is_empty());
        assert_eq!(eval.updated, vec![a, unknown]);
        assert_eq!(eval.count(AlertOutcome::NoPrice), 2);
    }

    #[test]
    fn resolves_currency_per_alert() {
        let snap = snapshot(&[(Currency::Usd, 150.0), (Currency::Eur, 140.0)]);
        let usd_alert = alert("u", AlertCondition::Above, 145.0);
        let mut eur_alert = alert("e", AlertCondition::Above, 145.0);
        eur_alert.currency_code = "EUR".into();

        let eval = AlertEvaluator::default().evaluate(&[usd_alert, eur_alert], &snap, T);
        let ids: Vec<&str> = eval.triggered.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["u"]);
        assert_eq!(eval.outcomes, vec![AlertOutcome::Triggered, AlertOutcome::NotMet]);
    }

    #[test]
    fn preserves_order_and_does_not_mutate_input() {
        let input = vec![
            alert("1", AlertCondition::Below, 10.0),
            alert("2", AlertCondition::Above, 10.0),
            alert("3", AlertCondition::Below, 50.0),
        ];
        let before = input.clone();

        let eval = AlertEvaluator::default().evaluate(&input, &usd(20.0), T);

        assert_eq!(input, before);
        let ids: Vec<&str> = eval.updated.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(eval.triggered.len(), 2);
        assert_eq!(eval.updated[0], before[0]);
    }

    #[test]
    fn end_to_end_scenario() {
        let snap = snapshot(&[(Currency::Usd, 150.0), (Currency::Eur, 140.0)]);
        let a = alert("e2e", AlertCondition::Above, 145.0);

        let (triggered, updated) = evaluate(&[a.clone()], &snap, T, DEFAULT_COOLDOWN);

        assert_eq!(triggered.len(), 1);
        assert_eq!(triggered[0].id, a.id);
        assert_eq!(updated[0].last_triggered_at_ms, Some(T));
    }
}
