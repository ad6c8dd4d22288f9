use std::time::Duration;

use corelib::PriceAlert;
use serde::Serialize;

/// Lifecycle state of an alert at a given instant.
///
/// Transitions only happen during an evaluation tick:
/// `Armed -> Cooling` when the condition is met, `Cooling -> Armed` once the
/// cooldown has elapsed. `Disabled` is driven by the user flag alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertState {
    Disabled,
    Armed,
    Cooling,
}

impl AlertState {
    pub fn of(alert: &PriceAlert, now_ms: i64, cooldown: Duration) -> Self {
        if !alert.is_enabled {
            AlertState::Disabled
        } else if in_cooldown(alert, now_ms, cooldown_ms(cooldown)) {
            AlertState::Cooling
        } else {
            AlertState::Armed
        }
    }
}

/// An absent trigger stamp means no cooldown is active. The window is
/// half-open: at exactly `last + cooldown` the alert is armed again.
pub(crate) fn in_cooldown(alert: &PriceAlert, now_ms: i64, cooldown_ms: i64) -> bool {
    match alert.last_triggered_at_ms {
        Some(last) => now_ms.saturating_sub(last) < cooldown_ms,
        None => false,
    }
}

pub(crate) fn cooldown_ms(cooldown: Duration) -> i64 {
    i64::try_from(cooldown.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::AlertCondition;

    const HOUR: Duration = Duration::from_secs(3_600);

    fn alert() -> PriceAlert {
        PriceAlert::new("a", AlertCondition::Above, 100.0, "usd", 0).unwrap()
    }

    #[test]
    fn disabled_wins_over_cooldown() {
        let mut a = alert().triggered_at(1_000);
        a.is_enabled = false;
        assert_eq!(AlertState::of(&a, 1_001, HOUR), AlertState::Disabled);
    }

    #[test]
    fn never_triggered_is_armed() {
        assert_eq!(AlertState::of(&alert(), 0, HOUR), AlertState::Armed);
    }

    #[test]
    fn cooling_until_window_elapses() {
        let a = alert().triggered_at(10_000);
        assert_eq!(AlertState::of(&a, 10_000 + 3_599_999, HOUR), AlertState::Cooling);
        assert_eq!(AlertState::of(&a, 10_000 + 3_600_000, HOUR), AlertState::Armed);
    }

    #[test]
    fn clock_going_backwards_stays_cooling() {
        let a = alert().triggered_at(10_000);
        assert_eq!(AlertState::of(&a, 5_000, HOUR), AlertState::Cooling);
    }
}
