//! Threshold alert evaluation

use super::types::{Alert, AlertCondition, AlertSubscriber};
use crate::feed::Tick;
use crate::observer::{SubscriptionId, Subscribers};
use crate::telemetry::{increment, CounterMetric};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Owns the alert list and notifies subscribers when alerts fire.
///
/// An alert fires at most once; it stays out of evaluation until
/// [`AlertEngine::reset_alert`] re-arms it.
#[derive(Default)]
pub struct AlertEngine {
    alerts: Mutex<Vec<Alert>>,
    subscribers: Subscribers<dyn AlertSubscriber>,
}

impl AlertEngine {
    /// Create an engine with no alerts
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active, untriggered alert
    pub fn create_alert(
        &self,
        name: impl Into<String>,
        condition: AlertCondition,
        symbol: &str,
        threshold: f64,
    ) -> Alert {
        let alert = Alert::new(name, condition, symbol, threshold);
        info!(
            id = %alert.id,
            name = %alert.name,
            symbol = %alert.symbol,
            condition = %alert.condition,
            threshold = alert.threshold,
            "Alert created"
        );
        self.alerts.lock().push(alert.clone());
        alert
    }

    /// Evaluate armed alerts for the tick's symbol.
    ///
    /// Returns copies of the alerts that fired. Subscribers are notified
    /// after the alert lock is released.
    pub fn check(&self, tick: &Tick) -> Vec<Alert> {
        let fired: Vec<Alert> = {
            let mut alerts = self.alerts.lock();
            alerts
                .iter_mut()
                .filter(|a| a.is_armed() && a.symbol == tick.symbol)
                .filter(|a| a.condition.is_met(tick.price, a.threshold))
                .map(|a| {
                    a.triggered = true;
                    a.triggered_at = Some(tick.timestamp);
                    a.triggered_price = Some(tick.price);
                    a.clone()
                })
                .collect()
        };

        if fired.is_empty() {
            return fired;
        }

        let subscribers = self.subscribers.snapshot();
        for alert in &fired {
            info!(
                id = %alert.id,
                name = %alert.name,
                symbol = %alert.symbol,
                price = tick.price,
                threshold = alert.threshold,
                "Alert triggered"
            );
            increment(CounterMetric::AlertsFired);
            for subscriber in &subscribers {
                subscriber.on_alert(alert);
            }
        }
        fired
    }

    /// Delete an alert; false if unknown
    pub fn remove_alert(&self, id: Uuid) -> bool {
        let mut alerts = self.alerts.lock();
        let before = alerts.len();
        alerts.retain(|a| a.id != id);
        let removed = alerts.len() != before;
        if removed {
            debug!(%id, "Alert removed");
        }
        removed
    }

    /// Re-arm a triggered alert; false if unknown
    pub fn reset_alert(&self, id: Uuid) -> bool {
        self.update(id, |a| {
            a.triggered = false;
            a.triggered_at = None;
            a.triggered_price = None;
        })
    }

    /// Enable or disable evaluation of an alert; false if unknown
    pub fn set_active(&self, id: Uuid, active: bool) -> bool {
        self.update(id, |a| a.is_active = active)
    }

    /// Snapshot of all alerts in creation order
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<Alert> {
        self.alerts.lock().iter().find(|a| a.id == id).cloned()
    }

    pub fn subscribe(&self, subscriber: Arc<dyn AlertSubscriber>) -> SubscriptionId {
        self.subscribers.subscribe(subscriber)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn update(&self, id: Uuid, f: impl FnOnce(&mut Alert)) -> bool {
        match self.alerts.lock().iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                f(alert);
                true
            }
            None => false,
        }
    }
}
