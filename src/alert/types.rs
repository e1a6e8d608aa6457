//! Alert types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Threshold comparison direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
    /// Fires when price rises strictly above the threshold
    Above,
    /// Fires when price falls strictly below the threshold
    Below,
}

impl AlertCondition {
    /// Whether `price` satisfies the condition against `threshold`
    pub fn is_met(&self, price: f64, threshold: f64) -> bool {
        match self {
            AlertCondition::Above => price > threshold,
            AlertCondition::Below => price < threshold,
        }
    }
}

impl FromStr for AlertCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "above" => Ok(AlertCondition::Above),
            "below" => Ok(AlertCondition::Below),
            other => Err(format!("unknown alert condition: {other}")),
        }
    }
}

impl fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertCondition::Above => write!(f, "above"),
            AlertCondition::Below => write!(f, "below"),
        }
    }
}

/// A price threshold alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Unique alert identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    pub condition: AlertCondition,
    /// Lower-cased symbol the alert watches
    pub symbol: String,
    pub threshold: f64,
    /// Inactive alerts are never evaluated
    pub is_active: bool,
    /// Set once on firing; cleared only by an explicit reset
    pub triggered: bool,
    pub created_at: DateTime<Utc>,
    pub triggered_at: Option<DateTime<Utc>>,
    pub triggered_price: Option<f64>,
}

impl Alert {
    /// Create an active, untriggered alert
    pub fn new(
        name: impl Into<String>,
        condition: AlertCondition,
        symbol: &str,
        threshold: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            condition,
            symbol: symbol.to_lowercase(),
            threshold,
            is_active: true,
            triggered: false,
            created_at: Utc::now(),
            triggered_at: None,
            triggered_price: None,
        }
    }

    /// Whether this alert is eligible for evaluation
    pub fn is_armed(&self) -> bool {
        self.is_active && !self.triggered
    }
}

/// Receives fired alerts
pub trait AlertSubscriber: Send + Sync {
    fn on_alert(&self, alert: &Alert);
}

impl<F> AlertSubscriber for F
where
    F: Fn(&Alert) + Send + Sync,
{
    fn on_alert(&self, alert: &Alert) {
        self(alert)
    }
}
