//! Price alerts
//!
//! Threshold rules evaluated against every ingested tick.

mod engine;
mod types;

pub use engine::AlertEngine;
pub use types::{Alert, AlertCondition, AlertSubscriber};
