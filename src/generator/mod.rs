//! Synthetic market data
//!
//! Historical seeding and a live feed connector for running without an
//! exchange connection.

mod connector;
mod ticks;

pub use connector::{trade_frame, SyntheticConnector};
pub use ticks::{TickGenerator, DEFAULT_BASE_PRICE};
