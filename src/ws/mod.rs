//! WebSocket client library
//!
//! Provides a reusable WebSocket client with ping/pong keepalive, an explicit
//! close handle and opt-in reconnection with exponential backoff.

mod client;
mod types;

pub use client::WsClient;
pub use types::{Backoff, WsConfig, WsConnection, WsError, WsMessage};
