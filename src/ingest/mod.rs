//! Tick ingestion
//!
//! Feed workers, the shared per-tick pipeline, the bounded buffer and the
//! collection service that owns them.

mod buffer;
mod pipeline;
mod scheduler;
mod service;
mod supervisor;

pub use buffer::IngestionBuffer;
pub use pipeline::TickPipeline;
pub use scheduler::PeriodicTask;
pub use service::IngestionService;
pub use supervisor::{ConnectionState, StreamSupervisor};
