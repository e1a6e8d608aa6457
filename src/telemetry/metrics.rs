//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Ticks normalized and dispatched
    TicksIngested,
    /// Frames dropped by the normalizer
    TicksMalformed,
    /// Failed tick writes
    StoreFailures,
    /// Alerts that fired
    AlertsFired,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Ticks currently held in the ingestion buffer
    BufferLen,
    /// Feeds tracked by the supervisor
    ActiveFeeds,
}

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Full pair analytics run
    Analytics,
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::TicksIngested => "pairwatch_ticks_ingested_total",
            CounterMetric::TicksMalformed => "pairwatch_ticks_malformed_total",
            CounterMetric::StoreFailures => "pairwatch_store_failures_total",
            CounterMetric::AlertsFired => "pairwatch_alerts_fired_total",
        }
    }
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::BufferLen => "pairwatch_buffer_len",
            GaugeMetric::ActiveFeeds => "pairwatch_active_feeds",
        }
    }
}

impl LatencyMetric {
    fn name(self) -> &'static str {
        match self {
            LatencyMetric::Analytics => "pairwatch_analytics_latency_ms",
        }
    }
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    ::metrics::counter!(metric.name()).increment(1);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    ::metrics::gauge!(metric.name()).set(value);
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let value_ms = duration.as_secs_f64() * 1000.0;
    ::metrics::histogram!(metric.name()).record(value_ms);
    tracing::trace!(metric = metric.name(), value_ms, "Recorded latency");
}

/// Serve the Prometheus scrape endpoint on `0.0.0.0:port`.
///
/// Must be called from within a tokio runtime.
pub fn install_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;
    tracing::info!(%addr, "Metrics exporter listening");
    Ok(())
}
