//! Logging setup and process-wide relay counters

use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, TelemetryConfig};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter '{0}'")]
    InvalidFilter(String),

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` takes precedence over `telemetry.log_level`. Timestamps and ANSI
/// colors are left out since the platform log sink adds its own.
pub fn init_tracing(telemetry: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&telemetry.log_level)
            .map_err(|_| TelemetryError::InvalidFilter(telemetry.log_level.clone()))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .without_time();

    let installed = match telemetry.log_format {
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
        LogFormat::Pretty => builder.with_target(false).try_init(),
    };

    installed.map_err(|e| TelemetryError::Init(e.to_string()))
}

/// Metrics handle for recording relay counters
///
/// Counters accumulate for the life of the process (one warm execution
/// environment) and start from zero on every cold start.
#[derive(Debug, Default)]
pub struct Metrics {
    invocations: AtomicU64,
    records_delivered: AtomicU64,
    records_failed: AtomicU64,
    messages_published: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invocation(&self) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "invocations", "Metric incremented");
    }

    pub fn record_delivered(&self) {
        self.records_delivered.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "records_delivered", "Metric incremented");
    }

    pub fn record_failed(&self) {
        self.records_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "records_failed", "Metric incremented");
    }

    pub fn message_published(&self) {
        self.messages_published.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "messages_published", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            invocations: self.invocations.load(Ordering::Relaxed),
            records_delivered: self.records_delivered.load(Ordering::Relaxed),
            records_failed: self.records_failed.load(Ordering::Relaxed),
            messages_published: self.messages_published.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub invocations: u64,
    pub records_delivered: u64,
    pub records_failed: u64,
    pub messages_published: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = Metrics::new();
        metrics.invocation();
        metrics.record_delivered();
        metrics.record_delivered();
        metrics.record_failed();
        metrics.message_published();

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                invocations: 1,
                records_delivered: 2,
                records_failed: 1,
                messages_published: 1,
            }
        );
    }
}
