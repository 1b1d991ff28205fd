//! # SSV Telemetry
//!
//! Observability for the SSV validator client.
//!
//! ## Components
//!
//! - **Logs**: `tracing` events rendered by a `tracing-subscriber` fmt layer,
//!   human-readable or JSON (for log shippers).
//! - **Metrics**: Prometheus counters in a process registry, rendered as text
//!   exposition by [`encode_metrics`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ssv_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_telemetry(&config).expect("Failed to init telemetry");
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SSV_SERVICE_NAME` | `ssv-validator` | Service name attached to log lines |
//! | `SSV_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` takes precedence) |
//! | `SSV_JSON_LOGS` | `false` | Emit JSON log lines |
//! | `SSV_LOG_THREAD_IDS` | `true` | Include thread ids in log lines |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, DUTY_RESOLUTION_FAILURES, PARTIAL_SUBMISSIONS, ROLE_TASKS,
    SLOTS_PROCESSED, STREAM_TASKS_RECEIVED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize log subscriber: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register metrics.
///
/// Metric registration is idempotent; a second logging initialization in the
/// same process is reported as [`TelemetryError::LoggingInit`].
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)?;
    tracing::debug!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_service_name() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "ssv-validator");
    }
}
