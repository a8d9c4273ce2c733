use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_telemetry(observability: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&observability.log_level))?;

    // Logs go to stderr so that command output on stdout stays parseable.
    if observability.json_logs {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .try_init()?;
    }

    tracing::debug!(
        json = observability.json_logs,
        level = %observability.log_level,
        "Portal telemetry initialized"
    );
    Ok(())
}

/// Generate a correlation ID for linking the log lines of one operation call
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span wrapping one pass through the operation pipeline
pub fn create_operation_span(operation: &str, correlation_id: &str) -> tracing::Span {
    tracing::info_span!(
        "portal_operation",
        operation = operation,
        correlation.id = correlation_id,
    )
}
