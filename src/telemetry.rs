use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Initialize structured logging for the intake service.
/// JSON output so boundary decisions and delivery ids stay greppable.
pub fn init_telemetry() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("lead-intake telemetry initialized with structured logging");
    Ok(())
}

/// Generate a correlation ID for linking one submission's log events.
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create a span wrapping one boundary invocation.
pub fn create_submission_span(operation: &str, correlation_id: &str) -> tracing::Span {
    tracing::info_span!(
        "submission_boundary",
        operation = operation,
        correlation.id = correlation_id,
    )
}
