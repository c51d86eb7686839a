use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;

/// Initialize structured logging.
///
/// `RUST_LOG` wins over the configured level. Logs go to stderr so the
/// terminal player on stdout stays readable.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    tracing::debug!("Shadow drill telemetry initialized");
    Ok(())
}

/// Generate an id for correlating everything a session logs
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span that timer and announcement tasks of one session run inside
pub fn create_session_span(session_id: &str) -> tracing::Span {
    tracing::info_span!("workout_session", session.id = session_id)
}
