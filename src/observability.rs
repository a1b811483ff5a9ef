use anyhow::Result;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing and logging
///
/// `RUST_LOG` takes precedence over the configured level. `format` selects
/// structured JSON output (`json`) or the pretty console output (anything else).
pub fn init_observability(log_level: &str, format: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if format.eq_ignore_ascii_case("json") {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_filter(env_filter))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(env_filter),
            )
            .try_init()?;
    }

    tracing::info!(
        service.name = env!("CARGO_PKG_NAME"),
        service.version = env!("CARGO_PKG_VERSION"),
        "Observability initialized"
    );

    Ok(())
}
