// * Telemetry - structured logging for pipeline runs
// * JSON output for batch/CI runs, pretty output for local development.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format of the log layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format '{other}' (expected json or pretty)")),
        }
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initializes tracing in the requested format; RUST_LOG overrides `level`.
///
/// Returns `false` when a global subscriber was already installed.
///
/// # Example
/// ```ignore
/// use phone_refinery::ops::telemetry::{self, LogFormat};
///
/// telemetry::try_init(LogFormat::Json, "info");
/// tracing::info!(brand = "Samsung", rows = 120, "Brand batch loaded");
/// ```
pub fn try_init(format: LogFormat, level: &str) -> bool {
    let registry = tracing_subscriber::registry().with(env_filter(level));
    match format {
        LogFormat::Json => registry.with(fmt::layer().json().with_target(false)).try_init().is_ok(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init().is_ok(),
    }
}
