use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogFormat;

const DEFAULT_FILTER: &str = "info,finance_alerts=debug,alerts_lib=debug";

/// Initialize tracing with a stderr layer; stdout is left to the CLI output.
///
/// - Compact: human-readable, for terminals and dev consoles
/// - Json: one object per line, for hosts that ship logs elsewhere
/// - Default level: INFO, override via RUST_LOG env
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match format {
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if result.is_ok() {
        tracing::debug!(?format, "Tracing initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_init_is_harmless() {
        init(LogFormat::Compact);
        init(LogFormat::Json);
        tracing::info!("still logging");
    }
}
