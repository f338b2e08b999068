use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, for the CLI
    Pretty,
    /// One JSON object per line, for CloudWatch
    Json,
}

/// Installs the global subscriber. `RUST_LOG` wins over `default_level`.
/// Calling this twice is harmless; the second call is a no-op.
pub fn init_logging(format: LogFormat, default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = fmt().with_env_filter(filter);
    let res = match format {
        LogFormat::Pretty => builder.with_writer(std::io::stderr).try_init(),
        // Lambda prefixes each line with its own timestamp
        LogFormat::Json => builder
            .json()
            .with_current_span(false)
            .without_time()
            .try_init(),
    };
    if let Err(e) = res {
        tracing::debug!("logging already initialized: {}", e);
    }
}
