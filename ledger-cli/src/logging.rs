use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` from the config is used. A
/// directive that fails to parse falls back to `warn`.
pub fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.to_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry().with(filter).with(layer).init();
}
