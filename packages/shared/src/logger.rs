//! Logger setup with tracing-subscriber.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// The filter defaults to `<app_name>=<default_level>` and can be overridden
/// with the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `app_name` - Binary or test harness name used as the default filter target
/// * `default_level` - Log level applied when `RUST_LOG` is not set
pub fn setup_logger(app_name: &str, default_level: &str) {
    let default_filter = format!("{}={}", app_name.replace('-', "_"), default_level);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
