//! Logger initialization for binaries.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Honors `RUST_LOG` when set; otherwise logs the named binary at
/// `default_level` and `tower_http` at debug.
pub fn setup_logger(name: &str, default_level: &str) {
    let target = name.replace('-', "_");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{target}={default_level},tachibanashi={default_level},tower_http=debug"
        ))
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
