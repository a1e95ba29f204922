//! Utilities for logging.

use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging for tests.
///
/// `RUST_LOG` directives take precedence over the `debug` default. Safe to
/// call from every test, only the first call installs the subscriber.
pub fn init_test() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::DEBUG.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_test_writer()
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_test_is_repeatable() {
        init_test();
        init_test();
        tracing::debug!("logging initialized");
    }
}
