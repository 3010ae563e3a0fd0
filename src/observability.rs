//! Tracing setup shared by binaries and integration tests.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, EnvFilter};

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (for example the
/// configured `log_level`) is used. Later calls are no-ops and return whether
/// the first call managed to install the subscriber.
pub fn init_tracing(default_level: &str) -> bool {
    *INSTALLED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let first = init_tracing("debug");
        let second = init_tracing("trace");
        assert_eq!(first, second);
    }
}
