//! Common test utilities
//!
//! Shared fixtures for the integration tests: a mock-backed session with
//! short timeouts.

#![allow(dead_code)]

use chaser_element::observability::init_tracing;
use chaser_element::remote::MockDriver;
use chaser_element::{Config, Session};
use std::sync::Arc;
use std::time::Duration;

/// Poll interval used by every fixture session
pub const POLL: Duration = Duration::from_millis(20);

/// Build a session over `driver` with the given default timeout
pub fn setup_session(driver: &Arc<MockDriver>, timeout: Duration) -> Session {
    let config = Config {
        default_timeout_ms: timeout.as_millis() as u64,
        poll_interval_ms: POLL.as_millis() as u64,
        ..Default::default()
    };
    Session::new(driver.clone(), config)
}

/// Session whose handle-based proxies may fall back to their criteria
pub fn setup_relocating_session(driver: &Arc<MockDriver>, timeout: Duration) -> Session {
    let config = Config {
        default_timeout_ms: timeout.as_millis() as u64,
        poll_interval_ms: POLL.as_millis() as u64,
        relocate_handle_based: true,
        ..Default::default()
    };
    Session::new(driver.clone(), config)
}

/// Fresh driver with an empty document
pub fn setup_driver() -> Arc<MockDriver> {
    init_tracing("warn");
    Arc::new(MockDriver::new())
}
