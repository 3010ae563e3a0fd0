//! Chaser-Element: self-healing element proxies for browser automation
//!
//! Callers refer to page elements by declarative selectors. Proxies resolve
//! lazily against a remote WebDriver-style session, detect stale handles,
//! re-locate within a one-retry bound and wait for elements to become
//! present, visible and enabled before acting on them.

pub mod error;
pub mod config;
pub mod observability;

pub mod remote;
pub mod wait;
pub mod element;
pub mod session;

// Re-exports
pub use error::{Error, Result};
pub use config::{Config, RelocatePolicy};
pub use element::{Element, Selector, TypedElement};
pub use session::{Container, Frame, Session};
pub use wait::Condition;

/// Chaser-Element library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
