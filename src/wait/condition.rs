//! Conditions an element can be waited on

use std::fmt;

/// Condition accepted by `Element::wait_until`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Element can be located
    Exists,
    /// Element exists and is visible
    Present,
    /// Element is visible; fails while it cannot be located
    Visible,
    /// Element is present and enabled
    Enabled,
    /// Element is present, enabled and not read only
    Writable,
    /// Element is gone or hidden
    NotPresent,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Condition::Exists => "existent",
            Condition::Present => "present",
            Condition::Visible => "visible",
            Condition::Enabled => "enabled",
            Condition::Writable => "writable",
            Condition::NotPresent => "not present",
        };
        f.write_str(name)
    }
}

/// Readiness an action requires before it is dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Interaction {
    /// Exists and visible
    Present,
    /// Present and enabled
    Enabled,
    /// Enabled and not read only
    Writable,
}

impl Interaction {
    /// Matching wait condition, used in timeout messages
    pub fn condition(&self) -> Condition {
        match self {
            Interaction::Present => Condition::Present,
            Interaction::Enabled => Condition::Enabled,
            Interaction::Writable => Condition::Writable,
        }
    }
}
