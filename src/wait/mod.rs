//! Synchronization primitives
//!
//! [`Timer`] is a bounded, fixed-interval poller. It never spawns work and
//! can only be cancelled by its deadline. [`Condition`] and [`Interaction`]
//! name what the element layer waits for.

pub mod condition;
pub mod timer;

#[cfg(test)]
mod tests;

pub use condition::{Condition, Interaction};
pub use timer::{Timer, WaitOutcome};
