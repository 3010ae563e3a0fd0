//! Bounded polling primitive

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

use crate::Error;

/// Result of one bounded poll
#[derive(Debug)]
pub struct WaitOutcome<T = ()> {
    /// Whether the predicate returned true before the deadline
    pub satisfied: bool,
    /// Time spent polling
    pub elapsed: Duration,
    /// Number of predicate evaluations
    pub attempts: u32,
    /// Error raised by the most recent evaluation, if it failed
    pub last_error: Option<Error>,
    /// Value produced by the satisfying evaluation
    pub value: Option<T>,
}

impl<T> WaitOutcome<T> {
    /// Human readable reason the last attempt did not succeed
    pub fn diagnostic(&self) -> Option<String> {
        self.last_error.as_ref().map(|e| e.to_string())
    }
}

/// Fixed-interval poller
///
/// Evaluates a predicate until it returns `Ok(true)` or the deadline passes.
/// An `Err` from the predicate counts as "not yet" and is kept as the
/// diagnostic for the caller.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    interval: Duration,
}

impl Timer {
    /// Create a timer that sleeps `interval` between checks
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Delay between checks
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Poll `predicate` until it holds or `timeout` elapses
    pub async fn wait<F, Fut>(&self, timeout: Duration, mut predicate: F) -> WaitOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, Error>>,
    {
        self.poll(timeout, move || {
            let check = predicate();
            async move { Ok::<_, Error>(check.await?.then_some(())) }
        })
        .await
    }

    /// Poll until `predicate` yields a value or `timeout` elapses
    ///
    /// `Ok(None)` means "not yet" and clears the diagnostic; an `Err` is kept
    /// as the diagnostic until a later evaluation replaces it.
    pub async fn poll<T, F, Fut>(&self, timeout: Duration, mut predicate: F) -> WaitOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, Error>>,
    {
        let start = Instant::now();
        let deadline = start + timeout;
        let mut attempts = 0;
        let mut last_error = None;

        loop {
            attempts += 1;
            match predicate().await {
                Ok(Some(value)) => {
                    return WaitOutcome {
                        satisfied: true,
                        elapsed: start.elapsed(),
                        attempts,
                        last_error: None,
                        value: Some(value),
                    }
                }
                Ok(None) => last_error = None,
                Err(e) => {
                    trace!("Poll attempt {} failed: {}", attempts, e);
                    last_error = Some(e);
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return WaitOutcome {
                    satisfied: false,
                    elapsed: start.elapsed(),
                    attempts,
                    last_error,
                    value: None,
                };
            }

            // Never oversleep the deadline; the final check runs at the deadline itself
            tokio::time::sleep(self.interval.min(deadline - now)).await;
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}
